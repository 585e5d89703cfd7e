use std::{net::TcpListener, sync::Arc};

use actix_cors::Cors;
use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};

use crate::{
    configuration::Settings,
    dal::LeadStore,
    routes::{default_route, job_route, leads_route},
    services::{
        DnsMxLookup, DomainResolver, Enricher, HttpPageFetcher, JobResultCache, LeadPipeline,
        SearchProvider, SerperClient, SiteCrawler,
    },
};

/// Wires the search client, DNS, crawler and store into one pipeline.
pub fn build_pipeline(
    configuration: &Settings,
    store: Arc<dyn LeadStore>,
) -> anyhow::Result<LeadPipeline> {
    let search: Arc<dyn SearchProvider> = Arc::new(SerperClient::new(
        &configuration.search,
        configuration.api_keys.serper.clone(),
    ));
    let fetcher = Arc::new(HttpPageFetcher::new(&configuration.crawler)?);

    let enricher = Enricher::new(
        DomainResolver::new(search.clone()),
        Arc::new(DnsMxLookup::new(&configuration.enrichment)),
        SiteCrawler::new(fetcher, &configuration.crawler),
        configuration.enrichment.hiring_keyword.clone(),
    );

    Ok(LeadPipeline::new(
        search,
        Arc::new(enricher),
        store,
        configuration.search.lead_result_count,
        configuration.enrichment.max_workers,
    ))
}

pub fn run(
    listener: TcpListener,
    pipeline: Arc<LeadPipeline>,
    store: Arc<dyn LeadStore>,
    cache: Arc<JobResultCache>,
) -> Result<Server, std::io::Error> {
    let pipeline = web::Data::from(pipeline);
    let store: web::Data<dyn LeadStore> = web::Data::from(store);
    let cache = web::Data::from(cache);

    let server = HttpServer::new(move || {
        // The dashboard frontend is served from its own origin.
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .service(default_route::health_check)
            .service(job_route::start_job)
            .service(job_route::run_job)
            .service(job_route::latest_job)
            .service(leads_route::get_leads)
            .service(leads_route::get_lead_stats)
            .app_data(pipeline.clone())
            .app_data(store.clone())
            .app_data(cache.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
