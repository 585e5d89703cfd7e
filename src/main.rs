use std::{net::TcpListener, sync::Arc, time::Duration};

use env_logger::Env;
use leadhunt::{
    configuration::get_configuration,
    dal::{LeadStore, PgLeadStore},
    services::JobResultCache,
    startup::{build_pipeline, run},
};
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let pool_options = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(15 * 60)) // 15 minutes
        .max_lifetime(None);

    let connection_pool = pool_options.connect_lazy_with(configuration.database.with_db());
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    if configuration.api_keys.serper.is_empty() {
        log::warn!("No search api key configured, every search will come back empty");
    }

    let store: Arc<dyn LeadStore> = Arc::new(PgLeadStore::new(connection_pool));
    let pipeline = build_pipeline(&configuration, store.clone())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address)?;
    log::info!("Listening on {}", listener.local_addr()?);

    run(
        listener,
        Arc::new(pipeline),
        store,
        Arc::new(JobResultCache::new()),
    )?
    .await
}
