use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::services::{JobResultCache, LeadPipeline};

#[derive(Deserialize)]
struct JobQuery {
    role: String,
    industry: String,
}

impl JobQuery {
    fn cleaned(&self) -> Option<(String, String)> {
        let role = self.role.trim();
        let industry = self.industry.trim();
        match role.is_empty() || industry.is_empty() {
            true => None,
            false => Some((role.to_string(), industry.to_string())),
        }
    }
}

#[derive(Serialize)]
struct JobStarted {
    status: &'static str,
    message: String,
}

#[post("/start-job")]
pub async fn start_job(
    query: web::Query<JobQuery>,
    pipeline: web::Data<LeadPipeline>,
    cache: web::Data<JobResultCache>,
) -> HttpResponse {
    let Some((role, industry)) = query.cleaned() else {
        return HttpResponse::BadRequest().body("role and industry are required");
    };

    let ticket = cache.begin(&role, &industry);
    let message = format!("Scraping {} in {}", role, industry);

    let pipeline = pipeline.into_inner();
    let cache = cache.into_inner();
    tokio::spawn(async move {
        let leads = pipeline.process_job(&role, &industry).await;
        if !cache.finish(ticket, leads) {
            log::info!("Discarding results of superseded job for {} in {}", role, industry);
        }
    });

    HttpResponse::Ok().json(JobStarted {
        status: "started",
        message,
    })
}

#[post("/run-job")]
pub async fn run_job(
    query: web::Query<JobQuery>,
    pipeline: web::Data<LeadPipeline>,
    cache: web::Data<JobResultCache>,
) -> HttpResponse {
    let Some((role, industry)) = query.cleaned() else {
        return HttpResponse::BadRequest().body("role and industry are required");
    };

    let ticket = cache.begin(&role, &industry);
    let leads = pipeline.process_job(&role, &industry).await;
    cache.finish(ticket, leads.clone());

    HttpResponse::Ok().json(leads)
}

#[get("/job/latest")]
pub async fn latest_job(cache: web::Data<JobResultCache>) -> HttpResponse {
    HttpResponse::Ok().json(cache.snapshot())
}
