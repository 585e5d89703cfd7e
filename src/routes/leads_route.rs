use actix_web::{get, web, HttpResponse};

use crate::dal::LeadStore;

#[get("/leads")]
pub async fn get_leads(store: web::Data<dyn LeadStore>) -> HttpResponse {
    match store.all_leads().await {
        Ok(leads) => HttpResponse::Ok().json(leads),
        Err(e) => {
            log::error!("Failed to read leads: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/leads/stats")]
pub async fn get_lead_stats(store: web::Data<dyn LeadStore>) -> HttpResponse {
    match store.lead_stats().await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => {
            log::error!("Failed to compute lead stats: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
