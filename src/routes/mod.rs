pub mod default_route;
pub mod job_route;
pub mod leads_route;
