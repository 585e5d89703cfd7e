pub mod domain_resolver;
pub mod enrichment;
pub mod job_cache;
pub mod mx_validator;
pub mod pipeline;
pub mod search_client;
pub mod site_crawler;

pub use domain_resolver::*;
pub use enrichment::*;
pub use job_cache::*;
pub use mx_validator::*;
pub use pipeline::*;
pub use search_client::*;
pub use site_crawler::*;
