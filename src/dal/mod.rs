pub mod lead_db;
pub mod lead_store;

pub use lead_db::{LeadStats, StoredLead};
pub use lead_store::*;
