pub mod email;
pub mod enriched_lead;
pub mod lead;
pub mod outcome;

pub use enriched_lead::*;
pub use lead::*;
pub use outcome::*;
