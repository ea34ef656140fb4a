pub mod error;
pub mod prober;
pub mod result;

pub use error::ScanError;
pub use prober::{Prober, ProberBuilder};
pub use result::ProbeResult;
