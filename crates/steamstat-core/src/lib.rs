//! Result records and error taxonomy shared by the SteamStat backend crates.
//!
//! Nothing in here is persisted; every record lives for a single call and is
//! handed back to the UI layer as-is.

mod kind;
mod report;

pub use kind::ErrorKind;
pub use report::{LatencyReport, ThroughputReport, UPLOAD_ESTIMATE_RATIO, UpdateRequest, UpdateResult};
