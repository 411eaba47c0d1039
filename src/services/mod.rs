//! Service layer for correlation, scoring and reporting.
//!
//! Services operate on already-fetched event batches; nothing here
//! performs I/O, which keeps the whole layer unit-testable with
//! in-memory fixtures.

pub mod analysis;
pub mod query;
pub mod reason;
pub mod report;

pub use analysis::{resolve_cme_speed, FlareAnalyzer, InterestingEvent};
pub use query::{FieldRegistry, QueryError, SortDirection, CME_REGISTRY, FLARE_REGISTRY};
pub use reason::{format_reason, InterestReason};
pub use report::{build_region_report, find_same_time_pairs, render_region_report, RegionActivity, SameTimePair};
