//! Domain entities and request-scoped value types.
//!
//! All entities here are immutable values deserialized from upstream
//! JSON (NASA DONKI, NOAA SWPC) and discarded once a request completes.
//! There is no persistence layer and no cross-request identity.

pub mod events;
pub mod flare_class;
pub mod time;

pub use events::{
    CmeAnalysis, CmeEvent, FlareEvent, FluxReading, SolarRegion, SunspotObservation,
};
pub use flare_class::FlareClass;
pub use time::{DateParseError, DateRange};
