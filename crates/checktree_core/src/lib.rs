//! Checkbox tree propagation for outline documents.
//!
//! Keeps tri-state checkbox statuses and `[done/total]` cookies consistent
//! after a leaf is toggled. The engine talks to the document only through
//! the capability traits in [`document`]; [`OrgDocument`] is the bundled host.

pub mod config;
pub mod document;
pub mod engine;
pub mod logging;
pub mod model;

pub use config::{ConfigError, EngineConfig};
pub use document::{
    CheckboxWriter, DocumentContext, DocumentError, DocumentResult, HeadingContext, OrgDocument,
    OrgHeading,
};
pub use engine::aggregator::{StatusAggregator, StatusTally};
pub use engine::counter::{refresh_counters, CounterPass};
pub use engine::driver::{PropagationDriver, RefreshReport, ToggleReport};
pub use engine::toggle::{ToggleOutcome, ToggleRejection};
pub use engine::{EngineError, EngineResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::checkbox::{CheckboxNode, CheckboxStatus, NodeId, SubtaskCounters};
pub use model::forest::CheckboxForest;
