//! Longest routing cycle detection over large `source|destination|claim|status`
//! edge lists, with bounded memory via on-disk hash partitioning.

pub mod config;
pub mod detector;
pub mod error;
pub mod graph;
pub mod record;
pub mod source;
pub mod stream;
pub mod util;

pub use detector::{AnalysisOptions, AnalysisResult, CycleResult, RoutingCycleDetector};
pub use error::{Result, RouteError};
pub use record::{Edge, EdgeGroup, GroupKey};
