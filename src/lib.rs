pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;

pub use config::ChangeConfig;
pub use detection::ChangeDetector;
pub use error::ChangeError;
pub use models::{BoundingBox, ChangeDetection, ImagePair, Region};
pub use pipeline::{Orchestrator, PairOutcome, PairPaths, PairSummary, discover_pairs};
