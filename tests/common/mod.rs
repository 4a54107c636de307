mod fixtures;
#[allow(unused_imports)]
pub use fixtures::*;

// Re-export commonly used types from changemark for tests
#[allow(unused_imports)]
pub use changemark::{
    BoundingBox, ChangeConfig, ChangeDetection, ChangeDetector, ChangeError, ImagePair, Region,
};
