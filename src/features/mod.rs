//! Feature-flag vocabulary and keyword detection

#[macro_use]
pub mod macros;

pub mod detector;
pub mod flag;

pub use detector::{describe, detect, FEATURE_KEYWORDS};
pub use flag::{FeatureFlag, FeatureFlagSet};
