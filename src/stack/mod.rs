//! Technology stack selection
//!
//! [`choose`] maps a [`FeatureFlagSet`](crate::features::FeatureFlagSet) to a
//! [`StackChoice`]. Tool profiles with a fixed stack bypass it entirely.

pub mod choice;
pub mod selector;

pub use choice::{title_case, StackChoice, NONE_SLOT};
pub use selector::choose;
