//! Tool profiles: fixed presets selected by an external tool identifier

pub mod profile;
pub mod registry;

pub use profile::{PromptStyle, ToolKind, ToolProfile};
pub use registry::ToolProfileRegistry;
