pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, ConfigArgs, FeaturesArgs, GenerateArgs, ToolsArgs};
pub use output::{FeatureReport, OutputFormat, OutputFormatter};
