use crate::pipeline::Mode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Turns a product idea into an implementation package for AI code generators
#[derive(Parser, Debug)]
#[command(
    name = "ideaforge",
    about = "Turns a product idea into an implementation package for AI code generators",
    version,
    author,
    long_about = "ideaforge refines a free-text product idea, detects the features it needs, \
                  picks a technology stack and produces an implementation plan, a prompt pack \
                  and documentation. AI stages are optional: without a reachable LLM backend \
                  the package is built from templates alone."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Increase verbosity (can be used multiple times)"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate an implementation package from an idea",
        long_about = "Runs the full generation pipeline: refinement, feature detection, stack \
                      selection, domain analysis, product generation and the procedural baseline.\n\n\
                      Examples:\n  \
                      ideaforge generate \"A marketplace for local bakers\"\n  \
                      ideaforge generate --request idea.yaml --format json\n  \
                      ideaforge generate \"Team chat with file sharing\" --tool lovable --mode mvp\n  \
                      ideaforge generate \"A clinic scheduler\" --offline -o package.json -f json"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Show detected features and the chosen stack for a text",
        long_about = "Runs keyword feature detection and stack selection only. No LLM is called.\n\n\
                      Examples:\n  \
                      ideaforge features \"real-time chat for teams\"\n  \
                      ideaforge features \"AI writing assistant with stripe billing\" --format yaml"
    )]
    Features(FeaturesArgs),

    #[command(about = "List the supported code-generation tool profiles")]
    Tools(ToolsArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        value_name = "IDEA",
        required_unless_present = "request",
        help = "The product idea, in plain words"
    )]
    pub idea: Option<String>,

    #[arg(
        short = 'r',
        long,
        value_name = "FILE",
        help = "Read the request from a JSON or YAML file; flags override its fields"
    )]
    pub request: Option<PathBuf>,

    #[arg(long, value_parser = parse_mode, help = "Package scope: mvp or production")]
    pub mode: Option<Mode>,

    #[arg(
        short = 't',
        long,
        value_name = "ID",
        help = "Tailor output for a tool (lovable, replit, base44, claude_code)"
    )]
    pub tool: Option<String>,

    #[arg(long, value_name = "TEXT", help = "Who the product is for")]
    pub target_users: Option<String>,

    #[arg(
        short = 'c',
        long = "constraint",
        value_name = "TEXT",
        help = "A constraint the package must respect (repeatable)"
    )]
    pub constraints: Vec<String>,

    #[arg(long, value_name = "TEXT", help = "Industry, e.g. healthcare or fintech")]
    pub industry: Option<String>,

    #[arg(long, value_name = "TEXT", help = "Budget hint, e.g. '$500/month'")]
    pub budget: Option<String>,

    #[arg(long, value_name = "TEXT", help = "Timeline hint, e.g. '6 weeks'")]
    pub timeline: Option<String>,

    #[arg(long, value_name = "TEXT", help = "Stack preferences to mention to the AI")]
    pub preferred_stack: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Skip every AI stage and build the package from templates only")]
    pub offline: bool,

    #[arg(long, default_value = "free", help = "Usage tier whose monthly limit applies")]
    pub tier: String,

    #[arg(long, default_value = "local", help = "User id recorded in the usage ledger")]
    pub user: String,
}

#[derive(Parser, Debug, Clone)]
pub struct FeaturesArgs {
    #[arg(value_name = "TEXT", help = "Text to scan for features")]
    pub text: String,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ToolsArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    s.trim()
        .to_lowercase()
        .parse::<Mode>()
        .map_err(|_| format!("Invalid mode: {}. Valid options: mvp, production", s))
}
