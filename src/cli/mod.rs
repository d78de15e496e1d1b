use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "amass-mapper",
    version,
    about = "Inventory and map domains from Amass relation reports",
    long_about = "Parse an Amass report made of 'SOURCE (TYPE) --> RELATION --> TARGET (TYPE)' lines into a relation table, then list, categorize, export, query or draw the discovered names. Lines that do not follow that shape are skipped silently."
)]
pub struct Cli {
    /// Suppress non-essential output
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    /// Path to a TOML configuration file (default: amass-mapper.toml next to the report)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListModeArg {
    Simple,
    Categorized,
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererArg {
    /// Render with Graphviz into --format
    Graphviz,
    /// Write the DOT source only
    Dot,
    /// Interactive vis-network page
    Html,
    /// Tree-shaped text map on stdout
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageFormatArg {
    Svg,
    Png,
    Pdf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnOffArg {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DotThemeArg {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DotRankDirArg {
    #[value(name = "LR")]
    LR,
    #[value(name = "TB")]
    TB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DotSplinesArg {
    Curved,
    Ortho,
    Polyline,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List every discovered domain, optionally exporting to files
    List {
        /// Amass report to read
        file: PathBuf,
        /// Listing layout [default: simple]
        #[arg(long, value_enum)]
        mode: Option<ListModeArg>,
        /// Export domain names to this file
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
        /// Include resolved IPs in --export
        #[arg(long, default_value_t = false, requires = "export", conflicts_with = "export_categorized")]
        export_ips: bool,
        /// Group --export output by category
        #[arg(long, default_value_t = false, requires = "export")]
        export_categorized: bool,
        /// Export bare domain names, one per line, to this file
        #[arg(long, value_name = "FILE")]
        export_clean: Option<PathBuf>,
    },
    /// Draw a map of the discovered domains
    Map {
        /// Amass report to read
        file: PathBuf,
        /// Renderer [default: graphviz]
        #[arg(long, value_enum)]
        renderer: Option<RendererArg>,
        /// Graphviz output format [default: svg]
        #[arg(long, value_enum)]
        format: Option<ImageFormatArg>,
        /// Hide IP address nodes
        #[arg(long, default_value_t = false)]
        no_ips: bool,
        /// Show RIR organization nodes
        #[arg(long, default_value_t = false)]
        show_orgs: bool,
        /// Output file (default: domain_map_<root>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// DOT: theme [default: light]
        #[arg(long, value_enum)]
        dot_theme: Option<DotThemeArg>,
        /// DOT: rank direction [default: TB]
        #[arg(long, value_enum)]
        dot_rankdir: Option<DotRankDirArg>,
        /// DOT: edge splines style [default: ortho]
        #[arg(long, value_enum)]
        dot_splines: Option<DotSplinesArg>,
        /// DOT: include legend [default: on]
        #[arg(long, value_enum)]
        dot_legend: Option<OnOffArg>,
        /// SVG: add interactive enhancements [default: on]
        #[arg(long, value_enum)]
        svg_interactive: Option<OnOffArg>,
    },
    /// Run queries over the parsed report
    Query {
        #[command(subcommand)]
        query: QueryCommands,
    },
    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum QueryCommands {
    /// Domains grouped by category
    Categories {
        file: PathBuf,
        /// Output format [default: text]
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Domains that embed the root name
    Subdomains {
        file: PathBuf,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Domains that do not embed the root name
    External {
        file: PathBuf,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Addresses a domain resolves to (A/AAAA)
    Resolve {
        file: PathBuf,
        /// Domain to look up
        #[arg(long)]
        name: String,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Outgoing relations of a name
    Relations {
        file: PathBuf,
        /// Source name to look up
        #[arg(long)]
        name: String,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Summary counters
    Stats {
        file: PathBuf,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
}

impl QueryCommands {
    #[must_use]
    pub fn file(&self) -> &std::path::Path {
        match self {
            QueryCommands::Categories { file, .. }
            | QueryCommands::Subdomains { file, .. }
            | QueryCommands::External { file, .. }
            | QueryCommands::Resolve { file, .. }
            | QueryCommands::Relations { file, .. }
            | QueryCommands::Stats { file, .. } => file,
        }
    }

    #[must_use]
    pub fn format(&self) -> Option<OutputFormat> {
        match self {
            QueryCommands::Categories { format, .. }
            | QueryCommands::Subdomains { format, .. }
            | QueryCommands::External { format, .. }
            | QueryCommands::Resolve { format, .. }
            | QueryCommands::Relations { format, .. }
            | QueryCommands::Stats { format, .. } => *format,
        }
    }
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
