//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use url::Url;

/// Output format for tool listings and results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for toolbridge
#[derive(Parser, Debug)]
#[command(name = "toolbridge")]
#[command(author, version, about = "Expose a web page's annotated forms, links and buttons as agent tools")]
#[command(long_about = r#"
toolbridge reads a server-rendered page and turns every element carrying a
`tool-name` attribute into a callable tool:

- <form tool-name>    parameters inferred from its controls, submitted off-page
- <a tool-name>       activated by fetch, or navigated when the name contains "navigate"
- <button tool-name>  submits its form directly, or is clicked

Configuration files are loaded from (in priority order):
1. --config <path>         Explicit config file
2. TOOLBRIDGE_* env vars   e.g. TOOLBRIDGE_BRIDGE__SETTLE_DELAY_MS=0
3. ./toolbridge.toml       Project-level config
4. ~/.config/toolbridge/config.toml   Global config

Example:
  toolbridge list https://todo.example/todos
  toolbridge schema https://todo.example/todos add-todo
  toolbridge invoke https://todo.example/todos add-todo --arg text="buy milk"
  toolbridge watch https://todo.example/todos -v
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Scan a page and list the tools it declares
    List {
        /// Page to scan
        url: Url,
    },

    /// Print the JSON Schema of one tool, or of every tool
    Schema {
        /// Page to scan
        url: Url,
        /// Tool name (all tools when omitted)
        tool: Option<String>,
    },

    /// Invoke a tool once and print its result
    Invoke {
        /// Page to scan
        url: Url,
        /// Tool name
        tool: String,
        /// Argument as KEY=VALUE (can be specified multiple times)
        #[arg(short, long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,
        /// Arguments as a JSON object; --arg values take precedence
        #[arg(long, value_name = "JSON")]
        json: Option<String>,
    },

    /// Register tools, then keep registering tools inserted into the page
    Watch {
        /// Page to watch
        url: Url,
    },
}

impl Command {
    /// The page the command operates on.
    pub fn url(&self) -> &Url {
        match self {
            Command::List { url }
            | Command::Schema { url, .. }
            | Command::Invoke { url, .. }
            | Command::Watch { url } => url,
        }
    }
}
