use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// feed-llm – pick files in a tree view and hand them to an LLM
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to browse (defaults to CWD)
    #[arg(value_name = "DIR", default_value = ".")]
    pub directory: PathBuf,

    /// Print the result to stdout instead of copying it to the clipboard
    #[arg(long)]
    pub stdout: bool,

    /// Output format for the selected files
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// Do not load any ignore patterns (built-in or .feed-llm-ignore)
    #[arg(long)]
    pub no_ignore: bool,

    /// Debug-level logging on stderr (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Xml,
}
