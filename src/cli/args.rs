//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

/// Headless mind-map core: outline, replay and lay out topic trees
#[derive(Parser, Debug)]
#[command(name = "mindmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the topic tree
    Outline(DocumentArgs),

    /// Compute topic positions
    Layout {
        #[command(flatten)]
        document: DocumentArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = LayoutFormat::Table)]
        format: LayoutFormat,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Where the document comes from and what happens to it before output.
#[derive(Args, Debug, Clone, Default)]
pub struct DocumentArgs {
    /// Topic tree as TOML (default: a new document)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub doc: Option<PathBuf>,

    /// Action script to replay before output
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub script: Option<PathBuf>,

    /// Ignore all edits
    #[arg(long)]
    pub readonly: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutFormat {
    /// One line per topic with coordinates
    Table,
    /// Outline with coordinates
    Tree,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a commented config template
    Template,

    /// Show config paths
    Path,
}
