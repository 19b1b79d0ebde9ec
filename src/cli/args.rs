//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Derive and render hierarchical views from typed relationships between document nodes
#[derive(Parser, Debug)]
#[command(name = "docforest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render hierarchy as a tree
    Tree {
        /// Relation file or directory to scan
        path: PathBuf,

        /// Relationship allow-list (first entry shapes the tree)
        #[arg(short, long = "rel", num_args = 1..)]
        relationships: Vec<String>,

        /// Render one section per tracked relationship
        #[arg(short, long, num_args = 1..)]
        track: Vec<String>,

        /// Style labels by tree level
        #[arg(long)]
        styled: bool,
    },

    /// Show all root-to-leaf branches linearly
    Branches {
        /// Relation file or directory
        path: PathBuf,

        /// Relationship allow-list (first entry shapes the tree)
        #[arg(short, long = "rel", num_args = 1..)]
        relationships: Vec<String>,
    },

    /// List leaf labels
    Leaves {
        /// Relation file or directory
        path: PathBuf,

        /// Relationship allow-list (first entry shapes the tree)
        #[arg(short, long = "rel", num_args = 1..)]
        relationships: Vec<String>,
    },

    /// List parsed edges
    Edges {
        /// Relation file or directory
        path: PathBuf,
    },

    /// Export the forest as JSON
    Export {
        /// Relation file or directory
        path: PathBuf,

        /// Relationship allow-list (first entry shapes the tree)
        #[arg(short, long = "rel", num_args = 1..)]
        relationships: Vec<String>,
    },

    /// Select a relation file interactively (fzf style)
    Select {
        /// Directory to search
        dir: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show version info
    Info,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
