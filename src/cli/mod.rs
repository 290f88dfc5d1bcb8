//! CLI module - Command-line interface for Studydesk
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Studydesk - course, assignment and note tracker for students
#[derive(Parser)]
#[command(name = "studydesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file, overriding the default search locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Load JSON collection files into the database
    Import {
        /// Directory holding users.json, courses.json, assignments.json and notes.json
        #[arg(long)]
        dir: PathBuf,
    },

    /// Write every record back out as JSON collection files
    Export {
        /// Target directory
        #[arg(long)]
        dir: PathBuf,
    },
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_import_with_global_config() {
        let cli = Cli::try_parse_from([
            "studydesk",
            "import",
            "--dir",
            "legacy/data",
            "--config",
            "/etc/studydesk.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/etc/studydesk.toml")));
        match cli.command {
            Some(Commands::Import { dir }) => assert_eq!(dir, PathBuf::from("legacy/data")),
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["studydesk"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn export_requires_dir() {
        assert!(Cli::try_parse_from(["studydesk", "export"]).is_err());
    }
}
