//! CLI definitions for membank.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// membank CLI.
#[derive(Parser)]
#[command(name = "membank")]
#[command(about = "Personal memory bank with hybrid keyword and semantic search")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.membank/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Save a new memory
    Save {
        /// Memory content
        content: String,

        /// Tag to attach (repeatable)
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,

        /// Free-form note
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// Search memories by keywords and meaning
    Search {
        /// Query text
        query: String,

        /// Maximum number of results (default from config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Minimum vector similarity, 0.0 - 1.0 (default from config)
        #[arg(short, long)]
        threshold: Option<f32>,

        /// RRF smoothing constant (default from config)
        #[arg(long)]
        rrf_k: Option<u32>,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show a single memory
    Get {
        /// Memory ID
        id: String,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Delete a memory
    Delete {
        /// Memory ID
        id: String,
    },

    /// List the most recent memories
    List {
        /// Maximum number of memories
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_save_with_tags() {
        let cli = Cli::try_parse_from([
            "membank", "save", "Enable WAL mode", "--tag", "sqlite", "-t", "perf", "--note", "ci",
        ])
        .unwrap();

        match cli.command {
            Commands::Save { content, tags, note } => {
                assert_eq!(content, "Enable WAL mode");
                assert_eq!(tags, vec!["sqlite", "perf"]);
                assert_eq!(note, "ci");
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn test_parse_search_overrides() {
        let cli = Cli::try_parse_from([
            "membank", "--config", "/tmp/c.toml", "search", "borrow checker", "-k", "3",
            "--threshold", "0.5", "--format", "json",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        match cli.command {
            Commands::Search { query, top_k, threshold, rrf_k, format } => {
                assert_eq!(query, "borrow checker");
                assert_eq!(top_k, Some(3));
                assert_eq!(threshold, Some(0.5));
                assert_eq!(rrf_k, None);
                assert_eq!(format, "json");
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_parse_list_default_limit() {
        let cli = Cli::try_parse_from(["membank", "list"]).unwrap();
        assert!(cli.config.is_none());
        match cli.command {
            Commands::List { limit, format } => {
                assert_eq!(limit, 20);
                assert_eq!(format, "table");
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_command_required() {
        assert!(Cli::try_parse_from(["membank"]).is_err());
    }
}
