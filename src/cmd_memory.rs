//! Memory subcommand handlers.

use tracing::info;

use membank_config::{Config, ConfigError};
use membank_memory_hybrid::SearchOptions;
use membank_protocols::error::MemoryError;
use membank_protocols::memory::{MemoryRecord, NewMemory};

use crate::bootstrap::open_bank;
use crate::cli::Commands;

/// Handle a memory subcommand.
pub(crate) async fn handle_command(
    command: Commands,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let bank = open_bank(config).await?;

    match command {
        Commands::Save { content, tags, note } => {
            let record = bank
                .save(NewMemory::new(content).with_tags(tags).with_note(note))
                .await?;
            info!("Saved memory {}", record.id);
            println!("{}", record.id);
        }
        Commands::Search {
            query,
            top_k,
            threshold,
            rrf_k,
            format,
        } => {
            let options = search_options(config, top_k, threshold, rrf_k)?;
            let results = bank.search(&query, &options).await;
            if results.is_empty() && format != "json" {
                println!("No memories found.");
                return Ok(());
            }
            print_records(&results, &format)?;
        }
        Commands::Get { id, format } => match bank.get(&id).await? {
            Some(record) => match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&record)?),
                _ => print_detail(&record),
            },
            None => return Err(MemoryError::NotFound(id).into()),
        },
        Commands::Delete { id } => {
            if bank.delete(&id).await? {
                println!("Deleted {}", id);
            } else {
                return Err(MemoryError::NotFound(id).into());
            }
        }
        Commands::List { limit, format } => {
            let records = bank.list(limit).await?;
            if records.is_empty() && format != "json" {
                println!("No memories stored.");
                return Ok(());
            }
            print_records(&records, &format)?;
        }
    }

    Ok(())
}

/// Merge command-line overrides over configured search defaults. Overrides
/// get the same range checks as the config file.
fn search_options(
    config: &Config,
    top_k: Option<usize>,
    threshold: Option<f32>,
    rrf_k: Option<u32>,
) -> Result<SearchOptions, ConfigError> {
    let options = SearchOptions::default()
        .with_top_k(top_k.unwrap_or(config.search.top_k))
        .with_threshold(threshold.unwrap_or(config.search.threshold))
        .with_rrf_k(rrf_k.unwrap_or(config.search.rrf_k));

    if options.top_k == 0 {
        return Err(invalid("top_k", "must be greater than 0"));
    }
    if options.rrf_k == 0 {
        return Err(invalid("rrf_k", "must be greater than 0"));
    }
    // NaN fails the range check too.
    if !(0.0..=1.0).contains(&options.threshold) {
        return Err(invalid(
            "threshold",
            format!("must be within [0.0, 1.0], got {}", options.threshold),
        ));
    }

    Ok(options)
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.into(),
    }
}

fn print_records(records: &[MemoryRecord], format: &str) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        _ => {
            println!("{:<38} {:<50} {}", "ID", "CONTENT", "TAGS");
            println!("{}", "-".repeat(100));
            for record in records {
                println!(
                    "{:<38} {:<50} {}",
                    record.id,
                    truncate(&record.content, 48),
                    record.tags.join(", ")
                );
            }
        }
    }
    Ok(())
}

fn print_detail(record: &MemoryRecord) {
    println!("ID:      {}", record.id);
    println!("Tags:    {}", record.tags.join(", "));
    if !record.note.is_empty() {
        println!("Note:    {}", record.note);
    }
    println!();
    println!("{}", record.content);
}

/// Shorten to at most `max` characters on a char boundary, single line.
fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max {
        flat
    } else {
        let mut out: String = flat.chars().take(max.saturating_sub(3)).collect();
        out.push_str("...");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_options_from_config() {
        let mut config = Config::default();
        config.search.top_k = 8;
        config.search.threshold = 0.5;

        let options = search_options(&config, None, None, None).unwrap();
        assert_eq!(options.top_k, 8);
        assert_eq!(options.threshold, 0.5);
        assert_eq!(options.rrf_k, 60);
    }

    #[test]
    fn test_search_options_overrides() {
        let config = Config::default();
        let options = search_options(&config, Some(2), Some(0.9), Some(10)).unwrap();
        assert_eq!(options.top_k, 2);
        assert_eq!(options.threshold, 0.9);
        assert_eq!(options.rrf_k, 10);
    }

    #[test]
    fn test_search_options_reject_out_of_range() {
        let config = Config::default();

        for threshold in [1.5, -0.1, f32::NAN] {
            let err = search_options(&config, None, Some(threshold), None).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "threshold"));
        }
        assert!(search_options(&config, Some(0), None, None).is_err());
        assert!(search_options(&config, None, None, Some(0)).is_err());

        assert!(search_options(&config, None, Some(0.0), None).is_ok());
        assert!(search_options(&config, None, Some(1.0), None).is_ok());
    }

    fn temp_config(dir: &tempfile::TempDir) -> Config {
        let mut config = Config::default();
        config.storage.path = dir.path().join("memories.db");
        config.embedding.dimension = 32;
        config
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(&dir);

        let command = Commands::Get {
            id: "missing".to_string(),
            format: "table".to_string(),
        };
        let err = handle_command(command, &config).await.unwrap_err();
        let err = err.downcast_ref::<MemoryError>().unwrap();
        assert!(matches!(err, MemoryError::NotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(&dir);

        let command = Commands::Delete {
            id: "missing".to_string(),
        };
        let err = handle_command(command, &config).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MemoryError>(),
            Some(MemoryError::NotFound(_))
        ));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("line one\nline two", 40), "line one line two");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("ééééé", 4), "é...");
    }
}
