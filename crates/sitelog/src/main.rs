use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sitelog::cli::{Cli, Command, into_fields};
use sitelog::{AppendOutcome, LogStore, SettingsUpdate, SitelogConfig};
use sitelog_core::{EntryId, LogEntry, LogKind, QueryOrder};
use sitelog_logging::SitelogSubscriberBuilder;
use sitelog_storage::{RedbDocumentRepository, RedbSettingsStore, RedbStorage};

fn print_entry(entry: &LogEntry) {
    let fields: Vec<String> = entry
        .fields
        .iter()
        .map(|(k, v)| format!("{k}={v:?}"))
        .collect();
    println!(
        "{} {} {}",
        entry.id,
        entry.created_at.to_rfc3339(),
        fields.join(" ")
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = SitelogConfig::load_or_default(&cli.config)?;
    if let Some(db) = cli.db {
        config.storage.db_path = db;
    }
    if let Some(level) = cli.log_level.as_deref() {
        config.override_log_level(level);
    }

    let _log_guard = SitelogSubscriberBuilder::new()
        .with_config(config.logging.clone())
        .init()
        .context("Failed to initialize logging")?;

    let storage = Arc::new(RedbStorage::open(config.storage_config()).with_context(|| {
        format!("Failed to open database {}", config.storage.db_path.display())
    })?);
    let store = LogStore::new(
        Arc::new(RedbDocumentRepository::new(storage.clone())),
        Arc::new(RedbSettingsStore::new(storage)),
    )
    .with_capacity_mode(config.capacity_mode);

    for (kind, defaults) in config.seeded_kinds() {
        store.seed_settings(&kind, defaults).await?;
    }

    match cli.command {
        Command::Settings { kind } => {
            let kind = LogKind::new(kind);
            let settings = store.get_settings(&kind).await?;
            println!(
                "{kind}: enabled={} max_entries={}",
                settings.enabled, settings.max_entries
            );
        }

        Command::Configure {
            kind,
            enabled,
            max_entries,
        } => {
            let kind = LogKind::new(kind);
            let update = SettingsUpdate {
                enabled,
                max_entries,
            };
            if update.is_empty() {
                anyhow::bail!("Nothing to change: pass --enabled and/or --max-entries");
            }
            let settings = store.update_settings(&kind, update).await?;
            println!(
                "Settings saved for {kind}: enabled={} max_entries={}",
                settings.enabled, settings.max_entries
            );
        }

        Command::List {
            kind,
            limit,
            offset,
            oldest_first,
        } => {
            let kind = LogKind::new(kind);
            let order = if oldest_first {
                QueryOrder::OldestFirst
            } else {
                QueryOrder::NewestFirst
            };
            let entries = store.list_ordered(&kind, Some(limit), offset, order).await?;
            if entries.is_empty() {
                println!("No entries in {kind}");
            }
            for entry in &entries {
                print_entry(entry);
            }
        }

        Command::Count { kind } => {
            let kind = LogKind::new(kind);
            println!("{kind}: {} entries", store.count(&kind).await?);
        }

        Command::Clear { kind } => {
            let kind = LogKind::new(kind);
            let removed = store.clear(&kind).await?;
            println!("Cleared {removed} entries from {kind}");
        }

        Command::Delete { kind, id } => {
            let kind = LogKind::new(kind);
            let id = EntryId::new(id);
            if store.delete_one(&kind, id).await? {
                println!("Deleted entry {id} from {kind}");
            } else {
                anyhow::bail!("No entry {id} in {kind}");
            }
        }

        Command::Record { kind, fields } => {
            let kind = LogKind::new(kind);
            match store.append(&kind, into_fields(fields)).await {
                AppendOutcome::Appended(entry) => println!("Recorded entry {} in {kind}", entry.id),
                AppendOutcome::Disabled => println!("Log {kind} is disabled; nothing recorded"),
                AppendOutcome::Failed(e) => {
                    return Err(e).with_context(|| format!("Failed to record entry in {kind}"));
                }
            }
        }
    }

    Ok(())
}
