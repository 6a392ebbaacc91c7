//! auto-translate - fill missing record translations with DeepL
//!
//! Command line host for the translation filler: loads records from a
//! JSON store, fills every missing locale and writes them back.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use auto_translate::cli::{Args, Commands, ConfigAction};
use auto_translate::config::{Config, LoggingConfig};
use auto_translate::error::AutoTranslateError;
use auto_translate::observer::{SaveDispatch, SaveObserver};
use auto_translate::record::TranslatableRecord;
use auto_translate::service::{TranslationOutcome, TranslationService};
use auto_translate::slug::slugify;
use auto_translate::store::{JsonFileStore, RecordStore};
use auto_translate::translate::{check_deepl_availability, ChainedApiKey};

const DEFAULT_CONFIG_FILE: &str = "auto-translate.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new(DEFAULT_CONFIG_FILE).exists() {
                Config::from_file(DEFAULT_CONFIG_FILE)?
            } else {
                Config::default()
            }
        }
    };

    // Setup logging to both console and the translation log
    setup_logging(args.verbose, &config.logging)?;

    match args.command {
        Commands::Translate { store, id } => {
            info!("Translating record {} in {}", id, store.display());

            let store: Arc<dyn RecordStore> = Arc::new(JsonFileStore::new(&store));
            let service = build_service(&config, Arc::clone(&store));

            let mut record = store.load(&id).await?;
            if record.ensure_source_locale(&config.locales.default_source) {
                info!("Record {} has no source locale, using {}", id, record.source_locale);
            }

            match service.handle_translation(&mut record).await? {
                TranslationOutcome::Translated { filled, failed } => {
                    println!("Record {}: {} translation(s) added, {} failed", id, filled, failed);
                }
                TranslationOutcome::Unchanged { failed } => {
                    println!("Record {}: nothing to translate ({} failed)", id, failed);
                }
                TranslationOutcome::Skipped => {
                    println!("Record {}: automatic translation disabled", id);
                }
            }
        }
        Commands::Save { store, input, skip_translation } => {
            info!("Saving {} into {}", input.display(), store.display());

            let content = tokio::fs::read_to_string(&input).await?;
            let mut record: TranslatableRecord = serde_json::from_str(&content)?;
            record.ensure_source_locale(&config.locales.default_source);
            record.skip_translation = skip_translation;

            let store: Arc<dyn RecordStore> = Arc::new(JsonFileStore::new(&store));
            store.save(&mut record).await?;
            println!("Record {} saved", record.id);

            let service = Arc::new(build_service(&config, Arc::clone(&store)));
            let observer = SaveObserver::new(service, &config.queue);

            match observer.saved(&record).await {
                SaveDispatch::Skipped => println!("Translation skipped"),
                SaveDispatch::Queued(job_id) => println!("Translation queued as job {}", job_id),
                SaveDispatch::Inline(Some(outcome)) => println!("Translation finished: {:?}", outcome),
                SaveDispatch::Inline(None) => println!("Translation failed, see the translation log"),
            }

            if let Some(stats) = observer.shutdown().await {
                println!(
                    "Queue drained: {} processed, {} translated, {} unchanged, {} skipped, {} failed",
                    stats.processed, stats.translated, stats.unchanged, stats.skipped, stats.failed
                );
            }
        }
        Commands::Check => {
            let key_source = ChainedApiKey::from_config(&config.translator);
            let usage = check_deepl_availability(&config.translator, &key_source).await?;
            println!(
                "DeepL is available: {} of {} characters used",
                usage.character_count, usage.character_limit
            );
        }
        Commands::Slug { text } => {
            println!("{}", slugify(&text));
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { output, force } => {
                if output.exists() && !force {
                    return Err(AutoTranslateError::Configuration(format!(
                        "{} already exists, use --force to overwrite",
                        output.display()
                    ))
                    .into());
                }
                Config::default().save_to_file(&output)?;
                println!("Wrote default configuration to {}", output.display());
            }
            ConfigAction::Show => {
                let mut shown = config.clone();
                if shown.translator.api_key.is_some() {
                    shown.translator.api_key = Some("********".to_string());
                }
                print!("{}", toml::to_string_pretty(&shown)?);
            }
        },
    }

    Ok(())
}

fn build_service(config: &Config, store: Arc<dyn RecordStore>) -> TranslationService {
    let key_source = ChainedApiKey::from_config(&config.translator);
    TranslationService::new(config, Box::new(key_source), store)
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool, logging: &LoggingConfig) -> Result<()> {
    let log_dir = Path::new(&logging.dir);
    std::fs::create_dir_all(log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(log_dir, &logging.file);
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    subscriber.try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join(&logging.file).display());

    Ok(())
}
