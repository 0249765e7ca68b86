use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use fg_core::{EventStore, Logger, SamplerConfig};
use fg_sampler::{SampleReport, Sampler};
use fg_scrapers::{HttpFetcher, WikinewsDump};
use fg_storage::maintenance::{export_events, prune_short_articles, sample_events, SampleSize};

#[derive(Parser, Debug)]
#[command(author, version, about = "Builds a multi-source news event corpus from a Wikinews dump", long_about = None)]
pub struct Cli {
    /// Storage backend: sqlite or memory
    #[arg(long, global = true, default_value = "sqlite")]
    pub storage: String,
    /// SQLite database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
    /// TOML file with sampler settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build events from the pages of a Wikinews XML dump
    Sample {
        dump: PathBuf,
        /// Count usable pages and untrusted publishers without fetching anything
        #[arg(long)]
        preview: bool,
        #[arg(long)]
        min_sources: Option<usize>,
    },
    /// Drop short articles and the events they leave undersourced
    Prune,
    /// Write a random sample of events as JSON
    Export {
        /// Number of events, or `all`
        size: SampleSize,
        out: PathBuf,
    },
}

impl Cli {
    /// File settings over defaults, then flag overrides.
    pub fn sampler_config(&self) -> anyhow::Result<SamplerConfig> {
        let mut config = match &self.config {
            Some(path) => SamplerConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => SamplerConfig::default(),
        };
        if let Commands::Sample {
            min_sources: Some(min_sources),
            ..
        } = &self.command
        {
            config.min_sources = *min_sources;
        }
        Ok(config)
    }
}

pub async fn handle_command(
    command: Commands,
    store: Arc<dyn EventStore>,
    config: SamplerConfig,
    logger: &Logger,
) -> anyhow::Result<()> {
    match command {
        Commands::Sample { dump, preview, .. } => sample(&dump, preview, store, config, logger).await,
        Commands::Prune => {
            let logger = logger.scoped("[prune]");
            let report = prune_short_articles(store.as_ref(), config.min_body_chars, config.min_sources, &logger).await?;
            println!(
                "Removed {} articles, deleted {} events",
                report.articles_removed, report.events_deleted
            );
            Ok(())
        }
        Commands::Export { size, out } => {
            let events = sample_events(store.as_ref(), size, &mut rand::thread_rng()).await?;
            let written = export_events(&events, &out)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("Exported {} events to {}", written, out.display());
            Ok(())
        }
    }
}

async fn sample(
    dump: &Path,
    preview: bool,
    store: Arc<dyn EventStore>,
    config: SamplerConfig,
    logger: &Logger,
) -> anyhow::Result<()> {
    let pages = WikinewsDump::open(dump, config.foreign_language_marker.clone())
        .with_context(|| format!("Failed to open dump {}", dump.display()))?;
    let fetcher = Arc::new(HttpFetcher::new(logger.scoped("[fetch]"))?);

    let sampler = Sampler::new(store, fetcher, config, logger.scoped("[sample]")).preview(preview);
    let report = sampler.run(pages).await?;

    print_report(&report, preview);
    Ok(())
}

fn print_report(report: &SampleReport, preview: bool) {
    if preview {
        println!("{} events with {} usable citations", report.events, report.articles);
        for (domain, count) in report.top_untrusted_domains() {
            println!("{:>6}  {}", count, domain);
        }
        return;
    }

    println!("Sampled {} events and {} articles.", report.events, report.articles);
    println!(
        "Rejected: {} too few sources, {} duplicates, {} invalid dates",
        report.too_few, report.duplicates, report.invalid_dates
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_sample_command() {
        let cli = Cli::try_parse_from([
            "focusgroup",
            "--storage",
            "memory",
            "sample",
            "dump.xml",
            "--preview",
            "--min-sources",
            "4",
        ])
        .unwrap();

        assert_eq!(cli.storage, "memory");
        match &cli.command {
            Commands::Sample { dump, preview, min_sources } => {
                assert_eq!(dump, &PathBuf::from("dump.xml"));
                assert!(*preview);
                assert_eq!(*min_sources, Some(4));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.sampler_config().unwrap().min_sources, 4);
    }

    #[test]
    fn test_parse_export_size() {
        let cli = Cli::try_parse_from(["focusgroup", "export", "all", "out.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Export { size: SampleSize::All, .. }));

        let cli = Cli::try_parse_from(["focusgroup", "export", "25", "out.json", "--db", "x.db"]).unwrap();
        assert!(matches!(cli.command, Commands::Export { size: SampleSize::Count(25), .. }));
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));

        assert!(Cli::try_parse_from(["focusgroup", "export", "some", "out.json"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min_sources = 5\nmax_day_spread = 7").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from(["focusgroup", "--config", path.as_str(), "prune"]).unwrap();
        let config = cli.sampler_config().unwrap();
        assert_eq!(config.min_sources, 5);
        assert_eq!(config.max_day_spread, 7);

        let cli = Cli::try_parse_from([
            "focusgroup",
            "--config",
            path.as_str(),
            "sample",
            "dump.xml",
            "--min-sources",
            "2",
        ])
        .unwrap();
        let config = cli.sampler_config().unwrap();
        assert_eq!(config.min_sources, 2);
        assert_eq!(config.max_day_spread, 7);
    }
}
