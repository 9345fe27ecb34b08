//! Job board crawler CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jobboard_crawler::{
    error::{AppError, Result},
    models::{Config, Site},
    pipeline,
    storage::{LocalStorage, ResultStorage},
};

/// jobboard-crawler - Job board perks & tools crawler
#[derive(Parser, Debug)]
#[command(
    name = "jobboard-crawler",
    version,
    about = "Crawls city job boards and extracts perks and tools from every posting"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the configured sites
    Crawl {
        /// Only crawl these sites (repeatable, by name)
        #[arg(short, long = "site")]
        sites: Vec<String>,

        /// Export directory (default: output.dir from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop each site after this many listing pages
        #[arg(long)]
        max_pages: Option<u32>,

        /// First listing page to fetch
        #[arg(long)]
        start_page: Option<u32>,

        /// Skip job pages that fail to fetch instead of aborting the site
        #[arg(long)]
        skip_failed_jobs: bool,

        /// Do not write results to disk
        #[arg(long)]
        no_export: bool,
    },

    /// Validate the configuration
    Validate,

    /// List the sites that would be crawled
    Sites,
}

/// Initialize logging; RUST_LOG overrides `level`.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Keep only the sites named on the command line, in command-line order.
fn select_sites(all: Vec<Site>, names: &[String]) -> Result<Vec<Site>> {
    if names.is_empty() {
        return Ok(all);
    }
    names
        .iter()
        .map(|name| {
            all.iter()
                .find(|site| &site.name == name)
                .cloned()
                .ok_or_else(|| AppError::config(format!("Unknown site '{name}'")))
        })
        .collect()
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load_optional(&cli.config);
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        match &loaded {
            Ok(Some(config)) => config.logging.level.clone(),
            _ => "info".to_string(),
        }
    };
    init_logging(&level);

    let mut config = match loaded? {
        Some(config) => {
            log::info!("Loaded configuration from {}", cli.config.display());
            config
        }
        None => {
            log::warn!(
                "Config file {} not found. Using defaults.",
                cli.config.display()
            );
            Config::default()
        }
    };

    match cli.command {
        Command::Crawl {
            sites,
            output,
            max_pages,
            start_page,
            skip_failed_jobs,
            no_export,
        } => {
            if max_pages.is_some() {
                config.crawler.max_pages = max_pages;
            }
            if let Some(page) = start_page {
                config.crawler.start_page = page;
            }
            if skip_failed_jobs {
                config.crawler.skip_failed_jobs = true;
            }
            config.validate()?;

            let sites = select_sites(config.resolved_sites(), &sites)?;
            let output_dir = output.unwrap_or_else(|| PathBuf::from(&config.output.dir));
            let storage = LocalStorage::new(output_dir);
            let storage = (config.output.export && !no_export)
                .then_some(&storage as &dyn ResultStorage);

            let result = pipeline::run_crawler(&config, &sites, storage).await?;

            log::info!(
                "Crawl complete: {} jobs from {} site(s)",
                result.jobs.len(),
                result.sites.len()
            );
        }

        Command::Validate => {
            pipeline::run_validate(&config)?;
            log::info!("All validations passed!");
        }

        Command::Sites => {
            for site in config.resolved_sites() {
                println!("{:<12} {}", site.name, site.listing_page_url(0));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_sites_by_name() {
        let all = Config::default().resolved_sites();
        let picked = select_sites(all, &["nyc".to_string(), "boston".to_string()]).unwrap();
        let names: Vec<_> = picked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["nyc", "boston"]);
    }

    #[test]
    fn test_select_sites_unknown_name() {
        let all = Config::default().resolved_sites();
        assert!(select_sites(all, &["paris".to_string()]).is_err());
    }

    #[test]
    fn test_cli_parses_crawl_flags() {
        let cli = Cli::parse_from([
            "jobboard-crawler",
            "crawl",
            "--site",
            "austin",
            "--max-pages",
            "2",
            "--no-export",
        ]);
        match cli.command {
            Command::Crawl {
                sites,
                max_pages,
                no_export,
                ..
            } => {
                assert_eq!(sites, vec!["austin"]);
                assert_eq!(max_pages, Some(2));
                assert!(no_export);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
