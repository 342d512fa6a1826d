//! Command-line interface definitions for Tag News Archive.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option has a default matching the public TASS tag feed and can also be
//! supplied through an environment variable.

use crate::pipeline::PipelineConfig;
use clap::Parser;
use clap::builder::RangedU64ValueParser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Command-line arguments for the Tag News Archive application.
///
/// # Examples
///
/// ```sh
/// # Archive the default tag into ./result.txt
/// tag_news_archive
///
/// # Another tag, bigger pages, custom output
/// tag_news_archive --tag ekonomika --limit 50 -o ./archive/economy.txt
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Result file (created or truncated)
    #[arg(short, long, env = "TAG_NEWS_OUTPUT", default_value = "./result.txt")]
    pub output: PathBuf,

    /// Feed endpoint accepting JSON POST page requests
    #[arg(
        short,
        long,
        env = "TAG_NEWS_ENDPOINT",
        default_value = "https://tass.ru/userApi/tagNews"
    )]
    pub endpoint: Url,

    /// Tag slug to archive
    #[arg(short, long, env = "TAG_NEWS_TAG", default_value = "krizis-na-ukraine")]
    pub tag: String,

    /// Items requested per page
    #[arg(
        short,
        long,
        env = "TAG_NEWS_LIMIT",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub limit: u32,

    /// Maximum number of fetched items waiting to be written
    #[arg(
        long,
        env = "TAG_NEWS_QUEUE_CAPACITY",
        default_value_t = 1000,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub queue_capacity: usize,

    /// Pause between page requests, in milliseconds
    #[arg(long, env = "TAG_NEWS_PAGE_DELAY_MS", default_value_t = 100)]
    pub page_delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(
        long,
        env = "TAG_NEWS_REQUEST_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_timeout_secs: u64,
}

impl Cli {
    /// Run settings taken from the parsed arguments.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            tag: self.tag.clone(),
            page_size: self.limit,
            queue_capacity: self.queue_capacity,
            page_delay: Duration::from_millis(self.page_delay_ms),
            output: self.output.clone(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
