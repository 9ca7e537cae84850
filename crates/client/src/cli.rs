//! CLI parse: clap types for the comic client.

use std::time::Duration;

use clap::Parser;
use comicgen_pipeline::PollConfig;

/// Generate a three-panel comic about Yuri the cat
#[derive(Debug, Parser)]
#[command(name = "comicgen")]
#[command(about = "Generate a three-panel comic and wait for its images")]
pub struct Cli {
    /// Story idea, e.g. "Yuri discovers a mysterious portal"
    pub prompt: String,

    /// Base URL of the comic generator API
    #[arg(long, env = "COMICGEN_API_URL", default_value = "http://localhost:3000")]
    pub api_url: String,

    /// Delay between polling rounds, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub interval_ms: u64,

    /// Stop after this many polling rounds
    #[arg(long)]
    pub max_rounds: Option<u32>,

    /// Stop polling after this many seconds (0 disables the limit)
    #[arg(long, default_value_t = 600)]
    pub timeout_secs: u64,

    /// Print the final panel state as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(self.interval_ms),
            max_rounds: self.max_rounds,
            max_duration: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_poller_defaults() {
        let cli = Cli::try_parse_from(["comicgen", "Yuri goes sailing"]).unwrap();
        let config = cli.poll_config();
        let defaults = PollConfig::default();

        assert_eq!(cli.prompt, "Yuri goes sailing");
        assert_eq!(config.interval, defaults.interval);
        assert_eq!(config.max_rounds, defaults.max_rounds);
        assert_eq!(config.max_duration, defaults.max_duration);
    }

    #[test]
    fn zero_timeout_disables_the_duration_cap() {
        let cli = Cli::try_parse_from([
            "comicgen",
            "Yuri",
            "--timeout-secs",
            "0",
            "--max-rounds",
            "5",
            "--interval-ms",
            "250",
        ])
        .unwrap();
        let config = cli.poll_config();

        assert_eq!(config.max_duration, None);
        assert_eq!(config.max_rounds, Some(5));
        assert_eq!(config.interval, Duration::from_millis(250));
    }

    #[test]
    fn prompt_is_required() {
        assert!(Cli::try_parse_from(["comicgen"]).is_err());
    }
}
