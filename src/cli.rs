// ABOUTME: Command-line interface definitions using clap
// ABOUTME: Defines all subcommands and global flags

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "marmalade")]
#[command(about = "Mirror a markdown directory tree into a Notion page hierarchy", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// API token (overrides env/.env)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Root page id to sync under (overrides env/.env)
    #[arg(long, global = true)]
    pub root_page: Option<String>,

    /// API base URL
    #[arg(long, global = true, default_value = "https://api.notion.com")]
    pub api_base: String,

    /// Disable throttling (not recommended)
    #[arg(long, global = true)]
    pub no_throttle: bool,

    /// Throttle range in ms (min:max)
    #[arg(long, global = true, value_parser = parse_throttle_range)]
    pub throttle_ms: Option<(u64, u64)>,
}

fn parse_throttle_range(s: &str) -> Result<(u64, u64), String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err("Expected format: min:max".into());
    }

    let min = parts[0].parse().map_err(|_| "Invalid min value")?;
    let max = parts[1].parse().map_err(|_| "Invalid max value")?;

    if min > max {
        return Err("min must be <= max".into());
    }

    Ok((min, max))
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Sync a directory tree into the root page (default)
    Sync {
        /// Directory to sync (defaults to the current directory)
        dir: Option<PathBuf>,
    },

    /// Delete all child pages under the root page
    Clean {
        /// Skip the safety delay before deleting
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Sync { dir: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_throttle_range_valid() {
        let result = parse_throttle_range("100:300").unwrap();
        assert_eq!(result, (100, 300));
    }

    #[test]
    fn test_parse_throttle_range_invalid() {
        assert!(parse_throttle_range("300:100").is_err());
        assert!(parse_throttle_range("abc:def").is_err());
        assert!(parse_throttle_range("100").is_err());
    }

    #[test]
    fn test_default_command_is_sync() {
        let cli = Cli::parse_from(["marmalade"]);
        assert!(matches!(cli.command(), Commands::Sync { dir: None }));
    }

    #[test]
    fn test_clean_subcommand_parses() {
        let cli = Cli::parse_from(["marmalade", "clean", "--yes"]);
        assert!(matches!(cli.command(), Commands::Clean { yes: true }));
    }
}
