//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build, check and query the Zyflo docs
#[derive(Parser, Debug, Clone)]
#[command(name = "zyflo-docs", version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Site config file (default: zyflo.yaml, built-in defaults when absent)
    #[arg(short = 'C', long, default_value = zyflo_site::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Render every routed page to HTML and JSON
    Build {
        /// Output directory
        #[arg(short, long, default_value = "out")]
        out: PathBuf,

        /// Worker threads (default: one per core)
        #[arg(short = 'j', long)]
        jobs: Option<usize>,
    },

    /// Fail if any routed page is missing or does not compile
    Check,

    /// Print the URL segments of every routed page
    Paths {
        /// Print JSON instead of one path per line
        #[arg(long)]
        json: bool,
    },

    /// Print the outline of a page
    Toc {
        /// URL segments, e.g. `components navbar`
        segments: Vec<String>,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Find routed pages by title
    Search {
        /// Case-insensitive title substring
        query: String,
    },
}

impl Cli {
    /// Whether `--config` was left at its default.
    pub fn uses_default_config(&self) -> bool {
        self.config.as_os_str() == zyflo_site::DEFAULT_CONFIG_FILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_build() {
        let cli = Cli::try_parse_from(["zyflo-docs", "-vv", "build", "--out", "dist", "-j", "4"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.uses_default_config());
        assert_eq!(
            cli.command,
            Commands::Build {
                out: PathBuf::from("dist"),
                jobs: Some(4),
            }
        );
    }

    #[test]
    fn parses_toc_segments() {
        let cli = Cli::try_parse_from([
            "zyflo-docs",
            "-C",
            "site.yaml",
            "toc",
            "components",
            "navbar",
        ])
        .unwrap();
        assert!(!cli.uses_default_config());
        assert_eq!(
            cli.command,
            Commands::Toc {
                segments: vec!["components".into(), "navbar".into()],
                json: false,
            }
        );
    }

    #[test]
    fn requires_a_command() {
        assert!(Cli::try_parse_from(["zyflo-docs"]).is_err());
    }
}
