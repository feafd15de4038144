//! Command-line interface for streamscribe
//!
//! Provides argument parsing using clap derive macros.

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Stream recorded audio to a real-time transcription server
#[derive(Parser, Debug)]
#[command(
    name = "streamscribe",
    version,
    about = "Stream recorded audio to a real-time transcription server"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress status output (results are still printed)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The clap command with `--version` showing the build's git hash.
    pub fn command_with_version() -> clap::Command {
        Self::command().version(crate::version_string())
    }

    /// Parse the process arguments, exiting on errors, `--help` and `--version`.
    pub fn parse_args() -> Self {
        let matches = Self::command_with_version().get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }
}

/// Parse a duration string.
///
/// Supports any duration format accepted by `humantime` (`30s`, `2m`,
/// `1m30s`); a bare number is seconds.
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Parse a frame length in seconds; must be positive.
fn parse_frame_seconds(s: &str) -> Result<f64, String> {
    let secs: f64 = s.trim().parse().map_err(|e| format!("{}", e))?;
    if secs.is_finite() && secs > 0.0 {
        Ok(secs)
    } else {
        Err("frame length must be a positive number of seconds".to_string())
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream a WAV file to the server and print results
    Send {
        /// WAV file to stream (16- or 32-bit integer PCM)
        file: PathBuf,

        /// Server URL (e.g., ws://127.0.0.1:9000)
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        /// Delay after each frame in milliseconds (0 = as fast as possible)
        #[arg(long, value_name = "MS")]
        frame_delay_ms: Option<u64>,

        /// Frame length in seconds of 16 kHz audio (default: 1)
        #[arg(long, value_name = "SECONDS", value_parser = parse_frame_seconds)]
        frame_seconds: Option<f64>,

        /// How long to wait for results after the upload. Examples: 30s, 2m
        #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
        timeout: Option<Duration>,
    },

    /// Decode a WAV file and show what would be streamed
    Inspect {
        /// WAV file to inspect
        file: PathBuf,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send_defaults() {
        let cli = Cli::try_parse_from(["streamscribe", "send", "audio.wav"]).unwrap();
        match cli.command {
            Commands::Send {
                file,
                url,
                frame_delay_ms,
                frame_seconds,
                timeout,
            } => {
                assert_eq!(file, PathBuf::from("audio.wav"));
                assert!(url.is_none());
                assert!(frame_delay_ms.is_none());
                assert!(frame_seconds.is_none());
                assert!(timeout.is_none());
            }
            _ => panic!("Expected Send command"),
        }
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_send_with_options() {
        let cli = Cli::try_parse_from([
            "streamscribe",
            "send",
            "audio.wav",
            "--url",
            "ws://10.0.0.2:9000",
            "--frame-delay-ms",
            "0",
            "--frame-seconds",
            "0.5",
            "--timeout",
            "1m30s",
        ])
        .unwrap();

        match cli.command {
            Commands::Send {
                url,
                frame_delay_ms,
                frame_seconds,
                timeout,
                ..
            } => {
                assert_eq!(url.as_deref(), Some("ws://10.0.0.2:9000"));
                assert_eq!(frame_delay_ms, Some(0));
                assert_eq!(frame_seconds, Some(0.5));
                assert_eq!(timeout, Some(Duration::from_secs(90)));
            }
            _ => panic!("Expected Send command"),
        }
    }

    #[test]
    fn test_timeout_bare_number_is_seconds() {
        let cli =
            Cli::try_parse_from(["streamscribe", "send", "a.wav", "--timeout", "45"]).unwrap();
        match cli.command {
            Commands::Send { timeout, .. } => assert_eq!(timeout, Some(Duration::from_secs(45))),
            _ => panic!("Expected Send command"),
        }
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let result = Cli::try_parse_from(["streamscribe", "send", "a.wav", "--timeout", "soon"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_zero_frame_seconds_is_rejected() {
        let result = Cli::try_parse_from(["streamscribe", "send", "a.wav", "--frame-seconds", "0"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_send_requires_file() {
        let result = Cli::try_parse_from(["streamscribe", "send"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_parse_verbose_levels() {
        let cli = Cli::try_parse_from(["streamscribe", "-vv", "inspect", "a.wav"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli =
            Cli::try_parse_from(["streamscribe", "inspect", "a.wav", "-v", "-v", "-v"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_global_options_after_command() {
        let cli = Cli::try_parse_from([
            "streamscribe",
            "inspect",
            "a.wav",
            "--config",
            "/tmp/config.toml",
            "-q",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.toml")));
        assert!(cli.quiet);
    }

    #[test]
    fn test_parse_config_actions() {
        let cli = Cli::try_parse_from(["streamscribe", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Show
            }
        ));

        let cli = Cli::try_parse_from(["streamscribe", "config", "path"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Path
            }
        ));
    }

    #[test]
    fn test_parse_completions() {
        let cli = Cli::try_parse_from(["streamscribe", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions { shell: Shell::Bash }
        ));
    }

    #[test]
    fn test_missing_subcommand_shows_help() {
        let result = Cli::try_parse_from(["streamscribe"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["streamscribe", "--version"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::DisplayVersion
        );
    }

    #[test]
    fn test_version_includes_build_hash() {
        let cmd = Cli::command_with_version();
        let expected = crate::version_string();
        assert_eq!(cmd.get_version(), Some(expected.as_str()));

        let err = Cli::command_with_version()
            .try_get_matches_from(["streamscribe", "--version"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        assert!(err.to_string().contains(&expected));
    }

    #[test]
    fn test_versioned_command_parses_subcommands() {
        let matches = Cli::command_with_version()
            .try_get_matches_from(["streamscribe", "inspect", "a.wav"])
            .unwrap();
        let cli = Cli::from_arg_matches(&matches).unwrap();
        assert!(matches!(cli.command, Commands::Inspect { .. }));
    }
}
