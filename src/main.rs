use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use streamscribe::app::{StreamOptions, inspect_file, stream_file};
use streamscribe::cli::{Cli, Commands, ConfigAction};
use streamscribe::config::Config;
use streamscribe::defaults::TARGET_SAMPLE_RATE;
use streamscribe::output::format_seconds;
use streamscribe::results::ConsoleSink;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.quiet, cli.verbose);

    match cli.command {
        Commands::Send {
            file,
            url,
            frame_delay_ms,
            frame_seconds,
            timeout,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            apply_send_overrides(&mut config, url, frame_delay_ms, frame_seconds, timeout);
            config.validate()?;
            run_send(&file, &config, cli.quiet).await?;
        }
        Commands::Inspect { file } => {
            let config = load_config(cli.config.as_deref())?;
            config.validate()?;
            run_inspect(&file, &config)?;
        }
        Commands::Config { action } => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command_with_version(),
                "streamscribe",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Route `log` output to stderr. `RUST_LOG` still wins when set.
fn init_logging(quiet: bool, verbose: u8) {
    let level = if quiet {
        log::LevelFilter::Error
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn config_path(custom_path: Option<&Path>) -> Result<PathBuf> {
    match custom_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(Config::default_path()?),
    }
}

fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = match custom_path {
        // An explicit path must exist
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&Config::default_path()?)?,
    };

    Ok(config.with_env_overrides())
}

fn apply_send_overrides(
    config: &mut Config,
    url: Option<String>,
    frame_delay_ms: Option<u64>,
    frame_seconds: Option<f64>,
    timeout: Option<Duration>,
) {
    if let Some(url) = url {
        config.server.url = url;
    }
    if let Some(delay) = frame_delay_ms {
        config.stream.frame_delay_ms = delay;
    }
    if let Some(secs) = frame_seconds {
        config.stream.frame_samples = (secs * TARGET_SAMPLE_RATE as f64).round() as usize;
    }
    if let Some(timeout) = timeout {
        // Sub-second waits round up to a whole second
        config.stream.result_timeout_secs = timeout.as_secs_f64().ceil() as u64;
    }
}

async fn run_send(file: &Path, config: &Config, quiet: bool) -> Result<()> {
    let color = std::io::stdout().is_terminal();
    let options = StreamOptions::from_config(config);

    if !quiet {
        eprintln!("Streaming {} to {}...", file.display(), options.url);
    }

    let (report, _sink) = stream_file(file, &options, ConsoleSink::new(color)).await?;

    if !quiet {
        let session = &report.session;
        eprintln!(
            "Sent {}/{} frame(s), {} result(s) received.",
            session.upload.frames_sent, report.frames, session.receive.messages
        );
    }

    if let Some(err) = report.session.upload_error {
        bail!("Upload failed: {}", err);
    }
    if !report.session.upload.flushed {
        bail!("Upload ended before the flush marker was sent");
    }

    Ok(())
}

fn run_inspect(file: &Path, config: &Config) -> Result<()> {
    let report = inspect_file(file, config.stream.frame_samples)?;

    println!("{}", file.display().bold());
    println!("  Sample rate:   {} Hz", report.format.sample_rate);
    println!("  Channels:      {}", report.format.channel_count);
    println!("  Bit depth:     {}-bit PCM", report.format.bits_per_sample);
    println!(
        "  Duration:      {} ({} frames)",
        format_seconds(report.duration_secs),
        report.source_frames
    );
    println!(
        "  Normalized:    {} samples @ {} Hz mono",
        report.normalized_samples, TARGET_SAMPLE_RATE
    );
    println!(
        "  Upload:        {} frame(s) of up to {} samples + flush",
        report.frames, config.stream.frame_samples
    );

    Ok(())
}

fn handle_config_command(action: ConfigAction, custom_path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(custom_path)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            let path = config_path(custom_path)?;
            let status = if path.exists() {
                "exists".green().to_string()
            } else {
                "not found, using defaults".yellow().to_string()
            };
            println!("{} ({})", path.display(), status);
        }
    }

    Ok(())
}
