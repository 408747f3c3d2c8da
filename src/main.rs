// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use recaption::app_config::{self, Config};
use recaption::app_controller::Controller;
use recaption::file_utils::{FileManager, CAPTIONS_EXTENSION, TRANSCRIPT_EXTENSION};
use recaption::subtitle_processor::TimingPolicy;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Options shared by every processing command
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Force overwrite of existing output files
    #[arg(short, long, global = true)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Words per caption
    #[arg(long, global = true)]
    chunk_size: Option<usize>,

    /// Fail on malformed timing lines instead of treating them as zero
    #[arg(long, global = true)]
    strict_timing: bool,

    /// Render captions in upper case
    #[arg(long, global = true)]
    uppercase: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Align a transcript to a script and compile styled captions
    Run {
        /// Transcript file, or a directory of <name>.srt + <name>.txt pairs
        #[arg(value_name = "TRANSCRIPT")]
        transcript: PathBuf,

        /// Reference script (defaults to the transcript's sibling .txt)
        #[arg(value_name = "SCRIPT")]
        script: Option<PathBuf>,

        /// Output caption file (defaults to <transcript>.ass)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace transcript text with script sentences, keeping timings
    Align {
        #[arg(value_name = "TRANSCRIPT")]
        transcript: PathBuf,

        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Output transcript (defaults to <transcript>.aligned.srt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compile a transcript into styled captions without alignment
    Compile {
        #[arg(value_name = "TRANSCRIPT")]
        transcript: PathBuf,

        /// Output caption file (defaults to <transcript>.ass)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions for recaption
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// recaption - script-accurate, short-form styled captions
///
/// Re-times a machine transcript onto an authoritative script and emits
/// burned-in style captions in short, evenly timed word groups.
#[derive(Parser, Debug)]
#[command(name = "recaption")]
#[command(version)]
#[command(about = "Script-aligned styled caption generator")]
#[command(long_about = "recaption replaces transcript wording with a reference script and compiles short styled captions.

EXAMPLES:
    recaption run clip.srt clip.txt              # Align and compile to clip.ass
    recaption run clip.srt                       # Uses clip.txt next to the transcript
    recaption run --chunk-size 3 clip.srt        # Three words per caption
    recaption run /clips/                        # Every clip.srt + clip.txt pair in a folder
    recaption align clip.srt clip.txt            # Write clip.aligned.srt only
    recaption compile clip.srt -o out.ass        # Captions straight from the transcript
    recaption completions bash > recaption.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    common: CommonArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // Filtering happens through log::set_max_level so the level can change after init
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "recaption", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.common)?;
    let controller = Controller::with_config(config)?;
    let force = cli.common.force_overwrite;

    match cli.command {
        Commands::Run { transcript, script, output } => {
            if transcript.is_dir() {
                controller.run_folder(&transcript, force)?;
                return Ok(());
            }
            let script = script.unwrap_or_else(|| FileManager::script_path_for(&transcript));
            if !FileManager::file_exists(&script) {
                return Err(anyhow!("Reference script not found: {:?}", script));
            }
            let output = output.unwrap_or_else(|| default_output(&transcript, None, CAPTIONS_EXTENSION));
            controller.run(&transcript, Some(&script), &output, force)?;
        }
        Commands::Align { transcript, script, output } => {
            let output = output.unwrap_or_else(|| default_output(&transcript, Some("aligned"), TRANSCRIPT_EXTENSION));
            let report = controller.align_file(&transcript, &script, &output, force)?;
            info!(
                "{} lines replaced, {} kept, {} sentences unused",
                report.replaced_lines, report.retained_lines, report.unused_sentences
            );
        }
        Commands::Compile { transcript, output } => {
            let output = output.unwrap_or_else(|| default_output(&transcript, None, CAPTIONS_EXTENSION));
            controller.run(&transcript, None, &output, force)?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn default_output(input: &Path, suffix: Option<&str>, extension: &str) -> PathBuf {
    let output_dir = input.parent().unwrap_or(Path::new("."));
    FileManager::generate_output_path(input, output_dir, suffix, extension)
}

/// Load or create the configuration, then apply command line overrides
fn load_config(options: &CommonArgs) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level((&level).into());
    }

    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(chunk_size) = options.chunk_size {
        config.captions.chunk_size = chunk_size;
    }

    if options.strict_timing {
        config.timing_policy = TimingPolicy::Strict;
    }

    if options.uppercase {
        config.captions.uppercase = true;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level((&config.log_level).into());
    }

    config.validate()
        .context("Configuration validation failed")?;

    Ok(config)
}
