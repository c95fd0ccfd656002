// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use srtwai::app_config::{self, Config, PromptStyle};
use srtwai::app_controller::{self, RunOutcome, REJECTION_MESSAGE};

/// Framerate assumed when none is given; the value is not used for anything
const DEFAULT_FRAMERATE: f32 = 24.0;

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

/// CLI Wrapper for PromptStyle to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliPromptStyle {
    /// Prefix each chunk with a translate instruction
    Instruct,
    /// Send the chunk text unchanged
    Raw,
}

impl From<CliPromptStyle> for PromptStyle {
    fn from(cli_style: CliPromptStyle) -> Self {
        match cli_style {
            CliPromptStyle::Instruct => PromptStyle::Instruct,
            CliPromptStyle::Raw => PromptStyle::Raw,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate an SRT file (default command)
    Translate(TranslateArgs),

    /// Check that a file looks like SRT and show how it would be chunked
    Check(CheckArgs),

    /// Generate shell completions for srtwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every command that reads a config file
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Maximum characters per chunk sent to the service
    #[arg(long)]
    max_chunk_chars: Option<usize>,
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Path to the source SRT file
    #[arg(value_name = "SRT_FILE")]
    srt_file: PathBuf,

    /// Language to translate into (e.g. 'es' for Spanish)
    #[arg(value_name = "TARGET_LANGUAGE")]
    target_language: String,

    /// Where to write the translated file
    #[arg(value_name = "OUTPUT_FILE")]
    output_file: PathBuf,

    #[command(flatten)]
    service: ServiceArgs,

    #[command(flatten)]
    common: CommonArgs,
}

/// Completion service overrides
#[derive(Args, Debug, Clone)]
struct ServiceArgs {
    /// Video framerate (accepted for compatibility, not used)
    #[arg(long, default_value_t = DEFAULT_FRAMERATE)]
    framerate: f32,

    /// API key for the completion service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Base URL of the completion service
    #[arg(long)]
    endpoint: Option<String>,

    /// How chunks are turned into prompts
    #[arg(long, value_enum)]
    prompt_style: Option<CliPromptStyle>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Path to the SRT file to check
    #[arg(value_name = "SRT_FILE")]
    srt_file: PathBuf,

    /// Also send a one-token request to the completion service
    #[arg(long)]
    connection: bool,

    #[command(flatten)]
    service: ServiceArgs,

    #[command(flatten)]
    common: CommonArgs,
}

/// srtwai - SubRip translation with AI completions
///
/// Splits an SRT file into line-aligned chunks and translates each chunk
/// through a text-completion API.
#[derive(Parser, Debug)]
#[command(name = "srtwai")]
#[command(version)]
#[command(about = "Translate SRT subtitle files with a completion API")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "srtwai checks that a file looks like SRT, splits it into chunks of whole lines
and translates each chunk through an OpenAI-compatible completions endpoint.

EXAMPLES:
    srtwai movie.srt es movie.es.srt                 # Translate to Spanish
    srtwai movie.srt fr out.srt --max-chunk-chars 2000
    srtwai movie.srt de out.srt --prompt-style raw   # Send chunks without instruction
    srtwai check movie.srt                           # Validate and show chunking
    srtwai check movie.srt --connection              # ...and test the API key
    srtwai completions bash > srtwai.bash            # Generate bash completions

CONFIGURATION:
    Settings are read from conf.json when it exists (see --config-path).
    The API key comes from --api-key, OPENAI_API_KEY (also read from a .env
    file) or translation.api_key.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the source SRT file
    #[arg(value_name = "SRT_FILE")]
    srt_file: Option<PathBuf>,

    /// Language to translate into (e.g. 'es' for Spanish)
    #[arg(value_name = "TARGET_LANGUAGE")]
    target_language: Option<String>,

    /// Where to write the translated file
    #[arg(value_name = "OUTPUT_FILE")]
    output_file: Option<PathBuf>,

    #[command(flatten)]
    service: ServiceArgs,

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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and label for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
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
            let (colour, label) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                colour, now, label, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through log::set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    // Variables already in the environment win over .env entries
    dotenvy::dotenv().ok();

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "srtwai", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        Some(Commands::Check(args)) => run_check(args).await,
        None => {
            // Default behavior - top-level args mean "translate"
            let (srt_file, target_language, output_file) = match (cli.srt_file, cli.target_language, cli.output_file) {
                (Some(srt_file), Some(target_language), Some(output_file)) => (srt_file, target_language, output_file),
                _ => {
                    return Err(anyhow!(
                        "SRT_FILE, TARGET_LANGUAGE and OUTPUT_FILE are required when no subcommand is specified"
                    ));
                }
            };

            run_translate(TranslateArgs {
                srt_file,
                target_language,
                output_file,
                service: cli.service,
                common: cli.common,
            }).await
        }
    }
}

// @loads: Config file, then applies command line overrides
fn load_config(common: &CommonArgs) -> Result<Config> {
    let mut config = Config::load_or_default(&common.config_path)
        .context(format!("Failed to load config file: {}", common.config_path))?;

    if let Some(log_level) = &common.log_level {
        config.log_level = log_level.clone().into();
    }

    if let Some(max_chunk_chars) = common.max_chunk_chars {
        config.subtitle.max_chunk_chars = max_chunk_chars;
    }

    log::set_max_level(config.log_level.to_level_filter());
    Ok(config)
}

fn apply_service_overrides(config: &mut Config, service: &ServiceArgs) {
    if let Some(api_key) = &service.api_key {
        config.translation.api_key = api_key.clone();
    }

    if let Some(model) = &service.model {
        config.translation.model = model.clone();
    }

    if let Some(endpoint) = &service.endpoint {
        config.translation.endpoint = endpoint.clone();
    }

    if let Some(prompt_style) = &service.prompt_style {
        config.translation.prompt_style = prompt_style.clone().into();
    }
}

async fn run_translate(args: TranslateArgs) -> Result<()> {
    let mut config = load_config(&args.common)?;
    apply_service_overrides(&mut config, &args.service);

    if (args.service.framerate - DEFAULT_FRAMERATE).abs() > f32::EPSILON {
        warn!(
            "--framerate {} has no effect: subtitle timing is never adjusted",
            args.service.framerate
        );
    }

    let outcome = app_controller::translate_file(
        config,
        &args.srt_file,
        &args.target_language,
        &args.output_file,
    ).await?;

    match outcome {
        RunOutcome::Rejected => {
            println!("{}", REJECTION_MESSAGE);
        }
        RunOutcome::Completed { chunks, output_path } => {
            info!("Success: {:?} ({} chunk(s))", output_path, chunks);
        }
    }

    Ok(())
}

async fn run_check(args: CheckArgs) -> Result<()> {
    let mut config = load_config(&args.common)?;

    let report = app_controller::check_file(&args.srt_file, config.subtitle.max_chunk_chars)?;
    println!(
        "{:?}: valid SRT, {} characters, {} chunk(s) of at most {} characters (largest: {})",
        args.srt_file,
        report.characters,
        report.chunks,
        config.subtitle.max_chunk_chars,
        report.largest_chunk
    );

    if args.connection {
        apply_service_overrides(&mut config, &args.service);
        app_controller::check_connection(&config).await
            .context("Connection test failed")?;
        println!("Connection OK: {} ({})", config.translation.endpoint, config.translation.model);
    }

    Ok(())
}
