// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

use post_translator::app_config::{self, Config, TranslatorKind};
use post_translator::server;
use post_translator::translation::TranslationPipeline;

/// CLI Wrapper for TranslatorKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslatorKind {
    Llm,
    Lookup,
}

impl From<CliTranslatorKind> for TranslatorKind {
    fn from(cli_kind: CliTranslatorKind) -> Self {
        match cli_kind {
            CliTranslatorKind::Llm => TranslatorKind::Llm,
            CliTranslatorKind::Lookup => TranslatorKind::Lookup,
        }
    }
}

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the translate and health endpoints (default command)
    Serve {
        /// Port to listen on, overrides config and PORT
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run the pipeline once and print the JSON result
    Translate {
        /// Text to classify and translate
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Generate shell completions for post-translator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// post-translator - make forum posts English
///
/// Detects the language of a text with a local Ollama model and translates
/// it to English when needed.
#[derive(Parser, Debug)]
#[command(name = "post-translator")]
#[command(version)]
#[command(about = "Language detection and English translation service")]
#[command(long_about = "post-translator asks a language model which language a text is written in \
and translates it to English when it is not English already.

EXAMPLES:
    post-translator                                  # Serve on the configured port
    post-translator serve -p 8080                    # Serve on port 8080
    post-translator translate 'Bonjour tout le monde'
    post-translator --translator lookup translate '这是一条中文消息'
    post-translator completions bash > post-translator.bash

ENVIRONMENT:
    OLLAMA_HOST     Backend address (default http://localhost:11434)
    OLLAMA_MODEL    Model name (default llama3.2:3b)
    PORT            Listen port (default 5000)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Translator implementation to use
    #[arg(long, value_enum, global = true)]
    translator: Option<CliTranslatorKind>,
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
        // The logger itself passes everything; the global max level filters
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
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
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "post-translator", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Translate { text }) => run_translate(&config, &text).await,
        Some(Commands::Serve { port }) => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            server::serve(&config).await?;
            Ok(())
        }
        None => {
            server::serve(&config).await?;
            Ok(())
        }
        Some(Commands::Completions { .. }) => Ok(()),
    }
}

/// Build the effective configuration: file, then environment, then flags
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_default(&cli.config_path)?;
    config.apply_env_overrides()?;

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    if let Some(kind) = &cli.translator {
        config.pipeline.translator = kind.clone().into();
    }

    log::set_max_level(config.log_level.to_level_filter());

    config.validate().context("Invalid configuration")?;
    debug!("Effective configuration: {:?}", config);

    Ok(config)
}

async fn run_translate(config: &Config, text: &str) -> Result<()> {
    info!("Using model {} at {} ({} translator)",
        config.backend.model_name, config.backend.backend_address, config.pipeline.translator);

    let pipeline = TranslationPipeline::from_config(config);
    let result = pipeline.process(text).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
