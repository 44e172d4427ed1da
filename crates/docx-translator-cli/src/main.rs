//! DOCX Translator CLI - Translate French text files into right-to-left Farsi Word documents.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use docx_translator_core::{
    AppConfig, Backend, PhraseDictionary, Pipeline, TranslationService, create_translator,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendOption {
    Google,
    Openai,
    Offline,
}

impl From<BackendOption> for Backend {
    fn from(opt: BackendOption) -> Self {
        match opt {
            BackendOption::Google => Self::Google,
            BackendOption::Openai => Self::OpenAi,
            BackendOption::Offline => Self::Offline,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "docx-translate")]
#[command(author, version, about = "Translate French text into a Farsi Word document", long_about = None)]
struct Args {
    /// Input text file (UTF-8)
    #[arg(required = true)]
    input: PathBuf,

    /// Output directory (default: translations)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Maximum characters per translated chunk
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Only include the Farsi translation, not the French original
    #[arg(long)]
    no_original: bool,

    /// Delay before each provider request, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Translation backend
    #[arg(long, value_enum)]
    backend: Option<BackendOption>,

    /// Translation API base URL
    #[arg(long, env = "TRANSLATOR_API_BASE")]
    api_base: Option<String>,

    /// Translation API key
    #[arg(long, env = "TRANSLATOR_API_KEY")]
    api_key: Option<String>,

    /// Model name for OpenAI-compatible API
    #[arg(long, env = "TRANSLATOR_MODEL")]
    model: Option<String>,

    /// Phrase dictionary file (TOML)
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Apply command line overrides on top of the loaded configuration
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(backend) = self.backend {
            config.translator.backend = backend.into();
        }
        if let Some(api_base) = &self.api_base {
            config.translator.api_base = Some(api_base.clone());
        }
        if let Some(api_key) = &self.api_key {
            config.translator.api_key = Some(api_key.clone());
        }
        if let Some(model) = &self.model {
            config.translator.model.clone_from(model);
        }
        if let Some(chunk_size) = self.chunk_size {
            config.translation.max_chunk_chars = chunk_size;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.translation.request_delay_ms = delay_ms;
        }
        if let Some(dictionary) = &self.dictionary {
            config.translation.dictionary_path = Some(dictionary.clone());
        }
        if let Some(output_dir) = &self.output_dir {
            config.document.output_dir.clone_from(output_dir);
        }
        if self.no_original {
            config.document.include_original = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // Load or create config
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };

    args.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;

    // Load input text
    info!("Reading input: {}", args.input.display());
    let text = std::fs::read_to_string(&args.input)
        .context(format!("Failed to read input: {}", args.input.display()))?;

    let dictionary = match &config.translation.dictionary_path {
        Some(path) => PhraseDictionary::from_toml_file(path)
            .context(format!("Failed to load dictionary: {}", path.display()))?,
        None => PhraseDictionary::french_farsi(),
    };
    info!("Dictionary has {} phrases", dictionary.len());

    // Create translator
    let translator =
        create_translator(&config.translator).context("Failed to initialize translator")?;
    if !translator.is_available() {
        info!(
            "{} is not available, translating with the dictionary only",
            translator.name()
        );
    }

    let service = TranslationService::from_config(&config, translator, Arc::new(dictionary));
    let mut pipeline = Pipeline::from_config(&config, service);
    if let Some(name) = args.input.file_name().and_then(|s| s.to_str()) {
        pipeline = pipeline.with_source_name(name);
    }

    // Setup progress bar; the length is known once the text is chunked
    let pb = ProgressBar::new(0);
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("#>-"),
    );

    let bar = pb.clone();
    #[allow(clippy::cast_possible_truncation)]
    let report = move |done: usize, total: usize| {
        bar.set_length(total as u64);
        bar.set_position(done as u64);
    };

    let output = pipeline
        .run(&text, Some(&report))
        .await
        .context("Failed to write translated document")?;

    pb.finish_with_message("Translation complete");

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        println!("Translated document saved to: {}", output.output_path.display());
        println!(
            "Chunks: {} ({} translated with the dictionary)",
            output.pairs.len(),
            output.fallback_count()
        );
    }

    Ok(())
}
