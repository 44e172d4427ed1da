//! End-to-end run: chunk, translate, assemble, persist.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::document::{DocumentAssembler, DocxWriter};
use crate::error::{Error, Result};
use crate::service::{TranslationPair, TranslationService};
use crate::text;

const OUTPUT_PREFIX: &str = "french_farsi_translation";

/// Progress callback invoked with `(done, total)` after each chunk
pub type ProgressFn<'a> = dyn Fn(usize, usize) + Send + Sync + 'a;

/// Output file name for a run started at `at`
pub fn output_file_name(at: DateTime<Local>) -> String {
    format!("{OUTPUT_PREFIX}_{}.docx", at.format("%Y%m%d_%H%M%S"))
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub output_path: PathBuf,
    pub pairs: Vec<TranslationPair>,
}

impl PipelineOutput {
    /// Number of chunks translated by the dictionary instead of the provider
    pub fn fallback_count(&self) -> usize {
        self.pairs.iter().filter(|p| p.used_fallback()).count()
    }
}

pub struct Pipeline {
    service: TranslationService,
    assembler: DocumentAssembler,
    max_chunk_chars: usize,
    include_original: bool,
    output_dir: PathBuf,
}

impl Pipeline {
    pub fn new(
        service: TranslationService,
        assembler: DocumentAssembler,
        max_chunk_chars: usize,
        include_original: bool,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            service,
            assembler,
            max_chunk_chars,
            include_original,
            output_dir: output_dir.into(),
        }
    }

    /// Build a pipeline from configuration around an existing service
    pub fn from_config(config: &AppConfig, service: TranslationService) -> Self {
        Self::new(
            service,
            DocumentAssembler::from_config(&config.document),
            config.translation.max_chunk_chars,
            config.document.include_original,
            config.document.output_dir.clone(),
        )
    }

    /// Name the source file in the document metadata
    #[must_use]
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.assembler = self.assembler.with_source_name(name);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub const fn service(&self) -> &TranslationService {
        &self.service
    }

    /// Translate `input` and write the document.
    ///
    /// Translation failures never abort the run; only writing the output can
    /// fail.
    pub async fn run(&self, input: &str, progress: Option<&ProgressFn<'_>>) -> Result<PipelineOutput> {
        // One timestamp for both the metadata date and the file name
        let started = Local::now();

        let chunks = text::split(input, self.max_chunk_chars);
        if chunks.is_empty() {
            warn!("Input contains no sentences, the document will have no sections");
        }
        info!(
            "Split {} characters into {} chunks (max {} chars) using {}",
            input.chars().count(),
            chunks.len(),
            self.max_chunk_chars,
            self.service.translator_name()
        );

        let pairs = self
            .service
            .translate_all_with_progress(&chunks, progress)
            .await;

        let doc = self
            .assembler
            .clone()
            .with_created(started)
            .assemble(input, &pairs, self.include_original);
        let violations = doc.rtl_violations().count();
        if violations > 0 {
            warn!("{} paragraphs contain Farsi text without the RTL flag", violations);
        }

        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            Error::DocumentWrite(format!(
                "Failed to create output directory {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;
        let output_path = self.output_dir.join(output_file_name(started));
        DocxWriter::save(&doc, &output_path)?;

        info!("Wrote {}", output_path.display());

        Ok(PipelineOutput { output_path, pairs })
    }
}
