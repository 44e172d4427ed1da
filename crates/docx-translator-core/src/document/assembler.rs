//! Builds the bilingual document from translation pairs.

use chrono::{DateTime, Local};

use super::model::{
    Alignment, DocumentModel, FontSpec, Paragraph, ParagraphRole, ParagraphStyle, Run,
    TextDirection,
};
use crate::config::DocumentConfig;
use crate::service::TranslationPair;
use crate::util::group_thousands;

pub const DOCUMENT_TITLE: &str = "ترجمه از فرانسه به فارسی";
const DATE_LABEL: &str = "تاریخ ترجمه";
const SECTION_COUNT_LABEL: &str = "تعداد بخش‌ها";
const LENGTH_LABEL: &str = "طول متن اصلی";
const CHARACTERS: &str = "کاراکتر";
const SOURCE_FILE_LABEL: &str = "فایل اصلی";
const SECTION_LABEL: &str = "بخش";
const ORIGINAL_LABEL: &str = "متن اصلی (فرانسه):";
const TRANSLATION_LABEL: &str = "ترجمه (فارسی):";

const MAIN_SEPARATOR: &str = "═";
const MAIN_SEPARATOR_WIDTH: usize = 50;
const SECTION_SEPARATOR: &str = "─";
const SECTION_SEPARATOR_WIDTH: usize = 30;

/// Style id for translated paragraphs
pub const FARSI_STYLE: &str = "Farsi";
pub const TITLE_STYLE: &str = "Title";
pub const HEADING_STYLE: &str = "Heading2";

/// Lays out the document: title, metadata, separator, then one section per
/// translation pair.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    latin_font: FontSpec,
    rtl_font: FontSpec,
    created: DateTime<Local>,
    source_name: Option<String>,
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new(FontSpec::default_latin(), FontSpec::default_rtl())
    }
}

impl DocumentAssembler {
    pub fn new(latin_font: FontSpec, rtl_font: FontSpec) -> Self {
        Self {
            latin_font,
            rtl_font,
            created: Local::now(),
            source_name: None,
        }
    }

    pub fn from_config(config: &DocumentConfig) -> Self {
        Self::new(config.latin_font.clone(), config.rtl_font.clone())
    }

    /// Fix the generation timestamp
    #[must_use]
    pub const fn with_created(mut self, created: DateTime<Local>) -> Self {
        self.created = created;
        self
    }

    /// Name of the source file, listed in the metadata block
    #[must_use]
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Build the document model.
    ///
    /// `original_text` is only used for the character count in the metadata.
    pub fn assemble(
        &self,
        original_text: &str,
        pairs: &[TranslationPair],
        include_original: bool,
    ) -> DocumentModel {
        let mut doc = DocumentModel::new(DOCUMENT_TITLE, self.created);
        self.register_styles(&mut doc);

        // Title
        let title = Paragraph::new(ParagraphRole::Title, Alignment::Center)
            .with_style(TITLE_STYLE)
            .with_run(Run::new(DOCUMENT_TITLE, self.rtl_font.enlarged(4)).bold());
        self.push_rtl(&mut doc, title);

        // Metadata block
        let mut metadata = Paragraph::new(ParagraphRole::Metadata, Alignment::Right)
            .with_run(
                Run::new(
                    format!("{DATE_LABEL}: {}", self.created.format("%Y/%m/%d")),
                    self.rtl_font.clone(),
                )
                .bold(),
            )
            .with_run(Run::new(
                format!("\n{SECTION_COUNT_LABEL}: {}", pairs.len()),
                self.rtl_font.clone(),
            ))
            .with_run(Run::new(
                format!(
                    "\n{LENGTH_LABEL}: {} {CHARACTERS}",
                    group_thousands(original_text.chars().count())
                ),
                self.rtl_font.clone(),
            ));
        if let Some(name) = &self.source_name {
            metadata = metadata.with_run(Run::new(
                format!("\n{SOURCE_FILE_LABEL}: {name}"),
                self.rtl_font.clone(),
            ));
        }
        self.push_rtl(&mut doc, metadata);

        doc.push(self.separator(MAIN_SEPARATOR, MAIN_SEPARATOR_WIDTH));

        for (position, pair) in pairs.iter().enumerate() {
            self.push_section(&mut doc, pair, include_original);

            if position + 1 < pairs.len() {
                doc.push(self.separator(SECTION_SEPARATOR, SECTION_SEPARATOR_WIDTH));
            }
        }

        doc
    }

    fn push_section(&self, doc: &mut DocumentModel, pair: &TranslationPair, include_original: bool) {
        let header = Paragraph::new(ParagraphRole::SectionHeader(pair.chunk_index), Alignment::Right)
            .with_style(HEADING_STYLE)
            .with_run(
                Run::new(
                    format!("{SECTION_LABEL} {}", pair.chunk_index),
                    self.rtl_font.enlarged(1),
                )
                .bold(),
            );
        self.push_rtl(doc, header);

        if include_original {
            self.push_rtl(doc, self.label(ParagraphRole::OriginalLabel, ORIGINAL_LABEL));

            // French stays left-to-right
            doc.push(
                Paragraph::new(ParagraphRole::Original, Alignment::Left)
                    .with_run(Run::new(pair.original.clone(), self.latin_font.clone())),
            );

            doc.push(Paragraph::new(ParagraphRole::Spacer, Alignment::Left));
        }

        self.push_rtl(doc, self.label(ParagraphRole::TranslationLabel, TRANSLATION_LABEL));

        let translation = Paragraph::new(ParagraphRole::Translation, Alignment::Right)
            .with_style(FARSI_STYLE)
            .with_run(Run::new(pair.translated.clone(), self.rtl_font.clone()));
        self.push_rtl(doc, translation);
    }

    fn label(&self, role: ParagraphRole, text: &str) -> Paragraph {
        Paragraph::new(role, Alignment::Right)
            .with_run(Run::new(text, self.rtl_font.clone()).bold())
    }

    fn separator(&self, glyph: &str, width: usize) -> Paragraph {
        Paragraph::new(ParagraphRole::Separator, Alignment::Center)
            .with_run(Run::new(glyph.repeat(width), self.latin_font.clone()))
    }

    fn push_rtl(&self, doc: &mut DocumentModel, mut paragraph: Paragraph) {
        let outcome = paragraph.set_rtl();
        doc.note(outcome);
        doc.push(paragraph);
    }

    fn register_styles(&self, doc: &mut DocumentModel) {
        let styles = [
            ParagraphStyle {
                id: TITLE_STYLE.to_string(),
                name: "Title".to_string(),
                font: self.rtl_font.enlarged(4),
                alignment: Alignment::Center,
                direction: TextDirection::RightToLeft,
                bold: true,
            },
            ParagraphStyle {
                id: HEADING_STYLE.to_string(),
                name: "heading 2".to_string(),
                font: self.rtl_font.enlarged(1),
                alignment: Alignment::Right,
                direction: TextDirection::RightToLeft,
                bold: true,
            },
            ParagraphStyle {
                id: FARSI_STYLE.to_string(),
                name: "Farsi".to_string(),
                font: self.rtl_font.clone(),
                alignment: Alignment::Right,
                direction: TextDirection::RightToLeft,
                bold: false,
            },
        ];

        for style in styles {
            let outcome = doc.styles.add(style);
            doc.note(outcome);
        }
    }
}
