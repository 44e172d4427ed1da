//! In-memory document: paragraphs, runs, fonts and styles.
//!
//! The model is format-neutral; [`super::docx`] turns it into a package.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Largest font size Word accepts, in points
pub const MAX_FONT_SIZE_PT: u32 = 1638;

/// Font family and size for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    /// Size in whole points
    pub size_pt: u32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size_pt: u32) -> Self {
        Self {
            family: family.into(),
            size_pt,
        }
    }

    /// Font for French source text
    pub fn default_latin() -> Self {
        Self::new("Times New Roman", 11)
    }

    /// Font for Farsi text, shaped for Arabic-script glyphs
    pub fn default_rtl() -> Self {
        Self::new("B Nazanin", 12)
    }

    /// Same family, `delta` points larger
    #[must_use]
    pub fn enlarged(&self, delta: u32) -> Self {
        Self::new(self.family.clone(), self.size_pt.saturating_add(delta))
    }

    /// Size in half-points, the unit WordprocessingML uses
    pub const fn half_points(&self) -> u32 {
        self.size_pt.saturating_mul(2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// What a paragraph is for. Serialization maps roles to styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphRole {
    Title,
    Metadata,
    Separator,
    /// Heading for the section of chunk `n`
    SectionHeader(usize),
    OriginalLabel,
    Original,
    TranslationLabel,
    Translation,
    Spacer,
}

/// Result of a best-effort formatting step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattingOutcome {
    Applied,
    Skipped(String),
}

impl FormattingOutcome {
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// A run of uniformly formatted text. `\n` inside the text is a line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub font: FontSpec,
    pub bold: bool,
    pub italic: bool,
}

impl Run {
    pub fn new(text: impl Into<String>, font: FontSpec) -> Self {
        Self {
            text: text.into(),
            font,
            bold: false,
            italic: false,
        }
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub role: ParagraphRole,
    pub alignment: Alignment,
    direction: TextDirection,
    /// Paragraph style id, if any
    pub style: Option<String>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub const fn new(role: ParagraphRole, alignment: Alignment) -> Self {
        Self {
            role,
            alignment,
            direction: TextDirection::LeftToRight,
            style: None,
            runs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Mark the paragraph right-to-left.
    ///
    /// Skipped when the flag is already present, so the attribute is never
    /// emitted twice.
    pub fn set_rtl(&mut self) -> FormattingOutcome {
        if self.direction == TextDirection::RightToLeft {
            return FormattingOutcome::Skipped("paragraph is already right-to-left".to_string());
        }
        self.direction = TextDirection::RightToLeft;
        FormattingOutcome::Applied
    }

    pub const fn direction(&self) -> TextDirection {
        self.direction
    }

    pub fn is_rtl(&self) -> bool {
        self.direction == TextDirection::RightToLeft
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Whether any run contains right-to-left script
    pub fn has_rtl_script(&self) -> bool {
        self.runs.iter().any(|r| contains_rtl_script(&r.text))
    }
}

/// True for characters of the Arabic script blocks used by Farsi.
pub const fn is_rtl_char(c: char) -> bool {
    matches!(
        c,
        '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{08A0}'..='\u{08FF}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}'
    )
}

pub fn contains_rtl_script(text: &str) -> bool {
    text.chars().any(is_rtl_char)
}

/// A named paragraph style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphStyle {
    pub id: String,
    pub name: String,
    pub font: FontSpec,
    pub alignment: Alignment,
    pub direction: TextDirection,
    pub bold: bool,
}

/// Styles registered on a document, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    styles: Vec<ParagraphStyle>,
}

impl StyleSheet {
    /// Register a style; a duplicate id is skipped, not replaced.
    pub fn add(&mut self, style: ParagraphStyle) -> FormattingOutcome {
        if self.get(&style.id).is_some() {
            return FormattingOutcome::Skipped(format!("style '{}' already exists", style.id));
        }
        self.styles.push(style);
        FormattingOutcome::Applied
    }

    pub fn get(&self, id: &str) -> Option<&ParagraphStyle> {
        self.styles.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParagraphStyle> {
        self.styles.iter()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// The assembled document, ready for serialization.
#[derive(Debug, Clone)]
pub struct DocumentModel {
    pub title: String,
    pub created: DateTime<Local>,
    pub styles: StyleSheet,
    pub paragraphs: Vec<Paragraph>,
    /// Formatting steps that were skipped while building
    pub formatting_warnings: Vec<String>,
}

impl DocumentModel {
    pub fn new(title: impl Into<String>, created: DateTime<Local>) -> Self {
        Self {
            title: title.into(),
            created,
            styles: StyleSheet::default(),
            paragraphs: Vec::new(),
            formatting_warnings: Vec::new(),
        }
    }

    pub fn push(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Record a skipped formatting step; applied steps are ignored
    pub fn note(&mut self, outcome: FormattingOutcome) {
        if let FormattingOutcome::Skipped(reason) = outcome {
            tracing::warn!("Formatting skipped: {}", reason);
            self.formatting_warnings.push(reason);
        }
    }

    /// Paragraphs containing right-to-left script without the RTL flag
    pub fn rtl_violations(&self) -> impl Iterator<Item = &Paragraph> {
        self.paragraphs
            .iter()
            .filter(|p| p.has_rtl_script() && !p.is_rtl())
    }

    pub fn paragraphs_with_role(&self, role: ParagraphRole) -> impl Iterator<Item = &Paragraph> {
        self.paragraphs.iter().filter(move |p| p.role == role)
    }
}
