//! Bilingual document construction and `.docx` output.

mod assembler;
mod docx;
mod model;

pub use assembler::{DOCUMENT_TITLE, DocumentAssembler, FARSI_STYLE, HEADING_STYLE, TITLE_STYLE};
pub use docx::{DocxWriter, document_xml, styles_xml};
pub use model::{
    Alignment, DocumentModel, FontSpec, FormattingOutcome, MAX_FONT_SIZE_PT, Paragraph,
    ParagraphRole, ParagraphStyle, Run, StyleSheet, TextDirection, contains_rtl_script,
    is_rtl_char,
};
