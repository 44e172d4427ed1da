//! WordprocessingML (`.docx`) serialization.
//!
//! # Package layout
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! docProps/core.xml
//! word/document.xml
//! word/styles.xml
//! word/_rels/document.xml.rels
//! ```
//!
//! # Right-to-left text
//!
//! Word renders a paragraph left-to-right unless its `w:pPr` carries
//! `w:bidi`, and shapes runs as complex script only with `w:rtl`. Both are
//! written for every paragraph the model marks right-to-left. Fonts are set
//! on `w:ascii`, `w:hAnsi` and `w:cs` so Farsi glyphs use the chosen family.

use std::io::{Cursor, Write};
use std::path::Path;

use chrono::Utc;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use zip::ZipWriter;
use zip::write::FileOptions;

use super::model::{Alignment, DocumentModel, Paragraph, ParagraphStyle, Run, TextDirection};
use crate::error::{Error, Result};

const NS_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// Thin wrapper over `quick_xml::Writer` mapping errors into ours.
struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    fn new() -> Result<Self> {
        let mut writer = Self {
            inner: Writer::new(Vec::new()),
        };
        writer.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(writer)
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.inner
            .write_event(event)
            .map_err(|e| Error::DocumentWrite(format!("XML write failed: {e}")))
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut elem = BytesStart::new(name);
        elem.extend_attributes(attrs.iter().copied());
        self.event(Event::Start(elem))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut elem = BytesStart::new(name);
        elem.extend_attributes(attrs.iter().copied());
        self.event(Event::Empty(elem))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.event(Event::Text(BytesText::new(text)))
    }

    /// `<name attrs>text</name>`
    fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    fn into_bytes(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

const fn justification(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "left",
        Alignment::Right => "right",
        Alignment::Center => "center",
    }
}

/// Serializes a [`DocumentModel`] into a `.docx` package.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxWriter;

impl DocxWriter {
    /// Build the package in memory
    pub fn to_bytes(doc: &DocumentModel) -> Result<Vec<u8>> {
        let parts: [(&str, Vec<u8>); 6] = [
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec()),
            ("_rels/.rels", PACKAGE_RELS.as_bytes().to_vec()),
            ("docProps/core.xml", core_properties_xml(doc)?),
            ("word/document.xml", document_xml(doc)?),
            ("word/styles.xml", styles_xml(doc)?),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes().to_vec()),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for (name, data) in parts {
            zip.start_file(name, options)
                .map_err(|e| Error::DocumentWrite(format!("Failed to add {name}: {e}")))?;
            zip.write_all(&data)?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::DocumentWrite(format!("Failed to finalize package: {e}")))?;
        Ok(cursor.into_inner())
    }

    /// Write the package to `path`
    pub fn save(doc: &DocumentModel, path: impl AsRef<Path>) -> Result<()> {
        let bytes = Self::to_bytes(doc)?;
        std::fs::write(path.as_ref(), bytes).map_err(|e| {
            Error::DocumentWrite(format!("Failed to write {}: {}", path.as_ref().display(), e))
        })
    }
}

/// `word/document.xml`
pub fn document_xml(doc: &DocumentModel) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("w:document", &[("xmlns:w", NS_MAIN), ("xmlns:r", NS_REL)])?;
    w.start("w:body", &[])?;

    for paragraph in &doc.paragraphs {
        write_paragraph(&mut w, paragraph)?;
    }

    // A4 page with 1 inch margins
    w.start("w:sectPr", &[])?;
    w.empty("w:pgSz", &[("w:w", "11906"), ("w:h", "16838")])?;
    w.empty(
        "w:pgMar",
        &[
            ("w:top", "1440"),
            ("w:right", "1440"),
            ("w:bottom", "1440"),
            ("w:left", "1440"),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    w.end("w:sectPr")?;

    w.end("w:body")?;
    w.end("w:document")?;
    Ok(w.into_bytes())
}

fn write_paragraph(w: &mut XmlWriter, paragraph: &Paragraph) -> Result<()> {
    let rtl = paragraph.is_rtl();

    w.start("w:p", &[])?;
    w.start("w:pPr", &[])?;
    if let Some(style) = &paragraph.style {
        w.empty("w:pStyle", &[("w:val", style)])?;
    }
    if rtl {
        w.empty("w:bidi", &[])?;
    }
    w.empty("w:jc", &[("w:val", justification(paragraph.alignment))])?;
    w.end("w:pPr")?;

    for run in &paragraph.runs {
        write_run(w, run, rtl)?;
    }

    w.end("w:p")
}

fn write_run(w: &mut XmlWriter, run: &Run, rtl: bool) -> Result<()> {
    let size = run.font.half_points().to_string();
    let family = run.font.family.as_str();

    w.start("w:r", &[])?;
    w.start("w:rPr", &[])?;
    w.empty(
        "w:rFonts",
        &[("w:ascii", family), ("w:hAnsi", family), ("w:cs", family)],
    )?;
    if run.bold {
        w.empty("w:b", &[])?;
        w.empty("w:bCs", &[])?;
    }
    if run.italic {
        w.empty("w:i", &[])?;
        w.empty("w:iCs", &[])?;
    }
    w.empty("w:sz", &[("w:val", &size)])?;
    w.empty("w:szCs", &[("w:val", &size)])?;
    if rtl {
        w.empty("w:rtl", &[])?;
    }
    w.end("w:rPr")?;

    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            w.empty("w:br", &[])?;
        }
        if !line.is_empty() {
            w.text_element("w:t", &[("xml:space", "preserve")], line)?;
        }
    }

    w.end("w:r")
}

/// `word/styles.xml`
pub fn styles_xml(doc: &DocumentModel) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("w:styles", &[("xmlns:w", NS_MAIN)])?;

    w.start("w:style", &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")])?;
    w.empty("w:name", &[("w:val", "Normal")])?;
    w.empty("w:qFormat", &[])?;
    w.end("w:style")?;

    for style in doc.styles.iter() {
        write_style(&mut w, style)?;
    }

    w.end("w:styles")?;
    Ok(w.into_bytes())
}

fn write_style(w: &mut XmlWriter, style: &ParagraphStyle) -> Result<()> {
    let size = style.font.half_points().to_string();
    let family = style.font.family.as_str();
    let rtl = style.direction == TextDirection::RightToLeft;

    w.start("w:style", &[("w:type", "paragraph"), ("w:styleId", &style.id)])?;
    w.empty("w:name", &[("w:val", &style.name)])?;
    w.empty("w:basedOn", &[("w:val", "Normal")])?;
    w.empty("w:qFormat", &[])?;

    w.start("w:pPr", &[])?;
    if rtl {
        w.empty("w:bidi", &[])?;
    }
    w.empty("w:jc", &[("w:val", justification(style.alignment))])?;
    w.end("w:pPr")?;

    w.start("w:rPr", &[])?;
    w.empty(
        "w:rFonts",
        &[("w:ascii", family), ("w:hAnsi", family), ("w:cs", family)],
    )?;
    if style.bold {
        w.empty("w:b", &[])?;
        w.empty("w:bCs", &[])?;
    }
    w.empty("w:sz", &[("w:val", &size)])?;
    w.empty("w:szCs", &[("w:val", &size)])?;
    if rtl {
        w.empty("w:rtl", &[])?;
    }
    w.end("w:rPr")?;

    w.end("w:style")
}

/// `docProps/core.xml`
fn core_properties_xml(doc: &DocumentModel) -> Result<Vec<u8>> {
    let created = doc.created.with_timezone(&Utc).format("%Y-%m-%dT%H:%M:%SZ").to_string();

    let mut w = XmlWriter::new()?;
    w.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    w.text_element("dc:title", &[], &doc.title)?;
    w.text_element("dc:language", &[], "fa-IR")?;
    w.text_element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &created)?;
    w.end("cp:coreProperties")?;
    Ok(w.into_bytes())
}
