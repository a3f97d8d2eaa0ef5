//! Text extraction per document format.
//!
//! `TextExtractor` is the seam between ingestion and the format libraries.
//! `BuiltinExtractor` covers PDF (`pdf-extract`), DOCX (`zip` + `quick-xml`)
//! and plain text.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use zip::ZipArchive;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX container unreadable: {0}")]
    DocxContainer(#[from] zip::result::ZipError),

    #[error("DOCX markup invalid: {0}")]
    DocxMarkup(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Document formats with a dedicated extraction path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    /// Recognizes a supported suffix, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            Some(Self::Pdf)
        } else if lower.ends_with(".docx") {
            Some(Self::Docx)
        } else if lower.ends_with(".txt") || lower.ends_with(".md") {
            Some(Self::PlainText)
        } else {
            None
        }
    }

    /// Direct uploads with an unrecognized suffix are decoded as plain text.
    pub fn for_upload(name: &str) -> Self {
        Self::from_name(name).unwrap_or(Self::PlainText)
    }
}

/// Turns document bytes into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinExtractor;

impl TextExtractor for BuiltinExtractor {
    fn extract(&self, format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractError> {
        match format {
            DocumentFormat::Pdf => extract_pdf(bytes),
            DocumentFormat::Docx => extract_docx(bytes),
            DocumentFormat::PlainText => Ok(String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

/// Page texts joined with newlines. `pdf-extract` panics on some malformed
/// inputs, so the call is isolated with `catch_unwind`.
fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| ExtractError::Pdf("extractor aborted on malformed document".to_string()))?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;
    Ok(pages.join("\n"))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;
    docx_paragraph_text(&xml)
}

/// Collects `w:t` runs per `w:p` paragraph and joins paragraphs with newlines.
fn docx_paragraph_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => current.push('\t'),
                _ => {}
            },
            Event::Text(t) if in_text_run => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    /// Builds a minimal DOCX container holding one paragraph per input line.
    pub(crate) fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!(r#"<w:p><w:r><w:t xml:space="preserve">{p}</w:t></w:r></w:p>"#))
            .collect();
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", FileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    /// Builds a two-page PDF with one line of Helvetica text per page and a
    /// correct cross-reference table.
    pub(crate) fn two_page_pdf(first: &str, second: &str) -> Vec<u8> {
        let content = |text: &str| {
            let stream = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
            format!("<< /Length {} >>\nstream\n{stream}\nendstream", stream.len())
        };
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R 4 0 R] /Count 2 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 5 0 R /Resources << /Font << /F1 7 0 R >> >> >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 6 0 R /Resources << /Font << /F1 7 0 R >> >> >>".to_string(),
            content(first),
            content(second),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }
        let xref_at = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
        for offset in offsets {
            pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        pdf
    }

    #[test]
    fn test_pdf_pages_joined_with_newline() {
        let pdf = two_page_pdf("Alice Smith", "Rust Engineer");
        let text = BuiltinExtractor.extract(DocumentFormat::Pdf, &pdf).unwrap();

        let first = text.find("Alice Smith").expect("first page text");
        let second = text.find("Rust Engineer").expect("second page text");
        assert!(first < second, "got {text:?}");
        assert!(text[first..second].contains('\n'), "got {text:?}");
    }

    #[test]
    fn test_format_from_name_is_case_insensitive() {
        assert_eq!(DocumentFormat::from_name("CV.PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(
            DocumentFormat::from_name("resume.Docx"),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(
            DocumentFormat::from_name("notes.TXT"),
            Some(DocumentFormat::PlainText)
        );
        assert_eq!(DocumentFormat::from_name("photo.png"), None);
        assert_eq!(DocumentFormat::from_name("resume.doc"), None);
    }

    #[test]
    fn test_unrecognized_upload_is_plain_text() {
        assert_eq!(
            DocumentFormat::for_upload("README"),
            DocumentFormat::PlainText
        );
    }

    #[test]
    fn test_plain_text_tolerates_invalid_bytes() {
        let bytes = b"Jane \xff\xfe Doe";
        let text = BuiltinExtractor
            .extract(DocumentFormat::PlainText, bytes)
            .unwrap();
        assert!(text.starts_with("Jane "));
        assert!(text.ends_with(" Doe"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_docx_paragraphs_joined_with_newlines() {
        let bytes = docx_bytes(&["Jane Doe", "Senior Engineer &amp; Lead", "Python, AWS"]);
        let text = BuiltinExtractor
            .extract(DocumentFormat::Docx, &bytes)
            .unwrap();
        assert_eq!(text, "Jane Doe\nSenior Engineer & Lead\nPython, AWS");
    }

    #[test]
    fn test_docx_runs_within_paragraph_concatenate() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>Py</w:t></w:r><w:r><w:t>thon</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>AWS</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(docx_paragraph_text(xml).unwrap(), "Python\n\nAWS");
    }

    #[test]
    fn test_corrupt_docx_is_typed_failure() {
        let err = BuiltinExtractor
            .extract(DocumentFormat::Docx, b"definitely not a zip")
            .unwrap_err();
        assert!(matches!(err, ExtractError::DocxContainer(_)));
    }

    #[test]
    fn test_corrupt_pdf_is_typed_failure() {
        let err = BuiltinExtractor
            .extract(DocumentFormat::Pdf, b"%PDF-1.4 garbage")
            .unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
