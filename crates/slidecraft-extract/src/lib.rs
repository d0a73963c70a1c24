//! Best-effort plain-text extraction from attached documents.
//!
//! Supported inputs are plain text, DOCX (Office Open XML word-processor
//! documents) and PDF. Anything else extracts to an empty string. Callers
//! treat extraction errors as "no augmentation available" and proceed with
//! the unaugmented turn, so nothing here is allowed to abort a turn.

use log::debug;
use quick_xml::Reader;
use quick_xml::events::Event;
use slidecraft_protocol::AttachmentKind;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use zip::ZipArchive;

/// Errors returned while extracting document text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Reading the file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The document archive could not be opened or read.
    #[error("zip error: {0}")]
    Zip(String),
    /// An XML part failed to parse.
    #[error("xml error: {0}")]
    Xml(String),
    /// The PDF document could not be loaded.
    #[error("pdf error: {0}")]
    Pdf(String),
}

/// Extract plain text from a document, dispatching on its declared kind.
///
/// Unsupported kinds yield an empty string rather than an error. For PDFs, a
/// page with no extractable text contributes an empty string.
pub fn extract_text(path: &Path, kind: AttachmentKind) -> Result<String, ExtractError> {
    debug!("extracting text ({}, kind={:?})", path.display(), kind);
    match kind {
        AttachmentKind::Text => Ok(std::fs::read_to_string(path)?),
        AttachmentKind::Docx => extract_docx(path),
        AttachmentKind::Pdf => extract_pdf(path),
        AttachmentKind::Unsupported => Ok(String::new()),
    }
}

/// Concatenate all paragraph texts of a DOCX document, newline-separated,
/// in document order.
fn extract_docx(path: &Path) -> Result<String, ExtractError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)
        .map_err(|err| ExtractError::Zip(format!("failed to open archive: {err}")))?;
    let document = read_part(&mut archive, "word/document.xml")?;

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut in_text_run = false;

    let mut reader = Reader::from_str(&document);
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"t" if in_paragraph => in_text_run = true,
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text_run => {
                let text = e.unescape().unwrap_or_default();
                current.push_str(&text);
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"p" if in_paragraph => {
                    paragraphs.push(std::mem::take(&mut current));
                    in_paragraph = false;
                }
                b"t" => in_text_run = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(ExtractError::Xml(format!(
                    "error parsing document body: {err}"
                )));
            }
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Concatenate the extracted text of every PDF page, in page order.
fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    let document =
        lopdf::Document::load(path).map_err(|err| ExtractError::Pdf(err.to_string()))?;
    let mut result = String::new();
    for page_number in document.get_pages().keys() {
        // A page that yields no text contributes nothing, not an error.
        match document.extract_text(&[*page_number]) {
            Ok(text) => result.push_str(&text),
            Err(err) => debug!("skipping unextractable page {page_number}: {err}"),
        }
    }
    Ok(result)
}

/// Read a named part out of a zip archive as a UTF-8 string.
fn read_part<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, ExtractError> {
    let mut part = archive
        .by_name(name)
        .map_err(|err| ExtractError::Zip(format!("part not found '{name}': {err}")))?;
    let mut content = String::new();
    part.read_to_string(&mut content)
        .map_err(|err| ExtractError::Zip(format!("failed to read '{name}': {err}")))?;
    Ok(content)
}

/// Strip a namespace prefix from an XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use slidecraft_test_utils::write_minimal_pdf;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    fn write_docx(path: &PathBuf, paragraphs: &[&str]) {
        let file = File::create(path).expect("create docx");
        let mut writer = ZipWriter::new(file);
        let mut body = String::new();
        for paragraph in paragraphs {
            body.push_str(&format!("<w:p><w:r><w:t>{paragraph}</w:t></w:r></w:p>"));
        }
        let document = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );
        writer
            .start_file("word/document.xml", FileOptions::default())
            .expect("start part");
        writer.write_all(document.as_bytes()).expect("write part");
        writer.finish().expect("finish docx");
    }

    #[test]
    fn plain_text_reads_verbatim() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Q3 revenue up 12%\nsecond line").expect("write");
        let text = extract_text(&path, AttachmentKind::Text).expect("extract");
        assert_eq!(text, "Q3 revenue up 12%\nsecond line");
    }

    #[test]
    fn docx_joins_paragraphs_with_newlines() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("report.docx");
        write_docx(&path, &["First paragraph", "Second paragraph"]);
        let text = extract_text(&path, AttachmentKind::Docx).expect("extract");
        assert_eq!(text, "First paragraph\nSecond paragraph");
    }

    #[test]
    fn pdf_pages_concatenate_in_order() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("report.pdf");
        write_minimal_pdf(&path, "Q3 revenue up 12%");
        let text = extract_text(&path, AttachmentKind::Pdf).expect("extract");
        assert_eq!(text.contains("Q3 revenue up 12%"), true);
    }

    #[test]
    fn unsupported_kinds_extract_to_empty() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("image.png");
        std::fs::write(&path, [0u8; 8]).expect("write");
        let text = extract_text(&path, AttachmentKind::Unsupported).expect("extract");
        assert_eq!(text, "");
    }

    #[test]
    fn missing_file_is_an_error_not_a_panic() {
        let missing = PathBuf::from("/nonexistent/notes.txt");
        let result = extract_text(&missing, AttachmentKind::Text);
        assert_eq!(result.is_err(), true);
    }

    #[test]
    fn corrupt_docx_is_a_zip_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"not a zip archive").expect("write");
        let err = extract_text(&path, AttachmentKind::Docx).expect_err("must fail");
        assert_eq!(matches!(err, ExtractError::Zip(_)), true);
    }
}
