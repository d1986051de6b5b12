//! Document text extraction
//!
//! Turns an uploaded file into the plain text sent for analysis: the
//! non-empty body paragraphs, one per line.

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::io::{Cursor, Read};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("not a valid .docx archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("malformed document XML: {0}")]
    Xml(String),

    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported document type: {0}")]
    Unsupported(String),
}

/// Extracts plain text from an uploaded document
pub trait DocumentTextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, DocumentError>;

    fn name(&self) -> &str;
}

/// Pick an extractor from a file extension
pub fn extractor_for_extension(extension: &str) -> Result<Box<dyn DocumentTextExtractor>, DocumentError> {
    match extension.to_ascii_lowercase().as_str() {
        "docx" => Ok(Box::new(DocxExtractor)),
        "txt" | "md" => Ok(Box::new(PlainTextExtractor)),
        other => Err(DocumentError::Unsupported(other.to_string())),
    }
}

const DOCUMENT_PART: &str = "word/document.xml";

/// Word (.docx) extractor.
///
/// Only paragraphs directly under the document body count; table cells and
/// text boxes are skipped. Inside a run, `w:tab` renders as a tab and
/// `w:br`/`w:cr` as a newline.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxExtractor;

impl DocxExtractor {
    fn read_document_part(bytes: &[u8]) -> Result<String, DocumentError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let mut part = archive.by_name(DOCUMENT_PART)?;
        let mut xml = String::new();
        part.read_to_string(&mut xml)?;
        Ok(xml)
    }

    fn paragraphs(xml: &str) -> Result<Vec<String>, DocumentError> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Vec<u8>> = Vec::new();
        let mut paragraphs = Vec::new();
        // (stack depth of the open top-level paragraph, its text)
        let mut current: Option<(usize, String)> = None;
        let mut in_text = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| DocumentError::Xml(format!("at byte {}: {}", reader.buffer_position(), e)))?;

            match event {
                Event::Start(e) => {
                    let name = e.name().as_ref().to_vec();
                    if name == b"w:p" && stack.last().map(Vec::as_slice) == Some(b"w:body".as_slice()) {
                        current = Some((stack.len() + 1, String::new()));
                    }
                    if name == b"w:t" && Self::in_run(&stack) {
                        in_text = current.is_some();
                    }
                    stack.push(name);
                }
                Event::Empty(e) => {
                    if let Some((_, text)) = current.as_mut() {
                        if Self::in_run(&stack) {
                            match e.name().as_ref() {
                                b"w:tab" => text.push('\t'),
                                b"w:br" | b"w:cr" => text.push('\n'),
                                _ => {}
                            }
                        }
                    }
                }
                Event::Text(t) if in_text => {
                    let unescaped = t.unescape().map_err(|e| DocumentError::Xml(e.to_string()))?;
                    if let Some((_, text)) = current.as_mut() {
                        text.push_str(&unescaped);
                    }
                }
                Event::End(_) => {
                    let depth = stack.len();
                    if let Some(name) = stack.pop() {
                        if name == b"w:t" {
                            in_text = false;
                        }
                    }
                    if matches!(current, Some((level, _)) if level == depth) {
                        if let Some((_, text)) = current.take() {
                            if !text.is_empty() {
                                paragraphs.push(text);
                            }
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(paragraphs)
    }

    // A run inside the top-level paragraph, not inside a nested text box
    fn in_run(stack: &[Vec<u8>]) -> bool {
        stack.last().map(Vec::as_slice) == Some(b"w:r".as_slice())
            && !stack.iter().any(|name| name == b"w:txbxContent")
    }
}

impl DocumentTextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, DocumentError> {
        let xml = Self::read_document_part(bytes)?;
        Ok(Self::paragraphs(&xml)?.join("\n"))
    }

    fn name(&self) -> &str {
        "docx"
    }
}

/// UTF-8 text extractor; empty lines are dropped
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl DocumentTextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, DocumentError> {
        let text = String::from_utf8(bytes.to_vec())?;
        Ok(text
            .lines()
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn name(&self) -> &str {
        "text"
    }
}
