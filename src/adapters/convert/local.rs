//! In-process conversion
//!
//! Reads the flat OpenDocument body and lays its paragraphs and table rows
//! out as a plain text PDF. Used where no remote service is configured.

use super::pdf::write_pdf;
use super::DocumentConverter;
use crate::core::cache::write_atomic;
use crate::domain::{ConversionError, Result};
use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

const BODY: &[u8] = b"office:text";
const CELL_SEPARATOR: &str = " | ";

/// Local conversion strategy
#[derive(Debug, Clone, Default)]
pub struct LocalConverter;

/// Text collected while walking the document body
#[derive(Default)]
struct BodyText {
    lines: Vec<String>,
    paragraph: String,
    cell: String,
    cells: Vec<String>,
    row_depth: usize,
    para_depth: usize,
}

impl BodyText {
    fn handle(&mut self, event: Event<'_>) -> Result<()> {
        match event {
            Event::Start(e) => self.open(e.name().as_ref()),
            Event::End(e) => self.close(e.name().as_ref()),
            Event::Empty(e) => self.empty(&e),
            Event::Text(t) => self.text(&t.unescape().map_err(read_failed)?),
            Event::CData(c) => self.text(&String::from_utf8_lossy(&c.into_inner())),
            _ => {}
        }
        Ok(())
    }

    fn open(&mut self, name: &[u8]) {
        match name {
            b"text:p" | b"text:h" => self.para_depth += 1,
            b"table:table-row" => {
                self.row_depth += 1;
                self.cells.clear();
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"text:p" | b"text:h" => {
                self.para_depth = self.para_depth.saturating_sub(1);
                if self.para_depth == 0 {
                    self.finish_paragraph();
                }
            }
            b"table:table-cell" | b"table:covered-table-cell" => {
                self.cells.push(std::mem::take(&mut self.cell).trim().to_string());
            }
            b"table:table-row" => {
                self.row_depth = self.row_depth.saturating_sub(1);
                self.lines
                    .push(self.cells.join(CELL_SEPARATOR).trim_end().to_string());
                self.cells.clear();
            }
            _ => {}
        }
    }

    fn empty(&mut self, element: &BytesStart<'_>) {
        match element.name().as_ref() {
            b"text:line-break" => self.paragraph.push('\n'),
            b"text:tab" => self.paragraph.push(' '),
            b"text:s" => {
                let count = element
                    .try_get_attribute("text:c")
                    .ok()
                    .flatten()
                    .and_then(|a| std::str::from_utf8(&a.value).ok()?.parse::<usize>().ok())
                    .unwrap_or(1);
                self.paragraph.push_str(&" ".repeat(count));
            }
            b"text:p" | b"text:h" if self.row_depth == 0 => self.lines.push(String::new()),
            name @ (b"table:table-cell" | b"table:covered-table-cell") => self.close(name),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.para_depth > 0 {
            self.paragraph.push_str(text);
        }
    }

    fn finish_paragraph(&mut self) {
        let text = std::mem::take(&mut self.paragraph);
        if self.row_depth > 0 {
            if !self.cell.is_empty() {
                self.cell.push(' ');
            }
            self.cell.push_str(&text.replace('\n', " "));
        } else {
            self.lines
                .extend(text.split('\n').map(|l| l.trim_end().to_string()));
        }
    }
}

fn read_failed(e: impl std::fmt::Display) -> ConversionError {
    ConversionError::LocalWriterFailed(format!("unreadable document: {e}"))
}

impl LocalConverter {
    pub fn new() -> Self {
        Self
    }

    /// Text lines of a flat OpenDocument file, in reading order
    ///
    /// Paragraphs and headings become one line each; a table row becomes
    /// one line with its cells joined by `" | "`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::LocalWriterFailed`] if the XML is malformed
    /// or the document has no closed text body.
    pub fn extract_lines(&self, xml: &str) -> Result<Vec<String>> {
        let mut reader = Reader::from_str(xml);
        let mut body: Option<BodyText> = None;

        loop {
            match reader.read_event().map_err(read_failed)? {
                Event::Start(e) if e.name().as_ref() == BODY => body = Some(BodyText::default()),
                Event::Empty(e) if e.name().as_ref() == BODY && body.is_none() => {
                    return Ok(Vec::new())
                }
                Event::End(e) if e.name().as_ref() == BODY => {
                    if let Some(text) = body.take() {
                        return Ok(text.lines);
                    }
                }
                Event::Eof => {
                    let reason = if body.is_some() {
                        "document text body is not closed"
                    } else {
                        "document has no text body"
                    };
                    return Err(ConversionError::LocalWriterFailed(reason.into()).into());
                }
                event => {
                    if let Some(text) = body.as_mut() {
                        text.handle(event)?;
                    }
                }
            }
        }
    }
}

#[async_trait]
impl DocumentConverter for LocalConverter {
    async fn convert(&self, editable: &Path, target: &Path) -> Result<()> {
        let xml = tokio::fs::read_to_string(editable).await.map_err(|e| {
            ConversionError::LocalWriterFailed(format!("{}: {e}", editable.display()))
        })?;
        let lines = self.extract_lines(&xml)?;
        let title = editable
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let pdf = write_pdf(&title, &lines)?;

        write_atomic(target, &pdf).await.map_err(|e| {
            ConversionError::LocalWriterFailed(format!("{}: {e}", target.display()))
        })?;

        tracing::debug!(
            target = %target.display(),
            lines = lines.len(),
            bytes = pdf.len(),
            "Local conversion complete"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
