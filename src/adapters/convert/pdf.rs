//! Plain text PDF layout
//!
//! Lays text lines out on A4 pages in Helvetica through `printpdf`. Lines
//! are wrapped to a fixed column count and split into pages before any PDF
//! object is created, so the layout itself is a pure function of the input.

use crate::domain::{ConversionError, Result};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::io::BufWriter;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LEADING_MM: f32 = 5.0;
const FONT_SIZE: f32 = 10.0;

/// Characters per line before wrapping, sized for Helvetica at 10pt
pub const WRAP_COLUMNS: usize = 92;

/// Lines that fit between the top and bottom margins at 5mm leading
pub const LINES_PER_PAGE: usize = 51;

/// Wrap `lines` and split them into pages
///
/// An empty document still has one (blank) page.
pub fn paginate(lines: &[String]) -> Vec<Vec<String>> {
    let wrapped: Vec<String> = lines
        .iter()
        .flat_map(|line| wrap(&transliterate(line), WRAP_COLUMNS))
        .collect();
    if wrapped.is_empty() {
        return vec![Vec::new()];
    }
    wrapped.chunks(LINES_PER_PAGE).map(<[String]>::to_vec).collect()
}

/// Render `lines` into a complete PDF document
///
/// # Errors
///
/// Returns [`ConversionError::LocalWriterFailed`] if the font cannot be
/// registered or the document cannot be serialized.
///
/// # Examples
///
/// ```
/// use clinidoc::adapters::convert::pdf::write_pdf;
///
/// let bytes = write_pdf("Example", &["Hello".to_string()]).unwrap();
/// assert!(bytes.starts_with(b"%PDF-"));
/// ```
pub fn write_pdf(title: &str, lines: &[String]) -> Result<Vec<u8>> {
    let pages = paginate(lines);

    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Page 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ConversionError::LocalWriterFailed(format!("PDF font error: {e}")))?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Page {}", index + 1),
            );
            doc.get_page(page).get_layer(layer)
        };

        let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
        for line in page {
            if !line.trim().is_empty() {
                layer.use_text(line.as_str(), FONT_SIZE, Mm(MARGIN_MM), Mm(y), &font);
            }
            y -= LEADING_MM;
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ConversionError::LocalWriterFailed(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ConversionError::LocalWriterFailed(format!("PDF buffer error: {e}")).into())
}

/// Map text onto what the base-14 Helvetica font can show
///
/// Checkbox glyphs become `[x]` / `[ ]`; anything else outside Latin-1
/// becomes `?`.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '☑' | '☒' => out.push_str("[x]"),
            '☐' => out.push_str("[ ]"),
            '\t' => out.push(' '),
            c if c.is_control() => {}
            c if (c as u32) <= 0xFF => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Word-wrap at `width` characters, hard-splitting words that do not fit
fn wrap(line: &str, width: usize) -> Vec<String> {
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for word in line.split(' ') {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            lines.push(word.drain(..width).collect());
        }
        let needed = if current_len == 0 { word.len() } else { word.len() + 1 };
        if current_len + needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }
    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transliterate() {
        assert_eq!(transliterate("☑ CBC ☐ ECG"), "[x] CBC [ ] ECG");
        assert_eq!(transliterate("Peña\tA"), "Peña A");
        assert_eq!(transliterate("a → b"), "a ? b");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("short", 10), vec!["short"]);
        assert_eq!(wrap("aaaa bbbb cccc", 9), vec!["aaaa bbbb", "cccc"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_paginate() {
        let lines: Vec<String> = (0..LINES_PER_PAGE * 2 + 1).map(|i| format!("line {i}")).collect();
        let pages = paginate(&lines);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[2], vec![format!("line {}", LINES_PER_PAGE * 2)]);
    }

    #[test]
    fn test_paginate_wraps_long_lines() {
        let pages = paginate(&["word ".repeat(40)]);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].len(), 3);
    }

    #[test]
    fn test_empty_document_has_one_page() {
        assert_eq!(paginate(&[]), vec![Vec::<String>::new()]);
        let pdf = write_pdf("Empty", &[]).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_multi_page_document() {
        let lines: Vec<String> = (0..LINES_PER_PAGE + 5).map(|i| format!("Reading {i}")).collect();
        let pdf = write_pdf("Blood Pressure Chart", &lines).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert!(pdf.len() > 500);
    }
}
