//! Template renderer
//!
//! Loads a flat OpenDocument layout, substitutes `${name}` placeholders,
//! clones the repeating row and persists the editable artifact.
//!
//! A render moves through NotLoaded → Loaded → Substituted → Saved. A
//! failure at any step aborts the render, and nothing is left at the target
//! path because output is written to a sibling temp file and renamed.

use super::expand::expand;
use crate::core::cache::write_atomic;
use crate::core::mapping::FieldTable;
use crate::domain::errors::RenderError;
use crate::domain::{ClinidocError, RepeatingRegion, Result, TemplateDescriptor};
use regex::Regex;
use std::path::{Path, PathBuf};

const ROW_OPEN: &str = "<table:table-row";
const ROW_CLOSE: &str = "</table:table-row>";
const LINE_BREAK: &str = "<text:line-break/>";

/// Render stage, reported with failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    NotLoaded,
    Loaded,
    Substituted,
    Saved,
}

impl std::fmt::Display for RenderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NotLoaded => "not_loaded",
            Self::Loaded => "loaded",
            Self::Substituted => "substituted",
            Self::Saved => "saved",
        };
        f.write_str(name)
    }
}

struct LoadedTemplate {
    xml: String,
}

struct SubstitutedDocument {
    xml: String,
    rows: usize,
}

/// Result of a successful render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub path: PathBuf,
    /// Rows emitted for the repeating region, zero when there is none
    pub rows: usize,
}

/// Generic render engine shared by every form kind
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    template_dir: PathBuf,
    placeholder: Regex,
}

impl TemplateRenderer {
    /// Create a renderer reading layouts from `template_dir`
    ///
    /// # Errors
    ///
    /// Returns an error if the placeholder pattern fails to compile.
    pub fn new(template_dir: impl Into<PathBuf>) -> Result<Self> {
        let placeholder = Regex::new(r"\$\{([A-Za-z0-9_]+)\}")
            .map_err(|e| ClinidocError::Other(format!("Invalid placeholder pattern: {e}")))?;
        Ok(Self {
            template_dir: template_dir.into(),
            placeholder,
        })
    }

    /// Render `descriptor` with `fields` and optional row tables into `target`
    ///
    /// Rows are expanded against the descriptor's region. A region with no
    /// rows supplied still renders its minimum of blank rows.
    ///
    /// # Errors
    ///
    /// - [`RenderError::TemplateNotFound`] if the layout file is absent
    /// - [`RenderError::UnexpectedRepeatingItems`] if rows are supplied to a
    ///   layout without a region
    /// - [`RenderError::AnchorRowNotFound`] if the anchor is not inside a row
    /// - [`RenderError::UnresolvedPlaceholder`] if the layout uses a name
    ///   the tables do not supply
    /// - [`RenderError::WriteFailed`] if the artifact cannot be persisted
    pub async fn render(
        &self,
        descriptor: &TemplateDescriptor,
        fields: &FieldTable,
        rows: Option<Vec<FieldTable>>,
        target: &Path,
    ) -> Result<RenderedDocument> {
        let rows = match (&descriptor.repeating, rows) {
            (None, Some(items)) if !items.is_empty() => {
                return Err(RenderError::UnexpectedRepeatingItems(descriptor.kind).into())
            }
            (None, _) => None,
            (Some(region), items) => Some((
                region,
                expand(descriptor.kind, items.unwrap_or_default(), region)?,
            )),
        };

        let loaded = self.load(descriptor).await?;
        tracing::trace!(kind = %descriptor.kind, stage = %RenderStage::Loaded, "Template loaded");

        let substituted = self.substitute(loaded, fields, rows)?;
        tracing::trace!(
            kind = %descriptor.kind,
            stage = %RenderStage::Substituted,
            rows = substituted.rows,
            "Placeholders substituted"
        );

        write_atomic(target, substituted.xml.as_bytes())
            .await
            .map_err(|e| RenderError::WriteFailed(format!("{}: {e}", target.display())))?;
        tracing::trace!(kind = %descriptor.kind, stage = %RenderStage::Saved, "Editable artifact saved");

        Ok(RenderedDocument {
            path: target.to_path_buf(),
            rows: substituted.rows,
        })
    }

    async fn load(&self, descriptor: &TemplateDescriptor) -> Result<LoadedTemplate> {
        let path = self.template_dir.join(&descriptor.file_name);
        match tokio::fs::read_to_string(&path).await {
            Ok(xml) => Ok(LoadedTemplate { xml }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RenderError::TemplateNotFound(path).into())
            }
            Err(e) => Err(ClinidocError::Io(format!(
                "Failed to read template {}: {e}",
                path.display()
            ))),
        }
    }

    /// Fill the template in one pass over its own text
    ///
    /// The document is split into the text before the repeating row, the
    /// row itself and the text after it. Each piece is filled from the
    /// original template, so substituted values are never scanned for
    /// placeholders again.
    fn substitute(
        &self,
        template: LoadedTemplate,
        fields: &FieldTable,
        rows: Option<(&RepeatingRegion, Vec<FieldTable>)>,
    ) -> Result<SubstitutedDocument> {
        let xml = template.xml;
        let mut out = String::with_capacity(xml.len());

        let Some((region, rows)) = rows else {
            self.fill(&xml, |key| fields.get(key), &mut out)?;
            return Ok(SubstitutedDocument { xml: out, rows: 0 });
        };

        let (start, end) = locate_row(&xml, &region.anchor)?;
        self.fill(&xml[..start], |key| fields.get(key), &mut out)?;
        let row_template = &xml[start..end];
        for row in &rows {
            self.fill(
                row_template,
                |key| row.get(key).or_else(|| fields.get(key)),
                &mut out,
            )?;
        }
        self.fill(&xml[end..], |key| fields.get(key), &mut out)?;

        Ok(SubstitutedDocument {
            xml: out,
            rows: rows.len(),
        })
    }

    /// Append `text` to `out` with every placeholder replaced
    fn fill<'a>(
        &self,
        text: &str,
        lookup: impl Fn(&str) -> Option<&'a str>,
        out: &mut String,
    ) -> Result<()> {
        let mut last = 0;
        for caps in self.placeholder.captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = lookup(name.as_str())
                .ok_or_else(|| RenderError::UnresolvedPlaceholder(name.as_str().to_string()))?;
            out.push_str(&text[last..whole.start()]);
            out.push_str(&escape_xml(value));
            last = whole.end();
        }
        out.push_str(&text[last..]);
        Ok(())
    }
}

/// Byte range of the table row enclosing `${anchor}`
fn locate_row(xml: &str, anchor: &str) -> Result<(usize, usize)> {
    let marker = format!("${{{anchor}}}");
    let not_found = || RenderError::AnchorRowNotFound(anchor.to_string());

    let at = xml.find(&marker).ok_or_else(not_found)?;
    let start = xml[..at]
        .match_indices(ROW_OPEN)
        .map(|(i, _)| i)
        .filter(|&i| {
            // Skip <table:table-rows> and similar longer element names
            matches!(
                xml.as_bytes().get(i + ROW_OPEN.len()),
                Some(b'>' | b' ' | b'/' | b'\n' | b'\t' | b'\r')
            )
        })
        .last()
        .ok_or_else(not_found)?;
    let close = xml[at..].find(ROW_CLOSE).ok_or_else(not_found)?;
    let end = at + close + ROW_CLOSE.len();

    // The anchor must not sit after a row that already closed
    if xml[start..at].contains(ROW_CLOSE) {
        return Err(not_found().into());
    }
    Ok((start, end))
}

/// Escape text for inclusion in XML character data
///
/// Newlines become ODF line breaks.
pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str(LINE_BREAK),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}
