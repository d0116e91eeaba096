// ColaCup - core/details.rs
//
// Details projection for a single log entry, with best-effort extraction of
// an embedded JSON payload. The extraction is a regex heuristic, not a parse:
// the first greedy `{...}` or `[...]` span is taken verbatim.
// Core layer: pure logic, no I/O.

use crate::core::model::{DetailsItem, DetailsSection, LogEntry, SectionKind};
use crate::util::constants::{DEFAULT_TIME_FORMAT, JSON_PLACEHOLDER};
use chrono::{FixedOffset, Offset, Utc};
use regex::Regex;
use std::ops::Range;

/// First greedy object or array span. A lookahead-free equivalent of
/// `(?s)(\{.*(?=\})\}|\[.*(?=\])\])`: both take the outermost span up to the
/// last closing brace/bracket, and leftmost-first alternation is kept.
const JSON_SPAN_PATTERN: &str = r"(?s)(\{.*\}|\[.*\])";

/// Builds details sections using explicit display settings.
#[derive(Debug, Clone)]
pub struct DetailsFormatter {
    time_format: String,
    utc_offset: FixedOffset,
    json_span: Option<Regex>,
}

impl Default for DetailsFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_FORMAT, Utc.fix())
    }
}

impl DetailsFormatter {
    pub fn new(time_format: &str, utc_offset: FixedOffset) -> Self {
        let json_span = match Regex::new(JSON_SPAN_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(error = %e, "JSON span pattern failed to compile; extraction disabled");
                None
            }
        };
        Self {
            time_format: time_format.to_string(),
            utc_offset,
            json_span,
        }
    }

    /// Display text for an entry timestamp in the configured offset and format.
    pub fn format_time(&self, entry: &LogEntry) -> String {
        match entry.date_time() {
            Some(dt) => dt
                .with_timezone(&self.utc_offset)
                .format(&self.time_format)
                .to_string(),
            None => entry.timestamp.to_string(),
        }
    }

    /// Byte range of the first JSON-looking span in `content`.
    pub fn find_json(&self, content: &str) -> Option<Range<usize>> {
        self.json_span
            .as_ref()
            .and_then(|re| re.find(content))
            .map(|m| m.range())
    }

    /// Project `entry` into Time, Content, Position, Function and, when a JSON
    /// span is found in the message, a trailing JSON section.
    pub fn build(&self, entry: &LogEntry) -> Vec<DetailsSection> {
        let content = entry.message.trim();
        let json = self.find_json(content);

        let display_content = match &json {
            Some(range) => {
                let mut text = String::with_capacity(content.len());
                text.push_str(&content[..range.start]);
                text.push_str(JSON_PLACEHOLDER);
                text.push_str(&content[range.end..]);
                text
            }
            None => content.to_string(),
        };

        let mut sections = vec![
            DetailsSection {
                kind: SectionKind::Time,
                items: vec![
                    DetailsItem::text(self.format_time(entry)),
                    DetailsItem::titled("Flag", entry.flag.as_str()),
                ],
            },
            DetailsSection {
                kind: SectionKind::Content,
                items: vec![DetailsItem::text(display_content)],
            },
            DetailsSection {
                kind: SectionKind::Position,
                items: vec![
                    DetailsItem::titled("Module", entry.module.as_str()),
                    DetailsItem::titled("File", entry.file_name()),
                    DetailsItem::titled("Line", entry.line.to_string()),
                ],
            },
            DetailsSection {
                kind: SectionKind::Function,
                items: vec![DetailsItem::text(entry.function.as_str())],
            },
        ];

        if let Some(range) = json {
            tracing::trace!(len = range.len(), "JSON span extracted from message");
            sections.push(DetailsSection {
                kind: SectionKind::Json,
                items: vec![DetailsItem::text(&content[range])],
            });
        }

        sections
    }
}

/// Text used when sharing a single entry.
///
/// Values are interpolated raw: quotes or newlines inside a message are not
/// escaped, so the result is only JSON-shaped, not guaranteed valid JSON.
pub fn shared_representation(entry: &LogEntry) -> String {
    format!(
        "{{\n\t\"timestamp\": {},\n\t\"flag\": \"{}\",\n\t\"module\": \"{}\",\n\t\"file\": \"{}\",\n\t\"function\": \"{}\",\n\t\"line\": {},\n\t\"content\": \"{}\"\n}}",
        entry.timestamp,
        entry.flag,
        entry.module,
        entry.file,
        entry.function,
        entry.line,
        entry.message,
    )
}
