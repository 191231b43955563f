//! Splits raw documentation text into frontmatter, body and the two named sections.
//!
//! The frontmatter block is a deliberately small subset of YAML: one `key: value` pair per
//! line between two `---` lines. Nested structures are not interpreted; such lines are
//! kept as plain strings or skipped when they have no key.

use std::collections::BTreeMap;

use crate::config::SourceName;

const FENCE: &str = "---";
const DESIGN_HEADER: &str = "## Design";
const DEVELOPMENT_HEADER: &str = "## Development";

/// One source's view of a document, before merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedContent {
    pub frontmatter: BTreeMap<String, String>,
    pub body: String,
    pub design_section: String,
    pub development_section: String,
    pub origin_source: SourceName,
    pub last_updated: Option<String>,
}

/// The `## Design` and `## Development` parts of a body; empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    pub design: String,
    pub development: String,
}

impl Sections {
    pub fn is_empty(&self) -> bool {
        self.design.is_empty() && self.development.is_empty()
    }
}

pub fn parse(raw: &str, origin_source: SourceName) -> ParsedContent {
    let (frontmatter, body) = split_frontmatter(raw);
    let sections = extract_sections(body);
    let last_updated = frontmatter.get("last_updated").cloned();
    ParsedContent {
        body: body.to_string(),
        design_section: sections.design,
        development_section: sections.development,
        frontmatter,
        origin_source,
        last_updated,
    }
}

/// Returns the frontmatter fields and the remaining body.
///
/// Without an opening `---` line, or without a closing one, the whole input is the body.
pub fn split_frontmatter(raw: &str) -> (BTreeMap<String, String>, &str) {
    let mut lines = line_spans(raw);
    match lines.next() {
        Some((_, line)) if line == FENCE => {}
        _ => return (BTreeMap::new(), raw),
    }
    let header_start = first_line_len(raw);

    for (start, line) in lines {
        if line == FENCE {
            let header = &raw[header_start..start];
            let body_start = start + first_line_len(&raw[start..]);
            return (parse_fields(header), &raw[body_start..]);
        }
    }
    (BTreeMap::new(), raw)
}

pub fn extract_sections(body: &str) -> Sections {
    Sections {
        design: section(body, DESIGN_HEADER, Some(DEVELOPMENT_HEADER)),
        development: section(body, DEVELOPMENT_HEADER, None),
    }
}

fn section(body: &str, header: &str, stop: Option<&str>) -> String {
    let mut lines = line_spans(body);
    let Some((start, _)) = lines.find(|(_, line)| *line == header) else {
        return String::new();
    };
    let content_start = start + first_line_len(&body[start..]);
    let content_end = stop
        .and_then(|stop| lines.find(|(_, line)| *line == stop))
        .map(|(offset, _)| offset)
        .unwrap_or(body.len());
    body[content_start..content_end].trim().to_string()
}

fn parse_fields(header: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    for line in header.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        fields.insert(key.to_string(), unquote(value.trim()).to_string());
    }
    fields
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Byte offset and content (without line terminator) of every line.
fn line_spans(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_inclusive('\n').scan(0, |offset, line| {
        let start = *offset;
        *offset += line.len();
        let content = line.strip_suffix('\n').unwrap_or(line);
        Some((start, content.strip_suffix('\r').unwrap_or(content)))
    })
}

/// Length of the first line including its terminator.
fn first_line_len(text: &str) -> usize {
    text.find('\n').map(|i| i + 1).unwrap_or(text.len())
}
