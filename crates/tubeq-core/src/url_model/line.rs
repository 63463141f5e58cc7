//! Input line grammar: `url[,name[,folder]]`.

use regex::Regex;
use std::sync::LazyLock;

use super::sanitize::{sanitize_component, sanitize_url};

/// Tried in order; the first that matches wins. Commas cannot be escaped, so
/// anything after the second comma belongs to the folder field.
static LINE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"^(?P<url>[^,]+),(?P<name>[^,]*),(?P<folder>.*)$").unwrap(),
        Regex::new(r"^(?P<url>[^,]+),(?P<name>.*)$").unwrap(),
        Regex::new(r"^(?P<url>[^,]+)$").unwrap(),
    ]
});

/// Fields of one input line after sanitizing. Missing fields are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub url: String,
    pub name: String,
    pub folder: String,
}

/// Parses one plain-text input line. Returns None when no pattern accepts it
/// or the URL field is blank.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let line = line.trim();
    for pattern in LINE_PATTERNS.iter() {
        let Some(caps) = pattern.captures(line) else {
            continue;
        };
        let field = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or("");
        let url = sanitize_url(field("url"));
        if url.is_empty() {
            return None;
        }
        return Some(ParsedLine {
            url,
            name: sanitize_component(field("name")),
            folder: sanitize_component(field("folder")),
        });
    }
    None
}
