//! Parser for the `.edgerc` credential file.
//!
//! The format is INI-like but not INI: values may be wrapped in single or
//! double quotes (with `\'`/`\"` escaping the delimiter), `;` starts a
//! comment, and the legacy `max-body` key is rewritten to `max_body`. The
//! quoting rules diverge enough from standard INI that a generic parser
//! would mangle real-world files, so the handful of rules live here.

use std::collections::HashMap;

use crate::{Error, Result};

/// Extract the key/value entries of `section` from edgerc `content`.
///
/// Only the first section with a matching name is consulted. A section that
/// does not exist, or exists but contains no lines, is an error.
pub fn parse_section(content: &str, section: &str) -> Result<HashMap<String, String>> {
    let mut lines = content.lines();

    let found = lines
        .by_ref()
        .any(|line| header_name(line) == Some(section));
    let body: Vec<&str> = lines.take_while(|line| header_name(line).is_none()).collect();

    if !found || body.is_empty() {
        return Err(Error::config_section_not_found(format!(
            "section [{section}] not found in edgerc file, \
             you probably specified an invalid section name"
        )));
    }

    let mut result = HashMap::new();
    for line in body {
        if let Some((key, value)) = parse_entry(line) {
            result.insert(key, value);
        }
    }

    // Historic files spell the body cap with a dash.
    if let Some(v) = result.remove("max-body") {
        result.insert("max_body".to_string(), v);
    }

    Ok(result)
}

/// Return the section name if `line` is a `[name]` header.
fn header_name(line: &str) -> Option<&str> {
    let line = line.trim_start();
    let rest = line.strip_prefix('[')?;
    let end = rest.rfind(']')?;
    Some(&rest[..end])
}

/// Parse one `key = value` line. Comments and lines without `=` yield None.
fn parse_entry(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.starts_with(';') {
        return None;
    }
    let index = line.find('=')?;
    let key = line[..index].trim().to_string();
    let value = parse_value(&line[index + 1..]);
    Some((key, value))
}

/// Extract the value portion of an entry.
///
/// A value wrapped in matching quotes is taken verbatim between the
/// delimiters, with `\<quote>` pairs kept as-is; anything after the closing
/// quote must be whitespace or a `;` comment, otherwise the quote is treated
/// as ordinary content. Unquoted values end at the first `;`. In both cases
/// one trailing `/` is stripped, as hosts are often written with one.
fn parse_value(raw: &str) -> String {
    let value = match parse_quoted(raw) {
        Some(inner) => inner,
        None => {
            let raw = raw.split(';').next().unwrap_or("");
            raw.trim().to_string()
        }
    };

    match value.strip_suffix('/') {
        Some(v) => v.to_string(),
        None => value,
    }
}

fn parse_quoted(raw: &str) -> Option<String> {
    let trimmed = raw.trim_start();
    let mut chars = trimmed.char_indices().peekable();
    let quote = match chars.next() {
        Some((_, c @ ('"' | '\''))) => c,
        _ => return None,
    };

    let mut inner = String::new();
    while let Some((idx, c)) = chars.next() {
        if c == '\\' && chars.peek().map(|&(_, n)| n) == Some(quote) {
            // An escaped delimiter stays in the value, backslash included.
            inner.push(c);
            inner.push(quote);
            chars.next();
        } else if c == quote {
            // Only whitespace or a comment may follow the closing quote.
            let rest = trimmed[idx + c.len_utf8()..].trim_start();
            if rest.is_empty() || rest.starts_with(';') {
                return Some(inner);
            }
            return None;
        } else {
            inner.push(c);
        }
    }

    None
}
