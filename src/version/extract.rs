//! Line-oriented scanner that finds the `version` field of an API spec.
//!
//! This is deliberately not a JSON or YAML parser. It recognises two shapes:
//!
//! - flow style, a quoted `"version"` (or `'version'`) key followed by `:` and a scalar
//! - block style, a `version:` line nested under a top-level `info:` line
//!
//! The scan is a single forward pass and the first non-empty match wins.

const INFO_HEADER: &str = "info:";
const BLOCK_KEY: &str = "version:";
const FLOW_KEYS: [&str; 2] = ["\"version\"", "'version'"];

/// Where the scanner is relative to the `info:` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfoBlock {
    NotSeen,
    Inside,
    Closed,
}

/// Extract the embedded API version from spec text.
///
/// Returns `None` when neither a flow-style key nor a `version:` inside
/// the first `info:` block yields a non-empty value.
pub fn extract_version(text: &str) -> Option<String> {
    let mut info = InfoBlock::NotSeen;

    for line in text.lines() {
        if let Some(version) = flow_value(line) {
            return Some(version);
        }

        let trimmed = line.trim();

        match info {
            InfoBlock::NotSeen => {
                if line.trim_end() == INFO_HEADER {
                    info = InfoBlock::Inside;
                }
            }
            InfoBlock::Inside => {
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }

                if !line.starts_with([' ', '\t']) {
                    info = InfoBlock::Closed;
                    continue;
                }

                if let Some(rest) = trimmed.strip_prefix(BLOCK_KEY) {
                    let value = unquote(rest.trim());
                    if !value.is_empty() {
                        return Some(value.to_string());
                    }
                }
            }
            InfoBlock::Closed => {}
        }
    }

    None
}

/// Strip a single leading `v` from a release tag (`v2.1.0` -> `2.1.0`).
pub fn strip_tag_prefix(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

/// Value of a quoted `version` key on this line, if present and non-empty.
fn flow_value(line: &str) -> Option<String> {
    for key in FLOW_KEYS {
        let mut search_from = 0;

        while let Some(offset) = line[search_from..].find(key) {
            let after_key = search_from + offset + key.len();
            search_from = after_key;

            let Some(rest) = line[after_key..].trim_start().strip_prefix(':') else {
                continue;
            };

            if let Some(value) = scalar(rest.trim_start()).filter(|v| !v.is_empty()) {
                return Some(value.to_string());
            }
        }
    }

    None
}

/// Read one scalar: a quoted string up to its closing quote, or a bare
/// token up to the next `,` or `}`. Objects and arrays are not scalars.
fn scalar(raw: &str) -> Option<&str> {
    if raw.starts_with(['{', '[']) {
        return None;
    }

    for quote in ['"', '\''] {
        if let Some(inner) = raw.strip_prefix(quote) {
            return Some(match inner.find(quote) {
                Some(end) => inner[..end].trim(),
                None => inner.trim_end_matches(',').trim(),
            });
        }
    }

    let end = raw.find([',', '}']).unwrap_or(raw.len());
    Some(raw[..end].trim())
}

/// Remove trailing commas and one pair of matching quotes.
fn unquote(raw: &str) -> &str {
    let value = raw.trim_end_matches(',').trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    value
}
