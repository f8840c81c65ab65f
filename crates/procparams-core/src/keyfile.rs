//! Ordered section/key text documents.
//!
//! A processing profile is stored as a sequence of `[Section]` headers, each
//! followed by `Key=Value` lines. Values are kept exactly as they appear on
//! disk; escaping and list splitting are done by the helpers at the bottom of
//! this module so each field type decides how to read its own text.
//!
//! # Grammar
//!
//! - `[Name]` starts a section. Repeating a header continues that section.
//! - `Key=Value` sets a key in the current section, splitting at the first
//!   `=` not preceded by a backslash. Spaces and tabs around the key and value
//!   are trimmed; other whitespace is kept. A repeated key replaces the
//!   earlier value.
//! - Blank lines and lines starting with `#` are ignored.
//! - Anything else, or a key outside any section, is a parse error.
//! - The document must be UTF-8.

use std::fmt;

use thiserror::Error;

/// Separator between list items.
pub const LIST_SEPARATOR: char = ';';

/// Structural error while parsing a profile document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyFileError {
    /// A `Key=Value` line appeared before the first section header.
    #[error("line {line}: key outside of any section")]
    KeyOutsideSection { line: usize },

    /// A section header is missing its closing bracket or has an empty name.
    #[error("line {line}: invalid section header {text:?}")]
    InvalidHeader { line: usize, text: String },

    /// A line is neither a header, a key/value pair, a comment nor blank.
    #[error("line {line}: expected `key=value`, found {text:?}")]
    InvalidLine { line: usize, text: String },

    /// The document does not contain a single section.
    #[error("document contains no sections")]
    NoSections,

    /// The bytes are not UTF-8 text.
    #[error("not valid UTF-8 after byte {valid_up_to}")]
    InvalidEncoding { valid_up_to: usize },
}

/// One named section and its entries in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key`, replacing an existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Remove `key`, returning its raw value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An ordered collection of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFile {
    sections: Vec<Section>,
}

impl KeyFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from raw file bytes.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, KeyFileError> {
        let text = std::str::from_utf8(bytes).map_err(|err| KeyFileError::InvalidEncoding {
            valid_up_to: err.valid_up_to(),
        })?;
        Self::parse(text)
    }

    /// Parse a document. Fails if the text has no recognizable structure.
    pub fn parse(text: &str) -> Result<Self, KeyFileError> {
        let mut doc = KeyFile::new();
        let mut current: Option<usize> = None;

        for (index, raw_line) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = trim_blank(raw_line);

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .map(trim_blank)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| KeyFileError::InvalidHeader {
                        line: line_no,
                        text: line.to_string(),
                    })?;
                current = Some(doc.section_index(name));
                continue;
            }

            let Some((key, value)) = split_key_value(line) else {
                return Err(KeyFileError::InvalidLine {
                    line: line_no,
                    text: line.to_string(),
                });
            };
            let key = trim_blank(key);
            if key.is_empty() {
                return Err(KeyFileError::InvalidLine {
                    line: line_no,
                    text: line.to_string(),
                });
            }
            let section = current.ok_or(KeyFileError::KeyOutsideSection { line: line_no })?;
            doc.sections[section].set(key, trim_blank(value));
        }

        if doc.sections.is_empty() {
            return Err(KeyFileError::NoSections);
        }
        Ok(doc)
    }

    fn section_index(&mut self, name: &str) -> usize {
        match self.sections.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        }
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Mutable access to `name`, appending an empty section if missing.
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        let index = self.section_index(name);
        &mut self.sections[index]
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key)
    }

    pub fn set(&mut self, section: &str, key: impl Into<String>, value: impl Into<String>) {
        self.section_mut(section).set(key, value);
    }

    pub fn remove(&mut self, section: &str, key: &str) -> Option<String> {
        self.sections
            .iter_mut()
            .find(|s| s.name == section)?
            .remove(key)
    }

    /// Move a value from `from` to `to` unless `to` is already set.
    ///
    /// Returns `true` if a value was moved.
    pub fn rename_key(&mut self, section: &str, from: &str, to: &str) -> bool {
        if self.get(section, to).is_some() {
            return false;
        }
        match self.remove(section, from) {
            Some(value) => {
                self.set(section, to, value);
                true
            }
            None => false,
        }
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Drop sections that ended up with no entries.
    pub fn prune_empty(&mut self) {
        self.sections.retain(|s| !s.is_empty());
    }
}

impl fmt::Display for KeyFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, section) in self.sections.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.entries {
                writeln!(f, "{}={}", key, value)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Value escaping
// ============================================================================

/// Error returned by [`unescape`] for a dangling or unknown escape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid escape sequence in {0:?}")]
pub struct EscapeError(pub String);

/// Escape a string value so it survives a single `Key=Value` line.
///
/// When `in_list` is set the list separator is escaped as well.
pub fn escape(value: &str, in_list: bool) -> String {
    let mut out = String::with_capacity(value.len());
    for (index, ch) in value.chars().enumerate() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            ' ' if index == 0 => out.push_str("\\s"),
            LIST_SEPARATOR if in_list => out.push_str("\\;"),
            other => out.push(other),
        }
    }
    // Trailing whitespace would be trimmed by the parser.
    if value.ends_with(' ') && value.len() > 1 {
        out.pop();
        out.push_str("\\s");
    }
    out
}

/// Escape a key so it cannot be read as a comment, a header or a split point.
///
/// Profile group keys are plain identifiers; this is for free-form keys such
/// as metadata tag names. Read them back with [`unescape`].
pub fn escape_key(key: &str) -> String {
    let escaped = escape(key, false).replace('=', "\\=");
    if escaped.starts_with(['[', '#']) {
        format!("\\{escaped}")
    } else {
        escaped
    }
}

/// Reverse [`escape`].
pub fn unescape(raw: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('s') => out.push(' '),
            Some(LIST_SEPARATOR) => out.push(LIST_SEPARATOR),
            Some(ch @ ('=' | '[' | '#')) => out.push(ch),
            _ => return Err(EscapeError(raw.to_string())),
        }
    }
    Ok(out)
}

fn trim_blank(text: &str) -> &str {
    text.trim_matches([' ', '\t'])
}

/// Split a line at its first `=` that is not escaped.
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (index, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' => return Some((&line[..index], &line[index + 1..])),
            _ => {}
        }
    }
    None
}

/// Split a raw list value on unescaped separators.
///
/// Items keep their escapes; a trailing separator does not produce an
/// empty last item.
pub fn split_list(raw: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (index, ch) in raw.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            LIST_SEPARATOR => {
                items.push(&raw[start..index]);
                start = index + ch.len_utf8();
            }
            _ => {}
        }
    }
    if start < raw.len() {
        items.push(&raw[start..]);
    }
    items
}

/// Join already-encoded items into a list value with a trailing separator.
pub fn join_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for item in items {
        out.push_str(item.as_ref());
        out.push(LIST_SEPARATOR);
    }
    out
}
