use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::naming::{ImageKey, normalize};

const CRYPT_MARKER: &str = "crypt";

/// Image key to requested copies, for one section of the deck.
pub type SectionMap = BTreeMap<ImageKey, u32>;

#[derive(Debug, Error)]
pub enum DeckListError {
    #[error("failed to read deck list {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected '<quantity> <card name>', got '{text}'")]
    MalformedLine { line: usize, text: String },
    #[error("line {line}: quantity '{quantity}' is not a positive number")]
    InvalidQuantity { line: usize, quantity: String },
}

/// Which half of the deck a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Library,
    Crypt,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Library => write!(f, "library"),
            Section::Crypt => write!(f, "crypt"),
        }
    }
}

/// A deck list split into its library and crypt sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckList {
    pub library: SectionMap,
    pub crypt: SectionMap,
}

impl DeckList {
    pub fn load(path: &Path, diagnostics: &dyn Diagnostics) -> Result<Self, DeckListError> {
        let text = fs::read_to_string(path).map_err(|source| DeckListError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, diagnostics)
    }

    /// Classify every `<quantity> <name>` line. Lines before the first crypt
    /// marker are library cards, lines after it are crypt cards.
    pub fn parse(text: &str, diagnostics: &dyn Diagnostics) -> Result<Self, DeckListError> {
        let mut deck = DeckList::default();
        let mut section = Section::Library;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let (quantity_field, name) = split_line(line).unwrap_or((line, ""));

            if section == Section::Library && is_crypt_marker(quantity_field, name) {
                tracing::debug!(line = line_no, "crypt section starts");
                section = Section::Crypt;
                continue;
            }
            if name.is_empty() {
                return Err(DeckListError::MalformedLine {
                    line: line_no,
                    text: line.to_string(),
                });
            }

            let quantity = parse_quantity(quantity_field, line_no)?;
            let key = match section {
                Section::Library => ImageKey::plain(normalize(name)),
                Section::Crypt => ImageKey::from_crypt_name(name),
            };
            tracing::trace!(%section, %key, quantity, "deck entry");
            deck.insert(section, key, quantity, line_no, diagnostics);
        }

        Ok(deck)
    }

    /// Total copies requested across both sections.
    pub fn total_copies(&self) -> u64 {
        self.library
            .values()
            .chain(self.crypt.values())
            .map(|&qty| u64::from(qty))
            .sum()
    }

    fn insert(
        &mut self,
        section: Section,
        key: ImageKey,
        quantity: u32,
        line: usize,
        diagnostics: &dyn Diagnostics,
    ) {
        let map = match section {
            Section::Library => &mut self.library,
            Section::Crypt => &mut self.crypt,
        };
        if let Some(previous) = map.insert(key.clone(), quantity) {
            diagnostics.report(Diagnostic::DuplicateEntry {
                section,
                key,
                line,
                previous,
                quantity,
            });
        }
    }
}

fn split_line(line: &str) -> Option<(&str, &str)> {
    let (head, tail) = line.split_once(char::is_whitespace)?;
    let tail = tail.trim_start();
    if tail.is_empty() {
        return None;
    }
    Some((head, tail))
}

/// `Crypt (12 cards)`, `crypt:` and `1 Crypt:` all open the crypt section.
fn is_crypt_marker(quantity_field: &str, name: &str) -> bool {
    if starts_with_ignore_case(quantity_field, CRYPT_MARKER) {
        return true;
    }
    if !quantity_field.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if !starts_with_ignore_case(name, CRYPT_MARKER) {
        return false;
    }
    match name[CRYPT_MARKER.len()..].chars().next() {
        None => true,
        Some(next) => next.is_whitespace() || next == ':' || next == '(',
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.is_char_boundary(prefix.len())
        && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn parse_quantity(field: &str, line: usize) -> Result<u32, DeckListError> {
    match field.parse::<u32>() {
        Ok(qty) if qty > 0 => Ok(qty),
        _ => Err(DeckListError::InvalidQuantity {
            line,
            quantity: field.to_string(),
        }),
    }
}
