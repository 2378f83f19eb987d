use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Suffix appended to every image stem when probing the image folder.
pub const IMAGE_EXTENSION: &str = "jpg";

const ADVANCED_TAG: &str = "adv";

/// Map a printed card name onto the lowercase alphanumeric form used for image files.
///
/// Every character that is not an ASCII letter or digit is dropped; the rest is
/// lower-cased. The mapping is total and idempotent.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("group must be between 1 and {max} (got {0})", max = Group::MAX)]
pub struct GroupOutOfRange(pub u8);

/// Crypt printing group, `1..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Group(u8);

impl Group {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    pub fn new(value: u8) -> Result<Self, GroupOutOfRange> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(GroupOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every group in ascending order.
    pub fn all() -> impl Iterator<Item = Group> {
        (Self::MIN..=Self::MAX).map(Group)
    }

    /// Parse a `g3` style tag (case-insensitive).
    fn parse_tag(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let prefix = chars.next()?;
        let digit = chars.next()?;
        if chars.next().is_some() || !prefix.eq_ignore_ascii_case(&'g') {
            return None;
        }
        let value = digit.to_digit(10)? as u8;
        Self::new(value).ok()
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Structured lookup key for a card image.
///
/// The file stem is `base`, then `g<N>` when a group is known, then `adv` for
/// advanced printings, so `Theo Bell (G2 ADV)` maps to `theobellg2adv`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ImageKey {
    pub base: String,
    pub group: Option<Group>,
    pub advanced: bool,
}

impl ImageKey {
    /// Key for a card that carries no group or advanced annotation.
    pub fn plain(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            group: None,
            advanced: false,
        }
    }

    /// Build a key from a crypt card name, peeling trailing `ADV` and `G1`..`G7`
    /// annotations (parentheses optional) off before normalizing the remainder.
    /// An opening parenthesis also splits a token, so `Ur(Adv)` reads as `Ur (Adv)`.
    pub fn from_crypt_name(raw: &str) -> Self {
        let spaced = raw.replace('(', " (");
        let mut tokens: Vec<&str> = spaced.split_whitespace().collect();
        let mut group = None;
        let mut advanced = false;

        while tokens.len() > 1 {
            let Some(last) = tokens.last() else { break };
            let tag = last.trim_matches(|c| c == '(' || c == ')');
            if !advanced && tag.eq_ignore_ascii_case(ADVANCED_TAG) {
                advanced = true;
            } else if let (None, Some(parsed)) = (group, Group::parse_tag(tag)) {
                group = Some(parsed);
            } else {
                break;
            }
            tokens.pop();
        }

        Self {
            base: normalize(&tokens.join(" ")),
            group,
            advanced,
        }
    }

    pub fn with_group(&self, group: Group) -> Self {
        Self {
            base: self.base.clone(),
            group: Some(group),
            advanced: self.advanced,
        }
    }

    pub fn is_grouped(&self) -> bool {
        self.group.is_some()
    }

    /// Canonical file stem, without extension.
    pub fn file_stem(&self) -> String {
        let mut stem = self.base.clone();
        if let Some(group) = self.group {
            stem.push_str(&group.to_string());
        }
        if self.advanced {
            stem.push_str(ADVANCED_TAG);
        }
        stem
    }

    /// File name inside the image folder.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.file_stem(), IMAGE_EXTENSION)
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_stem())
    }
}
