//! Sink for non-fatal findings raised while resolving a deck.
//!
//! Components report through a [`Diagnostics`] handle instead of a global
//! logger so that tests can inspect exactly what was reported.

use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;

use crate::decklist::Section;
use crate::naming::ImageKey;

/// A non-fatal condition observed during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No file exists for the key; the entry will not be printed.
    MissingImage {
        section: Section,
        key: ImageKey,
        path: PathBuf,
    },
    /// None of the group variants of a crypt card exist.
    UnresolvedGroup { key: ImageKey },
    /// The same card appeared twice in one section; the later quantity wins.
    DuplicateEntry {
        section: Section,
        key: ImageKey,
        line: usize,
        previous: u32,
        quantity: u32,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingImage { section, key, path } => write!(
                f,
                "no image for {} card '{}' (expected {})",
                section,
                key,
                path.display()
            ),
            Diagnostic::UnresolvedGroup { key } => {
                write!(f, "no group variant found for crypt card '{}'", key)
            }
            Diagnostic::DuplicateEntry {
                section,
                key,
                line,
                previous,
                quantity,
            } => write!(
                f,
                "{} card '{}' listed again at line {}; quantity {} replaces {}",
                section, key, line, quantity, previous
            ),
        }
    }
}

/// Receiver for [`Diagnostic`]s.
pub trait Diagnostics {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards every finding to `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
    }
}

/// Keeps findings in memory, in report order.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    entries: RefCell<Vec<Diagnostic>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries.borrow_mut().push(diagnostic);
    }
}
