//! Crypt group resolution.
//!
//! A crypt card printed in several groups ships one image per group
//! (`draculag3.jpg`, `draculag5.jpg`, ...). Deck lists usually name the card
//! without its group, so each un-grouped crypt key is matched against the
//! images that actually exist and rewritten to the single variant found.

use thiserror::Error;

use crate::decklist::SectionMap;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::library::ImageLibrary;
use crate::naming::{Group, ImageKey};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("crypt card '{key}' matches several groups ({}); remove the extra images", format_groups(.matched_groups))]
    AmbiguousGroup {
        key: ImageKey,
        matched_groups: Vec<Group>,
    },
}

/// A key rewritten to its grouped variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub from: ImageKey,
    pub to: ImageKey,
}

/// Outcome of a successful resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    pub rewrites: Vec<Rewrite>,
    pub unresolved: Vec<ImageKey>,
}

enum Outcome {
    Keep,
    Rewrite(ImageKey),
}

/// Rewrite every un-grouped crypt key to the one group variant present in the
/// library.
///
/// The pass reads a snapshot of `crypt` and swaps in the rebuilt map only once
/// every entry has been resolved, so an ambiguity leaves `crypt` untouched.
pub fn resolve_groups(
    crypt: &mut SectionMap,
    library: &dyn ImageLibrary,
    diagnostics: &dyn Diagnostics,
) -> Result<ResolutionReport, ResolveError> {
    tracing::debug!(entries = crypt.len(), "resolving crypt groups");
    let mut report = ResolutionReport::default();
    let mut resolved = SectionMap::new();

    for (key, &quantity) in crypt.iter() {
        let target = match resolve_key(key, library, diagnostics)? {
            Outcome::Keep => key.clone(),
            Outcome::Rewrite(grouped) => {
                tracing::info!(from = %key, to = %grouped, "resolved crypt group");
                report.rewrites.push(Rewrite {
                    from: key.clone(),
                    to: grouped.clone(),
                });
                grouped
            }
        };
        if target == *key && !key.is_grouped() {
            report.unresolved.push(key.clone());
        }
        let total = resolved.entry(target).or_insert(0);
        *total = total.saturating_add(quantity);
    }

    *crypt = resolved;
    Ok(report)
}

fn resolve_key(
    key: &ImageKey,
    library: &dyn ImageLibrary,
    diagnostics: &dyn Diagnostics,
) -> Result<Outcome, ResolveError> {
    // Missing grouped images are reported once, by the image set builder.
    if key.is_grouped() {
        if library.locate(key).is_none() {
            tracing::debug!(key = %key, "no image for grouped crypt card");
        }
        return Ok(Outcome::Keep);
    }

    let matched: Vec<Group> = Group::all()
        .filter(|&group| library.locate(&key.with_group(group)).is_some())
        .collect();

    match matched.as_slice() {
        [] => {
            diagnostics.report(Diagnostic::UnresolvedGroup { key: key.clone() });
            Ok(Outcome::Keep)
        }
        [group] => Ok(Outcome::Rewrite(key.with_group(*group))),
        _ => {
            tracing::error!(key = %key, groups = %format_groups(&matched), "ambiguous crypt group");
            Err(ResolveError::AmbiguousGroup {
                key: key.clone(),
                matched_groups: matched,
            })
        }
    }
}

fn format_groups(groups: &[Group]) -> String {
    groups
        .iter()
        .map(Group::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
