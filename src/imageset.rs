use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::decklist::{DeckList, Section, SectionMap};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::library::ImageLibrary;

/// An image file confirmed to exist when the set was built.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResolvedImageRef {
    pub path: PathBuf,
}

impl ResolvedImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Expand one section into `quantity` references per card, sorted by path.
///
/// Cards without an image are skipped and reported as [`Diagnostic::MissingImage`].
pub fn build_image_set(
    section: Section,
    entries: &SectionMap,
    library: &dyn ImageLibrary,
    diagnostics: &dyn Diagnostics,
) -> Vec<ResolvedImageRef> {
    let mut images = Vec::new();
    for (key, &quantity) in entries {
        match library.locate(key) {
            Some(path) => {
                let image = ResolvedImageRef::new(path);
                images.extend(std::iter::repeat_n(image, quantity as usize));
            }
            None => diagnostics.report(Diagnostic::MissingImage {
                section,
                key: key.clone(),
                path: library.path_for(key),
            }),
        }
    }
    images.sort();
    images
}

/// Print order for a whole deck: the crypt block, then the library block,
/// each alphabetized by file path.
pub fn ordered_images(
    deck: &DeckList,
    library: &dyn ImageLibrary,
    diagnostics: &dyn Diagnostics,
) -> Vec<ResolvedImageRef> {
    let mut images = build_image_set(Section::Crypt, &deck.crypt, library, diagnostics);
    images.extend(build_image_set(
        Section::Library,
        &deck.library,
        library,
        diagnostics,
    ));
    tracing::debug!(count = images.len(), "image set built");
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingDiagnostics;
    use crate::library::ImageFolder;
    use crate::naming::ImageKey;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn crypt_block_precedes_sorted_library_block() {
        let dir = tempdir().unwrap();
        for name in ["a.jpg", "b.jpg", "deflection.jpg", "blooddoll.jpg"] {
            fs::write(dir.path().join(name), b"jpeg").unwrap();
        }
        let folder = ImageFolder::new(dir.path());
        let mut deck = DeckList::default();
        deck.crypt.insert(ImageKey::plain("a"), 2);
        deck.crypt.insert(ImageKey::plain("b"), 1);
        deck.library.insert(ImageKey::plain("deflection"), 1);
        deck.library.insert(ImageKey::plain("blooddoll"), 2);

        let images = ordered_images(&deck, &folder, &RecordingDiagnostics::new());

        let names: Vec<String> = images
            .iter()
            .map(|img| img.path().file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["a.jpg", "a.jpg", "b.jpg", "blooddoll.jpg", "blooddoll.jpg", "deflection.jpg"]
        );
    }

    #[test]
    fn crypt_block_is_sorted_by_path_not_by_key() {
        let dir = tempdir().unwrap();
        for name in ["zzz.jpg", "abc.jpg"] {
            fs::write(dir.path().join(name), b"jpeg").unwrap();
        }
        let folder = ImageFolder::new(dir.path());
        let mut crypt = SectionMap::new();
        crypt.insert(ImageKey::plain("zzz"), 2);
        crypt.insert(ImageKey::plain("abc"), 1);

        let images = build_image_set(Section::Crypt, &crypt, &folder, &RecordingDiagnostics::new());

        assert_eq!(
            images,
            vec![
                ResolvedImageRef::new(dir.path().join("abc.jpg")),
                ResolvedImageRef::new(dir.path().join("zzz.jpg")),
                ResolvedImageRef::new(dir.path().join("zzz.jpg")),
            ]
        );
    }

    #[test]
    fn missing_images_are_dropped_with_a_warning() {
        let dir = tempdir().unwrap();
        let folder = ImageFolder::new(dir.path());
        let sink = RecordingDiagnostics::new();
        let mut library = SectionMap::new();
        library.insert(ImageKey::plain("bum"), 4);

        let images = build_image_set(Section::Library, &library, &folder, &sink);

        assert!(images.is_empty());
        assert_eq!(
            sink.entries(),
            vec![Diagnostic::MissingImage {
                section: Section::Library,
                key: ImageKey::plain("bum"),
                path: dir.path().join("bum.jpg"),
            }]
        );
    }
}
