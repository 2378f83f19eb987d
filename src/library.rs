use std::path::PathBuf;

use crate::naming::ImageKey;

/// Lookup capability for card images.
pub trait ImageLibrary {
    /// Path the key would live at, whether or not it exists.
    fn path_for(&self, key: &ImageKey) -> PathBuf;

    /// Existing image for the key, if any.
    fn locate(&self, key: &ImageKey) -> Option<PathBuf>;
}

/// Image library backed by a directory of `<stem>.jpg` files.
#[derive(Debug, Clone)]
pub struct ImageFolder {
    root: PathBuf,
}

impl ImageFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageLibrary for ImageFolder {
    fn path_for(&self, key: &ImageKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    fn locate(&self, key: &ImageKey) -> Option<PathBuf> {
        let path = self.path_for(key);
        tracing::debug!(path = %path.display(), "probing image");
        path.is_file().then_some(path)
    }
}
