//! PDF output for placement plans.

mod embed;
mod writer;

use std::path::PathBuf;

use thiserror::Error;

pub use writer::{PdfWriter, WriteSummary};

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to load image {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode page content")]
    Content(#[from] lopdf::Error),
}
