use thiserror::Error;

use crate::decklist::DeckListError;
use crate::layout::LayoutError;
use crate::pdf::PdfError;
use crate::resolve::ResolveError;

/// Any failure that aborts a run.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error(transparent)]
    DeckList(#[from] DeckListError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Pdf(#[from] PdfError),
}
