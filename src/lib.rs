//! Core library for turning deck lists into printable proxy sheets.

pub mod decklist;
pub mod diagnostics;
mod error;
pub mod imageset;
pub mod layout;
pub mod library;
pub mod naming;
pub mod pdf;
pub mod pipeline;
pub mod resolve;

pub use decklist::{DeckList, DeckListError, Section, SectionMap};
pub use diagnostics::{Diagnostic, Diagnostics, RecordingDiagnostics, TracingDiagnostics};
pub use error::ProxyError;
pub use imageset::{ResolvedImageRef, build_image_set, ordered_images};
pub use layout::{Geometry, LayoutError, PagePlan, Paginator, Placement, PlacementPlan};
pub use library::{ImageFolder, ImageLibrary};
pub use naming::{Group, ImageKey, normalize};
pub use pdf::{PdfError, PdfWriter, WriteSummary};
pub use pipeline::{Pipeline, PipelineConfig, PlannedRun, RunSummary, output_path_for};
pub use resolve::{ResolutionReport, ResolveError, Rewrite, resolve_groups};
