//! One end-to-end run: deck list in, proxy sheet out.

use std::path::{Path, PathBuf};

use crate::decklist::DeckList;
use crate::diagnostics::Diagnostics;
use crate::error::ProxyError;
use crate::imageset::ordered_images;
use crate::layout::{Geometry, Paginator, PlacementPlan};
use crate::library::ImageFolder;
use crate::pdf::PdfWriter;
use crate::resolve::{ResolutionReport, resolve_groups};

/// File written when the deck list name has no 4-character extension to swap.
pub const FALLBACK_OUTPUT: &str = "output.pdf";
const OUTPUT_EXTENSION: &str = ".pdf";

/// `decks/toreador.txt` becomes `decks/toreador.pdf`; names without a
/// 4-character extension fall back to [`FALLBACK_OUTPUT`].
pub fn output_path_for(deck_list: &Path) -> PathBuf {
    let name = deck_list
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let chars: Vec<char> = name.chars().collect();
    if chars.len() > 4 && chars[chars.len() - 4] == '.' {
        let stem: String = chars[..chars.len() - 4].iter().collect();
        deck_list.with_file_name(format!("{stem}{OUTPUT_EXTENSION}"))
    } else {
        PathBuf::from(FALLBACK_OUTPUT)
    }
}

/// Inputs for a run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub deck_list: PathBuf,
    pub image_folder: PathBuf,
    pub output: PathBuf,
    pub geometry: Geometry,
}

impl PipelineConfig {
    /// Default geometry, output derived from the deck list name.
    pub fn new(deck_list: impl Into<PathBuf>, image_folder: impl Into<PathBuf>) -> Self {
        let deck_list = deck_list.into();
        Self {
            output: output_path_for(&deck_list),
            deck_list,
            image_folder: image_folder.into(),
            geometry: Geometry::default(),
        }
    }
}

/// Everything computed before the document is written.
#[derive(Debug, Clone)]
pub struct PlannedRun {
    pub deck: DeckList,
    pub resolution: ResolutionReport,
    pub plan: PlacementPlan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub requested: u64,
    pub placed: usize,
    pub pages: usize,
    pub resolved_groups: usize,
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parse, resolve, and lay out the deck without writing anything.
    pub fn plan(&self, diagnostics: &dyn Diagnostics) -> Result<PlannedRun, ProxyError> {
        let paginator = Paginator::new(self.config.geometry)?;
        let library = ImageFolder::new(&self.config.image_folder);

        let mut deck = DeckList::load(&self.config.deck_list, diagnostics)?;
        tracing::info!(
            library = deck.library.len(),
            crypt = deck.crypt.len(),
            "deck list loaded"
        );
        let resolution = resolve_groups(&mut deck.crypt, &library, diagnostics)?;
        let images = ordered_images(&deck, &library, diagnostics);
        let plan = paginator.paginate(&images);

        Ok(PlannedRun {
            deck,
            resolution,
            plan,
        })
    }

    /// Plan the run and write the proxy sheet.
    pub fn run(&self, diagnostics: &dyn Diagnostics) -> Result<RunSummary, ProxyError> {
        let planned = self.plan(diagnostics)?;
        let written =
            PdfWriter::new(self.config.geometry).write(&planned.plan, &self.config.output)?;
        let summary = RunSummary {
            output: self.config.output.clone(),
            requested: planned.deck.total_copies(),
            placed: written.placements,
            pages: written.pages,
            resolved_groups: planned.resolution.rewrites.len(),
        };
        if (summary.placed as u64) < summary.requested {
            tracing::warn!(
                requested = summary.requested,
                placed = summary.placed,
                "some cards have no image and were left out"
            );
        }
        Ok(summary)
    }
}
