use serde::Serialize;

use super::geometry::{Geometry, LayoutError};
use crate::imageset::ResolvedImageRef;

/// One image placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub image: ResolvedImageRef,
    pub row: usize,
    pub column: usize,
    /// Lower-left corner in PDF points.
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagePlan {
    pub cells: Vec<Placement>,
}

/// Pages in print order, cells row-major within each page.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PlacementPlan {
    pub pages: Vec<PagePlan>,
}

impl PlacementPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn image_count(&self) -> usize {
        self.pages.iter().map(|page| page.cells.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Lays images out on a fixed grid.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    geometry: Geometry,
}

impl Paginator {
    pub fn new(geometry: Geometry) -> Result<Self, LayoutError> {
        geometry.validate()?;
        Ok(Self { geometry })
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Fill pages left to right, top to bottom. The final page keeps only the
    /// cells it needs; nothing is padded.
    pub fn paginate(&self, images: &[ResolvedImageRef]) -> PlacementPlan {
        let per_row = self.geometry.images_per_row;
        let pages = images
            .chunks(self.geometry.cells_per_page())
            .map(|chunk| PagePlan {
                cells: chunk
                    .iter()
                    .enumerate()
                    .map(|(idx, image)| {
                        let (row, column) = (idx / per_row, idx % per_row);
                        let (x, y) = self.geometry.cell_origin(row, column);
                        Placement {
                            image: image.clone(),
                            row,
                            column,
                            x,
                            y,
                        }
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();
        tracing::debug!(
            images = images.len(),
            pages = pages.len(),
            "paginated image set"
        );
        PlacementPlan { pages }
    }
}
