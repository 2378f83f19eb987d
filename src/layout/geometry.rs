use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const PT_PER_CM: f32 = 28.35;
const CARD_WIDTH_CM: f32 = 6.35;
const CARD_HEIGHT_CM: f32 = 8.89;
/// A4 in PDF points (210 x 297 mm at 72 pt per inch).
pub const A4_WIDTH_PT: f32 = 210.0 / 25.4 * 72.0;
pub const A4_HEIGHT_PT: f32 = 297.0 / 25.4 * 72.0;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid page geometry: {0}")]
    InvalidGeometry(String),
    #[error("failed to read layout file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse layout file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Page and grid dimensions, in PDF points.
///
/// Every field is optional in a layout file; missing fields keep the default
/// 3x3 poker-size grid on A4.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Geometry {
    pub cell_width: f32,
    pub cell_height: f32,
    pub images_per_row: usize,
    pub rows_per_page: usize,
    pub margin: f32,
    pub x_offset: f32,
    pub y_offset: f32,
    pub page_width: f32,
    pub page_height: f32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            cell_width: CARD_WIDTH_CM * PT_PER_CM,
            cell_height: CARD_HEIGHT_CM * PT_PER_CM,
            images_per_row: 3,
            rows_per_page: 3,
            margin: 1.0,
            x_offset: 25.0,
            y_offset: 25.0,
            page_width: A4_WIDTH_PT,
            page_height: A4_HEIGHT_PT,
        }
    }
}

impl Geometry {
    /// Load overrides from a JSON layout file and validate the result.
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let raw = fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let geometry: Geometry =
            serde_json::from_str(&raw).map_err(|source| LayoutError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn cells_per_page(&self) -> usize {
        self.images_per_row * self.rows_per_page
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.images_per_row == 0 || self.rows_per_page == 0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "grid must have at least one row and column (got {}x{})",
                self.images_per_row, self.rows_per_page
            )));
        }
        if self.images_per_row.checked_mul(self.rows_per_page).is_none() {
            return Err(LayoutError::InvalidGeometry(format!(
                "grid of {}x{} cells is too large",
                self.images_per_row, self.rows_per_page
            )));
        }
        for (name, value) in [
            ("cell_width", self.cell_width),
            ("cell_height", self.cell_height),
            ("page_width", self.page_width),
            ("page_height", self.page_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::InvalidGeometry(format!(
                    "{} must be positive (got {})",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("margin", self.margin),
            ("x_offset", self.x_offset),
            ("y_offset", self.y_offset),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LayoutError::InvalidGeometry(format!(
                    "{} must not be negative (got {})",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Lower-left corner of the cell at `row`, `col` (PDF coordinates).
    pub fn cell_origin(&self, row: usize, col: usize) -> (f32, f32) {
        let x = self.x_offset + col as f32 * (self.cell_width + self.margin);
        let y = self.page_height
            - self.y_offset
            - self.cell_height
            - row as f32 * (self.cell_height + self.margin);
        (x, y)
    }
}
