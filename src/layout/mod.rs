//! Grid layout of resolved images onto fixed-size pages.

mod geometry;
mod paginate;

pub use geometry::{A4_HEIGHT_PT, A4_WIDTH_PT, Geometry, LayoutError};
pub use paginate::{PagePlan, Paginator, Placement, PlacementPlan};
