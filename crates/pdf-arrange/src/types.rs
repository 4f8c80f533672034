use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArrangeError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("render error: {0}")]
    Render(String),
    #[error("not a PDF file")]
    NotAPdf,
    #[error("document has no pages")]
    NoPages,
    #[error("page {0} not present in the source document")]
    PageOutOfRange(usize),
    #[error("invalid composite input: {0}")]
    Composite(String),
    #[error("invalid plan: {0}")]
    Plan(String),
}

pub type Result<T> = std::result::Result<T, ArrangeError>;

/// Raster handle shared between slots, composite caches and export units.
pub type PageRaster = Arc<image::RgbaImage>;

/// Merge shape a slot may start. A slot with any mode other than `None`
/// collapses itself and the following 1 or 3 slots into one exported unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MergeMode {
    /// The slot is exported as a single page
    #[default]
    None,
    /// Two pages stacked top to bottom
    Vertical,
    /// Two pages placed side by side
    Horizontal,
    /// Four pages in a 2x2 grid
    Grid,
}

impl MergeMode {
    /// Number of consecutive slots a group of this shape occupies.
    pub fn group_len(self) -> usize {
        match self {
            MergeMode::None => 1,
            MergeMode::Vertical | MergeMode::Horizontal => 2,
            MergeMode::Grid => 4,
        }
    }
}

/// Direction for manual page movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MoveDirection {
    /// Swap with the previous slot
    Backward,
    /// Swap with the next slot
    Forward,
}

/// Statistics about the export of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportStatistics {
    /// Total number of source pages
    pub source_pages: usize,
    /// Number of units the export plan will emit
    pub export_units: usize,
    /// Number of units that are merged composites
    pub merged_groups: usize,
    /// Number of units that pass a single original page through
    pub passthrough_pages: usize,
}
