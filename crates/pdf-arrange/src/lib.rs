pub mod archive;
pub mod compositor;
pub mod export;
mod io;
pub mod merge;
mod page_set;
mod plan;
mod rasterize;
pub mod rebuild;
mod session;
mod stats;
mod types;

pub use export::{ExportPlan, ExportUnit, UnitSource, plan};
#[cfg(feature = "pdfium")]
pub use io::{load_document, load_documents};
pub use io::write_archive;
pub use merge::{can_start_grid, can_start_pair};
pub use page_set::{PageSet, PageSlot};
pub use plan::{ArrangementPlan, PlanOp};
#[cfg(feature = "pdfium")]
pub use rasterize::PdfiumRasterizer;
pub use rasterize::{RASTER_SCALE, Rasterizer, is_pdf};
pub use rebuild::{PageAssembler, reconstruct};
pub use session::{
    ArchiveSummary, DocumentExport, FailedExport, Session, SourceDocument, export_document,
};
pub use stats::calculate_statistics;
pub use types::*;
