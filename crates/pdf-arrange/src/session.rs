//! Session state: the loaded documents and the export orchestration that
//! turns each one into a rebuilt PDF plus its raster pages.

use crate::archive::ArchiveBuilder;
use crate::export::plan;
use crate::page_set::PageSet;
use crate::rasterize::{Rasterizer, is_pdf};
use crate::rebuild::reconstruct;
use crate::types::{ArrangeError, Result};
use std::io::Cursor;

/// One loaded source file. The bytes are immutable after load; only the
/// page set evolves.
pub struct SourceDocument {
    name: String,
    bytes: Vec<u8>,
    pages: PageSet,
}

impl SourceDocument {
    /// Rasterize `bytes` and build the initial page set. Non-PDF payloads
    /// are rejected before any state is created.
    pub fn load(
        name: impl Into<String>,
        bytes: Vec<u8>,
        rasterizer: &dyn Rasterizer,
    ) -> Result<Self> {
        let name = name.into();
        if !is_pdf(&bytes) {
            return Err(ArrangeError::NotAPdf);
        }
        let rasters = rasterizer.rasterize(&bytes)?;
        if rasters.is_empty() {
            return Err(ArrangeError::NoPages);
        }
        log::debug!("loaded {name}: {} pages", rasters.len());
        Ok(Self {
            name,
            bytes,
            pages: PageSet::new(rasters),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name with a trailing `.pdf` stripped, used for archive folders.
    pub fn base_name(&self) -> &str {
        let name = self.name.as_str();
        if name.to_ascii_lowercase().ends_with(".pdf") {
            &name[..name.len() - 4]
        } else {
            name
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn pages(&self) -> &PageSet {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut PageSet {
        &mut self.pages
    }
}

/// Everything produced for one document.
pub struct DocumentExport {
    pub base_name: String,
    /// Rebuilt PDF bytes
    pub pdf: Vec<u8>,
    /// `(file name, PNG bytes)` pairs in export order
    pub images: Vec<(String, Vec<u8>)>,
}

/// Build the export plan, render every unit to PNG and rebuild the output
/// PDF for one document.
pub fn export_document(document: &mut SourceDocument) -> Result<DocumentExport> {
    let export_plan = plan(&mut document.pages)?;
    let source = lopdf::Document::load_mem(&document.bytes)?;
    let pdf = reconstruct(&source, &export_plan)?;

    let mut images = Vec::new();
    for (position, unit) in export_plan.units.iter().enumerate() {
        let mut encoded = Vec::new();
        unit.raster
            .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)?;
        images.push((format!("page{}.png", position + 1), encoded));
    }

    Ok(DocumentExport {
        base_name: document.base_name().to_string(),
        pdf,
        images,
    })
}

/// A document that failed to export, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedExport {
    pub name: String,
    pub reason: String,
}

/// Result of packaging a whole session.
pub struct ArchiveSummary {
    /// ZIP archive bytes
    pub archive: Vec<u8>,
    /// Number of documents exported successfully
    pub exported: usize,
    /// Documents that failed; never silently omitted
    pub failures: Vec<FailedExport>,
}

/// Owns the loaded documents. All operators run against a document obtained
/// from the session, so independent sessions never share state.
#[derive(Default)]
pub struct Session {
    documents: Vec<SourceDocument>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, document: SourceDocument) {
        self.documents.push(document);
    }

    /// Drop every document, ready for a new batch.
    pub fn reset(&mut self) {
        self.documents.clear();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[SourceDocument] {
        &self.documents
    }

    pub fn document_mut(&mut self, index: usize) -> Option<&mut SourceDocument> {
        self.documents.get_mut(index)
    }

    /// Export every document into one archive, laid out as
    /// `<base>/<base>.pdf` plus `<base>/images/page<N>.png` per document.
    ///
    /// A failing document does not block the others; it is recorded in the
    /// summary instead.
    pub fn package(&mut self) -> Result<ArchiveSummary> {
        let mut builder = ArchiveBuilder::new();
        let mut failures = Vec::new();
        let mut exported = 0;

        for document in &mut self.documents {
            match export_document(document) {
                Ok(export) => {
                    let base = &export.base_name;
                    builder.add_file(&format!("{base}/{base}.pdf"), &export.pdf)?;
                    for (file_name, png) in &export.images {
                        builder.add_file(&format!("{base}/images/{file_name}"), png)?;
                    }
                    exported += 1;
                }
                Err(err) => {
                    log::warn!("export failed for {}: {err}", document.name());
                    failures.push(FailedExport {
                        name: document.name().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(ArchiveSummary {
            archive: builder.finalize()?,
            exported,
            failures,
        })
    }
}
