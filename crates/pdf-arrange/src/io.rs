//! Async file I/O around the engine.

use crate::types::Result;
use std::path::Path;

#[cfg(feature = "pdfium")]
use crate::session::SourceDocument;

/// Read and rasterize a single PDF file.
#[cfg(feature = "pdfium")]
pub async fn load_document(path: impl AsRef<Path>) -> Result<SourceDocument> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());

    // Pdfium is not Send, so it is bound inside the blocking task.
    tokio::task::spawn_blocking(move || {
        let rasterizer = crate::rasterize::PdfiumRasterizer::new()?;
        SourceDocument::load(name, bytes, &rasterizer)
    })
    .await?
}

/// Read and rasterize multiple PDF files.
#[cfg(feature = "pdfium")]
pub async fn load_documents(paths: &[impl AsRef<Path>]) -> Result<Vec<SourceDocument>> {
    let mut documents = Vec::new();
    for path in paths {
        documents.push(load_document(path).await?);
    }
    Ok(documents)
}

/// Write the finished archive to disk.
pub async fn write_archive(path: impl AsRef<Path>, bytes: Vec<u8>) -> Result<()> {
    tokio::fs::write(path.as_ref(), bytes).await?;
    Ok(())
}
