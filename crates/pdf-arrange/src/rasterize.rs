//! Rasterizer seam: turning document bytes into per-page images.

use crate::types::Result;
use image::RgbaImage;

/// Render scale applied to every page (twice the nominal page size).
pub const RASTER_SCALE: f32 = 2.0;

/// Anything that can turn a PDF byte stream into one raster per page, in
/// source order.
pub trait Rasterizer {
    fn rasterize(&self, bytes: &[u8]) -> Result<Vec<RgbaImage>>;
}

/// Signature check used to reject non-PDF payloads before any page state is
/// created.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-")
}

#[cfg(feature = "pdfium")]
mod pdfium {
    use super::{RASTER_SCALE, Rasterizer};
    use crate::types::{ArrangeError, Result};
    use image::RgbaImage;
    use pdfium_render::prelude::*;

    /// Pdfium-backed rasterizer.
    pub struct PdfiumRasterizer {
        pdfium: Pdfium,
    }

    impl PdfiumRasterizer {
        pub fn new() -> Result<Self> {
            let pdfium = init_pdfium().map_err(|e| ArrangeError::Render(e.to_string()))?;
            Ok(Self { pdfium })
        }
    }

    /// Initialize Pdfium, trying the vendored library first, then falling
    /// back to system
    fn init_pdfium() -> std::result::Result<Pdfium, PdfiumError> {
        let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
            p.push("vendor/pdfium/lib");
            if p.exists() { Some(p) } else { None }
        });

        if let Some(vendor_path) = vendor_path {
            if let Ok(binding) =
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
            {
                return Ok(Pdfium::new(binding));
            }
        }

        Pdfium::bind_to_system_library().map(Pdfium::new)
    }

    impl Rasterizer for PdfiumRasterizer {
        fn rasterize(&self, bytes: &[u8]) -> Result<Vec<RgbaImage>> {
            let document = self
                .pdfium
                .load_pdf_from_byte_slice(bytes, None)
                .map_err(|e| ArrangeError::Render(e.to_string()))?;

            let config = PdfRenderConfig::new().scale_page_by_factor(RASTER_SCALE);
            let mut rasters = Vec::new();
            for page in document.pages().iter() {
                let bitmap = page
                    .render_with_config(&config)
                    .map_err(|e| ArrangeError::Render(e.to_string()))?;
                let width = bitmap.width() as u32;
                let height = bitmap.height() as u32;
                let rgba_data = bitmap.as_rgba_bytes().to_vec();
                let raster = RgbaImage::from_raw(width, height, rgba_data)
                    .ok_or_else(|| ArrangeError::Render("page bitmap size mismatch".into()))?;
                rasters.push(raster);
            }
            Ok(rasters)
        }
    }
}

#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumRasterizer;
