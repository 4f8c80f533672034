//! Deterministic raster compositing for merge groups.
//!
//! All layouts share the same rules: the canvas is filled with opaque white,
//! a smaller image is centered (never scaled or cropped) within the shared
//! dimension, and placement is a pure function of the inputs.

use crate::types::{ArrangeError, MergeMode, Result};
use image::{Rgba, RgbaImage, imageops};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Lay out 2 or 4 page rasters into one canvas according to `mode`.
///
/// `Vertical` and `Horizontal` take exactly two images, `Grid` exactly four
/// (top-left, top-right, bottom-left, bottom-right). Any other combination
/// is a contract violation reported as [`ArrangeError::Composite`].
pub fn composite(mode: MergeMode, images: &[&RgbaImage]) -> Result<RgbaImage> {
    match mode {
        MergeMode::None => Err(ArrangeError::Composite(
            "cannot composite without a merge mode".to_string(),
        )),
        MergeMode::Vertical => {
            expect_arity(mode, images, 2)?;
            Ok(stack_vertical(images[0], images[1]))
        }
        MergeMode::Horizontal => {
            expect_arity(mode, images, 2)?;
            Ok(stack_horizontal(images[0], images[1]))
        }
        MergeMode::Grid => {
            expect_arity(mode, images, 4)?;
            Ok(grid([images[0], images[1], images[2], images[3]]))
        }
    }
}

fn expect_arity(mode: MergeMode, images: &[&RgbaImage], want: usize) -> Result<()> {
    if images.len() == want {
        Ok(())
    } else {
        Err(ArrangeError::Composite(format!(
            "{mode:?} merge needs {want} images, got {}",
            images.len()
        )))
    }
}

/// First image on top, second below, each horizontally centered.
fn stack_vertical(top: &RgbaImage, bottom: &RgbaImage) -> RgbaImage {
    let width = top.width().max(bottom.width());
    let height = top.height() + bottom.height();
    let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND);
    place(&mut canvas, top, (width - top.width()) / 2, 0);
    place(&mut canvas, bottom, (width - bottom.width()) / 2, top.height());
    canvas
}

/// First image on the left, second to its right, each vertically centered.
fn stack_horizontal(left: &RgbaImage, right: &RgbaImage) -> RgbaImage {
    let width = left.width() + right.width();
    let height = left.height().max(right.height());
    let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND);
    place(&mut canvas, left, 0, (height - left.height()) / 2);
    place(&mut canvas, right, left.width(), (height - right.height()) / 2);
    canvas
}

/// 2x2 layout. Column widths and row heights are the maxima of the images
/// sharing them; each image is centered within its quadrant's band.
fn grid(quads: [&RgbaImage; 4]) -> RgbaImage {
    let [top_left, top_right, bottom_left, bottom_right] = quads;

    let left_width = top_left.width().max(bottom_left.width());
    let right_width = top_right.width().max(bottom_right.width());
    let top_height = top_left.height().max(top_right.height());
    let bottom_height = bottom_left.height().max(bottom_right.height());

    let mut canvas = RgbaImage::from_pixel(
        left_width + right_width,
        top_height + bottom_height,
        BACKGROUND,
    );
    place(
        &mut canvas,
        top_left,
        (left_width - top_left.width()) / 2,
        (top_height - top_left.height()) / 2,
    );
    place(
        &mut canvas,
        top_right,
        left_width + (right_width - top_right.width()) / 2,
        (top_height - top_right.height()) / 2,
    );
    place(
        &mut canvas,
        bottom_left,
        (left_width - bottom_left.width()) / 2,
        top_height + (bottom_height - bottom_left.height()) / 2,
    );
    place(
        &mut canvas,
        bottom_right,
        left_width + (right_width - bottom_right.width()) / 2,
        top_height + (bottom_height - bottom_right.height()) / 2,
    );
    canvas
}

fn place(canvas: &mut RgbaImage, img: &RgbaImage, x: u32, y: u32) {
    imageops::replace(canvas, img, i64::from(x), i64::from(y));
}

// =============================================================================
// Tests
// =============================================================================
