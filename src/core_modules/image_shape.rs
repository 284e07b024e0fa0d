// THEORY:
// The `ImageShape` module owns all of the index arithmetic that turns a flat sample
// index into a position on a 2D image grid and back again. Every feature view is
// built on top of it, so the rules for "where is this sample" and "where does this
// offset land" live in exactly one place.
//
// Key architectural principles:
// 1.  **Stacked Images**: A sample matrix may hold several equally-shaped images
//     concatenated row-wise. Nothing in the matrix marks where one image ends; the
//     boundary is derived purely from `width * height`. A sample's `image_block` is
//     the first row of the image it belongs to.
// 2.  **Confinement**: Offsets are applied in local (x, y) space and recomposed
//     relative to the same `image_block`. A target can therefore never spill into a
//     neighboring stacked image.
// 3.  **Clamp Border Policy**: An offset that leaves the image is pulled back to the
//     nearest border pixel. No reflection, no wrap.
// 4.  **Signed Intermediates**: Offsets may be negative, so shifted coordinates are
//     carried as `isize` until clamping brings them back into `usize` range.

use serde::{Deserialize, Serialize};

/// The 2D extent shared by every image stacked into a sample matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageShape {
    /// Pixels per row.
    pub width: usize,
    /// Rows per image.
    pub height: usize,
}

/// Where a sample lives: its stacked image and its local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelLocation {
    /// Row index of the first sample of the stacked image containing this sample.
    pub image_block: usize,
    pub x: usize,
    pub y: usize,
}

impl ImageShape {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of samples (rows) occupied by one image, `L = width * height`.
    #[inline]
    pub fn pixels_per_image(&self) -> usize {
        self.width * self.height
    }

    /// True when either dimension is zero. Such a shape cannot locate any sample.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Maps a global sample index onto its stacked image and local (x, y).
    #[inline]
    pub fn locate(&self, sample: usize) -> PixelLocation {
        let per_image = self.pixels_per_image();
        let image_block = (sample / per_image) * per_image;
        let local = sample - image_block;

        PixelLocation {
            image_block,
            x: local % self.width,
            y: local / self.width,
        }
    }

    /// Shifts a location by a signed pixel offset and clamps the result to the image.
    #[inline]
    pub fn shift(&self, location: PixelLocation, dx: isize, dy: isize) -> PixelLocation {
        PixelLocation {
            image_block: location.image_block,
            x: clamp_axis((location.x as isize).saturating_add(dx), self.width),
            y: clamp_axis((location.y as isize).saturating_add(dy), self.height),
        }
    }

    /// Recomposes a location into a global sample index.
    #[inline]
    pub fn index_of(&self, location: PixelLocation) -> usize {
        location.image_block + location.y * self.width + location.x
    }

    /// The global sample index reached from `sample` after applying `(dx, dy)`.
    #[inline]
    pub fn offset_index(&self, sample: usize, dx: isize, dy: isize) -> usize {
        self.index_of(self.shift(self.locate(sample), dx, dy))
    }
}

impl From<(usize, usize)> for ImageShape {
    fn from((width, height): (usize, usize)) -> Self {
        Self::new(width, height)
    }
}

/// Clamps a signed coordinate onto `[0, len - 1]`.
///
/// `len` must be non-zero; every caller holds a non-empty `ImageShape`.
#[inline]
pub fn clamp_axis(coordinate: isize, len: usize) -> usize {
    if coordinate < 0 {
        0
    } else {
        (coordinate as usize).min(len - 1)
    }
}
