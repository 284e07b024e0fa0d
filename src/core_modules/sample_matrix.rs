// THEORY:
// The `SampleMatrix` is the bridge between decoded images and the feature views. It
// flattens one or more equally-shaped images into a single `(sample, channel)` array,
// one row per pixel in row-major scan order, images stacked one after another.
//
// Key architectural principles:
// 1.  **Owner, Not View**: This is the one place that owns pixel data. Feature views
//     only ever borrow it through `view()`, so the borrow checker enforces that the
//     matrix outlives every view built on it.
// 2.  **Validated At The Edge**: Shape problems (mismatched image sizes, truncated
//     frame buffers, a trailing partial image, a zero-sized image) are reported here
//     as `FeatureError`s. Every constructor leaves a whole number of images, so past
//     this point evaluation cannot fail.
// 3.  **Scale Channel**: Scale-invariant features read their scale from channel 0.
//     `with_scale_channel` prepends such a column to an existing matrix.

use crate::core_modules::feature::FeatureScalar;
use crate::core_modules::image_shape::ImageShape;
use crate::error::{FeatureError, Result};
use image::{ImageBuffer, Pixel};
use ndarray::{Array1, Array2, ArrayView2, Axis, concatenate};
use std::ops::Deref;
use tracing::debug;

/// Owned `(samples, channels)` matrix built from stacked images.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleMatrix<T> {
    data: Array2<T>,
    image_shape: ImageShape,
}

impl<T: FeatureScalar> SampleMatrix<T> {
    /// Wraps an existing array. Rows must already be in stacked scan order and
    /// cover a whole number of images.
    pub fn from_array(data: Array2<T>, image_shape: ImageShape) -> Result<Self> {
        check_shape(image_shape)?;
        check_whole_images(image_shape, data.nrows())?;
        Ok(Self { data, image_shape })
    }

    /// Stacks equally-sized images, one row per pixel and one column per channel.
    pub fn from_images<P, C>(images: &[ImageBuffer<P, C>]) -> Result<Self>
    where
        P: Pixel,
        C: Deref<Target = [P::Subpixel]>,
        T: From<P::Subpixel>,
    {
        let first = images.first().ok_or(FeatureError::NoImages)?;
        let image_shape = ImageShape::new(first.width() as usize, first.height() as usize);
        check_shape(image_shape)?;

        let per_image = image_shape.pixels_per_image();
        let channels = P::CHANNEL_COUNT as usize;
        let mut values = Vec::with_capacity(per_image * images.len() * channels);

        for (index, img) in images.iter().enumerate() {
            let actual = img.width() as usize * img.height() as usize;
            if img.width() as usize != image_shape.width || actual != per_image {
                return Err(FeatureError::ImageSizeMismatch {
                    index,
                    expected: per_image,
                    actual,
                });
            }
            for pixel in img.pixels() {
                values.extend(pixel.channels().iter().map(|&c| T::from(c)));
            }
        }

        let data = Array2::from_shape_vec((per_image * images.len(), channels), values)?;
        debug!(
            images = images.len(),
            width = image_shape.width,
            height = image_shape.height,
            channels,
            "stacked images into sample matrix"
        );
        Ok(Self { data, image_shape })
    }

    /// Reads a raw interleaved frame buffer (e.g. RGBA bytes) holding one or more
    /// stacked frames of `image_shape`.
    pub fn from_interleaved(bytes: &[u8], image_shape: ImageShape, channels: usize) -> Result<Self>
    where
        T: From<u8>,
    {
        check_shape(image_shape)?;
        if channels == 0 {
            return Err(FeatureError::ChannelCount {
                expected: 1,
                actual: 0,
            });
        }

        let frame_len = image_shape.pixels_per_image() * channels;
        if bytes.is_empty() || bytes.len() % frame_len != 0 {
            return Err(FeatureError::BufferSizeMismatch {
                expected: frame_len,
                actual: bytes.len(),
            });
        }

        let rows = bytes.len() / channels;
        let values = bytes.iter().map(|&b| T::from(b)).collect();
        let data = Array2::from_shape_vec((rows, channels), values)?;
        debug!(
            frames = bytes.len() / frame_len,
            channels, "read interleaved frame buffer"
        );
        Ok(Self { data, image_shape })
    }

    /// Prepends `scale` as channel 0, shifting every existing channel right by one.
    pub fn with_scale_channel(self, scale: Vec<T>) -> Result<Self> {
        if scale.len() != self.n_samples() {
            return Err(FeatureError::BufferSizeMismatch {
                expected: self.n_samples(),
                actual: scale.len(),
            });
        }
        let column = Array1::from_vec(scale).insert_axis(Axis(1));
        let data = concatenate(Axis(1), &[column.view(), self.data.view()])?;
        Ok(Self {
            data,
            image_shape: self.image_shape,
        })
    }

    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    pub fn image_shape(&self) -> ImageShape {
        self.image_shape
    }

    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_channels(&self) -> usize {
        self.data.ncols()
    }

    /// Number of whole images stacked in the matrix.
    pub fn image_count(&self) -> usize {
        self.n_samples() / self.image_shape.pixels_per_image()
    }

    pub fn into_array(self) -> Array2<T> {
        self.data
    }
}

fn check_whole_images(image_shape: ImageShape, samples: usize) -> Result<()> {
    let pixels_per_image = image_shape.pixels_per_image();
    if samples % pixels_per_image != 0 {
        return Err(FeatureError::PartialImage {
            pixels_per_image,
            samples,
        });
    }
    Ok(())
}

fn check_shape(image_shape: ImageShape) -> Result<()> {
    if image_shape.is_empty() {
        return Err(FeatureError::EmptyImageShape {
            width: image_shape.width,
            height: image_shape.height,
        });
    }
    Ok(())
}
