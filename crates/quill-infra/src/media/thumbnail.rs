//! Thumbnailing with the `image` crate.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage};

use quill_core::ports::{ImageProcessor, MediaError};

/// Shrinks JPEG and PNG pictures to fit a bounding box.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThumbnailProcessor;

impl ImageProcessor for ThumbnailProcessor {
    fn thumbnail(
        &self,
        bytes: &[u8],
        extension: &str,
        max_width: u32,
        max_height: u32,
    ) -> Result<Vec<u8>, MediaError> {
        let target = output_format(extension)?;
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| MediaError::Decode(e.to_string()))?;

        let source = match reader.format() {
            Some(f @ (ImageFormat::Jpeg | ImageFormat::Png)) => f,
            Some(other) => return Err(MediaError::UnsupportedFormat(format!("{other:?}"))),
            None => return Err(MediaError::Decode("unrecognised image data".to_string())),
        };

        let img = reader
            .decode()
            .map_err(|e| MediaError::Decode(e.to_string()))?;

        // `thumbnail` keeps the aspect ratio; never upscale small pictures.
        let img = if img.width() > max_width || img.height() > max_height {
            img.thumbnail(max_width, max_height)
        } else {
            img
        };

        // JPEG has no alpha channel.
        let img = match target {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
            _ => img,
        };

        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, target)
            .map_err(|e| MediaError::Encode(e.to_string()))?;

        tracing::debug!(
            width = img.width(),
            height = img.height(),
            ?source,
            ?target,
            "picture resized"
        );
        Ok(out.into_inner())
    }
}

fn output_format(extension: &str) -> Result<ImageFormat, MediaError> {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "png" => Ok(ImageFormat::Png),
        other => Err(MediaError::UnsupportedFormat(other.to_string())),
    }
}

/// Plain grey JPEG served for accounts without an uploaded picture.
pub fn placeholder_jpeg(size: u32) -> Result<Vec<u8>, MediaError> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(size, size, Rgb([200, 200, 200])));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Jpeg)
        .map_err(|e| MediaError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}
