//! Photo decoding and sizing.
//!
//! The collector hands over raw bytes without a declared type. The format is
//! sniffed from the content, the image is fully decoded to prove it is
//! readable, and formats Word cannot display natively are re-encoded as PNG.

use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

use crate::error::{Error, Result};
use crate::model::{MediaFormat, Photo, Resource};
use crate::options::EMU_PER_PIXEL;

/// A photo that decoded successfully and is ready to embed.
#[derive(Debug, Clone)]
pub struct DecodedPhoto {
    /// Encoding of `data`
    pub format: MediaFormat,
    /// Bytes to store in the package
    pub data: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
    /// Whether `data` was produced by re-encoding
    pub converted: bool,
}

impl DecodedPhoto {
    /// Turn the photo into a package resource.
    pub fn into_resource(self) -> Resource {
        Resource::image(self.format, self.data).with_dimensions(self.width_px, self.height_px)
    }
}

/// Decode photo bytes, detecting the format from the content.
///
/// Fails with [`Error::UnreadablePhoto`] when the bytes are not a supported
/// image or are truncated/corrupt.
pub fn decode_photo(photo: &Photo) -> Result<DecodedPhoto> {
    let reader = ImageReader::new(Cursor::new(photo.data.as_slice()))
        .with_guessed_format()
        .map_err(|e| Error::UnreadablePhoto(format!("Failed to guess format: {e}")))?;

    let source_format = reader
        .format()
        .ok_or_else(|| Error::UnreadablePhoto("Unrecognized image format".to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| Error::UnreadablePhoto(format!("Failed to decode image: {e}")))?;

    let (width_px, height_px) = img.dimensions();
    if width_px == 0 || height_px == 0 {
        return Err(Error::UnreadablePhoto("Image has no pixels".to_string()));
    }

    match native_format(source_format) {
        Some(format) => Ok(DecodedPhoto {
            format,
            data: photo.data.clone(),
            width_px,
            height_px,
            converted: false,
        }),
        None => {
            tracing::debug!(?source_format, "Re-encoding photo as PNG");
            Ok(DecodedPhoto {
                format: MediaFormat::Png,
                data: encode_png(&img)?,
                width_px,
                height_px,
                converted: true,
            })
        }
    }
}

fn native_format(format: ImageFormat) -> Option<MediaFormat> {
    match format {
        ImageFormat::Png => Some(MediaFormat::Png),
        ImageFormat::Jpeg => Some(MediaFormat::Jpeg),
        ImageFormat::Gif => Some(MediaFormat::Gif),
        ImageFormat::Bmp => Some(MediaFormat::Bmp),
        _ => None,
    }
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
    let mut buf = Vec::new();
    rgba.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| Error::UnreadablePhoto(format!("Failed to re-encode image: {e}")))?;
    Ok(buf)
}

/// Display size in EMUs: natural size at 96 DPI, longer side capped at
/// `max_emu`, aspect ratio preserved.
pub fn display_size(width_px: u32, height_px: u32, max_emu: u64) -> (u64, u64) {
    let width = width_px as u64 * EMU_PER_PIXEL;
    let height = height_px as u64 * EMU_PER_PIXEL;
    let longer = width.max(height);

    if longer <= max_emu || longer == 0 {
        return (width, height);
    }

    let scale = |side: u64| ((side as u128 * max_emu as u128) / longer as u128).max(1) as u64;
    (scale(width), scale(height))
}
