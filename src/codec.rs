// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Decoding PNG/JPEG input into [`PixelBuffer`] and encoding PNG output.
//!
//! Every decoded image is normalized to [`Layout::Rgba`]. Gray, gray-alpha,
//! palette and RGB sources map into it without loss. Sources with more than
//! 8 bits per channel are reduced to 8 bits.

use std::io::Cursor;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::io::{Limits, Reader as ImageReader};
use image::{ImageEncoder, ImageFormat};

use crate::error::{DecodeError, EncodeError, Result};
use crate::pixels::{Layout, PixelBuffer};

/// Input formats the decoder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Png,
    Jpeg,
}

impl SourceFormat {
    /// Identifies the format from the leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }
        let format = image::guess_format(bytes).map_err(|_| DecodeError::UnknownFormat)?;
        Self::try_from(format)
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
        }
    }
}

impl TryFrom<ImageFormat> for SourceFormat {
    type Error = DecodeError;

    fn try_from(format: ImageFormat) -> Result<Self, DecodeError> {
        match format {
            ImageFormat::Png => Ok(Self::Png),
            ImageFormat::Jpeg => Ok(Self::Jpeg),
            other => Err(DecodeError::Unsupported(other)),
        }
    }
}

/// Resource limits applied while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeLimits {
    /// Maximum bytes the decoder may allocate. `None` keeps the image crate's default.
    pub max_alloc: Option<u64>,
}

impl DecodeLimits {
    fn to_limits(self) -> Limits {
        let mut limits = Limits::default();
        if let Some(max) = self.max_alloc {
            limits.max_alloc = Some(max);
        }
        limits
    }
}

/// Decodes PNG or JPEG bytes into an RGBA buffer.
///
/// Parameters:
/// * `bytes` : Encoded image.
/// * `format` : Declared format, or `None` to sniff it from `bytes`.
/// * `limits` : Decoder resource limits.
pub fn decode(
    bytes: &[u8],
    format: Option<SourceFormat>,
    limits: DecodeLimits,
) -> Result<PixelBuffer> {
    let format = match format {
        Some(f) if !bytes.is_empty() => f,
        _ => SourceFormat::sniff(bytes)?,
    };

    let mut reader = ImageReader::with_format(Cursor::new(bytes), format.image_format());
    reader.limits(limits.to_limits());
    let img = reader.decode().map_err(DecodeError::from)?.into_rgba8();
    let (width, height) = img.dimensions();

    PixelBuffer::from_raw(width, height, Layout::Rgba, img.into_raw())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    Fast,
    #[default]
    Default,
    Best,
}

/// PNG row filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    None,
    Sub,
    Up,
    Avg,
    Paeth,
    #[default]
    Adaptive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PngOptions {
    pub compression: Compression,
    pub filter: Filter,
}

impl From<Compression> for CompressionType {
    fn from(c: Compression) -> Self {
        match c {
            Compression::Fast => Self::Fast,
            Compression::Default => Self::Default,
            Compression::Best => Self::Best,
        }
    }
}

impl From<Filter> for FilterType {
    fn from(f: Filter) -> Self {
        match f {
            Filter::None => Self::NoFilter,
            Filter::Sub => Self::Sub,
            Filter::Up => Self::Up,
            Filter::Avg => Self::Avg,
            Filter::Paeth => Self::Paeth,
            Filter::Adaptive => Self::Adaptive,
        }
    }
}

/// Serializes `buffer` as a PNG with the same dimensions and channel layout.
pub fn encode_png(buffer: &PixelBuffer, options: PngOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let encoder = PngEncoder::new_with_quality(
        &mut out,
        options.compression.into(),
        options.filter.into(),
    );
    encoder
        .write_image(
            buffer.as_bytes(),
            buffer.width(),
            buffer.height(),
            buffer.layout().color_type(),
        )
        .map_err(EncodeError::from)?;
    Ok(out)
}
