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

use std::collections::TryReserveError;

use crate::error::{EncodeError, Result};

/// Channel layout of a [`PixelBuffer`], 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Rgb,
    Rgba,
}

impl Layout {
    pub const fn channels(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    pub(crate) fn color_type(self) -> image::ColorType {
        match self {
            Self::Rgb => image::ColorType::Rgb8,
            Self::Rgba => image::ColorType::Rgba8,
        }
    }
}

/// Owned row-major raster with top-left origin.
///
/// The backing buffer always holds exactly `width * height * channels` bytes.
/// Pixel `(x, y)` starts at byte `(y * width + x) * channels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    layout: Layout,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocates a zero-filled buffer.
    ///
    /// Fails with [`Error::Allocation`](crate::Error::Allocation) if the buffer
    /// cannot be reserved, including when its size does not fit in `usize`.
    pub fn new(width: u32, height: u32, layout: Layout) -> Result<Self> {
        // A saturated length makes the reservation fail with a capacity overflow.
        let len = byte_len(width, height, layout.channels()).unwrap_or(usize::MAX);

        Ok(Self {
            width,
            height,
            layout,
            data: zeroed(len)?,
        })
    }

    /// Wraps an existing buffer. Fails if its length does not match the dimensions.
    pub fn from_raw(width: u32, height: u32, layout: Layout, data: Vec<u8>) -> Result<Self> {
        if byte_len(width, height, layout.channels()) != Some(data.len()) {
            return Err(EncodeError::BufferSize {
                expected: expected_len(width, height, layout),
                actual: data.len(),
            }
            .into());
        }

        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Byte distance between the starts of two consecutive rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * self.channels()
    }

    /// Returns the bytes of pixel `(x, y)`, or `None` if it is outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = self.channels();
        let start = (y as usize * self.width as usize + x as usize) * c;
        Some(&self.data[start..start + c])
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

fn expected_len(width: u32, height: u32, layout: Layout) -> u128 {
    width as u128 * height as u128 * layout.channels() as u128
}

pub(crate) fn byte_len(width: u32, height: u32, channels: usize) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(channels)
}

/// Zero-filled `Vec` whose allocation failure is reported instead of aborting.
pub(crate) fn zeroed(len: usize) -> std::result::Result<Vec<u8>, TryReserveError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    v.resize(len, 0);
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_new_is_zeroed() {
        let b = PixelBuffer::new(3, 2, Layout::Rgba).unwrap();
        assert_eq!(b.as_bytes().len(), 3 * 2 * 4);
        assert!(b.as_bytes().iter().all(|&v| v == 0));
        assert_eq!(b.stride(), 12);
    }

    #[test]
    fn test_from_raw_rejects_wrong_length() {
        let r = PixelBuffer::from_raw(2, 2, Layout::Rgb, vec![0; 11]);
        assert!(matches!(
            r,
            Err(Error::Encode(EncodeError::BufferSize {
                expected: 12,
                actual: 11
            }))
        ));
    }

    #[test]
    fn test_allocation_failure() {
        // 2^63 bytes fits in `usize` but not in `isize`.
        let r = PixelBuffer::new(1 << 31, 1 << 30, Layout::Rgba);
        assert!(matches!(r, Err(Error::Allocation(_))));

        // Size overflows `usize` altogether.
        let r = PixelBuffer::new(u32::MAX, u32::MAX, Layout::Rgba);
        assert!(matches!(r, Err(Error::Allocation(_))));
    }

    #[test]
    fn test_pixel_addressing() {
        let data: Vec<u8> = (0..2 * 3 * 3).map(|v| v as u8).collect();
        let b = PixelBuffer::from_raw(2, 3, Layout::Rgb, data).unwrap();

        // (x, y) = (1, 2) -> (2 * 2 + 1) * 3 = 15
        assert_eq!(b.pixel(1, 2), Some(&[15, 16, 17][..]));
        assert_eq!(b.pixel(0, 0), Some(&[0, 1, 2][..]));
        assert_eq!(b.pixel(2, 0), None);
        assert_eq!(b.pixel(0, 3), None);
    }
}
