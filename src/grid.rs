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

use std::num::NonZeroU32;

use crate::error::{GridAxis, GridError};

/// Geometry of an `xsplit × ysplit` tile grid over a `width × height` image.
///
/// Cells are enumerated row-major: cell `(gx, gy)` has linear index
/// `gy * xsplit + gx`. [`GridSpec::cell_index`] and [`GridSpec::cell_coords`]
/// are the only places that mapping is written down; extraction, shuffling
/// and reassembly all go through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    width: u32,
    height: u32,
    xsplit: u32,
    ysplit: u32,
    tile_width: u32,
    tile_height: u32,
}

/// Checks that both splits are positive.
///
/// This needs no image, so callers can run it before decoding.
pub fn check_splits(xsplit: u32, ysplit: u32) -> Result<(NonZeroU32, NonZeroU32), GridError> {
    let x = NonZeroU32::new(xsplit).ok_or(GridError::ZeroSplit {
        axis: GridAxis::Width,
    })?;
    let y = NonZeroU32::new(ysplit).ok_or(GridError::ZeroSplit {
        axis: GridAxis::Height,
    })?;
    Ok((x, y))
}

fn tile_len(axis: GridAxis, dimension: u32, split: u32) -> Result<u32, GridError> {
    if split == 0 {
        return Err(GridError::ZeroSplit { axis });
    }
    if split > dimension {
        return Err(GridError::SplitTooLarge {
            axis,
            split,
            dimension,
        });
    }
    if dimension % split != 0 {
        return Err(GridError::NotDivisible {
            axis,
            split,
            dimension,
        });
    }
    Ok(dimension / split)
}

impl GridSpec {
    /// Partitions a `width × height` image into `xsplit × ysplit` equal tiles.
    ///
    /// Fails if a split is zero, larger than its dimension,
    /// or does not divide it exactly.
    pub fn new(width: u32, height: u32, xsplit: u32, ysplit: u32) -> Result<Self, GridError> {
        let tile_width = tile_len(GridAxis::Width, width, xsplit)?;
        let tile_height = tile_len(GridAxis::Height, height, ysplit)?;

        Ok(Self {
            width,
            height,
            xsplit,
            ysplit,
            tile_width,
            tile_height,
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
    pub fn xsplit(&self) -> u32 {
        self.xsplit
    }

    #[inline]
    pub fn ysplit(&self) -> u32 {
        self.ysplit
    }

    #[inline]
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    #[inline]
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    #[inline]
    pub fn tile_count(&self) -> usize {
        self.xsplit as usize * self.ysplit as usize
    }

    /// Linear index of grid cell `(gx, gy)`.
    #[inline]
    pub fn cell_index(&self, gx: u32, gy: u32) -> usize {
        debug_assert!(gx < self.xsplit && gy < self.ysplit);
        gy as usize * self.xsplit as usize + gx as usize
    }

    /// Grid coordinates `(gx, gy)` of linear cell `index`.
    #[inline]
    pub fn cell_coords(&self, index: usize) -> (u32, u32) {
        debug_assert!(index < self.tile_count());
        let xsplit = self.xsplit as usize;
        ((index % xsplit) as u32, (index / xsplit) as u32)
    }

    /// Pixel coordinates of the top-left corner of cell `index`.
    #[inline]
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let (gx, gy) = self.cell_coords(index);
        (gx * self.tile_width, gy * self.tile_height)
    }

    /// Fails unless the grid was computed for a `width × height` image.
    pub(crate) fn check_size(&self, width: u32, height: u32) -> Result<(), GridError> {
        if (self.width, self.height) != (width, height) {
            return Err(GridError::SizeMismatch {
                expected: (self.width, self.height),
                actual: (width, height),
            });
        }
        Ok(())
    }
}
