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

use ndarray::{ArrayView3, ShapeError};

use crate::error::{EncodeError, Result};
use crate::grid::GridSpec;
use crate::pixels::{byte_len, Layout, PixelBuffer};
use crate::shuffle::Permutation;

/// Densely packed copy of one grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    gx: u32,
    gy: u32,
    width: u32,
    height: u32,
    layout: Layout,
    data: Vec<u8>,
}

impl Tile {
    /// Grid coordinates of the cell this tile was cut from.
    #[inline]
    pub fn origin(&self) -> (u32, u32) {
        (self.gx, self.gy)
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
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn row_len(&self) -> usize {
        self.width as usize * self.layout.channels()
    }

    /// `(row, column, channel)` view of the tile.
    pub fn view(&self) -> Result<ArrayView3<'_, u8>, ShapeError> {
        ArrayView3::from_shape(
            (
                self.height as usize,
                self.width as usize,
                self.layout.channels(),
            ),
            &self.data,
        )
    }
}

/// Byte offset in `buffer` of row `local_y` of grid cell `index`.
#[inline]
fn cell_row_start(
    grid: &GridSpec,
    stride: usize,
    channels: usize,
    index: usize,
    local_y: u32,
) -> usize {
    let (x, y) = grid.cell_origin(index);
    (y + local_y) as usize * stride + x as usize * channels
}

/// Cuts `buffer` into `grid.tile_count()` tiles, in row-major grid order.
pub fn extract_tiles(buffer: &PixelBuffer, grid: &GridSpec) -> Result<Vec<Tile>> {
    grid.check_size(buffer.width(), buffer.height())?;

    let channels = buffer.channels();
    let stride = buffer.stride();
    let row_len = grid.tile_width() as usize * channels;
    let tile_len = row_len * grid.tile_height() as usize;
    let src = buffer.as_bytes();

    let mut tiles = Vec::new();
    tiles.try_reserve_exact(grid.tile_count())?;

    for index in 0..grid.tile_count() {
        let mut data = Vec::new();
        data.try_reserve_exact(tile_len)?;

        for local_y in 0..grid.tile_height() {
            let start = cell_row_start(grid, stride, channels, index, local_y);
            data.extend_from_slice(&src[start..start + row_len]);
        }

        let (gx, gy) = grid.cell_coords(index);
        tiles.push(Tile {
            gx,
            gy,
            width: grid.tile_width(),
            height: grid.tile_height(),
            layout: buffer.layout(),
            data,
        });
    }

    Ok(tiles)
}

/// Writes `tiles[permutation[i]]` into cell `i` of a new buffer.
///
/// Every tile must come from [`extract_tiles`] with the same `grid`.
pub fn reassemble(
    tiles: &[Tile],
    permutation: &Permutation,
    grid: &GridSpec,
) -> Result<PixelBuffer> {
    let count = grid.tile_count();
    if tiles.len() != count {
        return Err(EncodeError::TileCount {
            expected: count,
            actual: tiles.len(),
        }
        .into());
    }
    if permutation.len() != count {
        return Err(EncodeError::TileCount {
            expected: count,
            actual: permutation.len(),
        }
        .into());
    }

    let layout = match tiles.first() {
        Some(t) => t.layout(),
        None => Layout::Rgba,
    };
    let channels = layout.channels();
    let tile_len = byte_len(grid.tile_width(), grid.tile_height(), channels);
    for (index, t) in tiles.iter().enumerate() {
        if t.layout != layout
            || (t.width, t.height) != (grid.tile_width(), grid.tile_height())
            || Some(t.data.len()) != tile_len
        {
            return Err(EncodeError::TileShape { index }.into());
        }
    }

    let mut out = PixelBuffer::new(grid.width(), grid.height(), layout)?;
    let stride = out.stride();
    let dst = out.as_bytes_mut();

    for (index, &source) in permutation.as_slice().iter().enumerate() {
        let tile = &tiles[source];
        let row_len = tile.row_len();
        for (local_y, row) in tile.data.chunks_exact(row_len).enumerate() {
            let start = cell_row_start(grid, stride, channels, index, local_y as u32);
            dst[start..start + row_len].copy_from_slice(row);
        }
    }

    Ok(out)
}
