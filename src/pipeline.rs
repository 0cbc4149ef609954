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

use tracing::{debug, debug_span};

use crate::codec;
use crate::config::{Config, ConfigBuilder};
use crate::error::{PermutationError, Result};
use crate::grid::{check_splits, GridSpec};
use crate::pixels::PixelBuffer;
use crate::restore;
use crate::shuffle::Permutation;
use crate::tile::{extract_tiles, reassemble};

/// Runs the decode, partition, shuffle, reassemble and encode stages.
///
/// Each call works on its own buffers, so one `Pipeline` can be shared
/// between threads.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn grid_for(&self, buffer: &PixelBuffer) -> Result<GridSpec> {
        let grid = GridSpec::new(
            buffer.width(),
            buffer.height(),
            self.config.xsplit,
            self.config.ysplit,
        )?;
        debug!(
            width = grid.width(),
            height = grid.height(),
            tile_width = grid.tile_width(),
            tile_height = grid.tile_height(),
            tiles = grid.tile_count(),
            "partitioned image"
        );
        Ok(grid)
    }

    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer> {
        // Splits are known before the image is; reject zero ones without decoding.
        check_splits(self.config.xsplit, self.config.ysplit)?;
        let buffer = codec::decode(bytes, None, self.config.limits)?;
        debug!(
            input_bytes = bytes.len(),
            width = buffer.width(),
            height = buffer.height(),
            "decoded image"
        );
        Ok(buffer)
    }

    fn encode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>> {
        let png = codec::encode_png(buffer, self.config.png)?;
        debug!(output_bytes = png.len(), "encoded png");
        Ok(png)
    }

    /// Shuffles the tiles of an encoded PNG or JPEG image and returns a PNG.
    pub fn shuffle_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let _span = debug_span!(
            "shuffle",
            xsplit = self.config.xsplit,
            ysplit = self.config.ysplit
        )
        .entered();
        let buffer = self.decode(bytes)?;
        let out = self.shuffle_pixels(&buffer)?;
        self.encode(&out)
    }

    /// Shuffles the tiles of a decoded image.
    ///
    /// The permutation comes from the configured [`ShuffleMode`](crate::ShuffleMode).
    pub fn shuffle_pixels(&self, buffer: &PixelBuffer) -> Result<PixelBuffer> {
        let grid = self.grid_for(buffer)?;
        let tiles = extract_tiles(buffer, &grid)?;
        let permutation = self.config.shuffle.permutation(grid.tile_count());
        debug!(mode = ?self.config.shuffle, "generated permutation");
        reassemble(&tiles, &permutation, &grid)
    }

    /// Rearranges the tiles of `buffer` with an explicit permutation.
    pub fn arrange_pixels(
        &self,
        buffer: &PixelBuffer,
        permutation: &Permutation,
    ) -> Result<PixelBuffer> {
        let grid = self.grid_for(buffer)?;
        if permutation.len() != grid.tile_count() {
            return Err(PermutationError::Length {
                expected: grid.tile_count(),
                actual: permutation.len(),
            }
            .into());
        }
        let tiles = extract_tiles(buffer, &grid)?;
        reassemble(&tiles, permutation, &grid)
    }

    /// Undoes [`Pipeline::shuffle_bytes`] on an encoded image.
    pub fn restore_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let _span = debug_span!(
            "restore",
            xsplit = self.config.xsplit,
            ysplit = self.config.ysplit
        )
        .entered();
        let buffer = self.decode(bytes)?;
        let out = self.restore_pixels(&buffer)?;
        self.encode(&out)
    }

    /// Puts shuffled tiles back in place.
    ///
    /// A reproducible [`ShuffleMode`](crate::ShuffleMode) is inverted exactly.
    /// Otherwise the arrangement is guessed from how well tile borders match.
    pub fn restore_pixels(&self, buffer: &PixelBuffer) -> Result<PixelBuffer> {
        let grid = self.grid_for(buffer)?;
        let tiles = extract_tiles(buffer, &grid)?;
        let permutation = if self.config.shuffle.is_reproducible() {
            self.config.shuffle.permutation(grid.tile_count()).inverse()
        } else {
            restore::solve(&tiles, &grid)?
        };
        reassemble(&tiles, &permutation, &grid)
    }
}

/// Shuffles the `xsplit × ysplit` tiles of a PNG or JPEG image and returns a PNG.
///
/// The shuffle draws from the calling thread's entropy generator.
pub fn encode_image_buffer(bytes: &[u8], xsplit: u32, ysplit: u32) -> Result<Vec<u8>> {
    Pipeline::new(ConfigBuilder::new().split(xsplit, ysplit).build()).shuffle_bytes(bytes)
}

/// Reassembles an image shuffled by [`encode_image_buffer`] by matching tile borders.
pub fn decode_image_buffer(bytes: &[u8], xsplit: u32, ysplit: u32) -> Result<Vec<u8>> {
    Pipeline::new(ConfigBuilder::new().split(xsplit, ysplit).build()).restore_bytes(bytes)
}
