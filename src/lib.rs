//! Library to slice an image into a grid and shuffle the pieces.
//!
//! An image is cut into `xsplit × ysplit` equally sized tiles, which are
//! rearranged by a random permutation and written back out as a PNG:
//!
//! * No tile is duplicated nor removed.
//! * Pixels inside a tile keep their order.
//! * Output has exactly the input's dimensions.
//!
//! The simplest entry point is [encode_image_buffer]. [Pipeline] exposes
//! every stage and the options in [Config], and [decode_image_buffer] tries
//! to put a shuffled image back together.

// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//

pub mod codec;
mod config;
mod error;
mod grid;
mod pipeline;
mod pixels;
pub mod restore;
mod shuffle;
pub mod tile;

#[doc(inline)]
pub use crate::config::{Config, ConfigBuilder};
#[doc(inline)]
pub use crate::error::{
    DecodeError, EncodeError, Error, GridAxis, GridError, PermutationError, Result,
};
#[doc(inline)]
pub use crate::grid::{check_splits, GridSpec};
#[doc(inline)]
pub use crate::pipeline::{decode_image_buffer, encode_image_buffer, Pipeline};
#[doc(inline)]
pub use crate::pixels::{Layout, PixelBuffer};
#[doc(inline)]
pub use crate::shuffle::{reseed_thread_rng, Permutation, ShuffleMode, ShuffleRng};
#[doc(inline)]
pub use crate::tile::Tile;
