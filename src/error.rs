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

//! Error types for every stage of the pipeline.

use std::collections::TryReserveError;
use std::fmt;

use image::ImageFormat;

/// Error returned by the pipeline.
///
/// Each variant is the tag for one failure class, so callers can tell
/// a bad file ([`Error::Decode`]) from a bad split ([`Error::InvalidGrid`])
/// from an internal failure ([`Error::Encode`], [`Error::Allocation`]).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to decode the image: {0}")]
    Decode(#[from] DecodeError),
    #[error("invalid grid: {0}")]
    InvalidGrid(#[from] GridError),
    #[error("invalid permutation: {0}")]
    InvalidPermutation(#[from] PermutationError),
    #[error("failed to encode the image: {0}")]
    Encode(#[from] EncodeError),
    #[error("out of memory: {0}")]
    Allocation(#[from] TryReserveError),
}

impl Error {
    /// Returns `true` if the error is caused by the caller's input
    /// (image bytes, split values or permutation) rather than a bug.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::InvalidGrid(_) | Self::InvalidPermutation(_)
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("input buffer is empty")]
    Empty,
    #[error("unrecognized image format")]
    UnknownFormat,
    #[error("unsupported image format {0:?} (expected PNG or JPEG)")]
    Unsupported(ImageFormat),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Which side of the image a split applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAxis {
    Width,
    Height,
}

impl fmt::Display for GridAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Width => "width",
            Self::Height => "height",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("{axis} split must be non-zero")]
    ZeroSplit { axis: GridAxis },
    #[error("{axis} split {split} exceeds the image {axis} ({dimension} px)")]
    SplitTooLarge {
        axis: GridAxis,
        split: u32,
        dimension: u32,
    },
    #[error("image {axis} ({dimension} px) is not divisible by {split}")]
    NotDivisible {
        axis: GridAxis,
        split: u32,
        dimension: u32,
    },
    #[error("grid is for a {expected:?} image, but the buffer is {actual:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermutationError {
    #[error("expected {expected} entries, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("index {index} is out of range for {len} tiles")]
    OutOfRange { index: usize, len: usize },
    #[error("index {index} appears more than once")]
    Duplicate { index: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("pixel buffer holds {actual} bytes, but its dimensions need {expected}")]
    BufferSize { expected: u128, actual: usize },
    #[error("expected {expected} tiles, got {actual}")]
    TileCount { expected: usize, actual: usize },
    #[error("tile {index} does not match the grid's tile size")]
    TileShape { index: usize },
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors() {
        let e: Error = GridError::ZeroSplit {
            axis: GridAxis::Width,
        }
        .into();
        assert!(e.is_input_error());

        let e: Error = DecodeError::Empty.into();
        assert!(e.is_input_error());

        let e: Error = EncodeError::TileCount {
            expected: 4,
            actual: 3,
        }
        .into();
        assert!(!e.is_input_error());
    }

    #[test]
    fn test_grid_message() {
        let e = GridError::NotDivisible {
            axis: GridAxis::Width,
            split: 3,
            dimension: 10,
        };
        assert_eq!(
            e.to_string(),
            "image width (10 px) is not divisible by 3"
        );
    }
}
