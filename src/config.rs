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

use crate::codec::{Compression, DecodeLimits, Filter, PngOptions};
use crate::shuffle::ShuffleMode;

/// Settings for a [`Pipeline`](crate::Pipeline).
///
/// Built with [`ConfigBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub(crate) xsplit: u32,
    pub(crate) ysplit: u32,
    pub(crate) shuffle: ShuffleMode,
    pub(crate) png: PngOptions,
    pub(crate) limits: DecodeLimits,
}

impl Config {
    #[inline]
    pub fn xsplit(&self) -> u32 {
        self.xsplit
    }

    #[inline]
    pub fn ysplit(&self) -> u32 {
        self.ysplit
    }

    #[inline]
    pub fn shuffle(&self) -> ShuffleMode {
        self.shuffle
    }

    #[inline]
    pub fn png(&self) -> PngOptions {
        self.png
    }

    #[inline]
    pub fn limits(&self) -> DecodeLimits {
        self.limits
    }
}

#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// Starts from a 1×1 grid, entropy shuffle and default PNG output.
    pub fn new() -> Self {
        Self {
            config: Config {
                xsplit: 1,
                ysplit: 1,
                shuffle: ShuffleMode::default(),
                png: PngOptions::default(),
                limits: DecodeLimits::default(),
            },
        }
    }

    /// Number of tile columns and rows.
    ///
    /// Not validated here; the pipeline checks them against the image.
    pub fn split(mut self, xsplit: u32, ysplit: u32) -> Self {
        self.config.xsplit = xsplit;
        self.config.ysplit = ysplit;
        self
    }

    pub fn shuffle(mut self, mode: ShuffleMode) -> Self {
        self.config.shuffle = mode;
        self
    }

    /// Shorthand for `shuffle(ShuffleMode::Seed(seed))`.
    pub fn seed(self, seed: u64) -> Self {
        self.shuffle(ShuffleMode::Seed(seed))
    }

    pub fn compression(mut self, compression: Compression) -> Self {
        self.config.png.compression = compression;
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.config.png.filter = filter;
        self
    }

    /// Caps decoder allocations at `bytes`.
    pub fn max_alloc(mut self, bytes: u64) -> Self {
        self.config.limits.max_alloc = Some(bytes);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let c = ConfigBuilder::new().build();
        assert_eq!((c.xsplit(), c.ysplit()), (1, 1));
        assert_eq!(c.shuffle(), ShuffleMode::Entropy);
        assert_eq!(c.limits().max_alloc, None);

        let c = ConfigBuilder::new()
            .split(4, 3)
            .seed(7)
            .compression(Compression::Best)
            .filter(Filter::Up)
            .max_alloc(1 << 20)
            .build();
        assert_eq!((c.xsplit(), c.ysplit()), (4, 3));
        assert_eq!(c.shuffle(), ShuffleMode::Seed(7));
        assert_eq!(
            c.png(),
            PngOptions {
                compression: Compression::Best,
                filter: Filter::Up,
            }
        );
        assert_eq!(c.limits().max_alloc, Some(1 << 20));
    }
}
