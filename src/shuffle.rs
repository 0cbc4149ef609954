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

use std::cell::RefCell;

use rand::prelude::*;
use rand_xoshiro::Xoshiro256StarStar;
use sha2::{Digest, Sha256};

use crate::error::PermutationError;

/// Generator behind every shuffle.
pub type ShuffleRng = Xoshiro256StarStar;

thread_local! {
    /// Per-thread generator for unseeded shuffles.
    ///
    /// Seeded from system entropy on first use in each thread,
    /// so concurrent pipelines never contend on it.
    static THREAD_RNG: RefCell<ShuffleRng> = RefCell::new(ShuffleRng::from_entropy());
}

fn with_thread_rng<T>(f: impl FnOnce(&mut ShuffleRng) -> T) -> T {
    THREAD_RNG.with(|rng| f(&mut rng.borrow_mut()))
}

/// Replaces the calling thread's entropy generator with a deterministic one.
///
/// Later [`ShuffleMode::Entropy`] shuffles on this thread become reproducible.
pub fn reseed_thread_rng(seed: u64) {
    with_thread_rng(|rng| *rng = ShuffleRng::seed_from_u64(seed));
}

/// Where a shuffle gets its randomness from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShuffleMode {
    /// Thread-local generator seeded from system entropy.
    #[default]
    Entropy,
    /// Reproducible shuffle from an integer seed.
    Seed(u64),
    /// Reproducible shuffle from a full 256-bit generator seed.
    Key([u8; 32]),
    /// Keep every tile in place.
    Identity,
}

impl ShuffleMode {
    /// Derives a [`ShuffleMode::Key`] from an arbitrary string by hashing it with SHA-256.
    pub fn from_passphrase(phrase: impl AsRef<[u8]>) -> Self {
        Self::Key(Sha256::digest(phrase.as_ref()).into())
    }

    /// Returns `true` if the same mode always produces the same permutation.
    pub fn is_reproducible(&self) -> bool {
        !matches!(self, Self::Entropy)
    }

    /// Generates a permutation of `count` tiles.
    pub fn permutation(&self, count: usize) -> Permutation {
        match *self {
            Self::Entropy => with_thread_rng(|rng| Permutation::random(count, rng)),
            Self::Seed(seed) => Permutation::random(count, &mut ShuffleRng::seed_from_u64(seed)),
            Self::Key(key) => Permutation::random(count, &mut ShuffleRng::from_seed(key)),
            Self::Identity => Permutation::identity(count),
        }
    }
}

/// Bijection over tile indices.
///
/// Position `i` holds the source tile placed into destination cell `i`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    pub fn identity(count: usize) -> Self {
        Self((0..count).collect())
    }

    /// Uniformly random permutation (Fisher-Yates).
    ///
    /// `count <= 1` always gives the identity.
    pub fn random<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut indices: Vec<_> = (0..count).collect();
        if count > 1 {
            indices.shuffle(rng);
        }
        Self(indices)
    }

    /// Validates a caller-supplied permutation.
    pub fn from_vec(indices: Vec<usize>) -> Result<Self, PermutationError> {
        let len = indices.len();
        let mut seen = vec![false; len];
        for &index in &indices {
            match seen.get_mut(index) {
                None => return Err(PermutationError::OutOfRange { index, len }),
                Some(true) => return Err(PermutationError::Duplicate { index }),
                Some(s) => *s = true,
            }
        }
        Ok(Self(indices))
    }

    /// Caller guarantees `indices` is a bijection.
    pub(crate) fn from_vec_unchecked(indices: Vec<usize>) -> Self {
        debug_assert!(Self::from_vec(indices.clone()).is_ok());
        Self(indices)
    }

    /// Like [`Permutation::from_vec`], also checking the length.
    pub fn with_len(indices: Vec<usize>, expected: usize) -> Result<Self, PermutationError> {
        if indices.len() != expected {
            return Err(PermutationError::Length {
                expected,
                actual: indices.len(),
            });
        }
        Self::from_vec(indices)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Source tile placed into destination cell `dest`, or `None` if there is no such cell.
    #[inline]
    pub fn source_of(&self, dest: usize) -> Option<usize> {
        self.0.get(dest).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &v)| i == v)
    }

    /// Permutation that undoes this one.
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.0.len()];
        for (dest, &src) in self.0.iter().enumerate() {
            inv[src] = dest;
        }
        Self(inv)
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }
}
