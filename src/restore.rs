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

//! Recovering the original arrangement of a shuffled grid.
//!
//! Without the permutation, the best guess is the arrangement where
//! neighbouring tiles blend together. The seam cost of two tiles is the sum of
//! absolute channel differences along the border where they would touch.
//! Starting from every tile in turn, the grid is filled greedily in row-major
//! order, and the arrangement with the lowest total seam cost wins.

use std::collections::TryReserveError;

use ndarray::parallel::prelude::*;
use ndarray::prelude::*;
use ndarray::Zip;
use rayon::prelude::*;

use crate::error::{EncodeError, Result};
use crate::grid::GridSpec;
use crate::shuffle::Permutation;
use crate::tile::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seam {
    /// Second tile sits directly under the first.
    Below,
    /// Second tile sits directly right of the first.
    RightOf,
}

fn seam_cost(first: &ArrayView3<'_, u8>, second: &ArrayView3<'_, u8>, seam: Seam) -> u64 {
    let (a, b) = match seam {
        Seam::Below => (first.slice(s![-1, .., ..]), second.slice(s![0, .., ..])),
        Seam::RightOf => (first.slice(s![.., -1, ..]), second.slice(s![.., 0, ..])),
    };

    let mut cost = 0u64;
    Zip::from(&a).and(&b).for_each(|&x, &y| cost += u64::from(x.abs_diff(y)));
    cost
}

/// Zeroed `n × n` table.
///
/// Grids with very many tiles fail here with [`Error::Allocation`](crate::Error::Allocation).
fn cost_table(n: usize) -> Result<Array2<u64>> {
    // A saturated length makes the reservation fail with a capacity overflow.
    let len = n.saturating_mul(n);
    let mut data = Vec::new();
    data.try_reserve_exact(len)?;
    data.resize(len, 0);
    let table = Array2::from_shape_vec((n, n), data).map_err(|_| EncodeError::TileCount {
        expected: n,
        actual: len,
    })?;
    Ok(table)
}

/// Pairwise seam costs, indexed `[first, second]`.
struct SeamTable {
    below: Array2<u64>,
    right_of: Array2<u64>,
}

impl SeamTable {
    fn new(views: &[ArrayView3<'_, u8>]) -> Result<Self> {
        let n = views.len();
        let mut below = cost_table(n)?;
        let mut right_of = cost_table(n)?;

        par_azip!((index (i, j), b in &mut below, r in &mut right_of) {
            if i != j {
                *b = seam_cost(&views[i], &views[j], Seam::Below);
                *r = seam_cost(&views[i], &views[j], Seam::RightOf);
            }
        });

        Ok(Self { below, right_of })
    }

    /// Total seam cost of placing `order[i]` into cell `i`.
    fn arrangement_cost(&self, grid: &GridSpec, order: &[usize]) -> u64 {
        let xsplit = grid.xsplit() as usize;
        let mut total = 0;
        for (cell, &tile) in order.iter().enumerate() {
            let (gx, gy) = grid.cell_coords(cell);
            if gx > 0 {
                total += self.right_of[[order[cell - 1], tile]];
            }
            if gy > 0 {
                total += self.below[[order[cell - xsplit], tile]];
            }
        }
        total
    }

    /// Fills the grid starting with tile `start` in cell 0.
    ///
    /// A first-column cell takes the unused tile that best continues the tile
    /// above it, every other cell the one that best continues its left neighbour.
    fn greedy_order(&self, grid: &GridSpec, start: usize) -> Result<Vec<usize>, TryReserveError> {
        let n = grid.tile_count();
        let mut used = Vec::new();
        used.try_reserve_exact(n)?;
        used.resize(n, false);
        let mut order = Vec::new();
        order.try_reserve_exact(n)?;
        order.push(start);
        used[start] = true;

        for cell in 1..n {
            let (gx, gy) = grid.cell_coords(cell);
            let (costs, prev) = if gx == 0 {
                (&self.below, order[grid.cell_index(0, gy - 1)])
            } else {
                (&self.right_of, order[cell - 1])
            };

            let Some(next) = (0..n)
                .filter(|&t| !used[t])
                .min_by_key(|&t| costs[[prev, t]])
            else {
                break;
            };
            used[next] = true;
            order.push(next);
        }

        Ok(order)
    }
}

/// Total cost, start tile and order of one greedy arrangement.
type Candidate = (u64, usize, Vec<usize>);

/// Guesses the permutation that puts shuffled `tiles` back in place.
///
/// `tiles` are the cells of the shuffled image in row-major order. The result
/// maps each destination cell to the shuffled cell that belongs there, and can
/// be passed straight to [`reassemble`](crate::tile::reassemble).
pub fn solve(tiles: &[Tile], grid: &GridSpec) -> Result<Permutation> {
    let n = grid.tile_count();
    if tiles.len() != n {
        return Err(EncodeError::TileCount {
            expected: n,
            actual: tiles.len(),
        }
        .into());
    }
    if n <= 1 {
        return Ok(Permutation::identity(n));
    }

    let views = tiles
        .iter()
        .enumerate()
        .map(|(index, t)| t.view().map_err(|_| EncodeError::TileShape { index }))
        .collect::<Result<Vec<_>, _>>()?;
    let table = SeamTable::new(&views)?;

    let best = (0..n)
        .into_par_iter()
        .map(|start| -> Result<Option<Candidate>, TryReserveError> {
            let order = table.greedy_order(grid, start)?;
            if order.len() != n {
                return Ok(None);
            }
            let cost = table.arrangement_cost(grid, &order);
            Ok(Some((cost, start, order)))
        })
        .try_reduce(
            || None,
            |a: Option<Candidate>, b: Option<Candidate>| {
                Ok(match (a, b) {
                    (Some(a), Some(b)) if (b.0, b.1) < (a.0, a.1) => Some(b),
                    (Some(a), Some(_)) => Some(a),
                    (a, None) => a,
                    (None, b) => b,
                })
            },
        )?;

    Ok(match best {
        Some((_, _, order)) => Permutation::from_vec_unchecked(order),
        None => Permutation::identity(n),
    })
}
