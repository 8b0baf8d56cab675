// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Maps a normalized escape-time grid onto 8-bit grayscale.
use num::clamp;

/// Log-scales every count against the largest one:
///
///   byte = round(ln(v) * 255 / ln(max))
///
/// A normalized grid never holds a value below 1, so the logarithm is
/// always defined.  When the largest value is 1 every cell is the same
/// and the result is all zeros.
pub fn intensities(grid: &[usize]) -> Vec<u8> {
    let maxi = match grid.iter().max() {
        Some(&m) if m > 1 => m,
        Some(_) => return vec![0; grid.len()],
        None => return vec![],
    };
    let base = (maxi as f64).ln();
    grid.iter()
        .map(|&v| {
            let level = (v.max(1) as f64).ln() * 255.0 / base;
            clamp(level.round(), 0.0, 255.0) as u8
        })
        .collect()
}
