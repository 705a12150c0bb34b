// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value-domain helpers.

use encodeable::infer_domain_f64;

/// Minimum and maximum of the finite values, or `None` if there are none.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    infer_domain_f64(values)
}

/// The extent widened by `ratio` of each bound's magnitude.
///
/// `[min - ratio * |min|, max + ratio * |max|]`, so a bound at zero stays at zero.
pub fn pad_domain(values: impl IntoIterator<Item = f64>, ratio: f64) -> Option<(f64, f64)> {
    let (min, max) = extent(values)?;
    Some((min - ratio * min.abs(), max + ratio * max.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_by_magnitude() {
        let (lo, hi) = pad_domain([-10.0, 3.0, 50.0], 0.1).expect("finite values");
        assert!((lo - -11.0).abs() < 1e-9);
        assert!((hi - 55.0).abs() < 1e-9);

        let (lo, hi) = pad_domain([2.0, 4.0], 0.5).expect("finite values");
        assert!((lo - 1.0).abs() < 1e-9);
        assert!((hi - 6.0).abs() < 1e-9);
    }

    #[test]
    fn zero_bounds_stay_put() {
        assert_eq!(pad_domain([0.0, 0.0], 0.1), Some((0.0, 0.0)));
    }

    #[test]
    fn non_finite_values_are_skipped() {
        assert_eq!(extent([f64::NAN, 1.0, f64::INFINITY, -2.0]), Some((-2.0, 1.0)));
        assert_eq!(pad_domain([f64::NAN], 0.1), None);
        assert_eq!(extent(core::iter::empty()), None);
    }
}
