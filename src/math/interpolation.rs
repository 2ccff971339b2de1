/*
    Hemera, an orbit propagation engine
    Copyright (C) 2023-onwards Hemera Contributors

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::MathError;

/// Evaluates a Hermite interpolation at `x_eval` and returns the interpolated value and its
/// first derivative.
///
/// The interpolant matches both the values `ys` and the derivatives `ydots` at each abscissa.
/// The table of divided differences is built on doubled abscissas and the polynomial is then
/// evaluated in Newton form, tracking the derivative alongside the value.
pub fn hermite_eval(
    xs: &[f64],
    ys: &[f64],
    ydots: &[f64],
    x_eval: f64,
) -> Result<(f64, f64), MathError> {
    if xs.is_empty() {
        return Err(MathError::InvalidInterpolationData {
            msg: "no X data to interpolate".to_string(),
        });
    }
    if xs.len() != ys.len() {
        return Err(MathError::InvalidInterpolationData {
            msg: "lengths of X and Y data differ".to_string(),
        });
    }
    if xs.len() != ydots.len() {
        return Err(MathError::InvalidInterpolationData {
            msg: "lengths of X and its derivatives data differ".to_string(),
        });
    }

    let n = xs.len();
    let m = 2 * n;

    // Doubled abscissas and the table of divided differences, column major.
    let mut zs = vec![0.0; m];
    let mut qs = vec![0.0; m * m];

    for i in 0..n {
        zs[2 * i] = xs[i];
        zs[2 * i + 1] = xs[i];
        qs[2 * i] = ys[i];
        qs[2 * i + 1] = ys[i];
        qs[2 * i + 1 + m] = ydots[i];

        if i != 0 {
            let denom = zs[2 * i] - zs[2 * i - 1];
            if denom.abs() < f64::EPSILON {
                return Err(MathError::InvalidInterpolationData {
                    msg: format!("duplicate abscissa {}", zs[2 * i]),
                });
            }
            qs[2 * i + m] = (qs[2 * i] - qs[2 * i - 1]) / denom;
        }
    }

    for i in 2..m {
        for j in 2..=i {
            let denom = zs[i] - zs[i - j];
            if denom.abs() < f64::EPSILON {
                return Err(MathError::InvalidInterpolationData {
                    msg: format!("duplicate abscissa {}", zs[i]),
                });
            }
            qs[i + j * m] = (qs[i + (j - 1) * m] - qs[i - 1 + (j - 1) * m]) / denom;
        }
    }

    // Evaluate the polynomial in Newton form, and its derivative at the same time.
    let mut value = qs[(m - 1) + (m - 1) * m];
    let mut deriv = 0.0;
    for i in (0..m - 1).rev() {
        let dx = x_eval - zs[i];
        deriv = deriv * dx + value;
        value = value * dx + qs[i + i * m];
    }

    if value.is_nan() || deriv.is_nan() {
        return Err(MathError::InvalidInterpolationData {
            msg: format!("NaN interpolation at {x_eval}"),
        });
    }

    Ok((value, deriv))
}

#[cfg(test)]
mod ut_hermite {
    use super::hermite_eval;

    #[test]
    fn hermite_sine_test() {
        let xs: Vec<_> = (0..8).map(|i| i as f64).collect();
        let ys: Vec<_> = xs.iter().map(|x| x.cos()).collect();
        let derivs: Vec<_> = xs.iter().map(|x| -x.sin()).collect();

        let tol = 1e-10;
        for x in &xs {
            let (eval, deriv) = hermite_eval(&xs, &ys, &derivs, *x).unwrap();
            assert!((eval - x.cos()).abs() < tol);
            assert!((deriv - -x.sin()).abs() < tol);
        }
        // And in between the nodes
        let (eval, deriv) = hermite_eval(&xs, &ys, &derivs, 3.5).unwrap();
        assert!((eval - 3.5_f64.cos()).abs() < 1e-7);
        assert!((deriv - -3.5_f64.sin()).abs() < 1e-6);
    }

    #[test]
    fn hermite_constant_test() {
        let xs: Vec<_> = (0..8).map(|i| i as f64).collect();
        let ys: Vec<_> = xs.iter().map(|_| 2.0159).collect();
        let derivs: Vec<_> = xs.iter().map(|_| 0.0).collect();

        let tol = 1e-10;
        for x in &xs {
            let (eval, deriv) = hermite_eval(&xs, &ys, &derivs, *x).unwrap();
            assert!((eval - 2.0159).abs() < tol);
            assert!(deriv.abs() < tol);
        }
    }

    #[test]
    fn hermite_bad_data() {
        assert!(hermite_eval(&[], &[], &[], 0.0).is_err());
        assert!(hermite_eval(&[1.0, 1.0], &[2.0, 2.0], &[0.0, 0.0], 1.0).is_err());
        assert!(hermite_eval(&[1.0, 2.0], &[2.0], &[0.0], 1.0).is_err());
    }
}
