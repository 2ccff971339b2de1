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

use crate::linalg::Vector3;

/// Returns the provided angle bounded between 0.0 and 360.0
pub fn between_0_360(angle: f64) -> f64 {
    let mut bounded = angle % 360.0;
    if bounded < 0.0 {
        bounded += 360.0;
    }
    bounded
}

/// Returns the provided angle bounded between -180.0 and +180.0
pub fn between_pm_180(angle: f64) -> f64 {
    between_pm_x(angle, 180.0)
}

/// Returns the provided angle bounded between -x and +x
pub fn between_pm_x(angle: f64, x: f64) -> f64 {
    let mut bounded = angle % (2.0 * x);
    if bounded > x {
        bounded -= 2.0 * x;
    }
    if bounded < -x {
        bounded += 2.0 * x;
    }
    bounded
}

/// Returns the components of vector a orthogonal to b
pub fn perpv(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    let big_a = a[0].abs().max(a[1].abs().max(a[2].abs()));
    let big_b = b[0].abs().max(b[1].abs().max(b[2].abs()));
    if big_a < f64::EPSILON {
        Vector3::zeros()
    } else if big_b < f64::EPSILON {
        *a
    } else {
        let a_scl = a / big_a;
        let b_scl = b / big_b;
        let v = projv(&a_scl, &b_scl);
        big_a * (a_scl - v)
    }
}

/// Returns the projection of vector a onto vector b
pub fn projv(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    b * a.dot(b) / b.dot(b)
}

/// Converts a hifitime Epoch into a satkit Instant, used for the analytical ephemerides
/// and the SGP4 propagator.
pub fn epoch_to_instant(epoch: crate::time::Epoch) -> satkit::Instant {
    let (y, mo, d, h, mi, s, nanos) = epoch.to_gregorian_utc();
    // The date components come from a valid epoch, so this cannot fail.
    satkit::Instant::from_datetime(
        y,
        i32::from(mo),
        i32::from(d),
        i32::from(h),
        i32::from(mi),
        f64::from(s) + f64::from(nanos) * 1e-9,
    )
    .unwrap()
}

/// Converts a satkit Instant into a hifitime Epoch.
pub fn instant_to_epoch(instant: &satkit::Instant) -> crate::time::Epoch {
    use crate::time::{Epoch, Unit};
    let (y, mo, d, h, mi, s) = instant.as_datetime();
    Epoch::from_gregorian_utc(y, mo as u8, d as u8, h as u8, mi as u8, 0, 0) + s * Unit::Second
}

/// Returns the root sum squared position and velocity errors between both orbits
pub fn rss_orbit_errors(prop_err: &crate::Orbit, cur_state: &crate::Orbit) -> (f64, f64) {
    (
        (prop_err.radius() - cur_state.radius()).norm(),
        (prop_err.velocity() - cur_state.velocity()).norm(),
    )
}

#[cfg(test)]
mod ut_utils {
    use super::*;

    #[test]
    fn angle_bounds() {
        assert!((between_0_360(-179.0) - 181.0).abs() < f64::EPSILON);
        assert!((between_0_360(719.0) - 359.0).abs() < f64::EPSILON);
        assert!((between_pm_180(181.0) - -179.0).abs() < f64::EPSILON);
        assert!((between_pm_x(270.0, 180.0) - -90.0).abs() < f64::EPSILON);
        assert!((between_pm_x(-270.0, 180.0) - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_perpv() {
        assert_eq!(
            perpv(&Vector3::new(6.0, 6.0, 6.0), &Vector3::new(2.0, 0.0, 0.0)),
            Vector3::new(0.0, 6.0, 6.0)
        );
        assert_eq!(
            perpv(&Vector3::new(6.0, 6.0, 6.0), &Vector3::new(-3.0, 0.0, 0.0)),
            Vector3::new(0.0, 6.0, 6.0)
        );
    }
}
