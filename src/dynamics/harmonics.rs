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

use super::{AccelModel, DynamicsError};
use crate::cosmic::{Frame, Orbit, EARTH_J2, EME2000};
use crate::linalg::Vector3;

use std::fmt;
use std::sync::Arc;

/// `Harmonics` models the zonal harmonic acceleration of an oblate central body, truncated
/// at J2.
///
/// J2 captures the dominant effect of the equatorial bulge: the secular drift of the RAAN
/// and of the argument of periapsis.
pub struct Harmonics {
    pub frame: Frame,
    pub j2: f64,
}

impl Harmonics {
    /// Initializes the J2 gravity model for the provided frame and J2 coefficient.
    pub fn j2(frame: Frame, j2: f64) -> Arc<Self> {
        Arc::new(Self { frame, j2 })
    }

    /// Initializes the J2 gravity model of the Earth.
    pub fn earth_j2() -> Arc<Self> {
        Self::j2(EME2000, EARTH_J2)
    }
}

impl fmt::Display for Harmonics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} J2 ({:.6e})", self.frame, self.j2)
    }
}

impl AccelModel for Harmonics {
    fn eom(&self, osc: &Orbit) -> Result<Vector3<f64>, DynamicsError> {
        if osc.frame != self.frame {
            return Err(DynamicsError::UnsupportedFrame {
                model: format!("{self}"),
                frame: format!("{}", osc.frame),
            });
        }
        let r = osc.rmag_km();
        let re_r = self.frame.equatorial_radius() / r;
        let zr2 = (osc.z_km / r).powi(2);
        // Vallado 4th ed., Eq. 8-30
        let factor = -1.5 * self.j2 * (self.frame.gm() / r.powi(2)) * re_r.powi(2);

        Ok(Vector3::new(
            factor * (1.0 - 5.0 * zr2) * (osc.x_km / r),
            factor * (1.0 - 5.0 * zr2) * (osc.y_km / r),
            factor * (3.0 - 5.0 * zr2) * (osc.z_km / r),
        ))
    }
}

#[cfg(test)]
mod ut_harmonics {
    use super::*;
    use crate::time::Epoch;

    #[test]
    fn j2_pulls_toward_equator() {
        let epoch = Epoch::from_gregorian_tai_at_midnight(2021, 1, 1);
        // State above the northern hemisphere, at a latitude below the 50.8 deg sign change
        // of the Z component ((z/r)^2 < 3/5)
        let orbit = Orbit::keplerian(7_000.0, 0.001, 30.0, 0.0, 0.0, 90.0, epoch, EME2000);
        assert!(orbit.z_km > 0.0);
        let j2 = Harmonics::earth_j2();
        let accel = j2.eom(&orbit).unwrap();
        // The J2 acceleration is about 1e-5 km/s^2 in LEO, about three orders of magnitude
        // below the two body acceleration.
        assert!(accel.norm() > 1e-7);
        assert!(accel.norm() < 1e-4);
        // And its Z component opposes the position above the equator
        assert!(accel[2] * orbit.z_km < 0.0);
    }
}
