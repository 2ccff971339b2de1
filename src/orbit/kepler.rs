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

use super::{ModelAstroSnafu, ModelError, OrbitModel};
use crate::cosmic::{AstroError, Coe, Frame, Orbit, EARTH_J2};
use crate::time::Epoch;
use crate::utils::between_0_360;
use snafu::ResultExt;
use std::fmt;

/// The perturbation applied on top of the two body propagation of a [KeplerModel].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum KeplerPerturbation {
    /// Pure two body propagation: only the mean anomaly advances.
    #[default]
    None,
    /// First order J2 secular rates: the RAAN and the argument of periapsis drift, and the
    /// mean motion is corrected.
    J2,
}

/// Analytic propagation of an orbit by advancing its mean anomaly, with optional secular
/// J2 drift of the node and of the argument of periapsis.
///
/// This model is exact for two body dynamics (to the convergence of the Kepler equation
/// solver) and therefore serves as the truth reference when validating the numerical
/// propagator on the same dynamics.
#[derive(Clone, Debug)]
pub struct KeplerModel {
    /// The initial state of this model
    pub initial: Orbit,
    pub perturbation: KeplerPerturbation,
    // Epoch elements of the initial state, computed once
    coe: Coe,
    /// Mean motion in rad/s
    mean_motion_rad_s: f64,
}

impl KeplerModel {
    /// Builds a new Kepler model from the provided initial state.
    ///
    /// Only closed orbits can be propagated by mean anomaly advance: a hyperbolic initial
    /// state is rejected.
    pub fn new(initial: Orbit, perturbation: KeplerPerturbation) -> Result<Self, ModelError> {
        if initial.ecc() >= 1.0 {
            return Err(ModelError::ModelAstro {
                source: AstroError::Hyperbolic {
                    action: "Kepler model propagation",
                },
            });
        }
        let coe = initial.to_coe();
        let mean_motion_rad_s = (initial.frame.gm() / coe.sma_km.powi(3)).sqrt();
        Ok(Self {
            initial,
            perturbation,
            coe,
            mean_motion_rad_s,
        })
    }

    /// Builds a pure two body Kepler model.
    pub fn two_body(initial: Orbit) -> Result<Self, ModelError> {
        Self::new(initial, KeplerPerturbation::None)
    }

    /// Builds a Kepler model with J2 secular drift.
    pub fn j2(initial: Orbit) -> Result<Self, ModelError> {
        Self::new(initial, KeplerPerturbation::J2)
    }

    /// Returns the secular rates (raan_dot, aop_dot, ma_dot) in rad/s, including the mean
    /// motion itself in ma_dot.
    fn secular_rates(&self) -> (f64, f64, f64) {
        let n0 = self.mean_motion_rad_s;
        match self.perturbation {
            KeplerPerturbation::None => (0.0, 0.0, n0),
            KeplerPerturbation::J2 => {
                let ecc = self.coe.ecc;
                let p0 = self.coe.sma_km * (1.0 - ecc.powi(2));
                let (sin_i0, cos_i0) = self.coe.inc_deg.to_radians().sin_cos();
                let j2_factor =
                    1.5 * EARTH_J2 * (self.initial.frame.equatorial_radius() / p0).powi(2);
                let raan_dot = -j2_factor * n0 * cos_i0;
                let aop_dot = j2_factor * n0 * (2.0 - 2.5 * sin_i0.powi(2));
                let ma_dot =
                    n0 * (1.0 + j2_factor * (1.0 - ecc.powi(2)).sqrt() * (1.0 - 1.5 * sin_i0.powi(2)));
                (raan_dot, aop_dot, ma_dot)
            }
        }
    }
}

impl fmt::Display for KeplerModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Kepler model ({:?}) of {}",
            self.perturbation, self.initial
        )
    }
}

impl OrbitModel for KeplerModel {
    fn state_at(&self, epoch: Epoch) -> Result<Orbit, ModelError> {
        let dt_s = (epoch - self.initial.epoch).to_seconds();
        let (raan_dot, aop_dot, ma_dot) = self.secular_rates();

        let ma_deg = between_0_360(self.initial.ma_deg() + (ma_dot * dt_s).to_degrees());
        let raan_deg = between_0_360(self.coe.raan_deg + (raan_dot * dt_s).to_degrees());
        let aop_deg = between_0_360(self.coe.aop_deg + (aop_dot * dt_s).to_degrees());

        Orbit::keplerian_mean_anomaly(
            self.coe.sma_km,
            self.coe.ecc,
            self.coe.inc_deg,
            raan_deg,
            aop_deg,
            ma_deg,
            epoch,
            self.initial.frame,
        )
        .context(ModelAstroSnafu)
    }

    fn epoch(&self) -> Epoch {
        self.initial.epoch
    }

    fn frame(&self) -> Frame {
        self.initial.frame
    }
}

#[cfg(test)]
mod ut_kepler {
    use super::*;
    use crate::cosmic::EME2000;
    use approx::assert_abs_diff_eq;

    #[test]
    fn two_body_one_period_is_identity() {
        let epoch = Epoch::from_gregorian_tai_at_midnight(2021, 2, 3);
        let orbit = Orbit::keplerian(8_000.0, 0.15, 30.0, 45.0, 90.0, 75.0, epoch, EME2000);
        let model = KeplerModel::two_body(orbit).unwrap();
        let one_period_later = model.state_at(epoch + orbit.period()).unwrap();
        let (pos_err, vel_err) = crate::utils::rss_orbit_errors(&one_period_later, &orbit);
        assert!(pos_err < 1e-6, "position error {pos_err} km too large");
        assert!(vel_err < 1e-9, "velocity error {vel_err} km/s too large");
    }

    #[test]
    fn j2_raan_regresses_for_prograde() {
        let epoch = Epoch::from_gregorian_tai_at_midnight(2021, 2, 3);
        let orbit = Orbit::keplerian(7_000.0, 0.01, 51.6, 60.0, 20.0, 0.0, epoch, EME2000);
        let model = KeplerModel::j2(orbit).unwrap();
        // After one day, a prograde LEO bird sees its node regress by several degrees
        let after = model.state_at(epoch + crate::time::Unit::Day * 1).unwrap();
        let drift = after.raan_deg() - 60.0;
        assert!(drift < -1.0, "RAAN drift {drift} deg should be several degrees westward");
        assert!(drift > -10.0);
        // The SMA is untouched by the secular model
        assert_abs_diff_eq!(after.sma_km(), orbit.sma_km(), epsilon = 1e-6);
    }

    #[test]
    fn hyperbolic_rejected() {
        let epoch = Epoch::from_gregorian_tai_at_midnight(2021, 2, 3);
        let orbit = Orbit::keplerian(-25_000.0, 1.5, 30.0, 45.0, 90.0, 10.0, epoch, EME2000);
        assert!(KeplerModel::two_body(orbit).is_err());
    }
}
