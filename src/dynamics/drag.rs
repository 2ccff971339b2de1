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

use super::{DynamicsError, ForceModel};
use crate::cosmic::Spacecraft;
use crate::linalg::Vector3;

use std::fmt;
use std::sync::Arc;

/// An atmospheric density model, in kg/m^3.
#[derive(Copy, Clone, Debug)]
pub enum AtmDensity {
    /// A constant density, useful for quick order-of-magnitude analyses
    Constant { rho: f64 },
    /// An exponential decay from a reference altitude:
    /// `rho(h) = rho0 * exp(-(h - ref_alt) / scale_height)`
    Exponential {
        rho0: f64,
        ref_alt_km: f64,
        scale_height_km: f64,
    },
}

impl AtmDensity {
    /// Returns the density at the provided altitude, in kg/m^3
    pub fn density(&self, altitude_km: f64) -> f64 {
        match *self {
            Self::Constant { rho } => rho,
            Self::Exponential {
                rho0,
                ref_alt_km,
                scale_height_km,
            } => rho0 * (-(altitude_km - ref_alt_km) / scale_height_km).exp(),
        }
    }
}

/// `AtmosphericDrag` is the cannonball drag model:
/// `F = -1/2 rho (Cd A) |v_rel| v_rel`, where the relative velocity is taken with respect to
/// the atmosphere rotating with the central body.
///
/// **WARNING:** This model assumes that the upper atmosphere co-rotates exactly with the
/// central body, which underestimates thermospheric winds.
pub struct AtmosphericDrag {
    pub density: AtmDensity,
}

impl AtmosphericDrag {
    /// Initializes the drag model with a constant density, in kg/m^3
    pub fn constant(rho: f64) -> Arc<Self> {
        Arc::new(Self {
            density: AtmDensity::Constant { rho },
        })
    }

    /// Initializes the drag model with an exponentially decaying density.
    ///
    /// `rho0` is the density at the reference altitude `ref_alt_km`, decaying with the
    /// provided scale height.
    pub fn exponential(rho0: f64, ref_alt_km: f64, scale_height_km: f64) -> Arc<Self> {
        Arc::new(Self {
            density: AtmDensity::Exponential {
                rho0,
                ref_alt_km,
                scale_height_km,
            },
        })
    }
}

impl fmt::Display for AtmosphericDrag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.density {
            AtmDensity::Constant { rho } => write!(f, "constant density drag ({rho} kg/m^3)"),
            AtmDensity::Exponential { rho0, .. } => {
                write!(f, "exponential density drag (rho0 = {rho0} kg/m^3)")
            }
        }
    }
}

impl ForceModel for AtmosphericDrag {
    fn eom(&self, ctx: &Spacecraft) -> Result<Vector3<f64>, DynamicsError> {
        let osc = &ctx.orbit;
        if !osc.frame.is_geoid() {
            return Err(DynamicsError::UnsupportedFrame {
                model: format!("{self}"),
                frame: format!("{}", osc.frame),
            });
        }
        let rho = self.density.density(osc.altitude_km());
        // Velocity relative to the rotating atmosphere, in km/s
        let omega = Vector3::new(0.0, 0.0, osc.frame.angular_velocity());
        let v_rel_km_s = osc.velocity() - omega.cross(&osc.radius());
        // Work in SI to apply the density, then the force is in Newtons
        let v_rel = v_rel_km_s * 1_000.0;
        Ok(-0.5 * rho * ctx.drag.cd * ctx.drag.area_m2 * v_rel.norm() * v_rel)
    }
}

#[cfg(test)]
mod ut_drag {
    use super::*;
    use crate::cosmic::{Orbit, EME2000};
    use crate::time::Epoch;

    #[test]
    fn exponential_decays() {
        let atm = AtmDensity::Exponential {
            rho0: 1.225,
            ref_alt_km: 0.0,
            scale_height_km: 8.5,
        };
        assert!((atm.density(0.0) - 1.225).abs() < f64::EPSILON);
        assert!(atm.density(100.0) < 1e-4);
        assert!(atm.density(100.0) > 0.0);
    }

    #[test]
    fn drag_opposes_velocity() {
        let epoch = Epoch::from_gregorian_tai_at_midnight(2021, 1, 1);
        let orbit = Orbit::keplerian(6_778.0, 0.0005, 51.6, 10.0, 20.0, 30.0, epoch, EME2000);
        let sc = Spacecraft::new(orbit, 400.0, 50.0).with_drag(5.0, 2.2);
        let drag = AtmosphericDrag::constant(1e-12);
        let force_n = drag.eom(&sc).unwrap();
        // The drag force must oppose the relative velocity, which is mostly the inertial one
        assert!(force_n.dot(&orbit.velocity()) < 0.0);
    }
}
