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

use super::{AccelModel, Dynamics, DynamicsError};
use crate::cosmic::{Bodies, Orbit};
use crate::linalg::{Vector3, Vector6};
use crate::utils::epoch_to_instant;
use crate::State;
use satkit::lpephem;

use std::fmt;
use std::sync::Arc;

/// `OrbitalDynamics` provides the equations of motion for any celestial dynamic, without mass
/// depletion nor force models.
///
/// Orbital dynamics _always_ include the two body dynamics of the integration frame's central
/// body, these cannot be turned off.
#[derive(Clone, Default)]
pub struct OrbitalDynamics {
    pub accel_models: Vec<Arc<dyn AccelModel + 'static>>,
}

impl OrbitalDynamics {
    /// Initializes OrbitalDynamics which does not simulate the gravity pull of other celestial
    /// objects but the central one.
    pub fn two_body() -> Self {
        Self::new(vec![])
    }

    /// Initializes point mass dynamics for the provided third bodies, on top of the two body
    /// dynamics.
    pub fn point_masses(bodies: &[Bodies]) -> Self {
        Self::new(vec![PointMasses::new(bodies)])
    }

    /// Initializes orbital dynamics with a list of acceleration models.
    pub fn new(accel_models: Vec<Arc<dyn AccelModel + 'static>>) -> Self {
        Self { accel_models }
    }

    /// Initializes new orbital mechanics with the provided model.
    pub fn with_model(accel_model: Arc<dyn AccelModel + 'static>) -> Self {
        Self::new(vec![accel_model])
    }

    /// Add a model to the currently defined orbital dynamics
    pub fn add_model(&mut self, accel_model: Arc<dyn AccelModel + 'static>) {
        self.accel_models.push(accel_model);
    }
}

impl fmt::Display for OrbitalDynamics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.accel_models.is_empty() {
            write!(f, "Orbital dynamics: two body")
        } else {
            let models: Vec<String> = self.accel_models.iter().map(|x| format!("{x}")).collect();
            write!(f, "Orbital dynamics: two body + {}", models.join(" + "))
        }
    }
}

impl Dynamics for OrbitalDynamics {
    type StateType = Orbit;

    fn eom(
        &self,
        delta_t: f64,
        state: &Vector6<f64>,
        ctx: &Orbit,
    ) -> Result<Vector6<f64>, DynamicsError> {
        let osc = ctx.ctor_from(delta_t, state);
        let body_acceleration = (-osc.frame.gm() / osc.rmag_km().powi(3)) * osc.radius();
        // The derivative of the radius is the velocity, and the derivative of the velocity
        // is the sum of all accelerations.
        let mut d_x = Vector6::from_iterator(
            osc.velocity()
                .iter()
                .chain(body_acceleration.iter())
                .cloned(),
        );

        // Apply the acceleration models
        for model in &self.accel_models {
            let model_acc = model.eom(&osc)?;
            for i in 0..3 {
                d_x[i + 3] += model_acc[i];
            }
        }

        Ok(d_x)
    }
}

/// `PointMasses` model the gravity pull of other celestial objects as point masses, using the
/// analytical low precision ephemerides for the Sun and the Moon.
///
/// The integration frame must be Earth centered: the ephemerides are geocentric.
pub struct PointMasses {
    pub bodies: Vec<Bodies>,
}

impl PointMasses {
    /// Initializes the multibody point mass dynamics with the provided list of bodies
    pub fn new(bodies: &[Bodies]) -> Arc<Self> {
        Arc::new(Self {
            bodies: bodies.to_vec(),
        })
    }
}

impl fmt::Display for PointMasses {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = self.bodies.iter().map(|b| b.name()).collect();
        write!(f, "point masses of {}", names.join(", "))
    }
}

impl AccelModel for PointMasses {
    fn eom(&self, osc: &Orbit) -> Result<Vector3<f64>, DynamicsError> {
        if osc.frame.body() != Bodies::Earth {
            return Err(DynamicsError::UnsupportedFrame {
                model: format!("{self}"),
                frame: format!("{}", osc.frame),
            });
        }
        let instant = epoch_to_instant(osc.epoch);
        let mut d_x = Vector3::zeros();
        // Get all of the position vectors between the center body and the third bodies
        for third_body in &self.bodies {
            let pos_m = match third_body {
                Bodies::Sun => lpephem::sun::pos_gcrf(&instant),
                Bodies::Luna => lpephem::moon::pos_gcrf(&instant),
                Bodies::Earth => {
                    return Err(DynamicsError::UnsupportedFrame {
                        model: format!("{self}"),
                        frame: "Earth as its own third body".to_string(),
                    })
                }
            };
            // Orbit of j-th body as seen from primary body, in km
            let r_ij = Vector3::new(pos_m[0], pos_m[1], pos_m[2]) / 1_000.0;
            let r_ij3 = r_ij.norm().powi(3);
            let r_j = osc.radius() - r_ij; // sc as seen from 3rd body
            let r_j3 = r_j.norm().powi(3);
            d_x += -third_body.gm() * (r_j / r_j3 + r_ij / r_ij3);
        }
        Ok(d_x)
    }
}

#[cfg(test)]
mod ut_orbital {
    use super::*;
    use crate::cosmic::EME2000;
    use crate::time::Epoch;

    #[test]
    fn two_body_eom_is_central_gravity() {
        let epoch = Epoch::from_gregorian_tai_at_midnight(2021, 1, 1);
        let orbit = Orbit::keplerian(7_000.0, 0.0001, 30.0, 45.0, 60.0, 80.0, epoch, EME2000);
        let dyn_2b = OrbitalDynamics::two_body();
        let d_x = dyn_2b.eom(0.0, &orbit.to_cartesian_vec(), &orbit).unwrap();
        // First three rows are the velocity
        for i in 0..3 {
            assert!((d_x[i] - orbit.velocity()[i]).abs() < f64::EPSILON);
        }
        // Last three rows are -mu r / |r|^3
        let expect = (-EME2000.gm() / orbit.rmag_km().powi(3)) * orbit.radius();
        for i in 0..3 {
            assert!((d_x[i + 3] - expect[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn point_masses_magnitude() {
        // The Sun and Moon perturbations on a GEO bird are both below 1e-8 km/s^2 but nonzero.
        let epoch = Epoch::from_gregorian_utc_at_midnight(2022, 6, 15);
        let orbit = Orbit::keplerian(42_164.0, 0.001, 0.1, 10.0, 20.0, 30.0, epoch, EME2000);
        let models = PointMasses::new(&[Bodies::Sun, Bodies::Luna]);
        let accel = models.eom(&orbit).unwrap();
        assert!(accel.norm() > 1e-10);
        assert!(accel.norm() < 1e-5);
    }
}
