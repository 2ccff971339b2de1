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

use super::thrust::Maneuver;
use super::{Dynamics, DynamicsError, ForceModel, OrbitalDynamics};
use crate::cosmic::{Spacecraft, TimeTagged};
use crate::linalg::{OVector, U7};
use crate::State;

use std::fmt;
use std::sync::Arc;

/// `SpacecraftDynamics` composes the orbital dynamics with force models and an optional
/// finite burn.
///
/// By default, the fuel mass is decremented during a burn (`mdot = F / (Isp * g0)`).
#[derive(Clone)]
pub struct SpacecraftDynamics {
    pub orbital_dyn: OrbitalDynamics,
    pub force_models: Vec<Arc<dyn ForceModel + 'static>>,
    pub mnvr: Option<Maneuver>,
    pub decrement_mass: bool,
}

impl SpacecraftDynamics {
    /// Initializes spacecraft dynamics from the provided orbital dynamics, with no force
    /// model nor maneuver.
    pub fn new(orbital_dyn: OrbitalDynamics) -> Self {
        Self {
            orbital_dyn,
            force_models: Vec::new(),
            mnvr: None,
            decrement_mass: true,
        }
    }

    /// Initializes spacecraft dynamics with the provided force model.
    pub fn from_model(orbital_dyn: OrbitalDynamics, force_model: Arc<dyn ForceModel>) -> Self {
        let mut me = Self::new(orbital_dyn);
        me.add_model(force_model);
        me
    }

    /// Add a force model to the currently defined dynamics
    pub fn add_model(&mut self, force_model: Arc<dyn ForceModel>) {
        self.force_models.push(force_model);
    }

    /// Returns a copy of these dynamics with the provided maneuver scheduled
    pub fn with_maneuver(self, mnvr: Maneuver) -> Self {
        let mut me = self;
        me.mnvr = Some(mnvr);
        me
    }

    /// Returns a copy of these dynamics without any fuel mass decrement during burns
    pub fn without_fuel_decrement(self) -> Self {
        let mut me = self;
        me.decrement_mass = false;
        me
    }
}

impl fmt::Display for SpacecraftDynamics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let models: Vec<String> = self.force_models.iter().map(|x| format!("{x}")).collect();
        write!(
            f,
            "Spacecraft dynamics (with{} maneuvers): {} {}",
            if self.mnvr.is_some() { "" } else { "out" },
            self.orbital_dyn,
            models.join(" + ")
        )
    }
}

impl Dynamics for SpacecraftDynamics {
    type StateType = Spacecraft;

    fn eom(
        &self,
        delta_t: f64,
        state: &OVector<f64, U7>,
        ctx: &Spacecraft,
    ) -> Result<OVector<f64, U7>, DynamicsError> {
        // Rebuild the osculating spacecraft at the offset epoch: the force models and the
        // maneuver schedule are epoch dependent.
        let osc_sc = ctx.ctor_from(delta_t, state);
        let mut d_x = OVector::<f64, U7>::zeros();

        // Compute the orbital dynamics contribution on the Cartesian rows
        let orbital_vec = state.fixed_rows::<6>(0).into_owned();
        let d_orbit = self.orbital_dyn.eom(delta_t, &orbital_vec, &ctx.orbit)?;
        for i in 0..6 {
            d_x[i] = d_orbit[i];
        }

        let total_mass_kg = osc_sc.total_mass_kg();

        // Apply the force models, dividing by the total mass (F = ma) and converting the
        // force from Newtons into kg * km / s^2.
        for model in &self.force_models {
            let force_n = model.eom(&osc_sc)?;
            for i in 0..3 {
                d_x[i + 3] += force_n[i] / total_mass_kg / 1_000.0;
            }
        }

        // Apply the thrust, if a maneuver is in progress
        if let Some(mnvr) = self.mnvr {
            if mnvr.in_progress(osc_sc.epoch()) {
                let thruster = osc_sc.thruster.ok_or(DynamicsError::NoThrusterAvail)?;
                let thrust_n = mnvr.thrust_lvl * thruster.thrust_n;
                for i in 0..3 {
                    d_x[i + 3] += mnvr.direction[i] * thrust_n / total_mass_kg / 1_000.0;
                }
                if self.decrement_mass {
                    // mdot = F / (Isp * g0), in kg/s
                    d_x[6] -= thrust_n / thruster.exhaust_velocity_m_s();
                }
            }
        }

        Ok(d_x)
    }

    fn finally(&self, next_state: Self::StateType) -> Result<Self::StateType, DynamicsError> {
        if next_state.fuel_mass_kg < 0.0 {
            error!("negative fuel mass at {}", next_state.epoch());
            return Err(DynamicsError::FuelExhausted {
                sc: Box::new(next_state),
            });
        }
        Ok(next_state)
    }
}
