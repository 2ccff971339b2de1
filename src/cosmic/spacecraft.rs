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

use super::{AstroError, Orbit, State, TimeTagged};
use crate::dynamics::thrust::Thruster;
use crate::linalg::{OVector, U7};
use crate::md::StateParameter;
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use typed_builder::TypedBuilder;

/// The drag configuration of a spacecraft.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Drag area in m^2
    pub area_m2: f64,
    /// Drag coefficient (2.2 is a common default for a box-shaped spacecraft)
    pub cd: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            area_m2: 0.0,
            cd: 2.2,
        }
    }
}

/// A spacecraft state: an orbit, mass information, and hardware configuration.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, TypedBuilder)]
pub struct Spacecraft {
    /// The orbit of this spacecraft
    pub orbit: Orbit,
    /// Dry mass, in kg
    #[builder(default)]
    pub dry_mass_kg: f64,
    /// Usable fuel mass, in kg
    #[builder(default)]
    pub fuel_mass_kg: f64,
    /// Drag configuration
    #[builder(default)]
    pub drag: DragConfig,
    /// Thruster, if any
    #[builder(default, setter(strip_option))]
    #[serde(skip)]
    pub thruster: Option<Thruster>,
}

impl Spacecraft {
    /// Initialize a spacecraft from its orbit and masses, with no drag nor thruster.
    pub fn new(orbit: Orbit, dry_mass_kg: f64, fuel_mass_kg: f64) -> Self {
        Self {
            orbit,
            dry_mass_kg,
            fuel_mass_kg,
            drag: DragConfig::default(),
            thruster: None,
        }
    }

    /// Initialize a spacecraft from only its orbit: all masses are zero.
    pub fn from_orbit(orbit: Orbit) -> Self {
        Self::new(orbit, 0.0, 0.0)
    }

    /// Returns the total mass in kg
    pub fn total_mass_kg(&self) -> f64 {
        self.dry_mass_kg + self.fuel_mass_kg
    }

    /// Returns a copy of this spacecraft with the provided orbit
    pub fn with_orbit(self, orbit: Orbit) -> Self {
        let mut me = self;
        me.orbit = orbit;
        me
    }

    /// Returns a copy of this spacecraft with the provided fuel mass
    pub fn with_fuel_mass_kg(self, fuel_mass_kg: f64) -> Self {
        let mut me = self;
        me.fuel_mass_kg = fuel_mass_kg;
        me
    }

    /// Returns a copy of this spacecraft with the provided drag area and coefficient
    pub fn with_drag(self, area_m2: f64, cd: f64) -> Self {
        let mut me = self;
        me.drag = DragConfig { area_m2, cd };
        me
    }

    /// Returns a copy of this spacecraft with the provided thruster
    pub fn with_thruster(self, thruster: Thruster) -> Self {
        let mut me = self;
        me.thruster = Some(thruster);
        me
    }
}

impl PartialEq for Spacecraft {
    fn eq(&self, other: &Self) -> bool {
        let mass_tol = 1e-6; // milligram
        self.orbit == other.orbit
            && (self.dry_mass_kg - other.dry_mass_kg).abs() < mass_tol
            && (self.fuel_mass_kg - other.fuel_mass_kg).abs() < mass_tol
    }
}

impl fmt::Display for Spacecraft {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\ttotal mass = {:.3} kg (fuel = {:.3} kg)",
            self.orbit,
            self.total_mass_kg(),
            self.fuel_mass_kg
        )
    }
}

impl TimeTagged for Spacecraft {
    fn epoch(&self) -> Epoch {
        self.orbit.epoch
    }

    fn set_epoch(&mut self, epoch: Epoch) {
        self.orbit.epoch = epoch
    }
}

impl State for Spacecraft {
    type Size = U7;
    type VecLength = U7;

    fn zeros() -> Self {
        Self::from_orbit(Orbit::zeros())
    }

    /// The vector is organized as such: [x, y, z, vx, vy, vz, fuel_mass]
    fn as_vector(&self) -> OVector<f64, U7> {
        let mut vector = OVector::<f64, U7>::zeros();
        for (i, val) in self.orbit.to_cartesian_vec().iter().enumerate() {
            vector[i] = *val;
        }
        vector[6] = self.fuel_mass_kg;
        vector
    }

    fn set(&mut self, epoch: Epoch, vector: &OVector<f64, U7>) -> Result<(), AstroError> {
        self.set_epoch(epoch);
        self.orbit.x_km = vector[0];
        self.orbit.y_km = vector[1];
        self.orbit.z_km = vector[2];
        self.orbit.vx_km_s = vector[3];
        self.orbit.vy_km_s = vector[4];
        self.orbit.vz_km_s = vector[5];
        self.fuel_mass_kg = vector[6];
        Ok(())
    }

    fn value(&self, param: StateParameter) -> Result<f64, AstroError> {
        match param {
            StateParameter::FuelMass => Ok(self.fuel_mass_kg),
            StateParameter::DryMass => Ok(self.dry_mass_kg),
            StateParameter::TotalMass => Ok(self.total_mass_kg()),
            _ => self.orbit.value(param),
        }
    }
}

#[cfg(test)]
mod ut_spacecraft {
    use super::*;
    use crate::cosmic::EME2000;

    #[test]
    fn sc_vector_roundtrip() {
        let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 8, 1);
        let orbit = Orbit::keplerian(7_500.0, 0.01, 28.5, 10.0, 20.0, 30.0, epoch, EME2000);
        let sc = Spacecraft::new(orbit, 500.0, 85.6);
        let vector = sc.as_vector();
        assert!((vector[6] - 85.6).abs() < f64::EPSILON);
        let mut rebuilt = Spacecraft::zeros();
        rebuilt.set(epoch, &vector).unwrap();
        rebuilt.dry_mass_kg = 500.0;
        assert_eq!(rebuilt, sc);
        assert!((sc.total_mass_kg() - 585.6).abs() < 1e-9);
    }

    #[test]
    fn sc_builder() {
        let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 8, 1);
        let orbit = Orbit::keplerian(7_500.0, 0.01, 28.5, 10.0, 20.0, 30.0, epoch, EME2000);
        let sc = Spacecraft::builder()
            .orbit(orbit)
            .dry_mass_kg(321.0)
            .build();
        assert!((sc.fuel_mass_kg).abs() < f64::EPSILON);
        assert!((sc.drag.cd - 2.2).abs() < f64::EPSILON);
    }
}
