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

use crate::cosmic::{AstroError, Orbit, Spacecraft};
use crate::linalg::allocator::Allocator;
use crate::linalg::{DefaultAllocator, OVector, Vector3};
use crate::State;
use snafu::Snafu;

use std::fmt;

/// Cartesian-based orbital dynamics.
///
/// Ensure coordinate frames match or perform transformations when combining dynamics.
pub mod orbital;
pub use self::orbital::*;

/// Spacecraft dynamics, including forces, propulsion and maneuvers.
pub mod spacecraft;
pub use self::spacecraft::*;

/// Zonal harmonic gravity models.
pub mod harmonics;
pub use self::harmonics::*;

/// Atmospheric drag models.
pub mod drag;
pub use self::drag::*;

/// Thrusters and finite burns.
pub mod thrust;
pub use self::thrust::{Maneuver, Thruster};

/// A trait for models with equations of motion that can be integrated.
///
/// This trait is designed for composition, allowing different dynamics to be combined.
/// When combining dynamics, ensure that time and state are handled consistently.
#[allow(clippy::type_complexity)]
pub trait Dynamics: Clone + Sync + Send
where
    DefaultAllocator: Allocator<<Self::StateType as State>::Size>
        + Allocator<<Self::StateType as State>::VecLength>
        + Allocator<<Self::StateType as State>::Size, <Self::StateType as State>::Size>,
{
    type StateType: State;

    /// Defines the equations of motion.
    ///
    /// - `delta_t`: Time in seconds past the context epoch.
    /// - `state_vec`: The state vector, which changes at each integration step.
    /// - `state_ctx`: The state context, used to rebuild the state from the state vector.
    fn eom(
        &self,
        delta_t: f64,
        state_vec: &OVector<f64, <Self::StateType as State>::VecLength>,
        state_ctx: &Self::StateType,
    ) -> Result<OVector<f64, <Self::StateType as State>::VecLength>, DynamicsError>
    where
        DefaultAllocator: Allocator<<Self::StateType as State>::VecLength>;

    /// Performs final changes after each successful integration step.
    ///
    /// Also called before the first integration step to update the initial state if needed.
    fn finally(&self, next_state: Self::StateType) -> Result<Self::StateType, DynamicsError> {
        Ok(next_state)
    }
}

/// A trait for immutable dynamics which return a force (e.g. atmospheric drag).
///
/// The force, in Newtons, is divided by the spacecraft's total mass to compute the
/// acceleration (F = ma).
pub trait ForceModel: Send + Sync + fmt::Display {
    /// Defines the equations of motion for this force model, returning a force in Newtons.
    fn eom(&self, ctx: &Spacecraft) -> Result<Vector3<f64>, DynamicsError>;
}

/// A trait for immutable dynamics which return an acceleration (e.g. third body gravity,
/// zonal harmonics).
///
/// The acceleration is in km/s^2, in the same frame as the osculating orbit.
pub trait AccelModel: Send + Sync + fmt::Display {
    /// Defines the equations of motion for this acceleration model.
    fn eom(&self, osc: &Orbit) -> Result<Vector3<f64>, DynamicsError>;
}

/// Dynamical model errors.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DynamicsError {
    /// Fuel exhausted.
    #[snafu(display("fuel exhausted at {sc}"))]
    FuelExhausted { sc: Box<Spacecraft> },
    /// Astrodynamics error.
    #[snafu(display("dynamical model encountered an astro error: {source}"))]
    DynamicsAstro { source: AstroError },
    /// A maneuver is scheduled but no thruster is defined on the spacecraft.
    #[snafu(display("a maneuver is scheduled but the spacecraft has no thruster"))]
    NoThrusterAvail,
    /// The model does not support the frame of the provided state.
    #[snafu(display("dynamical model {model} does not support the {frame} frame"))]
    UnsupportedFrame { model: String, frame: String },
}
