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

use crate::linalg::allocator::Allocator;
use crate::linalg::{DefaultAllocator, DimName, OVector};
use crate::md::StateParameter;
use crate::time::Epoch;
use snafu::Snafu;
use std::fmt;

/// Celestial body constants and reference frames.
pub mod frames;
pub use self::frames::*;

/// The orbital state, with Cartesian and Keplerian representations.
pub mod orbit;
pub use self::orbit::*;

/// A spacecraft state, wrapping an orbit with mass and hardware information.
pub mod spacecraft;
pub use self::spacecraft::*;

/// A trait allowing for something to have an epoch
pub trait TimeTagged {
    /// Retrieve the Epoch
    fn epoch(&self) -> Epoch;
    /// Set the Epoch
    fn set_epoch(&mut self, epoch: Epoch);
}

/// A trait for propagation and estimation states.
///
/// `Size` is the size of the state vector itself, and `VecLength` the size of the
/// vector exchanged with the integrator. They are identical for all states in hemera,
/// but remain separate dimensions so states may carry additional integrated items.
pub trait State:
    TimeTagged + Copy + Clone + PartialEq + Send + Sync + fmt::Debug + fmt::Display
where
    Self: Sized,
    DefaultAllocator: Allocator<Self::Size>
        + Allocator<Self::Size, Self::Size>
        + Allocator<Self::VecLength>,
{
    /// Size of the state
    type Size: DimName;
    /// Size of the propagated vector
    type VecLength: DimName;

    /// Initialize an empty state
    fn zeros() -> Self;

    /// Return this state as a vector for the propagation
    fn as_vector(&self) -> OVector<f64, Self::VecLength>;

    /// Set this state from the provided epoch and vector
    fn set(&mut self, epoch: Epoch, vector: &OVector<f64, Self::VecLength>) -> Result<(), AstroError>;

    /// Retrieve the value of the provided state parameter, if available on this state
    fn value(&self, param: StateParameter) -> Result<f64, AstroError>;

    /// Reconstruct a new state from the provided delta time in seconds compared to the
    /// current state, and with the provided vector.
    fn ctor_from(self, delta_t_s: f64, vector: &OVector<f64, Self::VecLength>) -> Self {
        let mut me = self;
        // The vector is always built from a state which already has a valid epoch.
        me.set(me.epoch() + delta_t_s * crate::time::Unit::Second, vector)
            .unwrap();
        me
    }
}

/// Errors from state and orbital element computations.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AstroError {
    #[snafu(display("math domain error: {msg}"))]
    MathDomain { msg: String },
    #[snafu(display("maximum iterations reached: {msg}"))]
    MaxIterReached { msg: String },
    #[snafu(display("parameter {param:?} not available on this state"))]
    ParamNotSupported { param: StateParameter },
    #[snafu(display("no object or frame named `{name}`"))]
    ObjectNotFound { name: String },
    #[snafu(display("operation {action} is not defined for hyperbolic orbits"))]
    Hyperbolic { action: &'static str },
}
