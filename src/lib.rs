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

/*! # hemera

Hemera propagates orbits. It combines composable dynamics (central-body and
third-body gravity, zonal harmonics, atmospheric drag, finite burns) with
adaptive-step Runge-Kutta integration, event finding on dense trajectories,
and orbit models (Kepler, SGP4, Propagated, Tabulated) that all answer
"where is this object at time T" through a single trait.
*/

/// Provides all the propagators / integrators available in `hemera`.
pub mod propagators;

/// Provides several dynamics used for orbital mechanics, which can be elegantly combined.
pub mod dynamics;

/// Provides the states, reference frames, and celestial body constants.
pub mod cosmic;

/// Utility functions shared by different modules, and which may be useful to engineers.
pub mod utils;

mod errors;
/// Hemera will (almost) never panic and functions which may fail will return an error.
pub use self::errors::{EventError, HemeraError};

/// All the input/output needs for this library, including configuration files and CCSDS messages.
pub mod io;

/// All of the mission design and mission analysis tools and functions.
pub mod md;

/// Orbit models which answer "state at epoch" queries: Kepler, SGP4, Propagated, Tabulated.
pub mod orbit;

/// Interpolation and other math helpers.
pub mod math;

#[macro_use]
extern crate log;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

/// Re-export some useful things
pub use self::cosmic::{Frame, Orbit, Spacecraft, State, TimeTagged};
