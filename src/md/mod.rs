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

/// Events and event conditions, evaluated on trajectories.
pub mod events;
pub use events::{AndEvent, Event, EventEvaluator, OrEvent};

/// Dense trajectories and their interpolation.
pub mod trajectory;

mod param;
pub use param::StateParameter;

/// A prelude for mission design and analysis.
pub mod prelude {
    pub use super::events::{AndEvent, Event, EventEvaluator, OrEvent};
    pub use super::trajectory::{Interpolatable, Traj};
    pub use super::StateParameter;
    pub use crate::cosmic::{Bodies, Coe, Frame, Orbit, Spacecraft, State, TimeTagged, EME2000};
    pub use crate::dynamics::{Dynamics, OrbitalDynamics, SpacecraftDynamics};
    pub use crate::propagators::{PropOpts, Propagator};
    pub use crate::time::{Duration, Epoch, TimeUnits, Unit};
}
