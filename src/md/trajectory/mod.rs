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

mod interpolatable;
pub use interpolatable::{Interpolatable, INTERPOLATION_SAMPLES};

mod traj;
pub use traj::Traj;

mod traj_it;
pub use traj_it::TrajIterator;

use crate::math::MathError;
use crate::time::Epoch;
use snafu::Snafu;

/// Errors when building or querying a trajectory.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TrajError {
    #[snafu(display("could not create trajectory: {msg}"))]
    CreationError { msg: String },
    #[snafu(display("no interpolation data at {epoch}"))]
    NoInterpolationData { epoch: Epoch },
    #[snafu(display("trajectory interpolation failed: {source}"))]
    TrajInterpolation { source: MathError },
}
