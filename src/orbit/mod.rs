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

use crate::cosmic::{AstroError, Frame, Orbit};
use crate::md::trajectory::{Traj, TrajError};
use crate::propagators::PropagationError;
use crate::time::{Duration, Epoch, TimeSeries};
use snafu::Snafu;
use std::fmt;

/// Analytic two body propagation, with an optional J2 secular correction.
pub mod kepler;
pub use kepler::{KeplerModel, KeplerPerturbation};

/// TLE driven SGP4 propagation.
pub mod sgp4;
pub use sgp4::{Sgp4Model, Tle};

/// Numerical propagation behind the common model interface, with a lazily extended cache.
pub mod propagated;
pub use propagated::Propagated;

/// A model built from a table of provided states.
pub mod tabulated;
pub use tabulated::Tabulated;

/// An orbit model answers "where is this object at epoch T".
///
/// All models share this interface so mission analysis code does not need to care whether the
/// underlying states come from an analytic propagation, SGP4, a numerical integration, or a
/// table of states.
pub trait OrbitModel: Send + Sync + fmt::Display {
    /// Returns the state of the object at the provided epoch.
    fn state_at(&self, epoch: Epoch) -> Result<Orbit, ModelError>;

    /// Returns the reference epoch of this model.
    fn epoch(&self) -> Epoch;

    /// Returns the frame in which this model computes its states.
    fn frame(&self) -> Frame;

    /// Samples this model between the provided epochs with a fixed step, returning the
    /// resulting trajectory.
    fn sample(&self, start: Epoch, end: Epoch, step: Duration) -> Result<Traj<Orbit>, ModelError> {
        let mut traj = Traj::new();
        for epoch in TimeSeries::inclusive(start, end, step) {
            traj.states.push(self.state_at(epoch)?);
        }
        traj.finalize();
        Ok(traj)
    }
}

/// Errors from the orbit models.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ModelError {
    #[snafu(display("model propagation failed: {source}"))]
    ModelPropagation { source: PropagationError },
    #[snafu(display("model trajectory query failed: {source}"))]
    ModelTraj { source: TrajError },
    #[snafu(display("model state computation failed: {source}"))]
    ModelAstro { source: AstroError },
    #[snafu(display("SGP4 propagation failed: {msg}"))]
    Sgp4 { msg: String },
    #[snafu(display("could not parse the two line element set: {msg}"))]
    TleParse { msg: String },
    #[snafu(display("a tabulated model requires at least {need} states but {got} were provided"))]
    NotEnoughStates { need: usize, got: usize },
}
