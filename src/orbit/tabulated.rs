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

use super::{ModelError, ModelTrajSnafu, OrbitModel};
use crate::cosmic::{Frame, Orbit};
use crate::md::trajectory::Traj;
use crate::time::Epoch;
use snafu::ResultExt;
use std::fmt;

/// An orbit model built from a table of provided states, e.g. from an external ephemeris
/// provider.
///
/// Queries within the table span are interpolated; queries outside of it are an error, as
/// extrapolating an ephemeris is rarely what anyone wants.
pub struct Tabulated {
    pub traj: Traj<Orbit>,
}

impl Tabulated {
    /// Builds a tabulated model from the provided states. At least two states are required,
    /// and they must all share the same frame.
    pub fn new(states: Vec<Orbit>) -> Result<Self, ModelError> {
        if states.len() < 2 {
            return Err(ModelError::NotEnoughStates {
                need: 2,
                got: states.len(),
            });
        }
        let frame = states[0].frame;
        if states.iter().any(|state| state.frame != frame) {
            return Err(ModelError::ModelTraj {
                source: crate::md::trajectory::TrajError::CreationError {
                    msg: "all tabulated states must share the same frame".to_string(),
                },
            });
        }
        let mut traj = Traj::new();
        traj.states = states;
        traj.finalize();
        Ok(Self { traj })
    }
}

impl fmt::Display for Tabulated {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "tabulated model of {} states from {} to {}",
            self.traj.states.len(),
            self.traj.first().epoch,
            self.traj.last().epoch
        )
    }
}

impl OrbitModel for Tabulated {
    fn state_at(&self, epoch: Epoch) -> Result<Orbit, ModelError> {
        self.traj.at(epoch).context(ModelTrajSnafu)
    }

    fn epoch(&self) -> Epoch {
        self.traj.first().epoch
    }

    fn frame(&self) -> Frame {
        self.traj.first().frame
    }
}
