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

use super::{ModelError, ModelPropagationSnafu, ModelTrajSnafu, OrbitModel};
use crate::cosmic::{Frame, Orbit};
use crate::dynamics::Dynamics;
use crate::md::trajectory::Traj;
use crate::propagators::{ErrorCtrl, Propagator, RSSCartesianStep};
use crate::time::Epoch;
use snafu::ResultExt;
use std::fmt;
use std::sync::Mutex;

/// An orbit model backed by the numerical propagator.
///
/// Forward queries lazily extend an internal trajectory cache: asking for a state twice, or
/// for a state between two previously computed ones, interpolates instead of re-propagating.
/// Queries before the initial epoch propagate backward from the initial state without caching,
/// since trajectory generation is only supported forward.
pub struct Propagated<D: Dynamics<StateType = Orbit>, E: ErrorCtrl = RSSCartesianStep> {
    pub prop: Propagator<'static, D, E>,
    pub initial: Orbit,
    cache: Mutex<Traj<Orbit>>,
}

impl<D: Dynamics<StateType = Orbit>, E: ErrorCtrl> Propagated<D, E> {
    /// Builds a new propagated model from the provided propagator setup and initial state.
    pub fn new(prop: Propagator<'static, D, E>, initial: Orbit) -> Self {
        let mut cache = Traj::new();
        cache.states.push(initial);
        Self {
            prop,
            initial,
            cache: Mutex::new(cache),
        }
    }

    /// Returns the span currently covered by the internal cache.
    pub fn cached_span(&self) -> (Epoch, Epoch) {
        let cache = self.cache.lock().unwrap();
        (cache.first().epoch, cache.last().epoch)
    }
}

impl<D: Dynamics<StateType = Orbit>, E: ErrorCtrl> fmt::Display for Propagated<D, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "numerically propagated model of {}", self.initial)
    }
}

impl<D: Dynamics<StateType = Orbit>, E: ErrorCtrl> OrbitModel for Propagated<D, E> {
    fn state_at(&self, epoch: Epoch) -> Result<Orbit, ModelError> {
        if epoch < self.initial.epoch {
            // Backward propagation is not cached
            debug!("backward propagation from {} to {epoch}", self.initial.epoch);
            return self
                .prop
                .with(self.initial)
                .until_epoch(epoch)
                .context(ModelPropagationSnafu);
        }

        let mut cache = self.cache.lock().unwrap();
        if cache.last().epoch < epoch {
            // Extend the cache until the requested epoch
            let last = *cache.last();
            let (_, traj) = self
                .prop
                .with(last)
                .until_epoch_with_traj(epoch)
                .context(ModelPropagationSnafu)?;
            cache.states.extend(traj.states);
            cache.finalize();
        }

        if cache.states.len() == 1 {
            // Only the initial state is cached, and the query is at its exact epoch
            return Ok(self.initial);
        }

        cache.at(epoch).context(ModelTrajSnafu)
    }

    fn epoch(&self) -> Epoch {
        self.initial.epoch
    }

    fn frame(&self) -> Frame {
        self.initial.frame
    }
}
