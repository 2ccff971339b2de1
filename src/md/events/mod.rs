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

pub mod details;
pub use details::{EventArc, EventDetails, EventEdge};
mod compound;
pub use compound::{AndEvent, OrEvent};
mod evaluators;
pub mod search;

use super::StateParameter;
use crate::cosmic::Frame;
use crate::errors::EventError;
use crate::linalg::allocator::Allocator;
use crate::linalg::DefaultAllocator;
use crate::time::{Duration, Unit};
use crate::State;
use serde_derive::{Deserialize, Serialize};

use std::default::Default;
use std::fmt;

/// A trait to specify how a specific event must be evaluated.
///
/// The evaluation returns a signed value which is zero at the event: the event is found by
/// looking for sign changes of this value along a trajectory.
pub trait EventEvaluator<S: State>: fmt::Display + Send + Sync
where
    DefaultAllocator: Allocator<S::Size> + Allocator<S::Size, S::Size> + Allocator<S::VecLength>,
{
    /// Evaluation of event crossing: returns whether the condition happened between both states.
    fn eval_crossing(&self, prev_state: &S, next_state: &S) -> Result<bool, EventError> {
        let prev = self.eval(prev_state)?;
        let next = self.eval(next_state)?;

        Ok(prev * next < 0.0)
    }

    /// Evaluation of the event: returns a value corresponding to whether the state is before or
    /// after the event.
    fn eval(&self, state: &S) -> Result<f64, EventError>;

    /// Returns a string representation of the event evaluation for the given state
    fn eval_string(&self, state: &S) -> Result<String, EventError> {
        Ok(format!("{self} evaluated to {:.6}", self.eval(state)?))
    }

    /// The duration precision after which the solver will report that it cannot find any more
    /// precise event epoch
    fn epoch_precision(&self) -> Duration;

    /// The precision on the desired event value
    fn value_precision(&self) -> f64;
}

/// Defines a state parameter event finder
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    /// The state parameter
    pub parameter: StateParameter,
    /// The desired value, must be in the same units as the state parameter
    pub desired_value: f64,
    /// The duration precision after which the solver will report that it cannot find any more precise
    pub epoch_precision: Duration,
    /// The precision on the desired value
    pub value_precision: f64,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.parameter)?;
        if self.parameter != StateParameter::Apoapsis && self.parameter != StateParameter::Periapsis
        {
            if self.desired_value.abs() > 1e3 {
                write!(
                    f,
                    " = {:e} {} (± {:e} {})",
                    self.desired_value,
                    self.parameter.unit(),
                    self.value_precision,
                    self.parameter.unit()
                )?;
            } else {
                write!(
                    f,
                    " = {} {} (± {} {})",
                    self.desired_value,
                    self.parameter.unit(),
                    self.value_precision,
                    self.parameter.unit()
                )?;
            }
        }
        fmt::Result::Ok(())
    }
}

impl Event {
    /// Match a specific event for the parameter to hit the specified value.
    /// By default, the time precision is 1 millisecond and the value precision is whatever the
    /// default is for that parameter. For example, a radius event will seek the requested value
    /// at the meter level, and an angle event at the thousandth of a degree.
    pub fn new(parameter: StateParameter, desired_value: f64) -> Self {
        Self::within_tolerance(parameter, desired_value, parameter.default_event_precision())
    }

    /// Match a specific event for the parameter to hit the specified value with the provided
    /// tolerance on the value
    pub fn within_tolerance(
        parameter: StateParameter,
        desired_value: f64,
        value_precision: f64,
    ) -> Self {
        Self::specific(parameter, desired_value, value_precision, Unit::Millisecond)
    }

    /// Match a specific event for the parameter to hit the specified value with the provided
    /// tolerance on the value and time
    pub fn specific(
        parameter: StateParameter,
        desired_value: f64,
        value_precision: f64,
        unit_precision: Unit,
    ) -> Self {
        Self {
            parameter,
            desired_value,
            epoch_precision: 1 * unit_precision,
            value_precision,
        }
    }

    /// Match the periapsis, i.e. True Anomaly == 0
    pub fn periapsis() -> Self {
        Self::new(StateParameter::Periapsis, 0.0)
    }

    /// Match the apoapsis, i.e. True Anomaly == 180
    pub fn apoapsis() -> Self {
        Self::new(StateParameter::Apoapsis, 180.0)
    }

    /// Match the central body's mean equatorial radius.
    /// This is useful for detecting when an object might impact the central body.
    pub fn mean_surface(frame: &Frame) -> Self {
        Self::new(StateParameter::Rmag, frame.equatorial_radius())
    }
}

impl Default for Event {
    fn default() -> Self {
        Self {
            parameter: StateParameter::Periapsis,
            desired_value: 0.0,
            value_precision: 1e-3,
            epoch_precision: Unit::Second * 1,
        }
    }
}
