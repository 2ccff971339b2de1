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

use super::EventEvaluator;
use crate::errors::EventError;
use crate::linalg::allocator::Allocator;
use crate::linalg::DefaultAllocator;
use crate::md::trajectory::{Interpolatable, Traj};
use crate::time::Duration;
use crate::State;
use core::fmt;

/// Enumerates the possible edges of an event in a trajectory.
///
/// `EventEdge` describes the temporal dynamics of an event relative to its threshold: whether
/// the evaluation is increasing, decreasing, or whether the slope cannot be determined.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EventEdge {
    /// The event value is transitioning from a lower to a higher value at the found epoch.
    Rising,
    /// The event value is transitioning from a higher to a lower value at the found epoch.
    Falling,
    /// The edge cannot be clearly defined. This happens if the event is at a saddle point and
    /// the epoch precision is too large to find the exact slope.
    Unclear,
}

/// Represents the details of an event occurring along a trajectory.
///
/// `EventDetails` stores the state at which a particular event occurs in a trajectory, along
/// with the edge direction computed from the evaluations one precision-step on either side.
#[derive(Clone, Debug, PartialEq)]
pub struct EventDetails<S: Interpolatable>
where
    DefaultAllocator:
        Allocator<S::VecLength> + Allocator<S::Size> + Allocator<S::Size, S::Size>,
{
    /// The state of the trajectory at the found event.
    pub state: S,
    /// Indicates whether the event is a rising edge, falling edge, or unclear.
    pub edge: EventEdge,
    /// Numerical evaluation of the event condition, e.g. if seeking the apoapsis, this returns the near zero
    pub value: f64,
    /// Numerical evaluation of the event condition one epoch step before the found event (used to compute the rising/falling edge).
    pub prev_value: Option<f64>,
    /// Numerical evaluation of the event condition one epoch step after the found event (used to compute the rising/falling edge).
    pub next_value: Option<f64>,
    /// Precision of the epoch for this value
    pub pm_duration: Duration,
    // Store the representation of this event as a string because we can't move or clone the event reference
    pub repr: String,
}

impl<S: Interpolatable> EventDetails<S>
where
    DefaultAllocator:
        Allocator<S::VecLength> + Allocator<S::Size> + Allocator<S::Size, S::Size>,
{
    /// Generates detailed information about an event at a specific epoch in a trajectory.
    ///
    /// The initialization determines the edge type of the event by comparing the event's value
    /// at the current, previous, and next epochs of the trajectory.
    pub fn new<E: EventEvaluator<S>>(
        state: S,
        value: f64,
        event: &E,
        traj: &Traj<S>,
    ) -> Result<Self, EventError> {
        let epoch = state.epoch();
        let prev_value = if let Ok(state) = traj.at(epoch - event.epoch_precision()) {
            Some(event.eval(&state)?)
        } else {
            None
        };

        let next_value = if let Ok(state) = traj.at(epoch + event.epoch_precision()) {
            Some(event.eval(&state)?)
        } else {
            None
        };

        let edge = if let Some(prev_value) = prev_value {
            if let Some(next_value) = next_value {
                if prev_value > value && value > next_value {
                    EventEdge::Falling
                } else if prev_value < value && value < next_value {
                    EventEdge::Rising
                } else {
                    warn!("could not determine edge of {} at {}", event, state.epoch());
                    EventEdge::Unclear
                }
            } else if prev_value > value {
                EventEdge::Falling
            } else {
                EventEdge::Rising
            }
        } else if let Some(next_value) = next_value {
            if next_value > value {
                EventEdge::Rising
            } else {
                EventEdge::Falling
            }
        } else {
            warn!(
                "could not determine edge of {} because trajectory could not be queried around {}",
                event,
                state.epoch()
            );
            EventEdge::Unclear
        };

        Ok(EventDetails {
            edge,
            state,
            value,
            prev_value,
            next_value,
            pm_duration: event.epoch_precision(),
            repr: event.eval_string(&state)?,
        })
    }
}

impl<S: Interpolatable> fmt::Display for EventDetails<S>
where
    DefaultAllocator:
        Allocator<S::VecLength> + Allocator<S::Size> + Allocator<S::Size, S::Size>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prev_fmt = match self.prev_value {
            Some(value) => format!("{value:.6}"),
            None => "".to_string(),
        };

        let next_fmt = match self.next_value {
            Some(value) => format!("{value:.6}"),
            None => "".to_string(),
        };

        write!(
            f,
            "{} and is {:?} (roots with {} intervals: {}, {:.6}, {})",
            self.repr, self.edge, self.pm_duration, prev_fmt, self.value, next_fmt
        )
    }
}

/// The time span between a rising edge of an event and its subsequent falling edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EventArc<S: Interpolatable>
where
    DefaultAllocator:
        Allocator<S::VecLength> + Allocator<S::Size> + Allocator<S::Size, S::Size>,
{
    pub rise: EventDetails<S>,
    pub fall: EventDetails<S>,
}

impl<S: Interpolatable> EventArc<S>
where
    DefaultAllocator:
        Allocator<S::VecLength> + Allocator<S::Size> + Allocator<S::Size, S::Size>,
{
    /// Returns the duration of this event arc
    pub fn duration(&self) -> Duration {
        self.fall.state.epoch() - self.rise.state.epoch()
    }
}

impl<S: Interpolatable> fmt::Display for EventArc<S>
where
    DefaultAllocator:
        Allocator<S::VecLength> + Allocator<S::Size> + Allocator<S::Size, S::Size>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} until {} (lasts {})",
            self.rise,
            self.fall.state.epoch(),
            self.duration()
        )
    }
}
