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

use crate::linalg::Vector3;
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Standard gravity, in m/s^2, used to convert the specific impulse into an exhaust velocity.
pub const STD_GRAVITY: f64 = 9.80665;

/// A thruster, defined by its maximum thrust and specific impulse.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thruster {
    /// Maximum thrust, in Newtons
    pub thrust_n: f64,
    /// Specific impulse, in seconds
    pub isp_s: f64,
}

impl Thruster {
    /// Returns the exhaust velocity v_e in m/s
    pub fn exhaust_velocity_m_s(&self) -> f64 {
        self.isp_s * STD_GRAVITY
    }
}

impl fmt::Display for Thruster {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "thruster of {} N at {} s Isp", self.thrust_n, self.isp_s)
    }
}

/// A finite burn: a constant inertial thrust direction applied between two epochs at a
/// constant throttle level.
#[derive(Copy, Clone, Debug)]
pub struct Maneuver {
    /// Start of the burn
    pub start: Epoch,
    /// End of the burn
    pub end: Epoch,
    /// Unit vector of the thrust direction in the integration frame
    pub direction: Vector3<f64>,
    /// Throttle level in (0; 1]
    pub thrust_lvl: f64,
}

impl Maneuver {
    /// Builds a new finite burn. The direction is normalized.
    ///
    /// Panics if the throttle level is not in (0; 1], as an invalid throttle is a
    /// mission design error, not a runtime condition.
    pub fn new(start: Epoch, end: Epoch, direction: Vector3<f64>, thrust_lvl: f64) -> Self {
        assert!(
            thrust_lvl > 0.0 && thrust_lvl <= 1.0,
            "thrust level must be in (0; 1]"
        );
        assert!(end > start, "maneuver end must be after maneuver start");
        Self {
            start,
            end,
            direction: direction / direction.norm(),
            thrust_lvl,
        }
    }

    /// Builds a new finite burn at full throttle
    pub fn constant(start: Epoch, end: Epoch, direction: Vector3<f64>) -> Self {
        Self::new(start, end, direction, 1.0)
    }

    /// Returns whether this maneuver is active at the provided epoch
    pub fn in_progress(&self, epoch: Epoch) -> bool {
        epoch >= self.start && epoch <= self.end
    }

    /// Returns the duration of this maneuver
    pub fn duration(&self) -> crate::time::Duration {
        self.end - self.start
    }
}

impl fmt::Display for Maneuver {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "maneuver of {} from {} to {} at {:.1}% throttle",
            self.duration(),
            self.start,
            self.end,
            100.0 * self.thrust_lvl
        )
    }
}
