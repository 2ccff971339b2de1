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

use enum_iterator::Sequence;
use serde_derive::{Deserialize, Serialize};

/// Common state parameters, used for event finding and state queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Sequence)]
pub enum StateParameter {
    /// X component of the radius, km
    X,
    /// Y component of the radius, km
    Y,
    /// Z component of the radius, km
    Z,
    /// X component of the velocity, km/s
    VX,
    /// Y component of the velocity, km/s
    VY,
    /// Z component of the velocity, km/s
    VZ,
    /// Norm of the radius vector, km
    Rmag,
    /// Norm of the velocity vector, km/s
    Vmag,
    /// Semi-major axis, km
    SMA,
    /// Eccentricity, no unit
    Eccentricity,
    /// Inclination, degrees
    Inclination,
    /// Right ascension of the ascending node, degrees
    RAAN,
    /// Argument of periapsis, degrees
    AoP,
    /// Argument of latitude, degrees
    AoL,
    /// True anomaly, degrees
    TrueAnomaly,
    /// Mean anomaly, degrees
    MeanAnomaly,
    /// Eccentric anomaly, degrees
    EccentricAnomaly,
    /// True longitude, degrees
    TrueLongitude,
    /// Matches the orbit apoapsis (true anomaly of 180 degrees)
    Apoapsis,
    /// Matches the orbit periapsis (true anomaly of 0 degrees)
    Periapsis,
    /// Radius of apoapsis, km
    ApoapsisRadius,
    /// Radius of periapsis, km
    PeriapsisRadius,
    /// Altitude above the mean equatorial radius, km
    Altitude,
    /// Specific mechanical energy, km^2/s^2
    Energy,
    /// Norm of the orbital momentum, km^2/s
    Hmag,
    /// Declination, degrees
    Declination,
    /// Right ascension, degrees
    RightAscension,
    /// Orbital period, seconds
    Period,
    /// Fuel mass, kg
    FuelMass,
    /// Dry mass, kg
    DryMass,
    /// Total mass, kg
    TotalMass,
}

impl StateParameter {
    /// Returns whether this parameter is an angle, in degrees
    pub const fn is_angle(&self) -> bool {
        matches!(
            self,
            Self::Inclination
                | Self::RAAN
                | Self::AoP
                | Self::AoL
                | Self::TrueAnomaly
                | Self::MeanAnomaly
                | Self::EccentricAnomaly
                | Self::TrueLongitude
                | Self::Apoapsis
                | Self::Periapsis
                | Self::Declination
                | Self::RightAscension
        )
    }

    /// Returns the units of this parameter
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::X | Self::Y | Self::Z | Self::Rmag | Self::SMA | Self::ApoapsisRadius
            | Self::PeriapsisRadius | Self::Altitude => "km",
            Self::VX | Self::VY | Self::VZ | Self::Vmag => "km/s",
            Self::Energy => "km^2/s^2",
            Self::Hmag => "km^2/s",
            Self::Period => "s",
            Self::FuelMass | Self::DryMass | Self::TotalMass => "kg",
            Self::Eccentricity => "",
            _ => "deg",
        }
    }

    /// Returns the default event finding precision in the unit of that parameter
    pub const fn default_event_precision(&self) -> f64 {
        match self {
            Self::Eccentricity => 1e-5,
            // Non-orbital parameters
            Self::FuelMass | Self::DryMass | Self::TotalMass => 1e-3,
            // Orbital parameters angles
            Self::AoL
            | Self::AoP
            | Self::Apoapsis
            | Self::Periapsis
            | Self::Declination
            | Self::EccentricAnomaly
            | Self::Inclination
            | Self::MeanAnomaly
            | Self::RightAscension
            | Self::RAAN
            | Self::TrueAnomaly
            | Self::TrueLongitude => 1e-3,
            // Distances
            Self::X | Self::Y | Self::Z | Self::Rmag | Self::SMA | Self::ApoapsisRadius
            | Self::PeriapsisRadius | Self::Altitude => 1e-3,
            // Velocities
            Self::VX | Self::VY | Self::VZ | Self::Vmag => 1e-3,
            Self::Energy => 1e-3,
            Self::Hmag => 1e-3,
            Self::Period => 1e-3,
        }
    }
}

#[cfg(test)]
mod ut_param {
    use super::StateParameter;
    use enum_iterator::all;

    #[test]
    fn all_params_have_precision() {
        for param in all::<StateParameter>() {
            assert!(param.default_event_precision() > 0.0, "{param:?}");
        }
    }
}
