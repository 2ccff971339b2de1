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

use super::AstroError;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

/// Gravitational parameter of the Sun, in km^3/s^2
pub const SUN_GM: f64 = 132_712_440_041.939_38;
/// Gravitational parameter of the Earth, in km^3/s^2
pub const EARTH_GM: f64 = 398_600.435_436_096;
/// Gravitational parameter of the Moon, in km^3/s^2
pub const MOON_GM: f64 = 4_902.800_066_163_796;
/// Mean equatorial radius of the Earth, in km
pub const EARTH_EQUATORIAL_RADIUS: f64 = 6_378.136_3;
/// Flattening of the Earth ellipsoid (WGS-84)
pub const EARTH_FLATTENING: f64 = 0.003_352_810_664_747_480_5;
/// Rotation rate of the Earth, in rad/s
pub const EARTH_ANGULAR_VELOCITY: f64 = 7.292_115_146_706_979e-5;
/// J2 zonal coefficient of the Earth (JGM-3)
pub const EARTH_J2: f64 = 1.082_626_683_553_15e-3;

/// The celestial bodies known to hemera.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bodies {
    Sun,
    Earth,
    Luna,
}

impl Bodies {
    /// Returns the gravitational parameter of this body in km^3/s^2
    pub fn gm(&self) -> f64 {
        match *self {
            Self::Sun => SUN_GM,
            Self::Earth => EARTH_GM,
            Self::Luna => MOON_GM,
        }
    }

    /// Returns the human name
    pub fn name(&self) -> &'static str {
        match *self {
            Self::Sun => "Sun",
            Self::Earth => "Earth",
            Self::Luna => "Moon",
        }
    }
}

impl TryFrom<&str> for Bodies {
    type Error = AstroError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        match name.to_lowercase().as_str() {
            "sun" => Ok(Self::Sun),
            "earth" => Ok(Self::Earth),
            "moon" | "luna" => Ok(Self::Luna),
            _ => Err(AstroError::ObjectNotFound {
                name: name.to_string(),
            }),
        }
    }
}

/// A reference frame, which contains everything needed to compute state information.
///
/// All frames are inertial and J2000-aligned. A `Geoid` additionally carries the shape
/// and rotation data needed for altitude and drag computations.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Frame {
    /// An inertial frame centered on a celestial body, treated as a point mass
    Celestial { body: Bodies, gm: f64 },
    /// An inertial frame centered on a body with a defined ellipsoid and rotation
    Geoid {
        body: Bodies,
        gm: f64,
        flattening: f64,
        equatorial_radius: f64,
        angular_velocity: f64,
    },
}

/// The Earth Mean Equator and Equinox of J2000 frame.
pub const EME2000: Frame = Frame::Geoid {
    body: Bodies::Earth,
    gm: EARTH_GM,
    flattening: EARTH_FLATTENING,
    equatorial_radius: EARTH_EQUATORIAL_RADIUS,
    angular_velocity: EARTH_ANGULAR_VELOCITY,
};

/// A Moon centered J2000-aligned frame.
pub const MOON_J2000: Frame = Frame::Celestial {
    body: Bodies::Luna,
    gm: MOON_GM,
};

/// A Sun centered J2000-aligned frame (heliocentric).
pub const SUN_J2000: Frame = Frame::Celestial {
    body: Bodies::Sun,
    gm: SUN_GM,
};

impl Frame {
    /// Returns the center body of this frame
    pub fn body(&self) -> Bodies {
        match *self {
            Frame::Celestial { body, .. } | Frame::Geoid { body, .. } => body,
        }
    }

    /// Returns the gravitational parameter of the center body in km^3/s^2
    pub fn gm(&self) -> f64 {
        match *self {
            Frame::Celestial { gm, .. } | Frame::Geoid { gm, .. } => gm,
        }
    }

    /// Returns the equatorial radius of the center body in km.
    ///
    /// Panics if the frame is not a Geoid, like the teacher functions which require shape data.
    pub fn equatorial_radius(&self) -> f64 {
        match *self {
            Frame::Geoid {
                equatorial_radius, ..
            } => equatorial_radius,
            _ => panic!("equatorial radius not defined in this frame"),
        }
    }

    /// Returns the flattening of the center body ellipsoid
    pub fn flattening(&self) -> f64 {
        match *self {
            Frame::Geoid { flattening, .. } => flattening,
            _ => panic!("flattening not defined in this frame"),
        }
    }

    /// Returns the rotation rate of the center body in rad/s
    pub fn angular_velocity(&self) -> f64 {
        match *self {
            Frame::Geoid {
                angular_velocity, ..
            } => angular_velocity,
            _ => panic!("angular velocity not defined in this frame"),
        }
    }

    /// Returns whether this frame carries shape and rotation data
    pub fn is_geoid(&self) -> bool {
        matches!(self, Frame::Geoid { .. })
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.body() {
            Bodies::Earth => write!(f, "EME2000"),
            Bodies::Luna => write!(f, "Moon J2000"),
            Bodies::Sun => write!(f, "Sun J2000"),
        }
    }
}

impl FromStr for Frame {
    type Err = AstroError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_lowercase().trim() {
            "eme2000" | "earth" | "earth j2000" => Ok(EME2000),
            "moon j2000" | "moon" | "luna" => Ok(MOON_J2000),
            "sun j2000" | "sun" | "heliocentric" => Ok(SUN_J2000),
            _ => Err(AstroError::ObjectNotFound {
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod ut_frames {
    use super::*;

    #[test]
    fn frame_roundtrip() {
        for frame in [EME2000, MOON_J2000, SUN_J2000] {
            let as_str = format!("{frame}");
            assert_eq!(Frame::from_str(&as_str).unwrap(), frame);
        }
        assert!(Frame::from_str("Mars J2000").is_err());
    }

    #[test]
    fn earth_is_geoid() {
        assert!(EME2000.is_geoid());
        assert!(!MOON_J2000.is_geoid());
        assert!((EME2000.gm() - EARTH_GM).abs() < f64::EPSILON);
    }
}
