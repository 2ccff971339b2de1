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

use super::{ModelError, OrbitModel};
use crate::cosmic::{Frame, Orbit, EME2000};
use crate::time::Epoch;
use crate::utils::{epoch_to_instant, instant_to_epoch};
use satkit::frametransform::qteme2gcrf;
use satkit::sgp4::sgp4;
use std::fmt;

/// A two line element set, wrapping the parsed TLE used by the SGP4 propagator.
#[derive(Clone, Debug)]
pub struct Tle {
    /// An optional name of the object, from the title line of a 3LE
    pub name: Option<String>,
    /// First line of the element set
    pub line1: String,
    /// Second line of the element set
    pub line2: String,
    pub(crate) inner: satkit::TLE,
}

impl Tle {
    /// Parses a TLE from its two lines.
    pub fn from_lines(line1: &str, line2: &str) -> Result<Self, ModelError> {
        let inner = satkit::TLE::load_2line(line1, line2)
            .map_err(|e| ModelError::TleParse { msg: format!("{e}") })?;
        Ok(Self {
            name: None,
            line1: line1.to_string(),
            line2: line2.to_string(),
            inner,
        })
    }

    /// Parses a TLE from its two lines and a preceding name line.
    pub fn from_3le(name: &str, line1: &str, line2: &str) -> Result<Self, ModelError> {
        let mut tle = Self::from_lines(line1, line2)?;
        tle.name = Some(name.trim().to_string());
        Ok(tle)
    }

    /// Returns the reference epoch of this element set
    pub fn epoch(&self) -> Epoch {
        instant_to_epoch(&self.inner.epoch)
    }
}

impl fmt::Display for Tle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "TLE of {} at {}", name, self.epoch()),
            None => write!(f, "TLE at {}", self.epoch()),
        }
    }
}

/// The SGP4 orbit model: propagates a two line element set with the standard NORAD theory
/// and rotates the TEME output into the EME2000 frame.
///
/// The accuracy of this model is the accuracy of the TLE itself: kilometers near the TLE
/// epoch, degrading by a few kilometers per day away from it.
pub struct Sgp4Model {
    pub tle: Tle,
}

impl Sgp4Model {
    /// Builds an SGP4 model from an already parsed TLE.
    pub fn from_tle(tle: Tle) -> Self {
        Self { tle }
    }

    /// Builds an SGP4 model directly from the two element set lines.
    pub fn from_lines(line1: &str, line2: &str) -> Result<Self, ModelError> {
        Ok(Self::from_tle(Tle::from_lines(line1, line2)?))
    }
}

impl fmt::Display for Sgp4Model {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SGP4 model of {}", self.tle)
    }
}

impl OrbitModel for Sgp4Model {
    fn state_at(&self, epoch: Epoch) -> Result<Orbit, ModelError> {
        let instant = epoch_to_instant(epoch);
        // SGP4 mutates the TLE to cache its initialization
        let mut tle = self.tle.inner.clone();
        let result = sgp4(&mut tle, &[instant]).map_err(|e| ModelError::Sgp4 {
            msg: format!("{e}"),
        })?;

        // Position and velocity are in the TEME frame, in meters and m/s
        let pos = result.pos.column(0);
        let vel = result.vel.column(0);
        let pos_teme = satkit::mathtypes::Vector3::new(pos[0], pos[1], pos[2]);
        let vel_teme = satkit::mathtypes::Vector3::new(vel[0], vel[1], vel[2]);

        let q_teme2gcrf = qteme2gcrf(&instant);
        let pos_km = q_teme2gcrf.transform_vector(&pos_teme) / 1_000.0;
        let vel_km_s = q_teme2gcrf.transform_vector(&vel_teme) / 1_000.0;

        // The GCRF and EME2000 axes differ by a constant sub-arcsecond bias, well below the
        // accuracy of the TLE itself.
        Ok(Orbit::cartesian(
            pos_km[0],
            pos_km[1],
            pos_km[2],
            vel_km_s[0],
            vel_km_s[1],
            vel_km_s[2],
            epoch,
            EME2000,
        ))
    }

    fn epoch(&self) -> Epoch {
        self.tle.epoch()
    }

    fn frame(&self) -> Frame {
        EME2000
    }
}
