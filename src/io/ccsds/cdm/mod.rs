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

//! The Conjunction Data Message of CCSDS 508.0-B-1, restricted to the fields needed to
//! screen a conjunction: who built the message, when the closest approach happens, how
//! close it gets, and the state of each object.

use crate::io::{epoch_from_str, epoch_to_str, ConfigRepr};
use crate::linalg::Vector3;
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// The header of a CDM.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CdmHeader {
    /// Version of the CDM standard, e.g. "1.0"
    pub ccsds_cdm_vers: String,
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub creation_date: Epoch,
    /// Organization which created the message
    pub originator: String,
    /// Unique identifier of this message
    pub message_id: String,
}

/// The relative metadata of a CDM: the geometry of the conjunction itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CdmRelativeMetadata {
    /// Time of closest approach
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub tca: Epoch,
    /// Norm of the relative position at TCA, in meters
    pub miss_distance_m: f64,
    /// Norm of the relative velocity at TCA, in m/s
    #[serde(default)]
    pub relative_speed_m_s: Option<f64>,
    /// Probability of collision, if computed by the originator
    #[serde(default)]
    pub collision_probability: Option<f64>,
}

/// The metadata and state of one of the two objects of a CDM.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CdmObject {
    /// Which object this is, "OBJECT1" or "OBJECT2"
    pub object: String,
    /// The catalog designator, e.g. the NORAD id
    pub object_designator: String,
    /// Name of the object
    pub object_name: String,
    /// International designator, e.g. "1998-067A"
    #[serde(default)]
    pub international_designator: Option<String>,
    /// Reference frame of the state, e.g. "EME2000" or "ITRF"
    pub ref_frame: String,
    /// Position at TCA, in km
    pub position_km: [f64; 3],
    /// Velocity at TCA, in km/s
    pub velocity_km_s: [f64; 3],
}

impl CdmObject {
    /// Returns the position vector at TCA, in km
    pub fn position(&self) -> Vector3<f64> {
        Vector3::from_row_slice(&self.position_km)
    }

    /// Returns the velocity vector at TCA, in km/s
    pub fn velocity(&self) -> Vector3<f64> {
        Vector3::from_row_slice(&self.velocity_km_s)
    }
}

/// A Conjunction Data Message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cdm {
    pub header: CdmHeader,
    pub relative_metadata: CdmRelativeMetadata,
    /// The two objects of the conjunction
    pub objects: Vec<CdmObject>,
}

impl ConfigRepr for Cdm {}

impl Cdm {
    /// Returns the miss distance recomputed from both object states, in meters.
    ///
    /// A well-formed message should match its `miss_distance_m` field to within rounding of
    /// the originator's states.
    pub fn computed_miss_distance_m(&self) -> Option<f64> {
        if self.objects.len() < 2 {
            return None;
        }
        let delta_km = self.objects[0].position() - self.objects[1].position();
        Some(delta_km.norm() * 1_000.0)
    }
}

impl fmt::Display for Cdm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "CDM {} by {}: TCA {} at {:.1} m",
            self.header.message_id,
            self.header.originator,
            self.relative_metadata.tca,
            self.relative_metadata.miss_distance_m
        )
    }
}

#[cfg(test)]
mod ut_cdm {
    use super::*;

    #[test]
    fn cdm_loads_and_crosschecks() {
        let data = r#"
header:
  ccsds_cdm_vers: "1.0"
  creation_date: 2023-03-05T16:44:00 UTC
  originator: SPACE-TRACK
  message_id: 0123456-44551
relative_metadata:
  tca: 2023-03-07T09:12:44 UTC
  miss_distance_m: 715.0
  relative_speed_m_s: 14312.0
objects:
  - object: OBJECT1
    object_designator: "25544"
    object_name: ISS (ZARYA)
    international_designator: 1998-067A
    ref_frame: EME2000
    position_km: [6650.0, 1200.0, 500.0]
    velocity_km_s: [-1.0, 7.2, 1.5]
  - object: OBJECT2
    object_designator: "44551"
    object_name: DEBRIS
    ref_frame: EME2000
    position_km: [6650.5, 1200.2, 500.4]
    velocity_km_s: [1.1, -7.1, 1.2]
"#;

        let cdm = Cdm::loads(data).unwrap();
        assert_eq!(cdm.objects.len(), 2);
        assert_eq!(cdm.objects[0].object_designator, "25544");
        assert!(cdm.objects[1].international_designator.is_none());

        // The miss distance recomputed from the states: sqrt(0.5^2 + 0.2^2 + 0.4^2) km
        let expect_m = (0.5_f64.powi(2) + 0.2_f64.powi(2) + 0.4_f64.powi(2)).sqrt() * 1_000.0;
        let computed = cdm.computed_miss_distance_m().unwrap();
        assert!((computed - expect_m).abs() < 1e-9);

        // Round trip
        let as_yaml = serde_yaml::to_string(&cdm).unwrap();
        let reloaded = Cdm::loads(&as_yaml).unwrap();
        assert_eq!(reloaded, cdm);
    }
}
