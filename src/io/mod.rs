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

use crate::cosmic::Frame;
use crate::time::Epoch;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use snafu::prelude::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

/// CCSDS standardized messages.
pub mod ccsds;

/// Errors when loading or parsing configuration data.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("failed to read configuration file: {source}"))]
    ReadError { source: std::io::Error },
    #[snafu(display("failed to parse YAML configuration: {source}"))]
    ParseError { source: serde_yaml::Error },
    #[snafu(display("invalid configuration: {msg}"))]
    InvalidConfig { msg: String },
}

/// Trait to specify that a structure can be configured from a file, either in TOML, YAML, JSON,
/// INI, etc.
pub trait ConfigRepr: Serialize + DeserializeOwned + Sized {
    /// Builds the configuration representation from the path to a yaml
    fn load<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path).context(ReadSnafu)?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).context(ParseSnafu)
    }

    /// Builds a sequence of "Selves" from the provided path to a yaml
    fn load_many<P>(path: P) -> Result<Vec<Self>, ConfigError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path).context(ReadSnafu)?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).context(ParseSnafu)
    }

    /// Builds a map of names to "Selves" from the provided path to a yaml
    fn load_named<P>(path: P) -> Result<BTreeMap<String, Self>, ConfigError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path).context(ReadSnafu)?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).context(ParseSnafu)
    }

    /// Builds a sequence of "Selves" from the provided string of a yaml
    fn loads_many(data: &str) -> Result<Vec<Self>, ConfigError> {
        debug!("Loading YAML:\n{data}");
        serde_yaml::from_str(data).context(ParseSnafu)
    }

    /// Builds a single "Self" from the provided string of a yaml
    fn loads(data: &str) -> Result<Self, ConfigError> {
        debug!("Loading YAML:\n{data}");
        serde_yaml::from_str(data).context(ParseSnafu)
    }
}

impl ConfigRepr for crate::cosmic::Orbit {}
impl ConfigRepr for crate::cosmic::Coe {}
impl ConfigRepr for crate::cosmic::Spacecraft {}

/// Serializes an epoch as a string
pub(crate) fn epoch_to_str<S>(epoch: &Epoch, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{epoch}"))
}

/// Deserializes an epoch from a string
pub(crate) fn epoch_from_str<'de, D>(deserializer: D) -> Result<Epoch, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Epoch::from_str(&s).map_err(serde::de::Error::custom)
}

/// Serializes a frame as its name
pub(crate) fn frame_to_str<S>(frame: &Frame, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{frame}"))
}

/// Deserializes a frame from its name
pub(crate) fn frame_from_str<'de, D>(deserializer: D) -> Result<Frame, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Frame::from_str(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod ut_io {
    use super::ConfigRepr;
    use crate::cosmic::{Orbit, EME2000};
    use crate::time::Epoch;
    use std::str::FromStr;

    #[test]
    fn orbit_serde_roundtrip() {
        let s = r#"
x_km: -9042.862234
y_km: 18536.333069
z_km: 6999.957069
vx_km_s: -3.288789
vy_km_s: -2.226285
vz_km_s: 1.646738
frame: EME2000
epoch: 2018-09-15T00:15:53.098 UTC
"#;

        let orbit = Orbit::loads(s).unwrap();

        let exp = Orbit::cartesian(
            -9042.862234,
            18536.333069,
            6999.957069,
            -3.288789,
            -2.226285,
            1.646738,
            Epoch::from_str("2018-09-15T00:15:53.098 UTC").unwrap(),
            EME2000,
        );

        assert_eq!(exp, orbit);

        // And the other way around
        let reserialized = serde_yaml::to_string(&orbit).unwrap();
        let redeserialized: Orbit = serde_yaml::from_str(&reserialized).unwrap();
        assert_eq!(redeserialized, orbit);
    }
}
