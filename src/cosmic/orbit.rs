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

use super::{AstroError, Frame, State, TimeTagged};
use crate::io::{epoch_from_str, epoch_to_str, frame_from_str, frame_to_str};
use crate::linalg::{OVector, Vector3, Vector6, U6};
use crate::md::StateParameter;
use crate::time::{Duration, Epoch, Unit};
use crate::utils::{between_0_360, perpv};
use serde_derive::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::f64::EPSILON;
use std::fmt;

/// If an orbit has an eccentricity below the following value, it is considered circular (only affects warning messages)
pub const ECC_EPSILON: f64 = 1e-11;
pub const MA_EPSILON: f64 = 1e-16;

/// Orbit defines an orbital state
///
/// Unless noted otherwise, algorithms are from GMAT 2016a StateConversionUtil.
/// Regardless of the constructor used, this struct stores all the state information in
/// Cartesian coordinates as these are always non singular.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Orbit {
    /// in km
    pub x_km: f64,
    /// in km
    pub y_km: f64,
    /// in km
    pub z_km: f64,
    /// in km/s
    pub vx_km_s: f64,
    /// in km/s
    pub vy_km_s: f64,
    /// in km/s
    pub vz_km_s: f64,
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub epoch: Epoch,
    /// Frame contains everything we need to compute state information
    #[serde(serialize_with = "frame_to_str", deserialize_with = "frame_from_str")]
    pub frame: Frame,
}

impl Orbit {
    /// Creates a new Orbit in the provided frame at the provided Epoch.
    ///
    /// **Units:** km, km, km, km/s, km/s, km/s
    pub fn cartesian(
        x_km: f64,
        y_km: f64,
        z_km: f64,
        vx_km_s: f64,
        vy_km_s: f64,
        vz_km_s: f64,
        epoch: Epoch,
        frame: Frame,
    ) -> Self {
        Self {
            x_km,
            y_km,
            z_km,
            vx_km_s,
            vy_km_s,
            vz_km_s,
            epoch,
            frame,
        }
    }

    /// Creates a new Orbit in the provided frame at the provided Epoch in time with 0.0 velocity.
    ///
    /// **Units:** km, km, km
    pub fn from_position(x: f64, y: f64, z: f64, epoch: Epoch, frame: Frame) -> Self {
        Self::cartesian(x, y, z, 0.0, 0.0, 0.0, epoch, frame)
    }

    /// Creates a new Orbit around the provided frame from the borrowed state vector
    ///
    /// The state vector **must** be x, y, z, vx, vy, vz. This function is a shortcut to `cartesian`
    /// and as such it has the same unit requirements.
    pub fn cartesian_vec(state: &Vector6<f64>, epoch: Epoch, frame: Frame) -> Self {
        Self::cartesian(
            state[0], state[1], state[2], state[3], state[4], state[5], epoch, frame,
        )
    }

    /// Creates a new Orbit from the Keplerian orbital elements.
    ///
    /// **Units:** km, none, degrees, degrees, degrees, degrees
    ///
    /// WARNING: This function will panic if the singularities in the conversion are encountered.
    /// The algorithm is from GMAT's StateConversionUtil::KeplerianToCartesian.
    #[allow(clippy::too_many_arguments)]
    pub fn keplerian(
        sma_km: f64,
        ecc: f64,
        inc_deg: f64,
        raan_deg: f64,
        aop_deg: f64,
        ta_deg: f64,
        epoch: Epoch,
        frame: Frame,
    ) -> Self {
        let gm = frame.gm();
        if gm.abs() < EPSILON {
            warn!(
                "GM is near zero ({gm}): expect math errors in Keplerian to Cartesian conversion"
            );
        }
        let ecc = if ecc < 0.0 {
            warn!("eccentricity cannot be negative: sign of eccentricity changed");
            ecc * -1.0
        } else {
            ecc
        };
        let sma = if ecc > 1.0 && sma_km > 0.0 {
            warn!("eccentricity > 1 (hyperbolic) BUT SMA > 0 (elliptical): sign of SMA changed");
            sma_km * -1.0
        } else if ecc < 1.0 && sma_km < 0.0 {
            warn!("eccentricity < 1 (elliptical) BUT SMA < 0 (hyperbolic): sign of SMA changed");
            sma_km * -1.0
        } else {
            sma_km
        };
        if (sma * (1.0 - ecc)).abs() < 1e-3 {
            warn!("radius of periapsis is less than one meter");
        }
        if (1.0 - ecc).abs() < EPSILON {
            panic!("parabolic orbits have ill-defined Keplerian orbital elements");
        }
        if ecc > 1.0 {
            let ta = between_0_360(ta_deg);
            if ta > (PI - (1.0 / ecc).acos()).to_degrees() {
                panic!("true anomaly value ({ta}) physically impossible for a hyperbolic orbit");
            }
        }
        if (1.0 + ecc * ta_deg.to_radians().cos()).is_infinite() {
            panic!("radius of orbit is infinite");
        }
        let inc = inc_deg.to_radians();
        let raan = raan_deg.to_radians();
        let aop = aop_deg.to_radians();
        let ta = ta_deg.to_radians();
        let p = sma * (1.0 - ecc.powi(2));
        if p.abs() < EPSILON {
            panic!("semilatus rectum ~= 0.0: parabolic orbit");
        }
        let radius = p / (1.0 + ecc * ta.cos());
        let (sin_aop_ta, cos_aop_ta) = (aop + ta).sin_cos();
        let (sin_inc, cos_inc) = inc.sin_cos();
        let (sin_raan, cos_raan) = raan.sin_cos();
        let (sin_aop, cos_aop) = aop.sin_cos();
        let x = radius * (cos_aop_ta * cos_raan - cos_inc * sin_aop_ta * sin_raan);
        let y = radius * (cos_aop_ta * sin_raan + cos_inc * sin_aop_ta * cos_raan);
        let z = radius * sin_aop_ta * sin_inc;
        let sqrt_gm_p = (gm / p).sqrt();
        let cos_ta_ecc = ta.cos() + ecc;
        let sin_ta = ta.sin();

        let vx = sqrt_gm_p * cos_ta_ecc * (-sin_aop * cos_raan - cos_inc * sin_raan * cos_aop)
            - sqrt_gm_p * sin_ta * (cos_aop * cos_raan - cos_inc * sin_raan * sin_aop);
        let vy = sqrt_gm_p * cos_ta_ecc * (-sin_aop * sin_raan + cos_inc * cos_raan * cos_aop)
            - sqrt_gm_p * sin_ta * (cos_aop * sin_raan + cos_inc * cos_raan * sin_aop);
        let vz = sqrt_gm_p * (cos_ta_ecc * sin_inc * cos_aop - sin_ta * sin_inc * sin_aop);
        Self::cartesian(x, y, z, vx, vy, vz, epoch, frame)
    }

    /// Creates a new Orbit around the provided frame from the borrowed state vector
    ///
    /// The state vector **must** be sma, ecc, inc, raan, aop, ta. This function is a shortcut to
    /// `keplerian` and as such it has the same unit requirements.
    pub fn keplerian_vec(state: &Vector6<f64>, epoch: Epoch, frame: Frame) -> Self {
        Self::keplerian(
            state[0], state[1], state[2], state[3], state[4], state[5], epoch, frame,
        )
    }

    /// Creates a new Orbit from the provided semi-major axis altitude in kilometers
    #[allow(clippy::too_many_arguments)]
    pub fn keplerian_altitude(
        sma_altitude_km: f64,
        ecc: f64,
        inc_deg: f64,
        raan_deg: f64,
        aop_deg: f64,
        ta_deg: f64,
        epoch: Epoch,
        frame: Frame,
    ) -> Self {
        Self::keplerian(
            sma_altitude_km + frame.equatorial_radius(),
            ecc,
            inc_deg,
            raan_deg,
            aop_deg,
            ta_deg,
            epoch,
            frame,
        )
    }

    /// Creates a new Orbit from the provided radii of apoapsis and periapsis, in kilometers
    #[allow(clippy::too_many_arguments)]
    pub fn keplerian_apsis_radii(
        r_apo_km: f64,
        r_peri_km: f64,
        inc_deg: f64,
        raan_deg: f64,
        aop_deg: f64,
        ta_deg: f64,
        epoch: Epoch,
        frame: Frame,
    ) -> Self {
        let sma_km = (r_apo_km + r_peri_km) / 2.0;
        let ecc = r_apo_km / sma_km - 1.0;
        Self::keplerian(sma_km, ecc, inc_deg, raan_deg, aop_deg, ta_deg, epoch, frame)
    }

    /// Initializes a new orbit from the Keplerian orbital elements using the mean anomaly instead
    /// of the true anomaly.
    ///
    /// # Implementation notes
    /// This function starts by converting the mean anomaly to true anomaly, and then it initializes
    /// the orbit using the `keplerian` method. The conversion is from GMAT's MeanToTrueAnomaly
    /// function (GTDS MathSpec iteration).
    #[allow(clippy::too_many_arguments)]
    pub fn keplerian_mean_anomaly(
        sma_km: f64,
        ecc: f64,
        inc_deg: f64,
        raan_deg: f64,
        aop_deg: f64,
        ma_deg: f64,
        epoch: Epoch,
        frame: Frame,
    ) -> Result<Self, AstroError> {
        let ta_rad = compute_mean_to_true_anomaly(ma_deg.to_radians(), ecc, MA_EPSILON)?;

        Ok(Self::keplerian(
            sma_km,
            ecc,
            inc_deg,
            raan_deg,
            aop_deg,
            ta_rad.to_degrees(),
            epoch,
            frame,
        ))
    }

    /// Creates a new Orbit from this one with the Keplerian elements of the provided `Coe`.
    pub fn from_coe(coe: Coe, epoch: Epoch, frame: Frame) -> Self {
        Self::keplerian(
            coe.sma_km,
            coe.ecc,
            coe.inc_deg,
            coe.raan_deg,
            coe.aop_deg,
            coe.ta_deg,
            epoch,
            frame,
        )
    }

    /// Returns the radius vector of this Orbit in [km, km, km]
    pub fn radius(&self) -> Vector3<f64> {
        Vector3::new(self.x_km, self.y_km, self.z_km)
    }

    /// Returns the velocity vector of this Orbit in [km/s, km/s, km/s]
    pub fn velocity(&self) -> Vector3<f64> {
        Vector3::new(self.vx_km_s, self.vy_km_s, self.vz_km_s)
    }

    /// Returns the unit vector in the direction of the state radius
    pub fn r_hat(&self) -> Vector3<f64> {
        self.radius() / self.rmag_km()
    }

    /// Returns the unit vector in the direction of the state velocity
    pub fn v_hat(&self) -> Vector3<f64> {
        perpv(&self.velocity(), &self.r_hat()) / self.rmag_km()
    }

    /// Returns this state as a Cartesian Vector6 in [km, km, km, km/s, km/s, km/s]
    ///
    /// Note that the time is **not** returned in the vector.
    pub fn to_cartesian_vec(self) -> Vector6<f64> {
        Vector6::new(
            self.x_km,
            self.y_km,
            self.z_km,
            self.vx_km_s,
            self.vy_km_s,
            self.vz_km_s,
        )
    }

    /// Returns this state as a Keplerian Vector6 in [km, none, degrees, degrees, degrees, degrees]
    pub fn to_keplerian_vec(self) -> Vector6<f64> {
        Vector6::new(
            self.sma_km(),
            self.ecc(),
            self.inc_deg(),
            self.raan_deg(),
            self.aop_deg(),
            self.ta_deg(),
        )
    }

    /// Returns the classical orbital elements of this state
    pub fn to_coe(self) -> Coe {
        Coe {
            sma_km: self.sma_km(),
            ecc: self.ecc(),
            inc_deg: self.inc_deg(),
            raan_deg: self.raan_deg(),
            aop_deg: self.aop_deg(),
            ta_deg: self.ta_deg(),
        }
    }

    /// Returns the magnitude of the radius vector in km
    pub fn rmag_km(&self) -> f64 {
        (self.x_km.powi(2) + self.y_km.powi(2) + self.z_km.powi(2)).sqrt()
    }

    /// Returns the magnitude of the velocity vector in km/s
    pub fn vmag_km_s(&self) -> f64 {
        (self.vx_km_s.powi(2) + self.vy_km_s.powi(2) + self.vz_km_s.powi(2)).sqrt()
    }

    /// Returns the distance in kilometers between this state and another state.
    /// Will **panic** if the frames are different.
    pub fn distance_to(&self, other: &Orbit) -> f64 {
        assert_eq!(
            self.frame, other.frame,
            "cannot compute the distance between two states in different frames"
        );
        (self.radius() - other.radius()).norm()
    }

    /// Returns the orbital momentum vector
    pub fn hvec(&self) -> Vector3<f64> {
        self.radius().cross(&self.velocity())
    }

    /// Returns the norm of the orbital momentum
    pub fn hmag_km2_s(&self) -> f64 {
        self.hvec().norm()
    }

    /// Returns the eccentricity vector (no unit)
    pub fn evec(&self) -> Vector3<f64> {
        let gm = self.frame.gm();
        let r = self.radius();
        let v = self.velocity();
        ((v.norm().powi(2) - gm / r.norm()) * r - (r.dot(&v)) * v) / gm
    }

    /// Returns the specific mechanical energy in km^2/s^2
    pub fn energy_km2_s2(&self) -> f64 {
        self.vmag_km_s().powi(2) / 2.0 - self.frame.gm() / self.rmag_km()
    }

    /// Returns the semi-major axis in km
    pub fn sma_km(&self) -> f64 {
        -self.frame.gm() / (2.0 * self.energy_km2_s2())
    }

    /// Returns the SMA altitude in km
    pub fn sma_altitude_km(&self) -> f64 {
        self.sma_km() - self.frame.equatorial_radius()
    }

    /// Returns the altitude above the mean equatorial radius, in km
    pub fn altitude_km(&self) -> f64 {
        self.rmag_km() - self.frame.equatorial_radius()
    }

    /// Returns the period of this orbit
    pub fn period(&self) -> Duration {
        2.0 * PI * (self.sma_km().powi(3) / self.frame.gm()).sqrt() * Unit::Second
    }

    /// Returns the eccentricity (no unit)
    pub fn ecc(&self) -> f64 {
        self.evec().norm()
    }

    /// Returns the inclination in degrees
    pub fn inc_deg(&self) -> f64 {
        (self.hvec()[2] / self.hmag_km2_s()).acos().to_degrees()
    }

    /// Returns the argument of periapsis in degrees
    pub fn aop_deg(&self) -> f64 {
        let n = Vector3::new(0.0, 0.0, 1.0).cross(&self.hvec());
        let cos_aop = n.dot(&self.evec()) / (n.norm() * self.ecc());
        let aop = cos_aop.acos();
        if aop.is_nan() {
            // Out of bounds arccosine: the sign of the cosine decides which apsis line
            if cos_aop > 1.0 {
                0.0
            } else {
                180.0
            }
        } else if self.evec()[2] < 0.0 {
            (2.0 * PI - aop).to_degrees()
        } else {
            aop.to_degrees()
        }
    }

    /// Returns the right ascension of the ascending node in degrees
    pub fn raan_deg(&self) -> f64 {
        let n = Vector3::new(0.0, 0.0, 1.0).cross(&self.hvec());
        let cos_raan = n[0] / n.norm();
        let raan = cos_raan.acos();
        if raan.is_nan() {
            if cos_raan > 1.0 {
                0.0
            } else {
                180.0
            }
        } else if n[1] < 0.0 {
            (2.0 * PI - raan).to_degrees()
        } else {
            raan.to_degrees()
        }
    }

    /// Returns the true anomaly in degrees between 0 and 360.0
    ///
    /// NOTE: This function will emit a warning stating that the TA should be avoided if in a very
    /// near circular orbit.
    ///
    /// LIMITATION: For an orbit whose true anomaly is (very nearly) 0.0 or 180.0, this function may
    /// return either 0.0 or 180.0 with a very small time increment: there is an ambiguity in the
    /// arccosine computation exactly at those angles.
    pub fn ta_deg(&self) -> f64 {
        if self.ecc() < ECC_EPSILON {
            warn!(
                "true anomaly ill-defined for circular orbit (e = {})",
                self.ecc()
            );
        }
        let cos_nu = self.evec().dot(&self.radius()) / (self.ecc() * self.rmag_km());
        let ta = cos_nu.acos();
        if ta.is_nan() {
            // Out of bounds arccosine: the sign of the cosine decides between 0 and 180
            if cos_nu > 1.0 {
                0.0
            } else {
                180.0
            }
        } else if self.radius().dot(&self.velocity()) < 0.0 {
            (2.0 * PI - ta).to_degrees()
        } else {
            ta.to_degrees()
        }
    }

    /// Returns the eccentric anomaly in degrees
    ///
    /// This is a conversion from GMAT's TrueToEccentricAnomaly, only defined for elliptical orbits.
    pub fn ea_deg(&self) -> f64 {
        let (sin_ta, cos_ta) = self.ta_deg().to_radians().sin_cos();
        let ecc_cos_ta = self.ecc() * cos_ta;
        let sin_ea = ((1.0 - self.ecc().powi(2)).sqrt() * sin_ta) / (1.0 + ecc_cos_ta);
        let cos_ea = (self.ecc() + cos_ta) / (1.0 + ecc_cos_ta);
        sin_ea.atan2(cos_ea).to_degrees()
    }

    /// Returns the mean anomaly in degrees between 0 and 360.0
    ///
    /// Only defined for elliptical orbits.
    pub fn ma_deg(&self) -> f64 {
        let ea = self.ea_deg().to_radians();
        between_0_360((ea - self.ecc() * ea.sin()).to_degrees())
    }

    /// Returns the true longitude in degrees
    pub fn tlong_deg(&self) -> f64 {
        between_0_360(self.aop_deg() + self.raan_deg() + self.ta_deg())
    }

    /// Returns the argument of latitude in degrees
    ///
    /// NOTE: If the orbit is near circular, the AoL will be computed from the true longitude
    /// instead of relying on the ill-defined true anomaly.
    pub fn aol_deg(&self) -> f64 {
        between_0_360(if self.ecc() < ECC_EPSILON {
            self.tlong_deg() - self.raan_deg()
        } else {
            self.aop_deg() + self.ta_deg()
        })
    }

    /// Returns the radius of apoapsis in km
    pub fn apoapsis_km(&self) -> f64 {
        self.sma_km() * (1.0 + self.ecc())
    }

    /// Returns the radius of periapsis in km
    pub fn periapsis_km(&self) -> f64 {
        self.sma_km() * (1.0 - self.ecc())
    }

    /// Returns the altitude of apoapsis in km
    pub fn apoapsis_altitude_km(&self) -> f64 {
        self.apoapsis_km() - self.frame.equatorial_radius()
    }

    /// Returns the altitude of periapsis in km
    pub fn periapsis_altitude_km(&self) -> f64 {
        self.periapsis_km() - self.frame.equatorial_radius()
    }

    /// Returns the declination of this orbit in degrees
    pub fn declination_deg(&self) -> f64 {
        (self.z_km / self.rmag_km()).asin().to_degrees()
    }

    /// Returns the right ascension of this orbit in degrees
    pub fn right_ascension_deg(&self) -> f64 {
        between_0_360(self.y_km.atan2(self.x_km).to_degrees())
    }

    /// Returns a copy of this state with the provided radius vector
    pub fn with_radius(self, new_radius: &Vector3<f64>) -> Self {
        let mut me = self;
        me.x_km = new_radius[0];
        me.y_km = new_radius[1];
        me.z_km = new_radius[2];
        me
    }

    /// Returns a copy of this state with the provided velocity vector
    pub fn with_velocity(self, new_velocity: &Vector3<f64>) -> Self {
        let mut me = self;
        me.vx_km_s = new_velocity[0];
        me.vy_km_s = new_velocity[1];
        me.vz_km_s = new_velocity[2];
        me
    }
}

impl PartialEq for Orbit {
    /// Two states are equal if their epoch, frame, and Cartesian coordinates are equal.
    fn eq(&self, other: &Self) -> bool {
        self.epoch == other.epoch
            && self.frame == other.frame
            && self.to_cartesian_vec() == other.to_cartesian_vec()
    }
}

impl fmt::Display for Orbit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let decimals = f.precision().unwrap_or(6);
        write!(
            f,
            "[{}] {}\tposition = [{:.*}, {:.*}, {:.*}] km\tvelocity = [{:.*}, {:.*}, {:.*}] km/s",
            self.frame,
            self.epoch,
            decimals,
            self.x_km,
            decimals,
            self.y_km,
            decimals,
            self.z_km,
            decimals,
            self.vx_km_s,
            decimals,
            self.vy_km_s,
            decimals,
            self.vz_km_s,
        )
    }
}

impl TimeTagged for Orbit {
    fn epoch(&self) -> Epoch {
        self.epoch
    }

    fn set_epoch(&mut self, epoch: Epoch) {
        self.epoch = epoch
    }
}

impl State for Orbit {
    type Size = U6;
    type VecLength = U6;

    /// Returns a state whose position and velocity are zero, in the EME2000 frame.
    fn zeros() -> Self {
        Self::cartesian(
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            Epoch::from_tai_seconds(0.0),
            super::EME2000,
        )
    }

    fn as_vector(&self) -> OVector<f64, U6> {
        self.to_cartesian_vec()
    }

    fn set(&mut self, epoch: Epoch, vector: &OVector<f64, U6>) -> Result<(), AstroError> {
        self.epoch = epoch;
        self.x_km = vector[0];
        self.y_km = vector[1];
        self.z_km = vector[2];
        self.vx_km_s = vector[3];
        self.vy_km_s = vector[4];
        self.vz_km_s = vector[5];
        Ok(())
    }

    fn value(&self, param: StateParameter) -> Result<f64, AstroError> {
        match param {
            StateParameter::X => Ok(self.x_km),
            StateParameter::Y => Ok(self.y_km),
            StateParameter::Z => Ok(self.z_km),
            StateParameter::VX => Ok(self.vx_km_s),
            StateParameter::VY => Ok(self.vy_km_s),
            StateParameter::VZ => Ok(self.vz_km_s),
            StateParameter::Rmag => Ok(self.rmag_km()),
            StateParameter::Vmag => Ok(self.vmag_km_s()),
            StateParameter::SMA => Ok(self.sma_km()),
            StateParameter::Eccentricity => Ok(self.ecc()),
            StateParameter::Inclination => Ok(self.inc_deg()),
            StateParameter::RAAN => Ok(self.raan_deg()),
            StateParameter::AoP => Ok(self.aop_deg()),
            StateParameter::AoL => Ok(self.aol_deg()),
            StateParameter::TrueAnomaly => Ok(self.ta_deg()),
            StateParameter::MeanAnomaly => Ok(self.ma_deg()),
            StateParameter::EccentricAnomaly => Ok(self.ea_deg()),
            StateParameter::TrueLongitude => Ok(self.tlong_deg()),
            StateParameter::Apoapsis => Ok(self.ta_deg()),
            StateParameter::Periapsis => Ok(self.ta_deg()),
            StateParameter::ApoapsisRadius => Ok(self.apoapsis_km()),
            StateParameter::PeriapsisRadius => Ok(self.periapsis_km()),
            StateParameter::Altitude => Ok(self.altitude_km()),
            StateParameter::Energy => Ok(self.energy_km2_s2()),
            StateParameter::Hmag => Ok(self.hmag_km2_s()),
            StateParameter::Declination => Ok(self.declination_deg()),
            StateParameter::RightAscension => Ok(self.right_ascension_deg()),
            StateParameter::Period => Ok(self.period().to_seconds()),
            _ => Err(AstroError::ParamNotSupported { param }),
        }
    }
}

/// The classical orbital elements, as a plain record.
///
/// All angles are in degrees, the semi-major axis in kilometers. This is a transport type:
/// the `Orbit` remains the Cartesian source of truth.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coe {
    pub sma_km: f64,
    pub ecc: f64,
    pub inc_deg: f64,
    pub raan_deg: f64,
    pub aop_deg: f64,
    pub ta_deg: f64,
}

impl fmt::Display for Coe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "sma = {:.3} km\tecc = {:.6}\tinc = {:.3} deg\traan = {:.3} deg\taop = {:.3} deg\tta = {:.3} deg",
            self.sma_km, self.ecc, self.inc_deg, self.raan_deg, self.aop_deg, self.ta_deg
        )
    }
}

impl From<Orbit> for Coe {
    fn from(orbit: Orbit) -> Self {
        orbit.to_coe()
    }
}

/// Computes the true anomaly from the given mean anomaly for an orbit.
///
/// The computation process varies depending on whether the orbit is elliptical (eccentricity less
/// than or equal to 1) or hyperbolic (eccentricity greater than 1). In each case, the method
/// uses an iterative algorithm to find a satisfactory approximation of the anomaly (GTDS MathSpec
/// Equations 3-180, 3-181, and 3-186), then converts it to the true anomaly.
///
/// Inputs and output are in radians.
pub(crate) fn compute_mean_to_true_anomaly(
    ma_radians: f64,
    ecc: f64,
    tol: f64,
) -> Result<f64, AstroError> {
    let rm = ma_radians;
    if ecc <= 1.0 {
        // Elliptical orbit
        let mut e2 = rm + ecc * rm.sin(); // GTDS MathSpec Equation 3-182

        let mut iter = 0;

        loop {
            iter += 1;
            if iter > 1000 {
                return Err(AstroError::MaxIterReached {
                    msg: format!("{iter}"),
                });
            }

            // GTDS MathSpec Equation 3-180
            let normalized_anomaly = 1.0 - ecc * e2.cos();

            if normalized_anomaly.abs() < MA_EPSILON {
                return Err(AstroError::MathDomain {
                    msg: format!("normalizer too small {normalized_anomaly}"),
                });
            }

            // GTDS MathSpec Equation 3-181
            let e1 = e2 - (e2 - ecc * e2.sin() - rm) / normalized_anomaly;

            if (e2 - e1).abs() < tol {
                break;
            }

            e2 = e1;
        }

        let mut e = e2;

        if e < 0.0 {
            e += TAU;
        }

        let c = (e - PI).abs();

        let mut ta = if c >= 1.0e-08 {
            let normalized_anomaly = 1.0 - ecc;

            if (normalized_anomaly).abs() < MA_EPSILON {
                return Err(AstroError::MathDomain {
                    msg: format!("normalized anomaly too small {normalized_anomaly}"),
                });
            }

            let eccentricity_ratio = (1.0 + ecc) / normalized_anomaly;

            if eccentricity_ratio < 0.0 {
                return Err(AstroError::MathDomain {
                    msg: format!("eccentric ratio too small {eccentricity_ratio}"),
                });
            }

            let f = eccentricity_ratio.sqrt();
            let g = (e / 2.0).tan();
            // tan(TA/2) = Sqrt[(1+ecc)/(1-ecc)] * tan(E/2)
            2.0 * (f * g).atan()
        } else {
            e
        };

        if ta < 0.0 {
            ta += TAU;
        }
        Ok(ta)
    } else {
        // Hyperbolic orbit: the anomaly is no longer an angle, so we cannot take the modulo
        // of 2*PI of the mean anomaly.
        let mut f2: f64 = 0.0;
        let mut iter = 0;

        loop {
            iter += 1;
            if iter > 1000 {
                return Err(AstroError::MaxIterReached {
                    msg: format!("{iter}"),
                });
            }

            let normalizer = ecc * f2.cosh() - 1.0;

            if normalizer.abs() < MA_EPSILON {
                return Err(AstroError::MathDomain {
                    msg: format!("normalizer too small {normalizer}"),
                });
            }

            // GTDS MathSpec Equation 3-186
            let f1 = f2 - (ecc * f2.sinh() - f2 - rm) / normalizer;
            if (f2 - f1).abs() < tol {
                break;
            }
            f2 = f1;
        }

        let f = f2;
        let normalized_anomaly = ecc - 1.0;

        if normalized_anomaly.abs() < MA_EPSILON {
            return Err(AstroError::MathDomain {
                msg: format!("eccentric ratio too small {normalized_anomaly}"),
            });
        }

        let eccentricity_ratio = (ecc + 1.0) / normalized_anomaly;

        if eccentricity_ratio < 0.0 {
            return Err(AstroError::MathDomain {
                msg: format!("eccentric ratio too small {eccentricity_ratio}"),
            });
        }

        let e = eccentricity_ratio.sqrt();
        let g = (f / 2.0).tanh();
        // tan(TA/2) = Sqrt[(ecc+1)/(ecc-1)] * Tanh(F/2) where F is the hyperbolic anomaly
        let mut ta = 2.0 * (e * g).atan();

        if ta < 0.0 {
            ta += TAU;
        }
        Ok(ta)
    }
}

#[cfg(test)]
mod ut_orbit {
    use super::*;
    use crate::cosmic::EME2000;
    use approx::assert_abs_diff_eq;

    #[test]
    fn kepler_cartesian_roundtrip() {
        let epoch = Epoch::from_gregorian_tai_at_midnight(2021, 3, 4);
        let orbit = Orbit::keplerian(8_159.0, 0.001, 38.6, 75.0, 63.0, 42.0, epoch, EME2000);
        assert_abs_diff_eq!(orbit.sma_km(), 8_159.0, epsilon = 1e-6);
        assert_abs_diff_eq!(orbit.ecc(), 0.001, epsilon = 1e-9);
        assert_abs_diff_eq!(orbit.inc_deg(), 38.6, epsilon = 1e-9);
        assert_abs_diff_eq!(orbit.raan_deg(), 75.0, epsilon = 1e-9);
        assert_abs_diff_eq!(orbit.aop_deg(), 63.0, epsilon = 1e-6);
        assert_abs_diff_eq!(orbit.ta_deg(), 42.0, epsilon = 1e-6);

        let coe = orbit.to_coe();
        let rebuilt = Orbit::from_coe(coe, epoch, EME2000);
        let (pos_err, vel_err) = crate::utils::rss_orbit_errors(&rebuilt, &orbit);
        assert!(pos_err < 1e-5);
        assert!(vel_err < 1e-9);
    }

    #[test]
    fn mean_anomaly_roundtrip() {
        let epoch = Epoch::from_gregorian_tai_at_midnight(2021, 3, 4);
        let orbit =
            Orbit::keplerian_mean_anomaly(24_396.0, 0.73, 7.0, 194.0, 178.0, 20.0, epoch, EME2000)
                .unwrap();
        assert_abs_diff_eq!(orbit.ma_deg(), 20.0, epsilon = 1e-6);
    }

    #[test]
    fn apsis_radii() {
        let epoch = Epoch::from_gregorian_tai_at_midnight(2021, 3, 4);
        let orbit =
            Orbit::keplerian_apsis_radii(44_000.0, 6_800.0, 12.0, 14.0, 16.0, 18.0, epoch, EME2000);
        assert_abs_diff_eq!(orbit.apoapsis_km(), 44_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(orbit.periapsis_km(), 6_800.0, epsilon = 1e-6);
    }

    #[test]
    fn energy_period_vs_vis_viva() {
        let epoch = Epoch::from_gregorian_tai_at_midnight(2021, 3, 4);
        let orbit = Orbit::keplerian(7_000.0, 0.01, 51.6, 0.0, 0.0, 0.0, epoch, EME2000);
        // Vis-viva: v^2 = gm (2/r - 1/a)
        let expected_v = (EME2000.gm() * (2.0 / orbit.rmag_km() - 1.0 / 7_000.0)).sqrt();
        assert_abs_diff_eq!(orbit.vmag_km_s(), expected_v, epsilon = 1e-9);
        let expected_period_s = 2.0 * PI * (7_000.0_f64.powi(3) / EME2000.gm()).sqrt();
        assert_abs_diff_eq!(orbit.period().to_seconds(), expected_period_s, epsilon = 1e-6);
    }
}
