extern crate hemera;

use hemera::cosmic::{Bodies, Coe, Frame, EME2000, MOON_J2000};
use hemera::md::prelude::*;
use hemera::utils::rss_orbit_errors;
use rstest::rstest;
use std::str::FromStr;

#[rstest]
#[case(7_000.0, 0.001, 28.5, 10.0, 20.0, 30.0)]
#[case(8_159.0, 0.2, 38.6, 75.0, 63.0, 42.0)]
#[case(24_396.0, 0.73, 7.0, 194.0, 178.0, 20.0)]
#[case(42_164.0, 0.0002, 0.5, 250.0, 90.0, 180.5)]
#[case(7_200.0, 0.05, 98.6, 300.0, 350.0, 275.0)]
fn keplerian_cartesian_roundtrip(
    #[case] sma_km: f64,
    #[case] ecc: f64,
    #[case] inc_deg: f64,
    #[case] raan_deg: f64,
    #[case] aop_deg: f64,
    #[case] ta_deg: f64,
) {
    let epoch = Epoch::from_gregorian_tai_at_midnight(2021, 6, 1);
    let orbit = Orbit::keplerian(sma_km, ecc, inc_deg, raan_deg, aop_deg, ta_deg, epoch, EME2000);

    let coe = Coe::from(orbit);
    let rebuilt = Orbit::from_coe(coe, epoch, EME2000);
    let (pos_err, vel_err) = rss_orbit_errors(&rebuilt, &orbit);
    assert!(pos_err < 1e-5, "roundtrip position error {pos_err} km");
    assert!(vel_err < 1e-9, "roundtrip velocity error {vel_err} km/s");

    assert!((coe.sma_km - sma_km).abs() < 1e-5);
    assert!((coe.ecc - ecc).abs() < 1e-8);
    assert!((coe.inc_deg - inc_deg).abs() < 1e-7);
}

#[test]
fn anomalies_are_consistent() {
    let epoch = Epoch::from_gregorian_tai_at_midnight(2021, 6, 1);
    let orbit = Orbit::keplerian(8_000.0, 0.2, 30.0, 40.0, 50.0, 90.0, epoch, EME2000);

    // For an elliptic orbit on the outbound leg, M < E < TA
    let ta = orbit.ta_deg();
    let ea = orbit.ea_deg();
    let ma = orbit.ma_deg();
    assert!(ma < ea, "M = {ma} should be below E = {ea}");
    assert!(ea < ta, "E = {ea} should be below TA = {ta}");

    // And the mean anomaly roundtrips through the Kepler solver
    let rebuilt = Orbit::keplerian_mean_anomaly(
        orbit.sma_km(),
        orbit.ecc(),
        orbit.inc_deg(),
        orbit.raan_deg(),
        orbit.aop_deg(),
        ma,
        epoch,
        EME2000,
    )
    .unwrap();
    let (pos_err, _) = rss_orbit_errors(&rebuilt, &orbit);
    assert!(pos_err < 1e-5);
}

#[test]
fn frames_and_bodies() {
    assert_eq!(Frame::from_str("EME2000").unwrap(), EME2000);
    assert_eq!(Frame::from_str("luna").unwrap(), MOON_J2000);
    assert!(Frame::from_str("B1950").is_err());

    assert_eq!(EME2000.body(), Bodies::Earth);
    assert!(EME2000.is_geoid());
    assert!(!MOON_J2000.is_geoid());

    // A Moon centered orbit uses the lunar GM
    let epoch = Epoch::from_gregorian_tai_at_midnight(2021, 6, 1);
    let llo = Orbit::keplerian(1_837.0, 0.0012, 90.0, 10.0, 20.0, 30.0, epoch, MOON_J2000);
    // Low lunar orbit period of roughly two hours
    let period_min = llo.period().to_seconds() / 60.0;
    assert!(period_min > 105.0 && period_min < 125.0, "LLO period {period_min} min");
}

#[test]
fn apsis_accessors() {
    let epoch = Epoch::from_gregorian_tai_at_midnight(2021, 6, 1);
    let orbit = Orbit::keplerian(8_000.0, 0.2, 30.0, 40.0, 50.0, 90.0, epoch, EME2000);
    assert!((orbit.apoapsis_km() - 9_600.0).abs() < 1e-6);
    assert!((orbit.periapsis_km() - 6_400.0).abs() < 1e-6);
    assert!(orbit.apoapsis_altitude_km() > orbit.periapsis_altitude_km());
    // The radius is always between both apsides
    assert!(orbit.rmag_km() >= orbit.periapsis_km());
    assert!(orbit.rmag_km() <= orbit.apoapsis_km());
}

#[test]
fn spacecraft_masses() {
    let epoch = Epoch::from_gregorian_tai_at_midnight(2021, 6, 1);
    let orbit = Orbit::keplerian(7_000.0, 0.01, 51.6, 0.0, 0.0, 0.0, epoch, EME2000);
    let sc = Spacecraft::new(orbit, 500.0, 100.0).with_drag(12.0, 2.2);
    assert!((sc.total_mass_kg() - 600.0).abs() < f64::EPSILON);
    assert!((sc.drag.area_m2 - 12.0).abs() < f64::EPSILON);
    assert_eq!(sc.epoch(), epoch);
}
