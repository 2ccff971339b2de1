extern crate hemera;

use hemera::cosmic::EME2000;
use hemera::dynamics::OrbitalDynamics;
use hemera::md::prelude::*;
use hemera::orbit::{KeplerModel, OrbitModel, Propagated, Sgp4Model, Tabulated};
use hemera::propagators::Propagator;
use hemera::utils::rss_orbit_errors;

// ISS element set, for the SGP4 cases
const ISS_TLE_LINE1: &str = "1 25544U 98067A   24001.50000000  .00016717  00000-0  10270-3 0  9997";
const ISS_TLE_LINE2: &str = "2 25544  51.6400 200.0000 0007417  50.0000 310.1200 15.49560000100002";

#[test]
fn kepler_matches_propagated_two_body() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 3, 4);
    let orbit = Orbit::keplerian(8_000.0, 0.1, 30.0, 60.0, 90.0, 10.0, epoch, EME2000);

    let kepler = KeplerModel::two_body(orbit).unwrap();
    let propagated = Propagated::new(Propagator::default(OrbitalDynamics::two_body()), orbit);

    for offset_h in [0.5, 3.0, 12.0, 36.0] {
        let query = epoch + offset_h * Unit::Hour;
        let analytic = kepler.state_at(query).unwrap();
        let numerical = propagated.state_at(query).unwrap();
        let (pos_err, vel_err) = rss_orbit_errors(&numerical, &analytic);
        assert!(
            pos_err < 1e-3,
            "analytic vs numerical at +{offset_h} h: {pos_err} km"
        );
        assert!(vel_err < 1e-6);
    }
}

#[test]
fn propagated_cache_extends_and_interpolates() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 3, 4);
    let orbit = Orbit::keplerian(7_200.0, 0.02, 98.0, 0.0, 0.0, 0.0, epoch, EME2000);

    let propagated = Propagated::new(Propagator::default(OrbitalDynamics::two_body()), orbit);

    // At the initial epoch, the model returns the initial state itself
    assert_eq!(propagated.state_at(epoch).unwrap(), orbit);

    // A query two hours out extends the cache at least that far
    let two_h = propagated.state_at(epoch + 2 * Unit::Hour).unwrap();
    let (_, cached_end) = propagated.cached_span();
    assert!(cached_end >= epoch + 2 * Unit::Hour);

    // An earlier query is now served from the cache, and both queries agree with the
    // analytic solution
    let one_h = propagated.state_at(epoch + 1 * Unit::Hour).unwrap();
    let kepler = KeplerModel::two_body(orbit).unwrap();
    for (state, offset) in [(one_h, 1), (two_h, 2)] {
        let truth = kepler.state_at(epoch + offset * Unit::Hour).unwrap();
        let (pos_err, _) = rss_orbit_errors(&state, &truth);
        assert!(pos_err < 1e-3, "+{offset} h query off by {pos_err} km");
    }

    // Backward queries work too (not cached)
    let before = propagated.state_at(epoch - 30 * Unit::Minute).unwrap();
    let truth = kepler.state_at(epoch - 30 * Unit::Minute).unwrap();
    let (pos_err, _) = rss_orbit_errors(&before, &truth);
    assert!(pos_err < 1e-3);
}

#[test]
fn tabulated_interpolates_within_span() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 3, 4);
    let orbit = Orbit::keplerian(7_500.0, 0.03, 51.6, 20.0, 40.0, 60.0, epoch, EME2000);
    let kepler = KeplerModel::two_body(orbit).unwrap();

    // Sample the analytic model every minute over two hours
    let table = kepler
        .sample(epoch, epoch + 2 * Unit::Hour, 1 * Unit::Minute)
        .unwrap();
    let tabulated = Tabulated::new(table.states).unwrap();

    // Query between the nodes
    let query = epoch + 47.5 * Unit::Minute;
    let interp = tabulated.state_at(query).unwrap();
    let truth = kepler.state_at(query).unwrap();
    let (pos_err, _) = rss_orbit_errors(&interp, &truth);
    assert!(pos_err < 1e-4, "tabulated interpolation off by {pos_err} km");

    // Extrapolation is refused
    assert!(tabulated.state_at(epoch - 1 * Unit::Minute).is_err());
    assert!(tabulated.state_at(epoch + 3 * Unit::Hour).is_err());

    // And at least two states are required
    assert!(Tabulated::new(vec![orbit]).is_err());
}

#[test]
fn sgp4_iss_sanity() {
    let _ = pretty_env_logger::try_init();

    let model = Sgp4Model::from_lines(ISS_TLE_LINE1, ISS_TLE_LINE2).unwrap();

    // The TLE epoch is day 001.5 of 2024
    let tle_epoch = model.epoch();
    let expect_epoch = Epoch::from_gregorian_utc_hms(2024, 1, 1, 12, 0, 0);
    assert!((tle_epoch - expect_epoch).abs() < 1 * Unit::Second);

    let state = model.state_at(tle_epoch).unwrap();
    // The ISS orbits at about 420 km of altitude
    assert!(
        state.rmag_km() > 6_500.0 && state.rmag_km() < 7_100.0,
        "implausible ISS radius: {} km",
        state.rmag_km()
    );
    assert!(
        state.vmag_km_s() > 7.0 && state.vmag_km_s() < 8.0,
        "implausible ISS speed: {} km/s",
        state.vmag_km_s()
    );

    // Half an orbit later, the ISS is on the other side of the Earth
    let half_period = 0.5 * (86_400.0 / 15.4956) * Unit::Second;
    let opposite = model.state_at(tle_epoch + half_period).unwrap();
    assert!(state.radius().dot(&opposite.radius()) < 0.0);
}

#[test]
fn tle_parse_errors() {
    assert!(Sgp4Model::from_lines("not a TLE", "not a TLE either").is_err());
}

#[test]
fn models_share_the_same_interface() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 3, 4);
    let orbit = Orbit::keplerian(8_000.0, 0.1, 30.0, 60.0, 90.0, 10.0, epoch, EME2000);
    let kepler = KeplerModel::two_body(orbit).unwrap();
    let table = kepler
        .sample(epoch, epoch + 3 * Unit::Hour, 1 * Unit::Minute)
        .unwrap();

    let models: Vec<Box<dyn OrbitModel>> = vec![
        Box::new(kepler),
        Box::new(Tabulated::new(table.states).unwrap()),
        Box::new(Propagated::new(
            Propagator::default(OrbitalDynamics::two_body()),
            orbit,
        )),
    ];

    let query = epoch + 90 * Unit::Minute;
    let references: Vec<Orbit> = models
        .iter()
        .map(|model| model.state_at(query).unwrap())
        .collect();

    for state in &references[1..] {
        let (pos_err, _) = rss_orbit_errors(state, &references[0]);
        assert!(pos_err < 1e-3, "models disagree by {pos_err} km");
    }
}
