extern crate hemera;

use hemera::cosmic::EME2000;
use hemera::dynamics::OrbitalDynamics;
use hemera::md::prelude::*;
use hemera::orbit::{KeplerModel, OrbitModel};
use hemera::propagators::{PropOpts, Propagator, RSSCartesianStep};
use hemera::utils::rss_orbit_errors;

#[test]
fn two_body_conserves_energy() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 1, 1);
    let orbit = Orbit::keplerian(7_000.0, 0.01, 51.6, 45.0, 30.0, 0.0, epoch, EME2000);

    let prop = Propagator::default(OrbitalDynamics::two_body());
    let final_state = prop.with(orbit).for_duration(1 * Unit::Day).unwrap();

    let energy_err = (final_state.energy_km2_s2() - orbit.energy_km2_s2()).abs();
    assert!(
        energy_err < 1e-8,
        "two body propagation should conserve energy, drifted by {energy_err}"
    );
}

#[test]
fn until_epoch_lands_exactly() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 1, 1);
    let orbit = Orbit::keplerian(7_000.0, 0.01, 51.6, 45.0, 30.0, 0.0, epoch, EME2000);
    let end = epoch + 2.5 * Unit::Hour + 12.345 * Unit::Second;

    let prop = Propagator::default(OrbitalDynamics::two_body());
    let final_state = prop.with(orbit).until_epoch(end).unwrap();
    assert_eq!(
        final_state.epoch, end,
        "the last step must land exactly on the requested epoch"
    );
}

#[test]
fn forward_backward_roundtrip() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 1, 1);
    let orbit = Orbit::keplerian(8_159.0, 0.2, 38.6, 75.0, 63.0, 42.0, epoch, EME2000);
    let period = orbit.period();

    let prop = Propagator::default(OrbitalDynamics::two_body());
    let mut instance = prop.with(orbit);
    instance.for_duration(period).unwrap();
    let back = instance.for_duration(-period).unwrap();

    let (pos_err, vel_err) = rss_orbit_errors(&back, &orbit);
    assert!(
        pos_err < 1e-3,
        "forward/backward roundtrip position error too large: {pos_err} km"
    );
    assert!(
        vel_err < 1e-6,
        "forward/backward roundtrip velocity error too large: {vel_err} km/s"
    );
}

#[test]
fn fixed_step_rk4_matches_kepler() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 1, 1);
    let orbit = Orbit::keplerian(7_000.0, 0.01, 51.6, 45.0, 30.0, 0.0, epoch, EME2000);
    let period = orbit.period();

    let prop = Propagator::rk4_fixed(OrbitalDynamics::two_body(), 10.0 * Unit::Second);
    let num = prop.with(orbit).for_duration(period).unwrap();

    let kep = KeplerModel::two_body(orbit)
        .unwrap()
        .state_at(epoch + period)
        .unwrap();

    let (pos_err, vel_err) = rss_orbit_errors(&num, &kep);
    assert!(
        pos_err < 1e-2,
        "RK4 vs analytic position error too large: {pos_err} km"
    );
    assert!(vel_err < 1e-5);
}

#[test]
fn adaptive_step_stays_within_bounds() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 1, 1);
    let orbit = Orbit::keplerian(7_000.0, 0.01, 51.6, 45.0, 30.0, 0.0, epoch, EME2000);

    let opts = PropOpts::with_adaptive_step_s(1.0, 120.0, 1e-12, RSSCartesianStep {});
    let prop = Propagator::dormand45(OrbitalDynamics::two_body(), opts);
    let mut instance = prop.with(orbit);
    instance.for_duration(1 * Unit::Hour).unwrap();

    let details = instance.latest_details();
    assert!(details.step.abs() <= 120.0 * Unit::Second + 1 * Unit::Nanosecond);
    assert!(details.error <= 1e-12);
}

#[test]
fn traj_interpolation_matches_kepler() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 1, 1);
    let orbit = Orbit::keplerian(7_500.0, 0.05, 28.5, 10.0, 20.0, 30.0, epoch, EME2000);

    let prop = Propagator::default(OrbitalDynamics::two_body());
    let (final_state, traj) = prop.with(orbit).for_duration_with_traj(6 * Unit::Hour).unwrap();

    assert_eq!(traj.first().epoch, epoch);
    assert_eq!(traj.last().epoch, final_state.epoch);

    let kepler = KeplerModel::two_body(orbit).unwrap();
    // Sample at an epoch which is unlikely to be a propagation step
    for offset_min in [13.7, 100.3, 333.9] {
        let sample_epoch = epoch + offset_min * Unit::Minute;
        let interp = traj.at(sample_epoch).unwrap();
        let truth = kepler.state_at(sample_epoch).unwrap();
        let (pos_err, _) = rss_orbit_errors(&interp, &truth);
        assert!(
            pos_err < 1e-3,
            "interpolated state at {sample_epoch} off by {pos_err} km"
        );
    }

    // Out of bounds queries must error
    assert!(traj.at(epoch - 1 * Unit::Minute).is_err());
    assert!(traj.at(traj.last().epoch + 1 * Unit::Minute).is_err());

    // And the iterator yields monotonically increasing epochs
    let mut prev = None;
    for state in traj.every(10 * Unit::Minute) {
        if let Some(prev_epoch) = prev {
            assert!(state.epoch > prev_epoch);
        }
        prev = Some(state.epoch);
    }
}
