extern crate hemera;

use hemera::cosmic::EME2000;
use hemera::dynamics::{
    AtmosphericDrag, Harmonics, Maneuver, OrbitalDynamics, SpacecraftDynamics, Thruster,
};
use hemera::linalg::Vector3;
use hemera::md::prelude::*;
use hemera::orbit::{KeplerModel, OrbitModel};
use hemera::propagators::Propagator;

#[test]
fn drag_decays_the_orbit() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2023, 1, 1);
    let orbit = Orbit::keplerian(6_778.0, 0.0005, 51.6, 0.0, 0.0, 0.0, epoch, EME2000);
    let sc = Spacecraft::new(orbit, 100.0, 0.0).with_drag(10.0, 2.2);

    // Roughly the density at 400 km of altitude for mean solar activity
    let mut dynamics = SpacecraftDynamics::new(OrbitalDynamics::two_body());
    dynamics.add_model(AtmosphericDrag::exponential(3e-12, 400.0, 60.0));

    let prop = Propagator::default(dynamics);
    let final_sc = prop.with(sc).for_duration(1 * Unit::Day).unwrap();

    assert!(
        final_sc.orbit.energy_km2_s2() < orbit.energy_km2_s2(),
        "drag must decrease the orbital energy"
    );
    assert!(
        final_sc.orbit.sma_km() < orbit.sma_km(),
        "drag must shrink the orbit"
    );
    // The decay at ISS altitude is meters to a few km per day, not tens of km
    assert!(orbit.sma_km() - final_sc.orbit.sma_km() < 20.0);
}

#[test]
fn j2_secular_drift_matches_analytic() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2023, 1, 1);
    let orbit = Orbit::keplerian(7_000.0, 0.01, 51.6, 60.0, 20.0, 0.0, epoch, EME2000);

    let mut orbital_dyn = OrbitalDynamics::two_body();
    orbital_dyn.add_model(Harmonics::earth_j2());
    let prop = Propagator::default(orbital_dyn);
    let numerical = prop.with(orbit).for_duration(1 * Unit::Day).unwrap();

    let analytic = KeplerModel::j2(orbit)
        .unwrap()
        .state_at(epoch + 1 * Unit::Day)
        .unwrap();

    let num_drift = numerical.raan_deg() - orbit.raan_deg();
    let ana_drift = analytic.raan_deg() - orbit.raan_deg();

    // Both see the node regress by a few degrees per day
    assert!(num_drift < -1.0, "numerical RAAN drift {num_drift} deg");
    assert!(ana_drift < -1.0, "analytic RAAN drift {ana_drift} deg");
    // The numerical drift carries short periodic oscillations on top of the secular rate,
    // so only the rates need to agree
    assert!(
        (num_drift - ana_drift).abs() < 0.5,
        "secular disagreement: numerical {num_drift} deg vs analytic {ana_drift} deg"
    );
}

#[test]
fn prograde_burn_raises_the_orbit() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2023, 1, 1);
    let orbit = Orbit::keplerian(7_000.0, 0.01, 28.5, 0.0, 0.0, 0.0, epoch, EME2000);
    let thruster = Thruster {
        thrust_n: 50.0,
        isp_s: 300.0,
    };
    let sc = Spacecraft::new(orbit, 450.0, 50.0).with_thruster(thruster);

    // Ten minute burn along the initial velocity direction
    let mnvr = Maneuver::constant(
        epoch + 1 * Unit::Minute,
        epoch + 11 * Unit::Minute,
        orbit.velocity() / orbit.vmag_km_s(),
    );
    let dynamics = SpacecraftDynamics::new(OrbitalDynamics::two_body()).with_maneuver(mnvr);

    let prop = Propagator::default(dynamics);
    let final_sc = prop.with(sc).for_duration(30 * Unit::Minute).unwrap();

    assert!(
        final_sc.orbit.sma_km() > orbit.sma_km() + 10.0,
        "a prograde burn must raise the SMA: {} km vs {} km",
        final_sc.orbit.sma_km(),
        orbit.sma_km()
    );

    // mdot = F / (Isp * g0) = 50 / (300 * 9.80665) kg/s over 600 s
    let expected_fuel_used = 50.0 / (300.0 * 9.80665) * 600.0;
    let fuel_used = 50.0 - final_sc.fuel_mass_kg;
    // The burn boundaries rarely align with the integration steps, so the mass flow is
    // slightly mis-sampled around ignition and cutoff
    assert!(
        (fuel_used - expected_fuel_used).abs() < 0.5,
        "fuel used {fuel_used} kg vs expected {expected_fuel_used} kg"
    );
}

#[test]
fn burn_without_thruster_errors() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2023, 1, 1);
    let orbit = Orbit::keplerian(7_000.0, 0.01, 28.5, 0.0, 0.0, 0.0, epoch, EME2000);
    let sc = Spacecraft::new(orbit, 450.0, 50.0);

    let mnvr = Maneuver::constant(epoch, epoch + 10 * Unit::Minute, Vector3::new(1.0, 0.0, 0.0));
    let dynamics = SpacecraftDynamics::new(OrbitalDynamics::two_body()).with_maneuver(mnvr);

    let prop = Propagator::default(dynamics);
    assert!(prop.with(sc).for_duration(30 * Unit::Minute).is_err());
}

#[test]
fn fuel_exhaustion_stops_the_propagation() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2023, 1, 1);
    let orbit = Orbit::keplerian(7_000.0, 0.01, 28.5, 0.0, 0.0, 0.0, epoch, EME2000);
    let thruster = Thruster {
        thrust_n: 50.0,
        isp_s: 300.0,
    };
    // One kilogram of fuel lasts under a minute at this thrust
    let sc = Spacecraft::new(orbit, 450.0, 1.0).with_thruster(thruster);

    let mnvr = Maneuver::constant(
        epoch,
        epoch + 30 * Unit::Minute,
        orbit.velocity() / orbit.vmag_km_s(),
    );
    let dynamics = SpacecraftDynamics::new(OrbitalDynamics::two_body()).with_maneuver(mnvr);

    let prop = Propagator::default(dynamics);
    assert!(
        prop.with(sc).for_duration(1 * Unit::Hour).is_err(),
        "running the tank dry must stop the propagation"
    );
}
