extern crate hemera;

use hemera::cosmic::EME2000;
use hemera::dynamics::OrbitalDynamics;
use hemera::md::events::{AndEvent, EventEvaluator, OrEvent};
use hemera::md::prelude::*;
use hemera::propagators::Propagator;

#[test]
fn find_all_apoapses() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 1, 1);
    let orbit = Orbit::keplerian(8_159.0, 0.2, 38.6, 75.0, 63.0, 0.0, epoch, EME2000);
    let period = orbit.period();

    let prop = Propagator::default(OrbitalDynamics::two_body());
    let (_, traj) = prop.with(orbit).for_duration_with_traj(3 * period).unwrap();

    let apo_events = traj.find(&Event::apoapsis()).unwrap();
    assert_eq!(
        apo_events.len(),
        3,
        "three apoapses expected over three periods starting at periapsis"
    );
    for event in &apo_events {
        assert!(
            (event.state.ta_deg() - 180.0).abs() < 1e-2,
            "event converged away from the apoapsis: TA = {}",
            event.state.ta_deg()
        );
    }
}

#[test]
fn stop_cond_first_apoapsis() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 1, 1);
    let orbit = Orbit::keplerian(8_159.0, 0.2, 38.6, 75.0, 63.0, 0.0, epoch, EME2000);
    let period = orbit.period();

    let apo_event = Event::apoapsis();
    let prop = Propagator::default(OrbitalDynamics::two_body());
    let (event_state, _traj) = prop
        .with(orbit)
        .until_event(3 * period, &apo_event)
        .expect("condition should have been found");

    // Starting from the periapsis, the first apoapsis happens half a period later
    let elapsed = event_state.epoch - epoch;
    assert!(elapsed > 0.4 * period && elapsed < 0.6 * period);
    assert!((event_state.ta_deg() - 180.0).abs() < 1e-2);
}

#[test]
fn stop_cond_3rd_apo() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 1, 1);
    let orbit = Orbit::keplerian(8_159.0, 0.2, 38.6, 75.0, 63.0, 0.0, epoch, EME2000);
    let period = orbit.period();

    let apo_event = Event::apoapsis();
    let prop = Propagator::default(OrbitalDynamics::two_body());
    let (event_state, _traj) = prop
        .with(orbit)
        .until_nth_event(4 * period, &apo_event, 2)
        .expect("condition should have been found");

    // Confirm that this is the third apoapsis
    let elapsed = event_state.epoch - epoch;
    assert!(
        elapsed > 2.4 * period && elapsed < 2.6 * period,
        "converged on the wrong apoapse"
    );
    assert!(
        (event_state.ta_deg() - 180.0).abs() < 1e-2,
        "converged, yet convergence criteria not met"
    );
}

#[test]
fn compound_event_semantics() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 1, 1);
    // At 400 km altitude: rmag of about 6778 km
    let orbit = Orbit::keplerian(6_778.0, 0.0005, 51.6, 0.0, 0.0, 0.0, epoch, EME2000);

    let below_7000 = Event::new(StateParameter::Rmag, 7_000.0);
    let below_6000 = Event::new(StateParameter::Rmag, 6_000.0);

    // rmag - 7000 < 0 and rmag - 6000 > 0
    assert!(below_7000.eval(&orbit).unwrap() < 0.0);
    assert!(below_6000.eval(&orbit).unwrap() > 0.0);

    // AND is satisfied only when both children are: max of the evaluations
    let both = AndEvent::new(below_7000, below_6000);
    assert!(both.eval(&orbit).unwrap() > 0.0);

    // OR is satisfied when either child is: min of the evaluations
    let either = OrEvent::new(below_7000, below_6000);
    assert!(either.eval(&orbit).unwrap() < 0.0);

    // The precisions are the tightest of both children
    assert!(
        EventEvaluator::<Orbit>::epoch_precision(&both)
            <= EventEvaluator::<Orbit>::epoch_precision(&below_7000)
    );
    assert!(
        EventEvaluator::<Orbit>::value_precision(&both)
            <= EventEvaluator::<Orbit>::value_precision(&below_7000)
    );
}

#[test]
fn radius_arcs_span_apoapsis() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_tai_at_midnight(2022, 1, 1);
    let orbit = Orbit::keplerian(8_159.0, 0.2, 38.6, 75.0, 63.0, 0.0, epoch, EME2000);
    let period = orbit.period();

    let prop = Propagator::default(OrbitalDynamics::two_body());
    let (_, traj) = prop.with(orbit).for_duration_with_traj(2 * period).unwrap();

    // The event is zero when the radius crosses the semi-major axis value: the orbit spends
    // each arc between a rising and a falling crossing around its apoapsis.
    let crossing = Event::new(StateParameter::Rmag, orbit.sma_km());
    let arcs = traj.find_arcs(&crossing).unwrap();

    assert!(!arcs.is_empty(), "expected at least one full radius arc");
    for arc in &arcs {
        let duration = arc.duration();
        assert!(duration > 0.2 * period);
        assert!(duration < 0.8 * period);
        // The middle of the arc is near the apoapsis
        let mid = arc.rise.state.epoch + duration / 2;
        let mid_state = traj.at(mid).unwrap();
        assert!(mid_state.rmag_km() > orbit.sma_km());
    }
}
