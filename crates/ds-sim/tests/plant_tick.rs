//! Whole-plant ticks: balance, faults and termination.

mod common;

use ds_components::{Controllable, FaultSchedule};
use ds_sim::{
    BranchId, ControlTarget, FatalReason, FlowBand, Plant, ReservoirFault, ReservoirId, SimError,
    SimOptions, Simulation, TemperatureBand, Termination, TickOutcome, TickPipeline, run_sim,
};

#[test]
fn balanced_plant_holds_levels() {
    let mut sim = Simulation::from_config(&common::endless()).unwrap();
    let summary = run_sim(&mut sim, &SimOptions { max_steps: 40 }, |_| {}).unwrap();
    assert_eq!(summary.steps, 40);
    assert_eq!(summary.termination, None);

    for id in [ReservoirId::One, ReservoirId::Two] {
        let r = sim.plant().reservoir(id);
        assert!((r.water_level() - 50.0).abs() < 1e-9);
        assert!((r.temperature() - 30.0).abs() < 1e-9);
        assert_eq!(r.error(), None);
    }
    assert_eq!(sim.clock().t, 40 * common::DT);
}

#[test]
fn steady_state_terminates_once_at_limit() {
    let mut sim = Simulation::from_config(&common::balanced()).unwrap();
    let mut signals = 0;
    let summary = run_sim(&mut sim, &SimOptions::default(), |s| {
        if s.termination().is_some() {
            signals += 1;
        }
    })
    .unwrap();

    // 10 ticks of 500 reach the 5000 limit.
    assert_eq!(summary.steps, 10);
    assert_eq!(summary.termination, Some(Termination::SteadyStateReached));
    assert_eq!(signals, 1);
    assert!(matches!(sim.step(), Err(SimError::Halted { .. })));
}

#[test]
fn score_books_on_target_flow() {
    let mut sim = Simulation::from_config(&common::balanced()).unwrap();
    run_sim(&mut sim, &SimOptions::default(), |_| {}).unwrap();
    let on_target = sim.score().get(TemperatureBand::Normal, FlowBand::OnTarget);
    // (6 + 4) per second over 10 half-second ticks.
    assert!((on_target - 50.0).abs() < 1e-9);
    assert!((sim.score().total() - on_target).abs() < 1e-12);
}

#[test]
fn steady_counter_resets_on_excursion() {
    let mut sim = Simulation::from_config(&common::balanced()).unwrap();
    for _ in 0..3 {
        sim.step().unwrap();
    }
    assert_eq!(sim.clock().steady_time, 1500);

    sim.apply(ControlTarget::ReservoirOutlet(ReservoirId::One), 9.0)
        .unwrap();
    sim.step().unwrap();
    assert_eq!(sim.clock().steady_time, 0);
}

#[test]
fn closing_branch_valves_breaks_pump_on_that_tick() {
    let mut config = common::endless();
    for valve in [
        &mut config.branch_a.valve_1,
        &mut config.branch_a.valve_2,
    ] {
        valve.time_constant = common::DT;
        valve.faults = FaultSchedule::single(0.0, 2000);
    }
    let mut sim = Simulation::from_config(&config).unwrap();

    for _ in 0..4 {
        assert_eq!(sim.step().unwrap(), TickOutcome::Continue);
    }
    let outcome = sim.step().unwrap();
    let expected = Termination::Fatal(FatalReason::PumpBreakdown {
        pump: "Pump A".to_string(),
    });
    assert_eq!(outcome, TickOutcome::Terminated(expected.clone()));
    assert_eq!(
        expected.to_string(),
        "Pump A blew up because valves were closed."
    );
    assert!(sim.step().is_err());
}

#[test]
fn closed_outlet_overflows_reservoir() {
    let mut config = common::endless();
    config.reservoir_2.outlet.setting = 0.0;
    config.reservoir_2.outlet.opening = 0.0;
    let mut sim = Simulation::from_config(&config).unwrap();

    let summary = run_sim(&mut sim, &SimOptions::default(), |_| {}).unwrap();
    // Level rises by 2 per tick from 50 and passes 100 on tick 26.
    assert_eq!(summary.steps, 26);
    let termination = summary.termination.unwrap();
    assert_eq!(
        termination,
        Termination::Fatal(FatalReason::Reservoir {
            reservoir: "Reservoir 2".to_string(),
            fault: ReservoirFault::Overflow,
        })
    );
    assert_eq!(termination.to_string(), "Reservoir 2 overflowed.");
    assert_eq!(sim.plant().reservoir(ReservoirId::Two).water_level(), 100.0);
}

#[test]
fn operator_controls_are_clamped() {
    let mut sim = Simulation::from_config(&common::balanced()).unwrap();
    sim.apply(ControlTarget::Heater(ReservoirId::One), 500.0)
        .unwrap();
    assert_eq!(sim.plant().heater(ReservoirId::One).setting(), 200.0);

    sim.apply(ControlTarget::ReservoirOutlet(ReservoirId::Two), -3.0)
        .unwrap();
    assert_eq!(sim.plant().reservoir(ReservoirId::Two).setting(), 0.0);

    assert!(sim
        .apply(ControlTarget::Heater(ReservoirId::Two), f64::NAN)
        .is_err());
}

#[test]
fn pump_can_be_switched_off() {
    let mut sim = Simulation::from_config(&common::endless()).unwrap();
    sim.apply(ControlTarget::Pump(BranchId::B), 0.0).unwrap();
    for _ in 0..20 {
        sim.step().unwrap();
    }
    let pump = sim.plant().branch(BranchId::B).pump();
    assert!(pump.mass_flow_out() < 1e-3);
    assert!(!pump.is_broken());
}

#[test]
fn plant_uses_standard_pipeline() {
    let plant = Plant::from_config(&common::balanced()).unwrap();
    assert_eq!(plant.pipeline(), &TickPipeline::standard());
}

#[test]
fn invalid_step_rejected() {
    let mut config = common::balanced();
    config.dt = 0;
    assert!(matches!(
        Plant::from_config(&config),
        Err(SimError::InvalidArg { .. })
    ));
}

#[test]
fn snapshot_serializes_plant_state() {
    let mut sim = Simulation::from_config(&common::balanced()).unwrap();
    sim.step().unwrap();
    let snapshot = sim.snapshot();
    assert_eq!(snapshot.t, common::DT);
    assert_eq!(snapshot.branch_a.pump.name, "Pump A");

    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["reservoir_1"]["water_level"], 50.0);
    assert_eq!(value["reservoir_2"]["demand"]["flow"], 4.0);
    assert_eq!(value["supply_heater"]["heat_flow_out"], 10.0);
    assert!(value["reservoir_1"]["error"].is_null());
}
