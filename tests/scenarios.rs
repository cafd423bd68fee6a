use pd_planner::distance::{DistanceMatrix, RoadNetwork, Topology};
use pd_planner::export::Action;
use pd_planner::models::{Planning, Task, Vehicle};
use pd_planner::search::{AcceptancePolicy, SearchConfig, SearchDriver};
use pd_planner::{build_plan, export, extend_plan, marginal_cost, optimize, PlanError};

const A: usize = 0;
const B: usize = 1;
const C: usize = 2;

fn abc() -> DistanceMatrix {
    DistanceMatrix::from_data(3, vec![0.0, 4.0, 6.0, 4.0, 0.0, 3.0, 6.0, 3.0, 0.0])
        .expect("valid matrix")
}

fn fleet() -> Vec<Vehicle> {
    vec![
        Vehicle::new(1, 10, A).with_cost_per_km(5.0),
        Vehicle::new(2, 20, A).with_cost_per_km(3.0),
    ]
}

fn tasks() -> Vec<Task> {
    vec![
        Task::new(1, A, B, 5).with_reward(100.0),
        Task::new(2, B, C, 8).with_reward(50.0),
    ]
}

/// V2 carries both tasks in order: A -> B -> C.
fn baseline_cost() -> f64 {
    (4.0 + 3.0) * 3.0
}

#[test]
fn seed_puts_heavier_task_on_large_vehicle() {
    let dm = abc();
    let seed = Planning::initial(&fleet(), &tasks(), &dm).expect("feasible");
    assert!(seed.schedule_of(2).expect("V2").contains_task(2));
    assert!(!seed.schedule_of(1).expect("V1").contains_task(2));
    assert!(seed.validate(&dm).is_ok());
    assert_eq!(seed.total_reward(), 150.0);
}

#[test]
fn greedy_optimize_beats_single_vehicle_baseline() {
    let dm = abc();
    let seed = Planning::initial(&fleet(), &tasks(), &dm).expect("feasible");
    let config = SearchConfig::default()
        .with_policy(AcceptancePolicy::Greedy)
        .with_max_iterations(100)
        .with_seed(1);
    let best = optimize(&seed, &dm, &config);

    assert!(best.cost() <= baseline_cost() + 1e-9);
    assert!(best.cost() <= seed.cost() + 1e-9);
    assert!(best.validate(&dm).is_ok());

    let plans = export(&best, &dm);
    assert_eq!(plans.len(), 2);
    for (plan, schedule) in plans.iter().zip(best.schedules()) {
        assert_eq!(plan.vehicle, schedule.vehicle().id());
        assert_eq!(plan.start, A);
        let mut delivered = plan.delivered();
        delivered.sort_unstable();
        let mut assigned: Vec<usize> = schedule.tasks().map(|t| t.id()).collect();
        assigned.sort_unstable();
        assert_eq!(delivered, assigned);
        if let Some(last) = plan.actions.last() {
            assert!(matches!(last, Action::Delivery(_)));
        }
    }
}

#[test]
fn every_policy_builds_a_valid_plan() {
    let dm = abc();
    for policy in ["greedy", "stochastic", "annealing"] {
        let config = SearchConfig::default()
            .with_policy(policy.parse().expect("known policy"))
            .with_max_iterations(150);
        let plan = build_plan(&fleet(), &tasks(), &dm, &config).expect("feasible");
        assert!(plan.validate(&dm).is_ok(), "{}", policy);
        assert_eq!(plan.num_tasks(), 2);
        assert!(plan.cost() <= baseline_cost() + 1e-9, "{}", policy);
    }
}

#[test]
fn overweight_task_is_infeasible() {
    let dm = abc();
    let mut heavy = tasks();
    heavy.push(Task::new(3, A, C, 25));
    let err = build_plan(&fleet(), &heavy, &dm, &SearchConfig::default())
        .expect_err("no vehicle carries 25");
    assert_eq!(
        err,
        PlanError::Infeasible {
            task: 3,
            weight: 25,
            max_capacity: 20
        }
    );
    assert!(err.is_infeasible());

    let seed = Planning::initial(&fleet(), &tasks(), &dm).expect("feasible");
    let err = extend_plan(&seed, Task::new(3, A, C, 25), &dm).expect_err("too heavy");
    assert!(err.is_infeasible());
    assert!(marginal_cost(&seed, Task::new(3, A, C, 25), &dm).is_err());
}

#[test]
fn empty_fleet_reports_no_vehicles() {
    let dm = abc();
    let err = build_plan(&[], &tasks(), &dm, &SearchConfig::default()).expect_err("no fleet");
    assert_eq!(err, PlanError::NoVehicles);
}

#[test]
fn duplicate_task_ids_are_rejected() {
    let dm = abc();
    let mut dup = tasks();
    dup.push(Task::new(1, B, A, 1));
    let err = build_plan(&fleet(), &dup, &dm, &SearchConfig::default()).expect_err("dup");
    assert_eq!(err, PlanError::DuplicateTask { task: 1 });
}

#[test]
fn bidding_round_trip() {
    // Price a task, "win" it, then refine the committed plan.
    let dm = abc();
    let config = SearchConfig::default().with_max_iterations(200).with_seed(3);
    let plan = build_plan(&fleet(), &tasks(), &dm, &config).expect("feasible");

    let offered = Task::new(3, C, A, 6).with_reward(40.0);
    let price = marginal_cost(&plan, offered, &dm).expect("fits");
    let extended = extend_plan(&plan, offered, &dm).expect("fits");
    assert!((extended.cost() - plan.cost() - price).abs() < 1e-9);
    assert_eq!(plan.num_tasks(), 2);
    assert_eq!(extended.num_tasks(), 3);

    let refined = optimize(&extended, &dm, &config);
    assert!(refined.cost() <= extended.cost() + 1e-9);
    assert!(refined.validate(&dm).is_ok());
    assert_eq!(refined.total_reward(), 190.0);
}

#[test]
fn road_network_plans_follow_roads() {
    // Lausanne(0) - Geneva(1), Lausanne - Bern(2), Bern - Zurich(3).
    let net = RoadNetwork::new(4, &[(0, 1, 62.0), (0, 2, 100.0), (2, 3, 120.0)])
        .expect("valid network");
    let vehicles = vec![Vehicle::new(0, 30, 1), Vehicle::new(1, 30, 3)];
    let tasks = vec![
        Task::new(10, 1, 3, 10),
        Task::new(11, 3, 0, 5),
        Task::new(12, 2, 1, 20),
    ];
    let config = SearchConfig::default().with_max_iterations(300).with_seed(9);
    let plan = build_plan(&vehicles, &tasks, &net, &config).expect("feasible");
    assert!(plan.validate(&net).is_ok());

    for (vp, schedule) in export(&plan, &net).iter().zip(plan.schedules()) {
        let mut at = vp.start;
        for action in &vp.actions {
            if let Action::Move(next) = *action {
                assert!(net.neighbors(at).contains(&next), "{} -> {}", at, next);
                at = next;
            }
        }
        assert!((vp.distance(&net) - schedule.length()).abs() < 1e-6);
    }
}

#[test]
fn disconnected_task_is_infeasible() {
    // Depot island {0, 1}, task island {2, 3}.
    let net = RoadNetwork::new(4, &[(0, 1, 5.0), (2, 3, 7.0)]).expect("valid network");
    let vehicles = vec![Vehicle::new(0, 10, 0), Vehicle::new(1, 10, 1)];
    let tasks = vec![Task::new(1, 0, 1, 2), Task::new(2, 2, 3, 3)];
    let err = build_plan(&vehicles, &tasks, &net, &SearchConfig::default())
        .expect_err("no vehicle reaches the task island");
    assert!(matches!(err, PlanError::Infeasible { task: 2, .. }));
    assert!(err.is_infeasible());

    let reachable = build_plan(&vehicles, &tasks[..1], &net, &SearchConfig::default())
        .expect("feasible");
    let err = extend_plan(&reachable, tasks[1], &net).expect_err("unreachable");
    assert!(matches!(err, PlanError::Infeasible { task: 2, .. }));
}

#[test]
fn unknown_cities_are_reported() {
    let dm = abc();
    let config = SearchConfig::default();
    for task in [Task::new(1, A, 7, 1), Task::new(1, C, 7, 1)] {
        let err = build_plan(&fleet(), &[task], &dm, &config).expect_err("city 7 is unknown");
        assert_eq!(
            err,
            PlanError::UnknownCity {
                city: 7,
                num_cities: 3
            }
        );
    }

    let plan = build_plan(&fleet(), &tasks(), &dm, &config).expect("feasible");
    assert!(matches!(
        marginal_cost(&plan, Task::new(9, 5, A, 1), &dm),
        Err(PlanError::UnknownCity { city: 5, .. })
    ));
}

#[test]
fn trace_exports_csv() {
    let dm = abc();
    let config = SearchConfig::default()
        .with_policy(AcceptancePolicy::Annealing)
        .with_max_iterations(50)
        .with_trace(true);
    let mut driver = SearchDriver::new(config);
    let seed = driver.seed(&fleet(), &tasks(), &dm).expect("feasible");
    let outcome = driver.run(seed, &dm);
    let trace = outcome.trace.expect("trace requested");

    let mut csv = Vec::new();
    trace.write_csv(&mut csv).expect("in-memory write");
    let text = String::from_utf8(csv).expect("utf8");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("round,vehicle,cost"));
    assert_eq!(lines.count(), trace.len());
    assert_eq!(trace.series(1).len(), outcome.accepted + 1);
}
