// tests/scenarios.rs

mod common;

use common::{batch_names, init_tracing};
use passplan::graph::GraphBuilder;
use passplan::plan::{Planner, PlannerOptions, plan};
use passplan::schedule::{Binding, Instance, PassEvent};
use passplan::types::{PassId, PoolId, ResourceId, ReuseMode};
use passplan_test_utils::builders::{chain, fan_out, three_pass};

fn after_pass() -> Planner {
    Planner::new(PlannerOptions {
        reuse: ReuseMode::AfterPass,
        ..PlannerOptions::default()
    })
    .unwrap()
}

#[test]
fn test_three_pass_distinct_classes() {
    init_tracing();
    let graph = three_pass("hdr", "ldr");
    let schedule = plan(&graph).unwrap();

    assert_eq!(schedule.pools().len(), 2);
    assert!(schedule.pools().iter().all(|p| p.capacity == 1));
    assert_eq!(schedule.pools()[0].class, "hdr");
    assert_eq!(schedule.pools()[1].class, "ldr");

    assert_eq!(
        batch_names(&schedule),
        vec![vec!["Scene", "Background"], vec!["Final"]]
    );
    assert_eq!(schedule.order(), &[PassId(0), PassId(1), PassId(2)]);

    let final_pass = schedule.find_pass("Final").unwrap();
    assert!(final_pass.acquire.is_empty());
    assert_eq!(
        final_pass.release,
        vec![
            Binding {
                resource: ResourceId(0),
                instance: Instance::new(PoolId(0), 0),
            },
            Binding {
                resource: ResourceId(1),
                instance: Instance::new(PoolId(1), 0),
            },
        ]
    );
    assert_eq!(final_pass.inputs, final_pass.release);

    schedule.verify().unwrap();
}

#[test]
fn test_three_pass_shared_class_needs_two_instances() {
    init_tracing();
    let graph = three_pass("rgba8", "rgba8");
    let schedule = plan(&graph).unwrap();

    assert_eq!(schedule.pools().len(), 1);
    assert_eq!(schedule.pools()[0].capacity, 2);
    assert_eq!(
        batch_names(&schedule),
        vec![vec!["Scene", "Background"], vec!["Final"]]
    );

    let scene = schedule.find_pass("Scene").unwrap();
    let background = schedule.find_pass("Background").unwrap();
    assert_ne!(scene.acquire[0].instance, background.acquire[0].instance);

    schedule.verify().unwrap();
}

#[test]
fn test_chain_reuses_one_instance() {
    init_tracing();
    let graph = chain(&["A", "B", "C", "D"], "rgba8");
    let schedule = plan(&graph).unwrap();

    assert_eq!(schedule.pools().len(), 1);
    assert_eq!(schedule.pools()[0].capacity, 1);
    assert_eq!(
        batch_names(&schedule),
        vec![vec!["A"], vec!["B"], vec!["C"], vec!["D"]]
    );

    let slot0 = Instance::new(PoolId(0), 0);
    for name in ["A", "B", "C"] {
        assert_eq!(schedule.find_pass(name).unwrap().acquire[0].instance, slot0);
    }

    let b = schedule.find_pass("B").unwrap();
    assert!(b.is_handover(&b.release[0]));
    assert_eq!(
        b.events(),
        vec![
            PassEvent::Release(b.release[0]),
            PassEvent::Acquire(b.acquire[0]),
            PassEvent::Run,
        ]
    );

    let d = schedule.find_pass("D").unwrap();
    assert_eq!(
        d.events(),
        vec![PassEvent::Run, PassEvent::Release(d.release[0])]
    );

    schedule.verify().unwrap();
}

#[test]
fn test_chain_after_pass_alternates_two_instances() {
    init_tracing();
    let graph = chain(&["A", "B", "C", "D"], "rgba8");
    let schedule = after_pass().plan(&graph).unwrap();

    assert_eq!(schedule.reuse_mode(), ReuseMode::AfterPass);
    assert_eq!(schedule.pools()[0].capacity, 2);
    assert_eq!(schedule.batches().len(), 4);

    let slots: Vec<usize> = ["A", "B", "C"]
        .iter()
        .map(|n| schedule.find_pass(n).unwrap().acquire[0].instance.slot)
        .collect();
    assert_eq!(slots, vec![0, 1, 0]);

    let b = schedule.find_pass("B").unwrap();
    assert!(!b.is_handover(&b.release[0]));
    assert_eq!(b.events().last(), Some(&PassEvent::Release(b.release[0])));

    schedule.verify().unwrap();
}

#[test]
fn test_fan_out_runs_siblings_together() {
    init_tracing();
    let graph = fan_out("rgba8");
    let schedule = plan(&graph).unwrap();

    assert_eq!(schedule.pools()[0].capacity, 3);
    assert_eq!(
        batch_names(&schedule),
        vec![vec!["A"], vec!["B", "C"], vec!["D"]]
    );

    let a = schedule.find_pass("A").unwrap();
    let b = schedule.find_pass("B").unwrap();
    let c = schedule.find_pass("C").unwrap();
    let d = schedule.find_pass("D").unwrap();

    // The shared input is released by its last reader only, after it ran.
    assert!(b.release.is_empty());
    assert_eq!(c.release, a.acquire);
    assert!(!c.is_handover(&c.release[0]));

    // Siblings write to distinct instances, neither of them A's.
    let written = [b.acquire[0].instance, c.acquire[0].instance];
    assert_ne!(written[0], written[1]);
    assert!(!written.contains(&a.acquire[0].instance));

    let mut released: Vec<Instance> = d.release.iter().map(|b| b.instance).collect();
    released.sort();
    let mut expected = written.to_vec();
    expected.sort();
    assert_eq!(released, expected);

    schedule.verify().unwrap();
}

#[test]
fn test_handover_pairs_with_output_of_same_class() {
    init_tracing();
    let mut builder = GraphBuilder::new();
    let a = builder.pass("A").named_output("color", "a").finish();
    let b = builder
        .pass("B")
        .input(a.output(0))
        .named_output("mask", "b")
        .named_output("color2", "a")
        .finish();
    builder
        .pass("C")
        .input(b.output(0))
        .input(b.output(1))
        .finish();
    let graph = builder.build().unwrap();

    let schedule = plan(&graph).unwrap();
    assert!(schedule.pools().iter().all(|p| p.capacity == 1));

    let a = schedule.find_pass("A").unwrap();
    let b = schedule.find_pass("B").unwrap();
    assert!(b.is_handover(&b.release[0]));
    assert_eq!(b.acquire[1].instance, a.acquire[0].instance);
    assert_eq!(b.acquire[0].instance.pool, PoolId(1));

    schedule.verify().unwrap();
}

#[test]
fn test_order_prefers_passes_that_finish_resources() {
    init_tracing();
    let mut builder = GraphBuilder::new();
    let z = builder.pass("Z").output("c").finish();
    let p = builder.pass("P").output("c").finish();
    let x = builder.pass("X").input(p.output(0)).output("c").finish();
    let y = builder.pass("Y").input(p.output(0)).output("c").finish();
    builder
        .pass("S")
        .input(z.output(0))
        .input(x.output(0))
        .input(y.output(0))
        .finish();
    let graph = builder.build().unwrap();

    let schedule = plan(&graph).unwrap();
    let names: Vec<&str> = schedule
        .order()
        .iter()
        .map(|&id| graph.pass(id).name.as_str())
        .collect();
    assert_eq!(names, vec!["P", "X", "Y", "Z", "S"]);

    schedule.verify().unwrap();
}

#[test]
fn test_forward_references_resolve() {
    init_tracing();
    let mut builder: GraphBuilder<&str> = GraphBuilder::new();
    builder
        .pass("Final")
        .input(passplan::graph::ResourceRef::new(1, 0))
        .finish();
    builder.pass("Scene").output("hdr").finish();
    let graph = builder.build().unwrap();

    let schedule = plan(&graph).unwrap();
    assert_eq!(batch_names(&schedule), vec![vec!["Scene"], vec!["Final"]]);
}

#[test]
fn test_single_sink_only_graph() {
    init_tracing();
    let mut builder: GraphBuilder<&str> = GraphBuilder::new();
    builder.pass("Only").finish();
    let graph = builder.build().unwrap();

    let schedule = plan(&graph).unwrap();
    assert!(schedule.pools().is_empty());
    assert_eq!(batch_names(&schedule), vec![vec!["Only"]]);
    assert_eq!(schedule.sink().unwrap().name, "Only");
    schedule.verify().unwrap();
}

#[test]
fn test_planning_is_deterministic() {
    init_tracing();
    let graph = fan_out("rgba8");
    let first = plan(&graph).unwrap();
    let second = plan(&graph.clone()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), graph.fingerprint());
}

#[test]
fn test_dump_lists_pools_and_batches() {
    init_tracing();
    let schedule = plan(&three_pass("hdr", "ldr")).unwrap();
    let dump = schedule.to_string();

    assert!(dump.starts_with("schedule "));
    assert!(dump.contains("3 passes, 2 batches, 2 pools"));
    assert!(dump.contains("p0 \"hdr\" capacity 1"));
    assert!(dump.contains("batch 1:"));
    assert!(dump.contains("#2 Final  acquire []  release [p0:0, p1:0]"));
}

#[test]
fn test_unread_output_is_held_but_never_released() {
    init_tracing();
    let mut builder = GraphBuilder::new();
    let a = builder
        .pass("A")
        .named_output("used", "c")
        .named_output("dead", "c")
        .finish();
    builder.pass("S").input(a.output(0)).finish();
    let graph = builder.build().unwrap();

    let schedule = plan(&graph).unwrap();
    assert_eq!(schedule.pools()[0].capacity, 2);
    assert_eq!(batch_names(&schedule), vec![vec!["A"], vec!["S"]]);

    let a = schedule.find_pass("A").unwrap();
    let dead = a.acquire[1];
    assert_eq!(dead.resource, ResourceId(1));
    assert_eq!(dead.instance, Instance::new(PoolId(0), 1));

    let s = schedule.find_pass("S").unwrap();
    assert_eq!(s.release, vec![a.acquire[0]]);
    assert!(
        schedule
            .passes()
            .all(|p| p.release.iter().all(|b| b.resource != dead.resource))
    );

    schedule.verify().unwrap();
}
