// tests/error_handling.rs

mod common;

use common::{graph_file, init_tracing};
use passplan::config::load_and_validate;
use passplan::errors::PlanError;
use passplan::graph::{GraphBuilder, ResourceRef};
use passplan::plan::{Planner, PlannerOptions, plan};

#[test]
fn test_no_sink_is_rejected() {
    init_tracing();
    let mut builder = GraphBuilder::new();
    let a = builder.pass("A").output("c").finish();
    // Every pass declares an output.
    builder.pass("B").input(a.output(0)).output("c").finish();
    let graph = builder.build().unwrap();

    match plan(&graph) {
        Err(PlanError::NoSink) => {}
        other => panic!("Expected NoSink, got: {:?}", other),
    }
}

#[test]
fn test_empty_graph_has_no_sink() {
    init_tracing();
    let graph = GraphBuilder::<&str>::new().build().unwrap();
    assert!(matches!(plan(&graph), Err(PlanError::NoSink)));
}

#[test]
fn test_multiple_sinks_are_rejected() {
    init_tracing();
    let mut builder = GraphBuilder::new();
    let a = builder.pass("A").output("c").finish();
    builder.pass("Left").input(a.output(0)).finish();
    builder.pass("Right").input(a.output(0)).finish();
    let graph = builder.build().unwrap();

    match plan(&graph) {
        Err(PlanError::MultipleSinks { passes }) => {
            assert_eq!(passes, vec!["Left", "Right"]);
        }
        other => panic!("Expected MultipleSinks, got: {:?}", other),
    }
}

#[test]
fn test_cycle_is_rejected() {
    init_tracing();
    let mut builder = GraphBuilder::new();
    // A <-> B, and B also feeds the sink.
    builder
        .pass("A")
        .input(ResourceRef::new(1, 0))
        .output("c")
        .finish();
    let b = builder
        .pass("B")
        .input(ResourceRef::new(0, 0))
        .output("c")
        .output("c")
        .finish();
    builder.pass("Sink").input(b.output(1)).finish();
    let graph = builder.build().unwrap();

    match plan(&graph) {
        Err(PlanError::DependencyCycle(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains('A') || msg.contains('B'));
        }
        other => panic!("Expected DependencyCycle, got: {:?}", other),
    }
}

#[test]
fn test_pass_bypassing_sink_is_rejected() {
    init_tracing();
    let mut builder = GraphBuilder::new();
    let a = builder.pass("A").output("c").finish();
    builder.pass("Orphan").output("c").finish();
    builder.pass("Sink").input(a.output(0)).finish();
    let graph = builder.build().unwrap();

    match plan(&graph) {
        Err(PlanError::DisconnectedPass { pass }) => assert_eq!(pass, "Orphan"),
        other => panic!("Expected DisconnectedPass, got: {:?}", other),
    }
}

#[test]
fn test_bad_references_fail_at_build() {
    init_tracing();

    let mut builder: GraphBuilder<&str> = GraphBuilder::new();
    builder.pass("A").input(ResourceRef::new(7, 0)).finish();
    assert!(matches!(
        builder.build(),
        Err(PlanError::UnknownPass { referenced: 7, .. })
    ));

    let mut builder = GraphBuilder::new();
    let a = builder.pass("A").output("c").finish();
    builder.pass("B").input(a.output(3)).finish();
    match builder.build() {
        Err(PlanError::UnknownOutput {
            pass,
            producer,
            output,
        }) => {
            assert_eq!(pass, "B");
            assert_eq!(producer, "A");
            assert_eq!(output, 3);
        }
        other => panic!("Expected UnknownOutput, got: {:?}", other),
    }

    let mut builder = GraphBuilder::new();
    let a = builder.pass("A").named_output("color", "c").finish();
    builder
        .pass("B")
        .input(a.output(0))
        .input(a.output(0))
        .finish();
    match builder.build() {
        Err(PlanError::DuplicateInput { pass, resource }) => {
            assert_eq!(pass, "B");
            assert_eq!(resource, "A.color");
        }
        other => panic!("Expected DuplicateInput, got: {:?}", other),
    }
}

#[test]
fn test_negative_tie_epsilon_is_config_error() {
    let options = PlannerOptions {
        tie_epsilon: -1.0,
        ..PlannerOptions::default()
    };
    assert!(matches!(Planner::new(options), Err(PlanError::ConfigError(_))));

    let options = PlannerOptions {
        tie_epsilon: f64::NAN,
        ..PlannerOptions::default()
    };
    assert!(matches!(Planner::new(options), Err(PlanError::ConfigError(_))));
}

#[test]
fn test_file_cycle_returns_structured_error() {
    init_tracing();
    let file = graph_file(
        r#"
[[pass]]
name = "A"
inputs = ["B.out"]
outputs = [{ name = "out", class = "rgba8" }]

[[pass]]
name = "B"
inputs = ["A.out"]
outputs = [{ name = "out", class = "rgba8" }, { name = "extra", class = "rgba8" }]

[[pass]]
name = "Final"
inputs = ["B.extra"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(PlanError::DependencyCycle(msg)) => {
            assert!(msg.contains("cycle detected"));
        }
        Err(e) => panic!("Expected DependencyCycle error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_file_unknown_input_returns_config_error() {
    init_tracing();
    let file = graph_file(
        r#"
[[pass]]
name = "Final"
inputs = ["Scene.color"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(PlanError::ConfigError(msg)) => {
            assert!(msg.contains("unknown input"));
            assert!(msg.contains("Scene.color"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_file_duplicate_pass_name_returns_config_error() {
    init_tracing();
    let file = graph_file(
        r#"
[[pass]]
name = "Scene"
outputs = [{ name = "color", class = "hdr" }]

[[pass]]
name = "Scene"
inputs = ["Scene.color"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(PlanError::ConfigError(msg)) => assert!(msg.contains("more than once")),
        other => panic!("Expected ConfigError, got: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_file_invalid_name_returns_config_error() {
    init_tracing();
    let file = graph_file(
        r#"
[[pass]]
name = "has space"
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(PlanError::ConfigError(_))
    ));
}

#[test]
fn test_file_without_passes_returns_config_error() {
    init_tracing();
    let file = graph_file("[planner]\ntie_epsilon = 0.0\n");

    match load_and_validate(file.path()) {
        Err(PlanError::ConfigError(msg)) => assert!(msg.contains("at least one")),
        other => panic!("Expected ConfigError, got: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_file_unknown_key_returns_toml_error() {
    init_tracing();
    let file = graph_file(
        r#"
[[pass]]
name = "Final"
command = "nope"
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(PlanError::TomlError(_))
    ));
}

#[test]
fn test_missing_file_returns_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    assert!(matches!(
        load_and_validate(&path),
        Err(PlanError::IoError(_))
    ));
}
