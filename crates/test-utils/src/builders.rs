#![allow(dead_code)]

use std::collections::HashSet;

use passplan::graph::{GraphBuilder, GraphModel, PassHandle, ResourceRef};

/// "Scene" and "Background" each produce one resource, "Final" consumes
/// both and produces nothing.
pub fn three_pass(scene_class: &'static str, background_class: &'static str) -> GraphModel<&'static str> {
    let mut builder = GraphBuilder::new();
    let scene = builder.pass("Scene").named_output("R0", scene_class).finish();
    let background = builder
        .pass("Background")
        .named_output("R1", background_class)
        .finish();
    builder
        .pass("Final")
        .input(scene.output(0))
        .input(background.output(0))
        .finish();
    builder.build().expect("three-pass graph should build")
}

/// Linear chain over `names`: each pass consumes its predecessor's single
/// output. The last pass is the sink.
pub fn chain(names: &[&str], class: &'static str) -> GraphModel<&'static str> {
    let mut builder = GraphBuilder::new();
    let mut prev: Option<PassHandle> = None;

    for (i, name) in names.iter().enumerate() {
        let mut decl = builder.pass(*name);
        if let Some(handle) = prev {
            decl = decl.input(handle.output(0));
        }
        if i + 1 < names.len() {
            decl = decl.output(class);
        }
        prev = Some(decl.finish());
    }

    builder.build().expect("chain graph should build")
}

/// `A` feeds both `B` and `C`, which both feed `D`.
pub fn fan_out(class: &'static str) -> GraphModel<&'static str> {
    let mut builder = GraphBuilder::new();
    let a = builder.pass("A").output(class).finish();
    let b = builder.pass("B").input(a.output(0)).output(class).finish();
    let c = builder.pass("C").input(a.output(0)).output(class).finish();
    builder
        .pass("D")
        .input(b.output(0))
        .input(c.output(0))
        .finish();
    builder.build().expect("fan-out graph should build")
}

/// Build a random single-sink graph.
///
/// - `outputs[i]` lists the classes of pass `i`'s outputs (empty lists are
///   bumped to one output of class 0).
/// - `picks[i]` are raw `(pass, output)` indices; pass `i` only ever reads
///   from passes `< i`, so the graph is acyclic.
/// - `unread[i]` leaves pass `i`'s last output without any consumer, as
///   long as the pass still feeds something else.
///
/// A final `sink` pass consumes every other resource nobody reads, which
/// makes every pass feed the sink.
pub fn random_dag(
    outputs: &[Vec<u8>],
    picks: &[Vec<(usize, usize)>],
    unread: &[bool],
) -> GraphModel<u8> {
    let outputs: Vec<Vec<u8>> = outputs
        .iter()
        .map(|o| if o.is_empty() { vec![0] } else { o.clone() })
        .collect();

    let mut builder = GraphBuilder::new();
    let mut consumed: HashSet<(usize, usize)> = HashSet::new();

    for (i, classes) in outputs.iter().enumerate() {
        let mut decl = builder.pass(format!("pass_{i}"));

        if i > 0 {
            let mut seen = HashSet::new();
            for &(p, o) in picks.get(i).map(Vec::as_slice).unwrap_or(&[]) {
                let p = p % i;
                let o = o % outputs[p].len();
                if seen.insert((p, o)) {
                    consumed.insert((p, o));
                    decl = decl.input(ResourceRef::new(p, o));
                }
            }
        }

        for &class in classes {
            decl = decl.output(class);
        }
        decl.finish();
    }

    let mut sink = builder.pass("sink");
    for (p, classes) in outputs.iter().enumerate() {
        let mut left: Vec<usize> = (0..classes.len())
            .filter(|&o| !consumed.contains(&(p, o)))
            .collect();

        let last = classes.len() - 1;
        let feeds_elsewhere = left.len() < classes.len();
        if unread.get(p).copied().unwrap_or(false)
            && left.last() == Some(&last)
            && (feeds_elsewhere || left.len() > 1)
        {
            left.pop();
        }

        for o in left {
            sink = sink.input(ResourceRef::new(p, o));
        }
    }
    sink.finish();

    builder.build().expect("random graph should build")
}
