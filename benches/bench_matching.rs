use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use graphgrammar::{
    Derivation, Edge, ExoticGraph, Grammar, Graph, IdPoolConfig, Labels, MatchContext, Rule,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

const GRAPH_SEED: u64 = 0x6A11;
const DERIVE_SEED: u64 = 0x7B22;
const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_millis(300);
const MEASURE: Duration = Duration::from_millis(500);
const SYMBOLS: [&str; 4] = ["A", "B", "C", "S"];

fn bench_scales() -> [usize; 3] {
    [100, 1_000, 5_000]
}

/// Random graph with about `2 * nodes` edges and symbols drawn from [`SYMBOLS`].
fn random_graph(nodes: usize, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::new();
    for id in 0..nodes as u64 {
        graph.add_symbol_node(id, SYMBOLS[rng.gen_range(0..SYMBOLS.len())]);
    }
    for _ in 0..nodes * 2 {
        let start = rng.gen_range(0..nodes as u64);
        let end = rng.gen_range(0..nodes as u64);
        if start != end {
            graph.add_edge(Edge::with_symbol(start, end, "")).expect("endpoints exist");
        }
    }
    graph
}

/// anchor x -> b(B) -> anchor y
fn anchor_pattern() -> ExoticGraph {
    let mut pattern = ExoticGraph::anchor();
    pattern.add_symbol_node("b", "B");
    pattern.add_exotic_node("x", Labels::new());
    pattern.add_exotic_node("y", Labels::new());
    pattern.add_edge(Edge::with_symbol("x", "b", "")).expect("x -> b");
    pattern.add_edge(Edge::with_symbol("b", "y", "")).expect("b -> y");
    pattern
}

/// wildcard v, w -> a(A) -> c(C)
fn wildcard_pattern() -> ExoticGraph {
    let mut pattern = ExoticGraph::wildcard();
    pattern.add_symbol_node("a", "A");
    pattern.add_symbol_node("c", "C");
    pattern.add_exotic_node("v", Labels::new());
    pattern.add_exotic_node("w", Labels::new());
    pattern.add_edge(Edge::with_symbol("v", "a", "")).expect("v -> a");
    pattern.add_edge(Edge::with_symbol("w", "a", "")).expect("w -> a");
    pattern.add_edge(Edge::with_symbol("a", "c", "")).expect("a -> c");
    pattern
}

fn tree_grammar() -> Grammar {
    let mut grammar = Grammar::new();
    grammar.define_terminal_symbol("t").expect("terminal");
    grammar.define_start_symbol("S", Labels::new()).expect("start");

    let mut grow = Graph::new();
    grow.add_symbol_node("base", "t");
    grow.add_symbol_node("left", "S");
    grow.add_symbol_node("right", "S");
    grow.add_edge(Edge::with_symbol("base", "left", "")).expect("base -> left");
    grow.add_edge(Edge::with_symbol("base", "right", "")).expect("base -> right");
    grammar
        .add_rule(Rule::context_free("grow", "S", grow).expect("grow"))
        .expect("add grow");

    let mut stop = Graph::new();
    stop.add_symbol_node("base", "t");
    grammar
        .add_rule(Rule::context_free("stop", "S", stop).expect("stop"))
        .expect("add stop");
    grammar
}

fn bench_context_free(c: &mut Criterion) {
    let grammar = tree_grammar();
    let rule = grammar.rule("grow").expect("grow");
    let mut group = c.benchmark_group("context_free_matches");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for nodes in bench_scales() {
        let graph = random_graph(nodes, GRAPH_SEED);
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &graph, |b, graph| {
            b.iter(|| rule.find_matches(graph));
        });
    }
    group.finish();
}

fn bench_exotic(c: &mut Criterion) {
    let patterns = [("anchor", anchor_pattern()), ("wildcard", wildcard_pattern())];
    let mut group = c.benchmark_group("exotic_matches");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for nodes in bench_scales() {
        let graph = random_graph(nodes, GRAPH_SEED);
        for (label, pattern) in &patterns {
            group.bench_with_input(BenchmarkId::new(*label, nodes), &graph, |b, graph| {
                b.iter(|| pattern.find_matches(graph));
            });
        }
        let ctx = MatchContext::new(&graph);
        group.bench_with_input(BenchmarkId::new("shared_context", nodes), &ctx, |b, ctx| {
            b.iter(|| {
                patterns
                    .iter()
                    .map(|(_, pattern)| pattern.find_matches_in(ctx).len())
                    .sum::<usize>()
            });
        });
    }
    group.finish();
}

fn bench_derivation(c: &mut Criterion) {
    let grammar = tree_grammar();
    let mut group = c.benchmark_group("derivation");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for steps in [16usize, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, &steps| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(DERIVE_SEED);
                let mut derivation =
                    Derivation::new(grammar.clone(), IdPoolConfig::default()).expect("derivation");
                for step in 0..steps {
                    let applicable = derivation.get_applicable_rule();
                    let name = if step + 1 < steps { "grow" } else { "stop" };
                    let Some(matches) = applicable.get(name) else { break };
                    let found = &matches[rng.gen_range(0..matches.len())];
                    derivation.apply_rule(name, found).expect("apply");
                }
                derivation.graph().node_count()
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = matching_benches;
    config = Criterion::default();
    targets = bench_context_free, bench_exotic, bench_derivation
);
criterion_main!(matching_benches);
