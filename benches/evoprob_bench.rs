//! Criterion benchmarks for u-evoprob evaluation.
//!
//! Uses cheap synthetic analyses (Sphere function, masked single-response
//! sets) so the numbers measure dispatch overhead, not user code.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use u_evoprob::eval::{AnalysisDispatcher, EvalConfig, Evaluator};
use u_evoprob::schema::{AnalysisOutput, AnalysisSpec, ProblemSchema, SingleSet};
use u_evoprob::variable::VariableRange;

// ===========================================================================
// Sphere function: minimize sum(x_i^2), one constraint sum(x_i) >= 0
// ===========================================================================

fn sphere_schema(dim: usize) -> ProblemSchema {
    let ranges = vec![VariableRange::real(-5.0, 5.0).unwrap(); dim];
    let analysis = AnalysisSpec::composite(|x, _| {
        Ok(AnalysisOutput::new(
            vec![x.iter().map(|v| v * v).sum()],
            vec![x.iter().sum()],
        ))
    });
    ProblemSchema::builder(dim, 1, 1, ranges, analysis)
        .with_repair(|x, _| Ok(x.iter().map(|v| v.clamp(-5.0, 5.0)).collect()))
        .build()
        .unwrap()
}

// ===========================================================================
// Single-response set with half of the responses masked
// ===========================================================================

fn masked_schema(dim: usize, responses: usize) -> ProblemSchema {
    let mut set = SingleSet::new();
    let mut mask = Vec::with_capacity(responses);
    for i in 0..responses {
        if i % 2 == 0 {
            set = set.with_objective(i, move |x, _| Ok(x[i % x.len()] * i as f64));
            mask.push(0);
        } else {
            mask.push(1);
        }
    }
    let ranges = vec![VariableRange::integer(-100, 100).unwrap(); dim];
    ProblemSchema::builder(dim, responses, 0, ranges, set)
        .with_eval_mask(mask)
        .build()
        .unwrap()
}

fn bench_dispatch_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_sphere");

    for &dim in &[10, 100, 1000] {
        let schema = sphere_schema(dim);
        let x = schema.sample_candidate(&mut StdRng::seed_from_u64(42));
        group.bench_with_input(
            BenchmarkId::from_parameter(dim),
            &(schema, x),
            |b, (s, x)| {
                b.iter(|| {
                    let state = s.state(0, 0);
                    let result = AnalysisDispatcher::evaluate(black_box(s), black_box(x), &state);
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_dispatch_masked(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_masked");

    for &responses in &[4, 16, 64] {
        let schema = masked_schema(8, responses);
        let x = schema.sample_candidate(&mut StdRng::seed_from_u64(42));
        group.bench_with_input(
            BenchmarkId::from_parameter(responses),
            &(schema, x),
            |b, (s, x)| {
                b.iter(|| {
                    let state = s.state(0, 0);
                    let result = AnalysisDispatcher::evaluate(black_box(s), black_box(x), &state);
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_population(c: &mut Criterion) {
    let mut group = c.benchmark_group("population");
    group.sample_size(20);

    for &pop in &[50, 500] {
        let schema = sphere_schema(30);
        let mut rng = StdRng::seed_from_u64(42);
        let candidates: Vec<Vec<f64>> = (0..pop)
            .map(|_| schema.sample_candidate(&mut rng))
            .collect();
        for parallel in [false, true] {
            let config = EvalConfig::default().with_parallel(parallel);
            let id = format!("p{}_{}", pop, if parallel { "par" } else { "seq" });
            group.bench_with_input(
                BenchmarkId::new(id, pop),
                &(&schema, &candidates, config),
                |b, (s, cands, cfg)| {
                    b.iter(|| {
                        let results = Evaluator::evaluate_population(s, cands, 0, cfg);
                        black_box(results)
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_dispatch_sphere,
    bench_dispatch_masked,
    bench_population
);
criterion_main!(benches);
