use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use causallm_core::config::CiTestSelection;
use causallm_discovery::{ConditionalIndependenceTest, PcAlgorithm, PcConfig};
use test_fixtures::LinearSem;

/// Ten-variable chain with a few skip edges.
fn sem() -> LinearSem {
    let mut sem = LinearSem::new().root("x0", 1.0);
    for i in 1..10 {
        let prev = format!("x{}", i - 1);
        let mut parents = vec![(prev.as_str(), 0.7)];
        let skip = format!("x{}", i.saturating_sub(3));
        if i >= 3 && i % 3 == 0 {
            parents.push((skip.as_str(), 0.5));
        }
        sem = sem.node(&format!("x{i}"), &parents, 1.0);
    }
    sem
}

fn bench_pc(c: &mut Criterion) {
    let data = sem().sample(2000, 11);
    let variables = data.variables().to_vec();
    let mut group = c.benchmark_group("pc_10_vars");

    for parallel in [false, true] {
        let pc = PcAlgorithm::new(
            ConditionalIndependenceTest::new(CiTestSelection::PartialCorrelation),
            PcConfig {
                alpha: 0.01,
                max_conditioning_size: None,
                parallel,
            },
        );
        group.bench_with_input(
            BenchmarkId::from_parameter(if parallel { "parallel" } else { "sequential" }),
            &pc,
            |b, pc| b.iter(|| pc.discover(&data, &variables).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_pc);
criterion_main!(benches);
