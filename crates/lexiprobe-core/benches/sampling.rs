use std::collections::HashSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lexiprobe_core::leveler::{LevelerConfig, Session};
use lexiprobe_core::model::Grade;
use lexiprobe_core::sampler::{draw_sample, SeededShuffler};

fn words(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}{i}")).collect()
}

fn bench_draw_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_sample");
    let pool = words("w", 10_000);
    let used: HashSet<String> = pool[..2_000].iter().cloned().collect();

    group.bench_function("pool=10000,size=48", |b| {
        let mut shuffler = SeededShuffler::new(1);
        b.iter(|| draw_sample(black_box(&pool), black_box(&used), 48, &mut shuffler))
    });

    let dictionary = words("d", 300_000);
    group.bench_function("pool=300000,size=289", |b| {
        let mut shuffler = SeededShuffler::new(2);
        b.iter(|| draw_sample(black_box(&dictionary), &HashSet::new(), 289, &mut shuffler))
    });

    group.finish();
}

fn bench_full_session(c: &mut Criterion) {
    let tiers: Vec<Vec<String>> = (1..=4).map(|t| words(&format!("t{t}-"), 2_000)).collect();

    c.bench_function("session/all_mastered", |b| {
        b.iter(|| {
            let mut session = Session::start(
                tiers.clone(),
                LevelerConfig::default(),
                Box::new(SeededShuffler::new(3)),
            )
            .unwrap();
            while !session.is_done() {
                session.submit_answer(Grade::D);
            }
            session.final_tier()
        })
    });
}

criterion_group!(benches, bench_draw_sample, bench_full_session);
criterion_main!(benches);
