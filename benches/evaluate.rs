use criterion::{black_box, criterion_group, criterion_main, Criterion};
use guardrail::{Compiler, Conditional, Record, RuleSpec};

/// Build a conditional with `n` guard rules and `n` consequence rules, plus a
/// record every guard rule accepts.
fn build_scenario(n: usize) -> (Conditional, Record) {
    let mut builder = Conditional::builder();
    let mut record = Record::new("Profile");

    for i in 0..n {
        let guard_field = format!("g{i}");
        let then_field = format!("t{i}");
        builder = builder
            .when(RuleSpec::new(guard_field.as_str(), "compare").option("value", 1_i64))
            .then(RuleSpec::new(then_field.as_str(), "length").option("max", 8_i64));
        record = record.set(&guard_field, 1_i64).set(&then_field, "short");
    }

    (builder.build(), record)
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");

    for &n in &[5, 20, 50] {
        let (conditional, record) = build_scenario(n);

        // Cold: a fresh compiler per iteration pays construction every time.
        group.bench_function(format!("{n}_rules_cold"), |b| {
            b.iter(|| {
                let compiler = Compiler::new();
                let mut target = record.clone();
                conditional
                    .validate(black_box(&mut target), &compiler)
                    .unwrap();
            });
        });

        // Warm: one session compiler, so repeated evaluation hits the cache.
        let compiler = Compiler::new();
        group.bench_function(format!("{n}_rules_warm"), |b| {
            b.iter(|| {
                let mut target = record.clone();
                conditional
                    .validate(black_box(&mut target), &compiler)
                    .unwrap();
            });
        });
    }

    group.finish();
}

fn bench_synthesize(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesize");

    for &n in &[5, 20, 50] {
        let (conditional, record) = build_scenario(n);
        let compiler = Compiler::new();

        group.bench_function(format!("{n}_rules"), |b| {
            b.iter(|| {
                conditional
                    .client_script(black_box(&record), "t0", &compiler)
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_validate, bench_synthesize);
criterion_main!(benches);
