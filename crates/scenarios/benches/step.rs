use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engine::{Action, Config};
use scenarios::{builtin_engine, BUILTIN_SCENARIOS};

fn bench_step(c: &mut Criterion) {
    let engine = builtin_engine();
    for name in BUILTIN_SCENARIOS {
        let action = match name {
            "pendulum" | "simple" => Action::Float(0.1),
            _ => Action::Int(1),
        };
        let Ok(mut env) = engine.create_environment(name, &Config::new(), 0) else {
            continue;
        };
        c.bench_function(&format!("{name}_step"), |b| {
            b.iter(|| {
                let result = env.step(black_box(std::slice::from_ref(&action))).unwrap();
                if result.is_done() {
                    env.reset(None).unwrap();
                }
            });
        });
    }
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
