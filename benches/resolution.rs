//! Benchmark: resolution cost (cache hit vs factory run)

use ambient_di::{Lifetime, Scope, define};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

struct BenchService {
	id: usize,
}

struct HeavyService {
	computed_value: u64,
}

fn benchmark_cache_hit(c: &mut Criterion) {
	let service = define(|| Ok(BenchService { id: 42 }), Lifetime::Scoped);
	let scope = Scope::labeled("bench");
	// Warm the cache so every measured call is a hit
	scope.inject(&service).unwrap();

	c.bench_function("cache_hit", |b| {
		b.iter(|| {
			let resolved = scope.inject(&service).unwrap();
			black_box(resolved.id)
		})
	});
}

fn benchmark_cache_miss(c: &mut Criterion) {
	let heavy = define(
		|| {
			let computed_value = (0..1000).fold(0u64, |acc, x| acc.wrapping_add(x));
			Ok(HeavyService { computed_value })
		},
		Lifetime::Scoped,
	);

	c.bench_function("cache_miss", |b| {
		b.iter(|| {
			// Fresh scope per iteration: every resolution runs the factory
			let scope = Scope::new();
			let resolved = scope.inject(&heavy).unwrap();
			black_box(resolved.computed_value)
		})
	});
}

fn benchmark_transient_production(c: &mut Criterion) {
	let service = define(|| Ok(BenchService { id: 7 }), Lifetime::Transient);
	let scope = Scope::labeled("bench");

	c.bench_function("transient_produce", |b| {
		b.iter(|| {
			let resolved = scope.inject(&service).unwrap();
			black_box(resolved.id)
		})
	});
}

criterion_group!(
	benches,
	benchmark_cache_hit,
	benchmark_cache_miss,
	benchmark_transient_production
);
criterion_main!(benches);
