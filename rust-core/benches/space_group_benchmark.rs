use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use symmetry_engine::groups::{ExpansionOptions, OperatorSet};
use symmetry_engine::operators::parse_xyz;
use symmetry_engine::settings::{identify, BasisChange};

/// Group generation from Hall symbols, from the smallest to the largest groups.
fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");

    for symbol in ["-P 2ybc", "-P 2ac 2n", "-P 6c 2c", "-I 4bd 2c 3", "-F 4 2 3"] {
        group.bench_function(symbol, |b| {
            b.iter(|| OperatorSet::from_hall(black_box(symbol)))
        });
    }

    group.finish();
}

/// Classification of single operators. The cache is bypassed by parsing fresh copies.
fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");

    for xyz in ["-x,y+1/2,-z", "-y,x-y,z+1/3", "y,-x,-z", "x+1/4,-y+1/4,z+1/4"] {
        group.bench_function(xyz, |b| {
            b.iter(|| {
                let op = parse_xyz(black_box(xyz)).unwrap();
                op.classify().map(|c| c.kind)
            })
        });
    }

    let set = OperatorSet::from_hall("-F 4 2 3").unwrap();
    group.bench_function("fm-3m_all_operators", |b| {
        b.iter(|| {
            let fresh = OperatorSet::from_operators(black_box(set.operators().to_vec()));
            fresh.classified().len()
        })
    });

    group.finish();
}

/// Setting transforms, including re-identification against the catalog.
fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");

    let p21c = OperatorSet::from_key("14").unwrap();
    let cyclic = BasisChange::parse("c,a,b").unwrap();
    group.bench_function("p21c_cyclic", |b| {
        b.iter(|| p21c.transformed(black_box(&cyclic)))
    });

    let fm3m = OperatorSet::from_key("225").unwrap();
    let primitive = BasisChange::parse("1/2b+1/2c,1/2a+1/2c,1/2a+1/2b").unwrap();
    group.bench_function("fm-3m_primitive", |b| {
        b.iter(|| fm3m.transformed(black_box(&primitive)))
    });

    group.bench_function("identify_pnma", |b| {
        let pnma = OperatorSet::from_hall("-P 2ac 2n").unwrap();
        b.iter(|| identify(black_box(&pnma)).map(|s| s.number()))
    });

    group.finish();
}

fn bench_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("expansion");

    let set = OperatorSet::from_hall("-P 2ac 2n").unwrap();
    let options = ExpansionOptions::default().with_range(2);
    group.bench_function("pnma_range_2", |b| {
        b.iter(|| set.expanded(black_box(&options)).len())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_generation,
    bench_classification,
    bench_transform,
    bench_expansion
);
criterion_main!(benches);
