//! Solver timings across a ladder of growing field moduli, on the fixed
//! curve family y² = x³ + 2x + 5.

use std::hint::black_box;

use anycurve::dlog::{autoshanks, pohlig_hellman};
use anycurve::Curve;
use criterion::{criterion_group, criterion_main, Criterion};
use num_bigint::{BigInt, BigUint};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const PRIMES: [u64; 3] = [1_021, 16_381, 65_521];

fn bench_solvers(c: &mut Criterion) {
    for p in PRIMES {
        let curve = Curve::new(
            BigUint::from(0u32),
            BigUint::from(2u32),
            BigUint::from(5u32),
            BigUint::from(p),
        )
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let base = curve.pick_point(&mut rng);
        let order = base.compute_order(&mut rng).unwrap();
        let target = base.mul_scalar(&BigInt::from(77)).unwrap();

        c.bench_function(&format!("autoshanks/F_{p}"), |b| {
            b.iter(|| autoshanks(&curve, black_box(&base), black_box(&target), &order).unwrap())
        });
        c.bench_function(&format!("pohlig_hellman/F_{p}"), |b| {
            b.iter(|| {
                pohlig_hellman(&curve, black_box(&base), black_box(&target), &order).unwrap()
            })
        });
    }
}

criterion_group!(benches, bench_solvers);
criterion_main!(benches);
