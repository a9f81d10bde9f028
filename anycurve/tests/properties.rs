//! Quantified properties of the group law, scalar arithmetic, the
//! enumeration and the encodings, checked with proptest-driven scalars
//! on the F_25169 curve (whose x² coefficient is non-zero).

use std::collections::HashSet;

use anycurve::{encoding, Curve, Point};
use num_bigint::{BigInt, BigUint};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn medium_curve() -> Curve {
    Curve::new(
        BigUint::from(1u32),
        BigUint::from(2u32),
        BigUint::from(300u32),
        BigUint::from(25_169u32),
    )
    .unwrap()
}

fn base_point(curve: &Curve) -> Point {
    curve
        .point(BigUint::from(11u32), BigUint::from(10_156u32))
        .unwrap()
}

proptest! {
    #[test]
    fn group_axioms(j in 0i64..5_000, k in 0i64..5_000, l in 0i64..5_000) {
        let curve = medium_curve();
        let g = base_point(&curve);
        let p = g.mul_scalar(&BigInt::from(j)).unwrap();
        let q = g.mul_scalar(&BigInt::from(k)).unwrap();
        let r = g.mul_scalar(&BigInt::from(l)).unwrap();

        // commutativity and associativity
        prop_assert_eq!(p.add(&q).unwrap(), q.add(&p).unwrap());
        prop_assert_eq!(
            p.add(&q).unwrap().add(&r).unwrap(),
            p.add(&q.add(&r).unwrap()).unwrap()
        );

        // neutral element and inverses
        prop_assert_eq!(p.add(&curve.identity()).unwrap(), p.clone());
        prop_assert!(p.add(&p.neg()).unwrap().is_identity());

        // closure
        let sum = p.add(&q).unwrap();
        if let (Some(x), Some(y)) = (sum.x(), sum.y()) {
            prop_assert!(curve.contains(x, y));
        }
    }

    #[test]
    fn scalar_consistency(j in -2_000i64..2_000, k in -2_000i64..2_000) {
        let curve = medium_curve();
        let p = base_point(&curve);

        let j_plus_k = p.mul_scalar(&BigInt::from(j + k)).unwrap();
        let split = p
            .mul_scalar(&BigInt::from(j))
            .unwrap()
            .add(&p.mul_scalar(&BigInt::from(k)).unwrap())
            .unwrap();
        prop_assert_eq!(j_plus_k, split);

        let nested = p
            .mul_scalar(&BigInt::from(k))
            .unwrap()
            .mul_scalar(&BigInt::from(j))
            .unwrap();
        let product = p.mul_scalar(&BigInt::from(j * k)).unwrap();
        prop_assert_eq!(nested, product);
    }

    #[test]
    fn unit_scalars(k in 1i64..5_000) {
        let curve = medium_curve();
        let p = base_point(&curve)
            .mul_scalar(&BigInt::from(k))
            .unwrap();

        prop_assert_eq!(p.mul_scalar(&BigInt::from(1)).unwrap(), p.clone());
        prop_assert!(p.mul_scalar(&BigInt::from(0)).unwrap().is_identity());
        prop_assert_eq!(p.mul_scalar(&BigInt::from(-1)).unwrap(), p.neg());
    }

    #[test]
    fn encoding_round_trip(k in 0i64..25_136) {
        let curve = medium_curve();
        let p = base_point(&curve).mul_scalar(&BigInt::from(k)).unwrap();
        let bytes = encoding::point_bytes(&p);
        prop_assert_eq!(encoding::parse_point(&curve, &bytes).unwrap(), p);
    }
}

#[test]
fn enumeration_is_complete_and_unique() {
    let curve = Curve::new(
        BigUint::from(0u32),
        BigUint::from(5u32),
        BigUint::from(2u32),
        BigUint::from(967u32),
    )
    .unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(21);

    let n = curve.cardinality(&mut rng).unwrap();
    let points = curve.enumerate_points(&mut rng).unwrap();
    assert_eq!(BigUint::from(points.len()), n);

    let mut seen = HashSet::new();
    for point in &points {
        assert!(seen.insert(encoding::point_bytes(point)), "duplicate {point}");
        if let (Some(x), Some(y)) = (point.x(), point.y()) {
            assert!(curve.contains(x, y));
        } else {
            assert!(point.is_identity());
        }
    }
}

#[test]
fn every_point_order_divides_the_cardinality() {
    use num_integer::Integer;

    let curve = medium_curve();
    let mut rng = ChaCha8Rng::seed_from_u64(22);
    let n = curve.cardinality(&mut rng).unwrap();

    for _ in 0..4 {
        let point = curve.pick_point(&mut rng);
        let order = point.compute_order(&mut rng).unwrap();
        assert!(n.is_multiple_of(&order), "{order} divides {n}");
    }
}

#[test]
fn identity_encoding_is_distinguished() {
    let curve = medium_curve();
    let identity_bytes = encoding::point_bytes(&curve.identity());
    for k in 1..64i64 {
        let p = base_point(&curve).mul_scalar(&BigInt::from(k)).unwrap();
        assert_ne!(encoding::point_bytes(&p), identity_bytes);
    }
}
