//! Curve parameters and the procedures that operate on the whole group:
//! sampling, enumeration, cardinality and generator search.

use std::fmt;
use std::sync::{Arc, OnceLock};

use log::debug;
use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand::Rng;

use dlog::{factor, order};

use crate::encoding;
use crate::point::Coordinates;
use crate::{field, Error, Point, Result};

/// Sampling bound for [`Curve::pick_generator`]. A cyclic group yields a
/// generator within a handful of attempts; exhausting the bound means the
/// group is almost certainly a non-cyclic product.
const GENERATOR_ATTEMPTS: usize = 256;

/// An elliptic curve `y² = x³ + a·x² + b·x + c` over `F_p`.
///
/// Coefficients are reduced to `[0, p)` at construction, which also
/// rejects composite moduli and singular equations. The handle is
/// cheap to clone; every [`Point`] carries one.
#[derive(Clone, Debug)]
pub struct Curve {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    a: BigUint,
    b: BigUint,
    c: BigUint,
    p: BigUint,
    cardinality: OnceLock<BigUint>,
}

impl Curve {
    /// Builds the curve, validating the field modulus and non-singularity.
    ///
    /// Fails with [`Error::NotPrime`] when `p ≤ 3` or composite, and with
    /// [`Error::SingularCurve`] when the discriminant vanishes modulo `p`.
    pub fn new(a: BigUint, b: BigUint, c: BigUint, p: BigUint) -> Result<Self> {
        if p <= BigUint::from(3u32) || !factor::is_prime(&p) {
            return Err(Error::NotPrime);
        }
        let a = a % &p;
        let b = b % &p;
        let c = c % &p;
        if discriminant(&a, &b, &c, &p).is_zero() {
            return Err(Error::SingularCurve);
        }
        Ok(Self {
            inner: Arc::new(Inner {
                a,
                b,
                c,
                p,
                cardinality: OnceLock::new(),
            }),
        })
    }

    /// The coefficient of `x²`.
    pub fn a(&self) -> &BigUint {
        &self.inner.a
    }

    /// The coefficient of `x`.
    pub fn b(&self) -> &BigUint {
        &self.inner.b
    }

    /// The constant coefficient.
    pub fn c(&self) -> &BigUint {
        &self.inner.c
    }

    /// The field modulus.
    pub fn prime(&self) -> &BigUint {
        &self.inner.p
    }

    /// The discriminant of the cubic, reduced modulo `p`.
    pub fn discriminant(&self) -> BigUint {
        discriminant(self.a(), self.b(), self.c(), self.prime())
    }

    /// The cached cardinality, if some caller has already computed it.
    pub fn cached_cardinality(&self) -> Option<&BigUint> {
        self.inner.cardinality.get()
    }

    /// The point at infinity of this curve.
    pub fn identity(&self) -> Point {
        Point::new_unchecked(self.clone(), Coordinates::Identity)
    }

    /// Whether `(x, y)` satisfies the curve equation.
    pub fn contains(&self, x: &BigUint, y: &BigUint) -> bool {
        let p = self.prime();
        field::mul(y, y, p) == self.rhs(x)
    }

    /// Validated construction of the affine point `(x, y)`.
    pub fn point(&self, x: BigUint, y: BigUint) -> Result<Point> {
        let x = x % self.prime();
        let y = y % self.prime();
        if !self.contains(&x, &y) {
            return Err(Error::NotOnCurve);
        }
        Ok(Point::new_unchecked(
            self.clone(),
            Coordinates::Affine { x, y },
        ))
    }

    /// `x³ + a·x² + b·x + c mod p`, by Horner's rule.
    pub(crate) fn rhs(&self, x: &BigUint) -> BigUint {
        let p = self.prime();
        let t = field::add(x, self.a(), p);
        let t = field::add(&field::mul(&t, x, p), self.b(), p);
        field::add(&field::mul(&t, x, p), self.c(), p)
    }

    /// A uniformly sampled affine point.
    ///
    /// Draws `x` until the right-hand side is a quadratic residue (about
    /// half of all abscissae qualify, so two attempts on average) and
    /// pairs it with one of the two roots. Which root comes back is an
    /// implementation detail.
    pub fn pick_point<R: Rng>(&self, rng: &mut R) -> Point {
        loop {
            let x = rng.gen_biguint_below(self.prime());
            match field::sqrt(&self.rhs(&x), self.prime()) {
                Ok((y, _)) => {
                    return Point::new_unchecked(self.clone(), Coordinates::Affine { x, y })
                }
                Err(_) => continue,
            }
        }
    }

    /// Iterator over every rational point: the identity first, then the
    /// affine points by ascending `x`.
    pub fn points(&self) -> Points {
        Points {
            curve: self.clone(),
            next_x: BigUint::zero(),
            second_root: None,
            identity_pending: true,
        }
    }

    /// All rational points as a vector, gated by the cardinality: the
    /// collection stops as soon as `#C` points have been emitted.
    pub fn enumerate_points<R: Rng>(&self, rng: &mut R) -> Result<Vec<Point>> {
        let n = self.cardinality(rng)?;
        let gate = n.to_usize().unwrap_or(usize::MAX);
        let mut points = Vec::new();
        for point in self.points() {
            points.push(point);
            if points.len() == gate {
                break;
            }
        }
        Ok(points)
    }

    /// The number of rational points `#C`, including the identity.
    ///
    /// Samples points, accumulates the least common multiple of their
    /// orders, and stops once the accumulator has exactly one multiple in
    /// the Hasse interval `[p + 1 − 2√p, p + 1 + 2√p]`; that multiple is
    /// `#C`. The result is cached on the curve; concurrent computations
    /// race benignly to publish the same value.
    pub fn cardinality<R: Rng>(&self, rng: &mut R) -> Result<BigUint> {
        self.cardinality_capped(rng, None)
    }

    /// [`Curve::cardinality`] with an optional bound on the number of
    /// sampled points, failing with [`Error::CardinalityNotDetermined`]
    /// on exhaustion.
    pub fn cardinality_capped<R: Rng>(
        &self,
        rng: &mut R,
        max_samples: Option<usize>,
    ) -> Result<BigUint> {
        if let Some(n) = self.inner.cardinality.get() {
            return Ok(n.clone());
        }

        let p = self.prime();
        let spread = (p * 4u32).sqrt();
        let lo = p + 1u32 - &spread;
        let hi = p + 1u32 + &spread;

        let mut accumulator = BigUint::one();
        let mut samples = 0usize;
        loop {
            if max_samples.is_some_and(|cap| samples >= cap) {
                return Err(Error::CardinalityNotDetermined);
            }
            samples += 1;

            let sample = self.pick_point(rng);
            let sample_order = order::order_in_window(self, &sample, &lo, &hi)?;
            accumulator = accumulator.lcm(&sample_order);

            // multiples of the accumulator inside the Hasse interval
            let first = lo.div_ceil(&accumulator);
            let last = &hi / &accumulator;
            debug!(
                "cardinality sample {samples}: order {sample_order}, lcm {accumulator}, \
                 {} candidate multiple(s)",
                &last - &first + 1u32
            );
            if first == last {
                let n = first * &accumulator;
                let _ = self.inner.cardinality.set(n.clone());
                return Ok(n);
            }
        }
    }

    /// Samples points until one generates the whole group.
    ///
    /// By Lagrange a sample generates with probability `ϕ(#C)/#C` when the
    /// group is cyclic; the bounded search fails with
    /// [`Error::NoGenerator`] otherwise (a product of two cyclic groups
    /// with a shared factor has no generator at all).
    pub fn pick_generator<R: Rng>(&self, rng: &mut R) -> Result<Point> {
        let n = self.cardinality(rng)?;
        for _ in 0..GENERATOR_ATTEMPTS {
            let candidate = self.pick_point(rng);
            if order::order_dividing(self, &candidate, &n)? == n {
                return Ok(candidate);
            }
        }
        Err(Error::NoGenerator)
    }
}

/// `18abc − 4a³c + a²b² − 4b³ − 27c²  (mod p)`.
fn discriminant(a: &BigUint, b: &BigUint, c: &BigUint, p: &BigUint) -> BigUint {
    let abc = field::mul(&field::mul(a, b, p), c, p);
    let a_sq_b_sq = field::mul(&field::mul(a, a, p), &field::mul(b, b, p), p);
    let a_cubed_c = field::mul(&field::mul(&field::mul(a, a, p), a, p), c, p);
    let b_cubed = field::mul(&field::mul(b, b, p), b, p);
    let c_sq = field::mul(c, c, p);

    let positive = field::add(&field::mul(&BigUint::from(18u32), &abc, p), &a_sq_b_sq, p);
    let negative = field::add(
        &field::add(
            &field::mul(&BigUint::from(4u32), &a_cubed_c, p),
            &field::mul(&BigUint::from(4u32), &b_cubed, p),
            p,
        ),
        &field::mul(&BigUint::from(27u32), &c_sq, p),
        p,
    );
    field::sub(&positive, &negative, p)
}

impl PartialEq for Curve {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.p == other.inner.p
                && self.inner.a == other.inner.a
                && self.inner.b == other.inner.b
                && self.inner.c == other.inner.c)
    }
}

impl Eq for Curve {}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "y^2==x^3+{}x^2+{}x+{} over F_{}",
            self.a(),
            self.b(),
            self.c(),
            self.prime()
        )
    }
}

/// Iterator over all rational points of a curve. See [`Curve::points`].
pub struct Points {
    curve: Curve,
    next_x: BigUint,
    second_root: Option<Point>,
    identity_pending: bool,
}

impl Iterator for Points {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.identity_pending {
            self.identity_pending = false;
            return Some(self.curve.identity());
        }
        if let Some(point) = self.second_root.take() {
            return Some(point);
        }
        while self.next_x < *self.curve.prime() {
            let x = self.next_x.clone();
            self.next_x += 1u32;
            if let Ok((r1, r2)) = field::sqrt(&self.curve.rhs(&x), self.curve.prime()) {
                if r1 != r2 {
                    self.second_root = Some(Point::new_unchecked(
                        self.curve.clone(),
                        Coordinates::Affine {
                            x: x.clone(),
                            y: r2,
                        },
                    ));
                }
                return Some(Point::new_unchecked(
                    self.curve.clone(),
                    Coordinates::Affine { x, y: r1 },
                ));
            }
        }
        None
    }
}

impl dlog::Group for Curve {
    type Element = Point;
    type Error = Error;

    fn identity(&self) -> Point {
        Curve::identity(self)
    }

    fn add(&self, a: &Point, b: &Point) -> Result<Point> {
        a.add(b)
    }

    fn neg(&self, a: &Point) -> Point {
        a.neg()
    }

    fn scalar_mul(&self, a: &Point, k: &BigInt) -> Result<Point> {
        a.mul_scalar(k)
    }

    fn encode(&self, a: &Point) -> Vec<u8> {
        encoding::point_bytes(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s1_curve() -> Curve {
        Curve::new(
            BigUint::zero(),
            BigUint::from(5u32),
            BigUint::from(2u32),
            BigUint::from(967u32),
        )
        .unwrap()
    }

    #[test]
    fn construction_validates_the_modulus() {
        let singular = Curve::new(
            BigUint::zero(),
            BigUint::zero(),
            BigUint::zero(),
            BigUint::from(967u32),
        );
        assert_eq!(singular.unwrap_err(), Error::SingularCurve);

        for p in [0u32, 1, 2, 3, 10, 967 * 3] {
            let composite = Curve::new(
                BigUint::zero(),
                BigUint::from(5u32),
                BigUint::from(2u32),
                BigUint::from(p),
            );
            assert_eq!(composite.unwrap_err(), Error::NotPrime, "p = {p}");
        }
    }

    #[test]
    fn coefficients_are_reduced() {
        let curve = Curve::new(
            BigUint::from(967u32),
            BigUint::from(5u32 + 967),
            BigUint::from(2u32),
            BigUint::from(967u32),
        )
        .unwrap();
        assert_eq!(curve.a(), &BigUint::zero());
        assert_eq!(curve.b(), &BigUint::from(5u32));
    }

    #[test]
    fn membership() {
        let curve = s1_curve();
        assert!(curve.contains(&BigUint::from(8u32), &BigUint::from(39u32)));
        assert!(!curve.contains(&BigUint::from(8u32), &BigUint::from(40u32)));
        assert_eq!(
            curve
                .point(BigUint::from(8u32), BigUint::from(40u32))
                .unwrap_err(),
            Error::NotOnCurve
        );
    }

    #[test]
    fn display_form() {
        assert_eq!(
            s1_curve().to_string(),
            "y^2==x^3+0x^2+5x+2 over F_967"
        );
    }

    #[test]
    fn equality_is_by_parameters() {
        let curve = s1_curve();
        assert_eq!(curve, curve.clone());
        assert_eq!(curve, s1_curve());
        let other = Curve::new(
            BigUint::zero(),
            BigUint::from(5u32),
            BigUint::from(3u32),
            BigUint::from(967u32),
        )
        .unwrap();
        assert_ne!(curve, other);
    }

    #[test]
    fn cardinality_cache_is_write_once() {
        use rand::SeedableRng;
        let curve = s1_curve();
        assert!(curve.cached_cardinality().is_none());

        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
        let n = curve.cardinality(&mut rng).unwrap();
        assert_eq!(n, BigUint::from(976u32));
        assert_eq!(curve.cached_cardinality(), Some(&n));

        // a second computation, even through a clone, reads the cache
        let mut rng2 = rand_chacha::ChaCha8Rng::seed_from_u64(99);
        assert_eq!(curve.clone().cardinality(&mut rng2).unwrap(), n);
    }
}
