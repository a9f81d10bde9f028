//! Curve points and the chord-and-tangent group law.

use core::fmt;
use core::ops::Neg;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use rand::Rng;

use crate::{field, Curve, Error, Result};

/// The two shapes a rational point can take.
///
/// The identity is a first-class variant rather than a sentinel
/// coordinate pair, which keeps the group-law case split total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Coordinates {
    /// The point at infinity, neutral element of the group.
    Identity,
    /// An affine point `(x, y)` with both coordinates in `[0, p)`.
    Affine {
        /// x-coordinate
        x: BigUint,
        /// y-coordinate
        y: BigUint,
    },
}

/// A rational point of an elliptic curve.
///
/// Every point keeps a handle to its parent [`Curve`]; combining points of
/// two different curves fails with [`Error::MixedCurves`]. Points are
/// immutable; all operations produce new points.
#[derive(Clone, Debug)]
pub struct Point {
    curve: Curve,
    coordinates: Coordinates,
}

impl Point {
    pub(crate) fn new_unchecked(curve: Curve, coordinates: Coordinates) -> Self {
        Self { curve, coordinates }
    }

    /// The parent curve.
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// The coordinate variant.
    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    /// Whether this is the point at infinity.
    pub fn is_identity(&self) -> bool {
        matches!(self.coordinates, Coordinates::Identity)
    }

    /// The affine x-coordinate, `None` for the identity.
    pub fn x(&self) -> Option<&BigUint> {
        match &self.coordinates {
            Coordinates::Identity => None,
            Coordinates::Affine { x, .. } => Some(x),
        }
    }

    /// The affine y-coordinate, `None` for the identity.
    pub fn y(&self) -> Option<&BigUint> {
        match &self.coordinates {
            Coordinates::Identity => None,
            Coordinates::Affine { y, .. } => Some(y),
        }
    }

    /// The group law.
    ///
    /// The cases, in the order they are decided: either operand being the
    /// identity; a vertical chord (mutual inverses, including a doubling
    /// with zero ordinate, where the tangent is vertical); a doubling via
    /// the tangent slope; the generic chord.
    pub fn add(&self, other: &Point) -> Result<Point> {
        if self.curve != other.curve {
            return Err(Error::MixedCurves);
        }
        let p = self.curve.prime();

        let (x1, y1, x2, y2) = match (&self.coordinates, &other.coordinates) {
            (Coordinates::Identity, _) => return Ok(other.clone()),
            (_, Coordinates::Identity) => return Ok(self.clone()),
            (Coordinates::Affine { x: x1, y: y1 }, Coordinates::Affine { x: x2, y: y2 }) => {
                (x1, y1, x2, y2)
            }
        };

        if x1 == x2 && y1 != y2 {
            return Ok(self.curve.identity());
        }

        let slope = if x1 == x2 {
            if y1.is_zero() {
                return Ok(self.curve.identity());
            }
            // tangent: (3x² + 2ax + b) / 2y
            let two = BigUint::from(2u32);
            let three_x_sq = field::mul(&BigUint::from(3u32), &field::mul(x1, x1, p), p);
            let two_a_x = field::mul(&two, &field::mul(self.curve.a(), x1, p), p);
            let numerator = field::add(&field::add(&three_x_sq, &two_a_x, p), self.curve.b(), p);
            let denominator = field::mul(&two, y1, p);
            field::mul(&numerator, &field::inv(&denominator, p)?, p)
        } else {
            // chord: (y₂ − y₁) / (x₂ − x₁)
            let numerator = field::sub(y2, y1, p);
            let denominator = field::sub(x2, x1, p);
            field::mul(&numerator, &field::inv(&denominator, p)?, p)
        };

        // x₃ = m² − a − x₁ − x₂: the x² coefficient of the curve shows up
        // here, unlike in the short Weierstrass formula
        let m_sq = field::mul(&slope, &slope, p);
        let x3 = field::sub(
            &field::sub(&field::sub(&m_sq, self.curve.a(), p), x1, p),
            x2,
            p,
        );
        let y3 = field::sub(&field::mul(&slope, &field::sub(x1, &x3, p), p), y1, p);

        Ok(Point::new_unchecked(
            self.curve.clone(),
            Coordinates::Affine { x: x3, y: y3 },
        ))
    }

    /// `self − other`.
    pub fn sub(&self, other: &Point) -> Result<Point> {
        self.add(&other.neg())
    }

    /// The additive inverse: `−O = O`, `−(x, y) = (x, (−y) mod p)`.
    pub fn neg(&self) -> Point {
        let coordinates = match &self.coordinates {
            Coordinates::Identity => Coordinates::Identity,
            Coordinates::Affine { x, y } => Coordinates::Affine {
                x: x.clone(),
                y: field::neg(y, self.curve.prime()),
            },
        };
        Point::new_unchecked(self.curve.clone(), coordinates)
    }

    /// `k·self` for an arbitrary integer `k`, by the binary double-and-add
    /// ladder from the most significant bit; a negative `k` multiplies the
    /// negated point.
    pub fn mul_scalar(&self, k: &BigInt) -> Result<Point> {
        let base = if k.sign() == Sign::Minus {
            self.neg()
        } else {
            self.clone()
        };
        let magnitude = k.magnitude();

        let mut acc = self.curve.identity();
        for i in (0..magnitude.bits()).rev() {
            acc = acc.add(&acc)?;
            if magnitude.bit(i) {
                acc = acc.add(&base)?;
            }
        }
        Ok(acc)
    }

    /// The order of this point: the smallest positive `m` with
    /// `m·self = O`.
    ///
    /// Computes the curve cardinality first (sampling through `rng` if it
    /// is not cached yet) and walks its divisors in ascending order.
    pub fn compute_order<R: Rng>(&self, rng: &mut R) -> Result<BigUint> {
        let n = self.curve.cardinality(rng)?;
        Ok(dlog::order::order_dividing(&self.curve, self, &n)?)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.curve == other.curve && self.coordinates == other.coordinates
    }
}

impl Eq for Point {}

impl Neg for &Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::neg(self)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::neg(&self)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.coordinates {
            Coordinates::Identity => f.write_str("O"),
            Coordinates::Affine { x, y } => write!(f, "[{x}, {y}]"),
        }
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

    fn s3_curve() -> Curve {
        Curve::new(
            BigUint::from(1u32),
            BigUint::from(2u32),
            BigUint::from(300u32),
            BigUint::from(25_169u32),
        )
        .unwrap()
    }

    fn pt(curve: &Curve, x: u32, y: u32) -> Point {
        curve.point(BigUint::from(x), BigUint::from(y)).unwrap()
    }

    #[test]
    fn identity_laws() {
        let curve = s1_curve();
        let o = curve.identity();
        let p = pt(&curve, 8, 39);

        assert_eq!(o.add(&o).unwrap(), o);
        assert_eq!(o.clone().neg(), o);
        assert_eq!(o.mul_scalar(&BigInt::from(50)).unwrap(), o);
        assert_eq!(p.add(&o).unwrap(), p);
        assert_eq!(o.add(&p).unwrap(), p);
        assert_eq!(p.mul_scalar(&BigInt::from(0)).unwrap(), o);
        assert!(p.add(&p.clone().neg()).unwrap().is_identity());
    }

    #[test]
    fn quadratic_term_in_chord_and_tangent() {
        // a = 1 here, so dropping the −a term in x₃ would corrupt all of
        // these
        let curve = s3_curve();
        let p = pt(&curve, 11, 10_156);
        let q = pt(&curve, 15, 8_356);

        assert_eq!(p.add(&p).unwrap(), pt(&curve, 21_191, 7_715));
        assert_eq!(p.add(&q).unwrap(), pt(&curve, 1_121, 11_133));
        assert_eq!(
            p.mul_scalar(&BigInt::from(7)).unwrap(),
            pt(&curve, 2_550, 15_154)
        );
    }

    #[test]
    fn negative_scalars() {
        let curve = s3_curve();
        let p = pt(&curve, 11, 10_156);

        assert_eq!(
            p.mul_scalar(&BigInt::from(-3)).unwrap(),
            pt(&curve, 25_145, 24_735)
        );
        assert_eq!(
            p.mul_scalar(&BigInt::from(-1)).unwrap(),
            p.clone().neg()
        );
        // k·P + (−k)·P = O
        let k_p = p.mul_scalar(&BigInt::from(41)).unwrap();
        let minus_k_p = p.mul_scalar(&BigInt::from(-41)).unwrap();
        assert!(k_p.add(&minus_k_p).unwrap().is_identity());
    }

    #[test]
    fn doubling_with_zero_ordinate_is_vertical() {
        // y² = x³ + 7x over F_11 passes through (0, 0), a 2-torsion point
        let curve = Curve::new(
            BigUint::zero(),
            BigUint::from(7u32),
            BigUint::zero(),
            BigUint::from(11u32),
        )
        .unwrap();
        let two_torsion = pt(&curve, 0, 0);
        assert!(two_torsion.add(&two_torsion).unwrap().is_identity());
    }

    #[test]
    fn mixed_curves_are_rejected() {
        let p1 = pt(&s1_curve(), 8, 39);
        let p3 = pt(&s3_curve(), 11, 10_156);
        assert_eq!(p1.add(&p3), Err(Error::MixedCurves));
        assert_eq!(p1.sub(&p3), Err(Error::MixedCurves));
    }

    #[test]
    fn vertical_chord_yields_identity() {
        let curve = s1_curve();
        let p = pt(&curve, 8, 39);
        let q = pt(&curve, 8, 967 - 39);
        assert!(p.add(&q).unwrap().is_identity());
    }

    #[test]
    fn display_forms() {
        let curve = s1_curve();
        assert_eq!(curve.identity().to_string(), "O");
        assert_eq!(pt(&curve, 8, 39).to_string(), "[8, 39]");
    }
}
