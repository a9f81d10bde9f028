//! Arithmetic in the prime field `F_p`.
//!
//! Free functions over [`BigUint`] with an explicit odd-prime modulus;
//! every result is canonical in `[0, p)`. The square root dispatches on
//! `p mod 4` at runtime: the single-exponentiation path when
//! `p ≡ 3 (mod 4)`, Tonelli–Shanks for the rest.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::{Error, Result};

/// `(a + b) mod p`.
pub fn add(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    (a + b) % p
}

/// `(a − b) mod p`.
pub fn sub(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    ((a % p) + p - (b % p)) % p
}

/// `(a · b) mod p`.
pub fn mul(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    (a * b) % p
}

/// `(−a) mod p`.
pub fn neg(a: &BigUint, p: &BigUint) -> BigUint {
    (p - a % p) % p
}

/// `a⁻¹ mod p` by the extended Euclidean algorithm.
///
/// Fails with [`Error::NotInvertible`] when `gcd(a, p) ≠ 1`, in particular
/// for `a ≡ 0 (mod p)`.
pub fn inv(a: &BigUint, p: &BigUint) -> Result<BigUint> {
    let extended = BigInt::from(a % p).extended_gcd(&BigInt::from(p.clone()));
    if !extended.gcd.is_one() {
        return Err(Error::NotInvertible);
    }
    Ok(extended
        .x
        .mod_floor(&BigInt::from(p.clone()))
        .magnitude()
        .clone())
}

/// The pair of square roots `{r, p − r}` of `n` modulo `p`, or
/// [`Error::NotASquare`] for a quadratic non-residue.
///
/// Both components are equal (to zero) when `n ≡ 0`.
pub fn sqrt(n: &BigUint, p: &BigUint) -> Result<(BigUint, BigUint)> {
    let n = n % p;
    if n.is_zero() {
        return Ok((BigUint::zero(), BigUint::zero()));
    }

    let root = if (p % 4u32) == BigUint::from(3u32) {
        // r = n^((p+1)/4); a squaring check stands in for the Euler
        // criterion on this path
        let r = n.modpow(&((p + 1u32) >> 2u32), p);
        if mul(&r, &r, p) != n {
            return Err(Error::NotASquare);
        }
        r
    } else {
        tonelli_shanks(&n, p)?
    };

    let other = p - &root;
    Ok((root, other))
}

/// Tonelli–Shanks for any odd prime `p` with `n` a non-zero residue
/// candidate.
fn tonelli_shanks(n: &BigUint, p: &BigUint) -> Result<BigUint> {
    let one = BigUint::one();
    let legendre_exponent = (p - &one) >> 1u32;
    if n.modpow(&legendre_exponent, p) != one {
        return Err(Error::NotASquare);
    }

    // p - 1 = q·2^s with q odd
    let mut q = p - &one;
    let mut s = 0u32;
    while q.is_even() {
        q >>= 1u32;
        s += 1;
    }

    // any quadratic non-residue will do as the correction generator
    let mut z = BigUint::from(2u32);
    while z.modpow(&legendre_exponent, p) != p - &one {
        z += 1u32;
    }

    let mut m = s;
    let mut c = z.modpow(&q, p);
    let mut t = n.modpow(&q, p);
    let mut r = n.modpow(&((&q + 1u32) >> 1u32), p);

    while !t.is_one() {
        let mut i = 0u32;
        let mut probe = t.clone();
        while !probe.is_one() {
            probe = &probe * &probe % p;
            i += 1;
        }
        let b = c.modpow(&(BigUint::one() << (m - i - 1)), p);
        m = i;
        c = &b * &b % p;
        t = t * &c % p;
        r = r * &b % p;
    }
    Ok(r)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p967() -> BigUint {
        BigUint::from(967u32)
    }

    #[test]
    fn canonical_results() {
        let p = p967();
        assert_eq!(sub(&BigUint::from(3u32), &BigUint::from(5u32), &p), BigUint::from(965u32));
        assert_eq!(neg(&BigUint::zero(), &p), BigUint::zero());
        assert_eq!(
            add(&BigUint::from(966u32), &BigUint::from(2u32), &p),
            BigUint::from(1u32)
        );
    }

    #[test]
    fn inverse_round_trip() {
        let p = p967();
        for a in [1u32, 2, 39, 500, 966] {
            let a = BigUint::from(a);
            let ainv = inv(&a, &p).unwrap();
            assert_eq!(mul(&a, &ainv, &p), BigUint::one());
        }
    }

    #[test]
    fn zero_is_not_invertible() {
        assert_eq!(inv(&BigUint::zero(), &p967()), Err(Error::NotInvertible));
        // a multiple of p reduces to zero
        assert_eq!(
            inv(&(p967() * 3u32), &p967()),
            Err(Error::NotInvertible)
        );
    }

    #[test]
    fn sqrt_fast_path() {
        // 967 ≡ 3 (mod 4); 39² = 554 on the S-curve
        let p = p967();
        let (r1, r2) = sqrt(&BigUint::from(554u32), &p).unwrap();
        assert_eq!(mul(&r1, &r1, &p), BigUint::from(554u32));
        assert_eq!(mul(&r2, &r2, &p), BigUint::from(554u32));
        assert_eq!(add(&r1, &r2, &p), BigUint::zero());
    }

    #[test]
    fn fast_path_rejects_non_residue() {
        // p ≡ 3 (mod 4) makes −1 a non-residue
        let p = p967();
        assert_eq!(sqrt(&BigUint::from(966u32), &p), Err(Error::NotASquare));
    }

    #[test]
    fn tonelli_shanks_path() {
        // 25169 ≡ 1 (mod 4)
        let p = BigUint::from(25_169u32);
        for k in [2u32, 5, 1234, 25_000] {
            let k = BigUint::from(k);
            let square = mul(&k, &k, &p);
            let (r1, r2) = sqrt(&square, &p).unwrap();
            assert_eq!(mul(&r1, &r1, &p), square);
            assert!(r1 == k || r2 == k);
        }
    }

    #[test]
    fn tonelli_shanks_beyond_u32() {
        let p = BigUint::from(17_179_869_209u64); // ≡ 1 (mod 4)
        let n = BigUint::from(1_234_567u64);
        let (r1, _) = sqrt(&n, &p).unwrap();
        assert_eq!(mul(&r1, &r1, &p), n);
    }

    #[test]
    fn sqrt_of_zero() {
        let (r1, r2) = sqrt(&BigUint::zero(), &p967()).unwrap();
        assert!(r1.is_zero() && r2.is_zero());
    }
}
