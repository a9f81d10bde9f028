//! Element-order computation.
//!
//! Both entry points assume Lagrange: the order of an element divides any
//! integer known to annihilate it. [`order_dividing`] walks the divisors of
//! a known group-order multiple; [`order_in_window`] first *finds* such a
//! multiple inside a caller-supplied interval by solving a discrete
//! logarithm of the element against itself, then strips primes off it
//! until only the order remains.

use num_bigint::BigUint;

use crate::{factor, mul_el, shanks::autoshanks, Error, Group, Result};

/// The order of `element`, given an `n` it is known to divide.
///
/// Enumerates the divisors of `n` in ascending order and returns the first
/// that annihilates `element`; for an element of prime order this probes
/// twice. Fails with [`Error::NoSolution`] when no divisor works, i.e.
/// when the caller's `n` was not actually a multiple of the order.
pub fn order_dividing<G: Group>(
    group: &G,
    element: &G::Element,
    n: &BigUint,
) -> Result<BigUint, G::Error> {
    let factorization = factor::factorize(n).ok_or(Error::FactorizationFailed)?;
    for divisor in factor::divisors(&factorization) {
        if group.is_identity(&mul_el(group, element, &divisor)?) {
            return Ok(divisor);
        }
    }
    Err(Error::NoSolution)
}

/// The exact order of `element`, assuming some multiple of it lies in
/// `[lo, hi]`.
///
/// Solves `k·element = −(lo·element)` over a window of width `hi − lo + 1`
/// with [`autoshanks`], so `m = lo + k` is the smallest annihilating
/// multiple in the interval. The order is then recovered by dividing out
/// prime factors of `m` as long as the quotient still annihilates
/// `element`.
///
/// For a curve group this is used with the Hasse interval, where the
/// group order (and hence a multiple of every element order) is
/// guaranteed to live.
pub fn order_in_window<G: Group>(
    group: &G,
    element: &G::Element,
    lo: &BigUint,
    hi: &BigUint,
) -> Result<BigUint, G::Error> {
    debug_assert!(lo <= hi);

    let target = group.neg(&mul_el(group, element, lo)?);
    let width = hi - lo + 1u32;
    let offset = autoshanks(group, element, &target, &width)?;
    let mut m = lo + offset;

    let factorization = factor::factorize(&m).ok_or(Error::FactorizationFailed)?;
    for (prime, exponent) in factorization {
        for _ in 0..exponent {
            let quotient = &m / &prime;
            if group.is_identity(&mul_el(group, element, &quotient)?) {
                m = quotient;
            } else {
                break;
            }
        }
    }
    Ok(m)
}
