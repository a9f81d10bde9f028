//! Random prime generation.
//!
//! The probabilistic source of field moduli for parameter generation:
//! uniform odd candidates of the requested bit length, filtered through
//! the Miller–Rabin test in [`dlog::factor`].

use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::Rng;

use dlog::factor;

/// A random prime of exactly `bits` bits (top bit forced).
///
/// Suitable as a curve modulus for any `bits ≥ 3`; smaller requests are
/// rounded up to 3 bits so the result always exceeds 3.
pub fn random_prime<R: Rng>(bits: u64, rng: &mut R) -> BigUint {
    let bits = bits.max(3);
    loop {
        let mut candidate = rng.gen_biguint(bits);
        candidate |= BigUint::one() << (bits - 1);
        candidate |= BigUint::one();
        if factor::is_prime(&candidate) {
            return candidate;
        }
    }
}
