//! Pohlig–Hellman reduction of a discrete logarithm to the prime-power
//! factors of the group order, recombined with the Chinese remainder
//! theorem.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::{add_el, factor, mul_el, shanks::autoshanks, Error, Group, Result};

/// Computes `k` with `k·base = target`, where `n` is the order of `base`.
///
/// For each prime power `q = pᵉ` dividing `n`, the problem is pushed into
/// the subgroup of order `q` (by multiplying both sides with `n/q`) and
/// solved digit by digit in base `p`: every digit is a discrete logarithm
/// in a group of just `p` elements, handled by [`autoshanks`]. The
/// per-prime-power residues are then recombined by CRT into the unique
/// `k` in `[0, n)`.
///
/// Fails with [`Error::FactorizationFailed`] when `n` cannot be fully
/// factored within the [`factor`] budget (a partial factorisation would
/// silently produce wrong logarithms), and with [`Error::NoSolution`],
/// propagated from an inner solver, when `target` is not a multiple of
/// `base`.
pub fn pohlig_hellman<G: Group>(
    group: &G,
    base: &G::Element,
    target: &G::Element,
    n: &BigUint,
) -> Result<BigUint, G::Error> {
    let factorization = factor::factorize(n).ok_or(Error::FactorizationFailed)?;

    let mut residues = Vec::with_capacity(factorization.len());
    for (prime, exponent) in &factorization {
        let prime_power = prime.pow(*exponent);
        let cofactor = n / &prime_power;

        // base_q generates the subgroup of order dividing prime_power
        let base_q = mul_el(group, base, &cofactor)?;
        let target_q = mul_el(group, target, &cofactor)?;

        // all digits are logarithms to this element of order (at most) prime
        let digit_base = mul_el(group, &base_q, &prime.pow(exponent - 1))?;

        let mut residue = BigUint::zero();
        let mut place = BigUint::one();
        for d in 0..*exponent {
            let partial = mul_el(group, &base_q, &residue)?;
            let remainder = add_el(group, &target_q, &group.neg(&partial))?;
            let lifted = mul_el(group, &remainder, &prime.pow(exponent - 1 - d))?;
            let digit = autoshanks(group, &digit_base, &lifted, prime)?;
            residue += digit * &place;
            place *= prime;
        }
        residues.push((residue, prime_power));
    }

    // moduli are pairwise coprime prime powers, so recombination cannot
    // actually miss an inverse
    crt(&residues).ok_or(Error::NoSolution)
}

/// Incremental Chinese remainder recombination over pairwise coprime
/// moduli.
fn crt(residues: &[(BigUint, BigUint)]) -> Option<BigUint> {
    let mut x = BigUint::zero();
    let mut modulus = BigUint::one();
    for (r, q) in residues {
        let inverse = mod_inv(&modulus, q)?;
        let x_mod_q = &x % q;
        let delta = if r >= &x_mod_q {
            r - &x_mod_q
        } else {
            q - (&x_mod_q - r)
        };
        x += &modulus * (delta * inverse % q);
        modulus *= q;
    }
    Some(x)
}

fn mod_inv(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    let gcd = BigInt::from(a.clone()).extended_gcd(&BigInt::from(m.clone()));
    if !gcd.gcd.is_one() {
        return None;
    }
    Some(gcd.x.mod_floor(&BigInt::from(m.clone())).magnitude().clone())
}
