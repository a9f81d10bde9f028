//! Primality testing, integer factorisation and divisor enumeration.
//!
//! These are the integer underpinnings of Pohlig–Hellman and the order
//! tools: factoring is attempted by trial division first and Pollard's
//! rho afterwards, within a fixed iteration budget. A `None` from
//! [`factorize`] means the budget ran out, which callers report as
//! [`FactorizationFailed`](crate::Error::FactorizationFailed).

use std::collections::BTreeMap;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

/// Witnesses making Miller–Rabin deterministic for every modulus below
/// 3.3·10²⁴; for larger inputs the test is a (very strong) pseudoprime
/// test.
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Largest divisor attempted by trial division before Pollard's rho
/// takes over.
const TRIAL_BOUND: u64 = 1 << 14;

/// Iteration budget of a single Pollard rho walk.
const RHO_BUDGET: u64 = 1 << 18;

/// Number of polynomial offsets tried before rho gives up.
const RHO_RESTARTS: u64 = 8;

/// Miller–Rabin primality test over the fixed witness set.
pub fn is_prime(n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    for &w in &WITNESSES {
        let w = BigUint::from(w);
        if *n == w {
            return true;
        }
        if (n % &w).is_zero() {
            return false;
        }
    }

    // n - 1 = d·2^s with d odd
    let n_minus_1 = n - 1u32;
    let mut d = n_minus_1.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1u32;
        s += 1;
    }

    'witness: for &w in &WITNESSES {
        let mut x = BigUint::from(w).modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue;
        }
        for _ in 1..s {
            x = &x * &x % n;
            if x == n_minus_1 {
                continue 'witness;
            }
            if x.is_one() {
                return false;
            }
        }
        return false;
    }
    true
}

/// Full prime factorisation of `n > 0` as ascending `(prime, exponent)`
/// pairs, or `None` when the rho budget is exhausted before the last
/// cofactor splits.
pub fn factorize(n: &BigUint) -> Option<Vec<(BigUint, u32)>> {
    if n.is_zero() {
        return None;
    }

    let mut factors: BTreeMap<BigUint, u32> = BTreeMap::new();
    let mut m = n.clone();

    let mut d = 2u64;
    while d <= TRIAL_BOUND {
        if BigUint::from(d) * d > m {
            break;
        }
        while (&m % d).is_zero() {
            *factors.entry(BigUint::from(d)).or_insert(0) += 1;
            m = &m / d;
        }
        d = if d == 2 { 3 } else { d + 2 };
    }

    let mut pending = Vec::new();
    if !m.is_one() {
        pending.push(m);
    }
    while let Some(m) = pending.pop() {
        if m.is_one() {
            continue;
        }
        if is_prime(&m) {
            *factors.entry(m).or_insert(0) += 1;
            continue;
        }
        let divisor = pollard_rho(&m)?;
        pending.push(&m / &divisor);
        pending.push(divisor);
    }

    Some(factors.into_iter().collect())
}

/// All divisors of the factored integer, ascending.
pub fn divisors(factorization: &[(BigUint, u32)]) -> Vec<BigUint> {
    let mut divs = vec![BigUint::one()];
    for (prime, exponent) in factorization {
        let mut next = Vec::with_capacity(divs.len() * (*exponent as usize + 1));
        for d in &divs {
            let mut power = BigUint::one();
            for _ in 0..=*exponent {
                next.push(d * &power);
                power *= prime;
            }
        }
        divs = next;
    }
    divs.sort();
    divs
}

/// One non-trivial divisor of an odd composite `n`, by Pollard's rho with
/// Floyd cycle detection, or `None` once the budget is spent.
fn pollard_rho(n: &BigUint) -> Option<BigUint> {
    let step = |x: &BigUint, c: &BigUint| (x * x + c) % n;

    for c in 1..=RHO_RESTARTS {
        let c = BigUint::from(c);
        let mut x = BigUint::from(2u32);
        let mut y = x.clone();
        let mut divisor = BigUint::one();
        let mut spent = 0u64;

        while divisor.is_one() && spent < RHO_BUDGET {
            x = step(&x, &c);
            y = step(&step(&y, &c), &c);
            let diff = if x >= y { &x - &y } else { &y - &x };
            if diff.is_zero() {
                // the walk closed on itself, try another polynomial
                break;
            }
            divisor = diff.gcd(n);
            spent += 1;
        }

        if !divisor.is_one() && divisor != *n {
            return Some(divisor);
        }
    }
    None
}
