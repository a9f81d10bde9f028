//! Baby-step/giant-step discrete logarithm (Shanks's algorithm).

use std::collections::BTreeMap;

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::{add_el, Error, Group, Result};

/// Finds the smallest `k` in `[0, baby_steps·giant_steps)` with
/// `k·base = target`, or fails with [`Error::NoSolution`].
///
/// Builds a table of the multiples `0·base, …, (baby_steps−1)·base` keyed
/// by their canonical encoding, then probes `target + i·(−baby_steps·base)`
/// for `i = 0, 1, …`. A hit at offset `j` yields `k = i·baby_steps + j`.
///
/// When `ord(base) ≤ baby_steps` the table sees repeated elements; the
/// first (smallest) offset is kept, so the reported `k` is still the
/// smallest solution. Runs in `O((baby_steps + giant_steps)·log baby_steps)`
/// group operations and `O(baby_steps)` space.
pub fn shanks<G: Group>(
    group: &G,
    base: &G::Element,
    target: &G::Element,
    baby_steps: u64,
    giant_steps: u64,
) -> Result<BigUint, G::Error> {
    let mut table = BTreeMap::new();
    let mut multiple = group.identity();
    for j in 0..baby_steps {
        table.entry(group.encode(&multiple)).or_insert(j);
        multiple = add_el(group, &multiple, base)?;
    }

    // After the loop `multiple` is baby_steps·base, exactly the giant step.
    let giant = group.neg(&multiple);

    let mut probe = target.clone();
    for i in 0..giant_steps {
        if let Some(&j) = table.get(&group.encode(&probe)) {
            return Ok(BigUint::from(i) * baby_steps + j);
        }
        probe = add_el(group, &probe, &giant)?;
    }

    Err(Error::NoSolution)
}

/// [`shanks`] with both step counts set to `⌈√n⌉`, covering every
/// `k` in `[0, n)` for a base of order at most `n`.
pub fn autoshanks<G: Group>(
    group: &G,
    base: &G::Element,
    target: &G::Element,
    n: &BigUint,
) -> Result<BigUint, G::Error> {
    let steps = ceil_sqrt(n).to_u64().unwrap_or(u64::MAX);
    shanks(group, base, target, steps, steps)
}

fn ceil_sqrt(n: &BigUint) -> BigUint {
    let root = n.sqrt();
    if &root * &root < *n {
        root + 1u32
    } else {
        root
    }
}
