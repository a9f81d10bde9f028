#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
#![doc = include_str!("../README.md")]

pub mod factor;
pub mod order;

mod pohlig;
mod shanks;

pub use crate::pohlig::pohlig_hellman;
pub use crate::shanks::{autoshanks, shanks};

use num_bigint::{BigInt, BigUint};

/// The capability bundle the solvers need from a finite abelian group.
///
/// Implementors are *group objects*: a value carrying the group parameters
/// (a modulus, curve coefficients, …) whose methods act on the associated
/// [`Element`](Group::Element) type. All elements handed to a method are
/// expected to belong to the implementing group; an implementation whose
/// elements carry their own group reference (such as curve points) reports
/// a mismatch through [`Error`](Group::Error).
///
/// The group operation is written additively throughout, matching the
/// `k·a = b` convention of the discrete-logarithm problem.
pub trait Group {
    /// An element of the group.
    type Element: Clone + Eq;

    /// Error produced by the group's own operations.
    type Error;

    /// The neutral element.
    fn identity(&self) -> Self::Element;

    /// The group operation.
    fn add(
        &self,
        a: &Self::Element,
        b: &Self::Element,
    ) -> core::result::Result<Self::Element, Self::Error>;

    /// The inverse of `a`.
    fn neg(&self, a: &Self::Element) -> Self::Element;

    /// `k·a` for an arbitrary (possibly negative) integer `k`.
    fn scalar_mul(
        &self,
        a: &Self::Element,
        k: &BigInt,
    ) -> core::result::Result<Self::Element, Self::Error>;

    /// A canonical byte encoding of `a`.
    ///
    /// Two elements encode identically if and only if they are equal; the
    /// encoding's lexicographic order is the total order the baby-step
    /// table is keyed by.
    fn encode(&self, a: &Self::Element) -> Vec<u8>;

    /// `a - b`.
    fn sub(
        &self,
        a: &Self::Element,
        b: &Self::Element,
    ) -> core::result::Result<Self::Element, Self::Error> {
        self.add(a, &self.neg(b))
    }

    /// Whether `a` is the neutral element.
    fn is_identity(&self, a: &Self::Element) -> bool {
        *a == self.identity()
    }
}

/// Solver errors, parametric in the underlying group's own error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error<E> {
    /// The target is not a multiple of the base within the searched range.
    #[error("target is not in the subgroup generated by the base")]
    NoSolution,

    /// The group order could not be fully factored within the search budget.
    ///
    /// Reported separately from [`Error::NoSolution`] because Pohlig–Hellman
    /// is only sound when the factorisation of the order is complete.
    #[error("the group order could not be fully factored within budget")]
    FactorizationFailed,

    /// An operation of the underlying group failed.
    #[error("group operation failed: {0}")]
    Group(E),
}

/// Shorthand for solver results.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// `a + b`, lifting the group's error into [`Error`].
pub(crate) fn add_el<G: Group>(
    group: &G,
    a: &G::Element,
    b: &G::Element,
) -> Result<G::Element, G::Error> {
    group.add(a, b).map_err(Error::Group)
}

/// `k·a` for an unsigned scalar, lifting the group's error into [`Error`].
pub(crate) fn mul_el<G: Group>(
    group: &G,
    a: &G::Element,
    k: &BigUint,
) -> Result<G::Element, G::Error> {
    group
        .scalar_mul(a, &BigInt::from(k.clone()))
        .map_err(Error::Group)
}
