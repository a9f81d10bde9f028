//! Error type.

/// Everything that can go wrong across curve construction, the group law,
/// the solvers driven through [`dlog`], and key agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The coordinates do not satisfy the curve equation.
    #[error("point coordinates do not satisfy the curve equation")]
    NotOnCurve,

    /// The operands belong to different curves.
    #[error("points belong to different curves")]
    MixedCurves,

    /// The discriminant of the requested curve vanishes modulo `p`.
    #[error("curve discriminant is zero modulo p")]
    SingularCurve,

    /// The requested field modulus is composite or not greater than three.
    #[error("field modulus is not a prime greater than three")]
    NotPrime,

    /// Attempted to invert a multiple of the field modulus.
    #[error("element has no multiplicative inverse")]
    NotInvertible,

    /// The operand is a quadratic non-residue.
    #[error("element is not a quadratic residue")]
    NotASquare,

    /// The discrete-log target is not a multiple of the base.
    #[error("target is not in the subgroup generated by the base")]
    NoSolution,

    /// A group order could not be fully factored within budget.
    #[error("the group order could not be fully factored within budget")]
    FactorizationFailed,

    /// The generator search exhausted its attempt bound; the group is
    /// likely not cyclic.
    #[error("no generator found within the attempt bound")]
    NoGenerator,

    /// The cardinality search exhausted its sample budget.
    #[error("cardinality search exhausted its sample budget")]
    CardinalityNotDetermined,

    /// A point or parameter encoding was malformed.
    #[error("malformed point or parameter encoding")]
    InvalidEncoding,

    /// A session method was invoked in a state it is not valid in.
    #[error("operation is not valid in the current session state")]
    InvalidState,

    /// The peer's confirmation tag did not verify.
    #[error("peer confirmation tag did not verify")]
    ProtocolMismatch,
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;

impl From<dlog::Error<Error>> for Error {
    fn from(err: dlog::Error<Error>) -> Self {
        match err {
            dlog::Error::NoSolution => Error::NoSolution,
            dlog::Error::FactorizationFailed => Error::FactorizationFailed,
            dlog::Error::Group(inner) => inner,
        }
    }
}
