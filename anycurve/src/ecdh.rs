//! Elliptic-curve Diffie–Hellman key agreement.
//!
//! A [`Session`] is a message-driven state machine; the transport and the
//! symmetric cipher protecting the confirmation tags stay outside of it.
//! The initiator generates a fresh group (prime, curve, generator),
//! sends the parameter block of [`crate::encoding`], and both sides walk:
//!
//! ```text
//! initiator:  Idle → ParamsSent         → SharedPointDerived → Confirmed
//! responder:  Idle → AwaitingPeerPoint                       → Confirmed
//! ```
//!
//! The responder derives the shared point while replying, but only
//! acknowledges it (reaching `Confirmed`) once the initiator's
//! confirmation tag verifies. Both tags are SHA-384 digests binding the
//! pair of public points, domain-separated by role so a reflected tag
//! never verifies.

use log::{debug, info};
use num_bigint::{BigInt, BigUint, RandBigInt};
use num_traits::One;
use rand::Rng;
use sha2::{Digest, Sha384};

use crate::{encoding, primes, Curve, Error, Point, Result};

/// Byte length of session keys and confirmation tags (SHA-384 output).
pub const KEY_LEN: usize = 48;

/// Domain-separation byte of the initiator's confirmation tag.
const TAG_INITIATOR: u8 = 0x01;

/// Domain-separation byte of the responder's confirmation tag.
const TAG_RESPONDER: u8 = 0x02;

/// Where a [`Session`] currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Nothing exchanged yet.
    Idle,
    /// Initiator: the parameter block has been produced.
    ParamsSent,
    /// Responder: replied with its public point, shared point computed
    /// but not yet acknowledged by the peer.
    AwaitingPeerPoint,
    /// Initiator: the peer's point arrived and the shared point is known.
    SharedPointDerived,
    /// The peer's confirmation tag verified; the key is agreed.
    Confirmed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Initiator,
    Responder,
}

impl Role {
    fn peer(self) -> Role {
        match self {
            Role::Initiator => Role::Responder,
            Role::Responder => Role::Initiator,
        }
    }

    fn tag_byte(self) -> u8 {
        match self {
            Role::Initiator => TAG_INITIATOR,
            Role::Responder => TAG_RESPONDER,
        }
    }
}

/// A freshly generated Diffie–Hellman group.
#[derive(Clone, Debug)]
pub struct Parameters {
    /// The curve all exchanged points live on.
    pub curve: Curve,
    /// A generator of the full group of rational points.
    pub generator: Point,
    /// The generator's order, `#C`.
    pub order: BigUint,
}

/// Generates a prime of the requested magnitude, a random non-singular
/// curve over it, and a generator of its point group.
///
/// Singular equations and curves without a generator (non-cyclic groups)
/// are discarded and redrawn; errors other than those two are surfaced.
pub fn generate_parameters<R: Rng>(bits: u64, rng: &mut R) -> Result<Parameters> {
    loop {
        let p = primes::random_prime(bits, rng);
        debug!("candidate field modulus {p}");

        let a = rng.gen_biguint_below(&p);
        let b = rng.gen_biguint_below(&p);
        let c = rng.gen_biguint_below(&p);
        let curve = match Curve::new(a, b, c, p) {
            Ok(curve) => curve,
            Err(Error::SingularCurve) => continue,
            Err(err) => return Err(err),
        };

        let generator = match curve.pick_generator(rng) {
            Ok(generator) => generator,
            Err(Error::NoGenerator) => {
                debug!("{curve} has no generator, redrawing");
                continue;
            }
            Err(err) => return Err(err),
        };
        let order = curve.cardinality(rng)?;

        info!("group {curve} with generator {generator} of order {order}");
        return Ok(Parameters {
            curve,
            generator,
            order,
        });
    }
}

#[derive(Debug)]
struct Exchange {
    role: Role,
    curve: Curve,
    secret: BigUint,
    ours: Point,
    theirs: Option<Point>,
    shared: Option<Point>,
}

impl Exchange {
    /// The two public points in protocol order (initiator's first).
    fn transcript(&self) -> Result<(&Point, &Point)> {
        let theirs = self.theirs.as_ref().ok_or(Error::InvalidState)?;
        Ok(match self.role {
            Role::Initiator => (&self.ours, theirs),
            Role::Responder => (theirs, &self.ours),
        })
    }

    fn tag(&self, role: Role) -> Result<[u8; KEY_LEN]> {
        let (initiator_public, responder_public) = self.transcript()?;
        let mut hasher = Sha384::new();
        hasher.update([role.tag_byte()]);
        hasher.update(encoding::point_bytes(initiator_public));
        hasher.update(encoding::point_bytes(responder_public));
        Ok(hasher.finalize().into())
    }
}

/// One side of a Diffie–Hellman key agreement.
#[derive(Debug)]
pub struct Session {
    state: State,
    exchange: Option<Exchange>,
}

impl Session {
    /// A fresh session in [`State::Idle`]; it becomes an initiator or a
    /// responder with the first call.
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            exchange: None,
        }
    }

    /// The current protocol state.
    pub fn state(&self) -> State {
        self.state
    }

    /// The curve in use, once parameters exist.
    pub fn curve(&self) -> Option<&Curve> {
        self.exchange.as_ref().map(|e| &e.curve)
    }

    /// The derived shared point, if this side has computed it already.
    pub fn shared_point(&self) -> Option<&Point> {
        self.exchange.as_ref().and_then(|e| e.shared.as_ref())
    }

    /// Initiator entry point: generates the group, draws the secret
    /// multiplier from `[1, ord g)` and returns the parameter block to
    /// ship to the peer. Moves `Idle → ParamsSent`.
    pub fn initiate<R: Rng>(&mut self, bits: u64, rng: &mut R) -> Result<Vec<u8>> {
        if self.state != State::Idle {
            return Err(Error::InvalidState);
        }
        let parameters = generate_parameters(bits, rng)?;
        let secret = rng.gen_biguint_range(&BigUint::one(), &parameters.order);
        let ours = parameters
            .generator
            .mul_scalar(&BigInt::from(secret.clone()))?;

        info!("initiating key agreement, public point {ours}");
        let message = encoding::params_to_bytes(&parameters.curve, &parameters.generator, &ours);

        self.exchange = Some(Exchange {
            role: Role::Initiator,
            curve: parameters.curve,
            secret,
            ours,
            theirs: None,
            shared: None,
        });
        self.state = State::ParamsSent;
        Ok(message)
    }

    /// Responder entry point: validates the received parameter block,
    /// draws a secret, derives the shared point and returns the public
    /// point to send back. Moves `Idle → AwaitingPeerPoint`.
    pub fn receive_params<R: Rng>(&mut self, message: &[u8], rng: &mut R) -> Result<Vec<u8>> {
        if self.state != State::Idle {
            return Err(Error::InvalidState);
        }
        let (curve, generator, their_public) = encoding::parse_params(message)?;
        info!("received parameters for {curve}");

        // The group order is unknown on this side; a scalar of twice the
        // modulus width keeps the multiple statistically uniform since
        // #C ≈ p.
        let secret = rng
            .gen_biguint(2 * curve.prime().bits())
            .max(BigUint::one());
        let ours = generator.mul_scalar(&BigInt::from(secret.clone()))?;
        let shared = their_public.mul_scalar(&BigInt::from(secret.clone()))?;
        debug!("peer public point {their_public}, replying with {ours}");

        let reply = encoding::point_bytes(&ours);
        self.exchange = Some(Exchange {
            role: Role::Responder,
            curve,
            secret,
            ours,
            theirs: Some(their_public),
            shared: Some(shared),
        });
        self.state = State::AwaitingPeerPoint;
        Ok(reply)
    }

    /// Initiator: consumes the responder's public point and derives the
    /// shared point. Moves `ParamsSent → SharedPointDerived`.
    pub fn receive_peer_point(&mut self, message: &[u8]) -> Result<()> {
        if self.state != State::ParamsSent {
            return Err(Error::InvalidState);
        }
        let exchange = self.exchange.as_mut().ok_or(Error::InvalidState)?;
        let their_public = encoding::parse_point(&exchange.curve, message)?;
        let shared = their_public.mul_scalar(&BigInt::from(exchange.secret.clone()))?;
        debug!("peer public point {their_public}, shared point derived");

        exchange.theirs = Some(their_public);
        exchange.shared = Some(shared);
        self.state = State::SharedPointDerived;
        Ok(())
    }

    /// The session key: SHA-384 of the shared point's canonical encoding.
    ///
    /// Available from the moment the shared point exists; the caller
    /// feeds it to whatever symmetric cipher the transport uses.
    pub fn session_key(&self) -> Result<[u8; KEY_LEN]> {
        let shared = self.shared_point().ok_or(Error::InvalidState)?;
        let mut hasher = Sha384::new();
        hasher.update(encoding::point_bytes(shared));
        Ok(hasher.finalize().into())
    }

    /// This side's confirmation tag, to be encrypted and sent to the peer.
    pub fn own_tag(&self) -> Result<[u8; KEY_LEN]> {
        let exchange = self.exchange.as_ref().ok_or(Error::InvalidState)?;
        match (self.state, exchange.role) {
            (State::SharedPointDerived | State::Confirmed, Role::Initiator)
            | (State::AwaitingPeerPoint | State::Confirmed, Role::Responder) => {
                exchange.tag(exchange.role)
            }
            _ => Err(Error::InvalidState),
        }
    }

    /// Verifies the peer's decrypted confirmation tag and, on success,
    /// moves to [`State::Confirmed`].
    pub fn verify_peer_tag(&mut self, tag: &[u8]) -> Result<()> {
        let exchange = self.exchange.as_ref().ok_or(Error::InvalidState)?;
        match (self.state, exchange.role) {
            (State::SharedPointDerived, Role::Initiator)
            | (State::AwaitingPeerPoint, Role::Responder) => {}
            _ => return Err(Error::InvalidState),
        }
        let expected = exchange.tag(exchange.role.peer())?;
        if tag != expected.as_slice() {
            info!("peer confirmation tag mismatch, aborting");
            return Err(Error::ProtocolMismatch);
        }
        info!("key agreement confirmed");
        self.state = State::Confirmed;
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
