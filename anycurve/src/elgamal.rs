//! Elliptic-curve ElGamal encryption.
//!
//! The asymmetric sibling of the [`crate::ecdh`] session: the public key
//! pins a group and a point `A·g`, every encryption draws a fresh blind
//! `b` and keys the caller's symmetric cipher with a digest of
//! `(b·g, ab·g)`. The cipher itself is opaque: any
//! `fn(key, input) -> output` pair that round-trips will do.

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_traits::One;
use rand::Rng;
use sha2::{Digest, Sha384};

use crate::ecdh::{generate_parameters, KEY_LEN};
use crate::{encoding, Curve, Point, Result};

/// An ElGamal public key: the group and the point `A·g`.
#[derive(Clone, Debug)]
pub struct PublicKey {
    curve: Curve,
    generator: Point,
    point: Point,
}

impl PublicKey {
    /// The curve the key lives on.
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// The generator `g`.
    pub fn generator(&self) -> &Point {
        &self.generator
    }

    /// The public point `A·g`.
    pub fn point(&self) -> &Point {
        &self.point
    }
}

/// An ElGamal secret key: the group and the multiplier `A`.
#[derive(Clone, Debug)]
pub struct SecretKey {
    generator: Point,
    scalar: BigUint,
}

impl SecretKey {
    /// The generator `g`.
    pub fn generator(&self) -> &Point {
        &self.generator
    }
}

/// Generates a fresh group and keypair; `bits` sizes the field modulus.
pub fn generate_keypair<R: Rng>(bits: u64, rng: &mut R) -> Result<(PublicKey, SecretKey)> {
    let parameters = generate_parameters(bits, rng)?;
    let scalar = rng.gen_biguint_range(&BigUint::one(), &parameters.order);
    let point = parameters
        .generator
        .mul_scalar(&BigInt::from(scalar.clone()))?;

    Ok((
        PublicKey {
            curve: parameters.curve,
            generator: parameters.generator.clone(),
            point,
        },
        SecretKey {
            generator: parameters.generator,
            scalar,
        },
    ))
}

/// Encrypts `message` under `public`, returning the blind point `b·g`
/// alongside the ciphertext produced by the caller's cipher.
pub fn encrypt<R: Rng, F>(
    message: &[u8],
    public: &PublicKey,
    rng: &mut R,
    cipher: F,
) -> Result<(Point, Vec<u8>)>
where
    F: FnOnce(&[u8; KEY_LEN], &[u8]) -> Vec<u8>,
{
    // oversized like the responder scalar in ecdh: the group order is
    // only known to be near p
    let blind = rng
        .gen_biguint(2 * public.curve.prime().bits())
        .max(BigUint::one());
    let blind_public = public.generator.mul_scalar(&BigInt::from(blind.clone()))?;
    let shared = public.point.mul_scalar(&BigInt::from(blind))?;

    let key = shared_key(&blind_public, &shared);
    Ok((blind_public, cipher(&key, message)))
}

/// Inverts [`encrypt`] with the matching secret key and cipher.
pub fn decrypt<F>(ciphertext: &(Point, Vec<u8>), secret: &SecretKey, cipher: F) -> Result<Vec<u8>>
where
    F: FnOnce(&[u8; KEY_LEN], &[u8]) -> Vec<u8>,
{
    let (blind_public, body) = ciphertext;
    let shared = blind_public.mul_scalar(&BigInt::from(secret.scalar.clone()))?;
    let key = shared_key(blind_public, &shared);
    Ok(cipher(&key, body))
}

/// SHA-384 over the canonical encodings of `b·g` then `ab·g`; the order
/// matters.
fn shared_key(blind_public: &Point, shared: &Point) -> [u8; KEY_LEN] {
    let mut hasher = Sha384::new();
    hasher.update(encoding::point_bytes(blind_public));
    hasher.update(encoding::point_bytes(shared));
    hasher.finalize().into()
}
