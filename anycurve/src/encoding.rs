//! Canonical point encoding and the wire format for curve parameters.
//!
//! A point encodes as a single `0x00` byte for the identity, or `0x04`
//! followed by the big-endian `x` and `y` coordinates, each padded to the
//! byte width of the field modulus. The encoding doubles as the equality
//! key of the baby-step table and as the input of the key-derivation
//! hash.
//!
//! Curve parameters travel as `u32`-length-prefixed big-endian magnitudes
//! in the order `p, a, b, c`, followed by the length-prefixed encodings
//! of the generator and the sender's public point.

use num_bigint::BigUint;

use crate::point::Coordinates;
use crate::{Curve, Error, Point, Result};

/// Leading byte of an identity encoding.
const TAG_IDENTITY: u8 = 0x00;

/// Leading byte of an uncompressed affine encoding.
const TAG_AFFINE: u8 = 0x04;

/// Byte width of a field element of `curve`.
pub fn field_width(curve: &Curve) -> usize {
    usize::try_from((curve.prime().bits() + 7) / 8).unwrap_or(usize::MAX)
}

/// The canonical byte encoding of a point.
pub fn point_bytes(point: &Point) -> Vec<u8> {
    match point.coordinates() {
        Coordinates::Identity => vec![TAG_IDENTITY],
        Coordinates::Affine { x, y } => {
            let width = field_width(point.curve());
            let mut bytes = Vec::with_capacity(1 + 2 * width);
            bytes.push(TAG_AFFINE);
            bytes.extend_from_slice(&padded_be(x, width));
            bytes.extend_from_slice(&padded_be(y, width));
            bytes
        }
    }
}

/// Decodes a canonical point encoding against its curve.
///
/// Fails with [`Error::InvalidEncoding`] on a malformed buffer and with
/// [`Error::NotOnCurve`] when the decoded coordinates do not satisfy the
/// curve equation.
pub fn parse_point(curve: &Curve, bytes: &[u8]) -> Result<Point> {
    match bytes.split_first() {
        Some((&TAG_IDENTITY, rest)) if rest.is_empty() => Ok(curve.identity()),
        Some((&TAG_AFFINE, rest)) => {
            let width = field_width(curve);
            if rest.len() != 2 * width {
                return Err(Error::InvalidEncoding);
            }
            let x = BigUint::from_bytes_be(&rest[..width]);
            let y = BigUint::from_bytes_be(&rest[width..]);
            curve.point(x, y)
        }
        _ => Err(Error::InvalidEncoding),
    }
}

/// Serialises the exchanged parameters: curve, generator and public point.
pub fn params_to_bytes(curve: &Curve, generator: &Point, public: &Point) -> Vec<u8> {
    let mut out = Vec::new();
    for magnitude in [curve.prime(), curve.a(), curve.b(), curve.c()] {
        push_block(&mut out, &magnitude.to_bytes_be());
    }
    push_block(&mut out, &point_bytes(generator));
    push_block(&mut out, &point_bytes(public));
    out
}

/// Parses a parameter block, re-validating everything a peer could have
/// tampered with: primality and non-singularity through [`Curve::new`],
/// and curve membership of both points.
pub fn parse_params(bytes: &[u8]) -> Result<(Curve, Point, Point)> {
    let mut cursor = bytes;
    let p = BigUint::from_bytes_be(read_block(&mut cursor)?);
    let a = BigUint::from_bytes_be(read_block(&mut cursor)?);
    let b = BigUint::from_bytes_be(read_block(&mut cursor)?);
    let c = BigUint::from_bytes_be(read_block(&mut cursor)?);
    let curve = Curve::new(a, b, c, p)?;

    let generator = parse_point(&curve, read_block(&mut cursor)?)?;
    let public = parse_point(&curve, read_block(&mut cursor)?)?;
    if !cursor.is_empty() {
        return Err(Error::InvalidEncoding);
    }
    Ok((curve, generator, public))
}

fn padded_be(value: &BigUint, width: usize) -> Vec<u8> {
    let raw = value.to_bytes_be();
    debug_assert!(raw.len() <= width);
    let mut padded = vec![0u8; width.saturating_sub(raw.len())];
    padded.extend_from_slice(&raw);
    padded
}

fn push_block(out: &mut Vec<u8>, block: &[u8]) {
    let len = u32::try_from(block.len()).unwrap_or(u32::MAX);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(block);
}

fn read_block<'a>(cursor: &mut &'a [u8]) -> Result<&'a [u8]> {
    if cursor.len() < 4 {
        return Err(Error::InvalidEncoding);
    }
    let (len_bytes, rest) = cursor.split_at(4);
    let len = u32::from_be_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;
    if rest.len() < len {
        return Err(Error::InvalidEncoding);
    }
    let (block, tail) = rest.split_at(len);
    *cursor = tail;
    Ok(block)
}
