#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
#![doc = include_str!("../README.md")]

pub mod ecdh;
pub mod elgamal;
pub mod encoding;
pub mod field;
pub mod primes;

mod curve;
mod error;
mod point;

pub use crate::curve::{Curve, Points};
pub use crate::error::{Error, Result};
pub use crate::point::{Coordinates, Point};

pub use dlog;
