//! Cryptographic primitives for Ethereum key and address derivation.
//!
//! This module provides:
//! - Keccak-256 hashing
//! - secp256k1 field and point arithmetic
//! - Private key → address derivation

mod address;
pub mod curve;
pub mod keccak;
mod keypair;

pub use address::Address;
pub use curve::{mod_inverse, mod_pow, point_add, point_double, scalar_multiply, Point, SECP256K1};
pub use keccak::{keccak256, Keccak256};
pub use keypair::{private_key_to_address, public_key_to_address, scalar_from_bytes, Keypair};
