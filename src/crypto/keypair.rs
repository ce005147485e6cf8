//! Private key → public key → address derivation.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use super::curve::{multiply_generator, to_bytes32, Point, SECP256K1};
use super::{keccak256, Address};

/// Reduces 32 bytes to a valid private key scalar in `[1, n−1]`.
///
/// A reduction to zero is remapped to one.
pub fn scalar_from_bytes(bytes: &[u8; 32]) -> BigUint {
    let k = BigUint::from_bytes_be(bytes) % &SECP256K1.n;
    if k.is_zero() {
        BigUint::one()
    } else {
        k
    }
}

/// Hashes the 64-byte `x ‖ y` public key encoding into an address.
#[inline]
pub fn public_key_to_address(public_key: &Point) -> Address {
    Address::from_digest(&keccak256(&public_key.to_uncompressed_bytes()))
}

/// Derives the address for private key `k`.
///
/// Process:
/// 1. Compute the public key `k·G`
/// 2. Serialize it as 64 big-endian bytes (`x ‖ y`, no `0x04` prefix)
/// 3. Hash with Keccak-256 and keep the last 20 bytes
pub fn private_key_to_address(k: &BigUint) -> Address {
    public_key_to_address(&multiply_generator(k))
}

/// A private key together with its derived address.
#[derive(Debug, Clone)]
pub struct Keypair {
    /// The private key, 32 bytes big-endian
    secret_key: [u8; 32],
    /// The derived Ethereum address
    address: Address,
}

impl Keypair {
    /// Draws 32 bytes from `rng` and derives a keypair from them.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self::from_secret_bytes(&bytes)
    }

    /// Derives a keypair from 32 bytes, reducing them into the valid key range.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Self {
        let k = scalar_from_bytes(bytes);
        let address = private_key_to_address(&k);
        Self {
            secret_key: to_bytes32(&k),
            address,
        }
    }

    /// Returns the private key as `0x` + 64 hex digits.
    pub fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.secret_key))
    }

    /// Returns the private key bytes.
    pub fn private_key_bytes(&self) -> &[u8; 32] {
        &self.secret_key
    }

    /// Returns a reference to the derived address.
    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use secp256k1::{PublicKey, Secp256k1, SecretKey};
    use tiny_keccak::{Hasher, Keccak};

    fn key(last_byte: u8) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[31] = last_byte;
        bytes
    }

    #[test]
    fn test_known_addresses() {
        assert_eq!(
            Keypair::from_secret_bytes(&key(1)).address().to_hex(),
            "7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
        assert_eq!(
            Keypair::from_secret_bytes(&key(2)).address().to_hex(),
            "2b5ad5c4795c026514f8317c7a215e218dccd6cf"
        );
    }

    #[test]
    fn test_deterministic_address() {
        let k = BigUint::from(0xdeadbeefu64);
        assert_eq!(private_key_to_address(&k), private_key_to_address(&k));
    }

    #[test]
    fn test_zero_and_order_remap_to_one() {
        assert!(scalar_from_bytes(&[0u8; 32]).is_one());
        assert!(scalar_from_bytes(&to_bytes32(&SECP256K1.n)).is_one());

        let keypair = Keypair::from_secret_bytes(&[0u8; 32]);
        assert_eq!(keypair.private_key_bytes(), &key(1));
    }

    #[test]
    fn test_large_bytes_reduce_mod_n() {
        let k = scalar_from_bytes(&[0xff; 32]);
        assert!(k < SECP256K1.n);
        assert_eq!(k, BigUint::from_bytes_be(&[0xff; 32]) - &SECP256K1.n);
    }

    #[test]
    fn test_private_key_format() {
        let keypair = Keypair::from_secret_bytes(&key(1));
        let hex_key = keypair.private_key_hex();
        assert_eq!(hex_key.len(), 66);
        assert!(hex_key.starts_with("0x"));
        assert!(hex_key.ends_with("01"));
    }

    #[test]
    fn test_generated_matches_reference() {
        let secp = Secp256k1::new();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..4 {
            let keypair = Keypair::generate(&mut rng);
            let sk = SecretKey::from_slice(keypair.private_key_bytes()).unwrap();
            let pk = PublicKey::from_secret_key(&secp, &sk).serialize_uncompressed();

            let mut hasher = Keccak::v256();
            hasher.update(&pk[1..]);
            let mut hash = [0u8; 32];
            hasher.finalize(&mut hash);

            assert_eq!(keypair.address().as_bytes()[..], hash[12..]);
        }
    }
}
