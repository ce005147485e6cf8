//! Ethereum address representation and rendering.

use std::fmt;

use super::keccak256;

/// An Ethereum address (20 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// Creates an address from raw bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Takes the last 20 bytes of a Keccak-256 digest.
    #[inline]
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        Self(bytes)
    }

    /// Returns the address as raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns the address as a lowercase hex string (without 0x prefix).
    #[inline]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the canonical rendering: `0x` + 40 lowercase hex digits.
    pub fn to_hex_prefixed(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    /// Returns the mixed-case EIP-55 rendering.
    pub fn to_checksum(&self) -> String {
        let hex_addr = self.to_hex();
        let hash = keccak256(hex_addr.as_bytes());

        let mut checksum = String::with_capacity(42);
        checksum.push_str("0x");

        for (i, c) in hex_addr.chars().enumerate() {
            let hash_byte = hash[i / 2];
            let hash_nibble = if i % 2 == 0 {
                hash_byte >> 4
            } else {
                hash_byte & 0x0f
            };

            if c.is_ascii_alphabetic() && hash_nibble >= 8 {
                checksum.push(c.to_ascii_uppercase());
            } else {
                checksum.push(c);
            }
        }

        checksum
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_prefixed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_address() {
        // Test vectors from EIP-55
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        ] {
            let bytes: [u8; 20] = hex::decode(&expected[2..]).unwrap().try_into().unwrap();
            assert_eq!(Address::from_bytes(bytes).to_checksum(), expected);
        }
    }

    #[test]
    fn test_hex_output() {
        let addr = Address::from_bytes([0u8; 20]);
        assert_eq!(addr.to_hex(), "0000000000000000000000000000000000000000");
        assert_eq!(
            addr.to_hex_prefixed(),
            "0x0000000000000000000000000000000000000000"
        );
        assert_eq!(addr.to_string(), addr.to_hex_prefixed());
    }

    #[test]
    fn test_from_digest_takes_tail() {
        let mut digest = [0u8; 32];
        digest[12] = 0xab;
        digest[31] = 0xcd;
        let addr = Address::from_digest(&digest);
        assert_eq!(addr.as_bytes()[0], 0xab);
        assert_eq!(addr.as_bytes()[19], 0xcd);
    }
}
