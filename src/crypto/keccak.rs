//! Keccak-256 (the original Keccak submission used by Ethereum).
//!
//! This is not SHA3-256: the padding appends `0x01` rather than the NIST
//! `0x06` domain byte, so digests differ for every input.

/// Sponge rate in bytes (1088 bits).
pub const RATE: usize = 136;

/// Digest length in bytes.
pub const OUTPUT_LEN: usize = 32;

const ROUNDS: usize = 24;

/// Round constants for the ι step.
const ROUND_CONSTANTS: [u64; ROUNDS] = [
    0x0000_0000_0000_0001,
    0x0000_0000_0000_8082,
    0x8000_0000_0000_808a,
    0x8000_0000_8000_8000,
    0x0000_0000_0000_808b,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8009,
    0x0000_0000_0000_008a,
    0x0000_0000_0000_0088,
    0x0000_0000_8000_8009,
    0x0000_0000_8000_000a,
    0x0000_0000_8000_808b,
    0x8000_0000_0000_008b,
    0x8000_0000_0000_8089,
    0x8000_0000_0000_8003,
    0x8000_0000_0000_8002,
    0x8000_0000_0000_0080,
    0x0000_0000_0000_800a,
    0x8000_0000_8000_000a,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8080,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8008,
];

/// ρ rotation for the lane at index `x + 5y`.
const RHO_OFFSETS: [u32; 25] = [
    0, 1, 62, 28, 27, //
    36, 44, 6, 55, 20, //
    3, 10, 43, 25, 39, //
    41, 45, 15, 21, 8, //
    18, 2, 61, 56, 14,
];

/// π destination for the lane at index `x + 5y`: `(x, y) -> (y, 2x + 3y)`.
const PI_DESTINATIONS: [usize; 25] = [
    0, 10, 20, 5, 15, //
    16, 1, 11, 21, 6, //
    7, 17, 2, 12, 22, //
    23, 8, 18, 3, 13, //
    14, 24, 9, 19, 4,
];

/// Applies Keccak-f[1600] to the state in place.
pub fn keccak_f1600(state: &mut [u64; 25]) {
    let mut rotated = [0u64; 25];

    for round_constant in ROUND_CONSTANTS {
        // θ
        let mut columns = [0u64; 5];
        for (x, column) in columns.iter_mut().enumerate() {
            *column = state[x] ^ state[x + 5] ^ state[x + 10] ^ state[x + 15] ^ state[x + 20];
        }
        for x in 0..5 {
            let d = columns[(x + 4) % 5] ^ columns[(x + 1) % 5].rotate_left(1);
            for y in 0..5 {
                state[x + 5 * y] ^= d;
            }
        }

        // ρ and π
        for (i, lane) in state.iter().enumerate() {
            // rotate_left(0) is the identity, no shift-by-64 involved.
            rotated[PI_DESTINATIONS[i]] = lane.rotate_left(RHO_OFFSETS[i]);
        }

        // χ
        for y in 0..5 {
            let row = 5 * y;
            for x in 0..5 {
                state[row + x] = rotated[row + x]
                    ^ (!rotated[row + (x + 1) % 5] & rotated[row + (x + 2) % 5]);
            }
        }

        // ι
        state[0] ^= round_constant;
    }
}

/// Incremental Keccak-256 hasher.
///
/// Feeding the same bytes through any sequence of [`update`](Self::update)
/// calls yields the same digest as [`keccak256`].
#[derive(Clone)]
pub struct Keccak256 {
    state: [u64; 25],
    buffer: [u8; RATE],
    buffered: usize,
}

impl Keccak256 {
    /// Creates a hasher with an all-zero state.
    pub fn new() -> Self {
        Self {
            state: [0; 25],
            buffer: [0; RATE],
            buffered: 0,
        }
    }

    /// Absorbs more input.
    pub fn update(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            let take = (RATE - self.buffered).min(data.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&data[..take]);
            self.buffered += take;
            data = &data[take..];

            if self.buffered == RATE {
                self.absorb_buffer();
            }
        }
    }

    /// Pads, absorbs the final block and squeezes the 32-byte digest.
    pub fn finalize(mut self) -> [u8; OUTPUT_LEN] {
        // The final block always has room for at least one padding byte; when
        // exactly one is left both bits land in it (0x81).
        self.buffer[self.buffered..].fill(0);
        self.buffer[self.buffered] ^= 0x01;
        self.buffer[RATE - 1] ^= 0x80;
        self.absorb_buffer();

        let mut digest = [0u8; OUTPUT_LEN];
        for (chunk, lane) in digest.chunks_exact_mut(8).zip(self.state.iter()) {
            chunk.copy_from_slice(&lane.to_le_bytes());
        }
        digest
    }

    fn absorb_buffer(&mut self) {
        for (lane, chunk) in self.state.iter_mut().zip(self.buffer.chunks_exact(8)) {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            *lane ^= u64::from_le_bytes(bytes);
        }
        keccak_f1600(&mut self.state);
        self.buffered = 0;
    }
}

impl Default for Keccak256 {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the Keccak-256 digest of `data`.
#[inline]
pub fn keccak256(data: &[u8]) -> [u8; OUTPUT_LEN] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize()
}
