//! # vanity_engine
//!
//! Ethereum vanity address engine built on its own Keccak-256 and secp256k1
//! arithmetic.
//!
//! ## Architecture
//!
//! - `crypto`: Keccak-256, curve arithmetic, key → address derivation
//! - `matcher`: Prefix/suffix pattern matching and difficulty estimates
//! - `worker`: Search session state machine, worker threads, pool
//! - `protocol`: Request / progress / result messages
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod matcher;
pub mod protocol;
pub mod worker;

pub use config::Config;
pub use crypto::{private_key_to_address, Address, Keypair};
pub use matcher::{Pattern, PatternError};
pub use protocol::{Message, Request, VanityResult};
pub use worker::{CancelToken, PoolOptions, SearchError, SearchSession, WorkerPool};
