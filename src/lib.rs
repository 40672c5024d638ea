//! EME (ECB-Mix-ECB) length-preserving encryption library.
//!
//! This crate implements EME, the wide-block tweakable cipher mode of Halevi
//! and Rogaway, on top of any 16-byte block cipher (usually AES).
//!
//! # Overview
//!
//! EME enciphers 16 to 2048 bytes (1 to 128 blocks) as a single pseudorandom
//! permutation. Unlike ECB or CBC, flipping any ciphertext bit scrambles the
//! entire decrypted message. Suitable applications:
//! - Per-sector disk encryption, with the sector number as tweak
//! - Filename encryption
//!
//! # Quick Start
//!
//! ```rust
//! use eme::Eme_256;
//!
//! let key = [0u8; 32];
//! let cipher = Eme_256::from_key(&key).unwrap();
//!
//! let sector = 42u128;
//! let tweak = sector.to_le_bytes();
//! let plaintext = [0x61u8; 512];
//!
//! let ciphertext = cipher.encrypt(&tweak, &plaintext).unwrap();
//! let decrypted = cipher.decrypt(&tweak, &ciphertext).unwrap();
//! assert_eq!(plaintext.as_slice(), decrypted.as_slice());
//! ```
//!
//! ## Custom block ciphers
//!
//! The transform only needs the [`BlockCipher`] capability, so any 16-byte
//! primitive can be plugged in:
//!
//! ```rust
//! use eme::{AnyAesBlock, Eme};
//!
//! // AES-128, AES-192 or AES-256 depending on the key length
//! let cipher = Eme::new(AnyAesBlock::new(&[7u8; 24]).unwrap());
//! let ciphertext = cipher.encrypt(&[0u8; 16], &[0u8; 32]).unwrap();
//! assert_eq!(ciphertext.len(), 32);
//! ```
//!
//! # Security Considerations
//!
//! - **Deterministic**: equal (key, tweak, plaintext) yields equal ciphertext
//! - **No authentication**: use AEAD when integrity is needed
//! - **No padding**: input must already be a multiple of 16 bytes
//!
//! # Feature Flags
//!
//! - `std` (default): Enable standard library support
//! - When disabled, the crate is `no_std` compatible (requires `alloc`)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod cipher_block;
pub mod common;
pub mod eme;


pub use cipher_block::{AesBlock, AesCipher, AnyAesBlock, BlockCipher};
pub use common::{
    BLOCK_LENGTH, Block, Direction, Error, MAX_BLOCKS, MAX_MESSAGE_LENGTH, mult_by_two,
    try_mult_by_two, xor_blocks, xor_into,
};
pub use eme::{Eme, Eme_128, Eme_192, Eme_256, tabulate_l, transform, transform_into};
