//! EME (ECB-Mix-ECB) wide-block tweakable cipher.
//!
//! EME turns a 16-byte block cipher into a pseudorandom permutation over
//! messages of 1 to 128 blocks. Every output byte depends on every input byte
//! and on the tweak: changing a single ciphertext bit garbles the whole
//! decrypted message, which is what per-sector disk encryption needs.
//!
//! Construction (Halevi-Rogaway):
//! - ECB pass over the input, each block masked with its L-table entry
//! - Mix step: all blocks are folded with the tweak, enciphered once and spread
//!   back over the message with a GF(2^128) doubling chain
//! - ECB pass over the mixed blocks, unmasked with the L-table
//!
//! Security properties:
//! - Ciphertext length equals plaintext length (no expansion)
//! - Deterministic: equal (key, tweak, message) gives equal output
//! - No authentication - consider AEAD if integrity protection is needed
//! - Message length: 16 to 2048 bytes, a multiple of 16

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use aes::{Aes128, Aes192, Aes256};

use crate::cipher_block::{AesBlock, AesCipher, AnyAesBlock, BlockCipher};
use crate::common::{
    BLOCK_LENGTH, Block, Direction, Error, MAX_BLOCKS, MAX_MESSAGE_LENGTH, mult_by_two, xor_blocks,
    xor_into,
};

fn cipher_transform<C: BlockCipher + ?Sized>(
    bc: &C,
    dst: &mut [u8],
    src: &[u8],
    direction: Direction,
) -> Result<(), Error> {
    match direction {
        Direction::Encrypt => bc.encrypt(dst, src),
        Direction::Decrypt => bc.decrypt(dst, src),
    }
}

/// Compute the L-table for a message of `m` blocks.
///
/// Entry 0 is `2 * E(K; 0)`, every following entry doubles the previous one.
/// The zero block is always encrypted, whatever the direction of the
/// transform that consumes the table.
///
/// # Errors
/// - `Error::InvalidBlockSize` if the cipher block length is not 16
/// - `Error::InvalidMessageLength` if `m` is not in `1..=MAX_BLOCKS`
/// - any error reported by the cipher
pub fn tabulate_l<C: BlockCipher + ?Sized>(bc: &C, m: usize) -> Result<Vec<Block>, Error> {
    if bc.block_size() != BLOCK_LENGTH {
        return Err(Error::InvalidBlockSize);
    }
    if m == 0 || m > MAX_BLOCKS {
        return Err(Error::InvalidMessageLength);
    }

    let mut li = [0u8; BLOCK_LENGTH];
    bc.encrypt(&mut li, &[0u8; BLOCK_LENGTH])?;

    let mut l_table = Vec::with_capacity(m);
    for _ in 0..m {
        li = mult_by_two(&li);
        l_table.push(li);
    }
    Ok(l_table)
}

/// Validate everything that can be checked without calling the cipher.
/// Returns the block count.
fn check_preconditions<C: BlockCipher + ?Sized>(
    bc: &C,
    tweak: &[u8],
    input: &[u8],
) -> Result<usize, Error> {
    if bc.block_size() != BLOCK_LENGTH {
        tracing::debug!(block_size = bc.block_size(), "EME needs a 16-byte block cipher");
        return Err(Error::InvalidBlockSize);
    }
    if tweak.len() != BLOCK_LENGTH {
        tracing::debug!(tweak_len = tweak.len(), "rejecting EME tweak");
        return Err(Error::InvalidTweakLength);
    }
    if input.len() % BLOCK_LENGTH != 0 {
        tracing::debug!(input_len = input.len(), "EME input is not block aligned");
        return Err(Error::InvalidMessageLength);
    }
    let m = input.len() / BLOCK_LENGTH;
    if m == 0 || m > MAX_BLOCKS {
        tracing::debug!(blocks = m, max = MAX_BLOCKS, "EME block count out of range");
        return Err(Error::InvalidMessageLength);
    }
    Ok(m)
}

/// EME-encrypt or EME-decrypt `input` under `tweak` into a fresh buffer.
///
/// The input is called P and the output C regardless of direction, since
/// both directions run the same three passes with the cipher reversed.
///
/// # Errors
/// - `Error::InvalidBlockSize` if the cipher block length is not 16
/// - `Error::InvalidTweakLength` if `tweak` is not 16 bytes
/// - `Error::InvalidMessageLength` if `input` is not 1 to 128 whole blocks
/// - any error reported by the cipher
///
/// All length checks happen before the cipher is first called.
pub fn transform<C: BlockCipher + ?Sized>(
    bc: &C,
    tweak: &[u8],
    input: &[u8],
    direction: Direction,
) -> Result<Vec<u8>, Error> {
    let m = check_preconditions(bc, tweak, input)?;
    let mut output = vec![0u8; input.len()];
    if let Err(err) = eme(bc, tweak, input, &mut output, direction) {
        tracing::debug!(?direction, blocks = m, %err, "EME transform aborted");
        return Err(err);
    }
    Ok(output)
}

/// Same as [`transform`], writing into a caller-provided buffer.
///
/// `output` must be as long as `input` and is used as scratch space from the
/// first write on; it is zero-filled if the cipher fails midway.
///
/// # Errors
/// Same as [`transform`], plus `Error::BufferLengthMismatch` if `output`
/// and `input` differ in length.
pub fn transform_into<C: BlockCipher + ?Sized>(
    bc: &C,
    tweak: &[u8],
    input: &[u8],
    output: &mut [u8],
    direction: Direction,
) -> Result<(), Error> {
    let m = check_preconditions(bc, tweak, input)?;
    if output.len() != input.len() {
        return Err(Error::BufferLengthMismatch);
    }

    let result = eme(bc, tweak, input, output, direction);
    if let Err(err) = result {
        tracing::debug!(?direction, blocks = m, %err, "EME transform aborted");
        output.fill(0);
    }
    result
}

fn eme<C: BlockCipher + ?Sized>(
    bc: &C,
    t: &[u8],
    p: &[u8],
    c: &mut [u8],
    direction: Direction,
) -> Result<(), Error> {
    let l_table = tabulate_l(bc, p.len() / BLOCK_LENGTH)?;

    let mut ppj = [0u8; BLOCK_LENGTH];
    for ((pj, cj), lj) in p
        .chunks_exact(BLOCK_LENGTH)
        .zip(c.chunks_exact_mut(BLOCK_LENGTH))
        .zip(&l_table)
    {
        // PPj = 2^(j-1) * L xor Pj
        xor_blocks(&mut ppj, pj, lj)?;
        // PPPj = E(K; PPj)
        cipher_transform(bc, cj, &ppj, direction)?;
    }

    let (c0, rest) = c.split_at_mut(BLOCK_LENGTH);

    // MP = (xorSum PPPj) xor T
    let mut mp = [0u8; BLOCK_LENGTH];
    xor_blocks(&mut mp, c0, t)?;
    for cj in rest.chunks_exact(BLOCK_LENGTH) {
        xor_into(&mut mp, cj)?;
    }

    // MC = E(K; MP)
    let mut mc = [0u8; BLOCK_LENGTH];
    cipher_transform(bc, &mut mc, &mp, direction)?;

    // M = MP xor MC
    let mut mm = [0u8; BLOCK_LENGTH];
    xor_blocks(&mut mm, &mp, &mc)?;
    for cj in rest.chunks_exact_mut(BLOCK_LENGTH) {
        mm = mult_by_two(&mm);
        // CCCj = 2^(j-1) * M xor PPPj
        xor_into(cj, &mm)?;
    }

    // CCC1 = (xorSum CCCj) xor T xor MC
    let mut ccc1 = [0u8; BLOCK_LENGTH];
    xor_blocks(&mut ccc1, &mc, t)?;
    for cj in rest.chunks_exact(BLOCK_LENGTH) {
        xor_into(&mut ccc1, cj)?;
    }
    c0.copy_from_slice(&ccc1);

    let mut ccj = [0u8; BLOCK_LENGTH];
    for (cj, lj) in c.chunks_exact_mut(BLOCK_LENGTH).zip(&l_table) {
        ccj.copy_from_slice(cj);
        // CCj = E(K; CCCj)
        cipher_transform(bc, cj, &ccj, direction)?;
        // Cj = 2^(j-1) * L xor CCj
        xor_into(cj, lj)?;
    }

    Ok(())
}

/// EME wide-block cipher over a block cipher capability.
///
/// Holds no state besides the capability: it is `Send`/`Sync` whenever `C`
/// is, and any number of calls may share one instance if `C` allows it.
#[derive(Clone, Debug)]
pub struct Eme<C: BlockCipher> {
    bc: C,
}

/// EME with AES-128.
#[allow(non_camel_case_types)]
pub type Eme_128 = Eme<AesBlock<Aes128>>;

/// EME with AES-192.
#[allow(non_camel_case_types)]
pub type Eme_192 = Eme<AesBlock<Aes192>>;

/// EME with AES-256.
#[allow(non_camel_case_types)]
pub type Eme_256 = Eme<AesBlock<Aes256>>;

impl<C: BlockCipher> Eme<C> {
    /// Block length in bytes (always 16).
    pub const BLOCK_LENGTH: usize = BLOCK_LENGTH;

    /// Minimum input length in bytes.
    pub const MIN_INPUT_LENGTH: usize = BLOCK_LENGTH;

    /// Maximum input length in bytes.
    pub const MAX_INPUT_LENGTH: usize = MAX_MESSAGE_LENGTH;

    /// Wrap a key-bound block cipher.
    pub fn new(bc: C) -> Self {
        Self { bc }
    }

    /// The wrapped block cipher.
    pub fn cipher(&self) -> &C {
        &self.bc
    }

    /// Unwrap the block cipher.
    pub fn into_inner(self) -> C {
        self.bc
    }

    /// Encrypt plaintext using EME.
    ///
    /// # Arguments
    /// * `tweak` - 16-byte tweak, e.g. the sector number
    /// * `plaintext` - 16 to 2048 bytes, a multiple of 16
    ///
    /// # Errors
    /// See [`transform`].
    pub fn encrypt(&self, tweak: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        transform(&self.bc, tweak, plaintext, Direction::Encrypt)
    }

    /// Decrypt ciphertext using EME.
    ///
    /// # Errors
    /// See [`transform`].
    pub fn decrypt(&self, tweak: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        transform(&self.bc, tweak, ciphertext, Direction::Decrypt)
    }

    /// Encrypt `plaintext` into `ciphertext`, which must have the same length.
    ///
    /// # Errors
    /// See [`transform_into`].
    pub fn encrypt_into(
        &self,
        tweak: &[u8],
        plaintext: &[u8],
        ciphertext: &mut [u8],
    ) -> Result<(), Error> {
        transform_into(&self.bc, tweak, plaintext, ciphertext, Direction::Encrypt)
    }

    /// Decrypt `ciphertext` into `plaintext`, which must have the same length.
    ///
    /// # Errors
    /// See [`transform_into`].
    pub fn decrypt_into(
        &self,
        tweak: &[u8],
        ciphertext: &[u8],
        plaintext: &mut [u8],
    ) -> Result<(), Error> {
        transform_into(&self.bc, tweak, ciphertext, plaintext, Direction::Decrypt)
    }
}

impl<Aes: AesCipher> Eme<AesBlock<Aes>> {
    /// Encryption key length in bytes.
    pub const KEY_LENGTH: usize = Aes::KEY_LEN;

    /// Initialize EME over AES from a raw key.
    ///
    /// # Errors
    /// Returns `Error::InvalidKeyLength` if `key` is not `KEY_LENGTH` bytes.
    pub fn from_key(key: &[u8]) -> Result<Self, Error> {
        AesBlock::new(key).map(Self::new)
    }
}

impl Eme<AnyAesBlock> {
    /// Initialize EME over AES-128, AES-192 or AES-256, chosen by key length.
    ///
    /// # Errors
    /// Returns `Error::InvalidKeyLength` for keys that are not 16, 24 or 32 bytes.
    pub fn from_key(key: &[u8]) -> Result<Self, Error> {
        AnyAesBlock::new(key).map(Self::new)
    }
}
