//! Common definitions shared by the EME transform and its block cipher capabilities.

/// Unified error type for all EME operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The block cipher's block length is not 16 bytes.
    InvalidBlockSize,
    /// Tweak is not exactly 16 bytes.
    InvalidTweakLength,
    /// Message is not a multiple of 16 bytes, or holds 0 or more than 128 blocks.
    InvalidMessageLength,
    /// Two buffers that must have the same length do not.
    BufferLengthMismatch,
    /// AES key is not 16, 24 or 32 bytes.
    InvalidKeyLength,
    /// The block cipher capability reported a failure.
    UnderlyingCipherFailure,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidBlockSize => write!(f, "block cipher block size must be 16 bytes"),
            Error::InvalidTweakLength => write!(f, "tweak must be 16 bytes long"),
            Error::InvalidMessageLength => write!(
                f,
                "message must be a multiple of 16 bytes holding 1 to {MAX_BLOCKS} blocks"
            ),
            Error::BufferLengthMismatch => write!(f, "buffer lengths do not match"),
            Error::InvalidKeyLength => write!(f, "invalid key length"),
            Error::UnderlyingCipherFailure => write!(f, "underlying block cipher failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Block length in bytes of the underlying cipher.
pub const BLOCK_LENGTH: usize = 16;

/// Maximum number of cipher blocks in a single EME message.
pub const MAX_BLOCKS: usize = 16 * 8;

/// Maximum message length in bytes.
pub const MAX_MESSAGE_LENGTH: usize = MAX_BLOCKS * BLOCK_LENGTH;

/// A single cipher block.
pub type Block = [u8; BLOCK_LENGTH];

/// Direction of cipher operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// Multiply by 2 in GF(2^128).
///
/// Uses the polynomial x^128 + x^7 + x^2 + x + 1 with the byte order of
/// IEEE P1619 (XTS): carries travel from byte `j - 1` into byte `j`, and the
/// bit shifted out of byte 15 folds back into byte 0 as `0x87`.
/// The reduction is applied through a mask, so timing does not depend on the
/// top bit of the input.
#[inline]
pub fn mult_by_two(input: &Block) -> Block {
    let mut result = *input;

    let msb = result[15] >> 7;
    let mask = 0u8.wrapping_sub(msb);

    let mut carry: u8 = 0;
    for byte in result.iter_mut() {
        let new_carry = (*byte & 0x80) >> 7;
        *byte = (*byte << 1) | carry;
        carry = new_carry;
    }

    result[0] ^= 0x87 & mask;

    result
}

/// Slice form of [`mult_by_two`].
///
/// # Errors
/// Returns `Error::BufferLengthMismatch` unless `input` is exactly 16 bytes.
pub fn try_mult_by_two(input: &[u8]) -> Result<Block, Error> {
    let block: &Block = input
        .try_into()
        .map_err(|_| Error::BufferLengthMismatch)?;
    Ok(mult_by_two(block))
}

/// XOR `in1` and `in2` into `dst`.
///
/// # Errors
/// Returns `Error::BufferLengthMismatch` if the three buffers differ in length.
pub fn xor_blocks(dst: &mut [u8], in1: &[u8], in2: &[u8]) -> Result<(), Error> {
    if in1.len() != in2.len() || dst.len() != in1.len() {
        return Err(Error::BufferLengthMismatch);
    }
    for ((d, a), b) in dst.iter_mut().zip(in1).zip(in2) {
        *d = a ^ b;
    }
    Ok(())
}

/// XOR `src` into `dst` in place.
///
/// This is the aliased form of [`xor_blocks`], where the destination is also
/// the first operand.
///
/// # Errors
/// Returns `Error::BufferLengthMismatch` if the buffers differ in length.
pub fn xor_into(dst: &mut [u8], src: &[u8]) -> Result<(), Error> {
    if dst.len() != src.len() {
        return Err(Error::BufferLengthMismatch);
    }
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
    Ok(())
}
