//! Block cipher capability consumed by the EME transform.
//!
//! EME never touches key material itself: it drives a key-bound cipher through
//! the [`BlockCipher`] trait. [`AesBlock`] adapts the `aes` crate with the key
//! size fixed at compile time, [`AnyAesBlock`] picks AES-128/192/256 from the
//! length of the key at runtime.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use aes::cipher::consts::U16;
use aes::cipher::{Array, BlockCipherDecrypt, BlockCipherEncrypt, BlockSizeUser, KeyInit};
use aes::{Aes128, Aes192, Aes256};

use crate::common::{BLOCK_LENGTH, Block, Error};

/// A key-bound block cipher able to transform one block in either direction.
///
/// `dst` and `src` are both exactly [`block_size`](BlockCipher::block_size)
/// bytes long. Implementations report primitive failures as
/// `Error::UnderlyingCipherFailure`.
pub trait BlockCipher {
    /// Block length in bytes. EME requires 16.
    fn block_size(&self) -> usize;

    /// Encrypt one block from `src` into `dst`.
    fn encrypt(&self, dst: &mut [u8], src: &[u8]) -> Result<(), Error>;

    /// Decrypt one block from `src` into `dst`.
    fn decrypt(&self, dst: &mut [u8], src: &[u8]) -> Result<(), Error>;
}

impl<C: BlockCipher + ?Sized> BlockCipher for &C {
    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn encrypt(&self, dst: &mut [u8], src: &[u8]) -> Result<(), Error> {
        (**self).encrypt(dst, src)
    }

    fn decrypt(&self, dst: &mut [u8], src: &[u8]) -> Result<(), Error> {
        (**self).decrypt(dst, src)
    }
}

impl<C: BlockCipher + ?Sized> BlockCipher for Box<C> {
    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn encrypt(&self, dst: &mut [u8], src: &[u8]) -> Result<(), Error> {
        (**self).encrypt(dst, src)
    }

    fn decrypt(&self, dst: &mut [u8], src: &[u8]) -> Result<(), Error> {
        (**self).decrypt(dst, src)
    }
}

/// Trait for AES ciphers usable as an EME capability.
pub trait AesCipher:
    BlockCipherEncrypt + BlockSizeUser<BlockSize = U16> + KeyInit + Clone
{
    type Dec: BlockCipherDecrypt + BlockSizeUser<BlockSize = U16> + KeyInit + Clone;
    const KEY_LEN: usize;
}

impl AesCipher for Aes128 {
    type Dec = aes::Aes128Dec;
    const KEY_LEN: usize = 16;
}

impl AesCipher for Aes192 {
    type Dec = aes::Aes192Dec;
    const KEY_LEN: usize = 24;
}

impl AesCipher for Aes256 {
    type Dec = aes::Aes256Dec;
    const KEY_LEN: usize = 32;
}

fn block_args<'a>(
    dst: &'a mut [u8],
    src: &'a [u8],
) -> Result<(&'a mut Block, &'a Block), Error> {
    let dst: &mut Block = dst.try_into().map_err(|_| Error::BufferLengthMismatch)?;
    let src: &Block = src.try_into().map_err(|_| Error::BufferLengthMismatch)?;
    Ok((dst, src))
}

/// AES in raw, unpadded single-block mode.
#[derive(Clone)]
pub struct AesBlock<Aes: AesCipher> {
    ks_enc: Aes,
    ks_dec: Aes::Dec,
}

impl<Aes: AesCipher> AesBlock<Aes> {
    /// Encryption key length in bytes.
    pub const KEY_LENGTH: usize = Aes::KEY_LEN;

    /// Expand the encryption and decryption key schedules from `key`.
    ///
    /// # Errors
    /// Returns `Error::InvalidKeyLength` if `key` is not `KEY_LENGTH` bytes.
    pub fn new(key: &[u8]) -> Result<Self, Error> {
        let ks_enc = Aes::new_from_slice(key).map_err(|_| Error::InvalidKeyLength)?;
        let ks_dec = Aes::Dec::new_from_slice(key).map_err(|_| Error::InvalidKeyLength)?;
        Ok(Self { ks_enc, ks_dec })
    }
}

impl<Aes: AesCipher> BlockCipher for AesBlock<Aes> {
    fn block_size(&self) -> usize {
        BLOCK_LENGTH
    }

    fn encrypt(&self, dst: &mut [u8], src: &[u8]) -> Result<(), Error> {
        let (dst, src) = block_args(dst, src)?;
        let mut block = Array::from(*src);
        self.ks_enc.encrypt_block(&mut block);
        dst.copy_from_slice(block.as_slice());
        Ok(())
    }

    fn decrypt(&self, dst: &mut [u8], src: &[u8]) -> Result<(), Error> {
        let (dst, src) = block_args(dst, src)?;
        let mut block = Array::from(*src);
        self.ks_dec.decrypt_block(&mut block);
        dst.copy_from_slice(block.as_slice());
        Ok(())
    }
}

/// AES with the variant chosen by key length: 16, 24 or 32 bytes select
/// AES-128, AES-192 or AES-256.
#[derive(Clone)]
pub enum AnyAesBlock {
    Aes128(AesBlock<Aes128>),
    Aes192(AesBlock<Aes192>),
    Aes256(AesBlock<Aes256>),
}

impl AnyAesBlock {
    /// # Errors
    /// Returns `Error::InvalidKeyLength` for keys that are not 16, 24 or 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, Error> {
        match key.len() {
            16 => AesBlock::new(key).map(Self::Aes128),
            24 => AesBlock::new(key).map(Self::Aes192),
            32 => AesBlock::new(key).map(Self::Aes256),
            len => {
                tracing::debug!(key_len = len, "rejecting AES key");
                Err(Error::InvalidKeyLength)
            }
        }
    }

    fn inner(&self) -> &dyn BlockCipher {
        match self {
            Self::Aes128(c) => c,
            Self::Aes192(c) => c,
            Self::Aes256(c) => c,
        }
    }
}

impl BlockCipher for AnyAesBlock {
    fn block_size(&self) -> usize {
        BLOCK_LENGTH
    }

    fn encrypt(&self, dst: &mut [u8], src: &[u8]) -> Result<(), Error> {
        self.inner().encrypt(dst, src)
    }

    fn decrypt(&self, dst: &mut [u8], src: &[u8]) -> Result<(), Error> {
        self.inner().decrypt(dst, src)
    }
}

impl core::fmt::Debug for AnyAesBlock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Aes128(_) => "AES-128",
            Self::Aes192(_) => "AES-192",
            Self::Aes256(_) => "AES-256",
        };
        write!(f, "AnyAesBlock({name})")
    }
}
