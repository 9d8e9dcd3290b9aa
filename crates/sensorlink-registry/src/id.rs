//! Opaque byte identities.

use std::fmt;

use crate::error::{RegistryError, Result};

/// Longest identity the registry accepts, in bytes.
pub const MAX_ID_LEN: usize = 16;

/// An opaque node or sensor identity: 1 to 16 bytes, matched byte-for-byte.
///
/// Identities are stored inline in a fixed buffer so registry entries never
/// allocate after construction. Two identities are equal only when their
/// lengths and every byte agree; no truncation or prefix matching happens
/// anywhere.
#[derive(Clone, Copy)]
pub struct ByteId {
    bytes: [u8; MAX_ID_LEN],
    len: u8,
}

impl ByteId {
    /// Copies an identity into its inline buffer.
    ///
    /// Rejects empty identities and identities longer than [`MAX_ID_LEN`].
    pub fn new(id: &[u8]) -> Result<Self> {
        if id.is_empty() || id.len() > MAX_ID_LEN {
            return Err(RegistryError::InvalidId(id.len()));
        }
        let mut bytes = [0u8; MAX_ID_LEN];
        bytes[..id.len()].copy_from_slice(id);
        Ok(Self {
            bytes,
            len: id.len() as u8,
        })
    }

    /// The identity bytes, exactly as supplied to [`ByteId::new`].
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

impl PartialEq for ByteId {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ByteId {}

impl PartialEq<[u8]> for ByteId {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl fmt::Debug for ByteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteId({self})")
    }
}

impl fmt::Display for ByteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.as_bytes() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
