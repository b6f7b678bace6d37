//! Content identifiers.
//!
//! A `Cid` is a self-describing address for a blob: a four-byte prefix
//! naming the format and hash algorithm, followed by the BLAKE3-256
//! digest of the content. Identical bytes always yield an identical CID,
//! which is what makes deduplication and upload retries safe.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// CID format version.
const VERSION: u8 = 0x01;
/// Content codec: raw bytes.
const CODEC_RAW: u8 = 0x55;
/// Hash algorithm: BLAKE3-256.
const HASH_BLAKE3: u8 = 0x1e;
/// Digest length in bytes.
const DIGEST_LEN: u8 = 32;

/// Byte length of an encoded CID (prefix + digest).
pub const CID_LEN: usize = 4 + 32;

/// A content identifier — the address of one chunk of data.
///
/// Derived solely from the bytes it addresses. No position, filename,
/// or timestamp goes into it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cid {
    digest: [u8; 32],
}

impl Cid {
    /// Address a byte slice.
    pub fn of(data: &[u8]) -> Self {
        Self {
            digest: *blake3::hash(data).as_bytes(),
        }
    }

    /// The raw BLAKE3 digest, without the self-describing prefix.
    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    /// Encode as prefix + digest.
    pub fn to_bytes(&self) -> [u8; CID_LEN] {
        let mut out = [0u8; CID_LEN];
        out[0] = VERSION;
        out[1] = CODEC_RAW;
        out[2] = HASH_BLAKE3;
        out[3] = DIGEST_LEN;
        out[4..].copy_from_slice(&self.digest);
        out
    }

    /// Decode from prefix + digest, rejecting unknown encodings.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CidError> {
        if bytes.len() != CID_LEN {
            return Err(CidError::InvalidLength(bytes.len()));
        }
        if bytes[..4] != [VERSION, CODEC_RAW, HASH_BLAKE3, DIGEST_LEN] {
            return Err(CidError::UnsupportedPrefix);
        }
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&bytes[4..]);
        Ok(Self { digest })
    }

    /// Short digest prefix for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.digest[..6])
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({}…)", self.short())
    }
}

impl FromStr for Cid {
    type Err = CidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }
}

impl Serialize for Cid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Error)]
pub enum CidError {
    #[error("CID must be {CID_LEN} bytes, got {0}")]
    InvalidLength(usize),
    #[error("unrecognized CID prefix")]
    UnsupportedPrefix,
    #[error("invalid hex in CID: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
