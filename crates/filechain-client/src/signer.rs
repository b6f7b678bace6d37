//! Signing — binding ledger writes to an account.
//!
//! The pipeline never sees key material. It asks a `SignerProvider` for
//! the capability to sign as one account, exactly once per submission,
//! and uses the returned `Signer` for every node in that chain.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use dashmap::DashMap;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use thiserror::Error;

/// An account identifier — the Ed25519 public key of the signing account.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub [u8; 32]);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({}…)", hex::encode(&self.0[..6]))
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| AccountIdError::InvalidLength(b.len()))?;
        Ok(Self(bytes))
    }
}

#[derive(Debug, Error)]
pub enum AccountIdError {
    #[error("account id must be 32 bytes, got {0}")]
    InvalidLength(usize),
    #[error("invalid hex in account id: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// A capability to sign ledger writes as one account.
pub trait Signer: Send + Sync {
    fn account(&self) -> AccountId;
    fn sign(&self, msg: &[u8]) -> [u8; 64];
}

/// Resolves an account identifier to a signing capability.
///
/// In production this fronts an external wallet or keystore; key custody
/// is not this crate's concern.
pub trait SignerProvider: Send + Sync {
    fn signer_for(&self, account: &AccountId) -> Option<Arc<dyn Signer>>;
}

// ── Dev keyring ───────────────────────────────────────────────────────────────

/// In-memory keyring for development and tests.
///
/// Keys are generated on demand and never persisted.
#[derive(Clone, Default)]
pub struct DevKeyring {
    keys: Arc<DashMap<AccountId, SigningKey>>,
}

impl DevKeyring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a fresh account and return its identifier.
    pub fn generate(&self) -> AccountId {
        let key = SigningKey::generate(&mut OsRng);
        let account = AccountId(key.verifying_key().to_bytes());
        self.keys.insert(account, key);
        account
    }
}

struct KeySigner {
    account: AccountId,
    key: SigningKey,
}

impl Signer for KeySigner {
    fn account(&self) -> AccountId {
        self.account
    }

    fn sign(&self, msg: &[u8]) -> [u8; 64] {
        ed25519_dalek::Signer::sign(&self.key, msg).to_bytes()
    }
}

impl SignerProvider for DevKeyring {
    fn signer_for(&self, account: &AccountId) -> Option<Arc<dyn Signer>> {
        self.keys.get(account).map(|key| {
            Arc::new(KeySigner {
                account: *account,
                key: key.clone(),
            }) as Arc<dyn Signer>
        })
    }
}
