//! Session context — explicit, per-operation connection state.
//!
//! Everything an upload needs travels in one value: the ledger client,
//! the selected account, and the target network. There is no ambient
//! session store. Switching network or account means building a new
//! context; an `UploadHandle` borrows its context, so a context cannot
//! be torn down under an in-flight submission.

use std::sync::Arc;

use thiserror::Error;

use filechain_core::config::NetworkConfig;

use crate::ledger::LedgerWrite;
use crate::signer::{AccountId, Signer, SignerProvider};

/// Connection state for one user session against one network.
#[derive(Clone)]
pub struct SessionContext<C> {
    client: Option<C>,
    account: Option<AccountId>,
    network: NetworkConfig,
}

impl<C: LedgerWrite> SessionContext<C> {
    /// A fresh, unconnected session on a network.
    pub fn new(network: NetworkConfig) -> Self {
        Self {
            client: None,
            account: None,
            network,
        }
    }

    /// Attach a connected ledger client.
    pub fn with_client(mut self, client: C) -> Self {
        self.client = Some(client);
        self
    }

    /// Select the signing account.
    pub fn with_account(mut self, account: AccountId) -> Self {
        self.account = Some(account);
        self
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn account(&self) -> Option<AccountId> {
        self.account
    }

    /// Resolve this context into a write handle.
    ///
    /// Binds the signer exactly once; the resulting handle signs every
    /// node of one submission with the same capability.
    pub fn bind(&self, provider: &dyn SignerProvider) -> Result<UploadHandle<'_, C>, SessionError> {
        let client = self.client.as_ref().ok_or(SessionError::NotConnected)?;
        let account = self.account.ok_or(SessionError::Unauthenticated)?;
        let signer = provider
            .signer_for(&account)
            .ok_or(SessionError::Unauthenticated)?;
        Ok(UploadHandle { client, signer })
    }
}

/// A signer-bound ledger write handle, valid for one submission.
pub struct UploadHandle<'a, C> {
    client: &'a C,
    signer: Arc<dyn Signer>,
}

impl<C> UploadHandle<'_, C> {
    pub fn client(&self) -> &C {
        self.client
    }

    pub fn signer(&self) -> &dyn Signer {
        self.signer.as_ref()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no ledger client connected")]
    NotConnected,
    #[error("no signing account attached to this session")]
    Unauthenticated,
}
