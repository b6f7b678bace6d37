//! filechain-client — ledger access, signing, and the upload pipeline.
//!
//! The write path: a `SessionContext` is bound to an `UploadHandle`
//! (ledger client + signer), and an `UploadPipeline` drives a linked
//! chunk chain through it. The read path is the signerless
//! `LookupService`. Both paths speak to any `LedgerRead`/`LedgerWrite`
//! implementation — in-memory for tests and the gateway, HTTP for
//! remote nodes.

pub mod ledger;
pub mod lookup;
pub mod memory;
pub mod pipeline;
pub mod rpc;
pub mod session;
pub mod signer;

pub use ledger::{LedgerEntry, LedgerError, LedgerRead, LedgerWrite, SignedEntry, TxRef};
pub use lookup::{LookupError, LookupService};
pub use memory::MemoryLedger;
pub use pipeline::{UploadError, UploadPipeline, UploadState};
pub use rpc::RpcLedger;
pub use session::{SessionContext, SessionError, UploadHandle};
pub use signer::{AccountId, DevKeyring, Signer, SignerProvider};
