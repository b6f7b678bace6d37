//! End-to-end upload tests against the in-memory ledger.

use filechain_core::config::NetworkConfig;
use filechain_core::dag::chunk_and_link;
use filechain_client::ledger::LedgerRead;
use filechain_client::{
    DevKeyring, LookupService, MemoryLedger, SessionContext, UploadPipeline, UploadState,
};

use crate::test_bytes;

fn dev_session(ledger: MemoryLedger, keyring: &DevKeyring) -> SessionContext<MemoryLedger> {
    let account = keyring.generate();
    SessionContext::new(NetworkConfig::default())
        .with_client(ledger)
        .with_account(account)
}

/// A multi-chunk file survives the full pipeline and comes back intact.
#[tokio::test]
async fn upload_then_fetch_roundtrip() {
    let ledger = MemoryLedger::new();
    let keyring = DevKeyring::new();
    let session = dev_session(ledger.clone(), &keyring);
    let pipeline = UploadPipeline::new();

    let data = test_bytes(300_000);
    let chain = chunk_and_link(&data, 64 * 1024).unwrap();
    assert_eq!(chain.len(), 5);
    let root = chain.root_cid().unwrap();

    let tx = pipeline.upload(&session, &keyring, &chain).await.unwrap();
    assert!(!tx.as_str().is_empty());

    let lookup = LookupService::new(ledger);
    assert!(lookup.exists(&root).await.unwrap());
    assert_eq!(lookup.fetch(&root).await.unwrap().unwrap(), data);
}

/// Two files ending in the same bytes share their tail nodes on the
/// ledger; both files remain independently reconstructible.
///
/// Only a shared, chunk-aligned suffix deduplicates: identical tail
/// chunks carry identical links all the way to the terminal node, so
/// the whole tail collapses to the same entries. A shared prefix does
/// not — its last shared chunk links to a different successor in each
/// file, and the chains diverge from the root onward.
#[tokio::test]
async fn shared_suffix_deduplicates_across_files() {
    let ledger = MemoryLedger::new();
    let keyring = DevKeyring::new();
    let session = dev_session(ledger.clone(), &keyring);
    let pipeline = UploadPipeline::new();

    let tail = test_bytes(4096);
    let mut file_a: Vec<u8> = test_bytes(2048).iter().map(|b| b ^ 0x11).collect();
    file_a.extend_from_slice(&tail);
    let mut file_b: Vec<u8> = test_bytes(2048).iter().map(|b| b ^ 0x22).collect();
    file_b.extend_from_slice(&tail);

    let chain_a = chunk_and_link(&file_a, 1024).unwrap();
    let chain_b = chunk_and_link(&file_b, 1024).unwrap();
    assert_eq!(chain_a.len(), 6);

    pipeline.upload(&session, &keyring, &chain_a).await.unwrap();
    let after_a = ledger.len();
    pipeline.upload(&session, &keyring, &chain_b).await.unwrap();

    // b's four tail nodes are already present; only its two head chunks
    // (and nothing else) are new entries.
    assert_eq!(ledger.len(), after_a + 2);

    let lookup = LookupService::new(ledger);
    assert_eq!(
        lookup.fetch(&chain_a.root_cid().unwrap()).await.unwrap().unwrap(),
        file_a
    );
    assert_eq!(
        lookup.fetch(&chain_b.root_cid().unwrap()).await.unwrap().unwrap(),
        file_b
    );
}

/// Two uploads racing on one pipeline serialize instead of clobbering
/// each other; both confirm and both files are retrievable.
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_uploads_serialize() {
    let ledger = MemoryLedger::new();
    let keyring = DevKeyring::new();
    let session = dev_session(ledger.clone(), &keyring);
    let pipeline = UploadPipeline::new();

    let file_a = test_bytes(50_000);
    let file_b: Vec<u8> = test_bytes(50_000).iter().map(|b| b ^ 0x5A).collect();
    let chain_a = chunk_and_link(&file_a, 4096).unwrap();
    let chain_b = chunk_and_link(&file_b, 4096).unwrap();

    let (ra, rb) = tokio::join!(
        pipeline.upload(&session, &keyring, &chain_a),
        pipeline.upload(&session, &keyring, &chain_b),
    );
    ra.unwrap();
    rb.unwrap();

    let lookup = LookupService::new(ledger);
    assert_eq!(
        lookup.fetch(&chain_a.root_cid().unwrap()).await.unwrap().unwrap(),
        file_a
    );
    assert_eq!(
        lookup.fetch(&chain_b.root_cid().unwrap()).await.unwrap().unwrap(),
        file_b
    );
}

/// A failed upload leaves no confirmed state behind, and retrying after
/// the fault clears succeeds cleanly.
#[tokio::test]
async fn retry_after_failure_succeeds() {
    let ledger = MemoryLedger::new();
    let keyring = DevKeyring::new();
    let session = dev_session(ledger.clone(), &keyring);
    let pipeline = UploadPipeline::new();

    let data = test_bytes(20_000);
    let chain = chunk_and_link(&data, 4096).unwrap();
    let root = chain.root_cid().unwrap();

    ledger.reject_after(2);
    pipeline
        .upload(&session, &keyring, &chain)
        .await
        .unwrap_err();
    assert!(matches!(pipeline.state(), UploadState::Failed(_)));
    assert!(!ledger.exists(&root).await.unwrap());

    // Fault clears; the caller retries the same chain. Chunks that made
    // it through the first attempt are skipped, not duplicated.
    ledger.reject_after(u64::MAX);
    pipeline.upload(&session, &keyring, &chain).await.unwrap();

    let lookup = LookupService::new(ledger);
    assert_eq!(lookup.fetch(&root).await.unwrap().unwrap(), data);
}

/// An empty file is a real, retrievable one-node chain.
#[tokio::test]
async fn empty_file_uploads_and_fetches() {
    let ledger = MemoryLedger::new();
    let keyring = DevKeyring::new();
    let session = dev_session(ledger.clone(), &keyring);
    let pipeline = UploadPipeline::new();

    let chain = chunk_and_link(&[], 1024).unwrap();
    let root = chain.root_cid().unwrap();
    pipeline.upload(&session, &keyring, &chain).await.unwrap();

    let lookup = LookupService::new(ledger);
    assert_eq!(lookup.fetch(&root).await.unwrap(), Some(Vec::new()));
}
