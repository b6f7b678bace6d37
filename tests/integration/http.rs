//! Gateway HTTP tests — the same pipeline, over the wire.

use filechain_core::config::NetworkConfig;
use filechain_core::dag::chunk_and_link;
use filechain_core::Cid;
use filechain_client::{
    DevKeyring, LookupService, RpcLedger, SessionContext, UploadPipeline,
};

use crate::{spawn_gateway, test_bytes};

/// Full path over HTTP: upload through the RPC client, confirm via the
/// gateway, fetch the file back.
#[tokio::test]
async fn upload_over_http_roundtrip() {
    let (base_url, _ledger) = spawn_gateway().await;
    let client = RpcLedger::new(&base_url);

    let keyring = DevKeyring::new();
    let account = keyring.generate();
    let session = SessionContext::new(NetworkConfig::default())
        .with_client(client.clone())
        .with_account(account);

    let data = test_bytes(10_000);
    let chain = chunk_and_link(&data, 2048).unwrap();
    let root = chain.root_cid().unwrap();

    let pipeline = UploadPipeline::new();
    let tx = pipeline.upload(&session, &keyring, &chain).await.unwrap();
    assert!(tx.as_str().starts_with("0x"));

    let lookup = LookupService::new(client);
    assert!(lookup.exists(&root).await.unwrap());
    assert_eq!(lookup.fetch(&root).await.unwrap().unwrap(), data);
}

/// The search endpoint answers in the shape browser clients consume
/// directly: `{"found": bool}`.
#[tokio::test]
async fn search_file_endpoint_reports_found() {
    let (base_url, _ledger) = spawn_gateway().await;
    let client = RpcLedger::new(&base_url);

    let keyring = DevKeyring::new();
    let account = keyring.generate();
    let session = SessionContext::new(NetworkConfig::default())
        .with_client(client)
        .with_account(account);

    let chain = chunk_and_link(b"searchable file", 8).unwrap();
    let root = chain.root_cid().unwrap();
    UploadPipeline::new()
        .upload(&session, &keyring, &chain)
        .await
        .unwrap();

    let found: serde_json::Value =
        reqwest::get(format!("{base_url}/search-file/{root}"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
    assert_eq!(found, serde_json::json!({ "found": true }));

    let missing = Cid::of(b"not uploaded");
    let not_found: serde_json::Value =
        reqwest::get(format!("{base_url}/search-file/{missing}"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
    assert_eq!(not_found, serde_json::json!({ "found": false }));
}

/// Unknown nodes are 404, malformed CIDs are 400.
#[tokio::test]
async fn node_fetch_status_codes() {
    let (base_url, _ledger) = spawn_gateway().await;

    let missing = Cid::of(b"absent");
    let resp = reqwest::get(format!("{base_url}/node/{missing}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

    let resp = reqwest::get(format!("{base_url}/node/not-a-cid"))
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
}

/// A write with a broken signature is refused and leaves no entry.
#[tokio::test]
async fn tampered_submission_is_refused() {
    let (base_url, ledger) = spawn_gateway().await;
    let client = RpcLedger::new(&base_url);

    let keyring = DevKeyring::new();
    let account = keyring.generate();
    let signer = {
        use filechain_client::SignerProvider;
        keyring.signer_for(&account).unwrap()
    };

    let data = b"will be tampered with";
    let mut signed = filechain_client::SignedEntry::sign(
        Cid::of(data),
        filechain_client::LedgerEntry {
            data: bytes::Bytes::from_static(data),
            next: None,
        },
        signer.as_ref(),
    );
    signed.signature[0] ^= 0xff;

    use filechain_client::ledger::{LedgerError, LedgerWrite};
    let err = client.submit(&signed).await.unwrap_err();
    assert!(matches!(err, LedgerError::Rejected(_)));
    assert!(ledger.is_empty());
}
