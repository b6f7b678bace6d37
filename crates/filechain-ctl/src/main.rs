//! filechain-ctl — command-line interface for storing files on a chain.

use anyhow::{Context, Result};

use filechain_core::config::{FilechainConfig, NetworkConfig};
use filechain_core::dag::chunk_and_link;
use filechain_core::Cid;
use filechain_client::{
    DevKeyring, LookupService, RpcLedger, SessionContext, UploadPipeline,
};

// ── Subcommand handlers ───────────────────────────────────────────────────────

fn load_network(config: &FilechainConfig, name: Option<&str>) -> Result<NetworkConfig> {
    let network = match name {
        Some(name) => config.network(name)?,
        None => config.default_network()?,
    };
    Ok(network.clone())
}

fn cmd_chunk(network: &NetworkConfig, path: &str) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("failed to read file: {path}"))?;
    let chain = chunk_and_link(&data, network.chunk_size)?;

    println!("═══════════════════════════════════════");
    println!("  {} ({} bytes, {} chunks)", path, data.len(), chain.len());
    println!("═══════════════════════════════════════");
    for node in chain.nodes() {
        let link = match &node.next {
            Some(next) => format!("→ {}…", next.short()),
            None => "· end".to_string(),
        };
        println!("  {:>6} B  {}  {}", node.data.len(), node.cid, link);
    }
    if let Some(root) = chain.root_cid() {
        println!("\n  Root CID : {root}");
    }
    Ok(())
}

async fn cmd_upload(network: &NetworkConfig, path: &str) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("failed to read file: {path}"))?;
    let chain = chunk_and_link(&data, network.chunk_size)?;
    let root = chain
        .root_cid()
        .context("file produced no chunks")?;

    let client = RpcLedger::new(&network.rpc_url);

    // Dedup probe. A failed probe must not block the upload.
    match LookupService::new(client.clone()).exists(&root).await {
        Ok(true) => {
            println!("Already on ledger — root CID {root}");
            return Ok(());
        }
        Ok(false) => {}
        Err(e) => eprintln!("warning: existence check failed ({e}), uploading anyway"),
    }

    // Ephemeral dev account; real deployments bring an external signer.
    let keyring = DevKeyring::new();
    let account = keyring.generate();
    let session = SessionContext::new(network.clone())
        .with_client(client)
        .with_account(account);

    let pipeline = UploadPipeline::new();
    let tx = pipeline.upload(&session, &keyring, &chain).await?;

    println!("═══════════════════════════════════════");
    println!("  Upload confirmed");
    println!("═══════════════════════════════════════");
    println!("  File     : {} ({} bytes, {} chunks)", path, data.len(), chain.len());
    println!("  Network  : {}", network.name);
    println!("  Account  : {account}");
    println!("  Root CID : {root}");
    println!("  Tx       : {tx}");
    println!("  Explorer : {}/extrinsic/{tx}", network.explorer_url);
    Ok(())
}

async fn cmd_exists(network: &NetworkConfig, cid: &str) -> Result<()> {
    let cid: Cid = cid.parse().context("invalid CID")?;
    let lookup = LookupService::new(RpcLedger::new(&network.rpc_url));
    let found = lookup.exists(&cid).await?;
    println!("{}", if found { "found" } else { "not found" });
    Ok(())
}

async fn cmd_fetch(network: &NetworkConfig, cid: &str, out: &str) -> Result<()> {
    let root: Cid = cid.parse().context("invalid CID")?;
    let lookup = LookupService::new(RpcLedger::new(&network.rpc_url));
    let data = lookup
        .fetch(&root)
        .await?
        .with_context(|| format!("no file on ledger with root CID {root}"))?;

    std::fs::write(out, &data).with_context(|| format!("failed to write {out}"))?;
    println!("Wrote {} bytes to {out}", data.len());
    Ok(())
}

fn cmd_networks(config: &FilechainConfig) {
    println!("═══════════════════════════════════════");
    println!("  Configured networks");
    println!("═══════════════════════════════════════");
    for network in &config.networks {
        let marker = if network.name == config.default_network {
            "*"
        } else {
            " "
        };
        println!("  {marker} {}", network.name);
        println!("      rpc        : {}", network.rpc_url);
        println!("      explorer   : {}", network.explorer_url);
        println!("      chunk size : {} bytes", network.chunk_size);
    }
}

fn print_usage() {
    println!("Usage: filechain-ctl [--network <name>] <command>");
    println!();
    println!("Commands:");
    println!("  chunk <file>          Chunk a file locally and print its CID chain");
    println!("  upload <file>         Upload a file to the configured network");
    println!("  exists <cid>          Check whether a CID is on the ledger");
    println!("  fetch <cid> <out>     Reassemble a file by root CID into <out>");
    println!("  networks              List configured networks");
    println!();
    println!("Options:");
    println!("  --network <name>   Target network (default: from config)");
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Parse --network option
    let mut network_name: Option<String> = None;
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--network" {
            i += 1;
            network_name = Some(
                args.get(i)
                    .context("--network requires a value")?
                    .to_string(),
            );
        } else {
            remaining.push(&args[i]);
        }
        i += 1;
    }

    let config = FilechainConfig::load().context("failed to load config")?;
    let network = load_network(&config, network_name.as_deref())?;

    match remaining.as_slice() {
        ["chunk", path]        => cmd_chunk(&network, path),
        ["upload", path]       => cmd_upload(&network, path).await,
        ["exists", cid]        => cmd_exists(&network, cid).await,
        ["fetch", cid, out]    => cmd_fetch(&network, cid, out).await,
        ["networks"]           => { cmd_networks(&config); Ok(()) }
        ["help"] | ["--help"] | ["-h"] | [] => { print_usage(); Ok(()) }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
