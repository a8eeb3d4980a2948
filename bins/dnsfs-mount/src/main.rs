use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use dnsfs_fuse::{DnsFs, FuseOps, MountConfig};
use dnsfs_logging::LogConfig;
use dnsfs_resolver::DnsTcpClient;
use dnsfs_types::RecordType;

/// dnsfs Mount Daemon
#[derive(Parser, Debug)]
#[command(name = "dnsfs-mount", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Directory under which the per-record-type mountpoints are created
    #[arg(long)]
    mount_base: Option<PathBuf>,

    /// Resolver endpoint (host:port)
    #[arg(long)]
    resolver: Option<String>,

    /// Serve a single record type instead of the full set
    #[arg(long)]
    record_type: Option<RecordType>,

    /// Dump the default configuration and exit
    #[arg(long)]
    dump_default_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.dump_default_config {
        print!("{}", toml::to_string_pretty(&MountConfig::default())?);
        return Ok(());
    }

    let _log_guard = dnsfs_logging::init_logging(&LogConfig::debug());

    let mut config = match &args.config {
        Some(path) => {
            MountConfig::load(path).with_context(|| format!("loading config {path}"))?
        }
        None => MountConfig::default(),
    };
    if let Some(mount_base) = args.mount_base {
        config.mount_base = mount_base;
    }
    if let Some(resolver) = args.resolver {
        config.resolver = resolver;
    }

    let resolver_addr = config.resolver_addr()?;
    let config = Arc::new(config);

    let record_types: Vec<RecordType> = match args.record_type {
        Some(rtype) => vec![rtype],
        None => RecordType::ALL.to_vec(),
    };

    // One isolated engine per record type: own registry, own cache, own
    // mountpoint. A failure to create a mountpoint aborts the whole run;
    // nothing else here is fatal.
    let mut engines = Vec::with_capacity(record_types.len());
    for rtype in record_types {
        let mountpoint = config.mountpoint_for(rtype);
        std::fs::create_dir_all(&mountpoint)
            .with_context(|| format!("creating mountpoint {}", mountpoint.display()))?;

        let client =
            Arc::new(DnsTcpClient::new(resolver_addr).with_timeout(config.query_timeout()));
        let fs = Arc::new(DnsFs::new(rtype, client, config.clone()));
        fs.init()
            .await
            .map_err(|errno| anyhow::anyhow!("init failed for {rtype} (errno {errno})"))?;

        info!(
            record_type = %rtype,
            mountpoint = %mountpoint.display(),
            options = %config.mount_options(),
            "engine ready"
        );
        engines.push(fs);
    }

    info!(engines = engines.len(), resolver = %resolver_addr, "dnsfs serving");
    wait_for_shutdown_signal().await;

    for fs in &engines {
        fs.destroy().await;
    }
    info!("dnsfs shut down");

    Ok(())
}

/// Wait for a shutdown signal (CTRL+C or SIGTERM).
async fn wait_for_shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .expect("failed to register SIGTERM handler");
    tokio::select! {
        _ = ctrl_c => { info!("received CTRL+C"); }
        _ = sigterm.recv() => { info!("received SIGTERM"); }
    }
}
