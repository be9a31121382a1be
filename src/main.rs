mod config;
mod metrics;
mod scheduler;
mod util;

use config::{Args, PingConfig};
use echo_probe::{ProbeError, ProbeParams, probe_icmp};
use metrics::ProbeStats;
use scheduler::Scheduler;
use util::{process_identifier, resolve_host_to_ipv4};

use clap::Parser;
use std::cell::RefCell;
use std::io;
use tracing::{error, info, warn};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load config first to get log level
    let config = PingConfig::load(&args).await?;
    let log_level = config.get_tracing_level()?;

    // Init tracing with configured log level
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()
                         .add_directive(format!("echo_probe={}", log_level.as_str().to_lowercase()).parse()?))
        .init();

    let destination = resolve_host_to_ipv4(&args.destination).await?;
    let identifier = process_identifier();
    info!(%destination, identifier, count = config.count, "starting echo probes");

    println!(
        "PING {} ({}) {}({}) bytes of data.",
        args.destination,
        destination,
        config.payload_size,
        config.payload_size + 28
    );

    let stats = RefCell::new(ProbeStats::default());
    let scheduler = Scheduler::new(config.interval_ms)?;
    let (config, stats_ref) = (&config, &stats);
    scheduler.run(config.count, move |sequence_number| {
        let params = ProbeParams {
            destination,
            timeout: config.timeout(),
            identifier,
            sequence_number,
            payload_size: config.payload_size,
        };
        let stats = stats_ref;
        async move {
            // The probe blocks on the socket; keep it off the runtime threads.
            match tokio::task::spawn_blocking(move || probe_icmp(params)).await {
                Ok(Ok(rtt)) => {
                    println!("reply recv: seq={} rtt={} ms", sequence_number, rtt.as_millis());
                    stats.borrow_mut().observe_latency(rtt);
                }
                Ok(Err(e)) => {
                    eprintln!("{}", e);
                    if let ProbeError::SocketOpen(cause) = &e {
                        warn_if_unprivileged(cause);
                    }
                    stats.borrow_mut().inc_failure(e.is_timeout());
                }
                Err(e) => {
                    error!("probe task for seq {} failed: {:?}", sequence_number, e);
                    stats.borrow_mut().inc_failure(false);
                }
            }
        }
    }).await?;

    let stats = stats.into_inner();
    info!(
        transmitted = stats.transmitted(),
        received = stats.received(),
        timeouts = stats.timeouts(),
        "echo probes finished"
    );
    println!("\n--- {} ping statistics ---", args.destination);
    println!("{}", stats);

    Ok(())
}

#[cfg(unix)]
fn warn_if_unprivileged(cause: &io::Error) {
    // SAFETY: geteuid has no preconditions and cannot fail.
    let euid = unsafe { libc::geteuid() };
    if cause.kind() == io::ErrorKind::PermissionDenied && euid != 0 {
        warn!("raw ICMP sockets need root or CAP_NET_RAW (running as uid {})", euid);
    }
}

#[cfg(not(unix))]
fn warn_if_unprivileged(_cause: &io::Error) {}
