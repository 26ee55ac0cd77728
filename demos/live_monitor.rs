//! Live monitor: prints player telemetry and lap events from the game.
//!
//! Run with `cargo run --example live_monitor [config.yaml]`. Set
//! `RACEWIRE_UDP_PORT` or `RACEWIRE_BIND_ADDRESS` to override the bind target
//! and `RUST_LOG=racewire=debug` for decoder diagnostics.

use futures::StreamExt;
use racewire::{Racewire, SessionConfig, UpdateRate, format_lap_time};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::from_file(path)?,
        None => SessionConfig::default(),
    }
    .with_env_overrides();

    let connection = Racewire::listen(config).await?;
    info!(local_addr = ?connection.local_addr(), "Waiting for telemetry, Ctrl+C to stop");

    let mut telemetry = connection.telemetry(UpdateRate::Max(4));
    let mut events = Box::pin(connection.events());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            Some(record) = telemetry.next() => {
                println!(
                    "{:>3} km/h  gear {:>2}  {:>5} rpm  throttle {:>3.0}%  brake {:>3.0}%",
                    record.speed,
                    racewire::Gear::from_raw(record.gear),
                    record.engine_rpm,
                    record.throttle * 100.0,
                    record.brake * 100.0,
                );
            }
            Some(event) = events.next() => {
                if let Some(lap) = event.lap_completed {
                    println!(
                        "Lap {} started, last lap {}",
                        lap.lap_number,
                        format_lap_time(lap.last_lap_time_ms).unwrap_or_else(|| "N/A".to_string())
                    );
                }
                if let Some(sector) = event.sector_changed {
                    println!("{}", sector);
                }
            }
            else => break,
        }
    }

    if let Some(summary) = connection.reader().summary() {
        println!("{}", serde_yaml_ng::to_string(&summary)?);
    }
    connection.stop();
    Ok(())
}
