/// Pin Window Profiling Program
///
/// Native-side replay of the G1 region pinning demo:
/// - Allocates one large buffer and pins it for a fixed number of seconds
/// - Runs an allocation-pressure thread the whole time (1 MiB chunks)
/// - Logs PIN START / PIN END and the pin window the recorder observed
///
/// Usage: cargo run --release --features profiling --bin pin_window -- --seconds 5
///        RUST_LOG=trace for per-pin logging
use clap::Parser;
use log::info;
use std::hint::black_box;
use std::thread;
use std::time::Duration;

use g1pinning::{HoldConfig, NativeRegion, Recorder, try_hold};

const CHUNK_SIZE: usize = 1024 * 1024;
const CHUNKS_PER_ROUND: usize = 64;
const PRESSURE_PAUSE: Duration = Duration::from_millis(5);

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seconds to keep the buffer pinned
    #[arg(short, long, default_value_t = 5)]
    seconds: i64,

    /// Size of the pinned buffer in MiB
    #[arg(short, long, default_value_t = 64)]
    megabytes: usize,

    /// Refuse the pin if the pages can't be locked in RAM
    #[arg(long)]
    strict: bool,

    /// Skip the allocation-pressure thread
    #[arg(long)]
    no_pressure: bool,
}

fn allocate_pressure() {
    loop {
        let junk: Vec<Vec<u8>> = (0..CHUNKS_PER_ROUND).map(|_| vec![0u8; CHUNK_SIZE]).collect();
        black_box(&junk);
        drop(junk);
        thread::sleep(PRESSURE_PAUSE);
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let big = vec![0u8; args.megabytes * 1024 * 1024];
    let region = if args.strict {
        NativeRegion::new(&big)
    } else {
        NativeRegion::best_effort(&big)
    };
    let host = Recorder::new(region);

    if !args.no_pressure {
        thread::Builder::new()
            .name("alloc-pressure".into())
            .spawn(allocate_pressure)
            .expect("failed to spawn pressure thread");
    }

    info!("PIN START ({} MiB, {} s)", args.megabytes, args.seconds);
    let result = try_hold(&host, args.seconds.saturating_mul(1000), &HoldConfig::default());
    info!("PIN END");

    match result {
        Ok(outcome) => {
            info!(
                "pinned {} bytes for {:?} (requested {:?})",
                outcome.len, outcome.pinned_for, outcome.requested
            );
            if let Some(window) = host.last_window().and_then(|w| w.duration()) {
                info!("recorded pin window: {window:?}");
            }
        }
        Err(err) => info!("hold skipped: {err} (refused pins: {})", host.refused()),
    }
}
