//! Headless autoplay: `orbs-harness [seed] [seconds]`.
//!
//! Set `RUST_LOG=info` (or `debug`) to follow the session.

use std::error::Error;

use orbs_harness::autoplay;

const DEFAULT_SEED: u64 = 42;
const DEFAULT_DURATION_SECS: f64 = 180.0;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse::<u64>()?,
        None => DEFAULT_SEED,
    };
    let duration = match args.next() {
        Some(arg) => arg.parse::<f64>()?,
        None => DEFAULT_DURATION_SECS,
    };

    let summary = autoplay::run_autoplay(seed, duration)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
