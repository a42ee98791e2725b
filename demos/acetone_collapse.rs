//! Driven acetone bubble — growth, violent collapse and afterbounces.
//!
//! Runs the default 19 µs acetone scenario, prints the step statistics and
//! the radius extrema, and writes the trajectory as CSV for plotting.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --release --example acetone_collapse [out.csv]

use std::fs::File;
use std::io::BufWriter;

use rp_bubble::{Bubble, BubbleParams, ExtremumKind};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let out = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "bubble_acetone.csv".to_string());

    let params = BubbleParams::default();
    let r0 = params.r0;
    let mut bubble = Bubble::new(params)?;
    let (tf, yf) = bubble.integrate()?;

    println!("Acetone bubble (R0 = {:.1} µm)", r0 * 1e6);
    println!("  Final time:   {:.3} µs", tf * 1e6);
    println!("  Final radius: {:.3} µm", yf[0] * 1e6);
    println!();
    println!("  Accepted steps: {}", bubble.stats.accepted_steps);
    println!("    coarse:       {}", bubble.stats.coarse_steps);
    println!("    fine:         {}", bubble.stats.fine_steps);
    println!("    finest:       {}", bubble.stats.finest_steps);
    println!("  Function evals: {}", bubble.stats.fn_evals);
    println!();

    let (_, trajectory) = bubble.finalize();
    for e in trajectory.extrema() {
        let label = match e.kind {
            ExtremumKind::Minimum => "collapse",
            ExtremumKind::Maximum => "maximum ",
        };
        println!("  {} at t = {:8.4} µs, R/R0 = {:.4}", label, e.t * 1e6, e.radius / r0);
    }

    trajectory.write_csv(BufWriter::new(File::create(&out)?))?;
    println!();
    println!("  Wrote {} samples to {}", trajectory.len(), out);
    Ok(())
}
