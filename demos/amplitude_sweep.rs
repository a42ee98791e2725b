//! Driving amplitude sweep — effect of radiation loss on the first rebound.
//!
//! For several forcing amplitudes the default acetone bubble is run with and
//! without the radiation loss term. Without it the first rebound after the
//! main collapse stays large; with it the rebound amplitude drops sharply.
//!
//! Run with:
//!   cargo run --release --example amplitude_sweep

use rp_bubble::{first_rebound, Bubble, BubbleParams, ATMOSPHERE};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("  amp/p0   radiates   R_max/R0   R_min/R0   R_rebound/R0   steps");
    for amp in [0.4, 0.6, 0.8] {
        for radiates in [false, true] {
            let params = BubbleParams {
                amp: amp * ATMOSPHERE,
                bubble_radiates: radiates,
                ..Default::default()
            };
            let r0 = params.r0;
            let mut bubble = Bubble::new(params)?;
            bubble.integrate()?;
            let steps = bubble.stats.accepted_steps;

            let (_, trajectory) = bubble.finalize();
            let r_max = trajectory.max_radius().unwrap_or(f64::NAN) / r0;
            let r_min = trajectory.min_radius().unwrap_or(f64::NAN) / r0;
            let rebound = first_rebound(&trajectory.extrema())
                .map(|(_, max)| max.radius / r0)
                .unwrap_or(f64::NAN);

            println!(
                "  {:6.2}   {:8}   {:8.4}   {:8.4}   {:12.4}   {}",
                amp, radiates, r_max, r_min, rebound, steps
            );
        }
    }
    Ok(())
}
