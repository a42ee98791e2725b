//! # rp-bubble: Rayleigh-Plesset Bubble Dynamics
//!
//! Radial dynamics of a single gas bubble in a liquid under acoustic
//! forcing, integrated with a classical Runge-Kutta 4 scheme.
//!
//! ## Features
//!
//! - Polytropic gas, surface tension, viscous damping and sinusoidal driving
//! - Optional acoustic radiation loss from the rate of change of the gas
//!   pressure, estimated from already committed steps
//! - Amplitude-triggered step tiers: the step shrinks in two stages as the
//!   bubble collapses below 0.6 R0 and 0.06 R0
//! - Versioned JSON persistence with exact floating point round trip
//! - Radius extrema (collapse and rebound) detection on the recorded history
//!
//! ## Basic Usage
//!
//! ```rust
//! use rp_bubble::{Bubble, BubbleParams};
//!
//! // 50 µm bubble in acetone, radiation loss disabled, 0.5 µs run
//! let params = BubbleParams {
//!     bubble_radiates: false,
//!     t_run: 5e-7,
//!     ..Default::default()
//! };
//!
//! let mut bubble = Bubble::new(params).unwrap();
//! bubble.integrate().unwrap();
//!
//! let (_, trajectory) = bubble.finalize();
//! println!("{} samples, max radius {:?}", trajectory.len(), trajectory.max_radius());
//! ```
//!
//! ## Radiation Feedback
//!
//! The radiation term `R · ṗ_gas / c` uses a backward difference of the two
//! most recently committed gas pressures. Every Runge-Kutta stage of a step
//! sees the same lagged value, and the term is left out until three samples
//! have been committed.
//!
//! ## Numerical Sharp Edges
//!
//! The model divides by the radius. A bubble driven through zero radius
//! produces non-finite values that propagate into the trajectory; the run is
//! not aborted. The final step may overshoot `t_start + t_run`.
//!
//! ## References
//!
//! 1. Plesset, M.S. (1949). "The Dynamics of Cavitation Bubbles".
//!    Journal of Applied Mechanics 16, 277-282.
//!
//! 2. Brennen, C.E. (1995). "Cavitation and Bubble Dynamics".
//!    Oxford University Press.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod coefficients;
pub mod error;
pub mod events;
pub mod feedback;
pub mod model;
pub mod params;
pub mod persist;
pub mod simulation;
pub mod solver;
pub mod trajectory;

pub use error::{BubbleError, Result};
pub use events::{
    find_extrema, first_rebound, sign_change_detected, EventDirection, ExtremumKind,
    RadiusExtremum,
};
pub use feedback::PressureFeedback;
pub use model::{sphere_volume, BubbleRhs, RayleighPlesset};
pub use params::{BubbleParams, ATMOSPHERE};
pub use persist::{SimulationRecord, FORMAT_VERSION};
pub use simulation::{Bubble, StepRecord};
pub use solver::{OdeSystem, Rk4, Stats, StepPolicy, StepTier};
pub use trajectory::{FinalizedTrajectory, Trajectory};
