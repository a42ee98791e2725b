//! Rayleigh-Plesset Model
//!
//! Right-hand side of the Rayleigh-Plesset equation for a spherical bubble
//! wall, written as a first-order system in `y = [R, Ṙ]`:
//!
//! ```text
//! Ṙ = v
//! v̇ = -3 v² / (2R) + 1/(ρR) · (p_liq - 4ν v/R - p_ext [+ R·ṗ_gas / c])
//! ```
//!
//! with
//!
//! - `p_gas  = (p0 + 2s/R0 - p_vap) · (R0/R)^(3κ)`  (polytropic gas)
//! - `p_liq  = p_gas + p_vap - 2s/R`                 (liquid side of the wall)
//! - `p_ext  = p0 - A·sin(2π f t)`                   (acoustic driving)
//!
//! The bracketed radiation term uses the rate of change of the gas pressure
//! taken from already committed steps. It is handed to the model explicitly
//! as a lagged value, so the model stays a pure function of its inputs.
//!
//! Nothing here guards against `R <= 0`; a collapsed bubble yields
//! non-finite derivatives.

use std::f64::consts::PI;

use crate::params::BubbleParams;
use crate::solver::OdeSystem;

/// Volume of a sphere of radius `r`
pub fn sphere_volume(r: f64) -> f64 {
    (4.0 / 3.0) * PI * r.powi(3)
}

/// Physical model of a single driven bubble
#[derive(Debug, Clone, PartialEq)]
pub struct RayleighPlesset {
    r0: f64,
    p0: f64,
    pvap: f64,
    s: f64,
    rho: f64,
    nu: f64,
    c: f64,
    kappa: f64,
    amp: f64,
    f: f64,
    radiates: bool,
}

impl RayleighPlesset {
    /// Build the model from a parameter set
    pub fn new(params: &BubbleParams) -> Self {
        Self {
            r0: params.r0,
            p0: params.p0,
            pvap: params.pvap,
            s: params.s,
            rho: params.rho,
            nu: params.nu,
            c: params.c,
            kappa: params.kappa,
            amp: params.amp,
            f: params.f,
            radiates: params.bubble_radiates,
        }
    }

    /// Whether the radiation loss term is enabled
    pub fn radiates(&self) -> bool {
        self.radiates
    }

    /// Polytropic gas pressure inside a bubble of radius `r`
    pub fn gas_pressure(&self, r: f64) -> f64 {
        (self.p0 + 2.0 * self.s / self.r0 - self.pvap) * (self.r0 / r).powf(3.0 * self.kappa)
    }

    /// Acoustic driving pressure at time `t`
    pub fn acoustic_pressure(&self, t: f64) -> f64 {
        -self.amp * (2.0 * PI * self.f * t).sin()
    }

    /// Radiation loss `R · ṗ_gas / c` for a given gas pressure rate
    pub fn radiation_loss(&self, r: f64, pg_dot: f64) -> f64 {
        pg_dot * r / self.c
    }

    /// Wall acceleration `R̈`
    ///
    /// `pg_dot` is the lagged gas pressure rate; it only contributes when
    /// radiation is enabled and a rate is available.
    pub fn acceleration(&self, t: f64, y: &[f64; 2], pg_dot: Option<f64>) -> f64 {
        let r = y[0];
        let dr = y[1];

        let p_gas = self.gas_pressure(r);
        let p_surf = 2.0 * self.s / r;
        let p_liq = p_gas + self.pvap - p_surf;
        let p_ext = self.p0 + self.acoustic_pressure(t);

        let inertia = -3.0 * dr * dr / (2.0 * r);
        let scale = 1.0 / (self.rho * r);
        match pg_dot {
            Some(rate) if self.radiates => {
                let loss = self.radiation_loss(r, rate);
                inertia + scale * (p_liq - 4.0 * self.nu * dr / r - p_ext + loss)
            }
            _ => inertia + scale * (p_liq - 4.0 * self.nu * dr / r - p_ext),
        }
    }

    /// Bind a lagged gas pressure rate, giving an ODE right-hand side
    pub fn with_feedback(&self, pg_dot: Option<f64>) -> BubbleRhs<'_> {
        BubbleRhs { model: self, pg_dot }
    }
}

/// Model right-hand side with a fixed lagged radiation feedback
///
/// All stages of one step share the same feedback value.
#[derive(Debug, Clone, Copy)]
pub struct BubbleRhs<'a> {
    model: &'a RayleighPlesset,
    pg_dot: Option<f64>,
}

impl OdeSystem<2> for BubbleRhs<'_> {
    fn rhs(&self, t: f64, y: &[f64; 2], dydt: &mut [f64; 2]) {
        dydt[0] = y[1];
        dydt[1] = self.model.acceleration(t, y, self.pg_dot);
    }
}
