//! Simulation Parameters
//!
//! Physical and numerical parameters of a single bubble run. Defaults
//! describe a 50 µm gas bubble in acetone driven at 20 kHz with an
//! amplitude of 0.6 atm.
//!
//! Every field is public and can be overridden with struct update syntax,
//! or loaded from a JSON document that names only the fields to change:
//!
//! ```rust
//! use rp_bubble::BubbleParams;
//!
//! let params = BubbleParams::from_json_str(r#"{ "amp": 50000.0, "bubble_radiates": false }"#).unwrap();
//! assert_eq!(params.amp, 50000.0);
//! assert_eq!(params.rho, BubbleParams::default().rho);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BubbleError, Result};

/// Standard atmospheric pressure [Pa]
pub const ATMOSPHERE: f64 = 101325.0;

/// Parameters of a Rayleigh-Plesset run (SI units)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleParams {
    /// Equilibrium radius [m]
    pub r0: f64,
    /// Initial radius [m]
    pub r_start: f64,
    /// Initial interface velocity [m/s]
    pub dr_start: f64,
    /// Ambient pressure far from the bubble [Pa]
    pub p0: f64,
    /// Vapour pressure of the liquid [Pa]
    pub pvap: f64,
    /// Surface tension [N/m]
    pub s: f64,
    /// Liquid density [kg/m³]
    pub rho: f64,
    /// Viscosity entering the damping term `4 nu Ṙ / R`
    pub nu: f64,
    /// Speed of sound in the liquid [m/s]
    pub c: f64,
    /// Polytropic index of the gas
    pub kappa: f64,
    /// Amplitude of the acoustic forcing [Pa]
    pub amp: f64,
    /// Acoustic driving frequency [Hz]
    pub f: f64,
    /// Start time [s]
    pub t_start: f64,
    /// Step size while the radius is at least 0.6 r0 [s]
    pub dt_coarse: f64,
    /// Step size while the radius is below 0.6 r0 [s]; scaled by 0.02 below 0.06 r0
    pub dt_fine: f64,
    /// Run duration [s]
    pub t_run: f64,
    /// Include the acoustic radiation loss term
    pub bubble_radiates: bool,
}

impl Default for BubbleParams {
    fn default() -> Self {
        Self {
            r0: 0.5e-4,
            r_start: 0.5e-4,
            dr_start: 0.0,
            p0: ATMOSPHERE,
            // acetone: 9.3 kPa vapour pressure
            pvap: 0.093 * 1e5,
            // 25.2 mN/m at 25 °C with temperature coefficient -0.112 mN/(m K), taken at 0 °C
            s: (25.2 + 25.0 * 0.1120) * 1e-3,
            rho: 790.0,
            nu: 0.4 * 1e-3,
            c: 1174.0,
            kappa: 1.4,
            amp: 0.6 * ATMOSPHERE,
            f: 2e4,
            t_start: 0.0,
            dt_coarse: 1e-9,
            dt_fine: 1e-12,
            t_run: 19e-6,
            bubble_radiates: true,
        }
    }
}

impl BubbleParams {
    /// Parse parameters from JSON; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Read parameters from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// End of the configured run, `t_start + t_run`
    pub fn t_end(&self) -> f64 {
        self.t_start + self.t_run
    }

    /// Check that every parameter is finite and in its admissible range.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("r0", self.r0),
            ("r_start", self.r_start),
            ("dr_start", self.dr_start),
            ("p0", self.p0),
            ("pvap", self.pvap),
            ("s", self.s),
            ("rho", self.rho),
            ("nu", self.nu),
            ("c", self.c),
            ("kappa", self.kappa),
            ("amp", self.amp),
            ("f", self.f),
            ("t_start", self.t_start),
            ("dt_coarse", self.dt_coarse),
            ("dt_fine", self.dt_fine),
            ("t_run", self.t_run),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(invalid(name, format!("must be finite, got {}", value)));
            }
        }

        let positive = [
            ("r0", self.r0),
            ("r_start", self.r_start),
            ("rho", self.rho),
            ("c", self.c),
            ("kappa", self.kappa),
            ("dt_coarse", self.dt_coarse),
            ("dt_fine", self.dt_fine),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(invalid(name, format!("must be positive, got {}", value)));
            }
        }

        let non_negative = [
            ("p0", self.p0),
            ("pvap", self.pvap),
            ("s", self.s),
            ("nu", self.nu),
            ("f", self.f),
            ("t_run", self.t_run),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(invalid(name, format!("must be non-negative, got {}", value)));
            }
        }

        self.check_step_resolution(self.t_start, self.t_end())
    }

    /// Check that every step tier still advances time anywhere in
    /// `[t_from, t_to]`. Float spacing grows with magnitude, so the end with
    /// the larger magnitude decides.
    pub(crate) fn check_step_resolution(&self, t_from: f64, t_to: f64) -> Result<()> {
        let scale = t_from.abs().max(t_to.abs());
        let steps = [
            ("dt_coarse", self.dt_coarse),
            ("dt_fine", self.dt_fine),
            ("dt_fine", 0.02 * self.dt_fine),
        ];
        for (name, step) in steps {
            if scale + step <= scale {
                return Err(invalid(
                    name,
                    format!("step {} vanishes against |t| = {}", step, scale),
                ));
            }
        }
        Ok(())
    }
}

fn invalid(name: &'static str, message: String) -> BubbleError {
    BubbleError::InvalidParameter { name, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acetone_defaults() {
        let p = BubbleParams::default();
        assert_eq!(p.r0, 5e-5);
        assert_eq!(p.r_start, p.r0);
        assert_eq!(p.amp, 0.6 * p.p0);
        assert!((p.s - 0.028).abs() < 1e-15);
        assert_eq!(p.t_end(), 19e-6);
        assert!(p.bubble_radiates);
        p.validate().unwrap();
    }

    #[test]
    fn test_partial_json_overrides() {
        let p = BubbleParams::from_json_str(r#"{ "t_run": 1e-6, "kappa": 1.0 }"#).unwrap();
        assert_eq!(p.t_run, 1e-6);
        assert_eq!(p.kappa, 1.0);
        assert_eq!(p.c, 1174.0);
    }

    #[test]
    fn test_wrong_json_type_rejected() {
        let err = BubbleParams::from_json_str(r#"{ "r0": "large" }"#).unwrap_err();
        assert!(matches!(err, BubbleError::Json(_)));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let cases = [
            BubbleParams { r0: 0.0, ..Default::default() },
            BubbleParams { r_start: -1e-6, ..Default::default() },
            BubbleParams { dt_fine: f64::NAN, ..Default::default() },
            BubbleParams { rho: -790.0, ..Default::default() },
            BubbleParams { t_run: -1.0, ..Default::default() },
        ];
        for p in cases {
            assert!(
                matches!(p.validate(), Err(BubbleError::InvalidParameter { .. })),
                "{:?} should be rejected",
                p
            );
        }
    }

    #[test]
    fn test_vanishing_finest_step_rejected() {
        let p = BubbleParams {
            t_start: 1.0,
            dt_fine: 1e-18,
            ..Default::default()
        };
        match p.validate() {
            Err(BubbleError::InvalidParameter { name, .. }) => assert_eq!(name, "dt_fine"),
            other => panic!("expected dt_fine rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_vanishing_step_at_negative_start_rejected() {
        // t_end = 0, but at t_start = -1e6 the fine steps are below float spacing
        let p = BubbleParams {
            t_start: -1e6,
            t_run: 1e6,
            r_start: 0.05 * 0.5e-4,
            ..Default::default()
        };
        match p.validate() {
            Err(BubbleError::InvalidParameter { name, .. }) => assert_eq!(name, "dt_fine"),
            other => panic!("expected dt_fine rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_vanishing_coarse_step_rejected() {
        let p = BubbleParams {
            t_start: 1e3,
            dt_coarse: 1e-15,
            dt_fine: 1e-9,
            ..Default::default()
        };
        assert!(matches!(
            p.validate(),
            Err(BubbleError::InvalidParameter { name: "dt_coarse", .. })
        ));
    }
}
