//! Radius Extrema Detection
//!
//! Post-processing of a recorded trajectory: the wall velocity `Ṙ` changes
//! sign at every extremum of the radius. A rising crossing (`Ṙ` from negative
//! to positive) marks a collapse minimum, a falling crossing marks a rebound
//! maximum.
//!
//! Between two samples the crossing time is located by linear interpolation
//! of the velocity, and the radius at that time by cubic Hermite
//! interpolation using the recorded velocities as end-point slopes.
//!
//! # Common Applications
//!
//! - Minimum radius reached in each collapse
//! - Rebound amplitude after the first collapse, with and without radiation loss
//! - Period of the afterbounces

/// Direction of zero-crossing to detect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventDirection {
    /// Detect when g goes from negative to positive (increasing through zero)
    Rising,
    /// Detect when g goes from positive to negative (decreasing through zero)
    Falling,
    /// Detect any zero crossing
    #[default]
    Any,
}

/// Kind of radius extremum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremumKind {
    /// Collapse: the wall stops moving inwards
    Minimum,
    /// Rebound or expansion peak: the wall stops moving outwards
    Maximum,
}

/// A located radius extremum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusExtremum {
    /// Interpolated time of the extremum
    pub t: f64,
    /// Interpolated radius at the extremum
    pub radius: f64,
    /// Minimum or maximum
    pub kind: ExtremumKind,
    /// Index of the sample that closes the bracketing interval
    pub index: usize,
}

/// Check if a sign change occurred in the specified direction
///
/// Non-finite values never count as a crossing, and a value sitting exactly
/// on zero is reported once, when it is reached.
pub fn sign_change_detected(g_old: f64, g_new: f64, direction: EventDirection) -> bool {
    if !g_old.is_finite() || !g_new.is_finite() {
        return false;
    }

    if g_old == 0.0 {
        // Already at zero - not a new crossing
        return false;
    }

    if g_new == 0.0 {
        return match direction {
            EventDirection::Rising => g_old < 0.0,
            EventDirection::Falling => g_old > 0.0,
            EventDirection::Any => true,
        };
    }

    match direction {
        EventDirection::Rising => g_old < 0.0 && g_new > 0.0,
        EventDirection::Falling => g_old > 0.0 && g_new < 0.0,
        EventDirection::Any => g_old * g_new < 0.0,
    }
}

/// Cubic Hermite interpolation of the radius on `[t_a, t_b]`
fn hermite_radius(t_a: f64, y_a: &[f64; 2], t_b: f64, y_b: &[f64; 2], t: f64) -> f64 {
    let dt = t_b - t_a;
    let alpha = (t - t_a) / dt;
    let a2 = alpha * alpha;
    let a3 = a2 * alpha;
    let h00 = 1.0 - 3.0 * a2 + 2.0 * a3;
    let h10 = alpha - 2.0 * a2 + a3;
    let h01 = 3.0 * a2 - 2.0 * a3;
    let h11 = -a2 + a3;
    h00 * y_a[0] + h10 * dt * y_a[1] + h01 * y_b[0] + h11 * dt * y_b[1]
}

/// Locate every radius extremum in a sampled trajectory.
///
/// `time` and `states` must be index-aligned; extra samples in the longer
/// slice are ignored.
pub fn find_extrema(time: &[f64], states: &[[f64; 2]]) -> Vec<RadiusExtremum> {
    let n = time.len().min(states.len());
    let mut extrema = Vec::new();

    for i in 1..n {
        let (t_a, y_a) = (time[i - 1], &states[i - 1]);
        let (t_b, y_b) = (time[i], &states[i]);
        let (g_a, g_b) = (y_a[1], y_b[1]);

        if !sign_change_detected(g_a, g_b, EventDirection::Any) {
            continue;
        }

        let kind = if g_a < 0.0 {
            ExtremumKind::Minimum
        } else {
            ExtremumKind::Maximum
        };
        let t = t_a + (t_b - t_a) * g_a / (g_a - g_b);
        extrema.push(RadiusExtremum {
            t,
            radius: hermite_radius(t_a, y_a, t_b, y_b, t),
            kind,
            index: i,
        });
    }

    extrema
}

/// First collapse minimum and the maximum that follows it
pub fn first_rebound(extrema: &[RadiusExtremum]) -> Option<(RadiusExtremum, RadiusExtremum)> {
    let start = extrema
        .iter()
        .position(|e| e.kind == ExtremumKind::Minimum)?;
    let collapse = extrema[start];
    let rebound = extrema[start + 1..]
        .iter()
        .find(|e| e.kind == ExtremumKind::Maximum)?;
    Some((collapse, *rebound))
}
