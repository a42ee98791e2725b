//! Trajectory storage.
//!
//! A [`Trajectory`] grows by one sample per committed step and keeps three
//! index-aligned sequences: time, state `[R, Ṙ]` and gas pressure. Once a run
//! is over it can be frozen into a [`FinalizedTrajectory`] for read-only
//! consumers such as plotting tools.
//!
//! The serialized form stores every `f64` as its IEEE-754 bit pattern, so
//! NaN and infinite samples of a collapsed run survive a save and reload
//! unchanged.

use std::cmp::Ordering;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{BubbleError, Result};
use crate::events::{find_extrema, RadiusExtremum};
use crate::model::sphere_volume;

/// Growable, append-only run history
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trajectory {
    #[serde(with = "bits::scalars")]
    time: Vec<f64>,
    #[serde(with = "bits::pairs")]
    states: Vec<[f64; 2]>,
    #[serde(with = "bits::scalars")]
    gas_pressure: Vec<f64>,
}

impl Trajectory {
    /// Empty trajectory
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one committed sample
    pub fn push(&mut self, t: f64, y: [f64; 2], p_gas: f64) {
        self.time.push(t);
        self.states.push(y);
        self.gas_pressure.push(p_gas);
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True when no sample has been recorded
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Time points
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// States `[R, Ṙ]`
    pub fn states(&self) -> &[[f64; 2]] {
        &self.states
    }

    /// Gas pressure at each time point
    pub fn gas_pressure(&self) -> &[f64] {
        &self.gas_pressure
    }

    /// Most recent sample `(t, y, p_gas)`
    pub fn last(&self) -> Option<(f64, [f64; 2], f64)> {
        let i = self.len().checked_sub(1)?;
        Some((self.time[i], self.states[i], self.gas_pressure[i]))
    }

    /// Drop every sample
    pub fn clear(&mut self) {
        self.time.clear();
        self.states.clear();
        self.gas_pressure.clear();
    }

    /// Radius extrema found in the recorded history
    pub fn extrema(&self) -> Vec<RadiusExtremum> {
        find_extrema(&self.time, &self.states)
    }

    /// Check the structural invariants: aligned lengths and strictly
    /// increasing time.
    pub fn check(&self) -> Result<()> {
        if self.states.len() != self.time.len() || self.gas_pressure.len() != self.time.len() {
            return Err(BubbleError::InvalidTrajectory(format!(
                "sequence lengths differ: time {}, states {}, gas_pressure {}",
                self.time.len(),
                self.states.len(),
                self.gas_pressure.len()
            )));
        }
        if let Some(i) = self
            .time
            .windows(2)
            .position(|w| w[1].partial_cmp(&w[0]) != Some(Ordering::Greater))
        {
            return Err(BubbleError::InvalidTrajectory(format!(
                "time is not strictly increasing at index {}",
                i + 1
            )));
        }
        Ok(())
    }

    /// Freeze into fixed-length arrays. Values are unchanged.
    pub fn finalize(self) -> FinalizedTrajectory {
        FinalizedTrajectory {
            time: self.time.into_boxed_slice(),
            states: self.states.into_boxed_slice(),
            gas_pressure: self.gas_pressure.into_boxed_slice(),
        }
    }
}

/// Read-only, fixed-length trajectory handed to downstream consumers
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedTrajectory {
    time: Box<[f64]>,
    states: Box<[[f64; 2]]>,
    gas_pressure: Box<[f64]>,
}

impl FinalizedTrajectory {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True when the trajectory holds no sample
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Time points
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// States `[R, Ṙ]`
    pub fn states(&self) -> &[[f64; 2]] {
        &self.states
    }

    /// Gas pressure at each time point
    pub fn gas_pressure(&self) -> &[f64] {
        &self.gas_pressure
    }

    /// Radius series
    pub fn radius(&self) -> impl Iterator<Item = f64> + '_ {
        self.states.iter().map(|y| y[0])
    }

    /// Wall velocity series
    pub fn velocity(&self) -> impl Iterator<Item = f64> + '_ {
        self.states.iter().map(|y| y[1])
    }

    /// Bubble volume at each sample
    pub fn volumes(&self) -> Vec<f64> {
        self.radius().map(sphere_volume).collect()
    }

    /// Largest recorded radius (NaN samples are skipped)
    pub fn max_radius(&self) -> Option<f64> {
        self.radius().filter(|r| !r.is_nan()).reduce(f64::max)
    }

    /// Smallest recorded radius (NaN samples are skipped)
    pub fn min_radius(&self) -> Option<f64> {
        self.radius().filter(|r| !r.is_nan()).reduce(f64::min)
    }

    /// Radius extrema found in the recorded history
    pub fn extrema(&self) -> Vec<RadiusExtremum> {
        find_extrema(&self.time, &self.states)
    }

    /// Write `t,R,dR,p_gas` rows with a header record
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["t", "R", "dR", "p_gas"])?;
        let rows = self.time.iter().zip(self.states.iter()).zip(self.gas_pressure.iter());
        for ((&t, y), &p) in rows {
            csv.serialize((t, y[0], y[1], p))?;
        }
        csv.flush()?;
        Ok(())
    }
}

/// Bit-pattern encodings of the float sequences
mod bits {
    use serde::{Deserialize, Deserializer, Serializer};

    pub mod scalars {
        use super::*;

        #[allow(clippy::ptr_arg)]
        pub fn serialize<S: Serializer>(
            values: &Vec<f64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(values.iter().map(|v| v.to_bits()))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<f64>, D::Error> {
            let raw = Vec::<u64>::deserialize(deserializer)?;
            Ok(raw.into_iter().map(f64::from_bits).collect())
        }
    }

    pub mod pairs {
        use super::*;

        #[allow(clippy::ptr_arg)]
        pub fn serialize<S: Serializer>(
            values: &Vec<[f64; 2]>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(values.iter().map(|y| [y[0].to_bits(), y[1].to_bits()]))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<[f64; 2]>, D::Error> {
            let raw = Vec::<[u64; 2]>::deserialize(deserializer)?;
            Ok(raw
                .into_iter()
                .map(|y| [f64::from_bits(y[0]), f64::from_bits(y[1])])
                .collect())
        }
    }
}
