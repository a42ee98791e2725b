//! Versioned persistence of a simulation.
//!
//! A [`SimulationRecord`] is an explicit schema: format version, parameters,
//! trajectory and run statistics, written as JSON. Parameters are written in
//! shortest round-trip form and parsed back exactly; trajectory samples are
//! stored as raw bit patterns, so a run that collapsed to NaN or infinity
//! saves and reloads unchanged. A reloaded simulation continues bit for bit
//! where the saved one stopped. The lagged pressure feedback is not stored;
//! it is recovered from the trajectory tail.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BubbleError, Result};
use crate::params::BubbleParams;
use crate::simulation::Bubble;
use crate::solver::Stats;
use crate::trajectory::Trajectory;

/// Schema version written by this build
pub const FORMAT_VERSION: u32 = 1;

/// Persisted form of a [`Bubble`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    /// Schema version
    pub format_version: u32,
    /// Simulation parameters
    pub params: BubbleParams,
    /// Recorded history
    pub trajectory: Trajectory,
    /// Run statistics
    #[serde(default)]
    pub stats: Stats,
}

impl SimulationRecord {
    /// Snapshot of a simulation
    pub fn from_bubble(bubble: &Bubble) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            params: bubble.params().clone(),
            trajectory: bubble.trajectory().clone(),
            stats: bubble.stats.clone(),
        }
    }

    /// Rebuild the simulation, checking the trajectory invariants
    pub fn into_bubble(self) -> Result<Bubble> {
        if self.format_version != FORMAT_VERSION {
            return Err(BubbleError::UnsupportedFormatVersion {
                found: self.format_version,
                expected: FORMAT_VERSION,
            });
        }
        Bubble::from_parts(self.params, self.trajectory, self.stats)
    }

    /// Serialize as JSON to `writer`
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Parse a record from `reader`
    ///
    /// The version is checked before the body is interpreted, so records
    /// from another schema report `UnsupportedFormatVersion` rather than a
    /// field mismatch.
    pub fn read<R: Read>(reader: R) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_reader(reader)?;
        let found = value
            .get("format_version")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| {
                BubbleError::Json(serde::de::Error::missing_field("format_version"))
            })?;
        if found != u64::from(FORMAT_VERSION) {
            return Err(BubbleError::UnsupportedFormatVersion {
                found: u32::try_from(found).unwrap_or(u32::MAX),
                expected: FORMAT_VERSION,
            });
        }
        Ok(serde_json::from_value(value)?)
    }
}

impl Bubble {
    /// Write the simulation to `writer`
    pub fn save<W: Write>(&self, writer: W) -> Result<()> {
        SimulationRecord::from_bubble(self).write(writer)
    }

    /// Read a simulation from `reader`
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        SimulationRecord::read(reader)?.into_bubble()
    }

    /// Write the simulation to a file, replacing it if present
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a simulation from a file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(BufReader::new(File::open(path)?))
    }
}
