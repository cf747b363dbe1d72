use std::{cmp::max, fmt};

use log::warn;

use crate::error::{ChartError, ChartResult};
use crate::time::Resolution;

pub const DEFAULT_SIGNATURE_NUM_BEATS: u32 = 4;
pub const DEFAULT_SIGNATURE_NOTE_VALUE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
  num_beats: u32,  // numerator
  note_value: u32, // denominator
}

impl Signature {
  pub fn new(num_beats: u32, note_value: u32) -> Signature {
    Signature {
      num_beats,
      note_value,
    }
  }

  pub fn validated(num_beats: u32, note_value: u32) -> ChartResult<Signature> {
    let signature = Signature::new(num_beats, note_value);
    signature.validate()?;
    Ok(signature)
  }

  pub fn get_num_beats(&self) -> u32 {
    self.num_beats
  }

  pub fn get_note_value(&self) -> u32 {
    self.note_value
  }

  pub fn validate(&self) -> ChartResult<()> {
    if self.num_beats == 0 || self.note_value == 0 {
      return Err(ChartError::invalid_argument(format!(
        "time signature {} needs a non-zero numerator and denominator",
        self
      )));
    }
    if !self.note_value.is_power_of_two() {
      warn!("Time signature {} has a denominator that is not a power of two", self);
    }
    Ok(())
  }

  /// Ticks in one beat, never less than one
  pub fn ticks_per_beat(&self, resolution: Resolution) -> u64 {
    max(1, u64::from(resolution) * 4 / u64::from(self.note_value))
  }

  /// Ticks in one measure, never less than one
  pub fn ticks_per_measure(&self, resolution: Resolution) -> u64 {
    max(
      1,
      u64::from(resolution) * 4 * u64::from(self.num_beats) / u64::from(self.note_value),
    )
  }
}

impl Default for Signature {
  fn default() -> Signature {
    Signature::new(DEFAULT_SIGNATURE_NUM_BEATS, DEFAULT_SIGNATURE_NOTE_VALUE)
  }
}

impl fmt::Display for Signature {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}/{}", self.num_beats, self.note_value)
  }
}
