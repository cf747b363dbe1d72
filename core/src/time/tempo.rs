use std::fmt;

use crate::error::{ChartError, ChartResult};
use crate::time::{Resolution, Seconds, SECONDS_PER_MINUTE};

pub const DEFAULT_TEMPO: f64 = 120.0;

/// Quarter notes per minute
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Tempo(f64);

impl Tempo {
  pub fn new(value: f64) -> Tempo {
    Tempo(value)
  }

  pub fn validated(value: f64) -> ChartResult<Tempo> {
    let tempo = Tempo(value);
    tempo.validate()?;
    Ok(tempo)
  }

  pub fn get_value(&self) -> f64 {
    self.0
  }

  pub fn validate(&self) -> ChartResult<()> {
    if self.0.is_finite() && self.0 > 0.0 {
      Ok(())
    } else {
      Err(ChartError::invalid_argument(format!(
        "tempo must be a positive number of beats per minute, got {}",
        self.0
      )))
    }
  }

  pub fn seconds_per_tick(&self, resolution: Resolution) -> Seconds {
    SECONDS_PER_MINUTE / (self.0 * f64::from(resolution))
  }

  pub fn ticks_per_second(&self, resolution: Resolution) -> f64 {
    self.0 * f64::from(resolution) / SECONDS_PER_MINUTE
  }
}

impl Default for Tempo {
  fn default() -> Tempo {
    Tempo(DEFAULT_TEMPO)
  }
}

impl fmt::Display for Tempo {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:.3} bpm", self.0)
  }
}

impl From<Tempo> for f64 {
  fn from(item: Tempo) -> Self {
    item.0
  }
}
