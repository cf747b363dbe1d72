use std::fmt;

use crate::time::{Resolution, Signature, TicksTime};

/// Musical position as measure, beat and remaining ticks, all zero based
#[derive(PartialEq, Clone, Copy)]
pub struct BarsTime {
  bars: u64,
  beats: u32,
  ticks: u32,
}

impl BarsTime {
  pub fn new(bars: u64, beats: u32, ticks: u32) -> BarsTime {
    BarsTime { bars, beats, ticks }
  }

  pub fn from_bars(bars: u64) -> BarsTime {
    BarsTime::new(bars, 0, 0)
  }

  /// Decomposes ticks measured from the start of a run of measures in a single signature
  pub fn from_ticks(ticks_time: TicksTime, signature: Signature, resolution: Resolution) -> BarsTime {
    let num_ticks = u64::from(ticks_time);
    let ticks_per_measure = signature.ticks_per_measure(resolution);
    let ticks_per_beat = signature.ticks_per_beat(resolution);
    let within_measure = num_ticks % ticks_per_measure;
    BarsTime {
      bars: num_ticks / ticks_per_measure,
      beats: (within_measure / ticks_per_beat) as u32,
      ticks: (within_measure % ticks_per_beat) as u32,
    }
  }

  pub fn get_bars(&self) -> u64 {
    self.bars
  }

  pub fn get_beats(&self) -> u32 {
    self.beats
  }

  pub fn get_ticks(&self) -> u32 {
    self.ticks
  }

  pub fn to_ticks(&self, signature: Signature, resolution: Resolution) -> TicksTime {
    let ticks_per_measure = signature.ticks_per_measure(resolution);
    let ticks_per_beat = signature.ticks_per_beat(resolution);
    TicksTime::saturating_from_u64(
      self.bars * ticks_per_measure + u64::from(self.beats) * ticks_per_beat + u64::from(self.ticks),
    )
  }
}

impl fmt::Debug for BarsTime {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "{:03}:{:02}:{:03}",
      self.bars + 1,
      self.beats + 1,
      self.ticks
    )
  }
}

impl fmt::Display for BarsTime {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}
