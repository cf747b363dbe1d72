use std::cell::Cell;

use log::debug;

use crate::error::{ChartError, ChartResult};
use crate::song::object::SongObject;
use crate::song::sync::{SyncDefaults, TempoEvent, TimeSignatureEvent};
use crate::time::{BarsTime, Resolution, Seconds, Signature, Tempo, TicksTime, SECONDS_PER_MINUTE};

/// A run of ticks played at a single tempo, anchored at the time it starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoSegment {
  tick: TicksTime,
  tempo: Tempo,
  start_time: Seconds,
}

impl TempoSegment {
  pub fn get_tick(&self) -> TicksTime {
    self.tick
  }

  pub fn get_tempo(&self) -> Tempo {
    self.tempo
  }

  pub fn get_start_time(&self) -> Seconds {
    self.start_time
  }
}

/// A run of measures sharing a signature. Measures restart at every signature change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignatureSegment {
  tick: TicksTime,
  signature: Signature,
  start_bar: u64,
}

impl SignatureSegment {
  pub fn get_tick(&self) -> TicksTime {
    self.tick
  }

  pub fn get_signature(&self) -> Signature {
    self.signature
  }

  pub fn get_start_bar(&self) -> u64 {
    self.start_bar
  }
}

/// Tick to time conversion over the sync track of a song
#[derive(Debug, Clone)]
pub struct TempoMap {
  resolution: Resolution,
  defaults: SyncDefaults,
  tempo_segments: Vec<TempoSegment>,
  signature_segments: Vec<SignatureSegment>,
  last_segment: Cell<usize>,
}

impl TempoMap {
  /// A map with only the default tempo and signature from tick 0
  pub fn new(resolution: Resolution, defaults: SyncDefaults) -> ChartResult<TempoMap> {
    TempoMap::build(resolution, defaults, &[], &[])
  }

  pub fn build(
    resolution: Resolution,
    defaults: SyncDefaults,
    tempos: &[TempoEvent],
    signatures: &[TimeSignatureEvent],
  ) -> ChartResult<TempoMap> {
    if resolution == 0 {
      return Err(ChartError::inconsistent("the resolution must be at least one tick"));
    }
    defaults
      .tempo
      .validate()
      .map_err(|err| ChartError::inconsistent(format!("no usable default tempo: {}", err)))?;
    defaults
      .signature
      .validate()
      .map_err(|err| ChartError::inconsistent(format!("no usable default signature: {}", err)))?;

    let mut tempo_map = TempoMap {
      resolution,
      defaults,
      tempo_segments: Vec::new(),
      signature_segments: Vec::new(),
      last_segment: Cell::new(0),
    };
    tempo_map.rebuild(tempos, signatures);
    Ok(tempo_map)
  }

  /// Recomputes every anchor from the sync events. Both slices must be sorted by tick.
  pub fn rebuild(&mut self, tempos: &[TempoEvent], signatures: &[TimeSignatureEvent]) {
    self.rebuild_tempo_segments(tempos);
    self.rebuild_signature_segments(signatures);
    self.last_segment.set(0);
    debug!(
      "Tempo map rebuilt: {} tempo segments, {} signature segments",
      self.tempo_segments.len(),
      self.signature_segments.len()
    );
  }

  fn rebuild_tempo_segments(&mut self, tempos: &[TempoEvent]) {
    let resolution = self.resolution;
    let segments = &mut self.tempo_segments;
    segments.clear();
    segments.push(TempoSegment {
      tick: TicksTime::zero(),
      tempo: self.defaults.tempo,
      start_time: 0.0,
    });

    for event in tempos {
      let last = segments[segments.len() - 1];
      if event.tick() == last.tick {
        // the latest event sharing a tick wins
        if let Some(segment) = segments.last_mut() {
          segment.tempo = event.get_tempo();
        }
      } else {
        let elapsed = u64::from(event.tick() - last.tick);
        segments.push(TempoSegment {
          tick: event.tick(),
          tempo: event.get_tempo(),
          start_time: last.start_time + ticks_to_seconds(elapsed, last.tempo, resolution),
        });
      }
    }
  }

  fn rebuild_signature_segments(&mut self, signatures: &[TimeSignatureEvent]) {
    let resolution = self.resolution;
    let segments = &mut self.signature_segments;
    segments.clear();
    segments.push(SignatureSegment {
      tick: TicksTime::zero(),
      signature: self.defaults.signature,
      start_bar: 0,
    });

    for event in signatures {
      let last = segments[segments.len() - 1];
      if event.tick() == last.tick {
        if let Some(segment) = segments.last_mut() {
          segment.signature = event.get_signature();
        }
      } else {
        let elapsed = u64::from(event.tick() - last.tick);
        let measure = last.signature.ticks_per_measure(resolution);
        // a signature placed mid-measure starts a new measure
        let bars = (elapsed + measure - 1) / measure;
        segments.push(SignatureSegment {
          tick: event.tick(),
          signature: event.get_signature(),
          start_bar: last.start_bar + bars,
        });
      }
    }
  }

  pub fn get_resolution(&self) -> Resolution {
    self.resolution
  }

  pub fn get_defaults(&self) -> SyncDefaults {
    self.defaults
  }

  pub fn tempo_segments(&self) -> &[TempoSegment] {
    &self.tempo_segments
  }

  pub fn signature_segments(&self) -> &[SignatureSegment] {
    &self.signature_segments
  }

  pub fn tick_to_time(&self, tick: TicksTime) -> Seconds {
    let segment = self.tempo_segments[self.tempo_segment_index(tick)];
    let elapsed = u64::from(tick - segment.tick);
    segment.start_time + ticks_to_seconds(elapsed, segment.tempo, self.resolution)
  }

  /// Nearest tick for a time. Negative or undefined times map to tick 0.
  pub fn time_to_tick(&self, time: Seconds) -> TicksTime {
    if time.is_nan() || time <= 0.0 {
      return TicksTime::zero();
    }

    let count = self
      .tempo_segments
      .partition_point(|segment| segment.start_time <= time);
    let segment = self.tempo_segments[count.saturating_sub(1)];
    let elapsed = (time - segment.start_time) * segment.tempo.ticks_per_second(self.resolution);
    let ticks = u64::from(segment.tick) as f64 + elapsed.round();
    if ticks >= f64::from(TicksTime::MAX) {
      TicksTime::MAX
    } else {
      TicksTime::saturating_from_u64(ticks as u64)
    }
  }

  /// Latest tick whose time is not after `time`
  pub fn last_tick_at(&self, time: Seconds) -> TicksTime {
    let tick = self.time_to_tick(time);
    if tick > TicksTime::zero() && self.tick_to_time(tick) > time {
      tick - TicksTime::new(1)
    } else {
      tick
    }
  }

  pub fn tempo_at(&self, tick: TicksTime) -> Tempo {
    self.tempo_segments[self.tempo_segment_index(tick)].tempo
  }

  pub fn signature_at(&self, tick: TicksTime) -> Signature {
    self.signature_segment_at(tick).signature
  }

  pub fn signature_segment_index(&self, tick: TicksTime) -> usize {
    let count = self
      .signature_segments
      .partition_point(|segment| segment.tick <= tick);
    count.saturating_sub(1)
  }

  pub fn signature_segment_at(&self, tick: TicksTime) -> &SignatureSegment {
    &self.signature_segments[self.signature_segment_index(tick)]
  }

  /// Tick where the signature segment following the one active at `tick` starts
  pub fn next_signature_tick(&self, tick: TicksTime) -> Option<TicksTime> {
    self
      .signature_segments
      .get(self.signature_segment_index(tick) + 1)
      .map(|segment| segment.tick)
  }

  pub fn measure_length_at(&self, tick: TicksTime) -> u64 {
    self
      .signature_at(tick)
      .ticks_per_measure(self.resolution)
  }

  /// Tick where the measure containing `tick` begins
  pub fn measure_start(&self, tick: TicksTime) -> TicksTime {
    let segment = self.signature_segment_at(tick);
    let measure = segment.signature.ticks_per_measure(self.resolution);
    let offset = u64::from(tick - segment.tick);
    TicksTime::saturating_from_u64(u64::from(segment.tick) + offset / measure * measure)
  }

  pub fn tick_to_bars(&self, tick: TicksTime) -> BarsTime {
    let segment = self.signature_segment_at(tick);
    let offset = tick - segment.tick;
    let time = BarsTime::from_ticks(offset, segment.signature, self.resolution);
    BarsTime::new(
      time.get_bars() + segment.start_bar,
      time.get_beats(),
      time.get_ticks(),
    )
  }

  pub fn bars_to_tick(&self, time: &BarsTime) -> TicksTime {
    let count = self
      .signature_segments
      .partition_point(|segment| segment.start_bar <= time.get_bars());
    let segment = self.signature_segments[count.saturating_sub(1)];
    let local = BarsTime::new(
      time.get_bars() - segment.start_bar,
      time.get_beats(),
      time.get_ticks(),
    );
    let offset = local.to_ticks(segment.signature, self.resolution);
    segment.tick.saturating_add(offset)
  }

  fn tempo_segment_index(&self, tick: TicksTime) -> usize {
    let segments = &self.tempo_segments;
    let hint = self.last_segment.get();
    if hint < segments.len()
      && segments[hint].tick <= tick
      && segments.get(hint + 1).map_or(true, |next| tick < next.tick)
    {
      return hint;
    }

    let count = segments.partition_point(|segment| segment.tick <= tick);
    let index = count.saturating_sub(1);
    self.last_segment.set(index);
    index
  }
}

fn ticks_to_seconds(ticks: u64, tempo: Tempo, resolution: Resolution) -> Seconds {
  ticks as f64 * SECONDS_PER_MINUTE / (tempo.get_value() * f64::from(resolution))
}
