use log::warn;

use crate::error::{ChartError, ChartResult};
use crate::time::{Seconds, TempoMap, TicksTime};

/// Render units covered by one second of chart at hyperspeed 1
pub const UNITS_PER_SECOND: f64 = 1.0;

pub const DEFAULT_HYPERSPEED: f64 = 5.0;
pub const DEFAULT_GAME_SPEED: f64 = 1.0;

/// Affine time to render position transform, adjusted by the user at any moment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderScale {
  hyperspeed: f64,
  game_speed: f64,
  origin: f64,
}

impl RenderScale {
  pub fn new(hyperspeed: f64, game_speed: f64) -> ChartResult<RenderScale> {
    let mut scale = RenderScale::default();
    scale.set_hyperspeed(hyperspeed)?;
    scale.set_game_speed(game_speed)?;
    Ok(scale)
  }

  pub fn with_origin(mut self, origin: f64) -> RenderScale {
    self.origin = origin;
    self
  }

  pub fn get_hyperspeed(&self) -> f64 {
    self.hyperspeed
  }

  pub fn set_hyperspeed(&mut self, hyperspeed: f64) -> ChartResult<()> {
    self.hyperspeed = positive("hyperspeed", hyperspeed)?;
    Ok(())
  }

  pub fn get_game_speed(&self) -> f64 {
    self.game_speed
  }

  pub fn set_game_speed(&mut self, game_speed: f64) -> ChartResult<()> {
    self.game_speed = positive("game speed", game_speed)?;
    Ok(())
  }

  pub fn get_origin(&self) -> f64 {
    self.origin
  }

  pub fn time_to_render_position(&self, time: Seconds) -> f64 {
    self.origin + time * self.units_per_second()
  }

  pub fn render_position_to_time(&self, position: f64) -> Seconds {
    (position - self.origin) / self.units_per_second()
  }

  fn units_per_second(&self) -> f64 {
    UNITS_PER_SECOND * self.hyperspeed / self.game_speed
  }
}

impl Default for RenderScale {
  fn default() -> RenderScale {
    RenderScale {
      hyperspeed: DEFAULT_HYPERSPEED,
      game_speed: DEFAULT_GAME_SPEED,
      origin: 0.0,
    }
  }
}

fn positive(name: &str, value: f64) -> ChartResult<f64> {
  if value.is_finite() && value > 0.0 {
    Ok(value)
  } else {
    Err(ChartError::invalid_argument(format!(
      "{} must be positive, got {}",
      name, value
    )))
  }
}

/// Converts between ticks, time and render positions for a song of a given length.
/// The scale is read on every call so speed changes apply immediately.
pub struct PositionConverter<'a> {
  tempo_map: &'a TempoMap,
  length: Seconds,
}

impl<'a> PositionConverter<'a> {
  pub fn new(tempo_map: &'a TempoMap, length: Seconds) -> PositionConverter<'a> {
    PositionConverter {
      tempo_map,
      length: length.max(0.0),
    }
  }

  pub fn get_length(&self) -> Seconds {
    self.length
  }

  /// Last tick inside the song
  pub fn end_tick(&self) -> TicksTime {
    self.tempo_map.last_tick_at(self.length)
  }

  pub fn end_position(&self, scale: &RenderScale) -> f64 {
    scale.time_to_render_position(self.length)
  }

  pub fn tick_to_render_position(&self, tick: TicksTime, scale: &RenderScale) -> f64 {
    scale.time_to_render_position(self.tempo_map.tick_to_time(tick))
  }

  /// Time under a render position, clamped to the song
  pub fn render_position_to_time(&self, position: f64, scale: &RenderScale) -> Seconds {
    let time = scale.render_position_to_time(position);
    if time.is_nan() {
      warn!("Render position {} has no time, using the song start", position);
      0.0
    } else {
      time.max(0.0).min(self.length)
    }
  }

  pub fn render_position_to_tick(&self, position: f64, scale: &RenderScale) -> TicksTime {
    let tick = self
      .tempo_map
      .time_to_tick(self.render_position_to_time(position, scale));
    tick.min(self.end_tick())
  }

  /// Clamps a render position to the span of the song
  pub fn clamp_position(&self, position: f64, scale: &RenderScale) -> f64 {
    let start = scale.get_origin();
    let end = self.end_position(scale);
    if position.is_nan() || position < start {
      start
    } else if position > end {
      end
    } else {
      position
    }
  }

  /// Shifts a strike line position by the audio calibration so it matches what is heard
  pub fn calibrated_position(&self, position: f64, calibration_ms: f64, scale: &RenderScale) -> f64 {
    let offset = scale.time_to_render_position(calibration_ms / 1000.0) - scale.get_origin();
    position + offset * scale.get_game_speed()
  }

  /// Fraction of the song covered at a render position, from 0 to 1
  pub fn timeline_fraction(&self, position: f64, scale: &RenderScale) -> f64 {
    let total = self.end_position(scale) - scale.get_origin();
    if total > 0.0 {
      (self.clamp_position(position, scale) - scale.get_origin()) / total
    } else {
      0.0
    }
  }

  pub fn position_from_timeline_fraction(&self, fraction: f64, scale: &RenderScale) -> f64 {
    let fraction = if fraction.is_nan() {
      0.0
    } else {
      fraction.max(0.0).min(1.0)
    };
    let total = self.end_position(scale) - scale.get_origin();
    scale.get_origin() + fraction * total
  }
}

#[cfg(test)]
mod test {

  use super::{PositionConverter, RenderScale};
  use crate::song::sync::{SyncDefaults, TempoEvent};
  use crate::time::{Tempo, TempoMap, TicksTime};

  fn tempo_map() -> TempoMap {
    let tempos = vec![
      TempoEvent::new(TicksTime::new(0), Tempo::new(120.0)),
      TempoEvent::new(TicksTime::new(768), Tempo::new(200.0)),
      TempoEvent::new(TicksTime::new(1536), Tempo::new(75.0)),
    ];
    TempoMap::build(192, SyncDefaults::default(), &tempos, &[]).unwrap()
  }

  #[test]
  pub fn render_scale_rejects_non_positive() {
    assert!(RenderScale::new(0.0, 1.0).is_err());
    assert!(RenderScale::new(2.0, -1.0).is_err());
    assert!(RenderScale::new(std::f64::NAN, 1.0).is_err());
    let mut scale = RenderScale::default();
    assert!(scale.set_hyperspeed(-3.0).is_err());
    assert_eq!(scale.get_hyperspeed(), 5.0);
  }

  #[test]
  pub fn tick_to_render_position() {
    let tempo_map = tempo_map();
    let converter = PositionConverter::new(&tempo_map, 60.0);
    let scale = RenderScale::new(4.0, 1.0).unwrap().with_origin(10.0);
    assert_eq!(converter.tick_to_render_position(TicksTime::new(0), &scale), 10.0);
    assert_eq!(converter.tick_to_render_position(TicksTime::new(384), &scale), 14.0);
  }

  #[test]
  pub fn render_position_to_tick_inverts() {
    let tempo_map = tempo_map();
    let converter = PositionConverter::new(&tempo_map, 60.0);
    let scale = RenderScale::new(3.0, 1.5).unwrap();
    for tick in (0..4000).step_by(13) {
      let tick = TicksTime::new(tick);
      let position = converter.tick_to_render_position(tick, &scale);
      assert_eq!(converter.render_position_to_tick(position, &scale), tick);
    }
  }

  #[test]
  pub fn render_position_is_monotonic() {
    let tempo_map = tempo_map();
    let converter = PositionConverter::new(&tempo_map, 60.0);
    let scale = RenderScale::default();
    let end = u32::from(converter.end_tick());
    let mut previous = std::f64::NEG_INFINITY;
    for tick in 0..=end {
      let position = converter.tick_to_render_position(TicksTime::new(tick), &scale);
      assert!(position >= previous);
      previous = position;
    }
  }

  #[test]
  /// Positions outside the song clamp to its start and end
  pub fn render_position_clamps() {
    let tempo_map = tempo_map();
    let converter = PositionConverter::new(&tempo_map, 10.0);
    let scale = RenderScale::default();
    assert_eq!(converter.render_position_to_tick(-50.0, &scale), TicksTime::zero());
    assert_eq!(
      converter.render_position_to_tick(1.0e9, &scale),
      converter.end_tick()
    );
    assert_eq!(converter.render_position_to_time(1.0e9, &scale), 10.0);
    assert_eq!(converter.clamp_position(-1.0, &scale), 0.0);
    assert_eq!(converter.clamp_position(1.0e9, &scale), 50.0);
  }

  #[test]
  /// Changing the scale between calls takes effect at once
  pub fn scale_is_read_per_call() {
    let tempo_map = tempo_map();
    let converter = PositionConverter::new(&tempo_map, 60.0);
    let mut scale = RenderScale::new(1.0, 1.0).unwrap();
    let tick = TicksTime::new(192);
    assert_eq!(converter.tick_to_render_position(tick, &scale), 0.5);
    scale.set_hyperspeed(8.0).unwrap();
    assert_eq!(converter.tick_to_render_position(tick, &scale), 4.0);
    scale.set_game_speed(2.0).unwrap();
    assert_eq!(converter.tick_to_render_position(tick, &scale), 2.0);
  }

  #[test]
  pub fn calibrated_position() {
    let tempo_map = tempo_map();
    let converter = PositionConverter::new(&tempo_map, 60.0);
    let scale = RenderScale::new(2.0, 1.0).unwrap();
    assert_eq!(converter.calibrated_position(3.0, 250.0, &scale), 3.5);
  }

  #[test]
  pub fn timeline_fraction() {
    let tempo_map = tempo_map();
    let converter = PositionConverter::new(&tempo_map, 20.0);
    let scale = RenderScale::new(1.0, 1.0).unwrap().with_origin(5.0);
    assert_eq!(converter.timeline_fraction(15.0, &scale), 0.5);
    assert_eq!(converter.timeline_fraction(100.0, &scale), 1.0);
    assert_eq!(converter.position_from_timeline_fraction(0.25, &scale), 10.0);
    assert_eq!(converter.position_from_timeline_fraction(7.0, &scale), 25.0);

    let empty = PositionConverter::new(&tempo_map, 0.0);
    assert_eq!(empty.timeline_fraction(15.0, &scale), 0.0);
  }
}
