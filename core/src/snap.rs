use std::cmp::min;

use crate::error::{ChartError, ChartResult};
use crate::time::{TempoMap, TicksTime};

/// Notes per whole note for a quarter note grid
pub const QUARTER_STEP: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Forward,
  Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridLineKind {
  Measure,
  Beat,
  Step,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLine {
  pub tick: TicksTime,
  pub kind: GridLineKind,
}

/// Grid lines `resolution * 4 / step` ticks apart, restarting at every time signature change.
///
/// Lines sit at `anchor + floor(k * resolution * 4 / step)` where the anchor is the tick of the
/// signature in effect, so uneven steps still land on whole ticks.
pub struct SnapGrid<'a> {
  tempo_map: &'a TempoMap,
  max_tick: TicksTime,
}

impl<'a> SnapGrid<'a> {
  pub fn new(tempo_map: &'a TempoMap, max_tick: TicksTime) -> SnapGrid<'a> {
    SnapGrid {
      tempo_map,
      max_tick,
    }
  }

  pub fn get_max_tick(&self) -> TicksTime {
    self.max_tick
  }

  /// Nearest grid line to a tick. When two lines are equally far the later one wins.
  pub fn snap_to_grid(&self, tick: TicksTime, step: u32) -> ChartResult<TicksTime> {
    let spacing = self.spacing(step)?;
    let (lower, upper) = grid_cell(self.tempo_map, tick, spacing);
    let tick = u64::from(tick);
    let snapped = if tick - lower < upper - tick {
      lower
    } else {
      upper
    };
    Ok(TicksTime::saturating_from_u64(snapped))
  }

  /// First grid line after the tick, never past the end of the song
  pub fn increment_step(&self, tick: TicksTime, step: u32) -> ChartResult<TicksTime> {
    let spacing = self.spacing(step)?;
    let (_, upper) = grid_cell(self.tempo_map, tick, spacing);
    Ok(min(TicksTime::saturating_from_u64(upper), self.max_tick))
  }

  /// Last grid line before the tick, never below zero
  pub fn decrement_step(&self, tick: TicksTime, step: u32) -> ChartResult<TicksTime> {
    let spacing = self.spacing(step)?;
    if tick == TicksTime::zero() {
      return Ok(tick);
    }
    let (lower, _) = grid_cell(self.tempo_map, tick - TicksTime::new(1), spacing);
    Ok(min(TicksTime::saturating_from_u64(lower), self.max_tick))
  }

  pub fn step(&self, tick: TicksTime, step: u32, direction: Direction) -> ChartResult<TicksTime> {
    match direction {
      Direction::Forward => self.increment_step(tick, step),
      Direction::Backward => self.decrement_step(tick, step),
    }
  }

  /// Same place in the next or previous measure, snapped to the grid.
  /// The offset into the measure is kept unless the target measure is shorter.
  pub fn measure_jump(&self, tick: TicksTime, step: u32, direction: Direction) -> ChartResult<TicksTime> {
    let current = u64::from(self.tempo_map.measure_start(tick));
    let offset = u64::from(tick) - current;
    let (start, end) = match direction {
      Direction::Forward => {
        let start = self.measure_end(current);
        (start, self.measure_end(start))
      }
      // nothing before the first measure
      Direction::Backward if current == 0 => (0, 1),
      Direction::Backward => {
        let previous = TicksTime::saturating_from_u64(current - 1);
        (u64::from(self.tempo_map.measure_start(previous)), current)
      }
    };
    let target = start + min(offset, end - start - 1);
    let snapped = self.snap_to_grid(TicksTime::saturating_from_u64(target), step)?;
    Ok(min(snapped, self.max_tick))
  }

  /// Where the measure starting at `start` ends, cut short by a signature change
  fn measure_end(&self, start: u64) -> u64 {
    let tick = TicksTime::saturating_from_u64(start);
    let end = start + self.tempo_map.measure_length_at(tick);
    match self.tempo_map.next_signature_tick(tick) {
      Some(next) => min(end, u64::from(next)),
      None => end,
    }
  }

  /// Grid lines with `start <= tick < end`
  pub fn lines(&self, start: TicksTime, end: TicksTime, step: u32) -> ChartResult<GridLines<'a>> {
    let spacing = self.spacing(step)?;
    let first = if start == TicksTime::zero() {
      0
    } else {
      grid_cell(self.tempo_map, start - TicksTime::new(1), spacing).1
    };
    Ok(GridLines {
      tempo_map: self.tempo_map,
      spacing,
      next: first,
      end: u64::from(end),
    })
  }

  fn spacing(&self, step: u32) -> ChartResult<Spacing> {
    if step == 0 {
      return Err(ChartError::invalid_argument("the snapping step must be at least 1"));
    }
    let whole = u64::from(self.tempo_map.get_resolution()) * 4;
    Ok(Spacing {
      whole,
      step: min(u64::from(step), whole),
    })
  }
}

#[derive(Debug, Clone, Copy)]
struct Spacing {
  whole: u64,
  step: u64,
}

impl Spacing {
  fn line(&self, anchor: u64, index: u64) -> u64 {
    anchor + index * self.whole / self.step
  }

  /// Index of the last line at or before `offset` ticks from the anchor
  fn index_at(&self, offset: u64) -> u64 {
    ((offset + 1) * self.step - 1) / self.whole
  }
}

/// The grid lines around a tick, `lower <= tick < upper`. A signature change cuts the cell short.
fn grid_cell(tempo_map: &TempoMap, tick: TicksTime, spacing: Spacing) -> (u64, u64) {
  let anchor = u64::from(tempo_map.signature_segment_at(tick).get_tick());
  let index = spacing.index_at(u64::from(tick) - anchor);
  let lower = spacing.line(anchor, index);
  let upper = spacing.line(anchor, index + 1);
  match tempo_map.next_signature_tick(tick) {
    Some(next) => (lower, min(upper, u64::from(next))),
    None => (lower, upper),
  }
}

pub struct GridLines<'a> {
  tempo_map: &'a TempoMap,
  spacing: Spacing,
  next: u64,
  end: u64,
}

impl<'a> GridLines<'a> {
  fn kind(&self, tick: TicksTime) -> GridLineKind {
    let measure_start = self.tempo_map.measure_start(tick);
    if measure_start == tick {
      GridLineKind::Measure
    } else {
      let beat = self
        .tempo_map
        .signature_at(tick)
        .ticks_per_beat(self.tempo_map.get_resolution());
      if u64::from(tick - measure_start) % beat == 0 {
        GridLineKind::Beat
      } else {
        GridLineKind::Step
      }
    }
  }
}

impl<'a> Iterator for GridLines<'a> {
  type Item = GridLine;

  fn next(&mut self) -> Option<GridLine> {
    if self.next >= self.end || self.next > u64::from(TicksTime::MAX) {
      return None;
    }
    let tick = TicksTime::saturating_from_u64(self.next);
    self.next = grid_cell(self.tempo_map, tick, self.spacing).1;
    Some(GridLine {
      tick,
      kind: self.kind(tick),
    })
  }
}

#[cfg(test)]
mod test {

  use super::{Direction, GridLineKind, SnapGrid};
  use crate::error::ChartError;
  use crate::song::sync::{SyncDefaults, TimeSignatureEvent};
  use crate::time::{Signature, TempoMap, TicksTime};

  fn plain_map() -> TempoMap {
    TempoMap::new(192, SyncDefaults::default()).unwrap()
  }

  fn map_with_signatures(signatures: &[(u32, u32, u32)]) -> TempoMap {
    let events: Vec<TimeSignatureEvent> = signatures
      .iter()
      .map(|(tick, num, den)| TimeSignatureEvent::new(TicksTime::new(*tick), Signature::new(*num, *den)))
      .collect();
    TempoMap::build(192, SyncDefaults::default(), &[], &events).unwrap()
  }

  fn ticks(values: &[u32]) -> Vec<TicksTime> {
    values.iter().map(|t| TicksTime::new(*t)).collect()
  }

  #[test]
  pub fn snap_to_quarter_grid() {
    let tempo_map = plain_map();
    let grid = SnapGrid::new(&tempo_map, TicksTime::MAX);
    for tick in 0..2000u32 {
      let snapped = u32::from(grid.snap_to_grid(TicksTime::new(tick), 4).unwrap());
      assert_eq!(snapped % 192, 0);
      let distance = (i64::from(snapped) - i64::from(tick)).abs();
      assert!(distance <= 96);
      if distance == 96 {
        assert!(snapped > tick);
      }
    }
  }

  #[test]
  /// Halfway between two lines goes to the later one
  pub fn snap_ties_round_up() {
    let tempo_map = plain_map();
    let grid = SnapGrid::new(&tempo_map, TicksTime::MAX);
    assert_eq!(grid.snap_to_grid(TicksTime::new(96), 4), Ok(TicksTime::new(192)));
    assert_eq!(grid.snap_to_grid(TicksTime::new(95), 4), Ok(TicksTime::new(0)));
    assert_eq!(grid.snap_to_grid(TicksTime::new(24), 16), Ok(TicksTime::new(48)));
  }

  #[test]
  pub fn snap_rejects_zero_step() {
    let tempo_map = plain_map();
    let grid = SnapGrid::new(&tempo_map, TicksTime::MAX);
    assert!(matches!(
      grid.snap_to_grid(TicksTime::new(10), 0),
      Err(ChartError::InvalidArgument { .. })
    ));
    assert!(grid.increment_step(TicksTime::new(10), 0).is_err());
    assert!(grid.decrement_step(TicksTime::new(0), 0).is_err());
  }

  #[test]
  /// Steps that do not divide a whole note still give strictly increasing lines
  pub fn snap_uneven_step() {
    let tempo_map = plain_map();
    let grid = SnapGrid::new(&tempo_map, TicksTime::MAX);
    let lines: Vec<TicksTime> = grid
      .lines(TicksTime::zero(), TicksTime::new(769), 7)
      .unwrap()
      .map(|line| line.tick)
      .collect();
    assert_eq!(lines, ticks(&[0, 109, 219, 329, 438, 548, 658, 768]));
    assert_eq!(grid.snap_to_grid(TicksTime::new(109), 7), Ok(TicksTime::new(109)));
    assert_eq!(grid.increment_step(TicksTime::new(109), 7), Ok(TicksTime::new(219)));
  }

  #[test]
  /// Steps finer than a tick fall back to one tick
  pub fn snap_step_finer_than_a_tick() {
    let tempo_map = TempoMap::new(1, SyncDefaults::default()).unwrap();
    let grid = SnapGrid::new(&tempo_map, TicksTime::MAX);
    assert_eq!(grid.increment_step(TicksTime::new(3), 64), Ok(TicksTime::new(4)));
    assert_eq!(grid.snap_to_grid(TicksTime::new(3), 64), Ok(TicksTime::new(3)));
  }

  #[test]
  /// The grid restarts at a time signature that is off the previous grid
  pub fn snap_reanchors_at_signature() {
    let tempo_map = map_with_signatures(&[(700, 3, 4)]);
    let grid = SnapGrid::new(&tempo_map, TicksTime::MAX);
    assert_eq!(grid.snap_to_grid(TicksTime::new(720), 4), Ok(TicksTime::new(700)));
    assert_eq!(grid.snap_to_grid(TicksTime::new(800), 4), Ok(TicksTime::new(892)));
    // the signature change is the closest line for ticks just before it
    assert_eq!(grid.snap_to_grid(TicksTime::new(690), 4), Ok(TicksTime::new(700)));
    assert_eq!(grid.increment_step(TicksTime::new(576), 4), Ok(TicksTime::new(700)));
    assert_eq!(grid.decrement_step(TicksTime::new(700), 4), Ok(TicksTime::new(576)));
  }

  #[test]
  pub fn increment_and_decrement() {
    let tempo_map = plain_map();
    let grid = SnapGrid::new(&tempo_map, TicksTime::MAX);
    assert_eq!(grid.increment_step(TicksTime::new(0), 16), Ok(TicksTime::new(48)));
    assert_eq!(grid.increment_step(TicksTime::new(50), 16), Ok(TicksTime::new(96)));
    assert_eq!(grid.decrement_step(TicksTime::new(96), 16), Ok(TicksTime::new(48)));
    assert_eq!(grid.decrement_step(TicksTime::new(50), 16), Ok(TicksTime::new(48)));
    assert_eq!(grid.decrement_step(TicksTime::new(0), 16), Ok(TicksTime::new(0)));
    assert_eq!(
      grid.step(TicksTime::new(48), 16, Direction::Backward),
      Ok(TicksTime::new(0))
    );
  }

  #[test]
  pub fn increment_clamps_to_song_end() {
    let tempo_map = plain_map();
    let grid = SnapGrid::new(&tempo_map, TicksTime::new(1000));
    assert_eq!(grid.increment_step(TicksTime::new(960), 4), Ok(TicksTime::new(1000)));
    assert_eq!(grid.increment_step(TicksTime::new(1000), 4), Ok(TicksTime::new(1000)));
  }

  #[test]
  /// Stepping forward then back from a grid line returns to it
  pub fn increment_decrement_round_trip() {
    let tempo_map = map_with_signatures(&[(0, 4, 4), (700, 3, 4), (1900, 7, 8)]);
    let grid = SnapGrid::new(&tempo_map, TicksTime::MAX);
    for step in &[1u32, 3, 4, 12, 16, 32] {
      let lines: Vec<_> = grid
        .lines(TicksTime::zero(), TicksTime::new(4000), *step)
        .unwrap()
        .collect();
      for line in lines {
        let forward = grid.increment_step(line.tick, *step).unwrap();
        assert!(forward > line.tick);
        assert_eq!(grid.decrement_step(forward, *step), Ok(line.tick));
      }
    }
  }

  #[test]
  pub fn measure_jump() {
    let tempo_map = map_with_signatures(&[(768, 3, 4)]);
    let grid = SnapGrid::new(&tempo_map, TicksTime::new(5000));
    assert_eq!(
      grid.measure_jump(TicksTime::new(0), 4, Direction::Forward),
      Ok(TicksTime::new(768))
    );
    assert_eq!(
      grid.measure_jump(TicksTime::new(768), 4, Direction::Forward),
      Ok(TicksTime::new(1344))
    );
    assert_eq!(
      grid.measure_jump(TicksTime::new(100), 4, Direction::Backward),
      Ok(TicksTime::new(0))
    );
    assert_eq!(
      grid.measure_jump(TicksTime::new(4900), 4, Direction::Forward),
      Ok(TicksTime::new(5000))
    );
  }

  #[test]
  /// Jumping back over a signature change lands on the earlier measure
  pub fn measure_jump_across_signature() {
    let tempo_map = map_with_signatures(&[(768, 3, 4)]);
    let grid = SnapGrid::new(&tempo_map, TicksTime::MAX);
    assert_eq!(
      grid.measure_jump(TicksTime::new(768), 4, Direction::Backward),
      Ok(TicksTime::new(0))
    );
    assert_eq!(
      grid.measure_jump(TicksTime::new(960), 4, Direction::Backward),
      Ok(TicksTime::new(192))
    );
    assert_eq!(
      grid.measure_jump(TicksTime::new(1344), 4, Direction::Backward),
      Ok(TicksTime::new(768))
    );
    // a 3/4 measure has no fourth beat, the target snaps to the following measure line
    assert_eq!(
      grid.measure_jump(TicksTime::new(576), 4, Direction::Forward),
      Ok(TicksTime::new(1344))
    );
  }

  #[test]
  /// A signature in the middle of a measure starts the next one early
  pub fn measure_jump_to_mid_measure_signature() {
    let tempo_map = map_with_signatures(&[(700, 3, 4)]);
    let grid = SnapGrid::new(&tempo_map, TicksTime::MAX);
    assert_eq!(
      grid.measure_jump(TicksTime::new(0), 4, Direction::Forward),
      Ok(TicksTime::new(700))
    );
    assert_eq!(
      grid.measure_jump(TicksTime::new(700), 4, Direction::Backward),
      Ok(TicksTime::new(0))
    );
  }

  #[test]
  pub fn grid_lines_kinds() {
    let tempo_map = map_with_signatures(&[(768, 3, 4)]);
    let grid = SnapGrid::new(&tempo_map, TicksTime::MAX);
    let lines: Vec<(u32, GridLineKind)> = grid
      .lines(TicksTime::new(500), TicksTime::new(1344), 8)
      .unwrap()
      .map(|line| (line.tick.get_ticks(), line.kind))
      .collect();
    assert_eq!(
      lines,
      vec![
        (576, GridLineKind::Beat),
        (672, GridLineKind::Step),
        (768, GridLineKind::Measure),
        (864, GridLineKind::Step),
        (960, GridLineKind::Beat),
        (1056, GridLineKind::Step),
        (1152, GridLineKind::Beat),
        (1248, GridLineKind::Step),
      ]
    );
  }
}
