use std::cmp::min;

use log::debug;

use crate::config::Editor;
use crate::error::ChartResult;
use crate::snap::Direction;
use crate::song::{Song, SongObject};
use crate::time::{RenderScale, Seconds, TicksTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationMode {
  Editor,
  Playing,
  Loading,
}

/// The editor strike line. Its render position is the source of truth unless
/// it was last placed on an exact tick.
#[derive(Debug, Clone)]
pub struct ChartCursor {
  position: f64,
  explicit_tick: Option<TicksTime>,
  play_start: Option<f64>,
  scroll_sensitivity: f64,
}

impl ChartCursor {
  pub fn new(scroll_sensitivity: f64) -> ChartCursor {
    ChartCursor {
      position: 0.0,
      explicit_tick: None,
      play_start: None,
      scroll_sensitivity,
    }
  }

  pub fn from_config(config: &Editor) -> ChartCursor {
    ChartCursor::new(config.scroll_sensitivity)
  }

  pub fn get_position(&self) -> f64 {
    self.position
  }

  pub fn get_explicit_tick(&self) -> Option<TicksTime> {
    self.explicit_tick
  }

  pub fn is_playing(&self) -> bool {
    self.play_start.is_some()
  }

  pub fn tick(&self, song: &Song, scale: &RenderScale) -> TicksTime {
    match self.explicit_tick {
      Some(tick) => tick,
      None => song.render_position_to_tick(self.position, scale),
    }
  }

  pub fn time(&self, song: &Song, scale: &RenderScale) -> Seconds {
    song.tick_to_time(self.tick(song, scale))
  }

  pub fn set_tick(&mut self, mode: ApplicationMode, song: &Song, scale: &RenderScale, tick: TicksTime) -> bool {
    if mode != ApplicationMode::Editor {
      return false;
    }
    let tick = min(tick, song.max_tick());
    self.position = song.tick_to_render_position(tick, scale);
    self.explicit_tick = Some(tick);
    true
  }

  pub fn set_time(&mut self, mode: ApplicationMode, song: &Song, scale: &RenderScale, time: Seconds) -> bool {
    if mode != ApplicationMode::Editor {
      return false;
    }
    let time = if time.is_nan() {
      0.0
    } else {
      time.max(0.0).min(song.get_length())
    };
    self.position = scale.time_to_render_position(time);
    self.explicit_tick = None;
    true
  }

  /// Moves by scroll wheel notches
  pub fn scroll(&mut self, mode: ApplicationMode, song: &Song, scale: &RenderScale, notches: f64) -> bool {
    if mode != ApplicationMode::Editor {
      return false;
    }
    let position = self.position + notches * self.scroll_sensitivity;
    self.position = song.converter().clamp_position(position, scale);
    self.explicit_tick = None;
    true
  }

  pub fn step(
    &mut self,
    mode: ApplicationMode,
    song: &Song,
    scale: &RenderScale,
    direction: Direction,
    step: u32,
  ) -> ChartResult<bool> {
    if mode != ApplicationMode::Editor {
      return Ok(false);
    }
    let target = song.snap_grid().step(self.tick(song, scale), step, direction)?;
    Ok(self.move_within_song(song, scale, target))
  }

  pub fn measure(
    &mut self,
    mode: ApplicationMode,
    song: &Song,
    scale: &RenderScale,
    direction: Direction,
    step: u32,
  ) -> ChartResult<bool> {
    if mode != ApplicationMode::Editor {
      return Ok(false);
    }
    let target = song
      .snap_grid()
      .measure_jump(self.tick(song, scale), step, direction)?;
    Ok(self.move_within_song(song, scale, target))
  }

  /// Goes to the next section or the end of the song, or back to the previous section or the start
  pub fn section_jump(&mut self, mode: ApplicationMode, song: &Song, scale: &RenderScale, direction: Direction) -> bool {
    if mode != ApplicationMode::Editor {
      return false;
    }
    let current = self.tick(song, scale);
    let sections = song.sections();
    let target = match direction {
      Direction::Forward => sections
        .find_index_of_next_strict(current)
        .and_then(|index| sections.get(index))
        .map_or(song.max_tick(), |section| section.tick()),
      Direction::Backward => sections
        .find_index_of_previous_strict(current)
        .and_then(|index| sections.get(index))
        .map_or(TicksTime::zero(), |section| section.tick()),
    };
    self.set_tick(mode, song, scale, target)
  }

  pub fn current_section_index(&self, song: &Song, scale: &RenderScale) -> Option<usize> {
    song.sections().find_index_of_previous(self.tick(song, scale))
  }

  pub fn start_playing(&mut self) {
    debug!("Playing from render position {}", self.position);
    self.play_start = Some(self.position);
    self.explicit_tick = None;
  }

  /// Moves the cursor to where playback is after `elapsed` seconds of real time.
  /// Returns true once the end of the song is reached.
  pub fn advance_playing(&mut self, mode: ApplicationMode, song: &Song, scale: &RenderScale, elapsed: Seconds) -> bool {
    if mode != ApplicationMode::Playing {
      return false;
    }
    let start = *self.play_start.get_or_insert(self.position);
    let distance = scale.time_to_render_position(elapsed * scale.get_game_speed()) - scale.get_origin();
    let end = song.converter().end_position(scale);
    self.explicit_tick = None;
    if start + distance >= end {
      self.position = end;
      true
    } else {
      self.position = start + distance;
      false
    }
  }

  /// Returns to where playback started
  pub fn stop_playing(&mut self) {
    if let Some(start) = self.play_start.take() {
      self.position = start;
    }
  }

  pub fn timeline_fraction(&self, song: &Song, scale: &RenderScale) -> f64 {
    song.converter().timeline_fraction(self.position, scale)
  }

  pub fn set_timeline_fraction(
    &mut self,
    mode: ApplicationMode,
    song: &Song,
    scale: &RenderScale,
    fraction: f64,
  ) -> bool {
    if mode != ApplicationMode::Editor {
      return false;
    }
    self.position = song.converter().position_from_timeline_fraction(fraction, scale);
    self.explicit_tick = None;
    true
  }

  fn move_within_song(&mut self, song: &Song, scale: &RenderScale, tick: TicksTime) -> bool {
    if song.tick_to_time(tick) <= song.get_length() {
      self.set_tick(ApplicationMode::Editor, song, scale, tick)
    } else {
      false
    }
  }
}

impl Default for ChartCursor {
  fn default() -> ChartCursor {
    ChartCursor::from_config(&Editor::default())
  }
}
