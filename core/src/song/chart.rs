use std::fmt;

use crate::error::ChartResult;
use crate::song::collection::OrderedCollection;
use crate::song::object::{ObjectId, SongObject};
use crate::time::{Seconds, TempoMap, TicksTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
  Expert,
}

impl Difficulty {
  pub const ALL: [Difficulty; 4] = [
    Difficulty::Easy,
    Difficulty::Medium,
    Difficulty::Hard,
    Difficulty::Expert,
  ];
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match self {
      Difficulty::Easy => "Easy",
      Difficulty::Medium => "Medium",
      Difficulty::Hard => "Hard",
      Difficulty::Expert => "Expert",
    };
    write!(f, "{}", name)
  }
}

type Lane = u32;

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
  id: ObjectId,
  tick: TicksTime,
  lane: Lane,
  sustain: TicksTime,
}

impl Note {
  pub fn new(tick: TicksTime, lane: Lane, sustain: TicksTime) -> Note {
    Note {
      id: ObjectId::new(),
      tick,
      lane,
      sustain,
    }
  }

  pub fn get_lane(&self) -> Lane {
    self.lane
  }

  pub fn get_sustain(&self) -> TicksTime {
    self.sustain
  }

  pub fn set_sustain(&mut self, sustain: TicksTime) {
    self.sustain = sustain;
  }

  pub fn end_tick(&self) -> TicksTime {
    self.tick.saturating_add(self.sustain)
  }
}

impl SongObject for Note {
  fn id(&self) -> ObjectId {
    self.id
  }

  fn tick(&self) -> TicksTime {
    self.tick
  }

  fn set_tick(&mut self, tick: TicksTime) {
    self.tick = tick;
  }

  /// Chords list their notes by lane
  fn sort_rank(&self) -> u32 {
    self.lane
  }
}

/// The notes of one difficulty. Timing comes from the song's tempo map.
#[derive(Debug, Clone, Default)]
pub struct Chart {
  notes: OrderedCollection<Note>,
}

impl Chart {
  pub fn new() -> Chart {
    Chart::default()
  }

  pub fn notes(&self) -> &OrderedCollection<Note> {
    &self.notes
  }

  pub fn add_note(&mut self, note: Note) -> ObjectId {
    let id = note.id();
    self.notes.insert(note);
    id
  }

  pub fn add_notes(&mut self, notes: Vec<Note>) -> &mut Self {
    self.notes.extend(notes);
    self
  }

  pub fn remove_note(&mut self, note: &Note) -> ChartResult<Note> {
    self.notes.remove(note)
  }

  pub fn move_note(&mut self, id: ObjectId, tick: TicksTime) -> ChartResult<usize> {
    self.notes.move_to(id, tick)
  }

  pub fn shift_note(&mut self, id: ObjectId, delta: i64) -> ChartResult<usize> {
    self.notes.shift(id, delta)
  }

  pub fn notes_range(&self, start: TicksTime, end: TicksTime) -> &[Note] {
    self.notes.range(start, end)
  }

  /// Notes starting within a time window, for the part of the chart on screen
  pub fn notes_in_time_range(&self, tempo_map: &TempoMap, start: Seconds, end: Seconds) -> &[Note] {
    let start_tick = tempo_map.time_to_tick(start);
    let end_tick = tempo_map.time_to_tick(end).saturating_add(TicksTime::new(1));
    self.notes.range(start_tick, end_tick)
  }

  pub fn note_time(&self, tempo_map: &TempoMap, note: &Note) -> Seconds {
    tempo_map.tick_to_time(note.tick())
  }

  /// Seconds a note is held for, following any tempo changes inside the sustain
  pub fn sustain_duration(&self, tempo_map: &TempoMap, note: &Note) -> Seconds {
    tempo_map.tick_to_time(note.end_tick()) - tempo_map.tick_to_time(note.tick())
  }
}
