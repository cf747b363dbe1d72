use std::iter::Peekable;
use std::slice;

use crate::song::object::{ObjectId, SongObject};
use crate::time::{Signature, Tempo, TicksTime};

const TIME_SIGNATURE_RANK: u32 = 0;
const TEMPO_RANK: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct TempoEvent {
  id: ObjectId,
  tick: TicksTime,
  tempo: Tempo,
}

impl TempoEvent {
  pub fn new(tick: TicksTime, tempo: Tempo) -> TempoEvent {
    TempoEvent {
      id: ObjectId::new(),
      tick,
      tempo,
    }
  }

  pub fn get_tempo(&self) -> Tempo {
    self.tempo
  }

  pub fn set_tempo(&mut self, tempo: Tempo) {
    self.tempo = tempo;
  }
}

impl SongObject for TempoEvent {
  fn id(&self) -> ObjectId {
    self.id
  }

  fn tick(&self) -> TicksTime {
    self.tick
  }

  fn set_tick(&mut self, tick: TicksTime) {
    self.tick = tick;
  }

  fn sort_rank(&self) -> u32 {
    TEMPO_RANK
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSignatureEvent {
  id: ObjectId,
  tick: TicksTime,
  signature: Signature,
}

impl TimeSignatureEvent {
  pub fn new(tick: TicksTime, signature: Signature) -> TimeSignatureEvent {
    TimeSignatureEvent {
      id: ObjectId::new(),
      tick,
      signature,
    }
  }

  pub fn get_signature(&self) -> Signature {
    self.signature
  }

  pub fn set_signature(&mut self, signature: Signature) {
    self.signature = signature;
  }
}

impl SongObject for TimeSignatureEvent {
  fn id(&self) -> ObjectId {
    self.id
  }

  fn tick(&self) -> TicksTime {
    self.tick
  }

  fn set_tick(&mut self, tick: TicksTime) {
    self.tick = tick;
  }

  fn sort_rank(&self) -> u32 {
    TIME_SIGNATURE_RANK
  }
}

/// Tempo and signature in effect before the first sync event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncDefaults {
  pub tempo: Tempo,
  pub signature: Signature,
}

impl Default for SyncDefaults {
  fn default() -> SyncDefaults {
    SyncDefaults {
      tempo: Tempo::default(),
      signature: Signature::default(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncEvent<'a> {
  TimeSignature(&'a TimeSignatureEvent),
  Tempo(&'a TempoEvent),
}

impl<'a> SyncEvent<'a> {
  pub fn tick(&self) -> TicksTime {
    match self {
      SyncEvent::TimeSignature(event) => event.tick(),
      SyncEvent::Tempo(event) => event.tick(),
    }
  }

  pub fn id(&self) -> ObjectId {
    match self {
      SyncEvent::TimeSignature(event) => event.id(),
      SyncEvent::Tempo(event) => event.id(),
    }
  }
}

/// Merges both sync collections in tick order, signatures first at equal ticks
pub struct SyncTrackIter<'a> {
  signatures: Peekable<slice::Iter<'a, TimeSignatureEvent>>,
  tempos: Peekable<slice::Iter<'a, TempoEvent>>,
}

impl<'a> SyncTrackIter<'a> {
  pub(crate) fn new(signatures: &'a [TimeSignatureEvent], tempos: &'a [TempoEvent]) -> Self {
    SyncTrackIter {
      signatures: signatures.iter().peekable(),
      tempos: tempos.iter().peekable(),
    }
  }
}

impl<'a> Iterator for SyncTrackIter<'a> {
  type Item = SyncEvent<'a>;

  fn next(&mut self) -> Option<SyncEvent<'a>> {
    let take_signature = match (self.signatures.peek(), self.tempos.peek()) {
      (Some(signature), Some(tempo)) => signature.tick() <= tempo.tick(),
      (Some(_), None) => true,
      (None, Some(_)) => false,
      (None, None) => return None,
    };
    if take_signature {
      self.signatures.next().map(SyncEvent::TimeSignature)
    } else {
      self.tempos.next().map(SyncEvent::Tempo)
    }
  }
}
