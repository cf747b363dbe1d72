use std::fmt;

use uuid::Uuid;

use crate::time::TicksTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(Uuid);

impl ObjectId {
  pub fn new() -> ObjectId {
    ObjectId(Uuid::new_v4())
  }
}

impl Default for ObjectId {
  fn default() -> ObjectId {
    ObjectId::new()
  }
}

impl fmt::Display for ObjectId {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Anything placed on the chart at a tick
pub trait SongObject {
  fn id(&self) -> ObjectId;

  fn tick(&self) -> TicksTime;

  fn set_tick(&mut self, tick: TicksTime);

  /// Orders objects sharing a tick. Equal ranks keep insertion order.
  fn sort_rank(&self) -> u32 {
    0
  }
}
