use crate::song::object::{ObjectId, SongObject};
use crate::time::TicksTime;

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
  id: ObjectId,
  tick: TicksTime,
  title: String,
}

impl Section {
  pub fn new<T>(tick: TicksTime, title: T) -> Section
  where
    T: Into<String>,
  {
    Section {
      id: ObjectId::new(),
      tick,
      title: title.into(),
    }
  }

  pub fn get_title(&self) -> &str {
    self.title.as_str()
  }

  pub fn set_title<T>(&mut self, title: T)
  where
    T: Into<String>,
  {
    self.title = title.into();
  }
}

impl SongObject for Section {
  fn id(&self) -> ObjectId {
    self.id
  }

  fn tick(&self) -> TicksTime {
    self.tick
  }

  fn set_tick(&mut self, tick: TicksTime) {
    self.tick = tick;
  }
}
