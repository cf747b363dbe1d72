use std::iter::FromIterator;
use std::slice;

use crate::error::{ChartError, ChartResult};
use crate::song::object::{ObjectId, SongObject};
use crate::time::TicksTime;

/// Song objects kept sorted by tick, then by sort rank, then by insertion order.
#[derive(Debug, Clone)]
pub struct OrderedCollection<T> {
  objects: Vec<T>,
}

impl<T> Default for OrderedCollection<T> {
  fn default() -> Self {
    OrderedCollection {
      objects: Vec::new(),
    }
  }
}

impl<T: SongObject> OrderedCollection<T> {
  pub fn new() -> OrderedCollection<T> {
    OrderedCollection::default()
  }

  pub fn len(&self) -> usize {
    self.objects.len()
  }

  pub fn is_empty(&self) -> bool {
    self.objects.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&T> {
    self.objects.get(index)
  }

  pub fn first(&self) -> Option<&T> {
    self.objects.first()
  }

  pub fn last(&self) -> Option<&T> {
    self.objects.last()
  }

  pub fn iter(&self) -> slice::Iter<T> {
    self.objects.iter()
  }

  pub fn as_slice(&self) -> &[T] {
    self.objects.as_slice()
  }

  pub fn clear(&mut self) {
    self.objects.clear();
  }

  /// Inserts after any object with the same tick and rank, returning its index
  pub fn insert(&mut self, object: T) -> usize {
    let key = (object.tick(), object.sort_rank());
    let index = self
      .objects
      .partition_point(|other| (other.tick(), other.sort_rank()) <= key);
    self.objects.insert(index, object);
    index
  }

  /// Index of the object with the same id. Looks at the object's tick first and
  /// falls back to a full scan when the stored object has moved since.
  pub fn position(&self, object: &T) -> Option<usize> {
    let tick = object.tick();
    let id = object.id();
    let start = self.objects.partition_point(|other| other.tick() < tick);
    self.objects[start..]
      .iter()
      .take_while(|other| other.tick() == tick)
      .position(|other| other.id() == id)
      .map(|offset| start + offset)
      .or_else(|| self.position_by_id(id))
  }

  pub fn position_by_id(&self, id: ObjectId) -> Option<usize> {
    self.objects.iter().position(|other| other.id() == id)
  }

  pub fn get_by_id(&self, id: ObjectId) -> Option<&T> {
    self.position_by_id(id).map(|index| &self.objects[index])
  }

  pub fn remove(&mut self, object: &T) -> ChartResult<T> {
    match self.position(object) {
      Some(index) => Ok(self.objects.remove(index)),
      None => Err(ChartError::NotFound { id: object.id() }),
    }
  }

  pub fn remove_by_id(&mut self, id: ObjectId) -> ChartResult<T> {
    match self.position_by_id(id) {
      Some(index) => Ok(self.objects.remove(index)),
      None => Err(ChartError::NotFound { id }),
    }
  }

  /// Moves an object to a new tick, returning its new index
  pub fn move_to(&mut self, id: ObjectId, tick: TicksTime) -> ChartResult<usize> {
    let mut object = self.remove_by_id(id)?;
    object.set_tick(tick);
    Ok(self.insert(object))
  }

  /// Moves an object by a signed amount of ticks. Leaves the collection untouched when the
  /// result would fall outside the tick range.
  pub fn shift(&mut self, id: ObjectId, delta: i64) -> ChartResult<usize> {
    let tick = self
      .get_by_id(id)
      .map(|object| object.tick())
      .ok_or(ChartError::NotFound { id })?;
    let tick = tick.checked_offset(delta)?;
    self.move_to(id, tick)
  }

  /// Index of the last object at or before the tick
  pub fn find_index_of_previous(&self, tick: TicksTime) -> Option<usize> {
    let count = self.objects.partition_point(|object| object.tick() <= tick);
    count.checked_sub(1)
  }

  /// Index of the last object strictly before the tick
  pub fn find_index_of_previous_strict(&self, tick: TicksTime) -> Option<usize> {
    let count = self.objects.partition_point(|object| object.tick() < tick);
    count.checked_sub(1)
  }

  /// Index of the first object at or after the tick
  pub fn find_index_of_next(&self, tick: TicksTime) -> Option<usize> {
    let index = self.objects.partition_point(|object| object.tick() < tick);
    if index < self.objects.len() {
      Some(index)
    } else {
      None
    }
  }

  /// Index of the first object strictly after the tick
  pub fn find_index_of_next_strict(&self, tick: TicksTime) -> Option<usize> {
    let index = self.objects.partition_point(|object| object.tick() <= tick);
    if index < self.objects.len() {
      Some(index)
    } else {
      None
    }
  }

  pub fn previous(&self, tick: TicksTime) -> Option<&T> {
    self
      .find_index_of_previous(tick)
      .map(|index| &self.objects[index])
  }

  /// Objects with `start <= tick < end`
  pub fn range(&self, start: TicksTime, end: TicksTime) -> &[T] {
    let first = self.objects.partition_point(|object| object.tick() < start);
    let last = self.objects.partition_point(|object| object.tick() < end);
    if first < last {
      &self.objects[first..last]
    } else {
      &[]
    }
  }
}

impl<T: SongObject> Extend<T> for OrderedCollection<T> {
  fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
    iter.into_iter().for_each(|object| {
      self.insert(object);
    });
  }
}

impl<T: SongObject> FromIterator<T> for OrderedCollection<T> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    let mut collection = OrderedCollection::new();
    collection.extend(iter);
    collection
  }
}

impl<'a, T> IntoIterator for &'a OrderedCollection<T> {
  type Item = &'a T;
  type IntoIter = slice::Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.objects.iter()
  }
}
