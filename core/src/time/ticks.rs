use std::{
  cmp::{min, Ordering},
  fmt,
  ops::{Add, AddAssign, Sub, SubAssign},
};

use crate::error::{ChartError, ChartResult};

type UnitType = u32;

#[derive(Debug, Eq, Copy, Clone, Hash, Default)]
pub struct TicksTime(UnitType);

impl TicksTime {
  pub const MAX: TicksTime = TicksTime(UnitType::max_value());

  pub fn new(ticks: UnitType) -> TicksTime {
    TicksTime(ticks)
  }

  pub fn zero() -> TicksTime {
    TicksTime(0)
  }

  pub fn get_ticks(&self) -> UnitType {
    self.0
  }

  /// Converts a wide tick value, rejecting anything that does not fit a chart position
  pub fn try_from_i64(ticks: i64) -> ChartResult<TicksTime> {
    if ticks < 0 || ticks > i64::from(UnitType::max_value()) {
      Err(ChartError::out_of_range(format!(
        "tick {} is not a valid chart position",
        ticks
      )))
    } else {
      Ok(TicksTime(ticks as UnitType))
    }
  }

  pub fn saturating_from_u64(ticks: u64) -> TicksTime {
    TicksTime(min(ticks, u64::from(UnitType::max_value())) as UnitType)
  }

  pub fn checked_offset(&self, delta: i64) -> ChartResult<TicksTime> {
    TicksTime::try_from_i64(i64::from(self.0) + delta)
  }

  pub fn saturating_add(self, rhs: TicksTime) -> TicksTime {
    TicksTime(self.0.saturating_add(rhs.0))
  }
}

impl fmt::Display for TicksTime {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    fmt::Display::fmt(&self.0, f)
  }
}

impl Ord for TicksTime {
  fn cmp(&self, other: &TicksTime) -> Ordering {
    self.0.cmp(&other.0)
  }
}

impl PartialOrd for TicksTime {
  fn partial_cmp(&self, other: &TicksTime) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl PartialEq for TicksTime {
  fn eq(&self, other: &TicksTime) -> bool {
    self.0 == other.0
  }
}

impl Add for TicksTime {
  type Output = TicksTime;
  fn add(self, rhs: TicksTime) -> Self {
    TicksTime::new(self.0 + rhs.0)
  }
}

impl AddAssign for TicksTime {
  fn add_assign(&mut self, rhs: TicksTime) {
    *self = *self + rhs;
  }
}

impl Sub for TicksTime {
  type Output = TicksTime;
  fn sub(self, rhs: TicksTime) -> Self {
    TicksTime::new(self.0 - min(self.0, rhs.0))
  }
}

impl SubAssign for TicksTime {
  fn sub_assign(&mut self, rhs: TicksTime) {
    *self = *self - rhs;
  }
}

impl From<UnitType> for TicksTime {
  fn from(item: UnitType) -> Self {
    TicksTime(item)
  }
}

impl From<TicksTime> for f64 {
  fn from(item: TicksTime) -> Self {
    f64::from(item.0)
  }
}

impl From<TicksTime> for u64 {
  fn from(item: TicksTime) -> Self {
    u64::from(item.0)
  }
}

impl From<TicksTime> for u32 {
  fn from(item: TicksTime) -> Self {
    item.0
  }
}

#[cfg(test)]
mod test {

  use super::TicksTime;
  use crate::error::ChartError;
  use std::cmp::Ordering;

  #[test]
  pub fn new() {
    let ticks_time = TicksTime::new(1234);
    assert_eq!(ticks_time.get_ticks(), 1234);
  }

  #[test]
  pub fn zero() {
    assert_eq!(TicksTime::zero().get_ticks(), 0);
  }

  #[test]
  pub fn ord_cmp() {
    let time1 = TicksTime::new(1234);
    let time2 = TicksTime::new(1235);
    assert_eq!(time1.cmp(&time2), Ordering::Less);
    assert_eq!(time2.cmp(&time1), Ordering::Greater);
    assert_eq!(time1.cmp(&time1), Ordering::Equal);
  }

  #[test]
  pub fn sub_saturates_at_zero() {
    let time1 = TicksTime::new(30);
    let time2 = TicksTime::new(100);
    assert_eq!(time2 - time1, TicksTime::new(70));
    assert_eq!(time1 - time2, TicksTime::zero());
  }

  #[test]
  pub fn try_from_i64() {
    assert_eq!(TicksTime::try_from_i64(768), Ok(TicksTime::new(768)));
    assert!(matches!(
      TicksTime::try_from_i64(-1),
      Err(ChartError::OutOfRange { .. })
    ));
    assert!(matches!(
      TicksTime::try_from_i64(i64::from(u32::max_value()) + 1),
      Err(ChartError::OutOfRange { .. })
    ));
  }

  #[test]
  pub fn checked_offset() {
    let time = TicksTime::new(100);
    assert_eq!(time.checked_offset(-100), Ok(TicksTime::zero()));
    assert_eq!(time.checked_offset(92), Ok(TicksTime::new(192)));
    assert!(time.checked_offset(-101).is_err());
    assert!(TicksTime::MAX.checked_offset(1).is_err());
  }

  #[test]
  pub fn saturating_from_u64() {
    assert_eq!(TicksTime::saturating_from_u64(5), TicksTime::new(5));
    assert_eq!(TicksTime::saturating_from_u64(u64::max_value()), TicksTime::MAX);
  }

  #[test]
  pub fn f64_from() {
    assert_eq!(f64::from(TicksTime::new(1234)), 1234.0);
  }
}
