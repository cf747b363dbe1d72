use failure::Fail;

use crate::song::ObjectId;

#[derive(Debug, Fail, PartialEq)]
pub enum ChartError {
  #[fail(display = "Value out of range: {}", cause)]
  OutOfRange { cause: String },

  #[fail(display = "Invalid argument: {}", cause)]
  InvalidArgument { cause: String },

  #[fail(display = "Object not found: {}", id)]
  NotFound { id: ObjectId },

  #[fail(display = "Inconsistent tempo map: {}", cause)]
  Inconsistent { cause: String },
}

pub type ChartResult<T> = Result<T, ChartError>;

impl ChartError {
  pub(crate) fn out_of_range<T: Into<String>>(cause: T) -> ChartError {
    ChartError::OutOfRange {
      cause: cause.into(),
    }
  }

  pub(crate) fn invalid_argument<T: Into<String>>(cause: T) -> ChartError {
    ChartError::InvalidArgument {
      cause: cause.into(),
    }
  }

  pub(crate) fn inconsistent<T: Into<String>>(cause: T) -> ChartError {
    ChartError::Inconsistent {
      cause: cause.into(),
    }
  }
}
