pub mod config;
pub mod cursor;
pub mod error;
pub mod snap;
pub mod song;
pub mod time;

pub use self::error::{ChartError, ChartResult};
