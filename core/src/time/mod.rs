pub mod bars;
pub mod position;
pub mod signature;
pub mod tempo;
pub mod tempo_map;
pub mod ticks;

pub use self::bars::BarsTime;
pub use self::position::{PositionConverter, RenderScale};
pub use self::signature::Signature;
pub use self::tempo::Tempo;
pub use self::tempo_map::TempoMap;
pub use self::ticks::TicksTime;

/// Ticks per quarter note
pub type Resolution = u32;

pub type Seconds = f64;

pub const SECONDS_PER_MINUTE: f64 = 60.0;
