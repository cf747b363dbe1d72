use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

use crate::error::ChartResult;
use crate::song::{DEFAULT_LENGTH, DEFAULT_RESOLUTION};
use crate::time::position::{DEFAULT_GAME_SPEED, DEFAULT_HYPERSPEED};
use crate::time::signature::{DEFAULT_SIGNATURE_NOTE_VALUE, DEFAULT_SIGNATURE_NUM_BEATS};
use crate::time::tempo::DEFAULT_TEMPO;
use crate::time::RenderScale;

pub const DEFAULT_STEP: u32 = 16;
pub const DEFAULT_SCROLL_SENSITIVITY: f64 = 0.2;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Song {
  pub resolution: u32,
  pub tempo: f64,
  pub numerator: u32,
  pub denominator: u32,
  /// Seconds
  pub length: f64,
  /// Seconds
  pub offset: f64,
}

impl Default for Song {
  fn default() -> Song {
    Song {
      resolution: DEFAULT_RESOLUTION,
      tempo: DEFAULT_TEMPO,
      numerator: DEFAULT_SIGNATURE_NUM_BEATS,
      denominator: DEFAULT_SIGNATURE_NOTE_VALUE,
      length: DEFAULT_LENGTH,
      offset: 0.0,
    }
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct View {
  pub hyperspeed: f64,
  pub game_speed: f64,
  pub origin: f64,
  pub calibration_ms: f64,
}

impl Default for View {
  fn default() -> View {
    View {
      hyperspeed: DEFAULT_HYPERSPEED,
      game_speed: DEFAULT_GAME_SPEED,
      origin: 0.0,
      calibration_ms: 0.0,
    }
  }
}

impl View {
  pub fn render_scale(&self) -> ChartResult<RenderScale> {
    RenderScale::new(self.hyperspeed, self.game_speed).map(|scale| scale.with_origin(self.origin))
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Editor {
  /// Grid lines per whole note
  pub step: u32,
  /// Render units per scroll wheel notch
  pub scroll_sensitivity: f64,
}

impl Default for Editor {
  fn default() -> Editor {
    Editor {
      step: DEFAULT_STEP,
      scroll_sensitivity: DEFAULT_SCROLL_SENSITIVITY,
    }
  }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
  pub song: Song,
  pub view: View,
  pub editor: Editor,
}

impl Config {
  pub fn from_file<'a, T>(path: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let mut content = String::new();
    let mut file = File::open(path.into())?;
    file.read_to_string(&mut content)?;
    Config::from_str(content.as_str())
  }

  pub fn from_str<'a, T>(content: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let config: Config = toml::from_str(content.into())?;
    Ok(config)
  }
}
