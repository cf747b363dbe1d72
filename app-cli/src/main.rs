use log::{debug, info};

use failure::{Error, Fail};

use chart_timing_core::{
  config::Config,
  snap::{Direction, GridLineKind},
  song::{Song, SongObject},
  time::{BarsTime, RenderScale, TicksTime},
};

mod config;
use crate::config::SyncSheet;

const SONG_NAME: &'static str = "Untitled";

const CHART_INSPECT_CONFIG: &'static str = "CHART_INSPECT_CONFIG";
const DEFAULT_CHART_INSPECT_CONFIG: &'static str = "chart.toml";

const CHART_INSPECT_LOG_CONFIG: &'static str = "CHART_INSPECT_LOG_CONFIG";
const DEFAULT_CHART_INSPECT_LOG_CONFIG: &'static str = "log4rs.yaml";

/// Measures listed when no ticks are given
const GRID_MEASURES: u64 = 8;

#[derive(Debug, Fail)]
enum MainError {
  #[fail(display = "Failed to init logging: {}", cause)]
  LoggingInit { cause: String },

  #[fail(display = "Not a tick: {}", arg)]
  BadTick { arg: String },
}

fn main() -> Result<(), Error> {
  init_logging()?;

  let config_path =
    std::env::var(CHART_INSPECT_CONFIG).unwrap_or_else(|_| DEFAULT_CHART_INSPECT_CONFIG.to_string());

  let config = init_config(config_path.as_str())?;

  let song = init_song(&config, config_path.as_str())?;

  let scale = config.view.render_scale()?;

  let ticks = parse_ticks(std::env::args().skip(1))?;

  if ticks.is_empty() {
    print_grid(&song, config.editor.step)?;
  } else {
    for tick in ticks {
      print_tick(&song, &scale, &config, tick)?;
    }
  }

  Ok(())
}

fn init_logging() -> Result<(), Error> {
  let log_config_path = std::env::var(CHART_INSPECT_LOG_CONFIG)
    .unwrap_or_else(|_| DEFAULT_CHART_INSPECT_LOG_CONFIG.to_string());

  log4rs::init_file(log_config_path.as_str(), Default::default()).map_err(|err| {
    MainError::LoggingInit {
      cause: err.to_string(),
    }
  })?;

  Ok(())
}

fn init_config(path: &str) -> Result<Config, Error> {
  info!("Loading chart configuration from {} ...", path);
  let config = Config::from_file(path)?;
  debug!("{:#?}", config);

  Ok(config)
}

fn init_song(config: &Config, path: &str) -> Result<Song, Error> {
  info!("Building the sync track ...");

  let mut song = Song::from_config(SONG_NAME, &config.song)?;

  let sheet = SyncSheet::from_file(path)?;
  sheet.apply(&mut song)?;

  for event in song.sync_track() {
    debug!("{:?}", event);
  }

  Ok(song)
}

fn parse_ticks<I>(args: I) -> Result<Vec<TicksTime>, Error>
where
  I: Iterator<Item = String>,
{
  let mut ticks = Vec::new();
  for arg in args {
    let value = arg
      .parse::<i64>()
      .map_err(|_| MainError::BadTick { arg: arg.clone() })?;
    ticks.push(TicksTime::try_from_i64(value)?);
  }
  Ok(ticks)
}

fn print_tick(song: &Song, scale: &RenderScale, config: &Config, tick: TicksTime) -> Result<(), Error> {
  let tempo_map = song.tempo_map();
  let converter = song.converter();
  let grid = song.snap_grid();
  let step = config.editor.step;
  let position = converter.tick_to_render_position(tick, scale);

  println!("tick {}", tick);
  println!("  bars      {}", tempo_map.tick_to_bars(tick));
  println!("  time      {:.6} s", song.tick_to_time(tick));
  println!("  tempo     {} / {}", tempo_map.tempo_at(tick), tempo_map.signature_at(tick));
  println!("  position  {:.6}", position);
  println!(
    "  strike    {:.6}",
    converter.calibrated_position(position, config.view.calibration_ms, scale)
  );
  println!("  snapped   {} (1/{})", grid.snap_to_grid(tick, step)?, step);
  println!(
    "  steps     {} < {} > {}",
    grid.step(tick, step, Direction::Backward)?,
    tick,
    grid.step(tick, step, Direction::Forward)?
  );
  if let Some(section) = song
    .sections()
    .find_index_of_previous(tick)
    .and_then(|index| song.sections().get(index))
  {
    println!("  section   {} at {}", section.get_title(), section.tick());
  }

  Ok(())
}

fn print_grid(song: &Song, step: u32) -> Result<(), Error> {
  let tempo_map = song.tempo_map();
  let end = tempo_map.bars_to_tick(&BarsTime::from_bars(GRID_MEASURES));

  for line in song.snap_grid().lines(TicksTime::zero(), end, step)? {
    if line.kind == GridLineKind::Step {
      continue;
    }
    let marker = match line.kind {
      GridLineKind::Measure => "|",
      _ => ".",
    };
    println!(
      "{} {:>8} {} {:.6} s",
      marker,
      line.tick,
      tempo_map.tick_to_bars(line.tick),
      song.tick_to_time(line.tick)
    );
  }

  Ok(())
}
