pub mod chart;
pub mod collection;
pub mod object;
pub mod section;
pub mod sync;

use std::collections::BTreeMap;

use log::{info, warn};

use crate::config::Song as SongConfig;
use crate::error::ChartResult;
use crate::snap::SnapGrid;
use crate::time::{
  PositionConverter, RenderScale, Resolution, Seconds, Signature, Tempo, TempoMap, TicksTime,
};

pub use self::{
  chart::{Chart, Difficulty, Note},
  collection::OrderedCollection,
  object::{ObjectId, SongObject},
  section::Section,
  sync::{SyncDefaults, SyncEvent, SyncTrackIter, TempoEvent, TimeSignatureEvent},
};

pub const DEFAULT_RESOLUTION: Resolution = 192;
pub const DEFAULT_LENGTH: Seconds = 300.0;

/// A song owns its sync track, sections and charts. Every change to the sync track
/// rebuilds the tempo map before returning, so queries never see stale anchors.
#[derive(Debug, Clone)]
pub struct Song {
  name: String,

  resolution: Resolution,
  length: Seconds,
  offset: Seconds,

  tempos: OrderedCollection<TempoEvent>,
  time_signatures: OrderedCollection<TimeSignatureEvent>,
  sections: OrderedCollection<Section>,
  charts: BTreeMap<Difficulty, Chart>,

  tempo_map: TempoMap,
}

impl Song {
  pub fn new<T>(name: T, resolution: Resolution) -> ChartResult<Song>
  where
    T: Into<String>,
  {
    Song::with_defaults(name, resolution, SyncDefaults::default())
  }

  pub fn with_defaults<T>(name: T, resolution: Resolution, defaults: SyncDefaults) -> ChartResult<Song>
  where
    T: Into<String>,
  {
    let tempo_map = TempoMap::new(resolution, defaults)?;
    let charts = Difficulty::ALL
      .iter()
      .map(|difficulty| (*difficulty, Chart::new()))
      .collect();

    let song = Song {
      name: name.into(),
      resolution,
      length: DEFAULT_LENGTH,
      offset: 0.0,
      tempos: OrderedCollection::new(),
      time_signatures: OrderedCollection::new(),
      sections: OrderedCollection::new(),
      charts,
      tempo_map,
    };
    info!(
      "Created song '{}' at {} ticks per beat, {} {}",
      song.name, resolution, defaults.tempo, defaults.signature
    );
    Ok(song)
  }

  pub fn from_config<T>(name: T, config: &SongConfig) -> ChartResult<Song>
  where
    T: Into<String>,
  {
    let defaults = SyncDefaults {
      tempo: Tempo::new(config.tempo),
      signature: Signature::new(config.numerator, config.denominator),
    };
    let mut song = Song::with_defaults(name, config.resolution, defaults)?;
    song.set_length(config.length);
    song.set_offset(config.offset);
    Ok(song)
  }

  pub fn set_name<T>(&mut self, name: T)
  where
    T: Into<String>,
  {
    self.name = name.into();
  }

  pub fn get_name(&self) -> &str {
    self.name.as_str()
  }

  pub fn get_resolution(&self) -> Resolution {
    self.resolution
  }

  /// Changes the ticks per beat. Event ticks are kept as they are.
  pub fn set_resolution(&mut self, resolution: Resolution) -> ChartResult<()> {
    let tempo_map = TempoMap::build(
      resolution,
      self.tempo_map.get_defaults(),
      self.tempos.as_slice(),
      self.time_signatures.as_slice(),
    )?;
    self.resolution = resolution;
    self.tempo_map = tempo_map;
    Ok(())
  }

  pub fn get_length(&self) -> Seconds {
    self.length
  }

  pub fn set_length(&mut self, length: Seconds) {
    if length.is_finite() && length >= 0.0 {
      self.length = length;
    } else {
      warn!("Ignoring invalid song length {}, keeping {}", length, self.length);
    }
  }

  /// Audio offset in seconds, applied by the playback side
  pub fn get_offset(&self) -> Seconds {
    self.offset
  }

  pub fn set_offset(&mut self, offset: Seconds) {
    self.offset = offset;
  }

  pub fn tempo_map(&self) -> &TempoMap {
    &self.tempo_map
  }

  pub fn tempos(&self) -> &OrderedCollection<TempoEvent> {
    &self.tempos
  }

  pub fn time_signatures(&self) -> &OrderedCollection<TimeSignatureEvent> {
    &self.time_signatures
  }

  pub fn sections(&self) -> &OrderedCollection<Section> {
    &self.sections
  }

  pub fn sync_track(&self) -> SyncTrackIter<'_> {
    SyncTrackIter::new(self.time_signatures.as_slice(), self.tempos.as_slice())
  }

  pub fn chart(&self, difficulty: Difficulty) -> &Chart {
    &self.charts[&difficulty]
  }

  pub fn chart_mut(&mut self, difficulty: Difficulty) -> &mut Chart {
    self
      .charts
      .entry(difficulty)
      .or_insert_with(Chart::new)
  }

  pub fn insert_tempo(&mut self, event: TempoEvent) -> ChartResult<ObjectId> {
    event.get_tempo().validate()?;
    let id = event.id();
    self.tempos.insert(event);
    self.rebuild_tempo_map();
    Ok(id)
  }

  pub fn add_tempo(&mut self, tick: TicksTime, tempo: Tempo) -> ChartResult<ObjectId> {
    self.insert_tempo(TempoEvent::new(tick, tempo))
  }

  pub fn remove_tempo(&mut self, event: &TempoEvent) -> ChartResult<TempoEvent> {
    let removed = self.tempos.remove(event)?;
    self.rebuild_tempo_map();
    Ok(removed)
  }

  pub fn remove_tempo_by_id(&mut self, id: ObjectId) -> ChartResult<TempoEvent> {
    let removed = self.tempos.remove_by_id(id)?;
    self.rebuild_tempo_map();
    Ok(removed)
  }

  pub fn move_tempo(&mut self, id: ObjectId, tick: TicksTime) -> ChartResult<usize> {
    let index = self.tempos.move_to(id, tick)?;
    self.rebuild_tempo_map();
    Ok(index)
  }

  pub fn insert_time_signature(&mut self, event: TimeSignatureEvent) -> ChartResult<ObjectId> {
    event.get_signature().validate()?;
    let id = event.id();
    self.time_signatures.insert(event);
    self.rebuild_tempo_map();
    Ok(id)
  }

  pub fn add_time_signature(&mut self, tick: TicksTime, signature: Signature) -> ChartResult<ObjectId> {
    self.insert_time_signature(TimeSignatureEvent::new(tick, signature))
  }

  pub fn remove_time_signature(&mut self, event: &TimeSignatureEvent) -> ChartResult<TimeSignatureEvent> {
    let removed = self.time_signatures.remove(event)?;
    self.rebuild_tempo_map();
    Ok(removed)
  }

  pub fn remove_time_signature_by_id(&mut self, id: ObjectId) -> ChartResult<TimeSignatureEvent> {
    let removed = self.time_signatures.remove_by_id(id)?;
    self.rebuild_tempo_map();
    Ok(removed)
  }

  pub fn move_time_signature(&mut self, id: ObjectId, tick: TicksTime) -> ChartResult<usize> {
    let index = self.time_signatures.move_to(id, tick)?;
    self.rebuild_tempo_map();
    Ok(index)
  }

  pub fn add_section<T>(&mut self, tick: TicksTime, title: T) -> ObjectId
  where
    T: Into<String>,
  {
    let section = Section::new(tick, title);
    let id = section.id();
    self.sections.insert(section);
    id
  }

  pub fn remove_section(&mut self, section: &Section) -> ChartResult<Section> {
    self.sections.remove(section)
  }

  pub fn move_section(&mut self, id: ObjectId, tick: TicksTime) -> ChartResult<usize> {
    self.sections.move_to(id, tick)
  }

  /// Replaces the whole sync track at once, as a loader does
  pub fn replace_sync_track(
    &mut self,
    tempos: Vec<TempoEvent>,
    time_signatures: Vec<TimeSignatureEvent>,
  ) -> ChartResult<()> {
    for event in &tempos {
      event.get_tempo().validate()?;
    }
    for event in &time_signatures {
      event.get_signature().validate()?;
    }
    self.tempos = tempos.into_iter().collect();
    self.time_signatures = time_signatures.into_iter().collect();
    self.rebuild_tempo_map();
    Ok(())
  }

  pub fn tick_to_time(&self, tick: TicksTime) -> Seconds {
    self.tempo_map.tick_to_time(tick)
  }

  /// Nearest tick for a time, never past the last tick of the song
  pub fn time_to_tick(&self, time: Seconds) -> TicksTime {
    self
      .tempo_map
      .time_to_tick(time.min(self.length))
      .min(self.max_tick())
  }

  /// Last tick whose time is within the song length
  pub fn max_tick(&self) -> TicksTime {
    self.tempo_map.last_tick_at(self.length)
  }

  pub fn converter(&self) -> PositionConverter<'_> {
    PositionConverter::new(&self.tempo_map, self.length)
  }

  pub fn tick_to_render_position(&self, tick: TicksTime, scale: &RenderScale) -> f64 {
    self.converter().tick_to_render_position(tick, scale)
  }

  pub fn render_position_to_tick(&self, position: f64, scale: &RenderScale) -> TicksTime {
    self.converter().render_position_to_tick(position, scale)
  }

  pub fn snap_grid(&self) -> SnapGrid<'_> {
    SnapGrid::new(&self.tempo_map, self.max_tick())
  }

  fn rebuild_tempo_map(&mut self) {
    self
      .tempo_map
      .rebuild(self.tempos.as_slice(), self.time_signatures.as_slice());
  }
}
