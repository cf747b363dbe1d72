use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

use chart_timing_core::song::{Song, TempoEvent, TimeSignatureEvent};
use chart_timing_core::time::{Signature, Tempo, TicksTime};
use chart_timing_core::ChartResult;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TempoEntry {
  pub tick: u32,
  pub bpm: f64,
}

fn default_denominator() -> u32 {
  4
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SignatureEntry {
  pub tick: u32,
  pub numerator: u32,
  #[serde(default = "default_denominator")]
  pub denominator: u32,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SectionEntry {
  pub tick: u32,
  pub title: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Sync {
  pub tempo: Vec<TempoEntry>,
  pub signature: Vec<SignatureEntry>,
  pub section: Vec<SectionEntry>,
}

/// The sync track and sections listed next to the core settings in the same file
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SyncSheet {
  pub sync: Sync,
}

impl SyncSheet {
  pub fn from_file<'a, T>(path: T) -> Result<SyncSheet, Error>
  where
    T: Into<&'a str>,
  {
    let mut content = String::new();
    let mut file = File::open(path.into())?;
    file.read_to_string(&mut content)?;
    SyncSheet::from_str(content.as_str())
  }

  pub fn from_str<'a, T>(content: T) -> Result<SyncSheet, Error>
  where
    T: Into<&'a str>,
  {
    let sheet: SyncSheet = toml::from_str(content.into())?;
    Ok(sheet)
  }

  pub fn apply(&self, song: &mut Song) -> ChartResult<()> {
    let tempos = self
      .sync
      .tempo
      .iter()
      .map(|entry| TempoEvent::new(TicksTime::new(entry.tick), Tempo::new(entry.bpm)))
      .collect();
    let signatures = self
      .sync
      .signature
      .iter()
      .map(|entry| {
        TimeSignatureEvent::new(
          TicksTime::new(entry.tick),
          Signature::new(entry.numerator, entry.denominator),
        )
      })
      .collect();
    song.replace_sync_track(tempos, signatures)?;
    for entry in &self.sync.section {
      song.add_section(TicksTime::new(entry.tick), entry.title.as_str());
    }
    Ok(())
  }
}

#[cfg(test)]
mod test {

  use super::SyncSheet;
  use chart_timing_core::song::Song;
  use chart_timing_core::time::{Signature, TicksTime};

  const SHEET: &str = r#"
    [song]
    resolution = 192

    [[sync.tempo]]
    tick = 0
    bpm = 120.0

    [[sync.tempo]]
    tick = 768
    bpm = 60.0

    [[sync.signature]]
    tick = 768
    numerator = 3

    [[sync.section]]
    tick = 768
    title = "Verse"
  "#;

  #[test]
  pub fn parse_sheet_ignoring_other_sections() {
    let sheet = SyncSheet::from_str(SHEET).unwrap();
    assert_eq!(sheet.sync.tempo.len(), 2);
    assert_eq!(sheet.sync.signature[0].denominator, 4);
    assert_eq!(sheet.sync.section[0].title, "Verse");
  }

  #[test]
  pub fn empty_sheet() {
    let sheet = SyncSheet::from_str("").unwrap();
    assert!(sheet.sync.tempo.is_empty());
  }

  #[test]
  pub fn apply_to_song() {
    let sheet = SyncSheet::from_str(SHEET).unwrap();
    let mut song = Song::new("sheet", 192).unwrap();
    sheet.apply(&mut song).unwrap();
    assert_eq!(song.tempos().len(), 2);
    assert_eq!(song.sections().len(), 1);
    assert_eq!(song.tick_to_time(TicksTime::new(960)), 3.0);
    assert_eq!(song.tempo_map().signature_at(TicksTime::new(800)), Signature::new(3, 4));
  }

  #[test]
  pub fn apply_rejects_bad_tempo() {
    let sheet = SyncSheet::from_str("[[sync.tempo]]\ntick = 0\nbpm = 0.0").unwrap();
    let mut song = Song::new("sheet", 192).unwrap();
    assert!(sheet.apply(&mut song).is_err());
  }
}
