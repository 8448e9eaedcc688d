//! Pluggable level sources
//!
//! Anything that can hand back rows in the level legend: the procedural
//! generator, a fixed text, or an external generator living in the host.

use rand_pcg::Pcg32;
use thiserror::Error;

use super::{MIN_LEVEL_ROWS, clean_rows, generate_level};
use crate::settings::Settings;

/// Why a level source couldn't produce rows
#[derive(Debug, Error)]
pub enum LevelSourceError {
    #[error("level source unavailable: {0}")]
    Unavailable(String),
    #[error("level text is empty")]
    Empty,
    #[error("level has {got} rows, need at least {min}")]
    TooFewRows { got: usize, min: usize },
}

/// A producer of level rows
pub trait LevelSource {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Produce the rows for a new level
    fn rows(&mut self, settings: &Settings, rng: &mut Pcg32) -> Result<Vec<String>, LevelSourceError>;
}

/// Random levels from [`generate_level`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ProceduralSource;

impl LevelSource for ProceduralSource {
    fn name(&self) -> &str {
        "procedural"
    }

    fn rows(&mut self, settings: &Settings, rng: &mut Pcg32) -> Result<Vec<String>, LevelSourceError> {
        Ok(generate_level(settings, rng))
    }
}

/// Level text supplied by the host, e.g. the reply of a generative service
///
/// The text is cleaned with [`clean_rows`] before use.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    text: String,
}

impl StaticSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let text = rows.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n");
        Self { text }
    }
}

impl LevelSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn rows(&mut self, _settings: &Settings, _rng: &mut Pcg32) -> Result<Vec<String>, LevelSourceError> {
        let rows = clean_rows(&self.text);
        if rows.is_empty() {
            return Err(LevelSourceError::Empty);
        }
        if rows.len() < MIN_LEVEL_ROWS {
            return Err(LevelSourceError::TooFewRows {
                got: rows.len(),
                min: MIN_LEVEL_ROWS,
            });
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_static_source_cleans_text() {
        let text = "```\n.....\n.....\n\n.....\n.....\nGGGGG\n```";
        let mut source = StaticSource::new(text);
        let rows = source
            .rows(&Settings::default(), &mut Pcg32::seed_from_u64(0))
            .unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[4], "GGGGG");
    }

    #[test]
    fn test_static_source_errors() {
        let mut rng = Pcg32::seed_from_u64(0);
        let settings = Settings::default();
        assert!(matches!(
            StaticSource::new("  \n```\n").rows(&settings, &mut rng),
            Err(LevelSourceError::Empty)
        ));
        assert!(matches!(
            StaticSource::from_rows(&["GG", "GG"]).rows(&settings, &mut rng),
            Err(LevelSourceError::TooFewRows { got: 2, min: MIN_LEVEL_ROWS })
        ));
    }

    #[test]
    fn test_procedural_source_matches_settings() {
        let settings = Settings::default().with_length(2);
        let rows = ProceduralSource
            .rows(&settings, &mut Pcg32::seed_from_u64(9))
            .unwrap();
        assert_eq!(rows.len(), crate::consts::WORLD_HEIGHT_TILES);
        assert_eq!(rows[0].len(), 300);
    }
}
