//! Append-only score log.
//!
//! One line per finished run: `nickname,map,score,timestamp`. Existing lines are never rewritten.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};
use tracing::{debug, warn};

use crate::error::{GameError, GameResult};

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking {
    pub nickname: String,
    pub map_name: String,
    pub score: u32,
    pub recorded_at: PrimitiveDateTime,
}

impl Ranking {
    /// A ranking stamped with the current UTC time.
    pub fn now(nickname: &str, map_name: &str, score: u32) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            nickname: sanitize(nickname),
            map_name: sanitize(map_name),
            score,
            recorded_at: PrimitiveDateTime::new(now.date(), now.time().replace_nanosecond(0).unwrap_or(now.time())),
        }
    }

    pub fn to_line(&self) -> GameResult<String> {
        let stamp = self.recorded_at.format(&TIMESTAMP_FORMAT)?;
        Ok(format!("{},{},{},{}", self.nickname, self.map_name, self.score, stamp))
    }

    /// Parses one log line; `line` is the 1-based line number used in errors.
    pub fn parse(text: &str, line: usize) -> GameResult<Self> {
        let malformed = |reason: String| GameError::ScoreLog { line, reason };
        let fields: Vec<&str> = text.trim().split(',').collect();
        let [nickname, map_name, score, stamp] = fields[..] else {
            return Err(malformed(format!("expected 4 fields, found {}", fields.len())));
        };
        let score = score.parse().map_err(|e| malformed(format!("bad score {score:?}: {e}")))?;
        let recorded_at =
            PrimitiveDateTime::parse(stamp, &TIMESTAMP_FORMAT).map_err(|e| malformed(format!("bad timestamp {stamp:?}: {e}")))?;
        Ok(Self {
            nickname: nickname.to_string(),
            map_name: map_name.to_string(),
            score,
            recorded_at,
        })
    }
}

/// Commas would split a field, so they are replaced.
fn sanitize(field: &str) -> String {
    field.trim().replace([',', '\n', '\r'], " ")
}

#[derive(Debug, Clone)]
pub struct ScoreLog {
    path: PathBuf,
}

impl ScoreLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, ranking: &Ranking) -> GameResult<()> {
        let line = ranking.to_line()?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{line}")?;
        debug!(path = %self.path.display(), score = ranking.score, "Score recorded");
        Ok(())
    }

    /// Every well-formed entry, in file order. A missing file is an empty log.
    pub fn load(&self) -> GameResult<Vec<Ranking>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(contents
            .lines()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .filter_map(|(index, text)| match Ranking::parse(text, index + 1) {
                Ok(ranking) => Some(ranking),
                Err(e) => {
                    warn!(error = %e, "Skipping score log line");
                    None
                }
            })
            .collect())
    }

    /// Best `limit` scores on `map_name`, highest first; ties keep the earlier entry first.
    pub fn top(&self, map_name: &str, limit: usize) -> GameResult<Vec<Ranking>> {
        let mut entries: Vec<Ranking> = self.load()?.into_iter().filter(|r| r.map_name == map_name).collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit);
        Ok(entries)
    }
}
