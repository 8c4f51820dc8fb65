/*
 * Copyright (C) 2026 Vocabr contributors
 *
 * This file is part of Vocabr.
 *
 * Vocabr is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Vocabr is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Vocabr.  If not, see <http://www.gnu.org/licenses/>.
 */

use std::{fmt::Display, path::PathBuf};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum StatsError {
    NoHomeDirError(),
    ConfigIsDir(PathBuf),
    IoError(PathBuf, std::io::Error),
    SerdeError(PathBuf, serde_json::Error),
}

impl Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoHomeDirError() => f.write_str("Unable to find user home directory"),
            Self::ConfigIsDir(path) => f.write_fmt(format_args!(
                "Stats file is directory: {}",
                path.to_str().unwrap_or("unknown")
            )),
            Self::IoError(path, err) => f.write_fmt(format_args!(
                "IoError: {err}, path: {}",
                path.to_str().unwrap_or("unknown")
            )),
            Self::SerdeError(path, err) => f.write_fmt(format_args!(
                "SerdeError: {err}, path: {}",
                path.to_str().unwrap_or("unknown")
            )),
        }
    }
}

///Per-word mistake history, keyed by word id. This is the local mirror of
///the remote record store's error log; a missing file simply means no
///history yet.
#[derive(Serialize, Deserialize)]
pub struct Stats {
    word_stats: HashMap<u32, WordStats>,
}

const DEFAULT_HOME_STATS_PATH: &str = ".config/vocabr/stats.json";

impl Stats {
    pub fn new() -> Self {
        Self {
            word_stats: HashMap::new(),
        }
    }

    pub fn load_from_file(path: impl Into<PathBuf>) -> Result<Self, StatsError> {
        let path = path.into();

        if let Ok(metadata) = std::fs::metadata(&path) {
            if metadata.is_file() {
                let json = std::fs::read_to_string(&path)
                    .map_err(|err| StatsError::IoError(path.clone(), err))?;
                let stats =
                    serde_json::from_str(&json).map_err(|err| StatsError::SerdeError(path, err))?;

                Ok(stats)
            } else {
                Err(StatsError::ConfigIsDir(path))
            }
        } else {
            Ok(Self::new())
        }
    }

    pub fn load_from_user_home() -> Result<Self, StatsError> {
        let path = get_home_stats_path()?;
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: impl Into<PathBuf>) -> Result<(), StatsError> {
        let path: PathBuf = path.into();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|err| StatsError::IoError(path.clone(), err))?;
            }
        }

        std::fs::write(
            &path,
            serde_json::to_string(&self)
                .map_err(|err| StatsError::SerdeError(path.clone(), err))?,
        )
        .map_err(|err| StatsError::IoError(path.clone(), err))?;

        Ok(())
    }

    pub fn save_to_user_home(&self) -> Result<(), StatsError> {
        let path = get_home_stats_path()?;
        self.save_to_file(path)
    }

    pub fn get(&self, id: u32) -> Option<&WordStats> {
        self.word_stats.get(&id)
    }

    pub fn for_word_mut(&mut self, id: u32) -> &mut WordStats {
        self.word_stats.entry(id).or_default()
    }

    ///Folds one completed session into the history: a correct answer extends
    ///a word's streak, a wrong one bumps its mistake count and resets the
    ///streak. Runs strictly between sessions.
    pub fn record_session(&mut self, correct_ids: &[u32], mistake_ids: &[u32]) {
        for id in correct_ids {
            let stats = self.for_word_mut(*id);
            stats.consecutive_correct += 1;
        }
        for id in mistake_ids {
            let stats = self.for_word_mut(*id);
            stats.mistake_count += 1;
            stats.consecutive_correct = 0;
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

fn get_home_stats_path() -> Result<PathBuf, StatsError> {
    let path = dirs::home_dir();
    if let Some(mut path) = path {
        path.push(DEFAULT_HOME_STATS_PATH);
        Ok(path)
    } else {
        Err(StatsError::NoHomeDirError())
    }
}

#[derive(Serialize, Deserialize, Default)]
pub struct WordStats {
    pub mistake_count: u32,
    pub consecutive_correct: u32,
}

#[cfg(test)]
mod tests {
    use super::Stats;

    #[test]
    fn save_load_file() {
        let dir = tempfile::tempdir().expect("Unable to create temp dir");
        let path = dir.path().join("stats.json");

        {
            let mut stats = Stats::default();
            stats.for_word_mut(7).mistake_count = 2;
            assert!(stats.save_to_file(&path).is_ok());
        }

        {
            let stats = Stats::load_from_file(&path).expect("Unable to load from test stats file");
            assert!(stats.get(7).is_some_and(|word| word.mistake_count == 2));
        }
    }

    #[test]
    fn save_load_file_nested() {
        let dir = tempfile::tempdir().expect("Unable to create temp dir");
        let path = dir.path().join("nested/stats.json");

        {
            let mut stats = Stats::default();
            stats.for_word_mut(3).consecutive_correct = 1;
            assert!(stats.save_to_file(&path).is_ok());
        }

        {
            let stats =
                Stats::load_from_file(&path).expect("Unable to load from nested test stats file");
            assert!(stats.get(3).is_some_and(|word| word.consecutive_correct == 1));
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let stats =
            Stats::load_from_file("./does-not-exist.json").expect("Unable to default-load stats");
        assert!(stats.get(1).is_none());
    }

    #[test]
    fn record_session_updates_streaks() {
        let mut stats = Stats::new();
        stats.record_session(&[1, 2], &[3]);
        stats.record_session(&[1], &[2]);

        assert!(stats.get(1).is_some_and(|word| word.consecutive_correct == 2));
        assert!(stats
            .get(2)
            .is_some_and(|word| word.mistake_count == 1 && word.consecutive_correct == 0));
        assert!(stats.get(3).is_some_and(|word| word.mistake_count == 1));
    }
}
