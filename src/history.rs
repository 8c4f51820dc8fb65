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

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{SessionConfig, SessionSummary};

///The local history keeps only the most recent sessions, newest first.
pub const HISTORY_LIMIT: usize = 10;

const DEFAULT_HOME_HISTORY_PATH: &str = ".config/vocabr/history.json";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: DateTime<Utc>,
    pub score: u32,
    pub time_spent: f64,
    pub total_correct: usize,
    pub total_words: usize,
    pub error_count: usize,
    pub range: String,
    pub quiz_type: String,
}

impl SessionRecord {
    pub fn new(summary: &SessionSummary, config: &SessionConfig) -> Self {
        let choice_percent = (config.choice_ratio * 100.0).round() as u32;
        Self {
            date: Utc::now(),
            score: summary.score_percentage,
            time_spent: (summary.elapsed_seconds * 10.0).round() / 10.0,
            total_correct: summary.correct_count,
            total_words: summary.total_questions,
            error_count: summary.mistakes.len(),
            range: format!("{}-{}", config.range_start, config.range_end),
            quiz_type: format!("{}/{} mix", choice_percent, 100 - choice_percent),
        }
    }
}

#[derive(Debug)]
pub enum HistoryError {
    IoError(PathBuf, std::io::Error),
    SerdeError(PathBuf, serde_json::Error),
}

impl Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
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

pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|mut path| {
        path.push(DEFAULT_HOME_HISTORY_PATH);
        path
    })
}

///Reads the history log. An absent or corrupt file reads as empty; nothing
///here propagates past this call.
pub fn load(path: &Path) -> Vec<SessionRecord> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

///Prepends a record and rewrites the log, truncated to `HISTORY_LIMIT`.
///The caller is expected to ignore failures: losing a history row is not
///worth interrupting the result flow for.
pub fn append(path: &Path, record: SessionRecord) -> Result<(), HistoryError> {
    let mut records = load(path);
    records.insert(0, record);
    records.truncate(HISTORY_LIMIT);

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|err| HistoryError::IoError(path.to_owned(), err))?;
        }
    }

    std::fs::write(
        path,
        serde_json::to_string(&records)
            .map_err(|err| HistoryError::SerdeError(path.to_owned(), err))?,
    )
    .map_err(|err| HistoryError::IoError(path.to_owned(), err))
}
