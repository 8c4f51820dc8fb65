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
    ffi::OsStr,
    fmt::Display,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::stats::Stats;

///A single vocabulary entry. Entries are immutable once the pool is built;
///the mistake statistics on them are a snapshot taken at load time and only
///change between sessions, through the result sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordEntry {
    pub id: u32,
    pub headword: String,
    pub translation: String,
    pub part_of_speech: String,
    pub mistake_count: u32,
    pub consecutive_correct: u32,
}

///The catalog of vocabulary entries available to a session. Ids are unique
///across the pool and the pool is read-only for the remainder of the process
///once `merge_stats` has run.
///
///Example:
///```
///# use vocabr::pool::parse_csv;
///let csv = "id,english,pos,chinese\n1,apple,n.,蘋果\n2,run,v.,跑";
///let words = parse_csv(csv);
///assert!(words.len() == 2 && words[0].headword == "apple");
///```
#[derive(Debug)]
pub struct WordPool {
    words: Vec<WordEntry>,
}

impl WordPool {
    pub fn new(words: Vec<WordEntry>) -> Result<Self, PoolError> {
        let mut seen = Vec::with_capacity(words.len());
        for word in words.iter() {
            if seen.contains(&word.id) {
                return Err(PoolError::DuplicateId(word.id));
            }
            seen.push(word.id);
        }
        Ok(Self { words })
    }

    pub fn words(&self) -> &[WordEntry] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn max_id(&self) -> u32 {
        self.words.iter().map(|word| word.id).max().unwrap_or(0)
    }

    ///Overlays prior mistake statistics onto the loaded entries. Words with
    ///no recorded history keep their zero defaults.
    pub fn merge_stats(&mut self, stats: &Stats) {
        for word in self.words.iter_mut() {
            if let Some(word_stats) = stats.get(word.id) {
                word.mistake_count = word_stats.mistake_count;
                word.consecutive_correct = word_stats.consecutive_correct;
            }
        }
    }
}

#[derive(Debug)]
pub enum PoolError {
    IoError(PathBuf, std::io::Error),
    SerdeError(PathBuf, serde_json::Error),
    Empty(PathBuf),
    DuplicateId(u32),
}

impl Display for PoolError {
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
            Self::Empty(path) => f.write_fmt(format_args!(
                "Empty: No usable rows in word list: {}",
                path.to_str().unwrap_or("unknown")
            )),
            Self::DuplicateId(id) => f.write_fmt(format_args!(
                "DuplicateId: At least two rows share the id {id}"
            )),
        }
    }
}

///Loads a word pool from a spreadsheet export (`.csv`) or a JSON array.
///Anything without a `.json` extension is treated as delimited text, since
///that is what the catalog sources actually publish.
pub fn load_pool(path: impl Into<PathBuf>) -> Result<WordPool, PoolError> {
    let path = path.into();
    let text =
        std::fs::read_to_string(&path).map_err(|err| PoolError::IoError(path.clone(), err))?;

    let words = if file_extension(&path).is_some_and(|ext| ext.to_lowercase() == "json") {
        parse_json(&text).map_err(|err| PoolError::SerdeError(path.clone(), err))?
    } else {
        parse_csv(&text)
    };

    if words.is_empty() {
        return Err(PoolError::Empty(path));
    }

    WordPool::new(words)
}

fn file_extension(path: &Path) -> Option<&str> {
    path.extension().and_then(OsStr::to_str)
}

///Parses delimited text with a header row into entries. The delimiter is
///sniffed from the header (`;` or `,`). Rows missing any required field, or
///with an unparseable id, are dropped.
pub fn parse_csv(text: &str) -> Vec<WordEntry> {
    let delimiter = if text.lines().next().is_some_and(|line| line.contains(';')) {
        b';'
    } else {
        b','
    };

    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes())
        .records()
        .filter_map(|record| {
            let record = record.ok()?;
            entry_from_parts(
                record.get(0)?,
                record.get(1)?,
                record.get(2)?,
                record.get(3)?,
            )
        })
        .collect()
}

///Parses a JSON array of row objects, dropping rows missing any required
///field.
pub fn parse_json(text: &str) -> Result<Vec<WordEntry>, serde_json::Error> {
    let rows: Vec<RawRow> = serde_json::from_str(text)?;
    Ok(rows
        .iter()
        .filter_map(|row| {
            entry_from_parts(
                row.id.as_deref()?,
                row.headword.as_deref()?,
                row.part_of_speech.as_deref()?,
                row.translation.as_deref()?,
            )
        })
        .collect())
}

///Remote sources serialize ids as either numbers or strings, so every field
///arrives as text and is validated in one place.
#[derive(Deserialize)]
struct RawRow {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    id: Option<String>,
    #[serde(default)]
    headword: Option<String>,
    #[serde(default)]
    part_of_speech: Option<String>,
    #[serde(default)]
    translation: Option<String>,
}

fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Deserialize::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }))
}

fn entry_from_parts(
    id: &str,
    headword: &str,
    part_of_speech: &str,
    translation: &str,
) -> Option<WordEntry> {
    let id = id.trim().parse().ok()?;
    let headword = headword.trim();
    let part_of_speech = part_of_speech.trim();
    let translation = translation.trim();

    if headword.is_empty() || part_of_speech.is_empty() || translation.is_empty() {
        return None;
    }

    Some(WordEntry {
        id,
        headword: headword.to_owned(),
        translation: translation.to_owned(),
        part_of_speech: normalize_pos(part_of_speech),
        mistake_count: 0,
        consecutive_correct: 0,
    })
}

///Sources disagree on whether tags carry the trailing period (`n` vs `n.`),
///so tags are folded to the dotted lowercase form before any comparison.
fn normalize_pos(pos: &str) -> String {
    let mut normalized = pos.to_lowercase().replace('.', "");
    normalized.push('.');
    normalized
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{load_pool, parse_csv, parse_json, PoolError, WordEntry, WordPool};
    use crate::stats::Stats;

    fn entry(id: u32, headword: &str, pos: &str, translation: &str) -> WordEntry {
        WordEntry {
            id,
            headword: headword.to_owned(),
            translation: translation.to_owned(),
            part_of_speech: pos.to_owned(),
            mistake_count: 0,
            consecutive_correct: 0,
        }
    }

    #[test]
    fn parse_csv_drops_incomplete_rows() {
        let csv = "id,english,pos,chinese\n\
                   1,apple,n.,蘋果\n\
                   2,run,v.,\n\
                   not-a-number,dog,n.,狗\n\
                   3,bird,n.,鳥\n\
                   4,cat\n";
        let words = parse_csv(csv);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].id, 1);
        assert_eq!(words[1].headword, "bird");
    }

    #[test]
    fn parse_csv_sniffs_semicolon_delimiter() {
        let csv = "id;english;pos;chinese\n1;apple;n.;蘋果\n2;run;v.;跑";
        let words = parse_csv(csv);
        assert_eq!(words.len(), 2);
        assert_eq!(words[1].translation, "跑");
    }

    #[test]
    fn parse_csv_normalizes_part_of_speech() {
        let csv = "id,english,pos,chinese\n1,apple,N,蘋果\n2,run,v.,跑";
        let words = parse_csv(csv);
        assert_eq!(words[0].part_of_speech, "n.");
        assert_eq!(words[1].part_of_speech, "v.");
    }

    #[test]
    fn parse_json_accepts_numeric_and_string_ids() {
        let json = r#"[
            {"id": 1, "headword": "apple", "part_of_speech": "n.", "translation": "蘋果"},
            {"id": "2", "headword": "run", "part_of_speech": "v.", "translation": "跑"},
            {"headword": "orphan", "part_of_speech": "n.", "translation": "孤兒"}
        ]"#;
        let words = parse_json(json).expect("Unable to parse json rows");
        assert_eq!(words.len(), 2);
        assert_eq!(words[1].id, 2);
    }

    #[test]
    fn pool_rejects_duplicate_ids() {
        let words = vec![entry(1, "apple", "n.", "蘋果"), entry(1, "run", "v.", "跑")];
        assert!(matches!(
            WordPool::new(words),
            Err(PoolError::DuplicateId(1))
        ));
    }

    #[test]
    fn merge_stats_overlays_history() {
        let mut pool = WordPool::new(vec![
            entry(1, "apple", "n.", "蘋果"),
            entry(2, "run", "v.", "跑"),
        ])
        .expect("Unable to build pool");

        let mut stats = Stats::new();
        stats.for_word_mut(2).mistake_count = 4;
        pool.merge_stats(&stats);

        assert_eq!(pool.words()[0].mistake_count, 0);
        assert_eq!(pool.words()[1].mistake_count, 4);
    }

    #[test]
    fn load_pool_empty_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("Unable to create temp file");
        write!(file, "id,english,pos,chinese\n").expect("Unable to write temp file");
        assert!(matches!(load_pool(file.path()), Err(PoolError::Empty(_))));
    }

    #[test]
    fn load_pool_reads_csv_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("Unable to create temp file");
        write!(file, "id,english,pos,chinese\n1,apple,n.,蘋果\n").expect("Unable to write rows");
        let pool = load_pool(file.path()).expect("Unable to load pool");
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.max_id(), 1);
    }
}
