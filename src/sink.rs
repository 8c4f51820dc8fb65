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

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::session::{CompletedSession, Mistake};

///Destination for a finished session's summary and mistake log. Submission
///is fire-and-forget: any non-success outcome is advisory, is never retried
///here, and never invalidates the already-computed summary.
pub trait ResultSink {
    fn submit(&self, session: &CompletedSession) -> SinkOutcome;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkOutcome {
    Success,
    Error(String),
    NetworkError(String),
}

impl SinkOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl Display for SinkOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => f.write_str("Results synced"),
            Self::Error(message) => f.write_fmt(format_args!("Sync rejected: {message}")),
            Self::NetworkError(message) => f.write_fmt(format_args!("Sync failed: {message}")),
        }
    }
}

///The wire shape the record store expects: the aggregate figures, the
///mistake log, and per-word correctness so the store can maintain
///consecutive-correct streaks.
#[derive(Serialize)]
struct ResultPayload<'a> {
    score: u32,
    time_spent: f64,
    total_correct: usize,
    total_words: usize,
    errors: &'a [Mistake],
    results: Vec<WordResult>,
}

#[derive(Serialize)]
struct WordResult {
    id: u32,
    correct: bool,
}

impl<'a> From<&'a CompletedSession> for ResultPayload<'a> {
    fn from(session: &'a CompletedSession) -> Self {
        let summary = &session.summary;
        Self {
            score: summary.score_percentage,
            time_spent: summary.elapsed_seconds,
            total_correct: summary.correct_count,
            total_words: summary.total_questions,
            errors: &summary.mistakes,
            results: session
                .correct_ids
                .iter()
                .map(|id| WordResult {
                    id: *id,
                    correct: true,
                })
                .chain(summary.mistakes.iter().map(|mistake| WordResult {
                    id: mistake.id,
                    correct: false,
                }))
                .collect(),
        }
    }
}

#[derive(Deserialize)]
struct SinkResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

///Posts session results to a JSON web endpoint (a spreadsheet-backed web
///app in the reference deployment). The endpoint answers
///`{"status": "success"}` or `{"status": "error", "message": ...}`.
pub struct HttpResultSink {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpResultSink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl ResultSink for HttpResultSink {
    fn submit(&self, session: &CompletedSession) -> SinkOutcome {
        let payload = ResultPayload::from(session);

        let response = match self.client.post(&self.url).json(&payload).send() {
            Ok(response) => response,
            Err(err) => return SinkOutcome::NetworkError(err.to_string()),
        };

        let response: SinkResponse = match response.json() {
            Ok(response) => response,
            Err(err) => return SinkOutcome::Error(format!("Unparseable response: {err}")),
        };

        let message = || response.message.clone().unwrap_or_default();
        match response.status.as_str() {
            "success" => SinkOutcome::Success,
            "network_error" => SinkOutcome::NetworkError(message()),
            _ => SinkOutcome::Error(message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::session::{
        CompletedSession, Mistake, SessionSummary, TypeBreakdown,
    };

    use super::ResultPayload;

    fn completed() -> CompletedSession {
        CompletedSession {
            summary: SessionSummary {
                total_questions: 3,
                correct_count: 2,
                score_percentage: 67,
                elapsed_seconds: 41.5,
                type_breakdown: TypeBreakdown {
                    multiple_choice: 1,
                    fill_in: 2,
                },
                mistakes: vec![Mistake {
                    id: 3,
                    headword: "bird".to_owned(),
                    part_of_speech: "n.".to_owned(),
                    translation: "鳥".to_owned(),
                    response: String::new(),
                }],
            },
            correct_ids: vec![1, 2],
        }
    }

    #[test]
    fn payload_carries_summary_and_per_word_results() {
        let session = completed();
        let value = serde_json::to_value(ResultPayload::from(&session))
            .expect("Unable to serialize payload");

        assert_eq!(value["score"], 67);
        assert_eq!(value["total_correct"], 2);
        assert_eq!(value["total_words"], 3);
        assert_eq!(value["errors"][0]["headword"], "bird");

        let results = value["results"]
            .as_array()
            .expect("Unable to read results array");
        assert_eq!(results.len(), 3);
        assert!(results
            .iter()
            .any(|result| result["id"] == 3 && result["correct"] == false));
    }
}
