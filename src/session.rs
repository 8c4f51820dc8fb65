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

use std::time::{Duration, Instant};

use rand::Rng;
use serde::Serialize;

use crate::{
    distractor::{build_options, ChoiceOption},
    evaluator,
    pool::{WordEntry, WordPool},
    sampler::{build_queue, SampleError},
    Direction, DirectionPolicy, QuestionType,
};

///User-supplied parameters for one quiz run. Created fresh per attempt.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub range_start: u32,
    pub range_end: u32,
    pub requested_count: usize,
    pub choice_ratio: f64,
    pub error_interleave_ratio: f64,
    pub direction: DirectionPolicy,
}

///One question derived from a pool entry. The word is borrowed, never
///copied; the outcome is written exactly once, when the user responds.
pub struct QuizItem<'a> {
    pub word: &'a WordEntry,
    pub question_type: QuestionType,
    pub direction: Direction,
    outcome: Option<Answered>,
}

impl<'a> QuizItem<'a> {
    pub fn new(word: &'a WordEntry, question_type: QuestionType, direction: Direction) -> Self {
        Self {
            word,
            question_type,
            direction,
            outcome: None,
        }
    }

    pub fn prompt(&self) -> &str {
        self.direction.prompt_field(self.word)
    }

    pub fn answer(&self) -> &str {
        self.direction.answer_field(self.word)
    }

    pub fn outcome(&self) -> Option<&Answered> {
        self.outcome.as_ref()
    }
}

#[derive(Clone, Debug)]
pub struct Answered {
    pub correct: bool,
    pub response: String,
}

///The result of scoring one submission.
#[derive(Clone, Debug)]
pub struct Verdict {
    pub correct: bool,
    pub expected: String,
}

///Everything the presentation layer needs to render the current question.
pub struct CurrentQuestion<'q> {
    pub number: usize,
    pub total: usize,
    pub prompt: &'q str,
    pub part_of_speech: &'q str,
    pub question_type: QuestionType,
    pub options: Option<&'q [ChoiceOption]>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Mistake {
    pub id: u32,
    pub headword: String,
    pub part_of_speech: String,
    pub translation: String,
    pub response: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeBreakdown {
    pub multiple_choice: usize,
    pub fill_in: usize,
}

///Produced exactly once, at session completion.
#[derive(Clone, Debug, Serialize)]
pub struct SessionSummary {
    pub total_questions: usize,
    pub correct_count: usize,
    pub score_percentage: u32,
    pub elapsed_seconds: f64,
    pub type_breakdown: TypeBreakdown,
    pub mistakes: Vec<Mistake>,
}

///A finished session: the summary plus the ids answered correctly, which
///the result sink needs for its streak bookkeeping.
#[derive(Clone, Debug)]
pub struct CompletedSession {
    pub summary: SessionSummary,
    pub correct_ids: Vec<u32>,
}

enum EngineState {
    AwaitingAnswer,
    Scoring,
    Completed,
}

///Drives one quiz session: `start` builds the queue, then the caller loops
///`current` -> `submit_answer` -> `advance` until the queue is exhausted and
///`finish` yields the summary.
///
///All session state lives on the instance, so independent sessions can
///coexist. The engine is push-driven: it never polls, it waits for explicit
///calls. `submit_answer` is only honored while a question is awaiting its
///answer, so double submissions cannot change the tally. Pausing affects
///elapsed-time accounting only.
pub struct SessionEngine<'a, R: Rng> {
    pool: &'a WordPool,
    queue: Vec<QuizItem<'a>>,
    options: Vec<Option<Vec<ChoiceOption>>>,
    index: usize,
    correct_count: usize,
    mistakes: Vec<Mistake>,
    state: EngineState,
    started: Instant,
    pause_started: Option<Instant>,
    paused_total: Duration,
    rng: R,
}

impl<'a, R: Rng> SessionEngine<'a, R> {
    pub fn start(
        pool: &'a WordPool,
        config: &SessionConfig,
        mut rng: R,
    ) -> Result<Self, SampleError> {
        let queue = build_queue(pool, config, &mut rng)?;
        let item_count = queue.len();

        Ok(Self {
            pool,
            queue,
            options: (0..item_count).map(|_| None).collect(),
            index: 0,
            correct_count: 0,
            mistakes: Vec::new(),
            state: EngineState::AwaitingAnswer,
            started: Instant::now(),
            pause_started: None,
            paused_total: Duration::ZERO,
            rng,
        })
    }

    pub fn total_questions(&self) -> usize {
        self.queue.len()
    }

    pub fn progress(&self) -> (usize, usize) {
        (self.correct_count, self.queue.len())
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, EngineState::Completed)
    }

    pub fn is_paused(&self) -> bool {
        self.pause_started.is_some()
    }

    ///The current question, or `None` once the queue is exhausted. The
    ///option set of a multiple-choice question is generated on first access
    ///and cached, so re-rendering cannot reshuffle it.
    pub fn current(&mut self) -> Option<CurrentQuestion<'_>> {
        if self.is_completed() {
            return None;
        }

        if self.options[self.index].is_none() {
            let item = &self.queue[self.index];
            if item.question_type == QuestionType::MultipleChoice {
                let (word, direction) = (item.word, item.direction);
                self.options[self.index] =
                    Some(build_options(word, self.pool.words(), direction, &mut self.rng));
            }
        }

        let item = &self.queue[self.index];
        Some(CurrentQuestion {
            number: self.index + 1,
            total: self.queue.len(),
            prompt: item.prompt(),
            part_of_speech: &item.word.part_of_speech,
            question_type: item.question_type,
            options: self.options[self.index].as_deref(),
        })
    }

    ///Scores the current question. Returns `None` outside the
    ///awaiting-answer state; in particular, a second submission for an
    ///already-scored question is ignored and alters nothing.
    pub fn submit_answer(&mut self, response: &str) -> Option<Verdict> {
        if !matches!(self.state, EngineState::AwaitingAnswer) {
            return None;
        }

        let item = &mut self.queue[self.index];
        let expected = item.answer().to_owned();
        let correct = evaluator::evaluate(item.question_type, &expected, response);

        item.outcome = Some(Answered {
            correct,
            response: response.to_owned(),
        });

        if correct {
            self.correct_count += 1;
        } else {
            self.mistakes.push(Mistake {
                id: item.word.id,
                headword: item.word.headword.clone(),
                part_of_speech: item.word.part_of_speech.clone(),
                translation: item.word.translation.clone(),
                response: response.to_owned(),
            });
        }

        self.state = EngineState::Scoring;
        Some(Verdict { correct, expected })
    }

    ///Moves on from a scored question; no-op in any other state.
    pub fn advance(&mut self) {
        if !matches!(self.state, EngineState::Scoring) {
            return;
        }

        self.index += 1;
        self.state = if self.index < self.queue.len() {
            EngineState::AwaitingAnswer
        } else {
            EngineState::Completed
        };
    }

    pub fn pause(&mut self) {
        if self.pause_started.is_none() {
            self.pause_started = Some(Instant::now());
        }
    }

    pub fn resume(&mut self) {
        if let Some(pause_started) = self.pause_started.take() {
            self.paused_total += pause_started.elapsed();
        }
    }

    ///Active quiz time: wall time since start minus time spent paused.
    pub fn elapsed(&self) -> Duration {
        let total = self.started.elapsed();
        let paused = self.paused_total
            + self
                .pause_started
                .map(|pause_started| pause_started.elapsed())
                .unwrap_or(Duration::ZERO);
        total.saturating_sub(paused)
    }

    ///Consumes the engine and produces the summary; `None` unless every
    ///question has been answered. An abandoned session yields nothing.
    pub fn finish(mut self) -> Option<CompletedSession> {
        if !self.is_completed() {
            return None;
        }

        self.resume();
        let elapsed_seconds = self.elapsed().as_secs_f64();

        let total_questions = self.queue.len();
        let score_percentage =
            (100.0 * self.correct_count as f64 / total_questions as f64).round() as u32;

        let mut type_breakdown = TypeBreakdown {
            multiple_choice: 0,
            fill_in: 0,
        };
        for item in self.queue.iter() {
            match item.question_type {
                QuestionType::MultipleChoice => type_breakdown.multiple_choice += 1,
                QuestionType::FillIn => type_breakdown.fill_in += 1,
            }
        }

        let correct_ids = self
            .queue
            .iter()
            .filter(|item| item.outcome().is_some_and(|outcome| outcome.correct))
            .map(|item| item.word.id)
            .collect();

        Some(CompletedSession {
            summary: SessionSummary {
                total_questions,
                correct_count: self.correct_count,
                score_percentage,
                elapsed_seconds,
                type_breakdown,
                mistakes: self.mistakes,
            },
            correct_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::{rngs::StdRng, SeedableRng};

    use crate::{
        pool::{WordEntry, WordPool},
        Direction, DirectionPolicy,
    };

    use super::{SessionConfig, SessionEngine};

    fn entry(id: u32, headword: &str, translation: &str) -> WordEntry {
        WordEntry {
            id,
            headword: headword.to_owned(),
            translation: translation.to_owned(),
            part_of_speech: "n.".to_owned(),
            mistake_count: 0,
            consecutive_correct: 0,
        }
    }

    fn animal_pool() -> WordPool {
        WordPool::new(vec![
            entry(1, "cat", "貓"),
            entry(2, "dog", "狗"),
            entry(3, "bird", "鳥"),
        ])
        .expect("Unable to build test pool")
    }

    fn fill_in_config(count: usize) -> SessionConfig {
        SessionConfig {
            range_start: 1,
            range_end: 100,
            requested_count: count,
            choice_ratio: 0.0,
            error_interleave_ratio: 0.0,
            direction: DirectionPolicy::Pinned(Direction::TargetToSource),
        }
    }

    #[test]
    fn full_fill_in_session_aggregates_results() {
        let pool = animal_pool();
        let mut engine =
            SessionEngine::start(&pool, &fill_in_config(3), StdRng::seed_from_u64(1))
                .expect("Unable to start session");

        while let Some(question) = engine.current() {
            let response = match question.prompt {
                "貓" => "cat",
                "狗" => "DOG ",
                "鳥" => "",
                prompt => panic!("Unexpected prompt: {prompt}"),
            };
            let response = response.to_owned();

            engine
                .submit_answer(&response)
                .expect("Unable to submit answer");
            engine.advance();
        }

        let completed = engine.finish().expect("Unable to finish session");
        let summary = completed.summary;

        assert_eq!(summary.total_questions, 3);
        assert_eq!(summary.correct_count, 2);
        assert_eq!(summary.score_percentage, 67);
        assert_eq!(summary.type_breakdown.fill_in, 3);
        assert_eq!(summary.type_breakdown.multiple_choice, 0);

        assert_eq!(summary.mistakes.len(), 1);
        let mistake = &summary.mistakes[0];
        assert_eq!(mistake.headword, "bird");
        assert_eq!(mistake.response, "");

        assert_eq!(completed.correct_ids.len(), 2);
        assert!(completed.correct_ids.contains(&1));
        assert!(completed.correct_ids.contains(&2));
    }

    #[test]
    fn double_submission_is_ignored() {
        let pool = animal_pool();
        let mut engine =
            SessionEngine::start(&pool, &fill_in_config(1), StdRng::seed_from_u64(2))
                .expect("Unable to start session");

        let response = engine
            .current()
            .map(|question| question.prompt.to_owned())
            .map(|prompt| match prompt.as_str() {
                "貓" => "cat",
                "狗" => "dog",
                _ => "bird",
            })
            .expect("Unable to get current question");

        assert!(engine.submit_answer(&response).is_some());
        let (correct_after_first, _) = engine.progress();

        assert!(engine.submit_answer("something else").is_none());
        let (correct_after_second, _) = engine.progress();

        assert_eq!(correct_after_first, 1);
        assert_eq!(correct_after_second, correct_after_first);

        engine.advance();
        let completed = engine.finish().expect("Unable to finish session");
        assert!(completed.summary.mistakes.is_empty());
    }

    #[test]
    fn multiple_choice_options_are_generated_once() {
        let pool = animal_pool();
        let mut config = fill_in_config(3);
        config.choice_ratio = 1.0;

        let mut engine = SessionEngine::start(&pool, &config, StdRng::seed_from_u64(3))
            .expect("Unable to start session");

        let first = engine
            .current()
            .and_then(|question| question.options.map(<[_]>::to_vec))
            .expect("Unable to get options");
        let second = engine
            .current()
            .and_then(|question| question.options.map(<[_]>::to_vec))
            .expect("Unable to get options");

        assert_eq!(first.len(), second.len());
        assert!(first
            .iter()
            .zip(second.iter())
            .all(|(a, b)| a.text == b.text && a.correct == b.correct));
    }

    #[test]
    fn choice_answers_score_by_option_value() {
        let pool = animal_pool();
        let mut config = fill_in_config(3);
        config.choice_ratio = 1.0;

        let mut engine = SessionEngine::start(&pool, &config, StdRng::seed_from_u64(4))
            .expect("Unable to start session");

        while let Some(question) = engine.current() {
            let chosen = question
                .options
                .expect("Unable to get options")
                .iter()
                .find(|option| option.correct)
                .map(|option| option.text.clone())
                .expect("Unable to find correct option");

            let verdict = engine
                .submit_answer(&chosen)
                .expect("Unable to submit answer");
            assert!(verdict.correct);
            engine.advance();
        }

        let completed = engine.finish().expect("Unable to finish session");
        assert_eq!(completed.summary.score_percentage, 100);
        assert!(completed.summary.mistakes.is_empty());
    }

    #[test]
    fn submission_is_rejected_while_scoring() {
        let pool = animal_pool();
        let mut engine =
            SessionEngine::start(&pool, &fill_in_config(2), StdRng::seed_from_u64(5))
                .expect("Unable to start session");

        assert!(engine.submit_answer("wrong").is_some());
        assert!(engine.submit_answer("wrong").is_none());

        engine.advance();
        //Back in awaiting-answer for the second question
        assert!(engine.submit_answer("wrong").is_some());
        engine.advance();

        assert!(engine.is_completed());
        assert!(engine.submit_answer("wrong").is_none());
    }

    #[test]
    fn finish_requires_completion() {
        let pool = animal_pool();
        let engine = SessionEngine::start(&pool, &fill_in_config(2), StdRng::seed_from_u64(6))
            .expect("Unable to start session");

        assert!(engine.finish().is_none());
    }

    #[test]
    fn paused_time_is_excluded_from_elapsed() {
        let pool = animal_pool();
        let mut engine =
            SessionEngine::start(&pool, &fill_in_config(1), StdRng::seed_from_u64(7))
                .expect("Unable to start session");

        engine.pause();
        std::thread::sleep(Duration::from_millis(150));
        engine.resume();

        engine.submit_answer("whatever");
        engine.advance();

        let completed = engine.finish().expect("Unable to finish session");
        assert!(
            completed.summary.elapsed_seconds < 0.1,
            "elapsed {} should exclude the 150ms pause",
            completed.summary.elapsed_seconds
        );
    }

    #[test]
    fn score_arithmetic_holds_for_mixed_outcomes() {
        let pool = animal_pool();
        let mut engine =
            SessionEngine::start(&pool, &fill_in_config(3), StdRng::seed_from_u64(8))
                .expect("Unable to start session");

        let mut wrong_first = true;
        while let Some(question) = engine.current() {
            let response = if wrong_first {
                "definitely wrong".to_owned()
            } else {
                question.prompt.to_owned() //prompt never equals the answer
            };
            wrong_first = false;

            engine
                .submit_answer(&response)
                .expect("Unable to submit answer");
            engine.advance();
        }

        let completed = engine.finish().expect("Unable to finish session");
        let summary = completed.summary;
        assert_eq!(
            summary.score_percentage,
            (100.0 * summary.correct_count as f64 / summary.total_questions as f64).round() as u32
        );
        assert_eq!(
            summary.mistakes.len(),
            summary.total_questions - summary.correct_count
        );
    }
}
