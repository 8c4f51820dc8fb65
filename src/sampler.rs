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

use rand::Rng;

use crate::{
    pool::{WordEntry, WordPool},
    random::{IntoIterShuffled, RemoveRandom},
    session::{QuizItem, SessionConfig},
    weighted_list::WeightedList,
    Direction, DirectionPolicy, QuestionType,
};

#[derive(Debug, PartialEq, Eq)]
pub enum SampleError {
    EmptyRange { start: u32, end: u32 },
    NoQuestions,
}

impl Display for SampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRange { start, end } => f.write_fmt(format_args!(
                "EmptyRange: No words with ids between {start} and {end}"
            )),
            Self::NoQuestions => f.write_str("NoQuestions: Session would contain zero questions"),
        }
    }
}

///Assembles the session queue: filters the pool to the configured id range,
///draws `min(requested_count, eligible)` distinct words with the configured
///error bias, assigns each a question type and direction, and shuffles the
///result so selection order never leaks question order.
///
///Two draw strategies exist and the config selects between them:
///`error_interleave_ratio == 0` weights every eligible word by
///`1 + (mistake_count - min_mistake_count)` and draws without replacement;
///a non-zero ratio partitions the eligible words into previously-missed and
///fresh, fills `floor(count * ratio)` slots from the missed partition
///(capped at its size), and tops the remainder up from the fresh words.
pub fn build_queue<'a, R: Rng>(
    pool: &'a WordPool,
    config: &SessionConfig,
    rng: &mut R,
) -> Result<Vec<QuizItem<'a>>, SampleError> {
    let eligible = pool
        .words()
        .iter()
        .filter(|word| word.id >= config.range_start && word.id <= config.range_end)
        .collect::<Vec<_>>();

    if eligible.is_empty() {
        return Err(SampleError::EmptyRange {
            start: config.range_start,
            end: config.range_end,
        });
    }

    let count = config.requested_count.min(eligible.len());
    if count == 0 {
        return Err(SampleError::NoQuestions);
    }

    let selected = if config.error_interleave_ratio > 0.0 {
        interleave_draw(eligible, count, config.error_interleave_ratio, rng)
    } else {
        weighted_draw(eligible, count, rng)
    };

    let items = selected
        .into_iter()
        .map(|word| {
            //Bernoulli trial per item, so small sessions may deviate from
            //the nominal ratio
            let question_type = if rng.gen_bool(config.choice_ratio) {
                QuestionType::MultipleChoice
            } else {
                QuestionType::FillIn
            };

            let direction = match config.direction {
                DirectionPolicy::Pinned(direction) => direction,
                DirectionPolicy::Mixed => {
                    if rng.gen_bool(0.5) {
                        Direction::SourceToTarget
                    } else {
                        Direction::TargetToSource
                    }
                }
            };

            QuizItem::new(word, question_type, direction)
        })
        .collect::<Vec<_>>();

    Ok(items.into_iter_shuffled(rng).collect())
}

fn weighted_draw<'a, R: Rng>(
    eligible: Vec<&'a WordEntry>,
    count: usize,
    rng: &mut R,
) -> Vec<&'a WordEntry> {
    let min_mistakes = eligible
        .iter()
        .map(|word| word.mistake_count)
        .min()
        .expect("Unable to take minimum of empty eligible set");

    let mut weighted = eligible
        .into_iter()
        .map(|word| (word, (1 + word.mistake_count - min_mistakes) as f64))
        .collect::<WeightedList<_>>();

    let mut selected = Vec::with_capacity(count);
    for _ in 0..count {
        match weighted.remove_random(rng) {
            Some(((word, _), _)) => selected.push(word),
            None => break,
        }
    }
    selected
}

fn interleave_draw<'a, R: Rng>(
    eligible: Vec<&'a WordEntry>,
    count: usize,
    ratio: f64,
    rng: &mut R,
) -> Vec<&'a WordEntry> {
    let (missed, fresh): (Vec<_>, Vec<_>) =
        eligible.into_iter().partition(|word| word.mistake_count > 0);

    let mut missed = missed.into_iter_shuffled(rng).collect::<Vec<_>>();
    let missed_target = ((count as f64 * ratio).floor() as usize).min(missed.len());

    let mut selected = missed.drain(..missed_target).collect::<Vec<_>>();
    selected.extend(fresh.into_iter_shuffled(rng).take(count - selected.len()));

    //When the fresh partition runs short, the remaining slots come from the
    //leftover missed words; eligible >= count guarantees this fills up
    if selected.len() < count {
        let needed = count - selected.len();
        selected.extend(missed.drain(..needed));
    }

    selected
}
