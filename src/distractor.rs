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

use rand::Rng;

use crate::{pool::WordEntry, random::IntoIterShuffled, Direction};

pub const OPTIONS_PER_QUESTION: usize = 4;

///One rendered option of a multiple-choice question. `text` is the
///underlying answer value; correctness is checked against it, not against
///any display decoration.
#[derive(Clone, Debug)]
pub struct ChoiceOption {
    pub text: String,
    pub correct: bool,
}

///Builds the option set for a multiple-choice question: the correct answer
///plus up to three distractors, preferring words that share the target's
///part of speech and falling back to the rest of the pool. Option values are
///unique under trimmed case-folded comparison. A pool too small for three
///distractors yields fewer options, which is a valid degraded result.
///Output order is shuffled so the correct position is unpredictable.
pub fn build_options<R: Rng>(
    word: &WordEntry,
    pool: &[WordEntry],
    direction: Direction,
    rng: &mut R,
) -> Vec<ChoiceOption> {
    let correct_text = direction.answer_field(word);

    let mut seen = Vec::with_capacity(OPTIONS_PER_QUESTION);
    seen.push(normalized(correct_text));

    let mut options = Vec::with_capacity(OPTIONS_PER_QUESTION);
    options.push(ChoiceOption {
        text: correct_text.to_owned(),
        correct: true,
    });

    let same_pos = pool
        .iter()
        .filter(|candidate| {
            candidate.id != word.id && candidate.part_of_speech == word.part_of_speech
        })
        .collect::<Vec<_>>();
    collect_distractors(same_pos, direction, &mut seen, &mut options, rng);

    if options.len() < OPTIONS_PER_QUESTION {
        let fallback = pool
            .iter()
            .filter(|candidate| {
                candidate.id != word.id && candidate.part_of_speech != word.part_of_speech
            })
            .collect::<Vec<_>>();
        collect_distractors(fallback, direction, &mut seen, &mut options, rng);
    }

    options.into_iter_shuffled(rng).collect()
}

fn collect_distractors<R: Rng>(
    candidates: Vec<&WordEntry>,
    direction: Direction,
    seen: &mut Vec<String>,
    options: &mut Vec<ChoiceOption>,
    rng: &mut R,
) {
    for candidate in candidates.into_iter_shuffled(rng) {
        if options.len() == OPTIONS_PER_QUESTION {
            return;
        }

        let text = direction.answer_field(candidate);
        let key = normalized(text);
        if seen.contains(&key) {
            continue;
        }

        seen.push(key);
        options.push(ChoiceOption {
            text: text.to_owned(),
            correct: false,
        });
    }
}

fn normalized(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::{pool::WordEntry, Direction};

    use super::{build_options, OPTIONS_PER_QUESTION};

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

    fn sample_pool() -> Vec<WordEntry> {
        vec![
            entry(1, "apple", "n.", "蘋果"),
            entry(2, "dog", "n.", "狗"),
            entry(3, "bird", "n.", "鳥"),
            entry(4, "cat", "n.", "貓"),
            entry(5, "run", "v.", "跑"),
            entry(6, "jump", "v.", "跳"),
        ]
    }

    #[test]
    fn options_are_unique_with_exactly_one_correct() {
        let pool = sample_pool();
        let rng = &mut StdRng::seed_from_u64(5);

        for word in pool.iter() {
            for _ in 0..100 {
                let options = build_options(word, &pool, Direction::TargetToSource, rng);

                assert_eq!(options.len(), OPTIONS_PER_QUESTION);
                assert_eq!(options.iter().filter(|option| option.correct).count(), 1);
                assert!(options
                    .iter()
                    .find(|option| option.correct)
                    .is_some_and(|option| option.text == word.headword));

                for (i, option) in options.iter().enumerate() {
                    assert!(options
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| i != *j)
                        .all(|(_, other)| {
                            other.text.to_lowercase() != option.text.to_lowercase()
                        }));
                }
            }
        }
    }

    #[test]
    fn same_part_of_speech_is_preferred() {
        let pool = sample_pool();
        let rng = &mut StdRng::seed_from_u64(17);

        //Four nouns available, so noun questions never need verb distractors
        for _ in 0..100 {
            let options = build_options(&pool[0], &pool, Direction::SourceToTarget, rng);
            for option in options.iter().filter(|option| !option.correct) {
                let source = pool
                    .iter()
                    .find(|word| word.translation == option.text)
                    .expect("Unable to find distractor source word");
                assert_eq!(source.part_of_speech, "n.");
            }
        }
    }

    #[test]
    fn falls_back_to_other_parts_of_speech() {
        let pool = sample_pool();
        let rng = &mut StdRng::seed_from_u64(29);

        //Only two verbs, so a verb question must borrow noun distractors
        let options = build_options(&pool[4], &pool, Direction::SourceToTarget, rng);
        assert_eq!(options.len(), OPTIONS_PER_QUESTION);
    }

    #[test]
    fn tiny_pool_degrades_without_error() {
        let pool = vec![entry(1, "apple", "n.", "蘋果"), entry(2, "dog", "n.", "狗")];
        let rng = &mut StdRng::seed_from_u64(3);

        let options = build_options(&pool[0], &pool, Direction::SourceToTarget, rng);
        assert_eq!(options.len(), 2);
        assert_eq!(options.iter().filter(|option| option.correct).count(), 1);
    }

    #[test]
    fn duplicate_values_are_deduplicated_case_insensitively() {
        let pool = vec![
            entry(1, "begin", "v.", "開始"),
            entry(2, "start", "v.", "Begin"),
            entry(3, "Begin", "v.", "begin "),
            entry(4, "launch", "v.", "發動"),
        ];
        let rng = &mut StdRng::seed_from_u64(41);

        //Distractor values collide with the correct answer "begin" and with
        //each other; only "start"'s headword and "launch" survive the dedup
        let options = build_options(&pool[0], &pool, Direction::TargetToSource, rng);
        assert_eq!(options.len(), 3);
    }
}
