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

use crate::QuestionType;

///Decides correctness of a user response against the canonical answer.
///Never mutates anything and never fails: an empty or missing response is an
///ordinary wrong answer.
pub fn evaluate(question_type: QuestionType, canonical: &str, response: &str) -> bool {
    if response.is_empty() || canonical.is_empty() {
        return false;
    }

    match question_type {
        QuestionType::MultipleChoice => response.to_lowercase() == canonical.to_lowercase(),
        QuestionType::FillIn => spelling_matches(canonical, response),
    }
}

///Lenient spelling check: case and surrounding/internal whitespace are
///ignored, but there is no edit-distance tolerance.
fn spelling_matches(canonical: &str, response: &str) -> bool {
    normalize(response) == normalize(canonical)
}

fn normalize(answer: &str) -> String {
    answer
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
