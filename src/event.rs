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

use crossterm::event::{self, Event};

use crate::{UiError, VocabrError};

pub fn clear_and_match_event<T>(match_fn: impl Fn(Event) -> Option<T>) -> Result<T, VocabrError> {
    clear_event_loop()?;
    match_user_input(match_fn)
}

fn clear_event_loop() -> Result<(), VocabrError> {
    loop {
        if event::poll(Duration::from_millis(0)).map_err(UiError::IoError)? {
            event::read().map_err(UiError::IoError)?;
            continue;
        }
        break Ok(());
    }
}

fn match_user_input<T>(match_fn: impl Fn(Event) -> Option<T>) -> Result<T, VocabrError> {
    loop {
        if event::poll(Duration::MAX).map_err(UiError::IoError)? {
            let event = event::read().map_err(UiError::IoError)?;
            if let Some(value) = match_fn(event) {
                return Ok(value);
            }
        }
    }
}

///Like `clear_and_match_event` without the drain, but gives up after
///`timeout`. `None` means the timer ran out; the quiz loop uses this both
///for the ticking clock and for the post-answer reveal delay.
pub fn match_event_within<T>(
    timeout: Duration,
    match_fn: impl Fn(Event) -> Option<T>,
) -> Result<Option<T>, VocabrError> {
    let deadline = Instant::now() + timeout;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(None);
        }

        if event::poll(remaining).map_err(UiError::IoError)? {
            let event = event::read().map_err(UiError::IoError)?;
            if let Some(value) = match_fn(event) {
                return Ok(Some(value));
            }
        }
    }
}
