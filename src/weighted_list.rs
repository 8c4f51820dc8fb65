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

use crate::random::{RandomIndex, RemoveRandom};

pub(crate) type ItemAndWeight<T> = (T, f64);

///Weight-proportional selection list. Backing store for the sampler's
///draw-without-replacement: selected items are removed along with their
///weight so they cannot be drawn twice within a session.
#[derive(Clone)]
pub(crate) struct WeightedList<T> {
    items: Vec<ItemAndWeight<T>>,
    total_weight: f64,
}

impl<T> WeightedList<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            total_weight: 0.0,
        }
    }

    pub fn add(&mut self, item: impl Into<ItemAndWeight<T>>) {
        let item = item.into();
        let weight = item.1;

        assert!(
            weight >= 0.0,
            "item weight must be greater than or equal to zero, given: {weight}"
        );

        self.items.push(item);
        self.total_weight += weight;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for WeightedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::default(),
            total_weight: 0.0,
        }
    }
}

impl<T> FromIterator<ItemAndWeight<T>> for WeightedList<T> {
    fn from_iter<I: IntoIterator<Item = (T, f64)>>(iter: I) -> Self {
        let iter = iter.into_iter();

        let mut list = {
            let (lower_bound, _) = iter.size_hint();
            Self::with_capacity(lower_bound)
        };

        for item_weight in iter {
            list.add(item_weight);
        }

        list
    }
}

impl<T> RandomIndex for WeightedList<T> {
    fn random_index(&self, rng: &mut impl Rng) -> Option<usize> {
        match self.len() {
            0 => None,
            1 => Some(0),
            _ => {
                let needle = rng.gen_range(0.0..self.total_weight);
                let mut running_total = 0.0;

                for (i, (_, weight)) in self.items.iter().enumerate() {
                    running_total += *weight;
                    if needle < running_total {
                        return Some(i);
                    }
                }

                panic!("Reached end without finding match");
            }
        }
    }
}

impl<T> RemoveRandom for WeightedList<T> {
    type Item = (ItemAndWeight<T>, usize);

    fn remove_random(&mut self, rng: &mut impl Rng) -> Option<Self::Item> {
        self.random_index(rng).map(|index| {
            let item = self.items.swap_remove(index);
            self.total_weight -= item.1;
            (item, index)
        })
    }
}
