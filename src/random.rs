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

//Everything here is generic over the rng so tests can pass a seeded StdRng
//where production passes thread_rng().

pub trait IntoIterShuffled<'rng, R>
where
    Self: IntoIterator,
{
    fn into_iter_shuffled(self, rng: &'rng mut R) -> ShuffleIter<'rng, Self::Item, R>;
}

pub struct ShuffleIter<'rng, T, R> {
    values: Vec<T>,
    rng: &'rng mut R,
}

impl<T, R: Rng> Iterator for ShuffleIter<'_, T, R> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        match self.values.len() {
            0 => None,
            1 => Some(self.values.swap_remove(0)),
            r => Some(self.values.swap_remove(self.rng.gen_range(0..r))),
        }
    }
}

impl<'rng, T, R: Rng> IntoIterShuffled<'rng, R> for Vec<T> {
    fn into_iter_shuffled(self, rng: &'rng mut R) -> ShuffleIter<'rng, Self::Item, R> {
        ShuffleIter { values: self, rng }
    }
}

pub trait RandomIndex {
    fn random_index(&self, rng: &mut impl Rng) -> Option<usize>;
}

pub trait RemoveRandom {
    type Item;

    fn remove_random(&mut self, rng: &mut impl Rng) -> Option<Self::Item>;
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::IntoIterShuffled;

    #[test]
    fn shuffle_yields_every_value_once() {
        let rng = &mut StdRng::seed_from_u64(7);
        let mut seen = vec![false; 10];

        for value in (0..10).collect::<Vec<_>>().into_iter_shuffled(rng) {
            assert!(!seen[value]);
            seen[value] = true;
        }

        assert!(seen.into_iter().all(|seen| seen));
    }

    #[test]
    fn shuffle_is_deterministic_for_a_seed() {
        let order_a = (0..20)
            .collect::<Vec<_>>()
            .into_iter_shuffled(&mut StdRng::seed_from_u64(42))
            .collect::<Vec<_>>();
        let order_b = (0..20)
            .collect::<Vec<_>>()
            .into_iter_shuffled(&mut StdRng::seed_from_u64(42))
            .collect::<Vec<_>>();

        assert_eq!(order_a, order_b);
    }
}
