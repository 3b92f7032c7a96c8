use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Mutex;

/// Source of randomness for shuffled widgets and random picks
///
/// Injected so that tests can run the random-ordered actions deterministically.
pub trait RandomSource: Send + Sync {
    /// Uniform draw in `[0, 1)`
    fn draw(&self) -> f64;

    fn coin_flip(&self) -> bool {
        self.draw() < 0.5
    }

    /// Random index into a sequence of `len` elements, `None` when empty
    fn pick(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let index = (self.draw() * len as f64) as usize;
        Some(index.min(len - 1))
    }
}

/// Thread-local RNG, used in production
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn draw(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Seeded RNG producing a reproducible sequence of draws
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn draw(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random::<f64>()
    }
}

/// Orders items by one independent uniform draw each
pub fn shuffle<T>(items: Vec<T>, random: &dyn RandomSource) -> Vec<T> {
    let mut keyed: Vec<(f64, T)> = items.into_iter().map(|item| (random.draw(), item)).collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed sequence of draws, cycling when exhausted
    struct ScriptedRandom {
        draws: Vec<f64>,
        next: Mutex<usize>,
    }

    impl RandomSource for ScriptedRandom {
        fn draw(&self) -> f64 {
            let mut next = self.next.lock().unwrap();
            let value = self.draws[*next % self.draws.len()];
            *next += 1;
            value
        }
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let a = SeededRandom::new(7);
        let b = SeededRandom::new(7);
        let first: Vec<f64> = (0..5).map(|_| a.draw()).collect();
        let second: Vec<f64> = (0..5).map(|_| b.draw()).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|draw| (0.0..1.0).contains(draw)));
    }

    #[test]
    fn test_shuffle_orders_by_draw() {
        let random = ScriptedRandom {
            draws: vec![0.9, 0.1, 0.5],
            next: Mutex::new(0),
        };
        let shuffled = shuffle(vec!["a", "b", "c"], &random);
        assert_eq!(shuffled, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_shuffle_keeps_every_item() {
        let random = SeededRandom::new(11);
        let mut shuffled = shuffle((0..20).collect::<Vec<_>>(), &random);
        shuffled.sort();
        assert_eq!(shuffled, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_pick_handles_empty_and_upper_bound() {
        let random = ScriptedRandom {
            draws: vec![0.999_999],
            next: Mutex::new(0),
        };
        assert_eq!(random.pick(0), None);
        assert_eq!(random.pick(3), Some(2));
    }
}
