use crate::domain::NumberGenerator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::{
    sync::{
        OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

/// Returns a process-unique, monotonically increasing identifier.
///
/// Used to correlate log lines for a single subscriber connection.
pub fn rand_id() -> u64 {
    static COUNTER: OnceLock<AtomicU64> = OnceLock::new();
    let counter = COUNTER.get_or_init(|| AtomicU64::new(now_nanos()));
    counter.fetch_add(1, Ordering::Relaxed)
}

/// Draws uniformly from `[min, max]` inclusive.
pub struct UniformGenerator {
    rng: StdRng,
    min: i32,
    max: i32,
}

impl UniformGenerator {
    pub fn new(min: i32, max: i32) -> Self {
        Self::with_rng(StdRng::from_os_rng(), min, max)
    }

    /// Reproducible draws for a fixed seed.
    pub fn seeded(seed: u64, min: i32, max: i32) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), min, max)
    }

    fn with_rng(rng: StdRng, min: i32, max: i32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self { rng, min, max }
    }
}

impl NumberGenerator for UniformGenerator {
    fn next(&mut self) -> i32 {
        self.rng.random_range(self.min..=self.max)
    }
}

/// Replays a fixed sequence of numbers.
///
/// Running past the end is a test setup bug, so it panics instead of returning an error.
pub struct SequenceGenerator {
    numbers: Vec<i32>,
    index: usize,
}

impl SequenceGenerator {
    pub fn new(numbers: Vec<i32>) -> Self {
        Self { numbers, index: 0 }
    }
}

impl NumberGenerator for SequenceGenerator {
    fn next(&mut self) -> i32 {
        let Some(number) = self.numbers.get(self.index).copied() else {
            panic!(
                "number sequence exhausted after {} draws",
                self.numbers.len()
            );
        };
        self.index += 1;
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::{MAX_NUM, MIN_NUM};

    #[test]
    fn sequence_generator_replays_in_order() {
        let seq = vec![9, 1, 4, 10, 7, 5, 3];
        let mut generator = SequenceGenerator::new(seq.clone());

        let drawn: Vec<i32> = (0..seq.len()).map(|_| generator.next()).collect();
        assert_eq!(drawn, seq);
    }

    #[test]
    #[should_panic(expected = "number sequence exhausted")]
    fn sequence_generator_panics_when_exhausted() {
        let mut generator = SequenceGenerator::new(vec![1]);
        generator.next();
        generator.next();
    }

    #[test]
    fn uniform_generator_stays_in_bounds_and_hits_both_ends() {
        let mut generator = UniformGenerator::new(MIN_NUM, MAX_NUM);
        let mut seen_min = false;
        let mut seen_max = false;

        for _ in 0..10_000 {
            let got = generator.next();
            assert!((MIN_NUM..=MAX_NUM).contains(&got), "drew {got}");
            seen_min |= got == MIN_NUM;
            seen_max |= got == MAX_NUM;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn seeded_generators_repeat() {
        let mut a = UniformGenerator::seeded(7, MIN_NUM, MAX_NUM);
        let mut b = UniformGenerator::seeded(7, MIN_NUM, MAX_NUM);
        let left: Vec<i32> = (0..32).map(|_| a.next()).collect();
        let right: Vec<i32> = (0..32).map(|_| b.next()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn rand_id_is_unique() {
        assert_ne!(rand_id(), rand_id());
    }
}
