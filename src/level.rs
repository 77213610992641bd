use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

/// Picks node heights with a geometric distribution: each extra level is
/// half as likely as the one below it.
#[derive(Debug, Clone)]
pub(crate) struct LevelSelector {
    rng: SmallRng,
}

impl LevelSelector {
    pub(crate) fn new(seed: Option<u64>) -> LevelSelector {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        LevelSelector { rng }
    }

    /// Returns a height in `[1, max_levels]`.
    pub(crate) fn choose(&mut self, max_levels: usize) -> usize {
        let mut bits = self.rng.next_u64();
        let mut height = 1;
        while height < max_levels && bits & 1 == 1 {
            height += 1;
            bits >>= 1;
        }
        height
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_heights_stay_in_bounds() {
        let mut levels = LevelSelector::new(Some(1337));
        for max_levels in [1, 2, 5, 48, 64] {
            for _ in 0..1_000 {
                let height = levels.choose(max_levels);
                assert!((1..=max_levels).contains(&height));
            }
        }
    }

    #[test]
    fn test_single_level_list_always_gets_height_one() {
        let mut levels = LevelSelector::new(Some(3));
        assert!((0..100).all(|_| levels.choose(1) == 1));
    }

    #[test]
    fn test_geometric_distribution() {
        // Roughly half of all nodes should be height 1 and a quarter height 2.
        let seeds = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        for seed in seeds {
            let mut levels = LevelSelector::new(Some(seed));
            let mut counts = [0_i32; 4];
            for _ in 0..10_000 {
                let height = levels.choose(48);
                if height <= counts.len() {
                    counts[height - 1] += 1;
                }
            }
            assert!(
                (counts[0] - 5_000).abs() < 400,
                "seed: {}, counts: {:?}",
                seed,
                counts
            );
            assert!(
                (counts[1] - 2_500).abs() < 300,
                "seed: {}, counts: {:?}",
                seed,
                counts
            );
            assert!(counts[2] > counts[3], "seed: {}, counts: {:?}", seed, counts);
        }
    }

    #[test]
    fn test_seeded_selectors_agree() {
        let mut a = LevelSelector::new(Some(42));
        let mut b = LevelSelector::new(Some(42));
        for _ in 0..100 {
            assert_eq!(a.choose(32), b.choose(32));
        }
    }
}
