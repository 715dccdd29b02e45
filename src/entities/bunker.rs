use rand::Rng;

use super::entity::{Body, Entity};

pub const BUNKER_WIDTH: f64 = 44.0;
pub const BUNKER_HEIGHT: f64 = 32.0;
/// Hits each damage stage absorbs before the next one
const STAGE_CAPACITY: [u8; 5] = [1, 3, 2, 1, 1];
pub const FINAL_STAGE: u8 = 4;

/// Shelter that crumbles one stage at a time
#[derive(Debug, Clone, PartialEq)]
pub struct Bunker {
    body: Body,
    stage: u8,
    hp: u8,
}

impl Bunker {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            body: Body::new(x, y, BUNKER_WIDTH, BUNKER_HEIGHT),
            stage: 0,
            hp: stage_capacity(0),
        }
    }

    /// 0 (intact) to 4 (heaviest damage)
    pub fn stage(&self) -> u8 {
        self.stage
    }

    pub fn hp(&self) -> u8 {
        self.hp
    }

    /// Takes one hit. Once fully damaged every hit may bring it down.
    pub fn hit<R: Rng + ?Sized>(&mut self, rng: &mut R, destroy_chance: f64) {
        if self.stage >= FINAL_STAGE {
            if rng.random::<f64>() < destroy_chance {
                self.body.active = false;
            }
            return;
        }

        self.hp = self.hp.saturating_sub(1);
        if self.hp == 0 {
            self.stage += 1;
            self.hp = stage_capacity(self.stage);
        }
    }

    /// Two text rows, more broken at each stage
    pub fn sprite_rows(&self) -> [&'static str; 2] {
        match self.stage {
            0 => ["▄█████▄", "███▀███"],
            1 => ["▄██▓██▄", "█▓▀ ▀▓█"],
            2 => ["▄▓▒▓▒▓▄", "▓▒▀ ▀▒▓"],
            3 => ["▗▒░▒░▒▖", "▒░   ░▒"],
            _ => [" ░ ▖░ ░", "░     ░"],
        }
    }
}

fn stage_capacity(stage: u8) -> u8 {
    STAGE_CAPACITY.get(stage as usize).copied().unwrap_or(1)
}

impl Entity for Bunker {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_bunker_new() {
        let bunker = Bunker::new(88.0, 490.0);
        assert_eq!(bunker.stage(), 0);
        assert_eq!(bunker.hp(), 1);
        assert!(bunker.is_active());
        assert_eq!(bunker.body().width, BUNKER_WIDTH);
    }

    #[test]
    fn test_stage_progression() {
        let mut rng = rng();
        let mut bunker = Bunker::new(0.0, 0.0);
        let mut stages = Vec::new();
        for _ in 0..7 {
            bunker.hit(&mut rng, 0.35);
            stages.push(bunker.stage());
        }
        assert_eq!(stages, vec![1, 1, 1, 2, 2, 3, 4]);
        assert!(bunker.is_active());
    }

    #[test]
    fn test_final_stage_destroyed_for_sure() {
        let mut rng = rng();
        let mut bunker = Bunker::new(0.0, 0.0);
        for _ in 0..7 {
            bunker.hit(&mut rng, 1.0);
        }
        assert_eq!(bunker.stage(), FINAL_STAGE);
        assert!(bunker.is_active());

        bunker.hit(&mut rng, 1.0);
        assert!(!bunker.is_active());
        assert_eq!(bunker.stage(), FINAL_STAGE);
    }

    #[test]
    fn test_final_stage_never_destroyed_at_zero_chance() {
        let mut rng = rng();
        let mut bunker = Bunker::new(0.0, 0.0);
        for _ in 0..100 {
            bunker.hit(&mut rng, 0.0);
        }
        assert_eq!(bunker.stage(), FINAL_STAGE);
        assert!(bunker.is_active());
    }

    #[test]
    fn test_final_stage_eventually_destroyed() {
        let mut rng = rng();
        let mut bunker = Bunker::new(0.0, 0.0);
        let mut hits = 0;
        while bunker.is_active() && hits < 1000 {
            bunker.hit(&mut rng, 0.35);
            hits += 1;
        }
        assert!(!bunker.is_active());
        assert!(hits > 7);
    }

    #[test]
    fn test_capacity_defaults_past_table() {
        assert_eq!(stage_capacity(1), 3);
        assert_eq!(stage_capacity(9), 1);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_stage_never_decreases(
                seed in any::<u64>(),
                hits in 0usize..60,
                chance in 0.0f64..=1.0
            ) {
                let mut rng = Pcg32::seed_from_u64(seed);
                let mut bunker = Bunker::new(0.0, 0.0);
                let mut last = bunker.stage();
                for _ in 0..hits {
                    bunker.hit(&mut rng, chance);
                    prop_assert!(bunker.stage() >= last);
                    prop_assert!(bunker.stage() <= FINAL_STAGE);
                    last = bunker.stage();
                }
            }

            #[test]
            fn test_destroyed_only_at_final_stage(
                seed in any::<u64>(),
                hits in 0usize..60
            ) {
                let mut rng = Pcg32::seed_from_u64(seed);
                let mut bunker = Bunker::new(0.0, 0.0);
                for _ in 0..hits {
                    bunker.hit(&mut rng, 0.35);
                    if !bunker.is_active() {
                        prop_assert_eq!(bunker.stage(), FINAL_STAGE);
                    }
                }
            }
        }
    }
}
