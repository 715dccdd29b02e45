use super::entity::Entity;

/// Explosion length for invaders and the bonus ship (ms)
pub const DEFAULT_EXPLOSION_MS: f64 = 200.0;
/// Explosion length for bullets hitting the ceiling or the ground (ms)
pub const IMPACT_EXPLOSION_MS: f64 = 150.0;

/// Timed "dying" sub-state. Composed into bullets, invaders and the bonus ship.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Explosion {
    exploding: bool,
    timer: f64,
}

impl Explosion {
    pub fn is_exploding(&self) -> bool {
        self.exploding
    }

    /// Remaining explosion time in ms (0 when not exploding)
    pub fn remaining(&self) -> f64 {
        self.timer
    }

    fn start(&mut self, duration_ms: f64) {
        self.exploding = true;
        self.timer = duration_ms;
    }

    /// Counts down and reports whether the explosion just finished
    fn advance(&mut self, dt: f64) -> bool {
        self.timer -= dt;
        if self.timer <= 0.0 {
            self.exploding = false;
            self.timer = 0.0;
            return true;
        }
        false
    }
}

/// Capability shared by entities that blow up before they disappear.
///
/// Lifecycle: alive (active, not exploding) -> dying (active, exploding)
/// -> removed (inactive).
pub trait Explodable: Entity {
    fn explosion(&self) -> &Explosion;
    fn explosion_mut(&mut self) -> &mut Explosion;

    fn explode(&mut self, duration_ms: f64) {
        self.explosion_mut().start(duration_ms);
    }

    fn is_exploding(&self) -> bool {
        self.explosion().is_exploding()
    }

    /// Live target: active and not already blowing up
    fn is_alive(&self) -> bool {
        self.is_active() && !self.is_exploding()
    }

    /// Runs the explosion countdown, deactivating the entity when it ends.
    /// Returns true if the entity was exploding this tick.
    fn tick_explosion(&mut self, dt: f64) -> bool {
        if !self.is_exploding() {
            return false;
        }
        if self.explosion_mut().advance(dt) {
            self.deactivate();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::entity::Body;

    struct Crate {
        body: Body,
        explosion: Explosion,
    }

    impl Entity for Crate {
        fn body(&self) -> &Body {
            &self.body
        }

        fn body_mut(&mut self) -> &mut Body {
            &mut self.body
        }
    }

    impl Explodable for Crate {
        fn explosion(&self) -> &Explosion {
            &self.explosion
        }

        fn explosion_mut(&mut self) -> &mut Explosion {
            &mut self.explosion
        }
    }

    fn new_crate() -> Crate {
        Crate {
            body: Body::new(0.0, 0.0, 4.0, 4.0),
            explosion: Explosion::default(),
        }
    }

    #[test]
    fn test_not_exploding_by_default() {
        let mut c = new_crate();
        assert!(c.is_alive());
        assert!(!c.tick_explosion(16.0));
        assert!(c.is_active());
    }

    #[test]
    fn test_explosion_counts_down_then_deactivates() {
        let mut c = new_crate();
        c.explode(DEFAULT_EXPLOSION_MS);
        assert!(c.is_exploding());
        assert!(c.is_active());
        assert!(!c.is_alive());

        assert!(c.tick_explosion(150.0));
        assert!(c.is_active());
        assert_eq!(c.explosion().remaining(), 50.0);

        assert!(c.tick_explosion(50.0));
        assert!(!c.is_active());
        assert!(!c.is_exploding());
    }

    #[test]
    fn test_zero_dt_keeps_explosion_running() {
        let mut c = new_crate();
        c.explode(IMPACT_EXPLOSION_MS);
        assert!(c.tick_explosion(0.0));
        assert!(c.is_exploding());
        assert_eq!(c.explosion().remaining(), IMPACT_EXPLOSION_MS);
    }
}
