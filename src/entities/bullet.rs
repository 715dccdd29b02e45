use super::entity::{Body, Entity};
use super::explosion::{Explodable, Explosion, IMPACT_EXPLOSION_MS};
use super::terrain::Terrain;

pub const BULLET_WIDTH: f64 = 2.0;
pub const BULLET_HEIGHT: f64 = 12.0;
pub const PLAYER_BULLET_SPEED: f64 = -400.0;
pub const INVADER_BULLET_SPEED: f64 = 250.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletColor {
    Green,
    White,
}

/// A shot. The sign of `speed` tells who fired it: negative goes up (player),
/// positive goes down (invaders).
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    body: Body,
    explosion: Explosion,
    pub speed: f64,
    pub color: BulletColor,
    /// Set once the bullet has damaged a bunker, so it can't do it twice
    pub bunker_hit: bool,
}

impl Bullet {
    pub fn new(x: f64, y: f64, speed: f64, color: BulletColor) -> Self {
        Self {
            body: Body::new(x, y, BULLET_WIDTH, BULLET_HEIGHT),
            explosion: Explosion::default(),
            speed,
            color,
            bunker_hit: false,
        }
    }

    pub fn player_shot(x: f64, y: f64) -> Self {
        Self::new(x, y, PLAYER_BULLET_SPEED, BulletColor::Green)
    }

    pub fn invader_shot(x: f64, y: f64) -> Self {
        Self::new(x, y, INVADER_BULLET_SPEED, BulletColor::White)
    }

    pub fn is_upward(&self) -> bool {
        self.speed < 0.0
    }

    pub fn is_downward(&self) -> bool {
        self.speed > 0.0
    }

    /// True for a player bullet and an invader bullet
    pub fn opposes(&self, other: &Bullet) -> bool {
        self.speed * other.speed < 0.0
    }

    /// Moves the bullet, blowing it up at the ceiling or the ground.
    /// Invader bullets landing on intact ground are absorbed instead.
    pub fn tick(&mut self, dt: f64, ceiling: f64, terrain: &mut Terrain) {
        if self.tick_explosion(dt) || !self.body.active {
            return;
        }

        self.body.y += self.speed * dt / 1000.0;

        let grounded = self.body.y >= terrain.baseline();
        if self.body.y <= ceiling || grounded {
            self.explode(IMPACT_EXPLOSION_MS);
        }

        if grounded && self.is_downward() && terrain.erode(self.body.x) {
            self.explosion = Explosion::default();
            self.body.active = false;
        }
    }
}

impl Entity for Bullet {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Explodable for Bullet {
    fn explosion(&self) -> &Explosion {
        &self.explosion
    }

    fn explosion_mut(&mut self) -> &mut Explosion {
        &mut self.explosion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CEILING: f64 = 50.0;

    fn terrain() -> Terrain {
        Terrain::new(560, 580.0)
    }

    #[test]
    fn test_bullet_new() {
        let bullet = Bullet::player_shot(10.0, 200.0);
        assert_eq!(bullet.body().x, 10.0);
        assert_eq!(bullet.body().y, 200.0);
        assert_eq!(bullet.body().width, BULLET_WIDTH);
        assert_eq!(bullet.body().height, BULLET_HEIGHT);
        assert!(bullet.is_upward());
        assert!(!bullet.bunker_hit);
        assert!(bullet.is_alive());
    }

    #[test]
    fn test_player_bullet_moves_up() {
        let mut terrain = terrain();
        let mut bullet = Bullet::player_shot(10.0, 200.0);
        bullet.tick(100.0, CEILING, &mut terrain);
        assert_eq!(bullet.body().y, 160.0);
    }

    #[test]
    fn test_invader_bullet_moves_down() {
        let mut terrain = terrain();
        let mut bullet = Bullet::invader_shot(10.0, 200.0);
        bullet.tick(100.0, CEILING, &mut terrain);
        assert_eq!(bullet.body().y, 225.0);
        assert_eq!(bullet.color, BulletColor::White);
    }

    #[test]
    fn test_bullet_explodes_at_ceiling() {
        let mut terrain = terrain();
        let mut bullet = Bullet::player_shot(10.0, 55.0);
        bullet.tick(16.0, CEILING, &mut terrain);
        assert!(bullet.is_exploding());
        assert!(bullet.is_active());

        // Frozen in place while the explosion runs, then gone
        let y = bullet.body().y;
        bullet.tick(100.0, CEILING, &mut terrain);
        assert_eq!(bullet.body().y, y);
        assert!(bullet.is_active());
        bullet.tick(50.0, CEILING, &mut terrain);
        assert!(!bullet.is_active());
    }

    #[test]
    fn test_ground_absorbs_invader_bullet() {
        let mut terrain = terrain();
        let mut bullet = Bullet::invader_shot(100.5, 575.0);
        bullet.tick(40.0, CEILING, &mut terrain);
        assert!(!bullet.is_active());
        assert!(!bullet.is_exploding());
        assert!(!terrain.is_intact(99));
        assert!(!terrain.is_intact(100));
        assert!(!terrain.is_intact(101));
        assert!(terrain.is_intact(98));
        assert!(terrain.is_intact(102));
    }

    #[test]
    fn test_bullet_explodes_on_broken_ground() {
        let mut terrain = terrain();
        assert!(terrain.erode(100.0));

        let mut bullet = Bullet::invader_shot(100.0, 575.0);
        bullet.tick(40.0, CEILING, &mut terrain);
        assert!(bullet.is_active());
        assert!(bullet.is_exploding());
    }

    #[test]
    fn test_upward_bullet_never_erodes() {
        let mut terrain = terrain();
        let mut bullet = Bullet::player_shot(100.0, 600.0);
        bullet.tick(16.0, CEILING, &mut terrain);
        assert!(bullet.is_exploding());
        assert!(terrain.columns().iter().all(|&intact| intact));
    }

    #[test]
    fn test_opposing_bullets() {
        let up = Bullet::player_shot(0.0, 0.0);
        let down = Bullet::invader_shot(0.0, 0.0);
        assert!(up.opposes(&down));
        assert!(down.opposes(&up));
        assert!(!up.opposes(&up.clone()));
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_bullet_moves_in_correct_direction(
                x in 0.0f64..560.0,
                y in 100.0f64..500.0,
                dt in 1.0f64..100.0,
                upward in prop::bool::ANY
            ) {
                let mut terrain = terrain();
                let mut bullet = if upward {
                    Bullet::player_shot(x, y)
                } else {
                    Bullet::invader_shot(x, y)
                };
                bullet.tick(dt, CEILING, &mut terrain);

                if upward {
                    prop_assert!(bullet.body().y < y);
                } else {
                    prop_assert!(bullet.body().y > y);
                }
            }

            #[test]
            fn test_grounded_invader_bullet_always_resolves(
                x in 0.0f64..560.0,
                broken in prop::bool::ANY
            ) {
                let mut terrain = terrain();
                if broken {
                    terrain.erode(x);
                }
                let mut bullet = Bullet::invader_shot(x, 579.0);
                bullet.tick(16.0, CEILING, &mut terrain);

                // Either absorbed by intact ground or exploding on broken ground
                prop_assert!(!bullet.is_active() || bullet.is_exploding());
                prop_assert!(!terrain.is_intact(x.floor() as usize));
            }
        }
    }
}
