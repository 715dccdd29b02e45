use super::entity::{Body, Entity};
use super::explosion::{Explodable, Explosion};

pub const BONUS_SHIP_WIDTH: f64 = 52.0;
pub const BONUS_SHIP_HEIGHT: f64 = 24.0;
pub const BONUS_SHIP_Y: f64 = 70.0;
pub const BONUS_SHIP_SPEED: f64 = 200.0;
pub const BONUS_SHIP_POINTS: u32 = 100;

/// The mothership crossing the top of the field
#[derive(Debug, Clone, PartialEq)]
pub struct BonusShip {
    body: Body,
    explosion: Explosion,
    /// 1.0 moving right, -1.0 moving left
    pub direction: f64,
    pub speed: f64,
    /// Remaining lifespan (ms)
    pub time_alive: f64,
    /// Fully on screen at least once; bounces off the edges from then on
    pub entered: bool,
    field_width: f64,
}

impl BonusShip {
    /// Starts just off screen on the side it flies in from
    pub fn new(direction: f64, field_width: f64, lifespan_ms: f64) -> Self {
        let direction = if direction < 0.0 { -1.0 } else { 1.0 };
        let x = if direction > 0.0 {
            -BONUS_SHIP_WIDTH
        } else {
            field_width
        };
        Self {
            body: Body::new(x, BONUS_SHIP_Y, BONUS_SHIP_WIDTH, BONUS_SHIP_HEIGHT),
            explosion: Explosion::default(),
            direction,
            speed: BONUS_SHIP_SPEED,
            time_alive: lifespan_ms,
            entered: false,
            field_width,
        }
    }

    pub fn x(&self) -> f64 {
        self.body.x
    }

    /// Ran out of time rather than getting shot
    pub fn expired(&self) -> bool {
        self.time_alive <= 0.0
    }

    pub fn tick(&mut self, dt: f64) {
        if self.tick_explosion(dt) || !self.body.active {
            return;
        }

        self.body.x += self.direction * self.speed * dt / 1000.0;
        self.time_alive -= dt;

        let max_x = self.field_width - self.body.width;
        if !self.entered {
            if self.body.x > 0.0 && self.body.x < max_x {
                self.entered = true;
            }
        } else if self.body.x <= 0.0 {
            self.body.x = 0.0;
            self.direction = 1.0;
        } else if self.body.x >= max_x {
            self.body.x = max_x;
            self.direction = -1.0;
        }

        if self.expired() {
            self.body.active = false;
        }
    }

    pub fn sprite(&self) -> &'static str {
        "<=o=o=>"
    }
}

impl Entity for BonusShip {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Explodable for BonusShip {
    fn explosion(&self) -> &Explosion {
        &self.explosion
    }

    fn explosion_mut(&mut self) -> &mut Explosion {
        &mut self.explosion
    }
}
