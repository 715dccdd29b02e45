use super::bullet::Bullet;
use super::entity::{Body, Entity};
use crate::config::GameConfig;

pub const PLAYER_WIDTH: f64 = 26.0;
pub const PLAYER_HEIGHT: f64 = 16.0;
/// Muzzle offset from the ship's left edge
const MUZZLE_X: f64 = 11.0;
const MUZZLE_Y: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    body: Body,
    pub speed: f64,
    pub lives: u32,
    /// Time until the next shot is allowed (ms, may go negative)
    pub shoot_cooldown: f64,
    pub dead: bool,
    /// Respawn countdown while dead (ms)
    pub death_timer: f64,
    field_width: f64,
    shot_cooldown_ms: f64,
    respawn_ms: f64,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let x = config.field_width / 2.0 - PLAYER_WIDTH / 2.0;
        let y = config.field_height - 90.0;
        Self {
            body: Body::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: config.player_speed,
            lives: config.starting_lives,
            shoot_cooldown: 0.0,
            dead: false,
            death_timer: 0.0,
            field_width: config.field_width,
            shot_cooldown_ms: config.player_shot_cooldown_ms,
            respawn_ms: config.player_respawn_ms,
        }
    }

    pub fn x(&self) -> f64 {
        self.body.x
    }

    pub fn y(&self) -> f64 {
        self.body.y
    }

    /// Moves horizontally, -1.0 left / 1.0 right, clamped to the field
    pub fn move_by(&mut self, direction: f64, dt: f64) {
        if self.dead {
            return;
        }
        let max_x = self.field_width - self.body.width;
        let x = self.body.x + direction * self.speed * dt / 1000.0;
        self.body.x = x.clamp(0.0, max_x);
    }

    pub fn can_fire(&self) -> bool {
        self.shoot_cooldown <= 0.0
    }

    /// Fires if the trigger is held and the cooldown has run out.
    /// The cooldown keeps running down either way.
    pub fn try_shoot(&mut self, fire: bool, dt: f64) -> Option<Bullet> {
        let shot = if fire && self.can_fire() {
            self.shoot_cooldown = self.shot_cooldown_ms;
            Some(Bullet::player_shot(
                self.body.x + MUZZLE_X,
                self.body.y - MUZZLE_Y,
            ))
        } else {
            None
        };
        self.shoot_cooldown -= dt;
        shot
    }

    /// Loses a life and goes down for the respawn time, back at the center
    pub fn kill(&mut self) {
        self.dead = true;
        self.death_timer = self.respawn_ms;
        self.body.x = self.field_width / 2.0 - self.body.width / 2.0;
        self.lives = self.lives.saturating_sub(1);
    }

    pub fn is_out_of_lives(&self) -> bool {
        self.lives == 0
    }

    /// Advances one frame. Returns the bullet fired this frame, if any.
    pub fn tick(&mut self, direction: f64, fire: bool, dt: f64) -> Option<Bullet> {
        if self.dead {
            self.death_timer -= dt;
            if self.death_timer <= 0.0 {
                self.dead = false;
            }
            return None;
        }

        self.move_by(direction, dt);
        self.try_shoot(fire, dt)
    }

    pub fn sprite(&self) -> &'static str {
        if self.dead { "x^x" } else { "/A\\" }
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}
