use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Bullet, Entity, Explodable, Invader, InvaderKind, Player, intersects};

pub const FORMATION_ROWS: usize = 5;
pub const FORMATION_COLUMNS: usize = 11;
const COLUMN_SPACING: f64 = 32.0;
const ROW_SPACING: f64 = 40.0;
const FORMATION_TOP: f64 = 100.0;
/// Nominal formation width used to center the grid
const FORMATION_SPAN: f64 = 400.0;
/// Distance from either side at which the swarm turns around
const EDGE_MARGIN: f64 = 22.0;
const DESCENT_STEP: f64 = 16.0;
const ANIMATION_INTERVAL_MS: f64 = 1000.0;
pub const MARCH_STEPS: u8 = 4;
/// Shots are never closer together than this, whatever the delay says
const MIN_SHOOT_DELAY_MS: f64 = 1000.0;
const KILLS_PER_BOOST: u32 = 5;
const SPEED_BOOST_STEP: f64 = 1.5;
const WAVE_SPEED_STEP: f64 = 10.0;

/// The invader formation and everything it shares: direction, speed,
/// animation frame, and the fire timer
#[derive(Debug, Clone, PartialEq)]
pub struct Swarm {
    pub invaders: Vec<Invader>,
    /// 1.0 marching right, -1.0 marching left
    pub direction: f64,
    pub base_speed: f64,
    /// Extra speed earned by kills within the current wave
    pub speed_boost: f64,
    pub shoot_timer: f64,
    pub shoot_delay: f64,
    pub anim_frame: u8,
    pub anim_timer: f64,
    /// Which of the four march beats plays next
    pub march_step: u8,
    /// Kills in the current wave
    pub kills: u32,
    /// 1-based wave number within the round
    pub wave: u32,
    field_width: f64,
}

impl Swarm {
    pub fn new(config: &GameConfig) -> Self {
        let mut swarm = Self {
            invaders: Vec::with_capacity(FORMATION_ROWS * FORMATION_COLUMNS),
            direction: 1.0,
            base_speed: config.invader_base_speed,
            speed_boost: 0.0,
            shoot_timer: 0.0,
            shoot_delay: config.invader_shoot_delay_ms,
            anim_frame: 0,
            anim_timer: 0.0,
            march_step: 0,
            kills: 0,
            wave: 1,
            field_width: config.field_width,
        };
        swarm.spawn_formation();
        swarm
    }

    /// Canonical 5x11 grid centered on the field
    pub fn spawn_formation(&mut self) {
        let start_x = (self.field_width - FORMATION_SPAN) / 2.0;
        self.invaders.clear();
        for row in 0..FORMATION_ROWS {
            let kind = InvaderKind::for_row(row);
            for column in 0..FORMATION_COLUMNS {
                let x = start_x + column as f64 * COLUMN_SPACING;
                let y = FORMATION_TOP + row as f64 * ROW_SPACING;
                self.invaders.push(Invader::new(x, y, kind));
            }
        }
    }

    pub fn current_speed(&self) -> f64 {
        self.base_speed + self.speed_boost
    }

    pub fn alive(&self) -> impl Iterator<Item = &Invader> {
        self.invaders.iter().filter(|invader| invader.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    /// No invader left, exploding ones included
    pub fn is_cleared(&self) -> bool {
        !self.invaders.iter().any(|invader| invader.is_active())
    }

    /// Flips the animation frame once a second. Returns the march beat to play.
    pub fn animate(&mut self, dt: f64) -> Option<u8> {
        self.anim_timer += dt;
        if self.anim_timer < ANIMATION_INTERVAL_MS {
            return None;
        }
        self.anim_timer = 0.0;
        self.anim_frame = 1 - self.anim_frame;
        let step = self.march_step;
        self.march_step = (self.march_step + 1) % MARCH_STEPS;
        Some(step)
    }

    /// Runs explosions and marches the formation. Returns true if the swarm
    /// hit an edge and stepped down this tick.
    pub fn advance(&mut self, dt: f64) -> bool {
        let dx = self.direction * self.current_speed() * dt / 1000.0;
        let right_limit = self.field_width - EDGE_MARGIN;
        let mut at_edge = false;

        for invader in self.invaders.iter_mut().filter(|i| i.is_active()) {
            invader.tick(dt);
            if !invader.is_alive() {
                continue;
            }

            invader.shift(dx, 0.0);
            let body = invader.body();
            if (self.direction > 0.0 && body.right() > right_limit)
                || (self.direction < 0.0 && body.x < EDGE_MARGIN)
            {
                at_edge = true;
            }
        }

        if at_edge {
            self.direction = -self.direction;
            for invader in &mut self.invaders {
                invader.shift(0.0, DESCENT_STEP);
            }
        }
        at_edge
    }

    /// Shared fire control: once the delay has passed a random live invader
    /// drops a bullet from its lower center.
    pub fn try_fire<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) -> Option<Bullet> {
        self.shoot_timer += dt;
        if self.shoot_timer <= self.shoot_delay.max(MIN_SHOOT_DELAY_MS) {
            return None;
        }

        let count = self.alive_count();
        if count == 0 {
            return None;
        }
        let shooter = self.alive().nth(rng.random_range(0..count))?;
        let body = shooter.body();
        let bullet = Bullet::invader_shot(body.center_x(), body.bottom());
        self.shoot_timer = 0.0;
        Some(bullet)
    }

    /// Counts a kill; every fifth one in a wave speeds the swarm up
    pub fn register_kill(&mut self) {
        self.kills += 1;
        if self.kills % KILLS_PER_BOOST == 0 {
            self.speed_boost += SPEED_BOOST_STEP;
        }
    }

    /// Faster base speed, boost and kills cleared, fresh formation
    pub fn next_wave(&mut self) {
        self.base_speed += WAVE_SPEED_STEP;
        self.speed_boost = 0.0;
        self.kills = 0;
        self.wave += 1;
        self.spawn_formation();
    }

    /// A live invader touching the player or reaching the breach line
    pub fn has_breached(&self, player: &Player, breach_line: f64) -> bool {
        self.alive().any(|invader| {
            intersects(invader, player) || invader.body().bottom() >= breach_line
        })
    }
}
