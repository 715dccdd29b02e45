//! Round simulation: owns every entity, advances them once per tick,
//! resolves collisions and drives the state machine.

mod cues;
mod snapshot;
mod state;
mod swarm;

pub use cues::SoundCue;
pub use snapshot::{Drawable, Snapshot};
pub use state::GameState;
pub use swarm::{FORMATION_COLUMNS, FORMATION_ROWS, MARCH_STEPS, Swarm};

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::entities::{
    BONUS_SHIP_POINTS, BonusShip, Bullet, Bunker, DEFAULT_EXPLOSION_MS, Entity, Explodable,
    Player, Terrain, intersects,
};

const BUNKER_COUNT: usize = 4;
/// Bunkers sit this far above the player
const BUNKER_RISE: f64 = 60.0;
/// Half a bunker, to center each one on its fifth of the field
const BUNKER_OFFSET: f64 = 24.0;
const WAVE_CLEAR_BONUS: u32 = 200;
/// A bullet keeps flying after hitting a bunker only past this stage
const BUNKER_PIERCE_STAGE: u8 = 2;

/// Controls held or pressed during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub pause: bool,
    pub confirm: bool,
}

impl TickInput {
    /// -1.0, 0.0 or 1.0
    pub fn direction(&self) -> f64 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    pub player: Player,
    pub swarm: Swarm,
    pub bullets: Vec<Bullet>,
    pub bunkers: Vec<Bunker>,
    pub bonus_ship: Option<BonusShip>,
    pub terrain: Terrain,
    pub score: u32,
    state: GameState,
    config: GameConfig,
    /// Time since the last bonus ship went away (ms)
    bonus_timer: f64,
    game_over_played: bool,
    rng: Pcg32,
    cues: Vec<SoundCue>,
}

impl Game {
    /// A new game on the title screen. Identical seeds and inputs replay
    /// identically.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut game = Self {
            player: Player::new(&config),
            swarm: Swarm::new(&config),
            bullets: Vec::new(),
            bunkers: spawn_bunkers(&config),
            bonus_ship: None,
            terrain: Terrain::new(config.field_width.max(0.0) as usize, config.baseline()),
            score: 0,
            state: GameState::Title,
            config,
            bonus_timer: 0.0,
            game_over_played: false,
            rng: Pcg32::seed_from_u64(seed),
            cues: Vec::new(),
        };
        game.cues.push(SoundCue::TitleLoopStart);
        game
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Advances the game by `dt` milliseconds
    pub fn step(&mut self, input: &TickInput, dt: f64) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        match self.state {
            GameState::Title | GameState::GameOver => {
                if input.confirm {
                    self.start_round();
                }
            }
            GameState::Playing => {
                if input.pause {
                    self.toggle_pause();
                } else {
                    self.update(input, dt);
                }
            }
            GameState::Paused => {
                if input.pause {
                    self.toggle_pause();
                } else if input.confirm {
                    self.go_to_title();
                }
            }
        }
    }

    /// Resets every piece of round state and starts playing
    pub fn start_round(&mut self) {
        self.player = Player::new(&self.config);
        self.swarm = Swarm::new(&self.config);
        self.bullets.clear();
        self.bunkers = spawn_bunkers(&self.config);
        self.bonus_ship = None;
        self.terrain.restore();
        self.score = 0;
        self.bonus_timer = 0.0;
        self.game_over_played = false;
        self.state = GameState::Playing;

        self.cues.push(SoundCue::TitleLoopStop);
        self.cues.push(SoundCue::WaveCreated);
        info!("round started");
    }

    pub fn go_to_title(&mut self) {
        self.state = GameState::Title;
        self.cues.push(SoundCue::BonusLoopStop);
        self.cues.push(SoundCue::TitleLoopStart);
        info!("back to title, score {}", self.score);
    }

    /// PLAYING <-> PAUSED. Does nothing in other states.
    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => {
                self.state = GameState::Paused;
                self.cues.push(SoundCue::Silence);
                info!("paused");
            }
            GameState::Paused => {
                self.state = GameState::Playing;
                if self.bonus_ship.as_ref().is_some_and(|ship| ship.is_alive()) {
                    self.cues.push(SoundCue::BonusLoopStart);
                }
                info!("resumed");
            }
            GameState::Title | GameState::GameOver => {}
        }
    }

    /// The terminal lost focus: pause a running round
    pub fn focus_lost(&mut self) {
        if self.state == GameState::Playing {
            self.toggle_pause();
        }
    }

    /// Sound cues emitted since the last call, oldest first
    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: self.state,
            player: &self.player,
            invaders: &self.swarm.invaders,
            anim_frame: self.swarm.anim_frame,
            bullets: &self.bullets,
            bunkers: &self.bunkers,
            bonus_ship: self.bonus_ship.as_ref(),
            terrain: &self.terrain,
            score: self.score,
            lives: self.player.lives,
            wave: self.swarm.wave,
            field_width: self.config.field_width,
            field_height: self.config.field_height,
        }
    }

    fn update(&mut self, input: &TickInput, dt: f64) {
        if let Some(bullet) = self.player.tick(input.direction(), input.fire, dt) {
            self.bullets.push(bullet);
            self.cues.push(SoundCue::Shoot);
        }

        self.update_bonus_ship(dt);
        self.update_swarm(dt);

        for bullet in &mut self.bullets {
            bullet.tick(dt, self.config.ceiling, &mut self.terrain);
        }
        self.check_collisions();
        self.bullets.retain(|bullet| bullet.is_active());

        if self.swarm.is_cleared() {
            self.swarm.next_wave();
            self.score += WAVE_CLEAR_BONUS;
            self.cues.push(SoundCue::WaveCreated);
            info!(
                "wave {} incoming at speed {}",
                self.swarm.wave, self.swarm.base_speed
            );
        }

        if self.state == GameState::GameOver && !self.game_over_played {
            self.game_over_played = true;
            self.cues.push(SoundCue::BonusLoopStop);
            self.cues.push(SoundCue::GameOver);
            info!("game over, score {} on wave {}", self.score, self.swarm.wave);
        }
    }

    fn update_bonus_ship(&mut self, dt: f64) {
        if let Some(ship) = &mut self.bonus_ship {
            ship.tick(dt);
            if !ship.is_active() {
                if ship.expired() {
                    self.cues.push(SoundCue::BonusLoopStop);
                }
                self.bonus_ship = None;
                self.bonus_timer = 0.0;
            }
            return;
        }

        self.bonus_timer += dt;
        if self.bonus_timer > self.config.bonus_spawn_interval_ms
            && self.rng.random::<f64>() < self.config.bonus_spawn_chance
        {
            let direction = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
            self.bonus_ship = Some(BonusShip::new(
                direction,
                self.config.field_width,
                self.config.bonus_lifespan_ms,
            ));
            self.bonus_timer = 0.0;
            self.cues.push(SoundCue::BonusLoopStart);
            debug!("bonus ship spawned heading {direction}");
        }
    }

    fn update_swarm(&mut self, dt: f64) {
        if let Some(step) = self.swarm.animate(dt) {
            self.cues.push(SoundCue::March(step));
        }
        if self.swarm.advance(dt) {
            debug!("swarm stepped down, heading {}", self.swarm.direction);
        }

        // Checked against the post-step positions, so a descent that crosses
        // the line ends the round on the same tick
        if self
            .swarm
            .has_breached(&self.player, self.config.breach_line())
        {
            self.end_round();
        }

        // Invaders flatten any bunker they walk into
        for bunker in self.bunkers.iter_mut().filter(|bunker| bunker.is_active()) {
            if self.swarm.alive().any(|invader| intersects(invader, &*bunker)) {
                bunker.deactivate();
            }
        }

        if let Some(bullet) = self.swarm.try_fire(dt, &mut self.rng) {
            self.bullets.push(bullet);
        }
    }

    fn end_round(&mut self) {
        if self.state == GameState::Playing {
            self.state = GameState::GameOver;
        }
    }

    /// Every bullet has moved; now settle what each one hit
    fn check_collisions(&mut self) {
        for index in 0..self.bullets.len() {
            self.bullet_vs_player(index);
            self.bullet_vs_bonus_ship(index);
            self.bullet_vs_invaders(index);
            self.bullet_vs_bunkers(index);
            self.bullet_vs_bullets(index);
        }
    }

    fn bullet_vs_player(&mut self, index: usize) {
        let bullet = &mut self.bullets[index];
        if !bullet.is_alive()
            || !bullet.is_downward()
            || self.player.dead
            || !intersects(&*bullet, &self.player)
        {
            return;
        }

        bullet.deactivate();
        self.player.kill();
        self.cues.push(SoundCue::PlayerKilled);
        info!("player hit, {} lives left", self.player.lives);
        if self.player.is_out_of_lives() {
            self.end_round();
        }
    }

    fn bullet_vs_bonus_ship(&mut self, index: usize) {
        let bullet = &mut self.bullets[index];
        if !bullet.is_alive() || !bullet.is_upward() {
            return;
        }
        let Some(ship) = self.bonus_ship.as_mut() else {
            return;
        };
        if !ship.is_alive() || !intersects(&*bullet, &*ship) {
            return;
        }

        ship.explode(DEFAULT_EXPLOSION_MS);
        bullet.deactivate();
        self.score += BONUS_SHIP_POINTS;
        self.cues.push(SoundCue::BonusLoopStop);
        debug!("bonus ship shot down");
    }

    fn bullet_vs_invaders(&mut self, index: usize) {
        let bullet = &mut self.bullets[index];
        if !bullet.is_alive() || !bullet.is_upward() {
            return;
        }
        let Some(invader) = self
            .swarm
            .invaders
            .iter_mut()
            .find(|invader| invader.is_alive() && intersects(&**invader, &*bullet))
        else {
            return;
        };

        invader.explode(DEFAULT_EXPLOSION_MS);
        self.score += invader.points();
        bullet.deactivate();
        self.swarm.register_kill();
        self.cues.push(SoundCue::InvaderKilled);
    }

    fn bullet_vs_bunkers(&mut self, index: usize) {
        let bullet = &mut self.bullets[index];
        if !bullet.is_alive() || bullet.bunker_hit {
            return;
        }
        let Some(bunker) = self
            .bunkers
            .iter_mut()
            .find(|bunker| intersects(&**bunker, &*bullet))
        else {
            return;
        };

        bunker.hit(&mut self.rng, self.config.bunker_destroy_chance);
        bullet.bunker_hit = true;
        if bunker.stage() <= BUNKER_PIERCE_STAGE {
            bullet.deactivate();
        }
    }

    /// Player and invader bullets meeting in flight cancel out
    fn bullet_vs_bullets(&mut self, index: usize) {
        let (before, rest) = self.bullets.split_at_mut(index);
        let Some((bullet, after)) = rest.split_first_mut() else {
            return;
        };
        if !bullet.is_alive() {
            return;
        }

        let other = before.iter_mut().chain(after.iter_mut()).find(|other| {
            other.is_alive() && bullet.opposes(&**other) && intersects(&**other, &*bullet)
        });
        if let Some(other) = other {
            other.deactivate();
            bullet.deactivate();
        }
    }
}

/// Four bunkers spread evenly across the field above the player
fn spawn_bunkers(config: &GameConfig) -> Vec<Bunker> {
    let spacing = config.field_width / (BUNKER_COUNT + 1) as f64;
    let y = Player::new(config).y() - BUNKER_RISE;
    (1..=BUNKER_COUNT)
        .map(|i| Bunker::new(spacing * i as f64 - BUNKER_OFFSET, y))
        .collect()
}
