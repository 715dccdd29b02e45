use super::state::GameState;
use crate::entities::{BonusShip, Bullet, Bunker, Entity, Invader, Player, Terrain};

/// Read-only view of a round, everything the renderer needs
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub state: GameState,
    pub player: &'a Player,
    pub invaders: &'a [Invader],
    /// Swarm-wide animation frame (0 or 1)
    pub anim_frame: u8,
    pub bullets: &'a [Bullet],
    pub bunkers: &'a [Bunker],
    pub bonus_ship: Option<&'a BonusShip>,
    pub terrain: &'a Terrain,
    pub score: u32,
    pub lives: u32,
    pub wave: u32,
    pub field_width: f64,
    pub field_height: f64,
}

/// Everything that gets drawn on the play field besides the terrain
#[derive(Debug, Clone, Copy)]
pub enum Drawable<'a> {
    Player(&'a Player),
    Invader { invader: &'a Invader, frame: u8 },
    Bullet(&'a Bullet),
    BonusShip(&'a BonusShip),
    Bunker(&'a Bunker),
}

impl<'a> Snapshot<'a> {
    pub fn baseline(&self) -> f64 {
        self.terrain.baseline()
    }

    /// Active entities in paint order: bunkers first, bullets last
    pub fn drawables(self) -> impl Iterator<Item = Drawable<'a>> {
        let frame = self.anim_frame;
        let bunkers = self
            .bunkers
            .iter()
            .filter(|bunker| bunker.is_active())
            .map(Drawable::Bunker);
        let player = std::iter::once(Drawable::Player(self.player));
        let bonus_ship = self
            .bonus_ship
            .filter(|ship| ship.is_active())
            .map(Drawable::BonusShip);
        let invaders = self
            .invaders
            .iter()
            .filter(|invader| invader.is_active())
            .map(move |invader| Drawable::Invader { invader, frame });
        let bullets = self
            .bullets
            .iter()
            .filter(|bullet| bullet.is_active())
            .map(Drawable::Bullet);

        bunkers
            .chain(player)
            .chain(bonus_ship)
            .chain(invaders)
            .chain(bullets)
    }
}
