use super::entity::{Body, Entity};
use super::explosion::{Explodable, Explosion};

pub const INVADER_HEIGHT: f64 = 16.0;

/// Invader categories by formation row, best paying first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvaderKind {
    Squid,
    Crab,
    Octopus,
}

impl InvaderKind {
    /// Kind for a formation row: row 0 squids, rows 1-2 crabs, the rest octopi
    pub fn for_row(row: usize) -> Self {
        match row {
            0 => InvaderKind::Squid,
            1 | 2 => InvaderKind::Crab,
            _ => InvaderKind::Octopus,
        }
    }

    /// Arcade type number (1, 2 or 3)
    pub fn category(&self) -> u8 {
        match self {
            InvaderKind::Squid => 1,
            InvaderKind::Crab => 2,
            InvaderKind::Octopus => 3,
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            InvaderKind::Squid => 50,
            InvaderKind::Crab => 25,
            InvaderKind::Octopus => 10,
        }
    }

    pub fn width(&self) -> f64 {
        match self {
            InvaderKind::Squid => 16.0,
            InvaderKind::Crab => 22.0,
            InvaderKind::Octopus => 24.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invader {
    body: Body,
    explosion: Explosion,
    pub kind: InvaderKind,
}

impl Invader {
    pub fn new(x: f64, y: f64, kind: InvaderKind) -> Self {
        Self {
            body: Body::new(x, y, kind.width(), INVADER_HEIGHT),
            explosion: Explosion::default(),
            kind,
        }
    }

    pub fn points(&self) -> u32 {
        self.kind.points()
    }

    /// Invaders don't move on their own; the swarm moves them
    pub fn shift(&mut self, dx: f64, dy: f64) {
        self.body.x += dx;
        self.body.y += dy;
    }

    pub fn tick(&mut self, dt: f64) {
        self.tick_explosion(dt);
    }

    /// Sprite for the swarm-wide animation frame (0 or 1)
    pub fn sprite(&self, frame: u8) -> &'static str {
        match (self.kind, frame) {
            (InvaderKind::Squid, 0) => "{@}",
            (InvaderKind::Squid, _) => "}@{",
            (InvaderKind::Crab, 0) => "/O\\",
            (InvaderKind::Crab, _) => "\\O/",
            (InvaderKind::Octopus, 0) => "<##>",
            (InvaderKind::Octopus, _) => ">##<",
        }
    }
}

impl Entity for Invader {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Explodable for Invader {
    fn explosion(&self) -> &Explosion {
        &self.explosion
    }

    fn explosion_mut(&mut self) -> &mut Explosion {
        &mut self.explosion
    }
}
