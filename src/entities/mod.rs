mod bonus_ship;
mod bullet;
mod bunker;
mod entity;
mod explosion;
mod invader;
mod player;
mod terrain;

// Re-export all public types
pub use bonus_ship::{
    BONUS_SHIP_HEIGHT, BONUS_SHIP_POINTS, BONUS_SHIP_SPEED, BONUS_SHIP_WIDTH, BONUS_SHIP_Y,
    BonusShip,
};
pub use bullet::{
    BULLET_HEIGHT, BULLET_WIDTH, Bullet, BulletColor, INVADER_BULLET_SPEED, PLAYER_BULLET_SPEED,
};
pub use bunker::{BUNKER_HEIGHT, BUNKER_WIDTH, Bunker, FINAL_STAGE};
pub use entity::{Body, Entity, intersects};
pub use explosion::{DEFAULT_EXPLOSION_MS, Explodable, Explosion, IMPACT_EXPLOSION_MS};
pub use invader::{INVADER_HEIGHT, Invader, InvaderKind};
pub use player::{PLAYER_HEIGHT, PLAYER_WIDTH, Player};
pub use terrain::Terrain;
