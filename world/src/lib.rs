#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Entity model for the Invaders engine.
//!
//! Entities are plain data: a stable [`EntityId`], a screen-space footprint,
//! an opaque [`Sprite`] tag for the presentation layer, and kind-specific
//! fields stored directly on each variant. All movement, firing, and
//! destruction decisions live in the systems crates; this crate only provides
//! the state those systems mutate, plus the [`EntityFactory`] that builds a
//! full roster for a difficulty level.

use std::time::Duration;

use invaders_core::{EntityId, Rect, Sprite, Vec2, SCREEN_HEIGHT};

mod factory;

pub use factory::EntityFactory;

/// Cooldown-gated bullet template attached to an attacking entity.
///
/// The bullet template (sprite, size, speed) is fixed at construction; the
/// cooldown is mutable so powerups can shorten and restore it.
#[derive(Clone, Debug, PartialEq)]
pub struct Gun {
    bullet_sprite: Sprite,
    bullet_size: Vec2,
    bullet_speed: f32,
    cooldown: Duration,
    chance_increase: f32,
    last_fired: Option<Duration>,
}

impl Gun {
    /// Creates a new gun that has not fired yet.
    #[must_use]
    pub const fn new(
        bullet_sprite: Sprite,
        bullet_size: Vec2,
        bullet_speed: f32,
        cooldown: Duration,
        chance_increase: f32,
    ) -> Self {
        Self {
            bullet_sprite,
            bullet_size,
            bullet_speed,
            cooldown,
            chance_increase,
            last_fired: None,
        }
    }

    /// Sprite of the bullets this gun fires.
    #[must_use]
    pub const fn bullet_sprite(&self) -> Sprite {
        self.bullet_sprite
    }

    /// Size of the bullets this gun fires.
    #[must_use]
    pub const fn bullet_size(&self) -> Vec2 {
        self.bullet_size
    }

    /// Signed speed of the bullets this gun fires. Negative travels upward.
    #[must_use]
    pub const fn bullet_speed(&self) -> f32 {
        self.bullet_speed
    }

    /// How fast the chance rises that an enemy holding this gun fires.
    #[must_use]
    pub const fn chance_increase(&self) -> f32 {
        self.chance_increase
    }

    /// Replaces the fire-chance growth rate.
    pub fn set_chance_increase(&mut self, chance_increase: f32) {
        self.chance_increase = chance_increase;
    }

    /// Time the gun needs between two successful shots.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Replaces the cooldown duration.
    pub fn set_cooldown(&mut self, cooldown: Duration) {
        self.cooldown = cooldown;
    }

    /// Attempts to fire at the provided game-clock instant.
    ///
    /// Returns true and records the shot iff the gun has never fired or the
    /// elapsed time since the last successful shot exceeds the cooldown.
    /// Otherwise returns false with no side effect.
    pub fn try_fire(&mut self, now: Duration) -> bool {
        if let Some(fired_at) = self.last_fired {
            if now.saturating_sub(fired_at) <= self.cooldown {
                return false;
            }
        }
        self.last_fired = Some(now);
        true
    }
}

/// The player-controlled ship.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerShip {
    id: EntityId,
    sprite: Sprite,
    bounds: Rect,
    speed: f32,
    gun: Gun,
    lives: u32,
}

impl PlayerShip {
    /// Creates a new player ship.
    #[must_use]
    pub const fn new(
        id: EntityId,
        sprite: Sprite,
        bounds: Rect,
        speed: f32,
        gun: Gun,
        lives: u32,
    ) -> Self {
        Self {
            id,
            sprite,
            bounds,
            speed,
            gun,
            lives,
        }
    }

    /// Stable handle of the ship.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Visual tag of the ship.
    #[must_use]
    pub const fn sprite(&self) -> Sprite {
        self.sprite
    }

    /// Screen-space footprint of the ship.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Relocates the ship to the provided corner.
    pub fn set_position(&mut self, position: Vec2) {
        self.bounds = self.bounds.at(position);
    }

    /// Horizontal movement speed in pixels per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Replaces the movement speed.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// The ship's gun.
    #[must_use]
    pub const fn gun(&self) -> &Gun {
        &self.gun
    }

    /// Mutable access to the ship's gun.
    pub fn gun_mut(&mut self) -> &mut Gun {
        &mut self.gun
    }

    /// Remaining lives.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Replaces the remaining lives.
    pub fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
    }
}

/// A member of the descending enemy swarm.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    id: EntityId,
    sprite: Sprite,
    bounds: Rect,
    speed: f32,
    gun: Gun,
    kill_points: u32,
}

impl Enemy {
    /// Creates a new enemy.
    #[must_use]
    pub const fn new(
        id: EntityId,
        sprite: Sprite,
        bounds: Rect,
        speed: f32,
        gun: Gun,
        kill_points: u32,
    ) -> Self {
        Self {
            id,
            sprite,
            bounds,
            speed,
            gun,
            kill_points,
        }
    }

    /// Stable handle of the enemy.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Visual tag of the enemy.
    #[must_use]
    pub const fn sprite(&self) -> Sprite {
        self.sprite
    }

    /// Screen-space footprint of the enemy.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Relocates the enemy to the provided corner.
    pub fn set_position(&mut self, position: Vec2) {
        self.bounds = self.bounds.at(position);
    }

    /// Signed horizontal speed; the sign encodes the sweep direction.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Replaces the movement speed.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// The enemy's gun.
    #[must_use]
    pub const fn gun(&self) -> &Gun {
        &self.gun
    }

    /// Mutable access to the enemy's gun.
    pub fn gun_mut(&mut self) -> &mut Gun {
        &mut self.gun
    }

    /// Points awarded when this enemy is destroyed.
    #[must_use]
    pub const fn kill_points(&self) -> u32 {
        self.kill_points
    }
}

/// A purely destructible defensive wall block.
#[derive(Clone, Debug, PartialEq)]
pub struct WallBlock {
    id: EntityId,
    sprite: Sprite,
    bounds: Rect,
}

impl WallBlock {
    /// Creates a new wall block.
    #[must_use]
    pub const fn new(id: EntityId, sprite: Sprite, bounds: Rect) -> Self {
        Self { id, sprite, bounds }
    }

    /// Stable handle of the block.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Visual tag of the block.
    #[must_use]
    pub const fn sprite(&self) -> Sprite {
        self.sprite
    }

    /// Screen-space footprint of the block.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// A projectile in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    id: EntityId,
    sprite: Sprite,
    bounds: Rect,
    speed: f32,
}

impl Bullet {
    /// Creates a new bullet.
    #[must_use]
    pub const fn new(id: EntityId, sprite: Sprite, bounds: Rect, speed: f32) -> Self {
        Self {
            id,
            sprite,
            bounds,
            speed,
        }
    }

    /// Stable handle of the bullet.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Visual tag of the bullet.
    #[must_use]
    pub const fn sprite(&self) -> Sprite {
        self.sprite
    }

    /// Screen-space footprint of the bullet.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Fixed signed vertical speed. Negative travels upward from the player;
    /// positive travels downward from an enemy.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Advances the bullet along its travel direction.
    pub fn advance(&mut self, dy: f32) {
        self.bounds = self.bounds.translated(0.0, dy);
    }

    /// True once the bullet has fully left the screen vertically.
    #[must_use]
    pub fn is_off_screen(&self) -> bool {
        self.bounds.top() > SCREEN_HEIGHT || self.bounds.bottom() < 0.0
    }
}
