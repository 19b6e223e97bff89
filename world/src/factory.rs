//! Difficulty-parameterized roster builder.
//!
//! The factory owns the level's [`EntityId`] allocator, so every entity it
//! hands out carries a handle that is unique for the lifetime of the level.
//! All numeric formulas below are the default calibration for the game feel;
//! they scale linearly with the difficulty scalar and are not derived from a
//! physical model.

use std::time::Duration;

use invaders_core::{EntityId, GunKind, Rect, Sprite, Vec2, SCREEN_HEIGHT, SCREEN_WIDTH};

use crate::{Bullet, Enemy, Gun, PlayerShip, WallBlock};

const ENEMY_ROWS: u32 = 4;
const ENEMY_COLUMNS: u32 = 10;
const WALL_BLOCKS: u32 = 3;
const WALL_COLUMNS: u32 = 4;
const PLAYER_LIVES: u32 = 3;

/// Builds the full roster for a level: player, enemy grid, and wall blocks.
#[derive(Debug, Default)]
pub struct EntityFactory {
    next_id: u32,
}

impl EntityFactory {
    /// Creates a factory whose first handle is zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Creates the player ship. Speed decreases slightly with difficulty.
    #[must_use]
    pub fn create_player(&mut self, difficulty: u32) -> PlayerShip {
        PlayerShip::new(
            self.allocate_id(),
            Sprite::Player,
            Self::player_start_bounds(),
            260.0 - (5.0 * difficulty as f32),
            Self::create_gun(difficulty, GunKind::Player),
            PLAYER_LIVES,
        )
    }

    /// Spawn footprint of the player ship, also used when respawning.
    #[must_use]
    pub fn player_start_bounds() -> Rect {
        let width = 2.0 / 20.0 * SCREEN_WIDTH;
        let height = 5.0 / 80.0 * SCREEN_HEIGHT;
        Rect::new(
            (SCREEN_WIDTH - width) / 2.0,
            SCREEN_HEIGHT - (height * 1.5),
            width,
            height,
        )
    }

    /// Creates the deterministic 4x10 enemy grid.
    ///
    /// Row 0 holds the strongest tier (highest kill points), rows 2 and 3 the
    /// weakest. All rows share one horizontal speed computed from difficulty.
    #[must_use]
    pub fn create_enemies(&mut self, difficulty: u32) -> Vec<Enemy> {
        let size = 1.0 / 16.0 * SCREEN_WIDTH;
        let spacing = 1.0 / 14.0 * SCREEN_WIDTH;
        let top_margin = 1.0 / 24.0 * SCREEN_WIDTH;
        let speed = 20.0 + (4.0 * difficulty as f32);

        let mut enemies = Vec::with_capacity((ENEMY_ROWS * ENEMY_COLUMNS) as usize);
        for row in 0..ENEMY_ROWS {
            let (sprite, gun_kind, points_per_difficulty) = enemy_tier(row);
            for column in 0..ENEMY_COLUMNS {
                let bounds = Rect::new(
                    spacing * column as f32,
                    spacing * row as f32 + top_margin,
                    size,
                    size,
                );
                enemies.push(Enemy::new(
                    self.allocate_id(),
                    sprite,
                    bounds,
                    speed,
                    Self::create_gun(difficulty, gun_kind),
                    points_per_difficulty * difficulty,
                ));
            }
        }
        enemies
    }

    /// Creates the fixed three-block defensive wall layout.
    ///
    /// The layout is independent of difficulty; the parameter mirrors the
    /// factory contract shared by the other roster builders.
    #[must_use]
    pub fn create_walls(&mut self, _difficulty: u32) -> Vec<WallBlock> {
        let brick_width = 1.0 / 7.0 * SCREEN_WIDTH / 4.0;
        let brick_height = 1.0 / 18.0 * SCREEN_HEIGHT / 3.0;

        let mut walls = Vec::new();
        for block in 0..WALL_BLOCKS {
            let block_left = (1.0 / 7.0 * SCREEN_WIDTH) + (2.0 / 7.0 * SCREEN_WIDTH) * block as f32;
            let block_top = 9.0 / 12.0 * SCREEN_HEIGHT;

            for column in 0..WALL_COLUMNS {
                // Outer columns reach down further, leaving an arch shape.
                let rows = if column == 0 || column == WALL_COLUMNS - 1 {
                    5
                } else {
                    3
                };
                for row in 0..rows {
                    let bounds = Rect::new(
                        block_left + brick_width * column as f32,
                        block_top + brick_height * row as f32,
                        brick_width,
                        brick_height,
                    );
                    walls.push(WallBlock::new(self.allocate_id(), Sprite::Wall, bounds));
                }
            }
        }
        walls
    }

    /// Creates the gun parameters for the requested archetype.
    ///
    /// The player gun has a real cooldown; enemy guns have zero cooldown and
    /// instead carry a per-second fire-chance growth rate driven by the
    /// swarm's stochastic fire selection.
    #[must_use]
    pub fn create_gun(difficulty: u32, kind: GunKind) -> Gun {
        let bullet_size = Vec2::new(1.0 / 120.0 * SCREEN_WIDTH, 1.0 / 40.0 * SCREEN_HEIGHT);
        match kind {
            GunKind::Player => Gun::new(
                Sprite::Bullet,
                bullet_size,
                -350.0 + (10.0 * difficulty as f32),
                Duration::from_millis(600 + u64::from(difficulty) * 20),
                0.0,
            ),
            GunKind::Enemy1 | GunKind::Enemy2 | GunKind::Enemy3 => Gun::new(
                Sprite::Bullet,
                bullet_size,
                250.0 + (15.0 * difficulty as f32),
                Duration::ZERO,
                80.0 * difficulty as f32,
            ),
        }
    }

    /// Creates a bullet from a gun's template, centered on the firer.
    #[must_use]
    pub fn create_bullet(&mut self, gun: &Gun, firer_bounds: Rect) -> Bullet {
        let size = gun.bullet_size();
        let bounds = Rect::new(
            firer_bounds.left() + (firer_bounds.width() - size.x()) / 2.0,
            firer_bounds.top() + (firer_bounds.height() - size.y()) / 2.0,
            size.x(),
            size.y(),
        );
        Bullet::new(self.allocate_id(), gun.bullet_sprite(), bounds, gun.bullet_speed())
    }
}

/// Sprite, gun archetype, and kill-point rate for one enemy grid row.
const fn enemy_tier(row: u32) -> (Sprite, GunKind, u32) {
    match row {
        0 => (Sprite::Enemy3, GunKind::Enemy3, 20),
        1 => (Sprite::Enemy2, GunKind::Enemy2, 10),
        _ => (Sprite::Enemy1, GunKind::Enemy1, 5),
    }
}
