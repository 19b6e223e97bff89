#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy swarm controller.
//!
//! The swarm sweeps horizontally until any member would cross a screen edge,
//! then drops vertically by a fixed distance and reverses direction. Once per
//! frame one fire-capable enemy (the frontmost of its lane) may fire,
//! selected through a seeded random source so runs replay deterministically.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::time::Duration;

use invaders_core::{
    Event, PowerupKind, Rect, Vec2, ENEMY_DROP_DISTANCE, POWERUP_CHANCE, SCREEN_WIDTH,
};
use invaders_world::Enemy;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Lower bound of the uniform draw the fire-chance counter races against.
const FIRE_DRAW_MIN: f32 = 0.1;

/// Upper bound (exclusive) of the uniform draw the counter races against.
const FIRE_DRAW_MAX: f32 = 100.0;

/// Movement phase of the swarm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SweepPhase {
    /// Sweeping along the x axis toward a screen edge.
    MovingHorizontal,
    /// Descending toward the drop threshold.
    MovingVertical,
}

/// Controller that owns the enemy roster and its sweep state machine.
#[derive(Debug)]
pub struct EnemySwarm {
    enemies: Vec<Enemy>,
    phase: SweepPhase,
    drop_distance: f32,
    fire_chance: f32,
    rng: ChaCha8Rng,
}

impl EnemySwarm {
    /// Creates a swarm around the provided roster.
    ///
    /// The seed drives fire selection and powerup rolls; reusing a seed
    /// replays the same stochastic decisions.
    #[must_use]
    pub fn new(enemies: Vec<Enemy>, rng_seed: u64) -> Self {
        Self {
            enemies,
            phase: SweepPhase::MovingHorizontal,
            drop_distance: 0.0,
            fire_chance: 0.0,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
        }
    }

    /// Advances the sweep state machine and runs fire selection.
    pub fn update(&mut self, dt: Duration, now: Duration, out: &mut Vec<Event>) {
        let dt_secs = dt.as_secs_f32();
        match self.phase {
            SweepPhase::MovingHorizontal => self.sweep_horizontal(dt_secs, out),
            SweepPhase::MovingVertical => self.sweep_vertical(dt_secs, out),
        }
        self.select_and_fire(dt_secs, now, out);
    }

    fn sweep_horizontal(&mut self, dt_secs: f32, out: &mut Vec<Event>) {
        let mut overshoot = 0.0;
        for enemy in &mut self.enemies {
            let dx = enemy.speed() * dt_secs;
            let bounds = enemy.bounds();
            if enemy.speed() > 0.0 {
                if bounds.right() + dx > SCREEN_WIDTH {
                    overshoot = bounds.right() + dx - SCREEN_WIDTH;
                }
            } else if bounds.left() + dx < 0.0 {
                overshoot = bounds.left() + dx;
            }
            enemy.set_position(Vec2::new(bounds.left() + dx, bounds.top()));
            out.push(Event::PositionChanged {
                entity: enemy.id(),
                position: enemy.bounds().position(),
            });
        }

        if overshoot != 0.0 {
            // Push the whole swarm back by the overshoot and start dropping.
            self.phase = SweepPhase::MovingVertical;
            self.drop_distance = 0.0;
            for enemy in &mut self.enemies {
                let bounds = enemy.bounds();
                enemy.set_position(Vec2::new(bounds.left() - overshoot, bounds.top()));
                out.push(Event::PositionChanged {
                    entity: enemy.id(),
                    position: enemy.bounds().position(),
                });
            }
        }
    }

    fn sweep_vertical(&mut self, dt_secs: f32, out: &mut Vec<Event>) {
        if let Some(first) = self.enemies.first() {
            self.drop_distance += first.speed().abs() * dt_secs;
        }

        let mut overshoot = 0.0;
        if self.drop_distance > ENEMY_DROP_DISTANCE {
            overshoot = self.drop_distance - ENEMY_DROP_DISTANCE;
        }

        for enemy in &mut self.enemies {
            let dy = enemy.speed().abs() * dt_secs;
            let bounds = enemy.bounds();
            enemy.set_position(Vec2::new(bounds.left(), bounds.top() + dy));
            out.push(Event::PositionChanged {
                entity: enemy.id(),
                position: enemy.bounds().position(),
            });
        }

        if overshoot != 0.0 {
            // Revert the excess drop and reverse every enemy simultaneously.
            self.phase = SweepPhase::MovingHorizontal;
            for enemy in &mut self.enemies {
                let bounds = enemy.bounds();
                enemy.set_position(Vec2::new(bounds.left(), bounds.top() - overshoot));
                enemy.set_speed(-enemy.speed());
                out.push(Event::PositionChanged {
                    entity: enemy.id(),
                    position: enemy.bounds().position(),
                });
            }
        }
    }

    /// Picks one fire-capable enemy and races the fire-chance counter
    /// against a uniform draw.
    ///
    /// Only the frontmost (largest y) enemy of each x lane may fire. The
    /// counter/draw formula is the reference calibration: fire rate grows
    /// with elapsed time and the gun's chance-increase rate. Treat the
    /// constants as a difficulty knob, not a probability model.
    fn select_and_fire(&mut self, dt_secs: f32, now: Duration, out: &mut Vec<Event>) {
        if self.enemies.is_empty() {
            return;
        }

        let mut lanes: BTreeMap<i32, usize> = BTreeMap::new();
        for (index, enemy) in self.enemies.iter().enumerate() {
            let lane = enemy.bounds().left() as i32;
            match lanes.entry(lane) {
                Entry::Vacant(slot) => {
                    let _ = slot.insert(index);
                }
                Entry::Occupied(mut slot) => {
                    if self.enemies[*slot.get()].bounds().top() < enemy.bounds().top() {
                        *slot.get_mut() = index;
                    }
                }
            }
        }

        let candidates: Vec<usize> = lanes.into_values().collect();
        let chosen = candidates[self.rng.gen_range(0..candidates.len())];
        let enemy = &mut self.enemies[chosen];

        self.fire_chance += enemy.gun().chance_increase() * dt_secs;
        let draw = self.rng.gen_range(FIRE_DRAW_MIN..FIRE_DRAW_MAX);
        if self.fire_chance * dt_secs > draw {
            self.fire_chance = 0.0;
            if enemy.gun_mut().try_fire(now) {
                out.push(Event::GunFired { entity: enemy.id() });
            }
        }
    }

    /// Resolves an upward bullet against the roster.
    ///
    /// Every overlapping enemy is destroyed and removed immediately; the scan
    /// keeps checking the remaining roster after a removal. Each destruction
    /// emits the kill score and then the destruction itself, and
    /// independently rolls a powerup drop.
    pub fn check_collision(&mut self, bullet_bounds: Rect, out: &mut Vec<Event>) -> bool {
        let mut hit = false;
        let mut index = 0;
        while index < self.enemies.len() {
            if !self.enemies[index].bounds().overlaps(&bullet_bounds) {
                index += 1;
                continue;
            }

            let enemy = self.enemies.remove(index);
            hit = true;
            out.push(Event::ScoreChanged {
                entity: Some(enemy.id()),
                amount: enemy.kill_points(),
            });
            out.push(Event::Destroyed { entity: enemy.id() });

            if self.rng.gen::<f64>() < POWERUP_CHANCE {
                let kind = PowerupKind::ALL[self.rng.gen_range(0..PowerupKind::ALL.len())];
                out.push(Event::PowerupActivated {
                    entity: Some(enemy.id()),
                    kind,
                });
            }
            // Do not advance: the removal shifted the next enemy into `index`.
        }
        hit
    }

    /// The live roster.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Mutable access to the live roster (powerup application).
    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    /// True once every enemy has been destroyed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Drops the whole roster (game-over teardown).
    pub fn clear(&mut self) {
        self.enemies.clear();
    }
}
