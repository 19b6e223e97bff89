#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Top-level game controller.
//!
//! [`Game`] owns the entity factory, the event bus, the four gameplay systems,
//! and the live bullet list, and wires them together: every frame runs the
//! player, enemy, powerup, and bullet phases in that fixed order, and every
//! event a phase emits is reacted to and then published on the bus before the
//! next phase runs. The hosting presentation layer subscribes on [`Game::bus`]
//! and feeds the controller through [`Game::handle_input`] and
//! [`Game::update`].

use std::time::Duration;

use invaders_core::{
    EntityId, EntityKind, Event, EventBus, GameState, InputIntent, PowerupKind, Vec2,
};
use invaders_system_enemy_swarm::EnemySwarm;
use invaders_system_player_control::PlayerControl;
use invaders_system_powerups::{ActivePowerup, PowerupEffect, PowerupTimers};
use invaders_system_wall_defence::WallDefence;
use invaders_world::{Bullet, Enemy, EntityFactory, PlayerShip, WallBlock};

const SPEED_BOOST_FACTOR: f32 = 2.0;
const SPEED_BOOST_DURATION: Duration = Duration::from_secs(10);
const SLOWDOWN_FACTOR: f32 = 0.33;
const SLOWDOWN_DURATION: Duration = Duration::from_secs(5);
const RAPID_FIRE_FACTOR: f32 = 4.0;
const RAPID_FIRE_DURATION: Duration = Duration::from_secs(3);

/// The assembled game: systems, bullets, clock, and the outward event bus.
#[derive(Debug)]
pub struct Game {
    factory: EntityFactory,
    bus: EventBus,
    player: PlayerControl,
    enemies: EnemySwarm,
    walls: WallDefence,
    powerups: PowerupTimers,
    bullets: Vec<Bullet>,
    clock: Duration,
    /// Enemies descending past this line lose the game for the player.
    lowest_enemy_position: f32,
}

impl Game {
    /// Builds the full roster for one level.
    ///
    /// The seed drives every stochastic decision (enemy fire selection and
    /// powerup drops), so a given difficulty/seed pair replays identically.
    #[must_use]
    pub fn new(difficulty: u32, rng_seed: u64) -> Self {
        let mut factory = EntityFactory::new();
        let player = factory.create_player(difficulty);
        let enemies = factory.create_enemies(difficulty);
        let walls = factory.create_walls(difficulty);

        let lowest_enemy_position = if walls.is_empty() {
            player.bounds().top()
        } else {
            walls
                .iter()
                .map(|wall| wall.bounds().bottom())
                .fold(0.0_f32, f32::max)
        };

        Self {
            factory,
            bus: EventBus::new(),
            player: PlayerControl::new(player),
            enemies: EnemySwarm::new(enemies, rng_seed),
            walls: WallDefence::new(walls),
            powerups: PowerupTimers::new(),
            bullets: Vec::new(),
            clock: Duration::ZERO,
            lowest_enemy_position,
        }
    }

    /// Announces the initial roster on the bus.
    ///
    /// Call after the presentation layer has subscribed: one `EntityAdded`
    /// per live entity, the initial `LivesChanged`, then
    /// `GameStateChanged(Playing)`.
    pub fn start(&self) {
        if let Some(player) = self.player.player() {
            self.bus.publish(&Event::EntityAdded {
                entity: player.id(),
                kind: EntityKind::Player,
                sprite: player.sprite(),
                bounds: player.bounds(),
            });
        }
        for enemy in self.enemies.enemies() {
            self.bus.publish(&Event::EntityAdded {
                entity: enemy.id(),
                kind: EntityKind::Enemy,
                sprite: enemy.sprite(),
                bounds: enemy.bounds(),
            });
        }
        for wall in self.walls.walls() {
            self.bus.publish(&Event::EntityAdded {
                entity: wall.id(),
                kind: EntityKind::Wall,
                sprite: wall.sprite(),
                bounds: wall.bounds(),
            });
        }
        if let Some(player) = self.player.player() {
            self.bus.publish(&Event::LivesChanged {
                entity: player.id(),
                lives: player.lives(),
            });
        }
        self.bus.publish(&Event::GameStateChanged {
            state: GameState::Playing,
        });
    }

    /// Subscription surface for the hosting presentation layer.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Forwards an input intent to the player controller.
    pub fn handle_input(&mut self, intent: InputIntent) {
        let mut events = Vec::new();
        self.player.handle_input(intent, self.clock, &mut events);
        for event in events {
            self.dispatch(event);
        }
    }

    /// Advances the game by one frame.
    ///
    /// A no-op once the player is gone (post game-over). Otherwise runs the
    /// player, enemy, powerup, and bullet phases in that order, dispatching
    /// each phase's events before the next phase starts.
    pub fn update(&mut self, dt: Duration) {
        if self.player.player().is_none() {
            return;
        }
        self.clock += dt;

        let mut events = Vec::new();
        self.player.update(dt, self.clock, &mut events);
        for event in events.drain(..) {
            self.dispatch(event);
        }

        self.enemies.update(dt, self.clock, &mut events);
        for event in events.drain(..) {
            self.dispatch(event);
        }

        self.expire_powerups(dt);
        self.sweep_bullets(dt);
    }

    /// Reacts to an event, then publishes it on the bus.
    fn dispatch(&mut self, event: Event) {
        self.bus.publish(&event);
        match event {
            Event::GunFired { entity } => self.spawn_bullet(entity),
            Event::PowerupActivated { kind, .. } => self.activate_powerup(kind),
            Event::LivesChanged { entity, lives } => self.respawn_player(entity, lives),
            Event::PositionChanged { entity, position } => {
                self.check_enemy_floor(entity, position);
            }
            Event::GameOver => self.tear_down(),
            _ => {}
        }
    }

    /// Instantiates a bullet from the firer's gun template, centered on the
    /// firer. Unknown firers (destroyed between emit and dispatch) are
    /// ignored.
    fn spawn_bullet(&mut self, firer: EntityId) {
        let template = if self.player.player().map(PlayerShip::id) == Some(firer) {
            self.player
                .player()
                .map(|player| (player.gun().clone(), player.bounds()))
        } else {
            self.enemies
                .enemies()
                .iter()
                .find(|enemy| enemy.id() == firer)
                .map(|enemy| (enemy.gun().clone(), enemy.bounds()))
        };
        let Some((gun, bounds)) = template else {
            return;
        };

        let bullet = self.factory.create_bullet(&gun, bounds);
        self.dispatch(Event::EntityAdded {
            entity: bullet.id(),
            kind: EntityKind::Bullet,
            sprite: bullet.sprite(),
            bounds: bullet.bounds(),
        });
        self.bullets.push(bullet);
    }

    fn activate_powerup(&mut self, kind: PowerupKind) {
        match kind {
            PowerupKind::SpeedBoost => {
                if let Some(player) = self.player.player_mut() {
                    player.set_speed(player.speed() * SPEED_BOOST_FACTOR);
                    self.powerups.add(ActivePowerup::new(
                        player.id(),
                        kind,
                        PowerupEffect::SpeedChange {
                            factor: SPEED_BOOST_FACTOR,
                        },
                        SPEED_BOOST_DURATION,
                    ));
                }
            }
            PowerupKind::Slowdown => {
                for enemy in self.enemies.enemies_mut() {
                    enemy.set_speed(enemy.speed() * SLOWDOWN_FACTOR);
                    self.powerups.add(ActivePowerup::new(
                        enemy.id(),
                        kind,
                        PowerupEffect::SpeedChange {
                            factor: SLOWDOWN_FACTOR,
                        },
                        SLOWDOWN_DURATION,
                    ));
                }
            }
            PowerupKind::RapidFire => {
                if let Some(player) = self.player.player_mut() {
                    let gun = player.gun_mut();
                    gun.set_cooldown(gun.cooldown().div_f32(RAPID_FIRE_FACTOR));
                    self.powerups.add(ActivePowerup::new(
                        player.id(),
                        kind,
                        PowerupEffect::FireRate {
                            factor: RAPID_FIRE_FACTOR,
                        },
                        RAPID_FIRE_DURATION,
                    ));
                }
            }
        }
        self.dispatch(Event::MessageSet {
            text: kind.label().to_owned(),
        });
    }

    fn expire_powerups(&mut self, dt: Duration) {
        let mut expired = Vec::new();
        self.powerups.update(dt, &mut expired);
        if expired.is_empty() {
            return;
        }

        let mut kinds: Vec<PowerupKind> = Vec::new();
        for powerup in &expired {
            self.revert_powerup(powerup);
            if !kinds.contains(&powerup.kind()) {
                kinds.push(powerup.kind());
            }
        }
        for kind in kinds {
            self.dispatch(Event::PowerupDeactivated { kind });
            self.dispatch(Event::MessageCleared);
        }
    }

    /// Divides the activation factor back out, iff the target is still alive.
    fn revert_powerup(&mut self, powerup: &ActivePowerup) {
        match powerup.effect() {
            PowerupEffect::SpeedChange { factor } => {
                if self.player.player().map(PlayerShip::id) == Some(powerup.target()) {
                    if let Some(player) = self.player.player_mut() {
                        player.set_speed(player.speed() / factor);
                    }
                } else if let Some(enemy) = self
                    .enemies
                    .enemies_mut()
                    .iter_mut()
                    .find(|enemy| enemy.id() == powerup.target())
                {
                    enemy.set_speed(enemy.speed() / factor);
                }
            }
            PowerupEffect::FireRate { factor } => {
                if let Some(player) = self.player.player_mut() {
                    if player.id() == powerup.target() {
                        let gun = player.gun_mut();
                        gun.set_cooldown(gun.cooldown().mul_f32(factor));
                    }
                }
            }
        }
    }

    /// Moves the player back to the spawn position and wipes every live
    /// bullet; at zero lives, the game is over.
    fn respawn_player(&mut self, entity: EntityId, lives: u32) {
        let mut respawned = None;
        if let Some(player) = self.player.player_mut() {
            player.set_position(EntityFactory::player_start_bounds().position());
            respawned = Some(player.bounds().position());
        }
        if let Some(position) = respawned {
            self.dispatch(Event::PositionChanged { entity, position });
        }
        self.clear_bullets();
        if lives == 0 {
            self.dispatch(Event::GameOver);
        }
    }

    fn check_enemy_floor(&mut self, entity: EntityId, position: Vec2) {
        let crossed = self
            .enemies
            .enemies()
            .iter()
            .find(|enemy| enemy.id() == entity)
            .map(|enemy| position.y() + enemy.bounds().height() > self.lowest_enemy_position)
            .unwrap_or(false);
        if crossed {
            self.dispatch(Event::GameOver);
        }
    }

    fn tear_down(&mut self) {
        self.clear_bullets();
        self.walls.clear();
        self.enemies.clear();
        self.powerups.clear();
        let _ = self.player.take_player();
        self.bus.publish(&Event::GameStateChanged {
            state: GameState::GameOver,
        });
    }

    fn clear_bullets(&mut self) {
        while let Some(bullet) = self.bullets.pop() {
            self.dispatch(Event::Destroyed {
                entity: bullet.id(),
            });
        }
    }

    /// Advances every bullet and resolves its collisions.
    ///
    /// Upward bullets check walls, then enemies; emptying the roster publishes
    /// `LevelComplete` and aborts the remaining sweep for this frame without
    /// destroying the bullet. Downward bullets check the player, then walls; a
    /// nested `LivesChanged` reaction wipes the bullet list, which ends the
    /// sweep. Zero-speed bullets collide with nothing and linger until
    /// cleared. Off-screen bullets are destroyed.
    fn sweep_bullets(&mut self, dt: Duration) {
        let dt_secs = dt.as_secs_f32();
        let mut index = 0;
        while index < self.bullets.len() {
            let dy = self.bullets[index].speed() * dt_secs;
            self.bullets[index].advance(dy);
            let id = self.bullets[index].id();
            let bounds = self.bullets[index].bounds();
            let speed = self.bullets[index].speed();
            self.dispatch(Event::PositionChanged {
                entity: id,
                position: bounds.position(),
            });

            let mut events = Vec::new();
            if speed < 0.0 {
                let hit_wall = self.walls.check_collision(bounds, &mut events);
                let hit_enemy = !hit_wall && self.enemies.check_collision(bounds, &mut events);
                if hit_wall || hit_enemy {
                    for event in events {
                        self.dispatch(event);
                    }
                    if hit_enemy && self.enemies.is_empty() {
                        self.dispatch(Event::LevelComplete);
                        return;
                    }
                    self.dispatch(Event::Destroyed { entity: id });
                    let _ = self.bullets.remove(index);
                    continue;
                }
            } else if speed > 0.0 {
                let hit_player = self.player.check_collision(bounds, &mut events);
                let hit_wall = !hit_player && self.walls.check_collision(bounds, &mut events);
                if hit_player || hit_wall {
                    for event in events {
                        self.dispatch(event);
                    }
                    if self.bullets.is_empty() {
                        // A LivesChanged reaction already wiped the list,
                        // current bullet included.
                        break;
                    }
                    self.dispatch(Event::Destroyed { entity: id });
                    let _ = self.bullets.remove(index);
                    continue;
                }
            }

            if self.bullets[index].is_off_screen() {
                self.dispatch(Event::Destroyed { entity: id });
                let _ = self.bullets.remove(index);
                continue;
            }
            index += 1;
        }
    }

    /// Time advanced so far, as the sum of all frame deltas.
    #[must_use]
    pub const fn clock(&self) -> Duration {
        self.clock
    }

    /// The player ship, while one exists.
    #[must_use]
    pub fn player(&self) -> Option<&PlayerShip> {
        self.player.player()
    }

    /// The live enemy roster.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        self.enemies.enemies()
    }

    /// The surviving wall bricks.
    #[must_use]
    pub fn walls(&self) -> &[WallBlock] {
        self.walls.walls()
    }

    /// The bullets currently in flight.
    #[must_use]
    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    /// The timed powerup effects currently live.
    #[must_use]
    pub fn active_powerups(&self) -> &[ActivePowerup] {
        self.powerups.active()
    }

    /// Direct access to the player controller, for the hosting layer's debug
    /// tooling and scripted scenarios.
    pub fn player_control_mut(&mut self) -> &mut PlayerControl {
        &mut self.player
    }

    /// Direct access to the enemy swarm, for the hosting layer's debug
    /// tooling and scripted scenarios.
    pub fn enemy_swarm_mut(&mut self) -> &mut EnemySwarm {
        &mut self.enemies
    }

    /// Direct access to the wall controller, for the hosting layer's debug
    /// tooling and scripted scenarios.
    pub fn wall_defence_mut(&mut self) -> &mut WallDefence {
        &mut self.walls
    }
}
