#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player controller: translates held input intents into ship movement and
//! fire attempts, and resolves incoming bullet hits against the ship.

use std::time::Duration;

use invaders_core::{Event, InputIntent, Rect, Vec2, SCREEN_WIDTH};
use invaders_world::PlayerShip;

/// Controller that owns the player ship and its input state.
///
/// The ship slot empties on game-over teardown; every operation is a no-op
/// until a new ship is installed.
#[derive(Debug, Default)]
pub struct PlayerControl {
    player: Option<PlayerShip>,
    move_left_held: bool,
    move_right_held: bool,
    fire_held: bool,
}

impl PlayerControl {
    /// Creates a controller around the provided ship.
    #[must_use]
    pub fn new(player: PlayerShip) -> Self {
        Self {
            player: Some(player),
            move_left_held: false,
            move_right_held: false,
            fire_held: false,
        }
    }

    /// Records an input intent. A fire press also attempts an immediate shot
    /// so that tapping the key faster than the frame rate still registers.
    pub fn handle_input(&mut self, intent: InputIntent, now: Duration, out: &mut Vec<Event>) {
        match intent {
            InputIntent::MoveLeftPressed => self.move_left_held = true,
            InputIntent::MoveLeftReleased => self.move_left_held = false,
            InputIntent::MoveRightPressed => self.move_right_held = true,
            InputIntent::MoveRightReleased => self.move_right_held = false,
            InputIntent::FirePressed => {
                self.fire_held = true;
                self.fire_gun(now, out);
            }
            InputIntent::FireReleased => self.fire_held = false,
        }
    }

    /// Applies held movement, clamps the ship to the screen, and fires while
    /// the fire key is held.
    pub fn update(&mut self, dt: Duration, now: Duration, out: &mut Vec<Event>) {
        let dt_secs = dt.as_secs_f32();
        let mut moved = false;

        if let Some(player) = self.player.as_mut() {
            if self.move_left_held {
                let mut left = player.bounds().left() - player.speed() * dt_secs;
                if left < 0.0 {
                    left = 0.0;
                }
                player.set_position(Vec2::new(left, player.bounds().top()));
                moved = true;
            }

            if self.move_right_held {
                let mut left = player.bounds().left() + player.speed() * dt_secs;
                if left + player.bounds().width() > SCREEN_WIDTH {
                    left = SCREEN_WIDTH - player.bounds().width();
                }
                player.set_position(Vec2::new(left, player.bounds().top()));
                moved = true;
            }
        }

        if moved {
            if let Some(player) = self.player.as_ref() {
                out.push(Event::PositionChanged {
                    entity: player.id(),
                    position: player.bounds().position(),
                });
            }
        }

        if self.fire_held {
            self.fire_gun(now, out);
        }
    }

    /// Resolves a downward bullet against the ship.
    ///
    /// On overlap the ship loses a life and a `LivesChanged` event is
    /// emitted; returns whether the bullet hit.
    pub fn check_collision(&mut self, bullet_bounds: Rect, out: &mut Vec<Event>) -> bool {
        let Some(player) = self.player.as_mut() else {
            return false;
        };

        if !player.bounds().overlaps(&bullet_bounds) {
            return false;
        }

        player.set_lives(player.lives().saturating_sub(1));
        out.push(Event::LivesChanged {
            entity: player.id(),
            lives: player.lives(),
        });
        true
    }

    fn fire_gun(&mut self, now: Duration, out: &mut Vec<Event>) {
        if let Some(player) = self.player.as_mut() {
            if player.gun_mut().try_fire(now) {
                out.push(Event::GunFired {
                    entity: player.id(),
                });
            }
        }
    }

    /// The controlled ship, while one exists.
    #[must_use]
    pub fn player(&self) -> Option<&PlayerShip> {
        self.player.as_ref()
    }

    /// Mutable access to the controlled ship.
    pub fn player_mut(&mut self) -> Option<&mut PlayerShip> {
        self.player.as_mut()
    }

    /// Removes the ship from the controller (game-over teardown).
    pub fn take_player(&mut self) -> Option<PlayerShip> {
        self.player.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invaders_core::{EntityId, GunKind, Sprite};
    use invaders_world::EntityFactory;

    const PLAYER_SPEED: f32 = 200.0;

    fn controller_at(left: f32) -> PlayerControl {
        let gun = EntityFactory::create_gun(1, GunKind::Player);
        let ship = PlayerShip::new(
            EntityId::new(0),
            Sprite::Player,
            Rect::new(left, 540.0, 80.0, 37.5),
            PLAYER_SPEED,
            gun,
            3,
        );
        PlayerControl::new(ship)
    }

    fn second(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn held_left_intent_moves_the_ship_left() {
        let mut control = controller_at(400.0);
        let mut events = Vec::new();

        control.handle_input(InputIntent::MoveLeftPressed, second(0), &mut events);
        control.update(Duration::from_millis(500), second(1), &mut events);

        let bounds = control.player().expect("player").bounds();
        assert!((bounds.left() - 300.0).abs() < 0.001);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::PositionChanged { .. })));
    }

    #[test]
    fn released_intent_stops_movement() {
        let mut control = controller_at(400.0);
        let mut events = Vec::new();

        control.handle_input(InputIntent::MoveRightPressed, second(0), &mut events);
        control.handle_input(InputIntent::MoveRightReleased, second(0), &mut events);
        control.update(Duration::from_millis(500), second(1), &mut events);

        let bounds = control.player().expect("player").bounds();
        assert!((bounds.left() - 400.0).abs() < f32::EPSILON);
    }

    #[test]
    fn ship_clamps_to_the_left_screen_edge() {
        let mut control = controller_at(10.0);
        let mut events = Vec::new();

        control.handle_input(InputIntent::MoveLeftPressed, second(0), &mut events);
        control.update(second(2), second(2), &mut events);

        let bounds = control.player().expect("player").bounds();
        assert_eq!(bounds.left(), 0.0);
    }

    #[test]
    fn ship_clamps_to_the_right_screen_edge() {
        let mut control = controller_at(700.0);
        let mut events = Vec::new();

        control.handle_input(InputIntent::MoveRightPressed, second(0), &mut events);
        control.update(second(2), second(2), &mut events);

        let bounds = control.player().expect("player").bounds();
        assert_eq!(bounds.right(), SCREEN_WIDTH);
    }

    #[test]
    fn fire_press_attempts_an_immediate_shot() {
        let mut control = controller_at(400.0);
        let mut events = Vec::new();

        control.handle_input(InputIntent::FirePressed, second(1), &mut events);

        assert!(events
            .iter()
            .any(|event| matches!(event, Event::GunFired { .. })));
    }

    #[test]
    fn held_fire_respects_the_gun_cooldown() {
        let mut control = controller_at(400.0);
        let mut events = Vec::new();

        control.handle_input(InputIntent::FirePressed, second(1), &mut events);
        // Within the 620ms cooldown of the difficulty-1 player gun.
        control.update(Duration::from_millis(100), Duration::from_millis(1100), &mut events);
        control.update(Duration::from_millis(100), Duration::from_millis(1200), &mut events);

        let shots = events
            .iter()
            .filter(|event| matches!(event, Event::GunFired { .. }))
            .count();
        assert_eq!(shots, 1);

        control.update(second(1), second(3), &mut events);
        let shots = events
            .iter()
            .filter(|event| matches!(event, Event::GunFired { .. }))
            .count();
        assert_eq!(shots, 2);
    }

    #[test]
    fn bullet_hit_decrements_lives_and_reports_them() {
        let mut control = controller_at(400.0);
        let mut events = Vec::new();

        let hit = control.check_collision(Rect::new(420.0, 550.0, 6.0, 15.0), &mut events);

        assert!(hit);
        assert_eq!(control.player().expect("player").lives(), 2);
        assert!(matches!(
            events.as_slice(),
            [Event::LivesChanged { lives: 2, .. }]
        ));
    }

    #[test]
    fn edge_touching_bullet_does_not_hit() {
        let mut control = controller_at(400.0);
        let mut events = Vec::new();

        // The bullet's left edge exactly touches the ship's right edge.
        let hit = control.check_collision(Rect::new(480.0, 550.0, 6.0, 15.0), &mut events);

        assert!(!hit);
        assert!(events.is_empty());
    }

    #[test]
    fn empty_controller_ignores_everything() {
        let mut control = controller_at(400.0);
        let _ = control.take_player();
        let mut events = Vec::new();

        control.handle_input(InputIntent::FirePressed, second(0), &mut events);
        control.update(second(1), second(1), &mut events);
        let hit = control.check_collision(Rect::new(0.0, 0.0, 800.0, 600.0), &mut events);

        assert!(!hit);
        assert!(events.is_empty());
    }

    #[test]
    fn gun_mutation_helper_is_reachable_for_powerups() {
        let mut control = controller_at(400.0);
        let player = control.player_mut().expect("player");
        player.gun_mut().set_cooldown(Duration::from_millis(150));

        assert_eq!(player.gun().cooldown(), Duration::from_millis(150));
    }
}
