#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wall controller: owns the defensive wall bricks and erodes them as
//! bullets from either side strike them.

use invaders_core::{Event, Rect};
use invaders_world::WallBlock;

/// Controller that owns the wall bricks between the player and the swarm.
#[derive(Debug, Default)]
pub struct WallDefence {
    walls: Vec<WallBlock>,
}

impl WallDefence {
    /// Creates a controller around the provided bricks.
    #[must_use]
    pub fn new(walls: Vec<WallBlock>) -> Self {
        Self { walls }
    }

    /// Resolves a bullet against the bricks. Every overlapping brick is
    /// destroyed, so a bullet straddling two bricks takes out both.
    ///
    /// Emits `Destroyed` per brick; returns whether anything was hit.
    pub fn check_collision(&mut self, bullet_bounds: Rect, out: &mut Vec<Event>) -> bool {
        let mut hit = false;
        let mut index = 0;
        while index < self.walls.len() {
            if self.walls[index].bounds().overlaps(&bullet_bounds) {
                let brick = self.walls.remove(index);
                out.push(Event::Destroyed { entity: brick.id() });
                hit = true;
                continue;
            }
            index += 1;
        }
        hit
    }

    /// The surviving bricks.
    #[must_use]
    pub fn walls(&self) -> &[WallBlock] {
        &self.walls
    }

    /// Removes every brick (game-over teardown).
    pub fn clear(&mut self) {
        self.walls.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invaders_world::EntityFactory;

    fn fresh_walls() -> WallDefence {
        let mut factory = EntityFactory::new();
        WallDefence::new(factory.create_walls(1))
    }

    #[test]
    fn bullet_through_empty_space_hits_nothing() {
        let mut walls = fresh_walls();
        let mut events = Vec::new();

        // Between the first and second wall block.
        let hit = walls.check_collision(Rect::new(250.0, 460.0, 6.0, 15.0), &mut events);

        assert!(!hit);
        assert!(events.is_empty());
        assert_eq!(walls.walls().len(), 48);
    }

    #[test]
    fn bullet_destroys_the_brick_it_overlaps() {
        let mut walls = fresh_walls();
        let target_id = walls.walls()[0].id();
        let target_bounds = walls.walls()[0].bounds();
        let mut events = Vec::new();

        let hit = walls.check_collision(target_bounds, &mut events);

        assert!(hit);
        assert_eq!(walls.walls().len(), 47);
        assert!(events.contains(&Event::Destroyed { entity: target_id }));
        assert!(walls.walls().iter().all(|brick| brick.id() != target_id));
    }

    #[test]
    fn wide_bullet_erodes_every_brick_it_straddles() {
        let mut walls = fresh_walls();
        let block_left = walls.walls()[0].bounds().left();
        let block_top = walls.walls()[0].bounds().top();
        let mut events = Vec::new();

        // Spans the full width of the first wall block at brick height.
        let hit = walls.check_collision(
            Rect::new(block_left, block_top, 4.0 * (800.0 / 28.0), 600.0 / 54.0),
            &mut events,
        );

        assert!(hit);
        assert_eq!(events.len(), 4, "one brick per column in the top row");
        assert_eq!(walls.walls().len(), 44);
    }

    #[test]
    fn edge_touching_bullet_does_not_erode() {
        let mut walls = fresh_walls();
        // Rightmost column of the last block: no neighbouring brick past
        // this edge, so only the touching brick itself could register.
        let brick = walls.walls().last().unwrap().bounds();
        let mut events = Vec::new();

        let hit = walls.check_collision(
            Rect::new(brick.right(), brick.top(), 6.0, brick.height()),
            &mut events,
        );

        assert!(!hit);
        assert!(events.is_empty());
    }

    #[test]
    fn clear_removes_every_brick() {
        let mut walls = fresh_walls();
        walls.clear();
        assert!(walls.walls().is_empty());

        let mut events = Vec::new();
        let hit = walls.check_collision(Rect::new(0.0, 0.0, 800.0, 600.0), &mut events);
        assert!(!hit);
    }
}
