#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Timed powerup bookkeeping.
//!
//! This crate only tracks which effects are live and for how long; applying
//! and reverting the stat changes on the affected entities is the game
//! controller's job. An effect records the multiplicative factor that was
//! applied so the owner can divide it back out on expiry, which keeps
//! overlapping effects on the same stat composable.

use std::time::Duration;

use invaders_core::{EntityId, PowerupKind};

/// The stat change a powerup applied to its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PowerupEffect {
    /// Movement speed was multiplied by `factor`.
    SpeedChange {
        /// Multiplier that was applied to the target's speed.
        factor: f32,
    },
    /// Gun cooldown was divided by `factor`.
    FireRate {
        /// Divisor that was applied to the target's gun cooldown.
        factor: f32,
    },
}

/// One live timed effect on one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivePowerup {
    target: EntityId,
    kind: PowerupKind,
    effect: PowerupEffect,
    duration: Duration,
    elapsed: Duration,
}

impl ActivePowerup {
    /// Creates a freshly applied effect with its full duration remaining.
    #[must_use]
    pub const fn new(
        target: EntityId,
        kind: PowerupKind,
        effect: PowerupEffect,
        duration: Duration,
    ) -> Self {
        Self {
            target,
            kind,
            effect,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// The entity the effect was applied to.
    #[must_use]
    pub const fn target(&self) -> EntityId {
        self.target
    }

    /// Which pickup produced this effect.
    #[must_use]
    pub const fn kind(&self) -> PowerupKind {
        self.kind
    }

    /// The stat change that was applied, for the owner to revert.
    #[must_use]
    pub const fn effect(&self) -> PowerupEffect {
        self.effect
    }

    /// Time left before the effect expires.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }
}

/// Registry of live timed effects.
#[derive(Debug, Default)]
pub struct PowerupTimers {
    active: Vec<ActivePowerup>,
}

impl PowerupTimers {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly applied effect.
    pub fn add(&mut self, powerup: ActivePowerup) {
        self.active.push(powerup);
    }

    /// Advances every timer by `dt`, moving effects whose duration has fully
    /// elapsed into `expired`. Each effect expires exactly once.
    pub fn update(&mut self, dt: Duration, expired: &mut Vec<ActivePowerup>) {
        let mut index = 0;
        while index < self.active.len() {
            self.active[index].elapsed += dt;
            if self.active[index].elapsed >= self.active[index].duration {
                expired.push(self.active.remove(index));
                continue;
            }
            index += 1;
        }
    }

    /// The effects currently live, in application order.
    #[must_use]
    pub fn active(&self) -> &[ActivePowerup] {
        &self.active
    }

    /// Drops every live effect without expiring it (game-over teardown).
    pub fn clear(&mut self) {
        self.active.clear();
    }
}
