//! Randomly placed, non-overlapping sprites.
//!
//! A fixed set of slots is toggled one at a time: a hidden slot gets a
//! fresh random spot that keeps clear of every visible sprite, a visible
//! slot is painted over with the background sprite.

use embassy_futures::yield_now;
use embedded_graphics::prelude::*;
use rand::Rng;

use crate::{
    CLEAR_SPRITE,
    Config,
    HEART_SPRITE,
    ImageReader,
    ModeSignal,
};

/// Number of sprite slots. Retries grow quickly with more sprites.
pub const SPRITE_SLOTS: usize = 10;

/// One reusable sprite position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Slot {
    /// Top-left corner. Stale while hidden.
    pub position: Point,
    pub visible: bool,
}

/// What a single step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    Shown { slot: usize, position: Point },
    Hidden { slot: usize },
    /// The mode-change signal arrived first; nothing changed.
    Aborted,
}

pub struct SpriteField {
    slots: [Slot; SPRITE_SLOTS],
    sprite_size: u32,
    area: Size,
}

impl SpriteField {
    /// All slots hidden.
    pub fn new(config: &Config) -> Self {
        Self {
            slots: [Slot::default(); SPRITE_SLOTS],
            sprite_size: config.sprite_size,
            area: config.placement_area(),
        }
    }

    pub fn slots(&self) -> &[Slot; SPRITE_SLOTS] {
        &self.slots
    }

    /// Exclusive bounds for sprite corners.
    pub const fn area(&self) -> Size {
        self.area
    }

    pub fn visible(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|slot| slot.visible)
    }

    /// Whether a sprite at `candidate` would come within one pixel of a
    /// visible sprite.
    pub fn collides(&self, candidate: Point) -> bool {
        let reach = self.sprite_size as i32 + 1;
        self.visible().any(|slot| {
            let delta = candidate - slot.position;
            delta.x.abs() <= reach && delta.y.abs() <= reach
        })
    }

    /// Toggle a uniformly chosen slot.
    pub async fn tick<I, D, R>(
        &mut self,
        images: &mut I,
        target: &mut D,
        rng: &mut R,
        signal: &ModeSignal,
    ) -> TickOutcome
    where
        I: ImageReader<D>,
        D: DrawTarget,
        R: Rng,
    {
        let slot = rng.random_range(0..SPRITE_SLOTS);
        self.toggle(slot, images, target, rng, signal).await
    }

    /// Hide `slot` if it is visible, otherwise place it somewhere free.
    ///
    /// Placement re-rolls both coordinates until the spot is clear,
    /// yielding between attempts. A raised `signal` aborts the search and
    /// leaves the slot untouched.
    pub async fn toggle<I, D, R>(
        &mut self,
        slot: usize,
        images: &mut I,
        target: &mut D,
        rng: &mut R,
        signal: &ModeSignal,
    ) -> TickOutcome
    where
        I: ImageReader<D>,
        D: DrawTarget,
        R: Rng,
    {
        if self.slots[slot].visible {
            let position = self.slots[slot].position;
            if let Err(e) = images.draw(CLEAR_SPRITE, target, position) {
                error!("Failed to clear sprite {}: {}", slot, e);
            }
            self.slots[slot].visible = false;
            return TickOutcome::Hidden { slot };
        }

        let mut candidate = self.random_position(rng);
        loop {
            if signal.is_raised() {
                return TickOutcome::Aborted;
            }
            if !self.collides(candidate) {
                break;
            }
            trace!("Sprite collision at {}, re-rolling", candidate);
            candidate = self.random_position(rng);
            yield_now().await;
        }

        self.slots[slot] = Slot {
            position: candidate,
            visible: true,
        };
        if let Err(e) = images.draw(HEART_SPRITE, target, candidate) {
            error!("Failed to draw sprite {}: {}", slot, e);
        }
        TickOutcome::Shown {
            slot,
            position: candidate,
        }
    }

    fn random_position<R: Rng>(&self, rng: &mut R) -> Point {
        Point::new(
            rng.random_range(0..self.area.width) as i32,
            rng.random_range(0..self.area.height) as i32,
        )
    }
}
