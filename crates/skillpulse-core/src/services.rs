//! Collaborator contracts consumed by the pulse core.
//!
//! The core never owns the world. Everything outside actor and target state
//! -- the clock, ground items, presentation, chat, achievement diaries -- is
//! reached through the narrow traits in this module. In-memory
//! implementations live in [`crate::recording`].

use serde::{Deserialize, Serialize};
use skillpulse_types::{ActorId, DiaryRegion, EntityRef, ItemStack, Location, Tick};

/// An animation sequence ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Animation(pub u16);

/// A sound effect played to one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sound {
    /// Sound effect ID.
    pub id: u16,
    /// Times to play it.
    pub loops: u8,
    /// Delay before playback, in client cycles.
    pub delay: u16,
}

impl Sound {
    /// A sound played once with no delay.
    pub const fn once(id: u16) -> Self {
        Self {
            id,
            loops: 1,
            delay: 0,
        }
    }
}

/// Read access to the global tick counter.
pub trait TickClock {
    /// The current tick. Never decreases between calls.
    fn current_tick(&self) -> Tick;
}

/// Places items on the ground.
pub trait GroundItems {
    /// Drop `item` at `location`, visible to and owned by `owner`.
    fn place(&mut self, item: ItemStack, location: Location, owner: ActorId, tick: Tick);
}

/// Visual and audio effects. Purely observational.
pub trait Presentation {
    /// Play `animation` on `entity`.
    fn animate(&mut self, entity: EntityRef, animation: Animation);

    /// Turn `entity` to face `toward` for `ticks` ticks.
    fn face(&mut self, entity: EntityRef, toward: EntityRef, ticks: u64);

    /// Play `sound` to `actor`.
    fn play_sound(&mut self, actor: ActorId, sound: Sound);

    /// Show overhead chat `text` above `entity`.
    fn say(&mut self, entity: EntityRef, text: &str);
}

/// Delivers game messages to an actor's chatbox.
pub trait MessageSink {
    /// Send `text` to `actor`.
    fn send(&mut self, actor: ActorId, text: &str);
}

/// Records achievement-diary progress.
pub trait AchievementTracker {
    /// Mark diary task `task` of `tier` in `region` complete for `actor`.
    fn finish_task(&mut self, actor: ActorId, region: DiaryRegion, tier: u8, task: u16);
}
