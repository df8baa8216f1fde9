//! In-memory collaborator implementations.
//!
//! These back the engine binary and the tests. Each one simply records what
//! it was asked to do so the outcome of a tick can be inspected afterwards.
//! Long-running callers drain the message and presentation logs once per
//! tick.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use skillpulse_types::{ActorId, DiaryRegion, EntityRef, ItemId, ItemStack, Location, Tick};

use crate::services::{
    AchievementTracker, Animation, GroundItems, MessageSink, Presentation, Sound,
};

// ---------------------------------------------------------------------------
// Ground items
// ---------------------------------------------------------------------------

/// An item lying on the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundItem {
    /// The dropped stack.
    pub item: ItemStack,
    /// Where it lies.
    pub location: Location,
    /// The actor it is attributed to.
    pub owner: ActorId,
    /// Tick it was dropped.
    pub dropped_at: Tick,
}

/// Every item currently on the ground.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundItemStore {
    items: Vec<GroundItem>,
}

impl GroundItemStore {
    /// An empty world floor.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// All ground items in drop order.
    pub fn items(&self) -> &[GroundItem] {
        &self.items
    }

    /// Total units of `id` on the ground owned by `owner`.
    pub fn count_owned(&self, owner: ActorId, id: ItemId) -> u64 {
        self.items
            .iter()
            .filter(|ground| ground.owner == owner && ground.item.id == id)
            .map(|ground| u64::from(ground.item.amount))
            .sum()
    }
}

impl GroundItems for GroundItemStore {
    fn place(&mut self, item: ItemStack, location: Location, owner: ActorId, tick: Tick) {
        self.items.push(GroundItem {
            item,
            location,
            owner,
            dropped_at: tick,
        });
    }
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// One recorded presentation effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum PresentationEvent {
    /// An animation started.
    Animate {
        /// Animated entity.
        entity: EntityRef,
        /// Sequence played.
        animation: Animation,
    },
    /// An entity turned toward another.
    Face {
        /// The entity turning.
        entity: EntityRef,
        /// What it faces.
        toward: EntityRef,
        /// For how long.
        ticks: u64,
    },
    /// A sound was played.
    Sound {
        /// Listener.
        actor: ActorId,
        /// Sound played.
        sound: Sound,
    },
    /// Overhead chat.
    Say {
        /// Speaker.
        entity: EntityRef,
        /// Spoken text.
        text: String,
    },
}

/// Records presentation effects in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationLog {
    events: Vec<PresentationEvent>,
}

impl PresentationLog {
    /// An empty log.
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Every recorded effect.
    pub fn events(&self) -> &[PresentationEvent] {
        &self.events
    }

    /// Whether `entity` has played `animation`.
    pub fn has_animation(&self, entity: EntityRef, animation: Animation) -> bool {
        self.events.iter().any(|event| {
            matches!(event, PresentationEvent::Animate { entity: e, animation: a }
                if *e == entity && *a == animation)
        })
    }

    /// Whether nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take every recorded effect, oldest first, leaving the log empty.
    pub fn drain(&mut self) -> Vec<PresentationEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Presentation for PresentationLog {
    fn animate(&mut self, entity: EntityRef, animation: Animation) {
        self.events.push(PresentationEvent::Animate { entity, animation });
    }

    fn face(&mut self, entity: EntityRef, toward: EntityRef, ticks: u64) {
        self.events.push(PresentationEvent::Face {
            entity,
            toward,
            ticks,
        });
    }

    fn play_sound(&mut self, actor: ActorId, sound: Sound) {
        self.events.push(PresentationEvent::Sound { actor, sound });
    }

    fn say(&mut self, entity: EntityRef, text: &str) {
        self.events.push(PresentationEvent::Say {
            entity,
            text: text.to_owned(),
        });
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Collects chatbox messages per actor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outbox {
    messages: Vec<(ActorId, String)>,
}

impl Outbox {
    /// An empty outbox.
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Messages sent to `actor`, oldest first.
    pub fn for_actor(&self, actor: ActorId) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(recipient, _)| *recipient == actor)
            .map(|(_, text)| text.as_str())
            .collect()
    }

    /// The most recent message sent to `actor`.
    pub fn last_for(&self, actor: ActorId) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|(recipient, _)| *recipient == actor)
            .map(|(_, text)| text.as_str())
    }

    /// Total messages sent.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether nothing has been sent.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Take every message as `(recipient, text)`, oldest first, leaving the
    /// outbox empty.
    pub fn drain(&mut self) -> Vec<(ActorId, String)> {
        std::mem::take(&mut self.messages)
    }
}

impl MessageSink for Outbox {
    fn send(&mut self, actor: ActorId, text: &str) {
        self.messages.push((actor, text.to_owned()));
    }
}

// ---------------------------------------------------------------------------
// Achievements
// ---------------------------------------------------------------------------

/// Completed diary tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementLog {
    completed: BTreeSet<(ActorId, DiaryRegion, u8, u16)>,
}

impl AchievementLog {
    /// Nothing completed.
    pub const fn new() -> Self {
        Self {
            completed: BTreeSet::new(),
        }
    }

    /// Whether `actor` has completed the given task.
    pub fn is_complete(&self, actor: ActorId, region: DiaryRegion, tier: u8, task: u16) -> bool {
        self.completed.contains(&(actor, region, tier, task))
    }

    /// Number of distinct completed tasks across all actors.
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    /// Whether no task has been completed.
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}

impl AchievementTracker for AchievementLog {
    fn finish_task(&mut self, actor: ActorId, region: DiaryRegion, tier: u8, task: u16) {
        if self.completed.insert((actor, region, tier, task)) {
            tracing::info!(%actor, ?region, tier, task, "achievement diary task completed");
        }
    }
}

#[cfg(test)]
mod tests {
    use skillpulse_types::EntityId;

    use super::*;

    #[test]
    fn ground_store_counts_by_owner() {
        let owner = ActorId::new();
        let other = ActorId::new();
        let here = Location::new(1, 1, 0);
        let mut ground = GroundItemStore::new();
        ground.place(ItemStack::stackable(ItemId(995), 3), here, owner, 4);
        ground.place(ItemStack::stackable(ItemId(995), 5), here, other, 4);
        assert_eq!(ground.count_owned(owner, ItemId(995)), 3);
        assert_eq!(ground.count_owned(other, ItemId(995)), 5);
        assert_eq!(ground.count_owned(owner, ItemId(526)), 0);
        assert_eq!(ground.items().len(), 2);
    }

    #[test]
    fn outbox_orders_messages_per_actor() {
        let a = ActorId::new();
        let b = ActorId::new();
        let mut outbox = Outbox::new();
        outbox.send(a, "first");
        outbox.send(b, "other");
        outbox.send(a, "second");
        assert_eq!(outbox.for_actor(a), vec!["first", "second"]);
        assert_eq!(outbox.last_for(b), Some("other"));
        assert_eq!(outbox.len(), 3);
    }

    #[test]
    fn outbox_drain_empties_in_send_order() {
        let a = ActorId::new();
        let mut outbox = Outbox::new();
        outbox.send(a, "first");
        outbox.send(a, "second");

        let drained = outbox.drain();

        assert_eq!(
            drained,
            vec![(a, "first".to_owned()), (a, "second".to_owned())]
        );
        assert!(outbox.is_empty());
        assert!(outbox.drain().is_empty());
    }

    #[test]
    fn presentation_log_finds_animations() {
        let target = EntityRef::Target(EntityId::new());
        let mut log = PresentationLog::new();
        log.animate(target, Animation(422));
        log.say(target, "Hey!");
        assert!(log.has_animation(target, Animation(422)));
        assert!(!log.has_animation(target, Animation(881)));
        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
        assert!(!log.has_animation(target, Animation(422)));
    }

    #[test]
    fn achievements_are_idempotent() {
        let actor = ActorId::new();
        let mut log = AchievementLog::new();
        log.finish_task(actor, DiaryRegion::Falador, 1, 6);
        log.finish_task(actor, DiaryRegion::Falador, 1, 6);
        assert_eq!(log.len(), 1);
        assert!(log.is_complete(actor, DiaryRegion::Falador, 1, 6));
    }
}
