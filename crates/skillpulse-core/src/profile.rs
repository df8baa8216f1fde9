//! Action profiles: immutable configuration for one kind of timed action.
//!
//! A profile carries everything that differs between, say, pickpocketing a
//! man and pickpocketing a paladin: the level requirement, the experience
//! reward, the loot table, the stun damage on failure, the message
//! templates, and any achievement milestones. All profiles share one state
//! machine ([`crate::pulse::ActionPulse`]).
//!
//! Profiles are validated once, when they are loaded, and are shared as
//! `Arc<ActionProfile>` afterwards. A profile with a zero level requirement
//! cannot be constructed.

use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use skillpulse_actors::TargetState;
use skillpulse_types::{Area, DiaryRegion, ItemId, ItemStack, Location, NpcTypeId, Skill};

use crate::dice::RollSource;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Placeholder replaced by the lower-cased target name in message templates.
pub const NAME_PLACEHOLDER: &str = "@name";

const ALWAYS: u8 = 100;
const COINS: ItemId = ItemId(995);
const POTATO_SEED: ItemId = ItemId(5318);
const ONION_SEED: ItemId = ItemId(5319);

/// Substitute [`NAME_PLACEHOLDER`] in `template` with `target_name`
/// lower-cased.
pub fn render_template(template: &str, target_name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, &target_name.to_lowercase())
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while validating or looking up profiles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// The level requirement was zero, which would divide by zero in the
    /// success model.
    #[error("profile {profile}: required_level must be at least 1")]
    ZeroRequiredLevel {
        /// Offending profile.
        profile: String,
    },

    /// A loot entry's minimum exceeds its maximum.
    #[error("profile {profile}: loot item {item} has min {min} above max {max}")]
    InvalidLootRange {
        /// Offending profile.
        profile: String,
        /// Offending item.
        item: ItemId,
        /// Configured minimum.
        min: u32,
        /// Configured maximum.
        max: u32,
    },

    /// A loot entry's chance is above 100 percent.
    #[error("profile {profile}: loot item {item} has chance {chance} above 100")]
    InvalidLootChance {
        /// Offending profile.
        profile: String,
        /// Offending item.
        item: ItemId,
        /// Configured chance.
        chance: u8,
    },

    /// Experience rewards must not be negative.
    #[error("profile {profile}: experience {experience} is negative")]
    NegativeExperience {
        /// Offending profile.
        profile: String,
        /// Configured experience.
        experience: Decimal,
    },

    /// No profile with this name is loaded.
    #[error("unknown action profile: {0}")]
    UnknownProfile(String),
}

// ---------------------------------------------------------------------------
// Loot
// ---------------------------------------------------------------------------

/// One possible loot outcome.
///
/// Each entry is rolled independently: first against `chance_percent`
/// (skipped at 100), then for an amount in `min_amount..=max_amount`
/// (skipped when the bounds are equal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootEntry {
    /// Item granted.
    pub item: ItemId,
    /// Smallest amount granted.
    #[serde(rename = "min")]
    pub min_amount: u32,
    /// Largest amount granted.
    #[serde(rename = "max")]
    pub max_amount: u32,
    /// Whether the item stacks in one slot.
    #[serde(default)]
    pub stackable: bool,
    /// Percent chance this entry is granted at all.
    #[serde(rename = "chance", default = "always")]
    pub chance_percent: u8,
}

const fn always() -> u8 {
    ALWAYS
}

impl LootEntry {
    /// An always-granted stackable entry of a fixed amount.
    pub const fn fixed_stack(item: ItemId, amount: u32) -> Self {
        Self {
            item,
            min_amount: amount,
            max_amount: amount,
            stackable: true,
            chance_percent: ALWAYS,
        }
    }

    /// The largest stack this entry can produce.
    pub const fn max_stack(&self) -> ItemStack {
        ItemStack {
            id: self.item,
            amount: self.max_amount,
            stackable: self.stackable,
        }
    }

    /// Roll this entry. Returns `None` if the chance roll misses or the
    /// rolled amount is zero.
    pub fn roll(&self, rolls: &mut dyn RollSource) -> Option<ItemStack> {
        if self.chance_percent < ALWAYS
            && rolls.roll_below(u32::from(ALWAYS)) >= u32::from(self.chance_percent)
        {
            return None;
        }

        let amount = if self.max_amount > self.min_amount {
            let spread = self.max_amount.saturating_sub(self.min_amount).saturating_add(1);
            self.min_amount.saturating_add(rolls.roll_below(spread))
        } else {
            self.min_amount
        };

        (amount > 0).then_some(ItemStack {
            id: self.item,
            amount,
            stackable: self.stackable,
        })
    }
}

// ---------------------------------------------------------------------------
// Milestones
// ---------------------------------------------------------------------------

/// An achievement-diary task completed by succeeding against a specific
/// NPC kind, optionally only inside an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// NPC kind that must be the target.
    pub npc_type: NpcTypeId,
    /// Area the actor must be standing in, if any.
    #[serde(default)]
    pub area: Option<Area>,
    /// Diary the task belongs to.
    pub region: DiaryRegion,
    /// Diary tier.
    pub tier: u8,
    /// Task index within the tier.
    pub task: u16,
}

impl Milestone {
    /// Whether succeeding against `target` from `actor_location` completes
    /// this milestone.
    pub fn matches(&self, target: &TargetState, actor_location: Location) -> bool {
        target.npc_type == self.npc_type
            && self.area.is_none_or(|area| area.contains(actor_location))
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Message templates. `@name` is replaced by the lower-cased target name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMessages {
    /// Sent when the attempt begins.
    #[serde(default = "default_start_message")]
    pub start: String,
    /// Sent on success.
    #[serde(default = "default_success_message")]
    pub success: String,
    /// Sent on failure.
    #[serde(default = "default_failure_message")]
    pub failure: String,
    /// Spoken by the target when it catches the actor.
    #[serde(default = "default_target_response")]
    pub target_response: String,
}

impl Default for ProfileMessages {
    fn default() -> Self {
        Self {
            start: default_start_message(),
            success: default_success_message(),
            failure: default_failure_message(),
            target_response: default_target_response(),
        }
    }
}

fn default_start_message() -> String {
    "You attempt to pick the @name's pocket.".to_owned()
}

fn default_success_message() -> String {
    "You pick the @name's pocket.".to_owned()
}

fn default_failure_message() -> String {
    "You fail to pick the @name's pocket.".to_owned()
}

fn default_target_response() -> String {
    "What do you think you're doing?".to_owned()
}

// ---------------------------------------------------------------------------
// Definitions (unvalidated)
// ---------------------------------------------------------------------------

/// A profile as written in configuration, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDefinition {
    /// Skill channel trained and checked.
    #[serde(default = "default_skill")]
    pub skill: Skill,
    /// Minimum level to attempt.
    pub required_level: u32,
    /// Experience per success.
    pub experience: Decimal,
    /// Hitpoints removed on failure.
    #[serde(default)]
    pub stun_damage: u32,
    /// Loot outcomes in grant order.
    #[serde(default)]
    pub loot: Vec<LootEntry>,
    /// Message templates.
    #[serde(default)]
    pub messages: ProfileMessages,
    /// Diary milestones.
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

const fn default_skill() -> Skill {
    Skill::Thieving
}

// ---------------------------------------------------------------------------
// ActionProfile
// ---------------------------------------------------------------------------

/// A validated, immutable action profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionProfile {
    name: String,
    skill: Skill,
    required_level: NonZeroU32,
    experience: Decimal,
    stun_damage: u32,
    loot: Vec<LootEntry>,
    messages: ProfileMessages,
    milestones: Vec<Milestone>,
}

impl ActionProfile {
    /// Validate `definition` into a profile called `name`.
    pub fn from_definition(
        name: impl Into<String>,
        definition: ProfileDefinition,
    ) -> Result<Self, ProfileError> {
        let name = name.into();

        let required_level = NonZeroU32::new(definition.required_level)
            .ok_or_else(|| ProfileError::ZeroRequiredLevel {
                profile: name.clone(),
            })?;

        if definition.experience < Decimal::ZERO {
            return Err(ProfileError::NegativeExperience {
                profile: name,
                experience: definition.experience,
            });
        }

        for entry in &definition.loot {
            if entry.min_amount > entry.max_amount {
                return Err(ProfileError::InvalidLootRange {
                    profile: name,
                    item: entry.item,
                    min: entry.min_amount,
                    max: entry.max_amount,
                });
            }
            if entry.chance_percent > ALWAYS {
                return Err(ProfileError::InvalidLootChance {
                    profile: name,
                    item: entry.item,
                    chance: entry.chance_percent,
                });
            }
        }

        Ok(Self {
            name,
            skill: definition.skill,
            required_level,
            experience: definition.experience,
            stun_damage: definition.stun_damage,
            loot: definition.loot,
            messages: definition.messages,
            milestones: definition.milestones,
        })
    }

    /// Profile name (its key in the table).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Skill channel checked, trained, and put on cooldown.
    pub const fn skill(&self) -> Skill {
        self.skill
    }

    /// Minimum level to attempt.
    pub const fn required_level(&self) -> NonZeroU32 {
        self.required_level
    }

    /// Experience granted per success.
    pub const fn experience(&self) -> Decimal {
        self.experience
    }

    /// Hitpoints removed on failure.
    pub const fn stun_damage(&self) -> u32 {
        self.stun_damage
    }

    /// Loot outcomes in grant order.
    pub fn loot(&self) -> &[LootEntry] {
        &self.loot
    }

    /// Message templates.
    pub const fn messages(&self) -> &ProfileMessages {
        &self.messages
    }

    /// Diary milestones.
    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    /// Roll every loot entry in order, keeping the ones that hit.
    pub fn roll_loot(&self, rolls: &mut dyn RollSource) -> Vec<ItemStack> {
        self.loot.iter().filter_map(|entry| entry.roll(rolls)).collect()
    }
}

// ---------------------------------------------------------------------------
// ProfileTable
// ---------------------------------------------------------------------------

/// All loaded profiles, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileTable {
    profiles: BTreeMap<String, Arc<ActionProfile>>,
}

impl ProfileTable {
    /// Validate every definition into a table.
    pub fn from_definitions(
        definitions: BTreeMap<String, ProfileDefinition>,
    ) -> Result<Self, ProfileError> {
        let mut profiles = BTreeMap::new();
        for (name, definition) in definitions {
            let profile = ActionProfile::from_definition(name.clone(), definition)?;
            profiles.insert(name, Arc::new(profile));
        }
        Ok(Self { profiles })
    }

    /// The built-in pickpocketing table.
    pub fn builtin() -> Result<Self, ProfileError> {
        Self::from_definitions(builtin_definitions())
    }

    /// Look up a profile.
    pub fn get(&self, name: &str) -> Option<Arc<ActionProfile>> {
        self.profiles.get(name).cloned()
    }

    /// Look up a profile, failing if it is missing.
    pub fn require(&self, name: &str) -> Result<Arc<ActionProfile>, ProfileError> {
        self.get(name)
            .ok_or_else(|| ProfileError::UnknownProfile(name.to_owned()))
    }

    /// Profile names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn pickpocket(
    required_level: u32,
    experience: Decimal,
    stun_damage: u32,
    loot: Vec<LootEntry>,
) -> ProfileDefinition {
    ProfileDefinition {
        skill: Skill::Thieving,
        required_level,
        experience,
        stun_damage,
        loot,
        messages: ProfileMessages::default(),
        milestones: Vec::new(),
    }
}

fn coins(min: u32, max: u32) -> LootEntry {
    LootEntry {
        item: COINS,
        min_amount: min,
        max_amount: max,
        stackable: true,
        chance_percent: ALWAYS,
    }
}

pub(crate) fn builtin_definitions() -> BTreeMap<String, ProfileDefinition> {
    let mut guard = pickpocket(40, Decimal::new(468, 1), 2, vec![coins(30, 30)]);
    guard.milestones = vec![
        Milestone {
            npc_type: NpcTypeId(9),
            area: None,
            region: DiaryRegion::Falador,
            tier: 1,
            task: 6,
        },
        Milestone {
            npc_type: NpcTypeId(5920),
            area: Some(Area::new(3202, 3459, 3224, 3470, 0)),
            region: DiaryRegion::Varrock,
            tier: 1,
            task: 12,
        },
    ];

    let seed = |item, max, chance| LootEntry {
        item,
        min_amount: 1,
        max_amount: max,
        stackable: true,
        chance_percent: chance,
    };

    BTreeMap::from([
        ("man".to_owned(), pickpocket(1, Decimal::new(8, 0), 1, vec![coins(3, 3)])),
        (
            "farmer".to_owned(),
            pickpocket(
                10,
                Decimal::new(145, 1),
                1,
                vec![coins(9, 9), seed(POTATO_SEED, 1, 25)],
            ),
        ),
        ("warrior".to_owned(), pickpocket(25, Decimal::new(26, 0), 2, vec![coins(18, 18)])),
        ("rogue".to_owned(), pickpocket(32, Decimal::new(365, 1), 2, vec![coins(25, 40)])),
        (
            "master_farmer".to_owned(),
            pickpocket(
                38,
                Decimal::new(43, 0),
                3,
                vec![seed(POTATO_SEED, 4, 60), seed(ONION_SEED, 3, 40)],
            ),
        ),
        ("guard".to_owned(), guard),
        ("knight".to_owned(), pickpocket(55, Decimal::new(843, 1), 3, vec![coins(50, 50)])),
        ("paladin".to_owned(), pickpocket(70, Decimal::new(15175, 2), 3, vec![coins(80, 80)])),
        ("gnome".to_owned(), pickpocket(75, Decimal::new(1985, 1), 1, vec![coins(300, 300)])),
        ("hero".to_owned(), pickpocket(80, Decimal::new(2733, 1), 4, vec![coins(200, 300)])),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
