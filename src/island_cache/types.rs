//! Value types referenced by the island staging structures
//!
//! Every type here is produced by a row validator or a resolver and stored
//! verbatim in `CachedIslandInfo`. Keys used inside maps serialize as plain
//! strings so a staged island can be written out as JSON.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Canonical reference to a player, produced by `Resolvers::resolve_player`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerRef(pub Uuid);

impl fmt::Display for PlayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed block or entity key (`MATERIAL` or `MATERIAL:DATA`, upper-case)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    /// Parse a raw key, returning `None` for blank input
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Key(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Island role ladder, addressed by its persisted numeric id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerRole {
    Guest,
    Coop,
    Member,
    Moderator,
    Admin,
    Leader,
}

impl PlayerRole {
    pub const ALL: [PlayerRole; 6] = [
        PlayerRole::Guest,
        PlayerRole::Coop,
        PlayerRole::Member,
        PlayerRole::Moderator,
        PlayerRole::Admin,
        PlayerRole::Leader,
    ];

    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.id() == id)
    }

    pub fn id(&self) -> i32 {
        match self {
            PlayerRole::Guest => -2,
            PlayerRole::Coop => -1,
            PlayerRole::Member => 0,
            PlayerRole::Moderator => 1,
            PlayerRole::Admin => 2,
            PlayerRole::Leader => 3,
        }
    }

    /// Role given to members whose stored role is missing or unknown
    pub fn default_role() -> Self {
        PlayerRole::Member
    }
}

/// Rating a player left on an island
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    Unknown,
    OneStar,
    TwoStars,
    ThreeStars,
    FourStars,
    FiveStars,
}

impl Rating {
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Rating::Unknown),
            1 => Some(Rating::OneStar),
            2 => Some(Rating::TwoStars),
            3 => Some(Rating::ThreeStars),
            4 => Some(Rating::FourStars),
            5 => Some(Rating::FiveStars),
            _ => None,
        }
    }

    pub fn value(&self) -> i32 {
        *self as i32
    }
}

/// World environment, used as the index of per-dimension tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Normal,
    Nether,
    TheEnd,
}

impl Dimension {
    pub const COUNT: usize = 3;

    pub const ALL: [Dimension; Dimension::COUNT] =
        [Dimension::Normal, Dimension::Nether, Dimension::TheEnd];

    /// Case-insensitive lookup by persisted environment name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "NORMAL" => Some(Dimension::Normal),
            "NETHER" => Some(Dimension::Nether),
            "THE_END" => Some(Dimension::TheEnd),
            _ => None,
        }
    }

    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

macro_rules! registered_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub(crate) fn new(name: impl Into<String>) -> Self {
                $name(name.into())
            }

            pub fn name(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

registered_name!(
    /// Island privilege, only obtainable through a resolver lookup
    IslandPrivilege
);
registered_name!(
    /// Island settings flag
    IslandFlag
);
registered_name!(
    /// Potion effect applied to players on the island
    EffectType
);
registered_name!(
    /// Registered mission
    MissionRef
);

/// World position with facing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
}

impl Location {
    /// Parse the persisted `"world, x, y, z[, yaw, pitch]"` form
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        if parts.len() != 4 && parts.len() != 6 {
            return None;
        }

        let world = parts[0];
        if world.is_empty() {
            return None;
        }

        let (yaw, pitch) = if parts.len() == 6 {
            (parts[4].parse().ok()?, parts[5].parse().ok()?)
        } else {
            (0.0, 0.0)
        };

        Some(Location {
            world: world.to_string(),
            x: parts[1].parse().ok()?,
            y: parts[2].parse().ok()?,
            z: parts[3].parse().ok()?,
            yaw,
            pitch,
        })
    }
}

/// One stack of items in a chest slot or a menu icon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    #[serde(rename = "type")]
    pub material: String,
    #[serde(default = "default_item_amount")]
    pub amount: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lore: Vec<String>,
}

fn default_item_amount() -> u32 {
    1
}

/// Fixed-size page of chest slots; `None` is an empty slot
pub type ChestPage = Vec<Option<ItemStack>>;

/// Sentinel rule deciding when a bounded value means "unset, use the default"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnsetRule {
    /// Unset when the value is below zero
    Negative,
    /// Unset when the value is below -1
    BelowMinusOne,
}

/// Numeric types that can be checked against an `UnsetRule` threshold
pub trait Bounded {
    fn is_below(&self, threshold: i32) -> bool;
}

impl Bounded for i32 {
    fn is_below(&self, threshold: i32) -> bool {
        *self < threshold
    }
}

impl Bounded for f64 {
    fn is_below(&self, threshold: i32) -> bool {
        *self < f64::from(threshold)
    }
}

impl Bounded for BigDecimal {
    fn is_below(&self, threshold: i32) -> bool {
        *self < BigDecimal::from(threshold)
    }
}

/// Raw numeric setting paired with its sentinel rule
///
/// The loader stores values exactly as persisted, sentinel negatives included.
/// Consumers decide what an unset value falls back to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeValue<T> {
    pub value: T,
    pub rule: UnsetRule,
}

impl<T: Bounded> UpgradeValue<T> {
    pub fn new(value: T, rule: UnsetRule) -> Self {
        Self { value, rule }
    }

    /// Value that becomes unset whenever it is negative
    pub fn negative_unset(value: T) -> Self {
        Self::new(value, UnsetRule::Negative)
    }

    pub fn is_unset(&self) -> bool {
        match self.rule {
            UnsetRule::Negative => self.value.is_below(0),
            UnsetRule::BelowMinusOne => self.value.is_below(-1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parse_normalizes() {
        assert_eq!(Key::parse(" stone:1 ").unwrap().as_str(), "STONE:1");
        assert!(Key::parse("   ").is_none());
    }

    #[test]
    fn test_role_lookup() {
        assert_eq!(PlayerRole::from_id(3), Some(PlayerRole::Leader));
        assert_eq!(PlayerRole::from_id(-2), Some(PlayerRole::Guest));
        assert_eq!(PlayerRole::from_id(42), None);
    }

    #[test]
    fn test_rating_bounds() {
        assert_eq!(Rating::from_value(5), Some(Rating::FiveStars));
        assert_eq!(Rating::from_value(6), None);
        assert_eq!(Rating::from_value(-1), None);
        assert_eq!(Rating::ThreeStars.value(), 3);
    }

    #[test]
    fn test_dimension_from_name() {
        assert_eq!(Dimension::from_name("the_end"), Some(Dimension::TheEnd));
        assert_eq!(Dimension::from_name("NETHER").map(|d| d.ordinal()), Some(1));
        assert_eq!(Dimension::from_name("CUSTOM"), None);
    }

    #[test]
    fn test_location_parse() {
        let loc = Location::parse("islands, 10.5, 64, -3, 90, 0").unwrap();
        assert_eq!(loc.world, "islands");
        assert_eq!(loc.x, 10.5);
        assert_eq!(loc.z, -3.0);
        assert_eq!(loc.yaw, 90.0);

        let short = Location::parse("islands,1,2,3").unwrap();
        assert_eq!(short.pitch, 0.0);

        assert!(Location::parse(", 1, 2, 3").is_none());
        assert!(Location::parse("islands, a, 2, 3").is_none());
        assert!(Location::parse("islands, 1, 2").is_none());
    }

    #[test]
    fn test_upgrade_value_rules() {
        assert!(UpgradeValue::negative_unset(-1).is_unset());
        assert!(!UpgradeValue::negative_unset(10).is_unset());
        assert!(!UpgradeValue::negative_unset(0.0f64).is_unset());

        let bank_limit = UpgradeValue::new(BigDecimal::from(-1), UnsetRule::BelowMinusOne);
        assert!(!bank_limit.is_unset());
        let sentinel = UpgradeValue::new(BigDecimal::from(-2), UnsetRule::BelowMinusOne);
        assert!(sentinel.is_unset());
    }
}
