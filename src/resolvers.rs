//! Identity and enumerated-name resolution
//!
//! Validators never construct privileges, flags, effects or missions
//! themselves; every name goes through a `Resolvers` lookup that answers
//! `None` for unknown names.

use crate::island_cache::{EffectType, IslandFlag, IslandPrivilege, Key, MissionRef, PlayerRef};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

pub trait Resolvers: Send + Sync {
    /// Canonical player for `uuid`, created on demand
    fn resolve_player(&self, uuid: Uuid) -> PlayerRef;

    fn resolve_key(&self, raw: &str) -> Option<Key>;

    fn resolve_mission(&self, name: &str) -> Option<MissionRef>;

    fn resolve_privilege(&self, name: &str) -> Option<IslandPrivilege>;

    fn resolve_flag(&self, name: &str) -> Option<IslandFlag>;

    fn resolve_effect(&self, name: &str) -> Option<EffectType>;
}

pub const BUILTIN_PRIVILEGES: &[&str] = &[
    "ALL", "ANIMAL_BREED", "ANIMAL_DAMAGE", "ANIMAL_SHEAR", "ANIMAL_SPAWN", "BAN_MEMBER",
    "BREAK", "BUILD", "CHEST_ACCESS", "CLOSE_BYPASS", "CLOSE_ISLAND", "COOP_MEMBER",
    "DELETE_WARP", "DEMOTE_MEMBERS", "DEPOSIT_MONEY", "DISBAND_ISLAND", "DISCORD_SHOW",
    "DROP_ITEMS", "EXPEL_BYPASS", "EXPEL_PLAYERS", "FARM_TRAMPING", "FERTILIZE", "FISH", "FLY",
    "HORSE_INTERACT", "INTERACT", "INVITE_MEMBER", "ISLAND_CHEST", "ITEM_FRAME", "KICK_MEMBER",
    "LEASH", "MINECART_DAMAGE", "MINECART_ENTER", "MINECART_OPEN", "MINECART_PLACE",
    "MONSTER_DAMAGE", "MONSTER_SPAWN", "NAME_ENTITY", "OPEN_SETTINGS", "PAINTING", "PAYPAL_SHOW",
    "PICKUP_DROPS", "PROMOTE_MEMBERS", "RANKUP", "RATINGS_SHOW", "SET_BIOME", "SET_DISCORD",
    "SET_HOME", "SET_PAYPAL", "SET_PERMISSION", "SET_ROLE", "SET_SETTINGS", "SET_WARP",
    "SIGN_INTERACT", "SPAWNER_BREAK", "TURTLE_EGG_TRAMPING", "UNCOOP_MEMBER", "USE",
    "VALUABLE_BREAK", "VILLAGER_TRADING", "WITHDRAW_MONEY",
];

pub const BUILTIN_FLAGS: &[&str] = &[
    "ALWAYS_DAY", "ALWAYS_MIDDLE_DAY", "ALWAYS_NIGHT", "ALWAYS_MIDDLE_NIGHT", "ALWAYS_RAIN",
    "ALWAYS_SHINY", "CREEPER_EXPLOSION", "CROPS_GROWTH", "EGG_LAY", "ENDERMAN_GRIEF",
    "FIRE_SPREAD", "GHAST_FIREBALL", "LAVA_FLOW", "NATURAL_ANIMALS_SPAWN",
    "NATURAL_MONSTER_SPAWN", "PVP", "SPAWNER_ANIMALS_SPAWN", "SPAWNER_MONSTER_SPAWN",
    "TNT_EXPLOSION", "TREE_GROWTH", "WATER_FLOW", "WITHER_EXPLOSION",
];

pub const BUILTIN_EFFECTS: &[&str] = &[
    "SPEED", "SLOW", "FAST_DIGGING", "SLOW_DIGGING", "INCREASE_DAMAGE", "HEAL", "HARM", "JUMP",
    "CONFUSION", "REGENERATION", "DAMAGE_RESISTANCE", "FIRE_RESISTANCE", "WATER_BREATHING",
    "INVISIBILITY", "BLINDNESS", "NIGHT_VISION", "HUNGER", "WEAKNESS", "POISON", "WITHER",
    "HEALTH_BOOST", "ABSORPTION", "SATURATION", "GLOWING", "LEVITATION", "LUCK", "UNLUCK",
    "SLOW_FALLING", "CONDUIT_POWER", "DOLPHINS_GRACE", "BAD_OMEN", "HERO_OF_THE_VILLAGE",
];

fn upper_set(names: &[&str]) -> HashSet<String> {
    names.iter().map(|name| name.to_ascii_uppercase()).collect()
}

/// Registry-backed resolvers with the built-in names pre-registered
#[derive(Debug, Clone)]
pub struct CatalogResolvers {
    privileges: HashSet<String>,
    flags: HashSet<String>,
    effects: HashSet<String>,
    /// lower-case lookup name → registered name
    missions: HashMap<String, String>,
}

impl Default for CatalogResolvers {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogResolvers {
    pub fn new() -> Self {
        Self {
            privileges: upper_set(BUILTIN_PRIVILEGES),
            flags: upper_set(BUILTIN_FLAGS),
            effects: upper_set(BUILTIN_EFFECTS),
            missions: HashMap::new(),
        }
    }

    /// Catalog with `missions` registered
    pub fn with_missions<I, S>(missions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolvers = Self::new();
        for mission in missions {
            resolvers.register_mission(mission.as_ref());
        }
        resolvers
    }

    pub fn register_mission(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() {
            self.missions.insert(name.to_lowercase(), name.to_string());
        }
    }

    pub fn register_privilege(&mut self, name: &str) {
        self.privileges.insert(name.trim().to_ascii_uppercase());
    }

    pub fn register_flag(&mut self, name: &str) {
        self.flags.insert(name.trim().to_ascii_uppercase());
    }

    fn lookup(registry: &HashSet<String>, name: &str) -> Option<String> {
        let name = name.trim().to_ascii_uppercase();
        registry.contains(&name).then_some(name)
    }
}

impl Resolvers for CatalogResolvers {
    fn resolve_player(&self, uuid: Uuid) -> PlayerRef {
        PlayerRef(uuid)
    }

    fn resolve_key(&self, raw: &str) -> Option<Key> {
        Key::parse(raw)
    }

    fn resolve_mission(&self, name: &str) -> Option<MissionRef> {
        self.missions
            .get(&name.trim().to_lowercase())
            .map(|registered| MissionRef::new(registered.clone()))
    }

    fn resolve_privilege(&self, name: &str) -> Option<IslandPrivilege> {
        Self::lookup(&self.privileges, name).map(IslandPrivilege::new)
    }

    fn resolve_flag(&self, name: &str) -> Option<IslandFlag> {
        Self::lookup(&self.flags, name).map(IslandFlag::new)
    }

    fn resolve_effect(&self, name: &str) -> Option<EffectType> {
        Self::lookup(&self.effects, name).map(EffectType::new)
    }
}
