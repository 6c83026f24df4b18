//! Resource kinds collectible from the world, and the transient ground
//! items that carry them.
//!
//! A [`ResourceKind`] is a stackable material that can appear as a dropped
//! item inside a chunk. The set of kinds a collector actually picks up is
//! narrowed further by the configured allow-set; unknown names in that
//! configuration are rejected by [`ResourceKind::from_str`] so the caller
//! can log and skip them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::ItemId;

/// A stackable resource kind that can drop as a ground item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    // --- Crops ---
    /// Harvested wheat.
    Wheat,
    /// Carrots pulled from farmland.
    Carrot,
    /// Potatoes pulled from farmland.
    Potato,
    /// Beetroots pulled from farmland.
    Beetroot,
    /// Sugar cane stalks.
    SugarCane,
    /// Melon slices.
    MelonSlice,
    /// Whole pumpkins.
    Pumpkin,
    /// Cocoa beans.
    CocoaBeans,
    /// Nether wart.
    NetherWart,
    /// Chorus fruit.
    ChorusFruit,
    /// Bamboo stalks.
    Bamboo,
    /// Kelp strands.
    Kelp,
    /// Sweet berries.
    SweetBerries,
    /// Glow berries.
    GlowBerries,

    // --- Mob drops ---
    /// Bones.
    Bone,
    /// Rotten flesh.
    RottenFlesh,
    /// Gunpowder.
    Gunpowder,
    /// String.
    String,
    /// Spider eyes.
    SpiderEye,
    /// Ender pearls.
    EnderPearl,
    /// Blaze rods.
    BlazeRod,
    /// Slime balls.
    Slimeball,
    /// Arrows.
    Arrow,
    /// Eggs.
    Egg,
    /// Feathers.
    Feather,
    /// Leather.
    Leather,
    /// Raw porkchop.
    Porkchop,
    /// Raw beef.
    Beef,
    /// Raw chicken.
    Chicken,
    /// Raw mutton.
    Mutton,
    /// Raw rabbit.
    Rabbit,
    /// Ink sacs.
    InkSac,
    /// Phantom membranes.
    PhantomMembrane,
}

impl ResourceKind {
    /// The canonical upper-snake name used in configuration files and
    /// storage records.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wheat => "WHEAT",
            Self::Carrot => "CARROT",
            Self::Potato => "POTATO",
            Self::Beetroot => "BEETROOT",
            Self::SugarCane => "SUGAR_CANE",
            Self::MelonSlice => "MELON_SLICE",
            Self::Pumpkin => "PUMPKIN",
            Self::CocoaBeans => "COCOA_BEANS",
            Self::NetherWart => "NETHER_WART",
            Self::ChorusFruit => "CHORUS_FRUIT",
            Self::Bamboo => "BAMBOO",
            Self::Kelp => "KELP",
            Self::SweetBerries => "SWEET_BERRIES",
            Self::GlowBerries => "GLOW_BERRIES",
            Self::Bone => "BONE",
            Self::RottenFlesh => "ROTTEN_FLESH",
            Self::Gunpowder => "GUNPOWDER",
            Self::String => "STRING",
            Self::SpiderEye => "SPIDER_EYE",
            Self::EnderPearl => "ENDER_PEARL",
            Self::BlazeRod => "BLAZE_ROD",
            Self::Slimeball => "SLIME_BALL",
            Self::Arrow => "ARROW",
            Self::Egg => "EGG",
            Self::Feather => "FEATHER",
            Self::Leather => "LEATHER",
            Self::Porkchop => "PORKCHOP",
            Self::Beef => "BEEF",
            Self::Chicken => "CHICKEN",
            Self::Mutton => "MUTTON",
            Self::Rabbit => "RABBIT",
            Self::InkSac => "INK_SAC",
            Self::PhantomMembrane => "PHANTOM_MEMBRANE",
        }
    }
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a resource kind name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownResourceKind(pub String);

impl core::fmt::Display for UnknownResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unknown resource kind: {}", self.0)
    }
}

impl std::error::Error for UnknownResourceKind {}

impl FromStr for ResourceKind {
    type Err = UnknownResourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let kind = match normalized.as_str() {
            "WHEAT" => Self::Wheat,
            "CARROT" => Self::Carrot,
            "POTATO" => Self::Potato,
            "BEETROOT" => Self::Beetroot,
            "SUGAR_CANE" => Self::SugarCane,
            "MELON_SLICE" => Self::MelonSlice,
            "PUMPKIN" => Self::Pumpkin,
            "COCOA_BEANS" => Self::CocoaBeans,
            "NETHER_WART" => Self::NetherWart,
            "CHORUS_FRUIT" => Self::ChorusFruit,
            "BAMBOO" => Self::Bamboo,
            "KELP" => Self::Kelp,
            "SWEET_BERRIES" => Self::SweetBerries,
            "GLOW_BERRIES" => Self::GlowBerries,
            "BONE" => Self::Bone,
            "ROTTEN_FLESH" => Self::RottenFlesh,
            "GUNPOWDER" => Self::Gunpowder,
            "STRING" => Self::String,
            "SPIDER_EYE" => Self::SpiderEye,
            "ENDER_PEARL" => Self::EnderPearl,
            "BLAZE_ROD" => Self::BlazeRod,
            "SLIME_BALL" => Self::Slimeball,
            "ARROW" => Self::Arrow,
            "EGG" => Self::Egg,
            "FEATHER" => Self::Feather,
            "LEATHER" => Self::Leather,
            "PORKCHOP" => Self::Porkchop,
            "BEEF" => Self::Beef,
            "CHICKEN" => Self::Chicken,
            "MUTTON" => Self::Mutton,
            "RABBIT" => Self::Rabbit,
            "INK_SAC" => Self::InkSac,
            "PHANTOM_MEMBRANE" => Self::PhantomMembrane,
            _ => return Err(UnknownResourceKind(s.to_owned())),
        };
        Ok(kind)
    }
}

/// A transient dropped item lying on the ground inside a chunk.
///
/// Ground items are enumerated by the world collaborator during the
/// collection sweep. An item marked `claimed` belongs to some other
/// mechanism (e.g. a player who just dropped it) and is never picked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundItem {
    /// World-assigned identifier of the item entity.
    pub id: ItemId,
    /// What the item stack contains.
    pub kind: ResourceKind,
    /// Stack size.
    pub quantity: u64,
    /// Vertical position of the item entity.
    pub y: f64,
    /// Whether the item is claimed and therefore exempt from collection.
    pub claimed: bool,
}
