//! The closed catalog of recognized filter keys.
//!
//! Each key has a canonical name, optional aliases, an optional enumerated value set, and an
//! operator class that decides which comparisons it accepts.

use std::{collections::HashMap, iter};

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::term::Comparison;

/// Which comparison operators a key accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorClass {
    /// Only `:` and `=`.
    EqualityOnly,
    /// All seven comparisons.
    AllComparisons,
}

impl OperatorClass {
    /// Whether `comparison` is valid for keys of this class.
    pub fn accepts(self, comparison: Comparison) -> bool {
        match self {
            Self::EqualityOnly => comparison.is_equality(),
            Self::AllComparisons => true,
        }
    }

    /// The accepted comparisons, in canonical order.
    pub fn comparisons(self) -> impl Iterator<Item = Comparison> {
        Comparison::ALL
            .into_iter()
            .filter(move |comparison| self.accepts(*comparison))
    }
}

/// Description of one filter key.
#[derive(Debug, Clone, Serialize)]
pub struct FilterKeyDescriptor {
    /// Canonical name.
    pub name: &'static str,
    /// Alternative spellings. Never contains `name`.
    pub aliases: &'static [&'static str],
    /// Finite set of values, when the key has one.
    pub values: Option<&'static [&'static str]>,
    /// Accepted comparisons.
    pub operators: OperatorClass,
}

impl FilterKeyDescriptor {
    /// The canonical name followed by every alias.
    pub fn spellings(&self) -> impl Iterator<Item = &'static str> {
        iter::once(self.name).chain(self.aliases.iter().copied())
    }
}

/// Lookup table over a set of key descriptors.
#[derive(Debug)]
pub struct Vocabulary {
    /// Descriptors in declaration order.
    descriptors: Vec<FilterKeyDescriptor>,
    /// Every spelling mapped to its descriptor index.
    index: HashMap<&'static str, usize>,
}

impl Vocabulary {
    /// Builds a vocabulary.
    ///
    /// # Panics
    ///
    /// Panics if any canonical name or alias is used twice, or if a descriptor lists its own
    /// name as an alias. Both are mistakes in the table, not runtime conditions.
    pub fn new(descriptors: Vec<FilterKeyDescriptor>) -> Self {
        let mut index = HashMap::new();
        for (position, descriptor) in descriptors.iter().enumerate() {
            assert!(
                !descriptor.aliases.contains(&descriptor.name),
                "filter key '{}' lists itself as an alias",
                descriptor.name
            );
            for spelling in descriptor.spellings() {
                let previous = index.insert(spelling, position);
                assert!(
                    previous.is_none(),
                    "filter key spelling '{spelling}' is defined more than once"
                );
            }
        }
        Self { descriptors, index }
    }

    /// The built-in card catalog vocabulary, shared process-wide.
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Exact, case-sensitive lookup by canonical name or alias.
    pub fn lookup(&self, token: &str) -> Option<&FilterKeyDescriptor> {
        self.index.get(token).map(|&i| &self.descriptors[i])
    }

    /// Lookup after lowercasing `token`.
    pub fn lookup_ignore_case(&self, token: &str) -> Option<&FilterKeyDescriptor> {
        self.lookup(&token.to_lowercase())
    }

    /// All descriptors in declaration order.
    pub fn descriptors(&self) -> &[FilterKeyDescriptor] {
        &self.descriptors
    }
}

/// Mana colors and their common guild/shard names.
const COLORS: &[&str] = &[
    "white", "blue", "black", "red", "green", "colorless", "multicolor", "azorius", "dimir",
    "rakdos", "gruul", "selesnya", "orzhov", "izzet", "golgari", "boros", "simic", "bant",
    "esper", "grixis", "jund", "naya", "abzan", "jeskai", "sultai", "mardu", "temur",
];

/// Card types and supertypes.
const TYPES: &[&str] = &[
    "artifact", "battle", "creature", "enchantment", "instant", "kindred", "land", "legendary",
    "planeswalker", "snow", "sorcery", "basic", "token",
];

/// Values accepted by `is:` and `not:`.
const CARD_PROPERTIES: &[&str] = &[
    "foil", "nonfoil", "etched", "glossy", "full", "fullart", "promo", "reprint", "reserved",
    "spotlight", "commander", "companion", "digital", "funny", "hires", "split", "flip",
    "transform", "mdfc", "meld", "leveler", "dfc", "scryland", "scryfallpreview", "fetchland",
    "shockland", "dual", "bounceland", "checkland", "fastland", "painland", "manland",
    "vanilla", "frenchvanilla", "permanent", "spell", "historic", "party", "modal",
];

/// Play formats.
const FORMATS: &[&str] = &[
    "standard", "future", "historic", "timeless", "gladiator", "pioneer", "explorer", "modern",
    "legacy", "pauper", "vintage", "penny", "commander", "oathbreaker", "brawl",
    "standardbrawl", "alchemy", "paupercommander", "duel", "oldschool", "premodern",
    "predh",
];

/// Printing rarities.
const RARITIES: &[&str] = &["common", "uncommon", "rare", "special", "mythic", "bonus"];

/// Where a card is available to play.
const GAMES: &[&str] = &["paper", "arena", "mtgo"];

/// Border colors.
const BORDERS: &[&str] = &["black", "white", "borderless", "silver", "gold"];

/// Frame editions and effects.
const FRAMES: &[&str] = &[
    "1993", "1997", "2003", "2015", "future", "legendary", "colorshifted", "tombstone",
    "enchantment", "showcase", "extendedart", "etched",
];

/// Things a card can have.
const HAS: &[&str] = &["watermark", "indicator", "flavor", "security_stamp"];

/// Declares a descriptor with less ceremony.
const fn key(
    name: &'static str,
    aliases: &'static [&'static str],
    values: Option<&'static [&'static str]>,
    operators: OperatorClass,
) -> FilterKeyDescriptor {
    FilterKeyDescriptor {
        name,
        aliases,
        values,
        operators,
    }
}

/// The standard vocabulary, built on first use.
static STANDARD: Lazy<Vocabulary> = Lazy::new(|| {
    use OperatorClass::{AllComparisons, EqualityOnly};

    Vocabulary::new(vec![
        key("name", &[], None, EqualityOnly),
        key("color", &["c"], Some(COLORS), AllComparisons),
        key("identity", &["id", "ci"], Some(COLORS), AllComparisons),
        key("type", &["t"], Some(TYPES), EqualityOnly),
        key("oracle", &["o"], None, EqualityOnly),
        key("keyword", &["kw"], None, EqualityOnly),
        key("mana", &["m"], None, AllComparisons),
        key("manavalue", &["mv", "cmc"], None, AllComparisons),
        key("power", &["pow"], None, AllComparisons),
        key("toughness", &["tou"], None, AllComparisons),
        key("loyalty", &["loy"], None, AllComparisons),
        key("rarity", &["r"], Some(RARITIES), AllComparisons),
        key("set", &["s", "e", "edition"], None, EqualityOnly),
        key("artist", &["a"], None, EqualityOnly),
        key("flavor", &["ft"], None, EqualityOnly),
        key("is", &[], Some(CARD_PROPERTIES), EqualityOnly),
        key("not", &[], Some(CARD_PROPERTIES), EqualityOnly),
        key("has", &[], Some(HAS), EqualityOnly),
        key("format", &["f", "fo"], Some(FORMATS), EqualityOnly),
        key("banned", &[], Some(FORMATS), EqualityOnly),
        key("restricted", &[], Some(FORMATS), EqualityOnly),
        key("game", &[], Some(GAMES), EqualityOnly),
        key("border", &[], Some(BORDERS), EqualityOnly),
        key("frame", &[], Some(FRAMES), EqualityOnly),
        key("year", &[], None, AllComparisons),
        key("date", &[], None, AllComparisons),
        key("usd", &["price"], None, AllComparisons),
        key("language", &["lang"], None, EqualityOnly),
    ])
});
