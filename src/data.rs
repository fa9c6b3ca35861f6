// src/data.rs
//
// Enumerated vocabulary of the game pages.
//
// Every enum round-trips through the exact label the pages (or the database)
// use, so parsers, storage and config all share one spelling. Ranked enums
// (`FameLevel`, `CrewRank`) expose a strictly increasing `order()`.

use std::fmt;
use std::str::FromStr;

use crate::error::UnknownVariant;

macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $kind:literal { $($var:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name { $($var),+ }

        impl $name {
            /// Every variant, lowest first.
            pub const ALL: &'static [$name] = &[$($name::$var),+];

            pub fn as_str(self) -> &'static str {
                match self { $($name::$var => $label),+ }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| UnknownVariant { kind: $kind, value: s!(wanted) })
            }
        }
    };
}

labeled_enum! {
    /// Independent game realm; partition key on every entity.
    Ocean as "ocean" {
        Emerald => "emerald",
        Meridian => "meridian",
        Cerulean => "cerulean",
        Obsidian => "obsidian",
    }
}

labeled_enum! {
    /// Nine-step reputation scale used by crews, flags and flag reputations.
    FameLevel as "fame level" {
        Obscure => "Obscure",
        Rumored => "Rumored",
        Noted => "Noted",
        Recognized => "Recognized",
        Distinguished => "Distinguished",
        Celebrated => "Celebrated",
        Eminent => "Eminent",
        Renowned => "Renowned",
        Illustrious => "Illustrious",
    }
}

labeled_enum! {
    CrewRank as "crew rank" {
        Sailors => "Sailors",
        MostlyHarmless => "Mostly Harmless",
        ScurvyDogs => "Scurvy Dogs",
        Scoundrels => "Scoundrels",
        Blaggards => "Blaggards",
        DreadPirates => "Dread Pirates",
        SeaLords => "Sea Lords",
        Imperials => "Imperials",
    }
}

labeled_enum! {
    IslandSize as "island size" {
        Unknown => "unknown",
        Outpost => "outpost",
        Medium => "medium",
        Large => "large",
    }
}

labeled_enum! {
    CommodityCategory as "commodity category" {
        Unclassified => "unclassified",
        Basic => "basic",
        Herb => "herb",
        Mineral => "mineral",
        Foraged => "foraged",
        Refined => "refined",
        ShipSupply => "ship_supply",
    }
}

labeled_enum! {
    /// The four reputation tracks shown on a flag page.
    ReputationType as "reputation type" {
        Conqueror => "Conqueror",
        Explorer => "Explorer",
        Patron => "Patron",
        Magnate => "Magnate",
    }
}

labeled_enum! {
    JobKind as "job kind" {
        DailyFull => "daily_full",
        Islands => "islands",
        TaxRates => "tax_rates",
        CrewFame => "crew_fame",
        CrewInfo => "crew_info",
        FlagFame => "flag_fame",
        BattleInfo => "battle_info",
    }
}

labeled_enum! {
    JobStatus as "job status" {
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

/// Find the highest-ranked label contained in `text` (case-insensitive).
/// Highest first so that a longer title never loses to a lower one it contains.
fn highest_in<T: Copy>(all: &[T], label: impl Fn(T) -> &'static str, text: &str) -> Option<T> {
    let lc = text.to_ascii_lowercase();
    all.iter()
        .rev()
        .copied()
        .find(|v| lc.contains(&label(*v).to_ascii_lowercase()))
}

impl FameLevel {
    /// 1 (Obscure) ..= 9 (Illustrious).
    pub fn order(self) -> u8 { self as u8 + 1 }

    pub fn find_in(text: &str) -> Option<Self> {
        highest_in(Self::ALL, Self::as_str, text)
    }
}

impl CrewRank {
    /// 1 (Sailors) ..= 8 (Imperials).
    pub fn order(self) -> u8 { self as u8 + 1 }

    pub fn find_in(text: &str) -> Option<Self> {
        highest_in(Self::ALL, Self::as_str, text)
    }
}

impl IslandSize {
    /// Building slots; `None` means unlimited (or not known).
    pub fn max_buildings(self) -> Option<u8> {
        match self {
            IslandSize::Outpost => Some(2),
            IslandSize::Medium => Some(6),
            IslandSize::Large | IslandSize::Unknown => None,
        }
    }
}

impl Default for IslandSize {
    fn default() -> Self { IslandSize::Unknown }
}

impl Default for CommodityCategory {
    fn default() -> Self { CommodityCategory::Unclassified }
}

impl JobKind {
    /// Single-kind jobs fail outright when their listing yields nothing.
    pub fn is_composite(self) -> bool { matches!(self, JobKind::DailyFull) }
}
