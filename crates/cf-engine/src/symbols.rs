//! Symbol catalog and classification predicates

use serde::{Deserialize, Serialize};

/// Grid symbol for the 5×5 cluster game
///
/// The catalog is closed: one premium symbol, five low-pay symbols, two
/// wild variants, the scatter, and the `Empty` sentinel used between
/// removal and refill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Symbol {
    /// Premium high-pay symbol
    Lady = 0,
    /// Top-ranked low-pay symbol
    Pink = 1,
    /// Second-ranked low-pay symbol
    Green = 2,
    /// Third-ranked low-pay symbol
    Blue = 3,
    /// Fourth-ranked low-pay symbol
    Orange = 4,
    /// Lowest-ranked low-pay symbol
    Cyan = 5,
    /// Substitutes for any paying symbol
    Wild = 6,
    /// Wild that detonates a 3×3 area
    EWild = 7,
    /// Free-spins trigger, pays nowhere
    Scatter = 8,
    /// Unoccupied cell
    Empty = 9,
}

impl Symbol {
    /// Every drawable symbol, in catalog order (excludes `Empty`)
    pub const CATALOG: [Symbol; 9] = [
        Symbol::Lady,
        Symbol::Pink,
        Symbol::Green,
        Symbol::Blue,
        Symbol::Orange,
        Symbol::Cyan,
        Symbol::Wild,
        Symbol::EWild,
        Symbol::Scatter,
    ];

    /// Paying symbols, in payout-rank order
    pub const PAYING: [Symbol; 6] = [
        Symbol::Lady,
        Symbol::Pink,
        Symbol::Green,
        Symbol::Blue,
        Symbol::Orange,
        Symbol::Cyan,
    ];

    /// Catalog index (enum discriminant)
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Low-pay symbols are the only ones an explosion destroys
    pub fn is_low_pay(&self) -> bool {
        matches!(
            self,
            Symbol::Pink | Symbol::Green | Symbol::Blue | Symbol::Orange | Symbol::Cyan
        )
    }

    /// High-pay symbols survive explosions
    pub fn is_high_pay(&self) -> bool {
        matches!(self, Symbol::Lady)
    }

    /// Both wild variants substitute in clusters
    pub fn is_wild(&self) -> bool {
        matches!(self, Symbol::Wild | Symbol::EWild)
    }

    /// Symbols that can anchor a cluster payout
    pub fn is_paying(&self) -> bool {
        self.is_low_pay() || self.is_high_pay()
    }

    pub fn is_scatter(&self) -> bool {
        matches!(self, Symbol::Scatter)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Symbol::Empty)
    }

    /// Display name, matching the serialized form
    pub fn name(&self) -> &'static str {
        match self {
            Symbol::Lady => "LADY",
            Symbol::Pink => "PINK",
            Symbol::Green => "GREEN",
            Symbol::Blue => "BLUE",
            Symbol::Orange => "ORANGE",
            Symbol::Cyan => "CYAN",
            Symbol::Wild => "WILD",
            Symbol::EWild => "E_WILD",
            Symbol::Scatter => "SCATTER",
            Symbol::Empty => "EMPTY",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates_partition_catalog() {
        for symbol in Symbol::CATALOG {
            let classes = [
                symbol.is_paying(),
                symbol.is_wild(),
                symbol.is_scatter(),
            ];
            assert_eq!(classes.iter().filter(|&&c| c).count(), 1, "{symbol}");
            assert!(!symbol.is_empty());
        }
        assert!(Symbol::Empty.is_empty());
        assert!(!Symbol::Empty.is_paying());
    }

    #[test]
    fn test_wild_variants() {
        assert!(Symbol::Wild.is_wild());
        assert!(Symbol::EWild.is_wild());
        assert!(!Symbol::Wild.is_paying());
        assert!(!Symbol::EWild.is_low_pay());
    }

    #[test]
    fn test_low_and_high_pay() {
        assert!(Symbol::Lady.is_high_pay());
        assert!(!Symbol::Lady.is_low_pay());
        for symbol in [Symbol::Pink, Symbol::Green, Symbol::Blue, Symbol::Orange, Symbol::Cyan] {
            assert!(symbol.is_low_pay());
            assert!(symbol.is_paying());
        }
    }

    #[test]
    fn test_catalog_order_matches_discriminants() {
        for (i, symbol) in Symbol::CATALOG.iter().enumerate() {
            assert_eq!(symbol.index(), i);
        }
    }
}
