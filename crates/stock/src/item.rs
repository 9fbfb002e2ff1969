use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bistro_core::{DomainError, Record, RecordId};

/// Category of a stock item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockCategory {
    Beverage,
    Ingredient,
    Consumable,
}

impl StockCategory {
    pub const ALL: [StockCategory; 3] = [
        StockCategory::Beverage,
        StockCategory::Ingredient,
        StockCategory::Consumable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StockCategory::Beverage => "beverage",
            StockCategory::Ingredient => "ingredient",
            StockCategory::Consumable => "consumable",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockCategory::Beverage => "boisson",
            StockCategory::Ingredient => "ingrédient",
            StockCategory::Consumable => "consommable",
        }
    }
}

impl FromStr for StockCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beverage" => Ok(StockCategory::Beverage),
            "ingredient" => Ok(StockCategory::Ingredient),
            "consumable" => Ok(StockCategory::Consumable),
            other => Err(DomainError::validation(format!(
                "unknown stock category: {other}"
            ))),
        }
    }
}

/// Counting unit of a stock item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockUnit {
    Piece,
    Kilogram,
    Litre,
}

impl StockUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockUnit::Piece => "piece",
            StockUnit::Kilogram => "kilogram",
            StockUnit::Litre => "litre",
        }
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            StockUnit::Piece => "pc",
            StockUnit::Kilogram => "kg",
            StockUnit::Litre => "L",
        }
    }
}

impl FromStr for StockUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "piece" => Ok(StockUnit::Piece),
            "kilogram" => Ok(StockUnit::Kilogram),
            "litre" => Ok(StockUnit::Litre),
            other => Err(DomainError::validation(format!("unknown stock unit: {other}"))),
        }
    }
}

/// A stock element as listed on the stock-management screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: RecordId,
    /// Display name, searched by the text filter.
    pub denomination: String,
    pub category: StockCategory,
    /// On-hand quantity in `unit`s. May be zero, never negative.
    pub quantity: i64,
    pub unit: StockUnit,
    /// Instant of the last stock movement.
    pub updated_at: DateTime<Utc>,
}

impl StockItem {
    pub fn is_depleted(&self) -> bool {
        self.quantity == 0
    }

    pub fn is_below(&self, threshold: i64) -> bool {
        self.quantity < threshold
    }
}

impl Record for StockItem {
    type Category = StockCategory;

    fn id(&self) -> RecordId {
        self.id
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn amount(&self) -> i64 {
        self.quantity
    }

    fn search_text(&self) -> &str {
        &self.denomination
    }

    fn category(&self) -> StockCategory {
        self.category
    }
}
