use crate::math::{line_total, sum_amounts};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque order line identifier, stable for the lifetime of a split session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A line of the order being split
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    /// Unique line identifier
    pub id: ItemId,

    /// Display label
    pub name: String,

    /// Price of a single unit
    pub unit_price: Decimal,

    /// Number of units on the line
    pub quantity: u32,
}

impl OrderItem {
    /// Creates a new order item
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_price: Decimal, quantity: u32) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    /// Validates item parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.id.as_str().is_empty() {
            return Err("Item id must not be empty".to_string());
        }

        if self.unit_price < Decimal::ZERO {
            return Err(format!("Unit price of item {} must not be negative", self.id));
        }

        if self.quantity == 0 {
            return Err(format!("Quantity of item {} must be at least 1", self.id));
        }

        Ok(())
    }

    /// Price of the whole line, `None` when it cannot be represented
    pub fn line_total(&self) -> Option<Decimal> {
        line_total(self.unit_price, self.quantity)
    }
}

/// Immutable, ordered registry of the items being split.
///
/// Built once from the order handed over by the host and never mutated
/// while a session is alive. Line totals and the session total are computed
/// up front, so any sum over a subset of lines is representable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<OrderItem>", into = "Vec<OrderItem>")]
pub struct LineItems {
    items: Vec<OrderItem>,
    index: HashMap<ItemId, usize>,
    line_totals: Vec<Decimal>,
    total: Decimal,
}

impl LineItems {
    /// Builds the registry, rejecting invalid items, duplicate ids and
    /// orders whose total overflows
    pub fn new(items: Vec<OrderItem>) -> crate::Result<Self> {
        let mut index = HashMap::with_capacity(items.len());
        let mut line_totals = Vec::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            item.validate().map_err(crate::Error::InvalidItem)?;

            if index.insert(item.id.clone(), position).is_some() {
                return Err(crate::Error::InvalidItem(format!(
                    "Duplicate item id: {}",
                    item.id
                )));
            }

            let line = item.line_total().ok_or_else(|| {
                crate::Error::InvalidItem(format!("Line total of item {} overflows", item.id))
            })?;
            line_totals.push(line);
        }

        let total = sum_amounts(line_totals.iter().copied()).ok_or_else(|| {
            crate::Error::InvalidItem("Order total overflows".to_string())
        })?;

        Ok(Self {
            items,
            index,
            line_totals,
            total,
        })
    }

    /// Parses a registry from a JSON array of items
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::Error::InvalidItem(e.to_string()))
    }

    /// Sample order used by the demo host
    pub fn sample() -> Self {
        let items = vec![
            OrderItem::new("1", "Tacos al Pastor", Decimal::from(45), 3),
            OrderItem::new("2", "Molcajete Mixto", Decimal::from(189), 1),
            OrderItem::new("3", "Agua de Horchata", Decimal::from(35), 2),
            OrderItem::new("4", "Guacamole", Decimal::new(8950, 2), 1),
        ];

        Self::new(items).unwrap_or_default()
    }

    pub fn get(&self, id: &ItemId) -> Option<&OrderItem> {
        self.index.get(id).map(|&position| &self.items[position])
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderItem> {
        self.items.iter()
    }

    /// Item ids in registry order
    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter().map(|item| &item.id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Line total of a single item; unknown ids contribute zero
    pub fn line_total_of(&self, id: &ItemId) -> Decimal {
        self.index
            .get(id)
            .map(|&position| self.line_totals[position])
            .unwrap_or(Decimal::ZERO)
    }

    /// Session total: every line's unit price times quantity
    pub fn total(&self) -> Decimal {
        self.total
    }
}

impl TryFrom<Vec<OrderItem>> for LineItems {
    type Error = crate::Error;

    fn try_from(items: Vec<OrderItem>) -> Result<Self, Self::Error> {
        Self::new(items)
    }
}

impl From<LineItems> for Vec<OrderItem> {
    fn from(registry: LineItems) -> Self {
        registry.items
    }
}
