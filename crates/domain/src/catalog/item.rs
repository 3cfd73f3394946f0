//! Menu items and kit definitions.

use std::num::NonZeroU32;

use common::{ItemId, KitId};
use serde::{Deserialize, Serialize};

use super::Money;

/// A purchasable meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub description: String,

    /// Unit price outside of a kit. Kit orders are priced by the kit.
    #[serde(default)]
    pub price: Money,

    /// Portion size, e.g. `"350g"`.
    #[serde(default)]
    pub serving: String,

    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,

    /// Sellable units as last seen by this catalog.
    pub stock: u32,
}

impl MenuItem {
    /// Creates a menu item with empty display fields.
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>, stock: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            price: Money::zero(),
            serving: String::new(),
            category: String::new(),
            tags: Vec::new(),
            stock,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_serving(mut self, serving: impl Into<String>) -> Self {
        self.serving = serving.into();
        self
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }

    /// Case-insensitive match against the title and tags.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&query)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&query))
    }
}

/// A meal plan: how many meals must be picked and what the plan costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitDefinition {
    pub id: KitId,
    pub name: String,

    /// Meal slots that must all be filled before checkout.
    pub total_meals: NonZeroU32,

    pub price: Money,
    pub price_per_meal: Money,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub highlight: bool,
}

impl KitDefinition {
    /// Creates a kit; the per-meal price is derived from the kit price.
    pub fn new(
        id: impl Into<KitId>,
        name: impl Into<String>,
        total_meals: NonZeroU32,
        price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            total_meals,
            price,
            price_per_meal: Money::from_cents(price.cents() / i64::from(total_meals.get())),
            description: None,
            highlight: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn highlighted(mut self) -> Self {
        self.highlight = true;
        self
    }

    /// Meal capacity as a plain integer.
    pub fn meals(&self) -> u32 {
        self.total_meals.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kit_derives_price_per_meal() {
        let kit = KitDefinition::new(
            "kit5",
            "Kit 5 Refeições",
            NonZeroU32::new(5).unwrap(),
            Money::from_reais(85),
        );
        assert_eq!(kit.meals(), 5);
        assert_eq!(kit.price_per_meal, Money::from_reais(17));
    }

    #[test]
    fn test_kit_rejects_zero_meals_on_the_wire() {
        let json = r#"{"id":"bad","name":"Bad","total_meals":0,"price":100,"price_per_meal":100}"#;
        assert!(serde_json::from_str::<KitDefinition>(json).is_err());
    }

    #[test]
    fn test_menu_item_matches_title_and_tags() {
        let item = MenuItem::new("2", "Escondidinho de Frango", 10).with_tags(["Fit", "Low Carb"]);
        assert!(item.matches("frango"));
        assert!(item.matches("low"));
        assert!(item.matches("  "));
        assert!(!item.matches("carne"));
    }

    #[test]
    fn test_out_of_stock() {
        assert!(MenuItem::new("1", "Bobó", 0).is_out_of_stock());
        assert!(!MenuItem::new("1", "Bobó", 1).is_out_of_stock());
    }
}
