//! Immutable catalog snapshot handed to the cart and catalog views.

use std::collections::HashMap;

use common::{ItemId, KitId};
use serde::Serialize;
use stock_store::StockLevels;

use super::{KitDefinition, MenuItem};

/// Kits and menu items as of one refresh.
///
/// Snapshots are never mutated in place; a refresh produces a new one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogSnapshot {
    kits: Vec<KitDefinition>,
    items: Vec<MenuItem>,
    #[serde(skip)]
    index: HashMap<ItemId, usize>,
}

/// Menu items sharing a category, in catalog order.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub items: Vec<&'a MenuItem>,
}

impl CatalogSnapshot {
    pub fn new(kits: Vec<KitDefinition>, items: Vec<MenuItem>) -> Self {
        let index = items
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.id.clone(), pos))
            .collect();
        Self { kits, items, index }
    }

    pub fn kits(&self) -> &[KitDefinition] {
        &self.kits
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn kit(&self, kit_id: &KitId) -> Option<&KitDefinition> {
        self.kits.iter().find(|kit| &kit.id == kit_id)
    }

    pub fn item(&self, item_id: &ItemId) -> Option<&MenuItem> {
        self.index.get(item_id).map(|pos| &self.items[*pos])
    }

    /// Current stock of an item, `None` when the item is not on the menu.
    pub fn stock_of(&self, item_id: &ItemId) -> Option<u32> {
        self.item(item_id).map(|item| item.stock)
    }

    /// Items whose title or tags contain `query`.
    pub fn search(&self, query: &str) -> Vec<&MenuItem> {
        self.items.iter().filter(|item| item.matches(query)).collect()
    }

    /// Items matching `query` grouped by category, categories in first-seen order.
    pub fn by_category(&self, query: &str) -> Vec<CategoryGroup<'_>> {
        let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
        for item in self.search(query) {
            match groups.iter_mut().find(|g| g.category == item.category) {
                Some(group) => group.items.push(item),
                None => groups.push(CategoryGroup {
                    category: &item.category,
                    items: vec![item],
                }),
            }
        }
        groups
    }

    /// Returns a copy with stock overridden by `levels`.
    ///
    /// Items missing from `levels` keep their current stock; ids in `levels`
    /// that are not on the menu are ignored.
    pub fn with_stock_levels(&self, levels: &StockLevels) -> Self {
        let items = self
            .items
            .iter()
            .map(|item| {
                let mut item = item.clone();
                if let Some(stock) = levels.get(&item.id) {
                    item.stock = *stock;
                }
                item
            })
            .collect();
        Self::new(self.kits.clone(), items)
    }
}
