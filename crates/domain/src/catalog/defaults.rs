//! Built-in storefront catalog.

use std::num::NonZeroU32;

use stock_store::StockUpdate;

use super::{CatalogSnapshot, KitDefinition, MenuItem, Money};

const MEALS_CATEGORY: &str = "Marmitas PratoFit";

fn meals(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN)
}

/// The four meal plans offered by the storefront.
pub fn default_kits() -> Vec<KitDefinition> {
    vec![
        KitDefinition::new("unit", "Unidade Avulsa", meals(1), Money::from_reais(25))
            .with_description("Ideal para experimentar"),
        KitDefinition::new("kit5", "Kit 5 Refeições", meals(5), Money::from_reais(85))
            .with_description("Garanta o almoço da semana")
            .highlighted(),
        KitDefinition::new("kit10", "Kit 10 Refeições", meals(10), Money::from_reais(160))
            .with_description("Praticidade para 15 dias"),
        KitDefinition::new("kit20", "Kit 20 Refeições", meals(20), Money::from_reais(300))
            .with_description("O melhor custo-benefício"),
    ]
}

fn meal(id: &str, title: &str, tags: &[&str], stock: u32) -> MenuItem {
    MenuItem::new(id, title, stock)
        .with_category(MEALS_CATEGORY)
        .with_serving("350g")
        .with_tags(tags.iter().copied())
}

/// The menu with its seed stock.
pub fn default_menu() -> Vec<MenuItem> {
    vec![
        meal("1", "Bobó de Frango", &["Frango", "Cremoso"], 15).with_description(
            "Bobó de frango com macaxeira e leite de coco. Acompanha arroz branco.",
        ),
        meal(
            "2",
            "Escondidinho de Frango com Batata Doce",
            &["Fit", "Low Carb"],
            10,
        )
        .with_description("Purê de batata doce com frango desfiado e ervas finas."),
        meal("3", "Escondidinho de Carne Moída", &["Carne"], 12)
            .with_description("Purê de batata inglesa com carne moída selecionada."),
        meal("4", "Espaguete a Bolonhesa", &["Massa"], 10),
        meal("5", "Kibe de Forno", &["Assado", "Proteico"], 15),
        meal("6", "Mexido à Mineira", &["Completo"], 8),
        meal("7", "Rubacão Fit", &["Regional"], 10),
        meal("9", "Feijuca Fit", &["Tradicional"], 7),
        meal("11", "Galinhada Integral", &["Integral"], 5),
    ]
}

pub fn default_catalog() -> CatalogSnapshot {
    CatalogSnapshot::new(default_kits(), default_menu())
}

/// Seed rows for a stock store that starts empty.
pub fn default_stock() -> Vec<StockUpdate> {
    default_menu()
        .into_iter()
        .map(|item| StockUpdate::new(item.id, item.stock).with_title(item.title))
        .collect()
}
