//! Delivery zones and the pickup point.

use serde::{Deserialize, Serialize};

use crate::catalog::Money;

/// Neighborhoods served for one delivery fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryZone {
    pub label: String,
    pub fee: Money,
    pub neighborhoods: Vec<String>,
}

impl DeliveryZone {
    pub fn new<I, T>(label: impl Into<String>, fee: Money, neighborhoods: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            label: label.into(),
            fee,
            neighborhoods: neighborhoods.into_iter().map(Into::into).collect(),
        }
    }

    /// Canonical neighborhood name matching `name`, ignoring case and accents.
    pub fn find(&self, name: &str) -> Option<&str> {
        let wanted = fold(name);
        self.neighborhoods
            .iter()
            .find(|n| fold(n) == wanted)
            .map(String::as_str)
    }
}

/// A neighborhood resolved to its zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneMatch<'a> {
    pub zone: &'a DeliveryZone,
    pub neighborhood: &'a str,
}

/// Ordered list of delivery zones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryZones(Vec<DeliveryZone>);

impl DeliveryZones {
    pub fn new(zones: Vec<DeliveryZone>) -> Self {
        Self(zones)
    }

    pub fn zones(&self) -> &[DeliveryZone] {
        &self.0
    }

    /// Resolves a neighborhood; the first zone listing it wins.
    pub fn locate(&self, neighborhood: &str) -> Option<ZoneMatch<'_>> {
        if neighborhood.trim().is_empty() {
            return None;
        }
        self.0.iter().find_map(|zone| {
            zone.find(neighborhood)
                .map(|neighborhood| ZoneMatch { zone, neighborhood })
        })
    }
}

impl Default for DeliveryZones {
    fn default() -> Self {
        default_zones()
    }
}

/// Zones served from the Catolé kitchen.
pub fn default_zones() -> DeliveryZones {
    DeliveryZones::new(vec![
        DeliveryZone::new(
            "Zona Sul/Leste (Próximos)",
            Money::from_reais(7),
            [
                "Catolé",
                "Sandra Cavalcante",
                "Mirante",
                "Itararé",
                "Vila Cabral",
                "Jardim Paulistano",
                "Tambor",
                "Liberdade",
                "Cruzeiro",
            ],
        ),
        DeliveryZone::new(
            "Zona Central/Norte",
            Money::from_reais(9),
            [
                "Centro",
                "Prata",
                "São José",
                "Alto Branco",
                "Jardim Tavares",
                "Lauritzen",
                "Santo Antônio",
                "Monte Santo",
                "Universitário",
                "Bela Vista",
                "Estação Velha",
            ],
        ),
        DeliveryZone::new(
            "Zonas Afastadas",
            Money::from_reais(12),
            [
                "Malvinas",
                "Bodocongó",
                "Dinamérica",
                "Três Irmãs",
                "Serrotão",
                "Catingueira",
                "Velame",
                "Distrito Industrial",
                "Aluízio Campos",
                "Santa Rosa",
                "Bairro das Cidades",
            ],
        ),
    ])
}

/// Where pickup orders are collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupPoint {
    pub address: String,
    pub city: String,
    pub hours: String,
}

pub fn default_pickup_point() -> PickupPoint {
    PickupPoint {
        address: "Rua Maria Minervina, 375 - Catolé".to_string(),
        city: "Campina Grande - PB".to_string(),
        hours: "Segunda a Sexta: 09h às 18h | Sábado: 09h às 13h".to_string(),
    }
}

// Lowercases and strips the Portuguese diacritics used in neighborhood names.
fn fold(name: &str) -> String {
    name.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}
