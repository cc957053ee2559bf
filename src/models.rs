use serde::{Deserialize, Deserializer, Serialize};

/// One inventory row: a set of owned copies of a card printing.
///
/// Field names follow the French export headers of the collection file.
/// `quantity` is parsed leniently: a cell that is not a non-negative integer
/// loads as 0 so a single bad cell does not void the whole file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CardRow {
    #[serde(rename = "Langue")]
    pub language: String,
    #[serde(rename = "Extension")]
    pub extension: String,
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Nom de la carte")]
    pub name: String,
    #[serde(rename = "Rareté")]
    pub rarity: String,
    #[serde(rename = "Quantité", deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    #[serde(rename = "1st Edition", default)]
    pub first_edition: String,
    #[serde(rename = "Unlimited", default)]
    pub unlimited: String,
    #[serde(rename = "Limited / Autre", default)]
    pub limited_other: String,
    #[serde(rename = "N° Artwork", default)]
    pub artwork_number: String,
    #[serde(rename = "Reprint", default)]
    pub reprint: String,
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse::<u32>().unwrap_or(0))
}

impl CardRow {
    /// Edition label derived from whichever printing flag is set
    pub fn edition_label(&self) -> &'static str {
        if !self.first_edition.trim().is_empty() {
            "1st"
        } else if !self.unlimited.trim().is_empty() {
            "Unlimited"
        } else if !self.limited_other.trim().is_empty() {
            "Limited"
        } else {
            "N/A"
        }
    }
}

/// A sale selection in the cart, keyed by (code, edition)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CartItem {
    pub card_name: String,
    pub extension: String,
    pub code: String,
    pub rarity: String,
    /// "1st", "Unlimited", "Limited" or "N/A"
    pub edition: String,
    pub quantity: u32,
    /// Sellable quantity computed by the allocation engine at add time.
    /// The engine is the sole source of truth for this cap.
    pub max_quantity: u32,
}
