use crate::allocation::{AggregatedCard, AllocatedCopy};

/// Sort orders offered by the marketplace view
#[derive(PartialEq, Clone, Copy)]
pub enum SortOrder {
    ByName,
    ByRarity,
    ByQuantity,
}

/// Client-side filters over the marketplace projection. Empty fields match
/// everything.
#[derive(Debug, Default, Clone)]
pub struct MarketplaceFilter {
    pub rarity: Option<String>,
    pub language: Option<String>,
    pub extension: Option<String>,
    /// Case-insensitive free text over card name and code
    pub search: Option<String>,
}

/// Flattens the allocation output down to the sellable copies (to_sell > 0).
/// A pure filter; the allocation engine remains the source of truth for the
/// quantities.
pub fn project_marketplace(cards: &[AggregatedCard]) -> Vec<&AllocatedCopy> {
    cards
        .iter()
        .flat_map(|card| card.copies.iter())
        .filter(|copy| copy.to_sell > 0)
        .collect()
}

/// Applies the given filters over projected items
pub fn filter_items<'a>(
    items: &[&'a AllocatedCopy],
    filter: &MarketplaceFilter,
) -> Vec<&'a AllocatedCopy> {
    let search = filter.search.as_deref().map(str::to_lowercase);

    items
        .iter()
        .copied()
        .filter(|item| {
            if let Some(rarity) = &filter.rarity {
                if &item.row.rarity != rarity {
                    return false;
                }
            }
            if let Some(language) = &filter.language {
                if &item.row.language != language {
                    return false;
                }
            }
            if let Some(extension) = &filter.extension {
                if &item.row.extension != extension {
                    return false;
                }
            }
            if let Some(needle) = &search {
                let name = item.row.name.to_lowercase();
                let code = item.row.code.to_lowercase();
                if !name.contains(needle.as_str()) && !code.contains(needle.as_str()) {
                    return false;
                }
            }
            true
        })
        .collect()
}

/// Sorts projected items in place
pub fn sort_items(items: &mut [&AllocatedCopy], order: SortOrder) {
    match order {
        SortOrder::ByName => {
            items.sort_by(|a, b| a.row.name.cmp(&b.row.name).then(a.row.code.cmp(&b.row.code)));
        }
        SortOrder::ByRarity => {
            items.sort_by(|a, b| {
                b.rarity_score
                    .cmp(&a.rarity_score)
                    .then(a.row.name.cmp(&b.row.name))
            });
        }
        SortOrder::ByQuantity => {
            items.sort_by(|a, b| {
                b.to_sell
                    .cmp(&a.to_sell)
                    .then(a.row.name.cmp(&b.row.name))
            });
        }
    }
}
