use crate::allocation::{AggregatedCard, AllocatedCopy};
use crate::scoring::rarity_display_name;

/// Per-card breakdown of the keep/sell allocation
pub fn format_allocation_summary(cards: &[AggregatedCard]) -> String {
    let mut output = String::new();

    for card in cards {
        let owned: u32 = card.copies.iter().map(|c| c.row.quantity).sum();
        output.push_str(&format!(
            "{} (owned: {}, keep target: {}, groups: {})\n",
            card.card_name, owned, card.total_to_keep, card.num_diversity_groups
        ));

        for copy in &card.copies {
            output.push_str(&format!(
                "    {} [{}] {} x{}: keep {} ({} diversity + {} extra), sell {}\n",
                copy.row.extension,
                rarity_display_name(&copy.row.rarity),
                copy.row.language,
                copy.row.quantity,
                copy.keep_total,
                copy.keep_for_diversity,
                copy.extra_keep,
                copy.to_sell
            ));
        }

        output.push('\n');
    }

    let total_owned: u32 = cards
        .iter()
        .flat_map(|card| card.copies.iter())
        .map(|c| c.row.quantity)
        .sum();
    let total_for_sale: u32 = cards.iter().map(|card| card.total_for_sale).sum();

    output.push_str("========================\n");
    output.push_str(&format!("Cards owned: {total_owned}\n"));
    output.push_str(&format!("Copies for sale: {total_for_sale}\n"));

    output
}

/// Aligned listing of the sellable copies
pub fn format_marketplace_listing(items: &[&AllocatedCopy]) -> String {
    if items.is_empty() {
        return "Nothing for sale.\n".to_string();
    }

    let mut max_name_len = 4; // "Name"
    let mut max_code_len = 4;
    let mut max_ext_len = 3;
    let mut max_rarity_len = 6;
    let mut max_lang_len = 8;

    for item in items {
        max_name_len = max_name_len.max(item.row.name.chars().count());
        max_code_len = max_code_len.max(item.row.code.chars().count());
        max_ext_len = max_ext_len.max(item.row.extension.chars().count());
        max_rarity_len = max_rarity_len.max(rarity_display_name(&item.row.rarity).chars().count());
        max_lang_len = max_lang_len.max(item.row.language.chars().count());
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name$}  {:<code$}  {:<ext$}  {:<rarity$}  {:<lang$}  {:<9}  Qty\n",
        "Name",
        "Code",
        "Ext",
        "Rarity",
        "Language",
        "Edition",
        name = max_name_len,
        code = max_code_len,
        ext = max_ext_len,
        rarity = max_rarity_len,
        lang = max_lang_len,
    ));

    for item in items {
        output.push_str(&format!(
            "{:<name$}  {:<code$}  {:<ext$}  {:<rarity$}  {:<lang$}  {:<9}  {}\n",
            item.row.name,
            item.row.code,
            item.row.extension,
            rarity_display_name(&item.row.rarity),
            item.row.language,
            item.row.edition_label(),
            item.to_sell,
            name = max_name_len,
            code = max_code_len,
            ext = max_ext_len,
            rarity = max_rarity_len,
            lang = max_lang_len,
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::allocate_collection;
    use crate::marketplace::project_marketplace;
    use crate::models::CardRow;

    fn row(name: &str, extension: &str, rarity: &str, language: &str, quantity: u32) -> CardRow {
        CardRow {
            language: language.to_string(),
            extension: extension.to_string(),
            code: format!("{}-FR001", extension),
            name: name.to_string(),
            rarity: rarity.to_string(),
            quantity,
            first_edition: String::new(),
            unlimited: String::new(),
            limited_other: String::new(),
            artwork_number: String::new(),
            reprint: String::new(),
        }
    }

    #[test]
    fn test_allocation_summary_contains_breakdown_and_totals() {
        let cards = allocate_collection(vec![
            row("Blue-Eyes", "LOB", "Ultra Rare", "Français (France)", 5),
            row("Blue-Eyes", "LOB", "Ultra Rare", "Anglais (US)", 2),
        ]);
        let output = format_allocation_summary(&cards);

        assert!(output.contains("Blue-Eyes (owned: 7, keep target: 3, groups: 1)"));
        assert!(output.contains("keep 3 (1 diversity + 2 extra), sell 2"));
        assert!(output.contains("Cards owned: 7"));
        assert!(output.contains("Copies for sale: 4"));
    }

    #[test]
    fn test_marketplace_listing_shows_short_rarity_codes() {
        let cards = allocate_collection(vec![row(
            "Kuriboh",
            "MRD",
            "Commune",
            "Espagnol",
            10,
        )]);
        let items = project_marketplace(&cards);
        let output = format_marketplace_listing(&items);

        assert!(output.contains("Kuriboh"));
        // Full rarity name renders as its short code
        assert!(output.contains(" C "));
        assert!(output.contains("N/A"));
    }

    #[test]
    fn test_marketplace_listing_empty() {
        assert_eq!(format_marketplace_listing(&[]), "Nothing for sale.\n");
    }
}
