use crate::models::CardRow;
use crate::scoring;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// One inventory row after scoring and keep/sell allocation
#[derive(Debug, Clone, PartialEq)]
pub struct AllocatedCopy {
    pub row: CardRow,
    pub rarity_score: i32,
    pub language_score: i32,
    pub total_score: f64,
    /// 1 if this row is the retained representative of its (extension, rarity) group
    pub keep_for_diversity: u32,
    /// Copies retained beyond the diversity reservation
    pub extra_keep: u32,
    pub keep_total: u32,
    pub to_sell: u32,
}

/// All rows sharing one card name, with their keep/sell allocation
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedCard {
    pub card_name: String,
    /// Target retained count for this name: max(3, num_diversity_groups)
    pub total_to_keep: u32,
    /// Distinct (extension, rarity) pairs among rows with quantity > 0
    pub num_diversity_groups: usize,
    pub copies: Vec<AllocatedCopy>,
    pub total_for_sale: u32,
}

/// Minimum number of copies retained per card name
const KEEP_FLOOR: u32 = 3;

/// Runs the keep/sell allocation over a whole inventory.
///
/// Rows are grouped by card name (first-seen input order preserved) and each
/// group is allocated independently. Pure and deterministic: the same input
/// list always yields the same output.
pub fn allocate_collection(rows: Vec<CardRow>) -> Vec<AggregatedCard> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<CardRow>> = HashMap::new();

    for row in rows {
        if !groups.contains_key(&row.name) {
            order.push(row.name.clone());
        }
        groups.entry(row.name.clone()).or_default().push(row);
    }

    order
        .into_iter()
        .filter_map(|name| {
            let card_rows = groups.remove(&name)?;
            Some(allocate_card(name, card_rows))
        })
        .collect()
}

/// Allocates keep/sell counts for all rows of a single card name.
///
/// Two-phase policy: first one representative per owned (extension, rarity)
/// group, then a greedy pass over all rows by score to fill the keep budget.
/// Diversity winners compete in the second pass too, with their reserved copy
/// subtracted from what they can still contribute.
fn allocate_card(card_name: String, rows: Vec<CardRow>) -> AggregatedCard {
    // Score every row; the per-group row index is the tiebreaker term
    let mut copies: Vec<AllocatedCopy> = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let rarity_score = scoring::rarity_score(&row.rarity);
            let language_score = scoring::language_score(&row.language);
            let total_score = scoring::total_score(rarity_score, language_score, index);
            AllocatedCopy {
                row,
                rarity_score,
                language_score,
                total_score,
                keep_for_diversity: 0,
                extra_keep: 0,
                keep_total: 0,
                to_sell: 0,
            }
        })
        .collect();

    // Keep target: at least one per owned (extension, rarity) pair, floor of 3
    let owned_groups: HashSet<(&str, &str)> = copies
        .iter()
        .filter(|c| c.row.quantity > 0)
        .map(|c| (c.row.extension.as_str(), c.row.rarity.as_str()))
        .collect();
    let num_diversity_groups = owned_groups.len();
    let total_to_keep = KEEP_FLOOR.max(num_diversity_groups as u32);

    // Diversity pass: highest-scoring owned row of each group keeps one copy
    let mut diversity_groups: HashMap<(String, String), Vec<usize>> = HashMap::new();
    for (i, copy) in copies.iter().enumerate() {
        let key = (copy.row.extension.clone(), copy.row.rarity.clone());
        diversity_groups.entry(key).or_default().push(i);
    }

    for indices in diversity_groups.values() {
        let winner = indices
            .iter()
            .copied()
            .filter(|&i| copies[i].row.quantity > 0)
            .max_by(|&a, &b| compare_scores(copies[a].total_score, copies[b].total_score));
        if let Some(i) = winner {
            copies[i].keep_for_diversity = 1;
        }
    }

    // Remaining-budget pass: greedy over all rows by score descending
    let already_kept: u32 = copies.iter().map(|c| c.keep_for_diversity).sum();
    let remaining_to_keep = total_to_keep.saturating_sub(already_kept);

    let mut by_score: Vec<usize> = (0..copies.len()).collect();
    by_score.sort_by(|&a, &b| compare_scores(copies[b].total_score, copies[a].total_score));

    let mut allocated = 0u32;
    for i in by_score {
        if allocated >= remaining_to_keep {
            copies[i].extra_keep = 0;
            continue;
        }
        let available = copies[i].row.quantity - copies[i].keep_for_diversity;
        let take = available.min(remaining_to_keep - allocated);
        copies[i].extra_keep = take;
        allocated += take;
    }

    for copy in &mut copies {
        copy.keep_total = copy.keep_for_diversity + copy.extra_keep;
        copy.to_sell = copy.row.quantity - copy.keep_total;
    }

    let total_for_sale = copies.iter().map(|c| c.to_sell).sum();

    AggregatedCard {
        card_name,
        total_to_keep,
        num_diversity_groups,
        copies,
        total_for_sale,
    }
}

// Scores are finite by construction, so the comparison is total
fn compare_scores(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
