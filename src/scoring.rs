use lazy_static::lazy_static;
use std::collections::HashMap;

/// Rarity table: (short code, full display name, score), ordered from most to
/// least valuable. Both spellings of a rarity map to the same score, and the
/// table order decides which code wins the score-based reverse lookup.
const RARITY_TABLE: &[(&str, &str, i32)] = &[
    ("S10K", "Secrète 10000", 100),
    ("STR", "Starlight Rare", 98),
    ("G", "Ghost Rare", 97),
    ("GG", "Ghost Gold Rare", 96),
    ("QCR", "Secrète Rare Quart de Siècle", 95),
    ("EXS", "Extra Secrète", 94),
    ("RSC", "Remote Secrète Rare", 93),
    ("PHR", "Pharaonique Rare", 92),
    ("COL", "Collector's Rare", 91),
    ("UTR", "Ultimate Rare", 90),
    ("PRG", "Premium Gold Rare", 88),
    ("GS", "Gold Secrète Rare", 86),
    ("GLD", "Gold Rare", 84),
    ("SPL", "Secrète Platinum", 83),
    ("SCRB", "Secret Rare Blasonnée", 82),
    ("SCR", "Secrète Rare", 80),
    ("PLA", "Platinum Rare", 78),
    ("PRI", "Prismatique", 77),
    ("PAR", "Parallèle Rare", 74),
    ("UAR", "Ultra Argent", 73),
    ("UVE", "Ultra Rare Vert", 73),
    ("UVI", "Ultra Rare Violet", 73),
    ("URO", "Ultra Rare Rouge", 73),
    ("UBL", "Ultra Rare Bleu", 72),
    ("UB", "Ultra Blasonnée", 72),
    ("UDT", "Ultra Rare Duel Terminal", 71),
    ("U", "Ultra Rare", 70),
    ("SHA", "Shatterfoil Rare", 66),
    ("SFR", "Starfoil Rare", 65),
    ("MO", "Mosaic Rare", 64),
    ("SDT", "Super Rare Duel Terminal", 63),
    ("SR", "Super Rare", 62),
    ("RVI", "Rare Violet", 58),
    ("RVE", "Rare Vert", 58),
    ("RBR", "Rare Bronze", 58),
    ("RBL", "Rare Bleu", 58),
    ("RRO", "Rare Rouge", 58),
    ("RAR", "Rare Argent", 58),
    ("RDT", "Rare Duel Terminal", 57),
    ("R", "Rare", 56),
    ("CDT", "Commune Duel Terminal", 52),
    ("CPA", "Commune Parallèle", 51),
    ("C", "Commune", 50),
];

lazy_static! {
    static ref RARITY_SCORES: HashMap<&'static str, i32> = {
        let mut m = HashMap::new();
        for &(code, full_name, score) in RARITY_TABLE {
            m.insert(code, score);
            m.insert(full_name, score);
        }
        m
    };
    static ref LANGUAGE_SCORES: HashMap<&'static str, i32> = {
        let mut m = HashMap::new();
        m.insert("Français (France)", 3);
        m.insert("Français (Canada)", 2);
        m.insert("Anglais (Europe)", 2);
        m.insert("Anglais (US)", 2);
        m.insert("Anglais (Monde)", 2);
        m.insert("Espagnol", 1);
        m
    };
}

/// Numeric rank of a rarity label (code or full name). Unknown labels score 0.
pub fn rarity_score(rarity: &str) -> i32 {
    RARITY_SCORES.get(rarity).copied().unwrap_or(0)
}

/// Numeric rank of a language label. Unknown labels score 1, deliberately one
/// above nothing and distinct from the lowest defined score.
pub fn language_score(language: &str) -> i32 {
    LANGUAGE_SCORES.get(language).copied().unwrap_or(1)
}

/// Combined score for one row. The row-index term is a pure tiebreaker: it
/// keeps the ordering strict on exact duplicates without ever reordering
/// rows whose rarity or language scores differ.
pub fn total_score(rarity_score: i32, language_score: i32, row_index: usize) -> f64 {
    rarity_score as f64 * 100.0 + language_score as f64 + row_index as f64 * 1e-6
}

/// Display color for a rarity score bucket
pub fn rarity_color(rarity_score: i32) -> &'static str {
    if rarity_score >= 95 {
        "#ff0000" // Red for ultra rare
    } else if rarity_score >= 80 {
        "#ffd700" // Gold
    } else if rarity_score >= 70 {
        "#c0c0c0" // Silver
    } else if rarity_score >= 60 {
        "#4169e1" // Blue
    } else if rarity_score >= 50 {
        "#808080" // Gray
    } else {
        "#505050" // Dark gray
    }
}

/// Short display code for a rarity label.
///
/// Labels of up to 4 characters are assumed to already be codes and pass
/// through. Full names resolve to the first code in table order carrying the
/// same score; unknown labels pass through unchanged.
pub fn rarity_display_name(rarity: &str) -> String {
    let label = rarity.trim();
    if label.chars().count() <= 4 {
        return label.to_string();
    }

    if let Some(&(_, _, score)) = RARITY_TABLE.iter().find(|&&(_, name, _)| name == label) {
        for &(code, _, code_score) in RARITY_TABLE {
            if code_score == score && code.chars().count() <= 4 {
                return code.to_string();
            }
        }
    }

    label.to_string()
}

/// Full display name for a rarity code. Full names and unknown labels pass
/// through unchanged.
pub fn rarity_full_name(rarity: &str) -> String {
    let label = rarity.trim();
    match RARITY_TABLE.iter().find(|&&(code, _, _)| code == label) {
        Some(&(_, full_name, _)) => full_name.to_string(),
        None => label.to_string(),
    }
}
