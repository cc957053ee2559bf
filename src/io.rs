use crate::error::{CollectionError, CollectionResult};
use crate::models::CardRow;
use std::fs;

/// Columns every inventory file must carry. Everything else is passthrough
/// display data.
const REQUIRED_COLUMNS: &[&str] = &[
    "Langue",
    "Extension",
    "Code",
    "Nom de la carte",
    "Rareté",
    "Quantité",
];

/// Picks the delimiter by inspecting the header line. Collection exports come
/// in both comma- and semicolon-separated flavors.
pub fn detect_delimiter(header_line: &str) -> u8 {
    let semicolons = header_line.matches(';').count();
    let commas = header_line.matches(',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Loads a collection inventory file.
///
/// The header row is validated eagerly: any missing required column rejects
/// the whole file with a descriptive error, there is no partial catalog.
pub fn read_collection(path: &str) -> CollectionResult<Vec<CardRow>> {
    let content = fs::read_to_string(path)?;
    read_collection_str(&content)
}

/// Parses inventory rows from already-loaded CSV text
pub fn read_collection_str(content: &str) -> CollectionResult<Vec<CardRow>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let header_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(header_line);

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .map(|required| required.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(CollectionError::MissingColumns(missing));
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: CardRow = result?;
        rows.push(row);
    }

    log::info!("Loaded {} inventory rows", rows.len());
    Ok(rows)
}
