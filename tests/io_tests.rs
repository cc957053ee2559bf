use collection_browser::error::CollectionError;
use collection_browser::io::{read_collection, read_collection_str};
use std::io::Write;
use tempfile::NamedTempFile;

// Test fixtures - sample data for testing

fn create_sample_csv_content() -> String {
    r#"Langue,Extension,Code,Nom de la carte,Rareté,1st Edition,Unlimited,Limited / Autre,Quantité,N° Artwork,Reprint
Français (France),LOB,LOB-FR001,Blue-Eyes,Ultra Rare,X,,,5,1,
Anglais (US),LOB,LOB-E001,Blue-Eyes,Ultra Rare,,X,,2,1,
Espagnol,MRD,MRD-S001,Kuriboh,Commune,,,X,10,1,Oui"#
        .to_string()
}

fn create_semicolon_csv_content() -> String {
    r#"Langue;Extension;Code;Nom de la carte;Rareté;Quantité
Français (France);LOB;LOB-FR001;Blue-Eyes;Ultra Rare;5
Anglais (US);LOB;LOB-E001;"Gadget, Rouge";Rare;2"#
        .to_string()
}

// Tests for read_collection_str

#[test]
fn test_read_comma_separated_collection() {
    let rows = read_collection_str(&create_sample_csv_content()).unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0].language, "Français (France)");
    assert_eq!(rows[0].extension, "LOB");
    assert_eq!(rows[0].code, "LOB-FR001");
    assert_eq!(rows[0].name, "Blue-Eyes");
    assert_eq!(rows[0].rarity, "Ultra Rare");
    assert_eq!(rows[0].quantity, 5);
    assert_eq!(rows[0].first_edition, "X");
    assert_eq!(rows[0].edition_label(), "1st");

    assert_eq!(rows[1].edition_label(), "Unlimited");
    assert_eq!(rows[2].edition_label(), "Limited");
    assert_eq!(rows[2].reprint, "Oui");
}

#[test]
fn test_read_semicolon_separated_collection() {
    let rows = read_collection_str(&create_semicolon_csv_content()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].quantity, 5);
    // Comma inside a quoted field must survive the semicolon dialect
    assert_eq!(rows[1].name, "Gadget, Rouge");
}

#[test]
fn test_optional_columns_may_be_absent() {
    let content = r#"Langue,Extension,Code,Nom de la carte,Rareté,Quantité
Français (France),LOB,LOB-FR001,Blue-Eyes,Ultra Rare,5"#;
    let rows = read_collection_str(content).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].first_edition, "");
    assert_eq!(rows[0].artwork_number, "");
    assert_eq!(rows[0].edition_label(), "N/A");
}

#[test]
fn test_missing_required_columns_is_a_single_descriptive_error() {
    let content = r#"Langue,Extension,Nom de la carte
Français (France),LOB,Blue-Eyes"#;
    let err = read_collection_str(content).unwrap_err();
    match err {
        CollectionError::MissingColumns(cols) => {
            assert_eq!(cols, vec!["Code", "Rareté", "Quantité"]);
        }
        other => panic!("expected MissingColumns, got {other}"),
    }
}

#[test]
fn test_unparseable_quantity_defaults_to_zero() {
    let content = r#"Langue,Extension,Code,Nom de la carte,Rareté,Quantité
Français (France),LOB,LOB-FR001,Blue-Eyes,Ultra Rare,abc
Français (France),LOB,LOB-FR002,Kuriboh,Commune,
Français (France),LOB,LOB-FR003,Jinzo,Rare,-3
Français (France),LOB,LOB-FR004,Sangan,Rare,7"#;
    let rows = read_collection_str(content).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].quantity, 0);
    assert_eq!(rows[1].quantity, 0);
    assert_eq!(rows[2].quantity, 0);
    assert_eq!(rows[3].quantity, 7);
}

#[test]
fn test_empty_content_loads_as_empty_collection() {
    assert!(read_collection_str("").unwrap().is_empty());
    assert!(read_collection_str("  \n  ").unwrap().is_empty());
}

#[test]
fn test_header_only_loads_as_empty_collection() {
    let content = "Langue,Extension,Code,Nom de la carte,Rareté,Quantité";
    assert!(read_collection_str(content).unwrap().is_empty());
}

#[test]
fn test_bom_prefix_is_stripped() {
    let content = format!("\u{feff}{}", create_sample_csv_content());
    let rows = read_collection_str(&content).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].language, "Français (France)");
}

#[test]
fn test_quoted_fields_and_unicode() {
    let content = r#"Langue,Extension,Code,Nom de la carte,Rareté,Quantité
Français (France),LOB,LOB-FR001,"Dragon ""Ultime"", le Grand",Secrète Rare,3"#;
    let rows = read_collection_str(content).unwrap();
    assert_eq!(rows[0].name, r#"Dragon "Ultime", le Grand"#);
}

#[test]
fn test_whitespace_is_trimmed() {
    let content = r#"Langue,Extension,Code,Nom de la carte,Rareté,Quantité
  Français (France)  ,  LOB  ,LOB-FR001,  Blue-Eyes  ,Ultra Rare,  5  "#;
    let rows = read_collection_str(content).unwrap();
    assert_eq!(rows[0].language, "Français (France)");
    assert_eq!(rows[0].name, "Blue-Eyes");
    assert_eq!(rows[0].quantity, 5);
}

// Tests for read_collection (file-backed)

#[test]
fn test_read_collection_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", create_sample_csv_content()).unwrap();

    let rows = read_collection(temp_file.path().to_str().unwrap()).unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_read_collection_nonexistent_file() {
    let result = read_collection("/this/file/does/not/exist.csv");
    assert!(result.is_err());
}
