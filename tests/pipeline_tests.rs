use collection_browser::io::read_collection_str;
use collection_browser::{
    allocate_collection, filter_items, project_marketplace, sort_items, Cart, CartItem,
    MarketplaceFilter, SortOrder,
};
use tempfile::TempDir;

fn sample_collection() -> &'static str {
    r#"Langue,Extension,Code,Nom de la carte,Rareté,1st Edition,Unlimited,Limited / Autre,Quantité,N° Artwork,Reprint
Français (France),LOB,LOB-FR001,Blue-Eyes,Ultra Rare,X,,,5,1,
Anglais (US),LOB,LOB-E001,Blue-Eyes,Ultra Rare,,X,,2,1,
Espagnol,MRD,MRD-S060,Kuriboh,Commune,,,X,10,1,
Français (France),PSV,PSV-FR102,Jinzo,Secrète Rare,X,,,2,1,"#
}

#[test]
fn test_full_pipeline_from_csv_to_marketplace() {
    let rows = read_collection_str(sample_collection()).unwrap();
    let cards = allocate_collection(rows);
    assert_eq!(cards.len(), 3);

    // Blue-Eyes: one diversity group, keep 3 from the French row
    let blue_eyes = &cards[0];
    assert_eq!(blue_eyes.card_name, "Blue-Eyes");
    assert_eq!(blue_eyes.total_to_keep, 3);
    assert_eq!(blue_eyes.total_for_sale, 4);

    // Jinzo owns 2 of a keep floor of 3: nothing sellable
    let jinzo = &cards[2];
    assert_eq!(jinzo.total_for_sale, 0);

    let mut items = project_marketplace(&cards);
    assert!(items.iter().all(|i| i.to_sell > 0));
    assert!(items.iter().all(|i| i.row.name != "Jinzo"));

    sort_items(&mut items, SortOrder::ByQuantity);
    assert_eq!(items[0].row.name, "Kuriboh");
    assert_eq!(items[0].to_sell, 7);

    let filter = MarketplaceFilter {
        search: Some("blue".to_string()),
        ..Default::default()
    };
    let filtered = filter_items(&items, &filter);
    assert_eq!(filtered.len(), 2);
}

#[test]
fn test_pipeline_is_deterministic() {
    let run = || {
        let rows = read_collection_str(sample_collection()).unwrap();
        allocate_collection(rows)
    };
    assert_eq!(run(), run());
}

#[test]
fn test_cart_caps_at_engine_computed_quantity() {
    let rows = read_collection_str(sample_collection()).unwrap();
    let cards = allocate_collection(rows);
    let items = project_marketplace(&cards);

    let kuriboh = items
        .iter()
        .find(|i| i.row.name == "Kuriboh")
        .expect("Kuriboh is sellable");

    let dir = TempDir::new().unwrap();
    let mut cart = Cart::open(dir.path().join("cart.json"));
    cart.add(CartItem {
        card_name: kuriboh.row.name.clone(),
        extension: kuriboh.row.extension.clone(),
        code: kuriboh.row.code.clone(),
        rarity: kuriboh.row.rarity.clone(),
        edition: kuriboh.row.edition_label().to_string(),
        quantity: 3,
        max_quantity: kuriboh.to_sell,
    });
    // A second add of the same key merges and clamps to the engine's cap
    cart.add(CartItem {
        card_name: kuriboh.row.name.clone(),
        extension: kuriboh.row.extension.clone(),
        code: kuriboh.row.code.clone(),
        rarity: kuriboh.row.rarity.clone(),
        edition: kuriboh.row.edition_label().to_string(),
        quantity: 100,
        max_quantity: kuriboh.to_sell,
    });

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.items()[0].quantity, kuriboh.to_sell);

    cart.save().unwrap();
    let exported = cart.export_csv().unwrap();
    let text = String::from_utf8(exported[3..].to_vec()).unwrap();
    assert!(text.starts_with("Nom,Extension,Code,Rareté,Edition,Quantité"));
    assert!(text.contains("Kuriboh,MRD,MRD-S060,Commune,Limited,7"));
}
