use collection_browser::{
    allocate_collection, format_allocation_summary, format_marketplace_listing,
    project_marketplace, read_collection, sort_items, SortOrder,
};

fn main() {
    // Initialize logger. Set RUST_LOG environment variable to control log level.
    // Examples: RUST_LOG=info, RUST_LOG=warn, RUST_LOG=collection_browser=trace
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("Usage: collection_browser <collection.csv> [--marketplace]");
        std::process::exit(1);
    };
    let show_marketplace = args.iter().any(|a| a == "--marketplace");

    let rows = match read_collection(path) {
        Ok(rows) => rows,
        Err(e) => {
            log::error!("Failed to load collection: {e}");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let cards = allocate_collection(rows);

    if show_marketplace {
        let mut items = project_marketplace(&cards);
        sort_items(&mut items, SortOrder::ByRarity);
        print!("{}", format_marketplace_listing(&items));
    } else {
        print!("{}", format_allocation_summary(&cards));
    }
}
