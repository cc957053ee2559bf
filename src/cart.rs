use crate::error::CollectionResult;
use crate::models::CartItem;
use std::path::{Path, PathBuf};

/// Header of the cart export file
const EXPORT_HEADERS: &[&str] = &["Nom", "Extension", "Code", "Rareté", "Edition", "Quantité"];

/// Sale selections, persisted as a single JSON blob.
///
/// Items are keyed by (code, edition). Quantities never exceed the
/// `max_quantity` cap computed by the allocation engine when the item was
/// added. An absent or corrupt blob loads as an empty cart, never an error.
pub struct Cart {
    items: Vec<CartItem>,
    path: PathBuf,
}

impl Cart {
    /// Default cart blob location
    fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("collection_browser")
            .join("cart.json")
    }

    /// Open the cart at the default location
    pub fn open_default() -> Self {
        Self::open(Self::default_path())
    }

    /// Open a cart backed by the given blob path, loading existing items if
    /// the blob is present and well-formed
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Vec<CartItem>>(&content) {
                Ok(items) => {
                    log::info!("Loaded cart with {} items", items.len());
                    items
                }
                Err(e) => {
                    log::warn!("Failed to parse cart blob, starting empty: {}", e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        Self { items, path }
    }

    /// Persist the cart to its blob path
    pub fn save(&self) -> CollectionResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.items)?;
        std::fs::write(&self.path, content)?;
        log::debug!("Saved cart with {} items", self.items.len());
        Ok(())
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total copies selected across all items
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Add a selection, merging with an existing (code, edition) entry.
    /// The merged quantity is capped at the incoming item's `max_quantity`.
    pub fn add(&mut self, item: CartItem) {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.code == item.code && existing.edition == item.edition)
        {
            Some(existing) => {
                existing.quantity = (existing.quantity + item.quantity).min(item.max_quantity);
            }
            None => self.items.push(item),
        }
    }

    /// Remove the selection with the given key, if present
    pub fn remove(&mut self, code: &str, edition: &str) {
        self.items
            .retain(|item| !(item.code == code && item.edition == edition));
    }

    /// Set the quantity of an existing selection, clamped to 1..=max_quantity
    pub fn set_quantity(&mut self, code: &str, edition: &str, quantity: u32) {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.code == code && item.edition == edition)
        {
            item.quantity = quantity.clamp(1, item.max_quantity);
        }
    }

    /// Empty the cart and delete its blob
    pub fn clear(&mut self) {
        self.items.clear();
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                log::warn!("Failed to remove cart blob: {}", e);
            }
        }
    }

    /// Render the cart as a UTF-8 CSV export with BOM, comma-separated,
    /// standard quoting
    pub fn export_csv(&self) -> CollectionResult<Vec<u8>> {
        let mut out: Vec<u8> = vec![0xEF, 0xBB, 0xBF];

        let mut wtr = csv::Writer::from_writer(&mut out);
        wtr.write_record(EXPORT_HEADERS)?;
        for item in &self.items {
            let quantity = item.quantity.to_string();
            wtr.write_record(&[
                item.card_name.as_str(),
                item.extension.as_str(),
                item.code.as_str(),
                item.rarity.as_str(),
                item.edition.as_str(),
                quantity.as_str(),
            ])?;
        }
        wtr.flush()?;
        drop(wtr);

        Ok(out)
    }

    /// Write the export next to `dir` under the dated default filename,
    /// returning the full path
    pub fn export_to_dir(&self, dir: &Path) -> CollectionResult<PathBuf> {
        let path = dir.join(Self::export_filename());
        std::fs::write(&path, self.export_csv()?)?;
        log::info!("Exported cart to {:?}", path);
        Ok(path)
    }

    /// Dated export filename, e.g. `panier_cartes_2026-08-25.csv`
    pub fn export_filename() -> String {
        format!("panier_cartes_{}.csv", chrono::Local::now().format("%Y-%m-%d"))
    }
}
