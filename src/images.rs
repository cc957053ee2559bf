use crate::error::{CollectionError, CollectionResult};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

const CARDINFO_URL: &str = "https://db.ygoprodeck.com/api/v7/cardinfo.php";
const SETINFO_URL: &str = "https://db.ygoprodeck.com/api/v7/cardsetsinfo.php";
const USER_AGENT: &str = "CollectionBrowser/1.0";

/// Base delay between queued requests
const BASE_DELAY: Duration = Duration::from_millis(50);
/// Ceiling for the adaptive delay after repeated 429 responses
const MAX_DELAY: Duration = Duration::from_millis(1000);
/// Pause before retrying a rate-limited request
const RATE_LIMIT_PAUSE: Duration = Duration::from_secs(2);
/// Bounded retry: give up on a lookup after this many rate-limited attempts
const MAX_ATTEMPTS: u32 = 5;

/// Persistent image-lookup cache.
///
/// `by_code` stores successes and permanent misses (None) keyed by card code;
/// `by_name` is a secondary cache allowing an image found under one code to
/// be reused for another printing of the same card; `failed_codes` marks
/// codes that must not be retried within the session.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ImageCacheStore {
    by_code: HashMap<String, Option<String>>,
    by_name: HashMap<String, String>,
    failed_codes: HashSet<String>,
    #[serde(skip)]
    path: PathBuf,
}

impl ImageCacheStore {
    /// Default cache blob location
    fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("collection_browser")
            .join("image_cache.json")
    }

    /// Open the cache at the default location
    pub fn open_default() -> Self {
        Self::open(Self::default_path())
    }

    /// Load the cache from disk, or start empty if the blob is absent or
    /// corrupt
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<ImageCacheStore>(&content) {
                Ok(mut store) => {
                    log::info!(
                        "Loaded image cache: {} codes, {} names, {} failed",
                        store.by_code.len(),
                        store.by_name.len(),
                        store.failed_codes.len()
                    );
                    store.path = path;
                    store
                }
                Err(e) => {
                    log::warn!("Failed to parse image cache, starting fresh: {}", e);
                    Self {
                        path,
                        ..Self::default()
                    }
                }
            },
            Err(_) => Self {
                path,
                ..Self::default()
            },
        }
    }

    /// Save the cache to disk
    pub fn save(&self) -> CollectionResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(self)?;
        std::fs::write(&self.path, content)?;
        log::debug!("Saved image cache with {} code entries", self.by_code.len());
        Ok(())
    }

    /// Drop every entry and delete the blob
    pub fn clear(&mut self) {
        self.by_code.clear();
        self.by_name.clear();
        self.failed_codes.clear();
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                log::warn!("Failed to remove image cache blob: {}", e);
            }
        }
    }

    /// Forget failed codes and their negative cache entries so they can be
    /// retried on the next session
    pub fn clear_failures(&mut self) {
        let failed = self.failed_codes.len();
        self.failed_codes.clear();
        self.by_code.retain(|_, value| value.is_some());
        log::info!("Cleared {} failed codes from the image cache", failed);
    }

    /// Cached outcome for a code: Some(Some(url)) on success, Some(None) for
    /// a permanent miss, None when the code has never been looked up
    pub fn get_code(&self, code: &str) -> Option<Option<String>> {
        self.by_code.get(code).cloned()
    }

    /// Secondary lookup by card name (lowercased key)
    pub fn get_name(&self, name: &str) -> Option<String> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    pub fn is_failed(&self, code: &str) -> bool {
        self.failed_codes.contains(code)
    }

    /// Record a successful lookup under both keys
    pub fn insert_success(&mut self, code: &str, name: &str, url: &str) {
        self.by_code.insert(code.to_string(), Some(url.to_string()));
        self.by_name.insert(name.to_lowercase(), url.to_string());
    }

    /// Record a permanent miss for this code
    pub fn insert_miss(&mut self, code: &str) {
        self.by_code.insert(code.to_string(), None);
    }

    pub fn mark_failed(&mut self, code: &str) {
        self.failed_codes.insert(code.to_string());
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// Card payload of the ygoprodeck card database
#[derive(Debug, Deserialize, Clone)]
pub struct ApiCard {
    pub name: String,
    #[serde(default)]
    pub card_sets: Vec<ApiCardSet>,
    #[serde(default)]
    pub card_images: Vec<ApiCardImage>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiCardSet {
    #[serde(default)]
    pub set_code: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiCardImage {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_url_small: Option<String>,
    #[serde(default)]
    pub image_url_cropped: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CardInfoResponse {
    #[serde(default)]
    data: Vec<ApiCard>,
}

#[derive(Debug, Deserialize)]
struct SetInfoResponse {
    id: Option<u64>,
    name: Option<String>,
}

lazy_static! {
    static ref RE_FR_REGION: Regex = Regex::new(r"-FR([A-Z]?\d)").unwrap();
    static ref RE_CA_REGION: Regex = Regex::new(r"-CA(\d)").unwrap();
    static ref RE_F_SUFFIX: Regex = Regex::new(r"-F(\d)").unwrap();
    static ref RE_EN_LETTER: Regex = Regex::new(r"-EN[A-Z](\d)").unwrap();
    static ref RE_SHORT_NUMBER: Regex = Regex::new(r"-(EN)?(\d{1,2})$").unwrap();
    static ref RE_THREE_DIGITS: Regex = Regex::new(r"-\d{3}$").unwrap();
}

/// Prefixes of regional sets the card database does not carry
const REGIONAL_PREFIXES: &[&str] = &["L5DD", "LDD"];

/// Starter-deck prefixes whose database spelling differs from the French one
const STARTER_DECK_MAP: &[(&str, &str)] = &[
    ("DDK", "SDK"),
    ("DDJ", "SDJ"),
    ("DDY", "SDY"),
    ("DDP", "SDP"),
];

fn push_unique(variants: &mut Vec<String>, candidate: String) {
    if !variants.contains(&candidate) {
        variants.push(candidate);
    }
}

/// Rewrites a French collection set code into the candidate spellings the
/// card database may know it under: region markers become `-EN`, short
/// numeric suffixes are zero-padded to three digits, and starter-deck
/// prefixes are translated. Regional sets resolve to no candidates at all.
pub fn candidate_setcodes(card_code: &str) -> Vec<String> {
    let normalized = card_code.trim().to_uppercase();
    let prefix = normalized.split('-').next().unwrap_or("");

    if REGIONAL_PREFIXES.contains(&prefix) {
        return Vec::new();
    }

    let converted = match STARTER_DECK_MAP.iter().find(|(from, _)| *from == prefix) {
        Some((from, to)) => normalized.replacen(from, to, 1),
        None => normalized.clone(),
    };
    let converted = RE_FR_REGION.replace_all(&converted, "-EN$1").into_owned();
    let converted = RE_CA_REGION.replace_all(&converted, "-EN$1").into_owned();

    let mut variants: Vec<String> = Vec::new();

    if converted.contains("-F") && !converted.contains("-FR") {
        push_unique(
            &mut variants,
            RE_F_SUFFIX.replace_all(&converted, "-$1").into_owned(),
        );
    }
    push_unique(&mut variants, converted.clone());

    let cleaned = RE_EN_LETTER.replace_all(&converted, "-EN$1").into_owned();
    if cleaned != converted {
        push_unique(&mut variants, cleaned);
    }

    for code in variants.clone() {
        let padded = RE_SHORT_NUMBER
            .replace(&code, |caps: &regex::Captures| {
                let region = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("-{}{:0>3}", region, &caps[2])
            })
            .into_owned();
        if padded != code {
            push_unique(&mut variants, padded);
        }
    }

    variants
        .into_iter()
        .filter(|code| code.contains("-EN") || RE_THREE_DIGITS.is_match(code))
        .collect()
}

/// Best image URL for a card: the cropped art when available, then the small
/// rendition, then the full one
fn extract_image(card: &ApiCard) -> Option<String> {
    let image = card.card_images.first()?;
    image
        .image_url_cropped
        .clone()
        .or_else(|| image.image_url_small.clone())
        .or_else(|| image.image_url.clone())
}

/// Among a name-search result, prefer the card whose printings carry one of
/// our candidate set codes, trying exact matches before prefix matches
fn find_card_by_setcode<'a>(cards: &'a [ApiCard], candidates: &[String]) -> Option<&'a ApiCard> {
    for candidate in candidates {
        let exact = cards.iter().find(|card| {
            card.card_sets
                .iter()
                .any(|set| set.set_code.to_uppercase() == *candidate)
        });
        if exact.is_some() {
            return exact;
        }
    }

    for candidate in candidates {
        let prefix = candidate.split('-').next().unwrap_or("");
        if prefix.len() >= 3 {
            let by_prefix = cards.iter().find(|card| {
                card.card_sets
                    .iter()
                    .any(|set| set.set_code.to_uppercase().starts_with(prefix))
            });
            if by_prefix.is_some() {
                return by_prefix;
            }
        }
    }

    None
}

/// Resolves card artwork URLs against the ygoprodeck database.
///
/// All lookups are serialized through `&mut self`, which also gives
/// single-flight behavior per code: a second request for a code hits the
/// cache filled by the first. Requests are spaced by an adaptive delay that
/// doubles on rate limiting and resets on success.
pub struct ImageResolver {
    client: reqwest::blocking::Client,
    cache: ImageCacheStore,
    delay: Duration,
}

impl ImageResolver {
    pub fn new(cache: ImageCacheStore) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            cache,
            delay: BASE_DELAY,
        }
    }

    pub fn cache(&self) -> &ImageCacheStore {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ImageCacheStore {
        &mut self.cache
    }

    /// Resolve the artwork URL for a card code, consulting the caches first.
    ///
    /// Returns None for codes the database does not know; that outcome is
    /// cached and not retried within the session. Transport errors also
    /// yield None, they are never surfaced to the caller.
    pub fn resolve(&mut self, card_code: &str, card_name: &str) -> Option<String> {
        if let Some(outcome) = self.cache.get_code(card_code) {
            return outcome;
        }

        // An image found under a sibling code is reused and backfilled
        if let Some(url) = self.cache.get_name(card_name) {
            self.cache.insert_success(card_code, card_name, &url);
            self.persist_cache();
            return Some(url);
        }

        if self.cache.is_failed(card_code) {
            self.cache.insert_miss(card_code);
            self.persist_cache();
            return None;
        }

        match self.lookup(card_code, card_name) {
            Ok(Some(url)) => {
                self.cache.insert_success(card_code, card_name, &url);
                self.persist_cache();
                Some(url)
            }
            Ok(None) => {
                log::info!("No image found for {} ({})", card_code, card_name);
                self.cache.mark_failed(card_code);
                self.cache.insert_miss(card_code);
                self.persist_cache();
                None
            }
            Err(e) => {
                log::error!("Image lookup failed for {}: {}", card_code, e);
                self.cache.insert_miss(card_code);
                self.persist_cache();
                None
            }
        }
    }

    /// Write the cache to disk after a mutation; persistence failures are
    /// logged, never surfaced
    fn persist_cache(&mut self) {
        if let Err(e) = self.cache.save() {
            log::warn!("Failed to persist image cache: {}", e);
        }
    }

    fn lookup(&mut self, card_code: &str, card_name: &str) -> CollectionResult<Option<String>> {
        let candidates = candidate_setcodes(card_code);
        log::debug!("{} -> candidates {:?}", card_code, candidates);

        // First try the exact set-code endpoint per candidate
        for candidate in &candidates {
            if !candidate.contains('-') {
                continue;
            }
            let set_info: Option<SetInfoResponse> =
                self.fetch_json(SETINFO_URL, &[("setcode", candidate.as_str())])?;
            let Some(set_info) = set_info else { continue };
            let Some(id) = set_info.id else { continue };

            log::debug!(
                "Found set {} via {}",
                set_info.name.as_deref().unwrap_or("?"),
                candidate
            );
            if let Some(cards) = self.fetch_cards(&[("id", id.to_string().as_str())])? {
                if let Some(url) = cards.first().and_then(extract_image) {
                    return Ok(Some(url));
                }
            }
        }

        // Then a French name search, preferring a printing with our set code
        let french = self.fetch_cards(&[("fname", card_name), ("language", "fr")])?;
        if let Some(cards) = &french {
            let target = find_card_by_setcode(cards, &candidates).or_else(|| cards.first());
            if let Some(url) = target.and_then(extract_image) {
                return Ok(Some(url));
            }
        }

        // English fallback only when the French search matched something
        if french.is_some() {
            if let Some(cards) = self.fetch_cards(&[("fname", card_name)])? {
                let target = find_card_by_setcode(&cards, &candidates).or_else(|| cards.first());
                if let Some(url) = target.and_then(extract_image) {
                    return Ok(Some(url));
                }
            }
        }

        Ok(None)
    }

    fn fetch_cards(&mut self, params: &[(&str, &str)]) -> CollectionResult<Option<Vec<ApiCard>>> {
        let payload: Option<CardInfoResponse> = self.fetch_json(CARDINFO_URL, params)?;
        Ok(payload.and_then(|p| if p.data.is_empty() { None } else { Some(p.data) }))
    }

    /// One GET with the adaptive delay and a bounded retry loop. HTTP 400 and
    /// 404 are reported as Ok(None): the database simply has no match.
    fn fetch_json<T: DeserializeOwned>(
        &mut self,
        url: &str,
        params: &[(&str, &str)],
    ) -> CollectionResult<Option<T>> {
        for attempt in 1..=MAX_ATTEMPTS {
            std::thread::sleep(self.delay);

            let response = self
                .client
                .get(url)
                .query(params)
                .header("User-Agent", USER_AGENT)
                .send()?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                self.delay = (self.delay * 2).min(MAX_DELAY);
                log::warn!(
                    "Rate limit hit (429), slowing down (attempt {}/{})",
                    attempt,
                    MAX_ATTEMPTS
                );
                std::thread::sleep(RATE_LIMIT_PAUSE);
                continue;
            }

            if status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND {
                return Ok(None);
            }

            if !status.is_success() {
                return Err(CollectionError::HttpStatus(status));
            }

            self.delay = BASE_DELAY;
            return Ok(Some(response.json::<T>()?));
        }

        log::warn!("Giving up after {} rate-limited attempts", MAX_ATTEMPTS);
        Err(CollectionError::HttpStatus(StatusCode::TOO_MANY_REQUESTS))
    }
}
