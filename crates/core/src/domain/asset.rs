use serde::Serialize;

/// A selectable instrument. `symbol` is the identifier sent to the analytics service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Asset {
    pub label: &'static str,
    pub symbol: &'static str,
}

impl Asset {
    pub const fn new(label: &'static str, symbol: &'static str) -> Self {
        Self { label, symbol }
    }
}

const CATALOG: [Asset; 15] = [
    Asset::new("Apple Inc.", "AAPL"),
    Asset::new("Microsoft Corp.", "MSFT"),
    Asset::new("Alphabet Inc. (Google)", "GOOGL"),
    Asset::new("Amazon.com Inc.", "AMZN"),
    Asset::new("NVIDIA Corp.", "NVDA"),
    Asset::new("Tesla Inc.", "TSLA"),
    Asset::new("Meta Platforms", "META"),
    Asset::new("Berkshire Hathaway", "BRK-B"),
    Asset::new("JPMorgan Chase", "JPM"),
    Asset::new("Visa Inc.", "V"),
    Asset::new("Johnson & Johnson", "JNJ"),
    Asset::new("Walmart Inc.", "WMT"),
    Asset::new("Procter & Gamble", "PG"),
    Asset::new("Mastercard Inc.", "MA"),
    Asset::new("Home Depot", "HD"),
];

// Number of leading catalog entries selected when the dashboard opens.
const DEFAULT_SELECTION_LEN: usize = 3;

/// Static reference list of assets the dashboard offers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetCatalog;

impl AssetCatalog {
    pub fn all(&self) -> &'static [Asset] {
        &CATALOG
    }

    /// Exact, case-sensitive symbol match.
    pub fn lookup(&self, symbol: &str) -> Option<Asset> {
        CATALOG.iter().copied().find(|asset| asset.symbol == symbol)
    }

    pub fn default_selection(&self) -> Vec<Asset> {
        CATALOG[..DEFAULT_SELECTION_LEN].to_vec()
    }
}
