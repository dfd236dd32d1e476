use quantfolio_core::config::Settings;
use quantfolio_core::domain::asset::{Asset, AssetCatalog};
use quantfolio_core::orchestrator::DEFAULT_WEIGHTS_TEXT;

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOptions {
    /// Comma-separated symbols. `None` means the catalog's default selection.
    pub assets: Option<String>,

    /// Passed to the validator untouched.
    pub weights_text: String,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            assets: None,
            weights_text: DEFAULT_WEIGHTS_TEXT.to_string(),
        }
    }
}

impl SelectionOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        let mut out = Self::default();

        if let Some(assets) = &settings.default_assets {
            out.assets = Some(assets.clone());
        }

        if let Some(weights) = &settings.default_weights {
            out.weights_text = weights.clone();
        }

        out
    }

    pub fn with_overrides(mut self, assets: Option<String>, weights: Option<String>) -> Self {
        if assets.is_some() {
            self.assets = assets;
        }
        if let Some(weights) = weights {
            self.weights_text = weights;
        }
        self
    }
}

/// Maps user-typed symbols onto catalog assets, keeping the typed order.
///
/// An empty list is returned as-is so the validator can report it.
pub fn resolve_selection(
    catalog: &AssetCatalog,
    symbols: Option<&str>,
) -> anyhow::Result<Vec<Asset>> {
    let Some(symbols) = symbols else {
        return Ok(catalog.default_selection());
    };

    let mut out = Vec::new();
    for raw in symbols.split(',') {
        let symbol = raw.trim().to_ascii_uppercase();
        if symbol.is_empty() {
            continue;
        }

        let asset = catalog.lookup(&symbol).ok_or_else(|| {
            let known: Vec<_> = catalog.all().iter().map(|a| a.symbol).collect();
            anyhow::anyhow!("unknown asset {symbol:?} (known: {})", known.join(", "))
        })?;
        out.push(asset);
    }

    Ok(out)
}
