use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Performance metrics returned by the analytics service's `/analyze` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub expected_annual_return: f64,
    pub volatility_risk: f64,
    pub sharpe_ratio: f64,
    pub portfolio_allocation: Allocation,
    pub growth_chart: Vec<GrowthPoint>,
}

/// Symbol -> weight mapping that keeps the order the service wrote the keys in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Allocation(Vec<(String, f64)>);

impl Allocation {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(symbol, weight)| (symbol.as_str(), *weight))
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.iter().find(|(s, _)| *s == symbol).map(|(_, w)| w)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Allocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (symbol, weight) in &self.0 {
            map.serialize_entry(symbol, weight)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Allocation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AllocationVisitor;

        impl<'de> Visitor<'de> for AllocationVisitor {
            type Value = Allocation;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of symbol to weight")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Allocation, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((symbol, weight)) = access.next_entry::<String, f64>()? {
                    // Later duplicates overwrite in place, like a JSON object would.
                    match entries
                        .iter_mut()
                        .find(|entry: &&mut (String, f64)| entry.0 == symbol)
                    {
                        Some(existing) => existing.1 = weight,
                        None => entries.push((symbol, weight)),
                    }
                }
                Ok(Allocation(entries))
            }
        }

        deserializer.deserialize_map(AllocationVisitor)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthRegime {
    #[default]
    Historical,
    Predicted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub date: String,
    pub value: f64,
    /// Older service builds omit the field; their points are all historical.
    #[serde(rename = "type", default)]
    pub regime: GrowthRegime,
}

/// Pairwise correlation of the selected assets, as returned by `/correlation`.
///
/// `labels[i]` names both row `i` and column `i` of `matrix`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub labels: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

/// Both halves of a successful analysis. Never exists partially populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisBundle {
    pub performance: AnalysisResult,
    pub correlation: CorrelationResult,
}
