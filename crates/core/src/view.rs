//! Presentation-ready structures derived from a successful analysis.
//!
//! Everything here is a pure function of its input and is rebuilt for every analysis.

use crate::domain::analysis::{AnalysisBundle, AnalysisResult, CorrelationResult, GrowthRegime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
}

/// One slice per allocation entry, in the order the service returned them.
pub fn allocation_slices(result: &AnalysisResult) -> Vec<PieSlice> {
    result
        .portfolio_allocation
        .iter()
        .map(|(symbol, weight)| PieSlice {
            name: symbol.to_string(),
            value: weight,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorrelationBucket {
    Neutral,
    High,
    Moderate,
    Low,
}

impl CorrelationBucket {
    /// Exact `1.0` is neutral wherever it appears, not only on the diagonal.
    /// Thresholds are strict, so `0.7` is moderate and `0.3` is low.
    pub fn classify(value: f64) -> Self {
        if value == 1.0 {
            CorrelationBucket::Neutral
        } else if value > 0.7 {
            CorrelationBucket::High
        } else if value > 0.3 {
            CorrelationBucket::Moderate
        } else {
            CorrelationBucket::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationCell {
    pub row: String,
    pub col: String,
    pub value: f64,
    pub bucket: CorrelationBucket,
}

/// Heat-map rows in `labels` order; `cells[i][j]` pairs `labels[i]` with `labels[j]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationGrid {
    pub labels: Vec<String>,
    pub cells: Vec<Vec<CorrelationCell>>,
}

impl CorrelationGrid {
    pub fn iter_cells(&self) -> impl Iterator<Item = &CorrelationCell> {
        self.cells.iter().flatten()
    }
}

pub fn correlation_grid(result: &CorrelationResult) -> CorrelationGrid {
    let cells: Vec<Vec<CorrelationCell>> = result
        .labels
        .iter()
        .zip(&result.matrix)
        .map(|(row_label, row)| {
            result
                .labels
                .iter()
                .zip(row)
                .map(|(col_label, &value)| CorrelationCell {
                    row: row_label.clone(),
                    col: col_label.clone(),
                    value,
                    bucket: CorrelationBucket::classify(value),
                })
                .collect::<Vec<_>>()
        })
        .collect();

    CorrelationGrid {
        labels: result.labels.clone(),
        cells,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GrowthSeries {
    pub historical: Vec<SeriesPoint>,
    pub forecast: Vec<SeriesPoint>,
}

/// Splits the growth chart into its two line segments.
///
/// The forecast segment also carries the last historical point (the bridge), so the two
/// lines meet instead of leaving a gap. Without any historical point there is no bridge.
pub fn growth_series(result: &AnalysisResult) -> GrowthSeries {
    let chart = &result.growth_chart;
    let bridge = chart
        .iter()
        .rposition(|p| p.regime == GrowthRegime::Historical);

    let point = |idx: usize| SeriesPoint {
        date: chart[idx].date.clone(),
        value: chart[idx].value,
    };

    let historical = (0..chart.len())
        .filter(|&i| chart[i].regime == GrowthRegime::Historical)
        .map(point)
        .collect();
    let forecast = (0..chart.len())
        .filter(|&i| chart[i].regime == GrowthRegime::Predicted || Some(i) == bridge)
        .map(point)
        .collect();

    GrowthSeries {
        historical,
        forecast,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: f64,
    pub display: String,
    pub caption: &'static str,
}

/// Headline figures: annual return, volatility, Sharpe ratio.
pub fn metric_cards(result: &AnalysisResult) -> [MetricCard; 3] {
    [
        MetricCard {
            label: "ANNUAL RETURN",
            value: result.expected_annual_return,
            display: format!("{}%", result.expected_annual_return),
            caption: "Expected Performance",
        },
        MetricCard {
            label: "RISK (VOLATILITY)",
            value: result.volatility_risk,
            display: format!("{}%", result.volatility_risk),
            caption: "Standard Deviation",
        },
        MetricCard {
            label: "SHARPE RATIO",
            value: result.sharpe_ratio,
            display: result.sharpe_ratio.to_string(),
            caption: "Risk-Adjusted Return",
        },
    ]
}

/// Everything the dashboard renders for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub metrics: [MetricCard; 3],
    pub allocation: Vec<PieSlice>,
    pub correlation: CorrelationGrid,
    pub growth: GrowthSeries,
}

impl DashboardView {
    pub fn build(analysis: &AnalysisBundle) -> Self {
        Self {
            metrics: metric_cards(&analysis.performance),
            allocation: allocation_slices(&analysis.performance),
            correlation: correlation_grid(&analysis.correlation),
            growth: growth_series(&analysis.performance),
        }
    }
}
