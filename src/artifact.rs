//! Artifact naming and ordering.
//!
//! ```text
//! histograms: <datatype>-el<N>-par<M>.png     (legacy: <datatype>-<N>.png)
//! trends:     overall_<datatype>.png          (legacy: overall.png)
//! ```
//!
//! Trend artifacts come first, then per-configuration histograms in
//! (datatype, parallelism, element count) order.

use crate::aggregate::Aggregator;
use crate::configuration::NameLayout;
use crate::render::TrendSeries;
use crate::store::LatencyResult;

/// File name of the legacy single trend plot.
pub const LEGACY_TREND_ARTIFACT: &str = "overall.png";

/// Histogram artifact name for one result.
pub fn histogram_artifact_name(result: &LatencyResult) -> String {
    match result.layout {
        NameLayout::Current => format!(
            "{}-el{}-par{}.png",
            result.datatype(),
            result.numelements(),
            result.parallel()
        ),
        NameLayout::Legacy => format!("{}-{}.png", result.datatype(), result.numelements()),
    }
}

/// Trend artifact name for one datatype under the current scheme.
pub fn trend_artifact_name(datatype: &str) -> String {
    format!("overall_{datatype}.png")
}

/// A planned trend plot.
#[derive(Clone, Debug, PartialEq)]
pub struct TrendArtifact {
    pub name: String,
    pub title: String,
    pub series: Vec<TrendSeries>,
}

/// A planned histogram plot.
#[derive(Clone, Debug)]
pub struct HistogramArtifact<'a> {
    pub name: String,
    pub result: &'a LatencyResult,
}

/// Every artifact a run will produce, in report order.
#[derive(Clone, Debug)]
pub struct ArtifactPlan<'a> {
    pub layout: NameLayout,
    pub trends: Vec<TrendArtifact>,
    pub histograms: Vec<HistogramArtifact<'a>>,
}

impl<'a> ArtifactPlan<'a> {
    pub fn build(aggregator: &Aggregator<'a>) -> Self {
        let ordered = aggregator.ordered();
        let layout = if !ordered.is_empty() && ordered.iter().all(|r| r.layout == NameLayout::Legacy)
        {
            NameLayout::Legacy
        } else {
            NameLayout::Current
        };

        let trends = if ordered.is_empty() {
            Vec::new()
        } else {
            match layout {
                NameLayout::Legacy => vec![legacy_trend(aggregator)],
                NameLayout::Current => aggregator
                    .datatypes()
                    .into_iter()
                    .map(|datatype| TrendArtifact {
                        name: trend_artifact_name(datatype),
                        title: datatype.to_string(),
                        series: aggregator
                            .trends(datatype)
                            .into_iter()
                            .map(|(parallel, points)| TrendSeries {
                                label: format!("par{parallel}"),
                                points,
                            })
                            .collect(),
                    })
                    .collect(),
            }
        };

        let histograms = ordered
            .into_iter()
            .map(|result| HistogramArtifact {
                name: histogram_artifact_name(result),
                result,
            })
            .collect();

        Self {
            layout,
            trends,
            histograms,
        }
    }

    /// Artifact names in report order.
    pub fn names(&self) -> Vec<String> {
        self.trends
            .iter()
            .map(|t| t.name.clone())
            .chain(self.histograms.iter().map(|h| h.name.clone()))
            .collect()
    }
}

// Legacy runs only carry parallelism 1, so one series per datatype.
fn legacy_trend(aggregator: &Aggregator<'_>) -> TrendArtifact {
    let series = aggregator
        .datatypes()
        .into_iter()
        .flat_map(|datatype| {
            aggregator
                .trends(datatype)
                .into_iter()
                .map(move |(parallel, points)| TrendSeries {
                    label: if parallel == 1 {
                        datatype.to_string()
                    } else {
                        format!("{datatype} par{parallel}")
                    },
                    points,
                })
        })
        .collect();
    TrendArtifact {
        name: LEGACY_TREND_ARTIFACT.to_string(),
        title: "overall".to_string(),
        series,
    }
}
