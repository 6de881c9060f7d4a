//! Reshaping of backend trend and distribution payloads into chart series.
//! Charts are drawn as CSS bars, so every value also carries its height
//! relative to the largest one.

use serde::Serialize;

use super::dashboard::{LabelledCounts, TrendPoint};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: String,
    pub height_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub count: f64,
    pub percent: u32,
}

impl ChartSeries {
    pub fn from_trend(points: &[TrendPoint]) -> Self {
        ChartSeries {
            labels: points.iter().map(|p| p.label.clone()).collect(),
            values: points.iter().map(|p| p.rate).collect(),
        }
    }

    /// Pairs labels with values; surplus entries on either side are dropped.
    pub fn from_counts(counts: &LabelledCounts) -> Self {
        let len = counts.labels.len().min(counts.values.len());
        ChartSeries { labels: counts.labels[..len].to_vec(), values: counts.values[..len].to_vec() }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Bars scaled against `ceiling`, or against the largest value when no
    /// ceiling is given. `suffix` is appended to the printed value.
    pub fn bars(&self, ceiling: Option<f64>, suffix: &str) -> Vec<Bar> {
        let top = ceiling.unwrap_or_else(|| self.max());
        self.labels
            .iter()
            .zip(&self.values)
            .map(|(label, value)| Bar {
                label: label.clone(),
                value: format!("{}{suffix}", trim_number(*value)),
                height_pct: if top > 0.0 { ((value / top) * 100.0).round().clamp(0.0, 100.0) as u32 } else { 0 },
            })
            .collect()
    }

    pub fn shares(&self) -> Vec<Share> {
        let total = self.total();
        self.labels
            .iter()
            .zip(&self.values)
            .map(|(label, value)| Share {
                label: label.clone(),
                count: *value,
                percent: if total > 0.0 { ((value / total) * 100.0).round() as u32 } else { 0 },
            })
            .collect()
    }
}

/// Arithmetic mean of the series, rounded to one decimal.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// "12" for whole numbers, "91.5" otherwise.
fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 { format!("{value:.0}") } else { format!("{value:.1}") }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(label: &str, rate: f64) -> TrendPoint {
        TrendPoint { label: label.into(), rate, ..Default::default() }
    }

    #[test]
    fn trend_to_percentage_bars() {
        let series = ChartSeries::from_trend(&[point("Mon", 90.0), point("Tue", 45.5)]);
        let bars = series.bars(Some(100.0), "%");
        assert_eq!(bars[0].value, "90%");
        assert_eq!(bars[0].height_pct, 90);
        assert_eq!(bars[1].value, "45.5%");
        assert_eq!(bars[1].height_pct, 46);
    }

    #[test]
    fn counts_scale_to_largest() {
        let counts = LabelledCounts { labels: vec!["Jan".into(), "Feb".into(), "Mar".into()], values: vec![2.0, 4.0] };
        let series = ChartSeries::from_counts(&counts);
        assert_eq!(series.labels.len(), 2);
        let bars = series.bars(None, "");
        assert_eq!(bars[0].height_pct, 50);
        assert_eq!(bars[1].height_pct, 100);
    }

    #[test]
    fn shares_sum_to_hundred_for_even_split() {
        let series = ChartSeries { labels: vec!["Monthly".into(), "Annual".into()], values: vec![3.0, 1.0] };
        let shares = series.shares();
        assert_eq!(shares[0].percent, 75);
        assert_eq!(shares[1].percent, 25);
        assert!(ChartSeries::default().shares().is_empty());
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        assert_eq!(average(&[90.0, 80.0, 75.0]), 81.7);
        assert_eq!(average(&[]), 0.0);
    }
}
