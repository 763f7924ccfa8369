//! Dashboard aggregates: counts by status, category and station, plus trend/prediction series.

use super::{Complaint, ComplaintCategory, ComplaintStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub date: NaiveDate,
    pub predicted: u32,
}

/// One x-axis position of the trend chart. Either side may be missing for a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub actual: Option<u32>,
    pub predicted: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_complaints: usize,
    /// Every status is present, zero when no complaint has it.
    pub by_status: BTreeMap<ComplaintStatus, usize>,
    /// Every category is present, zero when no complaint has it.
    pub by_category: BTreeMap<ComplaintCategory, usize>,
    pub by_station: BTreeMap<String, usize>,
    pub weekly_trend: Vec<TrendPoint>,
    pub prediction: Vec<PredictionPoint>,
}

impl DashboardStats {
    pub fn aggregate<'a>(
        complaints: impl IntoIterator<Item = &'a Complaint>,
        weekly_trend: Vec<TrendPoint>,
        prediction: Vec<PredictionPoint>,
    ) -> Self {
        let mut by_status: BTreeMap<_, _> =
            ComplaintStatus::ALL.iter().map(|&s| (s, 0)).collect();
        let mut by_category: BTreeMap<_, _> =
            ComplaintCategory::ALL.iter().map(|&c| (c, 0)).collect();
        let mut by_station = BTreeMap::new();
        let mut total = 0;

        for c in complaints {
            total += 1;
            *by_status.entry(c.status).or_insert(0) += 1;
            *by_category.entry(c.category).or_insert(0) += 1;
            *by_station.entry(c.station.clone()).or_insert(0) += 1;
        }

        Self {
            total_complaints: total,
            by_status,
            by_category,
            by_station,
            weekly_trend,
            prediction,
        }
    }

    fn count(&self, status: ComplaintStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// Complaints nobody has started on yet: submitted or accepted.
    pub fn pending(&self) -> usize {
        self.count(ComplaintStatus::Submitted) + self.count(ComplaintStatus::Accepted)
    }

    /// Share of treated complaints as a rounded percentage. 0 when there are none.
    pub fn resolution_rate(&self) -> u32 {
        if self.total_complaints == 0 {
            return 0;
        }
        let treated = self.count(ComplaintStatus::Treated) as f64;
        (treated / self.total_complaints as f64 * 100.0).round() as u32
    }

    /// Distinct stations with at least one complaint.
    pub fn station_count(&self) -> usize {
        self.by_station.len()
    }

    /// Stations ordered by descending count, ties by name.
    pub fn top_stations(&self) -> Vec<(&str, usize)> {
        let mut rows: Vec<_> = self
            .by_station
            .iter()
            .map(|(name, &n)| (name.as_str(), n))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows
    }

    /// Full outer join of the trend and prediction series on date, ascending.
    pub fn chart_series(&self) -> Vec<ChartPoint> {
        let mut by_date: BTreeMap<NaiveDate, ChartPoint> = BTreeMap::new();
        for t in &self.weekly_trend {
            by_date
                .entry(t.date)
                .or_insert(ChartPoint {
                    date: t.date,
                    actual: None,
                    predicted: None,
                })
                .actual = Some(t.count);
        }
        for p in &self.prediction {
            by_date
                .entry(p.date)
                .or_insert(ChartPoint {
                    date: p.date,
                    actual: None,
                    predicted: None,
                })
                .predicted = Some(p.predicted);
        }
        by_date.into_values().collect()
    }
}
