//! Fixture dashboard source. Serves the static trend and prediction series.
//!
//! There is no forecasting model behind the prediction; it is fixture data, served
//! through the same port a real analytics backend would implement.

use crate::adapters::persistence::{Latency, fixtures};
use crate::domain::{DomainError, PredictionPoint, TrendPoint};
use crate::ports::DashboardSourcePort;
use tracing::debug;

pub struct FixtureDashboardSource {
    trend: Vec<TrendPoint>,
    prediction: Vec<PredictionPoint>,
    latency: Latency,
}

impl FixtureDashboardSource {
    pub fn new(latency: Latency) -> Self {
        Self::with_series(fixtures::weekly_trend(), fixtures::prediction(), latency)
    }

    pub fn with_series(
        trend: Vec<TrendPoint>,
        prediction: Vec<PredictionPoint>,
        latency: Latency,
    ) -> Self {
        Self {
            trend,
            prediction,
            latency,
        }
    }
}

#[async_trait::async_trait]
impl DashboardSourcePort for FixtureDashboardSource {
    async fn weekly_trend(&self) -> Result<Vec<TrendPoint>, DomainError> {
        self.latency.wait().await;
        debug!(points = self.trend.len(), "[FIXTURE] serving weekly trend");
        Ok(self.trend.clone())
    }

    async fn prediction(&self) -> Result<Vec<PredictionPoint>, DomainError> {
        self.latency.wait().await;
        debug!(points = self.prediction.len(), "[FIXTURE] serving prediction");
        Ok(self.prediction.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_fixture_series() {
        let source = FixtureDashboardSource::new(Latency::default());
        let trend = source.weekly_trend().await.unwrap();
        let prediction = source.prediction().await.unwrap();
        assert_eq!(trend.len(), 7);
        assert_eq!(prediction.len(), 7);
        assert_eq!(trend.iter().map(|t| t.count).sum::<u32>(), 127);
    }
}
