//! Dashboard aggregation over the complaints visible to the actor.

use crate::domain::{ComplaintFilter, DashboardStats, DomainError, Identity, filter};
use crate::ports::{ComplaintRepoPort, DashboardSourcePort};
use std::sync::Arc;
use tracing::debug;

pub struct DashboardService {
    complaints: Arc<dyn ComplaintRepoPort>,
    source: Arc<dyn DashboardSourcePort>,
}

impl DashboardService {
    pub fn new(complaints: Arc<dyn ComplaintRepoPort>, source: Arc<dyn DashboardSourcePort>) -> Self {
        Self { complaints, source }
    }

    /// Counts by status, category and station plus the trend/prediction series.
    pub async fn stats(&self, actor: &Identity) -> Result<DashboardStats, DomainError> {
        let all = self.complaints.list().await?;
        let visible = filter::select(&all, actor, &ComplaintFilter::default());
        let (trend, prediction) =
            tokio::try_join!(self.source.weekly_trend(), self.source.prediction())?;
        let stats = DashboardStats::aggregate(&visible, trend, prediction);
        debug!(
            user_id = %actor.id,
            total = stats.total_complaints,
            stations = stats.by_station.len(),
            "dashboard aggregated"
        );
        Ok(stats)
    }
}
