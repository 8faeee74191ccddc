//! One poll tick: sample, predict, price, append, summarize.

mod view;

pub use view::ReadingView;

use power_client::domain::{DailyAggregate, NewReading};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::{
    analytics::{interval_energy, summarize_day, DailyAnalytics},
    config::{AppConfig, BillingConfig, SimulationConfig},
    errors::DashboardError,
    simulation::{self, Sample},
    store::{ReadingStore, StoreError},
};

/// Everything `/data` returns for one tick.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub current: ReadingView,
    pub history: Vec<ReadingView>,
    pub analytics: DailyAnalytics,
}

/// Owns the store and the immutable settings every tick needs.
pub struct Dashboard<S> {
    store: S,
    billing: BillingConfig,
    simulation: SimulationConfig,
    offset: UtcOffset,
}

impl<S> Dashboard<S>
where
    S: ReadingStore,
{
    pub fn new(store: S, cfg: &AppConfig) -> Self {
        let minutes = cfg.simulation.utc_offset_minutes;
        let offset = minutes
            .checked_mul(60)
            .and_then(|secs| UtcOffset::from_whole_seconds(secs).ok())
            .unwrap_or_else(|| {
                tracing::warn!(utc_offset_minutes = minutes, "utc offset out of range, using UTC");
                UtcOffset::UTC
            });

        Self {
            store,
            billing: cfg.billing.clone(),
            simulation: cfg.simulation.clone(),
            offset,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Wall-clock time at the configured offset, truncated to whole seconds.
    pub fn now(&self) -> PrimitiveDateTime {
        let now = OffsetDateTime::now_utc().to_offset(self.offset);
        let now = now.replace_nanosecond(0).unwrap_or(now);
        PrimitiveDateTime::new(now.date(), now.time())
    }

    pub fn today(&self) -> Date {
        self.now().date()
    }

    pub async fn tick(&self) -> Result<Snapshot, DashboardError> {
        let mut rng = StdRng::from_os_rng();
        self.tick_with(self.now(), &mut rng).await
    }

    /// Run one tick stamped `ts`, drawing randomness from `rng`.
    pub async fn tick_with<R>(
        &self,
        ts: PrimitiveDateTime,
        rng: &mut R,
    ) -> Result<Snapshot, DashboardError>
    where
        R: Rng + Send,
    {
        // Read before appending so the prediction never sees the value it predicts.
        let needed = self.simulation.prediction.history_needed();
        let prior: Vec<f64> = if needed == 0 {
            Vec::new()
        } else {
            self.store
                .recent(needed)
                .await?
                .iter()
                .map(|r| r.total_power_w)
                .collect()
        };

        let (sample, predicted_power_w) = self.simulate(rng, &prior);
        let stored = self.store.append(self.price(ts, sample, predicted_power_w)).await?;

        metrics::counter!("dashboard_ticks_total").increment(1);
        metrics::counter!("readings_appended_total").increment(1);
        metrics::histogram!("tick_total_power_watts").record(stored.total_power_w);
        tracing::debug!(
            id = stored.id,
            total_w = stored.total_power_w,
            predicted_w = stored.predicted_power_w,
            "tick appended"
        );

        let analytics = self.analytics_for(ts.date()).await?;
        let history = self.store.recent(self.simulation.history_len).await?;

        Ok(Snapshot {
            current: ReadingView::try_from(&stored)?,
            history: history
                .iter()
                .map(ReadingView::try_from)
                .collect::<Result<_, _>>()?,
            analytics,
        })
    }

    /// Draw a sample and predict from `prior` stored totals (oldest first).
    pub fn simulate<R: Rng>(&self, rng: &mut R, prior: &[f64]) -> (Sample, f64) {
        let sample = simulation::generate(self.simulation.mode, rng);
        let predicted = simulation::predict(self.simulation.prediction, sample.total_power_w, prior, rng);
        (sample, predicted)
    }

    fn price(&self, ts: PrimitiveDateTime, sample: Sample, predicted_power_w: f64) -> NewReading {
        let ec = interval_energy(
            sample.total_power_w,
            self.billing.poll_interval_secs,
            self.billing.tariff_per_kwh,
        );
        NewReading {
            ts,
            total_power_w: sample.total_power_w,
            predicted_power_w,
            energy_kwh: ec.energy_kwh,
            cost: ec.cost,
            devices: sample.devices,
        }
    }

    pub async fn daily_aggregate(&self, date: Date) -> Result<DailyAggregate, StoreError> {
        let rows = self.store.for_date(date).await?;
        Ok(DailyAggregate::from_readings(date, &rows))
    }

    pub async fn analytics_for(&self, date: Date) -> Result<DailyAnalytics, StoreError> {
        Ok(summarize_day(&self.daily_aggregate(date).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        simulation::{PredictionMode, SimulationMode},
        store::MemoryStore,
    };
    use power_client::domain::Reading;
    use time::{macros::datetime, Duration};

    fn dashboard(mode: SimulationMode, prediction: PredictionMode) -> Dashboard<MemoryStore> {
        let mut cfg = AppConfig::default();
        cfg.simulation.mode = mode;
        cfg.simulation.prediction = prediction;
        Dashboard::new(MemoryStore::new(cfg.store.memory_capacity), &cfg)
    }

    fn at(i: i64) -> PrimitiveDateTime {
        datetime!(2024-07-01 10:00:00) + Duration::seconds(2 * i)
    }

    #[tokio::test]
    async fn tick_appends_and_reports_current_reading() {
        let d = dashboard(SimulationMode::WholeHouse, PredictionMode::Jitter);
        let mut rng = StdRng::seed_from_u64(9);

        let snap = d.tick_with(at(0), &mut rng).await.unwrap();
        assert_eq!(snap.current.id, 1);
        assert_eq!(snap.history, vec![snap.current.clone()]);
        assert!((500.0..=3000.0).contains(&snap.current.total));
        assert!((snap.current.predicted - snap.current.total).abs() <= 150.0 + 0.01);
        assert_eq!(d.store().len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn energy_and_cost_follow_the_tick_power() {
        let d = dashboard(SimulationMode::WholeHouse, PredictionMode::Jitter);
        let mut rng = StdRng::seed_from_u64(10);

        let snap = d.tick_with(at(0), &mut rng).await.unwrap();
        let expected = interval_energy(snap.current.total, 2, 6.0);
        assert_eq!(snap.current.energy, expected.energy_kwh);
        assert_eq!(snap.current.cost, expected.cost);
    }

    #[tokio::test]
    async fn history_is_capped_at_ten_most_recent_last() {
        let d = dashboard(SimulationMode::WholeHouse, PredictionMode::Jitter);
        let mut rng = StdRng::seed_from_u64(12);

        let mut last = None;
        for i in 0..15 {
            last = Some(d.tick_with(at(i), &mut rng).await.unwrap());
        }
        let snap = last.unwrap();

        assert_eq!(snap.history.len(), 10);
        let ids: Vec<i64> = snap.history.iter().map(|r| r.id).collect();
        assert_eq!(ids, (6..=15).collect::<Vec<_>>());
        assert_eq!(snap.history.last(), Some(&snap.current));
    }

    #[tokio::test]
    async fn first_moving_average_prediction_is_zero() {
        let d = dashboard(SimulationMode::WholeHouse, PredictionMode::MovingAverage);
        let mut rng = StdRng::seed_from_u64(13);

        let snap = d.tick_with(at(0), &mut rng).await.unwrap();
        assert_eq!(snap.current.predicted, 0.0);
    }

    #[tokio::test]
    async fn moving_average_uses_readings_before_this_tick() {
        let d = dashboard(SimulationMode::WholeHouse, PredictionMode::MovingAverage);
        let mut rng = StdRng::seed_from_u64(14);

        for i in 0..3 {
            d.tick_with(at(i), &mut rng).await.unwrap();
        }
        let prior: Vec<Reading> = d.store().all().await.unwrap();
        let mean = prior.iter().map(|r| r.total_power_w).sum::<f64>() / 3.0;

        let snap = d.tick_with(at(3), &mut rng).await.unwrap();
        assert!((snap.current.predicted - mean).abs() <= 50.0 + 0.01);
    }

    #[tokio::test]
    async fn per_device_mode_carries_breakdown() {
        let d = dashboard(SimulationMode::PerDevice, PredictionMode::Jitter);
        let mut rng = StdRng::seed_from_u64(15);

        let snap = d.tick_with(at(0), &mut rng).await.unwrap();
        let sum = snap.current.fan.unwrap()
            + snap.current.ac.unwrap()
            + snap.current.tv.unwrap()
            + snap.current.fridge.unwrap();
        assert!((snap.current.total - sum).abs() < 0.01);
    }

    #[tokio::test]
    async fn analytics_only_count_the_tick_day() {
        let d = dashboard(SimulationMode::WholeHouse, PredictionMode::Jitter);
        let mut rng = StdRng::seed_from_u64(16);

        d.tick_with(datetime!(2024-07-01 23:59:58), &mut rng).await.unwrap();
        let snap = d.tick_with(datetime!(2024-07-02 00:00:00), &mut rng).await.unwrap();

        assert_eq!(snap.analytics.daily_energy, (snap.current.energy * 10_000.0).round() / 10_000.0);
        let day_one = d.daily_aggregate(datetime!(2024-07-01 00:00:00).date()).await.unwrap();
        assert_eq!(day_one.readings, 1);
    }

    #[test]
    fn tick_metrics_reach_the_prometheus_recorder() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let d = dashboard(SimulationMode::WholeHouse, PredictionMode::Jitter);

        metrics::with_local_recorder(&recorder, || {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let mut rng = StdRng::seed_from_u64(17);
            rt.block_on(async {
                d.tick_with(at(0), &mut rng).await.unwrap();
                d.tick_with(at(1), &mut rng).await.unwrap();
            });
        });

        let rendered = handle.render();
        assert!(rendered.contains("dashboard_ticks_total 2"), "{rendered}");
        assert!(rendered.contains("readings_appended_total 2"), "{rendered}");
        assert!(rendered.contains("tick_total_power_watts"), "{rendered}");
    }

    #[test]
    fn oversized_utc_offset_falls_back_to_utc() {
        let cfg = AppConfig::from_toml("[simulation]\nutc_offset_minutes = 40000000\n").unwrap();
        let d = Dashboard::new(MemoryStore::new(10), &cfg);
        assert_eq!(d.offset, UtcOffset::UTC);

        let cfg = AppConfig::from_toml("[simulation]\nutc_offset_minutes = -40000000\n").unwrap();
        let d = Dashboard::new(MemoryStore::new(10), &cfg);
        assert_eq!(d.offset, UtcOffset::UTC);
    }

    #[test]
    fn configured_utc_offset_is_applied() {
        let cfg = AppConfig::from_toml("[simulation]\nutc_offset_minutes = 330\n").unwrap();
        let d = Dashboard::new(MemoryStore::new(10), &cfg);
        assert_eq!(d.offset.whole_minutes(), 330);
    }

    #[test]
    fn now_has_whole_seconds() {
        let d = dashboard(SimulationMode::WholeHouse, PredictionMode::Jitter);
        assert_eq!(d.now().nanosecond(), 0);
    }
}
