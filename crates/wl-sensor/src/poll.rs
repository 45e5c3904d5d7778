//! Sensor polling for the module host.
//!
//! Takes readings from every constructed sensor, either once or at a fixed
//! interval. A failing sensor is reported and skipped; it never stops the loop.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use crate::sensor::{Attributes, Sensor};

/// Outcome of one reading from one sensor.
#[derive(Debug, Clone, Serialize)]
pub struct SensorReport {
    pub sensor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readings: Option<Attributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Read every sensor once, in order.
pub async fn poll_all(sensors: &[Arc<dyn Sensor>]) -> Vec<SensorReport> {
    let extra = Attributes::new();
    let mut reports = Vec::with_capacity(sensors.len());
    for sensor in sensors {
        let report = match sensor.readings(&extra).await {
            Ok(readings) => SensorReport {
                sensor: sensor.name().to_string(),
                readings: Some(readings),
                error: None,
            },
            Err(e) => {
                tracing::warn!(sensor = sensor.name(), error = %e, "reading failed");
                SensorReport {
                    sensor: sensor.name().to_string(),
                    readings: None,
                    error: Some(e.to_string()),
                }
            }
        };
        reports.push(report);
    }
    reports
}

/// Poll at `interval` forever, handing each report to `emit`.
///
/// Runs until the task is cancelled. Intended to sit in a `tokio::select!`
/// next to a shutdown signal.
pub async fn run<F>(sensors: &[Arc<dyn Sensor>], interval: Duration, mut emit: F)
where
    F: FnMut(&SensorReport),
{
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        for report in poll_all(sensors).await {
            emit(&report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::EventLogSensor;
    use wl_log_tools::{MockEventLog, MockLogSource, SourceConfig};

    fn sensors() -> Vec<Arc<dyn Sensor>> {
        let ok: Arc<dyn Sensor> = Arc::new(EventLogSensor::with_backends(
            "fixture",
            SourceConfig {
                log_source: "test".into(),
                ..Default::default()
            },
            Arc::new(MockLogSource::with_csv_sample()),
            Arc::new(MockEventLog::new()),
        ));
        let broken: Arc<dyn Sensor> = Arc::new(EventLogSensor::with_backends(
            "broken",
            SourceConfig {
                log_source: "missing.csv".into(),
                ..Default::default()
            },
            Arc::new(MockLogSource::new()),
            Arc::new(MockEventLog::new()),
        ));
        vec![ok, broken]
    }

    #[tokio::test]
    async fn poll_all_reports_each_sensor() {
        let reports = poll_all(&sensors()).await;
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].sensor, "fixture");
        assert_eq!(reports[0].readings.as_ref().unwrap()["state"], "test_mode");
        assert!(reports[0].error.is_none());
        assert_eq!(reports[1].sensor, "broken");
        assert!(reports[1].readings.is_none());
        assert!(reports[1].error.as_ref().unwrap().contains("missing.csv"));
    }

    #[tokio::test]
    async fn run_emits_reports_until_cancelled() {
        let sensors = sensors();
        let mut seen = Vec::new();
        let _ = time::timeout(Duration::from_millis(100), async {
            run(&sensors, Duration::from_millis(20), |r| seen.push(r.sensor.clone())).await;
        })
        .await;
        // The first tick fires immediately.
        assert!(seen.len() >= 2);
        assert_eq!(seen[0], "fixture");
        assert_eq!(seen[1], "broken");
    }
}
