//! External stepping client
//!
//! Steps a started ResumableCall once per tick until it is done. This is the
//! only place wall-clock time enters the picture; the runtime itself never
//! blocks or sleeps.

use crate::config::DriverConfig;
use crate::runtime::{CallStatus, ResumableCall};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

/// Summary of one drive, printed by `latent run --json`
#[derive(Debug, Clone, Serialize)]
pub struct DriveReport {
    pub call_id: Uuid,
    /// `step()` calls made by the driver (the first pass ran in `start()`)
    pub steps: u64,
    pub passes: u64,
    pub status: CallStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Driver {
    tick: Duration,
    max_steps: Option<u64>,
}

impl Driver {
    pub fn new(config: &DriverConfig) -> Self {
        Self {
            tick: Duration::from_millis(config.tick_ms),
            max_steps: config.max_steps,
        }
    }

    pub fn with_tick(tick: Duration) -> Self {
        Self {
            tick,
            max_steps: None,
        }
    }

    pub fn max_steps(mut self, max_steps: Option<u64>) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Step `call` until it is done
    pub async fn run(&self, call: &mut ResumableCall) -> Result<DriveReport> {
        if call.status() == CallStatus::Initializing {
            bail!("Call {} has not been started", call.id());
        }

        let started_at = Utc::now();
        let mut ticker = if self.tick.is_zero() {
            None
        } else {
            let mut ticker = interval(self.tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;
            Some(ticker)
        };

        let mut steps = 0;
        while !call.is_done() {
            if let Some(limit) = self.max_steps {
                if steps >= limit {
                    bail!("Call {} not done after {} steps", call.id(), limit);
                }
            }

            match ticker.as_mut() {
                Some(ticker) => {
                    ticker.tick().await;
                }
                None => tokio::task::yield_now().await,
            }

            call.step()
                .with_context(|| format!("Step {} of call {} failed", steps + 1, call.id()))?;
            steps += 1;
            debug!(call = %call.id(), steps, "stepped");
        }

        let report = DriveReport {
            call_id: call.id(),
            steps,
            passes: call.passes(),
            status: call.status(),
            started_at,
            finished_at: Utc::now(),
        };
        info!(call = %report.call_id, steps, "call done");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;

    fn started_demo(items: Vec<i64>) -> ResumableCall {
        let mut call = demo::prepare_call(items).unwrap();
        call.start(demo::sum_items_squared).unwrap();
        call
    }

    #[tokio::test]
    async fn test_drive_to_completion() {
        let mut call = started_demo(vec![1, 2, 3]);
        let report = Driver::with_tick(Duration::ZERO).run(&mut call).await.unwrap();

        assert_eq!(report.steps, 50);
        assert_eq!(report.passes, 51);
        assert_eq!(report.status, CallStatus::Done);
        assert!(report.finished_at >= report.started_at);
        assert_eq!(*call.result::<i64>().unwrap(), 36);
    }

    #[tokio::test]
    async fn test_drive_respects_max_steps() {
        let mut call = started_demo(vec![1, 2, 3]);
        let err = Driver::with_tick(Duration::ZERO)
            .max_steps(Some(10))
            .run(&mut call)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("not done after 10 steps"));
        assert_eq!(call.status(), CallStatus::InProgress);
    }

    #[tokio::test]
    async fn test_drive_requires_started_call() {
        let mut call = demo::prepare_call(vec![1]).unwrap();
        assert!(Driver::with_tick(Duration::ZERO).run(&mut call).await.is_err());
    }

    #[test]
    fn test_drive_with_real_tick() {
        let mut call = started_demo(Vec::new());
        let driver = Driver::new(&DriverConfig {
            tick_ms: 1,
            max_steps: Some(100),
        });

        let report = tokio_test::block_on(driver.run(&mut call)).unwrap();
        assert_eq!(report.steps, 20);
        assert_eq!(report.status, CallStatus::Done);
    }

    #[test]
    fn test_report_serializes() {
        let mut call = started_demo(Vec::new());
        let report = tokio_test::block_on(Driver::with_tick(Duration::ZERO).run(&mut call)).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "done");
        assert_eq!(json["steps"], 20);
        assert_eq!(json["call_id"], call.id().to_string());
    }
}
