use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use anyhow::Result;

pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval_ms: u64) -> Result<Self> {
        Ok(Self {
            interval: Duration::from_millis(interval_ms),
        })
    }

    /// Runs `job` once per tick, `count` times, passing the tick index.
    /// Each job finishes before the next starts; a job that overruns the
    /// interval delays the following tick instead of overlapping it.
    pub async fn run<J, F>(&self, count: u16, mut job: J) -> Result<()>
    where
        J: FnMut(u16) -> F,
        F: std::future::Future<Output = ()>,
    {
        let mut next = Instant::now();
        for tick in 0..count {
            job(tick).await;
            next += self.interval;
            if tick + 1 < count {
                let now = Instant::now();
                if next < now {
                    next = now;
                }
                sleep_until(next).await;
            }
        }
        Ok(())
    }
}
