use std::fmt;
use std::time::Duration;

/// Per-run probe counters and round trip statistics.
#[derive(Debug, Default, Clone)]
pub struct ProbeStats {
    transmitted: u32,
    received: u32,
    timeouts: u32,
    min: Option<Duration>,
    max: Option<Duration>,
    total: Duration,
}

impl ProbeStats {
    pub fn observe_latency(&mut self, rtt: Duration) {
        self.transmitted += 1;
        self.received += 1;
        self.total += rtt;
        self.min = Some(self.min.map_or(rtt, |min| min.min(rtt)));
        self.max = Some(self.max.map_or(rtt, |max| max.max(rtt)));
    }

    /// Records a probe that got no matching reply.
    pub fn inc_failure(&mut self, timed_out: bool) {
        self.transmitted += 1;
        if timed_out {
            self.timeouts += 1;
        }
    }

    pub fn transmitted(&self) -> u32 {
        self.transmitted
    }

    pub fn received(&self) -> u32 {
        self.received
    }

    pub fn timeouts(&self) -> u32 {
        self.timeouts
    }

    pub fn loss_percent(&self) -> f64 {
        if self.transmitted == 0 {
            return 0.0;
        }
        f64::from(self.transmitted - self.received) * 100.0 / f64::from(self.transmitted)
    }

    pub fn average(&self) -> Option<Duration> {
        (self.received > 0).then(|| self.total / self.received)
    }
}

impl fmt::Display for ProbeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} packets transmitted, {} received, {:.0}% packet loss",
            self.transmitted,
            self.received,
            self.loss_percent()
        )?;
        if let (Some(min), Some(avg), Some(max)) = (self.min, self.average(), self.max) {
            let ms = |d: Duration| d.as_secs_f64() * 1000.0;
            write!(f, "\nrtt min/avg/max = {:.3}/{:.3}/{:.3} ms", ms(min), ms(avg), ms(max))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarizes_mixed_results() {
        let mut stats = ProbeStats::default();
        stats.observe_latency(Duration::from_millis(2));
        stats.inc_failure(true);
        stats.observe_latency(Duration::from_millis(4));
        stats.inc_failure(false);

        assert_eq!(stats.transmitted(), 4);
        assert_eq!(stats.received(), 2);
        assert_eq!(stats.timeouts(), 1);
        assert_eq!(stats.loss_percent(), 50.0);
        assert_eq!(stats.average(), Some(Duration::from_millis(3)));
        assert_eq!(
            stats.to_string(),
            "4 packets transmitted, 2 received, 50% packet loss\nrtt min/avg/max = 2.000/3.000/4.000 ms"
        );
    }

    #[test]
    fn no_replies_has_no_rtt_line() {
        let mut stats = ProbeStats::default();
        stats.inc_failure(true);
        assert_eq!(stats.average(), None);
        assert_eq!(stats.to_string(), "1 packets transmitted, 0 received, 100% packet loss");
    }
}
