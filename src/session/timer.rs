//! Monotonic holdoff timer used by the post-reboot states.
//!
//! Grounded on `state_machines/timer.py` (`StateMachineTimer`).

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct StateMachineTimer {
    deadline: Instant,
}

impl StateMachineTimer {
    pub fn new(duration: Duration) -> Self {
        Self { deadline: Instant::now() + duration }
    }

    pub fn is_done(&self) -> bool {
        Instant::now() >= self.deadline
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_is_immediately_done() {
        let t = StateMachineTimer::new(Duration::from_secs(0));
        assert!(t.is_done());
    }

    #[test]
    fn long_duration_is_not_done() {
        let t = StateMachineTimer::new(Duration::from_secs(60));
        assert!(!t.is_done());
        assert!(t.remaining() > Duration::from_secs(0));
    }
}
