use std::time::Duration;

/// Trailing-edge work gate with a pending depth of one.
///
/// Mutation bursts collapse into a single scheduled run: the first request
/// of a burst arms a deadline one window ahead, later requests within the
/// window coalesce into it, and the run fires once the host's clock passes
/// the deadline. Because the run happens after the burst, it always sees
/// the latest DOM state. Time is host-driven (a monotonic `Duration` since
/// an arbitrary epoch), so tests are fully deterministic.
#[derive(Debug)]
pub struct Throttle {
    window: Duration,
    deadline: Option<Duration>,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Ask for a run. Coalesces into the already-armed deadline if one is
    /// pending.
    pub fn request(&mut self, now: Duration) {
        if self.deadline.is_none() {
            self.deadline = Some(now + self.window);
        }
    }

    /// True while a run is armed but has not fired yet.
    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fire the armed run if its deadline has passed. Returns true at most
    /// once per armed deadline.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
