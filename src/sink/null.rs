use config::InfluxdbConfig;
use metric::MetricRecord;
use sink::{Sink, State};

/// Null sink
///
/// This sink is intended for testing and demonstration. Every record it
/// receives will be deallocated.
pub struct Null {
    state: State,
}

impl Null {
    /// Create a new Null sink
    pub fn new() -> Null {
        Null {
            state: State::Uninitialized,
        }
    }
}

impl Default for Null {
    fn default() -> Null {
        Null::new()
    }
}

impl Sink for Null {
    fn init(&mut self, _config: &InfluxdbConfig) {
        self.state = State::Ready;
    }

    fn put_metrics(&mut self, _record: &MetricRecord) {
        // discard record
    }

    fn state(&self) -> State {
        self.state
    }
}
