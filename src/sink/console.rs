use config::InfluxdbConfig;
use encode;
use metric::MetricRecord;
use sink::{Sink, State};

/// Console sink
///
/// This sink is intended for testing and demonstration. Every record it
/// receives is rendered exactly as the InfluxDB sink would render it, then
/// printed to stdout instead of written to a database.
pub struct Console {
    state: State,
    cluster: String,
    source: String,
}

impl Console {
    /// Create a new Console sink
    pub fn new() -> Console {
        Console {
            state: State::Uninitialized,
            cluster: String::new(),
            source: String::new(),
        }
    }
}

impl Default for Console {
    fn default() -> Console {
        Console::new()
    }
}

impl Sink for Console {
    fn init(&mut self, config: &InfluxdbConfig) {
        self.cluster = config.cluster.clone();
        self.source = config.source.clone();
        self.state = State::Ready;
    }

    fn put_metrics(&mut self, record: &MetricRecord) {
        if self.state != State::Ready {
            return;
        }
        print!("{}", encode::render_record(record, &self.cluster, &self.source));
    }

    fn state(&self) -> State {
        self.state
    }
}
