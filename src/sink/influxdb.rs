//! InfluxDB sink
//!
//! Example configuration:
//!
//! ```toml
//! url = "http://influx.example.com:8086"
//! database = "telemetry"
//! username = "shipper"
//! password = "hunter2"
//! cluster = "prod-west"
//! source = "node7"
//! ```

use client::{Connection, InfluxDBService};
use config::InfluxdbConfig;
use encode;
use metric::MetricRecord;
use sink::{Sink, State};

/// The InfluxDB sink. Renders each incoming record to line protocol and
/// writes it to the destination's write endpoint.
///
/// The destination is probed exactly once, at `init`. A sink whose probe
/// failed discards records until the process is restarted with a corrected
/// configuration; a sink whose probe succeeded keeps writing through
/// individual failures.
pub struct InfluxDB<C = InfluxDBService>
where
    C: Connection,
{
    client: Option<C>,
    state: State,
    cluster: String,
    source: String,
}

impl<C> InfluxDB<C>
where
    C: Connection,
{
    /// Create a new InfluxDB sink. No work happens until `init`.
    pub fn new() -> InfluxDB<C> {
        InfluxDB {
            client: None,
            state: State::Uninitialized,
            cluster: String::new(),
            source: String::new(),
        }
    }
}

impl<C> Default for InfluxDB<C>
where
    C: Connection,
{
    fn default() -> InfluxDB<C> {
        InfluxDB::new()
    }
}

impl<C> Sink for InfluxDB<C>
where
    C: Connection,
{
    fn init(&mut self, config: &InfluxdbConfig) {
        info!("initializing InfluxDB connection");
        info!("influxdb url: {}", config.url);
        info!("influxdb database: {}", config.database);
        info!("influxdb username: {}", config.username);
        info!("influxdb password is set");
        info!("cluster set to: {}", config.cluster);
        info!("source set to: {}", config.source);

        self.cluster = config.cluster.clone();
        self.source = config.source.clone();
        self.state = State::Probing;

        match C::open(config) {
            Ok(mut client) => {
                if client.test_connection() {
                    self.state = State::Ready;
                } else {
                    error!(
                        "could not reach influxdb at {}, sink disabled",
                        config.url
                    );
                    self.state = State::Disabled;
                }
                self.client = Some(client);
            }
            Err(e) => {
                error!("invalid influxdb sink configuration: {}", e);
                self.state = State::Disabled;
            }
        }
    }

    fn put_metrics(&mut self, record: &MetricRecord) {
        if self.state != State::Ready {
            debug!(
                "discarding record {} from context {}, sink not ready",
                record.name, record.context
            );
            return;
        }
        debug!(
            "putting record {} from context {}",
            record.name, record.context
        );
        let lines = encode::render_record(record, &self.cluster, &self.source);
        if lines.is_empty() {
            return;
        }
        if let Some(ref mut client) = self.client {
            if let Err(e) = client.write(&lines) {
                error!("could not write record {} to influxdb: {}", record.name, e);
            }
        }
    }

    fn close(&mut self) {
        if let Some(mut client) = self.client.take() {
            client.close();
        }
    }

    fn state(&self) -> State {
        self.state
    }
}
