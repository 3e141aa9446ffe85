//! A 'sink' is the host-facing end of the pipeline: the host's collection
//! framework calls `init` once at boot and then hands over one
//! `MetricRecord` per collection tick. Sinks never raise into the host --
//! whatever goes wrong, the worst outcome is dropped metrics.

use config::InfluxdbConfig;
use metric::MetricRecord;

mod console;
mod influxdb;
mod null;

pub use self::console::Console;
pub use self::influxdb::InfluxDB;
pub use self::null::Null;

/// Lifecycle state of a sink.
///
/// The startup probe is the only gate: a sink lands in `Ready` or
/// `Disabled` at `init` and stays there. Individual write failures do not
/// move a `Ready` sink.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// `init` has not been called yet.
    Uninitialized,
    /// `init` is underway and the startup probe has not resolved.
    Probing,
    /// The probe succeeded; records are rendered and written.
    Ready,
    /// Configuration or the probe failed; every record is discarded for
    /// the remainder of the process lifetime.
    Disabled,
}

/// The sink trait. Implementors accept metric records from the host.
///
/// All methods take `&mut self`: a host collecting on multiple threads must
/// serialize access to a shared sink. Calls are allowed to block
/// synchronously on the network; nothing here spawns threads or queues
/// work.
pub trait Sink {
    /// Configure the sink and probe the destination. Never fails: a bad
    /// configuration or an unreachable destination leaves the sink
    /// `Disabled`, logged, with the host unharmed.
    fn init(&mut self, config: &InfluxdbConfig);

    /// Accept one collection tick's record. Errors are logged and the
    /// record is dropped; nothing propagates to the caller.
    fn put_metrics(&mut self, record: &MetricRecord);

    /// There is no internal buffer, so this is a no-op for every sink in
    /// this crate.
    fn flush(&mut self) {}

    /// Release held resources. Safe to call multiple times.
    fn close(&mut self) {}

    /// The sink's current lifecycle state.
    fn state(&self) -> State;
}
