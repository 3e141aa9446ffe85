#![allow(unknown_lints)]

extern crate chrono;
extern crate fern;
extern crate influx_sink;
extern crate openssl_probe;

#[macro_use]
extern crate log;

use chrono::Utc;
use influx_sink::config;
use influx_sink::metric::MetricRecord;
use influx_sink::sink::{InfluxDB, Sink, State};
use std::process;
use std::thread;
use std::time;

// A minimal shipper around the library: read a config, stand the sink up
// and push a heartbeat record at a fixed cadence. Useful for smoke-testing
// a backend before wiring the sink into a real collection framework.
fn main() {
    openssl_probe::init_ssl_cert_env_vars();

    let (config_path, verbose) = config::parse_args();

    let level = match verbose {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}][{}] {}",
                record.module_path().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                Utc::now().to_rfc3339(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()
        .expect("could not set up logging");

    info!("influx_sink - {}", env!("CARGO_PKG_VERSION"));

    let config = match config::load_config_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(
                "could not load configuration {}: {}",
                config_path.display(),
                e
            );
            process::exit(1);
        }
    };

    let mut sink: InfluxDB = InfluxDB::new();
    sink.init(&config);
    if sink.state() == State::Disabled {
        warn!("sink is disabled, heartbeat records will be discarded");
    }

    let interval = time::Duration::from_secs(10);
    let mut beats: u64 = 0;
    loop {
        beats = beats.saturating_add(1);
        let record = MetricRecord::new("influx_sink", "heartbeat").sample("count", beats as f64);
        sink.put_metrics(&record);
        sink.flush();
        thread::sleep(interval);
    }
}
