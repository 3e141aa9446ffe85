//! Influx-sink forwards metric records from a host application into an
//! InfluxDB-compatible time-series database over HTTP. The host's collection
//! framework produces a `metric::MetricRecord` on its own cadence and hands
//! it to a `sink::Sink`; the sink renders the record to line protocol and
//! writes it out. Influx-sink aims to be a _boring_ tail end of a telemetry
//! pipeline: it schedules nothing, buffers nothing and never lets a dead
//! backend take the host process down with it.
//!
//! Why you might choose to use influx-sink:
//!
//!  * You need records shipped as line protocol with cluster / source
//!    identity stamped onto every point.
//!  * You want a backend probed once at boot and a sink that disables itself
//!    cleanly when the probe fails.
//!  * You want write failures logged and dropped, never raised into the
//!    host's collection loop.
#![allow(unknown_lints)]
#![deny(trivial_numeric_casts, missing_docs, unstable_features, unused_import_braces)]
extern crate clap;
extern crate hyper;
extern crate hyper_native_tls;
extern crate toml;
extern crate url;

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde_derive;

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
extern crate tempdir;

pub mod client;
pub mod config;
pub mod encode;
pub mod metric;
pub mod sink;
