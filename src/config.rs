//! Provides the configuration loader and the CLI option parser
//!
//! Used to parse the config file into a struct that the sink can consume
//! and use as configuration data. The loader never panics: a bad
//! configuration must leave the sink disabled, not take the host process
//! down.

use clap::{App, Arg};
use std::error;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use toml;

const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

/// Configuration for the InfluxDB sink.
///
/// Loaded once at startup and immutable for the sink's lifetime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InfluxdbConfig {
    /// Base URL of the destination database, e.g.
    /// `http://influx.example.com:8086`. Required.
    pub url: String,
    /// The database write requests target. Required.
    pub database: String,
    /// Username presented to the destination. Empty disables
    /// authentication entirely.
    pub username: String,
    /// Password presented alongside `username`.
    pub password: String,
    /// Cluster identifier appended to every rendered line.
    pub cluster: String,
    /// Source identifier appended to every rendered line. Set empty to
    /// omit the tag.
    pub source: String,
}

impl Default for InfluxdbConfig {
    fn default() -> InfluxdbConfig {
        InfluxdbConfig {
            url: String::new(),
            database: String::new(),
            username: String::new(),
            password: String::new(),
            cluster: "hadoop".to_string(),
            source: "unknown".to_string(),
        }
    }
}

/// Errors raised while loading sink configuration.
///
/// The sink boundary logs these and stays disabled; they are never fatal to
/// the host.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io(String),
    /// The buffer was not valid toml.
    Toml(String),
    /// A required key was absent.
    MissingKey(&'static str),
    /// A key held a value of the wrong type.
    WrongType(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigError::Io(ref e) => write!(f, "could not read config file: {}", e),
            ConfigError::Toml(ref e) => write!(f, "could not parse config file: {}", e),
            ConfigError::MissingKey(key) => write!(f, "required key {} is missing", key),
            ConfigError::WrongType(key) => write!(f, "key {} must be a string", key),
        }
    }
}

impl error::Error for ConfigError {
    fn description(&self) -> &str {
        "sink configuration error"
    }
}

/// Parse the sink configuration from a toml buffer.
///
/// `url` and `database` are required; every other key falls back to the
/// defaults documented on `InfluxdbConfig`. Unrecognized keys are ignored.
pub fn parse_config_file(buffer: &str) -> Result<InfluxdbConfig, ConfigError> {
    let value: toml::Value =
        toml::from_str(buffer).map_err(|e| ConfigError::Toml(e.to_string()))?;
    let mut config = InfluxdbConfig::default();

    config.url = match value.get("url") {
        Some(url) => url.as_str()
            .ok_or(ConfigError::WrongType("url"))?
            .to_string(),
        None => return Err(ConfigError::MissingKey("url")),
    };

    config.database = match value.get("database") {
        Some(database) => database
            .as_str()
            .ok_or(ConfigError::WrongType("database"))?
            .to_string(),
        None => return Err(ConfigError::MissingKey("database")),
    };

    if let Some(username) = value.get("username") {
        config.username = username
            .as_str()
            .ok_or(ConfigError::WrongType("username"))?
            .to_string();
    }

    if let Some(password) = value.get("password") {
        config.password = password
            .as_str()
            .ok_or(ConfigError::WrongType("password"))?
            .to_string();
    }

    if let Some(cluster) = value.get("cluster") {
        config.cluster = cluster
            .as_str()
            .ok_or(ConfigError::WrongType("cluster"))?
            .to_string();
    }

    if let Some(source) = value.get("source") {
        config.source = source
            .as_str()
            .ok_or(ConfigError::WrongType("source"))?
            .to_string();
    }

    Ok(config)
}

/// Load and parse a configuration file from disk.
pub fn load_config_file<P>(path: P) -> Result<InfluxdbConfig, ConfigError>
where
    P: AsRef<Path>,
{
    let mut fp = File::open(path).map_err(|e| ConfigError::Io(e.to_string()))?;
    let mut buffer = String::new();
    fp.read_to_string(&mut buffer)
        .map_err(|e| ConfigError::Io(e.to_string()))?;
    parse_config_file(&buffer)
}

/// Parse the influx_sink CLI arguments.
///
/// Returns the configuration file path and the verbosity level. See
/// `influx_sink --help` for more information.
pub fn parse_args() -> (PathBuf, u64) {
    let args = App::new("influx_sink")
        .version(VERSION.unwrap_or("unknown"))
        .author("Brian L. Troutwine <blt@postmates.com>")
        .about("ships metric records to InfluxDB, last up the ladder")
        .arg(
            Arg::with_name("config-file")
                .long("config")
                .short("C")
                .value_name("config")
                .required(true)
                .help("The config file to feed in.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Turn on verbose output."),
        )
        .get_matches();

    let verb = if args.is_present("verbose") {
        args.occurrences_of("verbose")
    } else {
        0
    };

    let path = args.value_of("config-file").expect("config-file is required");
    (Path::new(path).to_path_buf(), verb)
}

#[cfg(test)]
mod test {
    use std::fs::File;
    use std::io::Write;
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn config_file_full() {
        let config = r#"
url = "http://influx.example.com:8086"
database = "telemetry"
username = "shipper"
password = "hunter2"
cluster = "prod-west"
source = "node7"
"#;

        let config = parse_config_file(config).unwrap();

        assert_eq!(config.url, "http://influx.example.com:8086");
        assert_eq!(config.database, "telemetry");
        assert_eq!(config.username, "shipper");
        assert_eq!(config.password, "hunter2");
        assert_eq!(config.cluster, "prod-west");
        assert_eq!(config.source, "node7");
    }

    #[test]
    fn config_file_defaults() {
        let config = r#"
url = "http://influx.example.com:8086"
database = "telemetry"
"#;

        let config = parse_config_file(config).unwrap();

        assert_eq!(config.username, "");
        assert_eq!(config.password, "");
        assert_eq!(config.cluster, "hadoop");
        assert_eq!(config.source, "unknown");
    }

    #[test]
    fn config_file_missing_url() {
        let config = r#"
database = "telemetry"
"#;

        assert_eq!(
            parse_config_file(config),
            Err(ConfigError::MissingKey("url"))
        );
    }

    #[test]
    fn config_file_missing_database() {
        let config = r#"
url = "http://influx.example.com:8086"
"#;

        assert_eq!(
            parse_config_file(config),
            Err(ConfigError::MissingKey("database"))
        );
    }

    #[test]
    fn config_file_wrong_type() {
        let config = r#"
url = 8086
database = "telemetry"
"#;

        assert_eq!(
            parse_config_file(config),
            Err(ConfigError::WrongType("url"))
        );
    }

    #[test]
    fn config_file_invalid_toml() {
        match parse_config_file("url =") {
            Err(ConfigError::Toml(_)) => {}
            other => panic!("expected toml error, got {:?}", other),
        }
    }

    #[test]
    fn config_file_from_disk() {
        let dir = TempDir::new("influx-sink").unwrap();
        let path = dir.path().join("sink.toml");
        let mut fp = File::create(&path).unwrap();
        fp.write_all(b"url = \"http://127.0.0.1:8086\"\ndatabase = \"telemetry\"\n")
            .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.url, "http://127.0.0.1:8086");
        assert_eq!(config.cluster, "hadoop");
    }

    #[test]
    fn config_file_from_disk_missing() {
        let dir = TempDir::new("influx-sink").unwrap();

        match load_config_file(dir.path().join("nope.toml")) {
            Err(ConfigError::Io(_)) => {}
            other => panic!("expected io error, got {:?}", other),
        }
    }
}
