//! The delivery client owns the HTTP session to the destination database:
//! a startup probe against `/ping` and line protocol writes against
//! `/write`. Nothing here renders records; the sink hands this module fully
//! formed payloads.

use config::InfluxdbConfig;
use hyper;
use hyper::client::Client;
use hyper::header::{Authorization, Basic, ContentType};
use hyper::net::HttpsConnector;
use hyper_native_tls::NativeTlsClient;
use std::error;
use std::fmt;
use std::io;
use url;
use url::Url;

/// The transport seam between a sink and the destination database.
///
/// `InfluxDBService` is the production implementation. All methods take
/// `&mut self`; a host driving one sink from many collection threads must
/// serialize access itself.
pub trait Connection: Sized {
    /// Establish client state for the destination. Validates the endpoint
    /// but does not touch the network, so success here guarantees nothing
    /// about reachability.
    fn open(config: &InfluxdbConfig) -> Result<Self, ClientError>;

    /// Perform a lightweight round-trip against the destination, returning
    /// whether it is reachable and willing to talk to us. Transport and
    /// protocol errors are swallowed into `false`, never propagated: a host
    /// must come up cleanly even when its metrics backend is down.
    fn test_connection(&mut self) -> bool;

    /// Send pre-rendered line protocol to the destination's write endpoint.
    /// Fails when the network call fails or the destination refuses the
    /// payload; the error carries which.
    fn write(&mut self, body: &str) -> io::Result<()>;

    /// Release any held connection resources. Safe to call multiple times.
    fn close(&mut self);
}

/// Errors raised while establishing client state for a destination.
#[derive(Debug)]
pub enum ClientError {
    /// The endpoint URL was missing or unparseable.
    Url(url::ParseError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ClientError::Url(ref e) => write!(f, "could not parse endpoint url: {}", e),
        }
    }
}

impl error::Error for ClientError {
    fn description(&self) -> &str {
        "delivery client error"
    }
}

impl From<url::ParseError> for ClientError {
    fn from(e: url::ParseError) -> ClientError {
        ClientError::Url(e)
    }
}

/// HTTP delivery client for an InfluxDB-compatible database.
///
/// Holds a pooled `hyper` client plus the probe and write URLs, both built
/// once at `open`. Writes POST to `/write?db=<database>` with the payload as
/// `text/plain`; the probe GETs `/ping`. Basic credentials are attached to
/// both whenever a username is configured.
pub struct InfluxDBService {
    client: Option<Client>,
    ping_url: Url,
    write_url: Url,
    username: String,
    password: String,
}

// hyper 0.10 carries no TLS of its own. Wrap the native-tls connector when
// one can be built, else fall back to a plain-http client.
fn new_client() -> Client {
    match NativeTlsClient::new() {
        Ok(ssl) => Client::with_connector(HttpsConnector::new(ssl)),
        Err(e) => {
            warn!("TLS unavailable, https endpoints will fail: {}", e);
            Client::new()
        }
    }
}

impl InfluxDBService {
    fn credentials(&self) -> Option<Basic> {
        if self.username.is_empty() {
            None
        } else {
            Some(Basic {
                username: self.username.clone(),
                password: Some(self.password.clone()),
            })
        }
    }
}

impl Connection for InfluxDBService {
    fn open(config: &InfluxdbConfig) -> Result<InfluxDBService, ClientError> {
        let base = Url::parse(&config.url)?;
        let mut ping_url = base.clone();
        ping_url.set_path("ping");
        let mut write_url = base;
        write_url.set_path("write");
        write_url
            .query_pairs_mut()
            .append_pair("db", &config.database);
        Ok(InfluxDBService {
            client: Some(new_client()),
            ping_url: ping_url,
            write_url: write_url,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn test_connection(&mut self) -> bool {
        let client = match self.client {
            Some(ref client) => client,
            None => return false,
        };
        let mut req = client.get(self.ping_url.clone());
        if let Some(basic) = self.credentials() {
            req = req.header(Authorization(basic));
        }
        match req.send() {
            Ok(res) => {
                if res.status.is_success() {
                    true
                } else {
                    debug!("probe of {} refused: {}", self.ping_url, res.status);
                    false
                }
            }
            Err(e) => {
                debug!("probe of {} failed: {}", self.ping_url, e);
                false
            }
        }
    }

    fn write(&mut self, body: &str) -> io::Result<()> {
        let client = match self.client {
            Some(ref client) => client,
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::NotConnected,
                    "client is closed",
                ))
            }
        };
        let mut req = client
            .post(self.write_url.clone())
            .body(body)
            .header(ContentType::plaintext())
            .header(hyper::header::Connection::keep_alive());
        if let Some(basic) = self.credentials() {
            req = req.header(Authorization(basic));
        }
        match req.send() {
            Ok(res) => {
                if res.status.is_success() {
                    Ok(())
                } else {
                    Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("write refused: {}", res.status),
                    ))
                }
            }
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
        }
    }

    fn close(&mut self) {
        self.client = None;
    }
}

#[cfg(test)]
mod test {
    use config::InfluxdbConfig;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use super::*;

    fn test_config(url: &str) -> InfluxdbConfig {
        let mut config = InfluxdbConfig::default();
        config.url = url.to_string();
        config.database = "telemetry".to_string();
        config
    }

    fn request_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf).into_owned();
        let headers_end = match text.find("\r\n\r\n") {
            Some(idx) => idx + 4,
            None => return false,
        };
        let mut content_length = 0;
        for line in text[..headers_end].lines() {
            let lower = line.to_lowercase();
            if lower.starts_with("content-length:") {
                content_length = lower["content-length:".len()..]
                    .trim()
                    .parse()
                    .unwrap_or(0);
            }
        }
        buf.len() >= headers_end + content_length
    }

    // Accept a single request, consume it fully, answer with the canned
    // status and hang up.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !request_complete(&buf) {
                    match stream.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}", addr)
    }

    fn unreachable_endpoint() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[test]
    fn test_open_builds_endpoints() {
        let service =
            InfluxDBService::open(&test_config("http://127.0.0.1:8086")).unwrap();

        assert_eq!(service.ping_url.as_str(), "http://127.0.0.1:8086/ping");
        assert_eq!(
            service.write_url.as_str(),
            "http://127.0.0.1:8086/write?db=telemetry"
        );
    }

    #[test]
    fn test_open_rejects_unparseable_url() {
        assert!(InfluxDBService::open(&test_config("")).is_err());
    }

    #[test]
    fn test_probe_success() {
        let url = serve_once("HTTP/1.1 204 No Content\r\n\r\n");
        let mut service = InfluxDBService::open(&test_config(&url)).unwrap();

        assert!(service.test_connection());
    }

    #[test]
    fn test_probe_refused() {
        let url =
            serve_once("HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\n\r\n");
        let mut service = InfluxDBService::open(&test_config(&url)).unwrap();

        assert!(!service.test_connection());
    }

    #[test]
    fn test_probe_unreachable() {
        let url = unreachable_endpoint();
        let mut service = InfluxDBService::open(&test_config(&url)).unwrap();

        assert!(!service.test_connection());
    }

    #[test]
    fn test_write_success() {
        let url = serve_once("HTTP/1.1 204 No Content\r\n\r\n");
        let mut service = InfluxDBService::open(&test_config(&url)).unwrap();

        assert!(service.write("heap,cluster=c1 value=1\n").is_ok());
    }

    #[test]
    fn test_write_refused() {
        let url = serve_once("HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\n\r\n");
        let mut service = InfluxDBService::open(&test_config(&url)).unwrap();

        let res = service.write("heap,cluster=c1 value=1\n");
        assert_eq!(
            res.unwrap_err().kind(),
            ::std::io::ErrorKind::InvalidData
        );
    }

    #[test]
    fn test_write_after_close() {
        let mut service =
            InfluxDBService::open(&test_config("http://127.0.0.1:8086")).unwrap();
        service.close();
        service.close();

        let res = service.write("heap,cluster=c1 value=1\n");
        assert_eq!(
            res.unwrap_err().kind(),
            ::std::io::ErrorKind::NotConnected
        );
        assert!(!service.test_connection());
    }
}
