use crate::core::RegistrationLookup;
use crate::utils::error::{GemailsError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

pub const DEFAULT_WHOIS_SERVER: &str = "whois.iana.org";

/// WHOIS TCP port.
pub const WHOIS_PORT: u16 = 43;

/// Root, TLD registry, registrar.
const MAX_WHOIS_DEPTH: usize = 3;

// "refer: whois.verisign-grs.com" (IANA) or
// "Registrar WHOIS Server: whois.example-registrar.com" (thick registries)
static REFER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^[ \t]*refer:[ \t]*([A-Z0-9._\-]+)[ \t]*\r?$").unwrap());
static REGISTRAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?im)^[ \t]*Registrar WHOIS Server:[ \t]*",
        r"(?:whois://)?([A-Z0-9._\-]+)[ \t]*\r?$",
    ))
    .unwrap()
});

/// Perform one WHOIS query and return the raw textual response.
///
/// The query is a single protocol line, so whitespace and control characters
/// are refused before connecting.
pub async fn simple_whois(server: &str, port: u16, query: &str, to: Duration) -> Result<String> {
    let fail = |message: String| GemailsError::WhoisError {
        domain: query.to_string(),
        message,
    };

    if query.is_empty() || query.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(fail("query contains whitespace or control characters".to_string()));
    }

    let mut stream = match timeout(to, TcpStream::connect((server, port))).await {
        Ok(Ok(s)) => s,
        Ok(Err(e)) => return Err(fail(format!("connect error to {server}: {e}"))),
        Err(_) => return Err(fail(format!("connect timeout to {server}"))),
    };

    let line = format!("{query}\r\n");
    match timeout(to, stream.write_all(line.as_bytes())).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(fail(format!("write error to {server}: {e}"))),
        Err(_) => return Err(fail(format!("write timeout to {server}"))),
    }

    let mut buf = Vec::new();
    match timeout(to, stream.read_to_end(&mut buf)).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => return Err(fail(format!("read error from {server}: {e}"))),
        Err(_) => return Err(fail(format!("read timeout from {server}"))),
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Next server named by a WHOIS response, preferring an explicit `refer:`.
pub fn find_referral(response: &str) -> Option<String> {
    REFER_RE
        .captures(response)
        .or_else(|| REGISTRAR_RE.captures(response))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

/// Follows referrals from a root server and returns every response after the
/// root's, concatenated in query order.
pub struct WhoisClient {
    root_server: String,
    port: u16,
    timeout: Duration,
}

impl WhoisClient {
    pub fn new(root_server: &str, timeout: Duration) -> Self {
        Self {
            root_server: root_server.to_string(),
            port: WHOIS_PORT,
            timeout,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

#[async_trait]
impl RegistrationLookup for WhoisClient {
    async fn lookup(&self, domain: &str) -> Result<String> {
        let mut server = self.root_server.clone();
        let mut responses: Vec<String> = Vec::new();

        for depth in 0..MAX_WHOIS_DEPTH {
            tracing::debug!("WHOIS(depth={}) server={} query={}", depth, server, domain);
            let response = match simple_whois(&server, self.port, domain, self.timeout).await {
                Ok(r) => r,
                // A registrar that cannot be reached still leaves the registry data.
                Err(e) if !responses.is_empty() => {
                    tracing::debug!("WHOIS referral to {} failed: {}", server, e);
                    break;
                }
                Err(e) => return Err(e),
            };

            let next = find_referral(&response).filter(|n| *n != server);
            // The root only names the registry; its own text is kept when it is all we get.
            if depth > 0 || next.is_none() {
                responses.push(response);
            }

            match next {
                Some(n) => {
                    tracing::debug!("  Referral to {}", n);
                    server = n;
                }
                None => break,
            }
        }

        let text = responses.join("\n");
        if text.trim().is_empty() {
            return Err(GemailsError::WhoisError {
                domain: domain.to_string(),
                message: "empty response".to_string(),
            });
        }
        Ok(text)
    }
}
