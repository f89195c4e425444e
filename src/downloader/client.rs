//! Shared HTTP client construction

use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const TCP_KEEPALIVE: Duration = Duration::from_secs(30);

/// Build the one HTTP client the process uses for every transfer
///
/// Proxy rules come from the conventional environment variables
/// (`HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY`, upper or lower case) and are
/// applied per request by URL; reqwest picks them up by default. HTTP/2 is
/// preferred wherever TLS ALPN negotiates it. A bad proxy value surfaces at
/// request time, not here: this configuration is static and cannot fail.
///
/// Call this once at startup and share the client (cloning it shares the
/// same connection pool).
pub fn build_http_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .tcp_keepalive(TCP_KEEPALIVE)
        .build()
        .expect("Failed to create HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_with_static_config() {
        // Construction must never fail; a panic here means the fixed
        // builder configuration regressed.
        let _client = build_http_client();
    }
}
