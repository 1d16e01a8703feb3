//! Service URLs from configured host names

use agentprobe_domain::ProbeError;
use url::Url;

/// Join a configured host and an absolute path into a URL.
///
/// Hosts are usually bare names (`db.example.com`) and get `https://`; a host
/// that already carries a scheme is used as given.
pub fn service_url(host: &str, path: &str) -> Result<Url, ProbeError> {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() {
        return Err(ProbeError::Config("service host is empty".into()));
    }

    let base = if host.contains("://") { host.to_string() } else { format!("https://{host}") };
    Url::parse(&format!("{base}{path}"))
        .map_err(|err| ProbeError::Config(format!("invalid service URL for host {host}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_https() {
        let url = service_url("db.example.com", "/dbapi/v4/sql_jobs").unwrap();
        assert_eq!(url.as_str(), "https://db.example.com/dbapi/v4/sql_jobs");
    }

    #[test]
    fn explicit_scheme_and_trailing_slash() {
        let url = service_url(" http://127.0.0.1:8080/ ", "/dbapi/v4/auth/tokens").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/dbapi/v4/auth/tokens");
    }

    #[test]
    fn blank_host_is_config_error() {
        assert!(matches!(service_url("  ", "/x"), Err(ProbeError::Config(_))));
    }
}
