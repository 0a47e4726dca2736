use std::fmt;

use crate::error::HookbellError;
use url::{Host, Url};

/// A forward HTTP proxy to tunnel through.
///
/// Credentials are kept exactly as they appear in the proxy URL
/// (percent-encoded); [`ProxyDescriptor::decoded_credentials`] decodes them.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyDescriptor {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyDescriptor {
    /// Parse `http://[user[:pass]@]host[:port][/]`. A missing scheme means `http`.
    pub fn parse(raw: &str) -> Result<Self, HookbellError> {
        let raw = raw.trim();
        let with_scheme = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("http://{raw}")
        };
        let url = Url::parse(&with_scheme)
            .map_err(|e| HookbellError::Config(format!("invalid proxy url {raw}: {e}")))?;

        if url.scheme() != "http" {
            return Err(HookbellError::Config(format!(
                "unsupported proxy scheme '{}', only http:// proxies can tunnel",
                url.scheme()
            )));
        }

        let host = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            _ => return Err(HookbellError::Config(format!("proxy url has no host: {raw}"))),
        };
        let port = url
            .port_or_known_default()
            .ok_or_else(|| HookbellError::Config(format!("proxy url has no port: {raw}")))?;

        let username = Some(url.username())
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        Ok(Self {
            host,
            port,
            username,
            password: url.password().map(str::to_string),
        })
    }

    /// Percent-decoded `(username, password)`, if a username is present.
    pub fn decoded_credentials(&self) -> Option<(String, String)> {
        let user = self.username.as_deref()?;
        let pass = self.password.as_deref().unwrap_or_default();
        Some((percent_decode(user), percent_decode(pass)))
    }

    /// `host:port` suitable for a TCP connect.
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

// Credentials stay out of logs.
impl fmt::Debug for ProxyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyDescriptor")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username.as_ref().map(|_| "<set>"))
            .field("password", &self.password.as_ref().map(|_| "<set>"))
            .finish()
    }
}

fn percent_decode(value: &str) -> String {
    urlencoding::decode(value)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| value.to_string())
}
