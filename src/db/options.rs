use std::time::Duration;

use url::Url;

/// Hosts of managed Postgres providers that only accept encrypted connections
const MANAGED_PROVIDER_HOSTS: &[&str] = &[
    "neon.tech",
    "supabase.co",
    "supabase.com",
    "vercel-storage.com",
    "amazonaws.com",
    "azure.com",
    "render.com",
    "railway.app",
    "herokuapp.com",
];

const MASKED_PASSWORD: &str = "****";
const UNPARSEABLE_URL: &str = "<unparseable connection string>";

const SSL_REQUIRED_MODES: &[&str] = &["require", "verify-ca", "verify-full"];

/// Whether the connection asks for encrypted transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslMode {
    /// Encrypted transport is requested explicitly
    Require,
    /// Leave the decision to the driver defaults
    Unspecified,
}

/// Connection settings derived from the configured connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    url: String,
    pub ssl: SslMode,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl ConnectionOptions {
    pub fn from_url(url: &str) -> Self {
        Self {
            url: url.trim().to_string(),
            ssl: detect_ssl_mode(url),
            connect_timeout: Duration::from_secs(10),
            acquire_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeouts(mut self, connect: Duration, acquire: Duration) -> Self {
        self.connect_timeout = connect;
        self.acquire_timeout = acquire;
        self
    }

    /// The connection string as configured
    pub fn raw_url(&self) -> &str {
        &self.url
    }

    /// The URL handed to the driver. When SSL is selected and the string
    /// carries no `sslmode`, `sslmode=require` is added; a bare `ssl=true`
    /// flag is translated since the driver does not know it.
    pub fn effective_url(&self) -> String {
        if self.ssl == SslMode::Unspecified {
            return self.url.clone();
        }

        let Ok(mut parsed) = Url::parse(&self.url) else {
            return self.url.clone();
        };

        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .filter(|(key, _)| key != "ssl")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let has_sslmode = pairs.iter().any(|(key, _)| key == "sslmode");

        {
            let mut query = parsed.query_pairs_mut();
            query.clear();
            for (key, value) in &pairs {
                query.append_pair(key, value);
            }
            if !has_sslmode {
                query.append_pair("sslmode", "require");
            }
        }

        parsed.to_string()
    }

    /// Connection string with the password masked, for logs
    pub fn redacted_url(&self) -> String {
        match Url::parse(&self.url) {
            Ok(mut parsed) => {
                if parsed.password().is_some()
                    && parsed.set_password(Some(MASKED_PASSWORD)).is_err()
                {
                    return UNPARSEABLE_URL.to_string();
                }
                parsed.to_string()
            }
            Err(_) => UNPARSEABLE_URL.to_string(),
        }
    }

    /// Replaces the connection string, and its password, wherever they
    /// appear in a driver message.
    pub fn redact(&self, text: &str) -> String {
        let redacted_url = self.redacted_url();
        let mut out = text
            .replace(&self.effective_url(), &redacted_url)
            .replace(&self.url, &redacted_url);

        if let Some(password) = self.password() {
            out = out.replace(password, MASKED_PASSWORD);
        }
        out
    }

    /// The password as written in the connection string. Works on strings
    /// the URL parser rejects, which are exactly the ones drivers echo back.
    fn password(&self) -> Option<&str> {
        let (_, rest) = self.url.split_once("://")?;
        let (userinfo, _) = rest.split_once('@')?;
        let (_, password) = userinfo.split_once(':')?;
        Some(password).filter(|p| !p.is_empty())
    }
}

/// Decides whether encrypted transport is wanted. An explicit `sslmode`
/// always wins; otherwise `ssl=true` or a managed-provider host selects it.
pub fn detect_ssl_mode(url: &str) -> SslMode {
    let lowered = url.to_ascii_lowercase();

    if let Some(mode) = query_value(&lowered, "sslmode") {
        return if SSL_REQUIRED_MODES.contains(&mode) {
            SslMode::Require
        } else {
            SslMode::Unspecified
        };
    }

    if query_value(&lowered, "ssl") == Some("true") {
        return SslMode::Require;
    }

    if MANAGED_PROVIDER_HOSTS
        .iter()
        .any(|host| lowered.contains(host))
    {
        return SslMode::Require;
    }

    SslMode::Unspecified
}

fn query_value<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}
