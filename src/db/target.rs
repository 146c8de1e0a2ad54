use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const APPLICATION_NAME: &str = "stats-collector";

/// Root certificate used when SSL is requested without an explicit path.
pub const DEFAULT_SSL_ROOT_CERT: &str = "ca-root.pem";

/// Which logical database on the server to connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetDatabase {
    #[default]
    Workgroup,
    Relationship,
}

impl TargetDatabase {
    /// Database name embedded in the connection URL.
    pub fn database_name(self) -> &'static str {
        match self {
            TargetDatabase::Workgroup => "workgroup",
            TargetDatabase::Relationship => "Relationship",
        }
    }

    pub fn url(self, host: &str, port: &str, ssl: Option<&SslSettings>) -> String {
        let mut url = format!(
            "postgres://{host}:{port}/{db}?application_name={APPLICATION_NAME}",
            db = self.database_name(),
        );
        if let Some(ssl) = ssl {
            url.push_str(&ssl.url_suffix());
        }
        url
    }
}

impl fmt::Display for TargetDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetDatabase::Workgroup => f.write_str("workgroup"),
            TargetDatabase::Relationship => f.write_str("relationship"),
        }
    }
}

impl FromStr for TargetDatabase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "workgroup" => Ok(TargetDatabase::Workgroup),
            "relationship" => Ok(TargetDatabase::Relationship),
            other => Err(format!(
                "unknown target database '{other}'; valid values: workgroup, relationship"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SslSettings {
    pub root_cert: String,
}

impl Default for SslSettings {
    fn default() -> Self {
        Self {
            root_cert: DEFAULT_SSL_ROOT_CERT.to_string(),
        }
    }
}

impl SslSettings {
    fn url_suffix(&self) -> String {
        format!("&sslmode=verify-full&sslrootcert={}", self.root_cert)
    }
}

/// Everything needed to open a session. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: String,
    pub username: String,
    pub password: String,
    pub target: TargetDatabase,
    pub ssl: Option<SslSettings>,
}

impl ConnectionParams {
    /// Connection URL without credentials; safe to log.
    pub fn url(&self) -> String {
        self.target.url(&self.host, &self.port, self.ssl.as_ref())
    }
}

// Hand-written so the password never reaches a log line.
impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("target", &self.target)
            .field("ssl", &self.ssl)
            .finish()
    }
}
