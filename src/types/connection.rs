use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Database engines a data connection can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    Postgresql,
    Mysql,
    Mongodb,
}

impl DbType {
    pub fn default_port(self) -> u16 {
        match self {
            DbType::Postgresql => 5432,
            DbType::Mysql => 3306,
            DbType::Mongodb => 27017,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DbType::Postgresql => "postgresql",
            DbType::Mysql => "mysql",
            DbType::Mongodb => "mongodb",
        }
    }
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DbType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(DbType::Postgresql),
            "mysql" => Ok(DbType::Mysql),
            "mongodb" | "mongo" => Ok(DbType::Mongodb),
            other => Err(format!("unsupported database type: {other}")),
        }
    }
}

/// Connection as returned by reads. The stored password is never part of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Connection {
    pub id: Uuid,
    pub name: String,
    pub db_type: DbType,
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionCreate {
    pub name: String,
    pub db_type: DbType,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
}

/// Partial update. Absent fields keep their stored value.
///
/// An absent or empty password is never serialized, so the server keeps the
/// stored one.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_type: Option<DbType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub password: Option<String>,
}

impl ConnectionUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// Pre-fill an edit form from a stored record; the password stays empty.
impl From<&Connection> for ConnectionUpdate {
    fn from(c: &Connection) -> Self {
        Self {
            name: Some(c.name.clone()),
            db_type: Some(c.db_type),
            host: Some(c.host.clone()),
            port: Some(c.port.unwrap_or_else(|| c.db_type.default_port())),
            database: c.database.clone(),
            username: c.username.clone(),
            password: None,
        }
    }
}

fn is_blank(password: &Option<String>) -> bool {
    password.as_deref().is_none_or(str::is_empty)
}

/// Ad-hoc connectivity check; nothing is persisted.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionTest {
    pub db_type: DbType,
    pub host: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    pub username: String,
    pub password: String,
}

impl From<&ConnectionCreate> for ConnectionTest {
    fn from(c: &ConnectionCreate) -> Self {
        Self {
            db_type: c.db_type,
            host: c.host.clone(),
            port: c.port,
            database: Some(c.database.clone()).filter(|d| !d.is_empty()),
            username: c.username.clone(),
            password: c.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionTestResult {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ConnectionTestResult {
    pub fn summary(&self) -> String {
        if self.success {
            "Connection test successful! Database is accessible.".to_string()
        } else {
            format!(
                "Connection test failed: {}",
                self.error.as_deref().unwrap_or("Unknown error")
            )
        }
    }
}

macro_rules! redacted_debug {
    ($ty:ident { $($field:ident),* }) => {
        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($ty))
                    $(.field(stringify!($field), &self.$field))*
                    .field("password", &"<redacted>")
                    .finish()
            }
        }
    };
}

redacted_debug!(ConnectionCreate { name, db_type, host, port, database, username });
redacted_debug!(ConnectionUpdate { name, db_type, host, port, database, username });
redacted_debug!(ConnectionTest { db_type, host, port, database, username });
