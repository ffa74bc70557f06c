//! Serde data structures for the Patchbay configuration document.
//!
//! One struct per named top-level section. Every section derives
//! `Serialize` and `Deserialize` with `deny_unknown_fields` for strict
//! parsing, and carries a `Default` impl supplying the section's
//! declared defaults for absent fields (container-level
//! `#[serde(default)]`).
//!
//! Duration-valued fields are written in the document as bare integer
//! seconds and normalized into `Duration` during decode via the
//! [`secs`] helper; this conversion is the one unit-normalizing
//! adjustment of resolution and runs exactly once by construction.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bare-integer-seconds representation for `Duration` fields.
pub mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.as_secs())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct AppSetting {
    pub run_mode: String,
    pub max_upload_size: u64,
}

impl Default for AppSetting {
    fn default() -> Self {
        Self {
            run_mode: "debug".into(),
            max_upload_size: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct ServerSetting {
    pub http_ip: String,
    pub http_port: u16,
    #[serde(with = "secs")]
    pub read_timeout: Duration,
    #[serde(with = "secs")]
    pub write_timeout: Duration,
}

impl Default for ServerSetting {
    fn default() -> Self {
        Self {
            http_ip: "0.0.0.0".into(),
            http_port: 8008,
            read_timeout: Duration::from_secs(60),
            write_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct LocalOssSetting {
    pub save_path: PathBuf,
    pub secure: bool,
    pub bucket: String,
    pub domain: String,
}

impl Default for LocalOssSetting {
    fn default() -> Self {
        Self {
            save_path: "custom/data/patchbay/oss".into(),
            secure: false,
            bucket: "public".into(),
            domain: "127.0.0.1:8008".into(),
        }
    }
}

impl LocalOssSetting {
    /// Public URL prefix every object URL of this backend starts with.
    #[must_use]
    pub fn url_prefix(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}/oss/", self.domain)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct MinioSetting {
    pub access_key: String,
    pub secret_key: String,
    pub endpoint: String,
    pub secure: bool,
    pub bucket: String,
    pub domain: String,
}

impl Default for MinioSetting {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            secret_key: String::new(),
            endpoint: "127.0.0.1:9000".into(),
            secure: false,
            bucket: "public".into(),
            domain: "127.0.0.1:9000".into(),
        }
    }
}

impl MinioSetting {
    #[must_use]
    pub fn url_prefix(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}/{}/", self.domain, self.bucket)
    }

    #[must_use]
    pub fn endpoint_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}", self.endpoint)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct S3Setting {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub secure: bool,
    pub bucket: String,
    pub domain: String,
}

impl Default for S3Setting {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            secret_key: String::new(),
            region: "us-east-1".into(),
            secure: true,
            bucket: "public".into(),
            domain: "s3.amazonaws.com".into(),
        }
    }
}

impl S3Setting {
    #[must_use]
    pub fn url_prefix(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}/{}/", self.domain, self.bucket)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct MySqlSetting {
    pub username: String,
    pub password: String,
    pub host: String,
    #[serde(rename = "DBName")]
    pub db_name: String,
}

impl Default for MySqlSetting {
    fn default() -> Self {
        Self {
            username: "patchbay".into(),
            password: String::new(),
            host: "127.0.0.1:3306".into(),
            db_name: "patchbay".into(),
        }
    }
}

impl MySqlSetting {
    #[must_use]
    pub fn dsn(&self) -> String {
        format!(
            "mysql://{}:{}@{}/{}",
            self.username, self.password, self.host, self.db_name
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct PostgresSetting {
    pub username: String,
    pub password: String,
    pub host: String,
    #[serde(rename = "DBName")]
    pub db_name: String,
    pub ssl_mode: String,
}

impl Default for PostgresSetting {
    fn default() -> Self {
        Self {
            username: "patchbay".into(),
            password: String::new(),
            host: "127.0.0.1:5432".into(),
            db_name: "patchbay".into(),
            ssl_mode: "disable".into(),
        }
    }
}

impl PostgresSetting {
    #[must_use]
    pub fn dsn(&self) -> String {
        format!(
            "postgres://{}:{}@{}/{}?sslmode={}",
            self.username, self.password, self.host, self.db_name, self.ssl_mode
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct Sqlite3Setting {
    pub path: PathBuf,
}

impl Default for Sqlite3Setting {
    fn default() -> Self {
        Self {
            path: "custom/data/patchbay/patchbay.db".into(),
        }
    }
}

impl Sqlite3Setting {
    #[must_use]
    pub fn dsn(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path.display())
    }
}

/// Decoded for completeness even though no core capability consumes it;
/// the embedding application's cache layer reads it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct RedisSetting {
    pub init_address: String,
    pub username: String,
    pub password: String,
}

impl Default for RedisSetting {
    fn default() -> Self {
        Self {
            init_address: "127.0.0.1:6379".into(),
            username: String::new(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct JwtSetting {
    pub secret: String,
    pub issuer: String,
    #[serde(with = "secs")]
    pub expire: Duration,
}

impl Default for JwtSetting {
    fn default() -> Self {
        Self {
            secret: String::new(),
            issuer: "patchbay".into(),
            expire: Duration::from_secs(86400),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct SmsJuheSetting {
    pub gateway: String,
    pub key: String,
    pub tpl_id: String,
    pub tpl_key_name: String,
}

impl Default for SmsJuheSetting {
    fn default() -> Self {
        Self {
            gateway: "https://v.juhe.cn/sms/send".into(),
            key: String::new(),
            tpl_id: String::new(),
            tpl_key_name: "code".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct ZincSetting {
    pub endpoint: String,
    pub index: String,
    pub user: String,
    pub password: String,
}

impl Default for ZincSetting {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:4080".into(),
            index: "patchbay".into(),
            user: "admin".into(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct MeiliSetting {
    pub endpoint: String,
    pub index: String,
    pub api_key: String,
}

impl Default for MeiliSetting {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:7700".into(),
            index: "patchbay".into(),
            api_key: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mysql_dsn() {
        let setting = MySqlSetting {
            username: "root".into(),
            password: "secret".into(),
            host: "db:3306".into(),
            db_name: "app".into(),
        };
        assert_eq!(setting.dsn(), "mysql://root:secret@db:3306/app");
    }

    #[test]
    fn postgres_dsn_includes_ssl_mode() {
        let setting = PostgresSetting::default();
        assert_eq!(
            setting.dsn(),
            "postgres://patchbay:@127.0.0.1:5432/patchbay?sslmode=disable"
        );
    }

    #[test]
    fn sqlite_dsn_requests_create_mode() {
        let setting = Sqlite3Setting {
            path: "data/app.db".into(),
        };
        assert_eq!(setting.dsn(), "sqlite://data/app.db?mode=rwc");
    }

    #[test]
    fn local_oss_url_prefix_respects_secure_flag() {
        let mut setting = LocalOssSetting::default();
        assert_eq!(setting.url_prefix(), "http://127.0.0.1:8008/oss/");
        setting.secure = true;
        setting.domain = "files.example.com".into();
        assert_eq!(setting.url_prefix(), "https://files.example.com/oss/");
    }

    #[test]
    fn duration_fields_decode_from_bare_seconds() {
        let setting: ServerSetting =
            serde_json::from_str(r#"{"ReadTimeout": 30, "WriteTimeout": 45}"#).unwrap();
        assert_eq!(setting.read_timeout, Duration::from_secs(30));
        assert_eq!(setting.write_timeout, Duration::from_secs(45));
        // Untouched fields fall back to section defaults.
        assert_eq!(setting.http_port, 8008);
    }
}
