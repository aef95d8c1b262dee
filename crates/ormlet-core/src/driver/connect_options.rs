use serde::Deserialize;

/// Where and how to connect.
///
/// Deserializes from the named options `host`, `port`, `user`, `password`,
/// `db`, `charset` and `autocommit`; all but the credentials and database
/// name have defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectOptions {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub user: String,

    pub password: String,

    pub db: String,

    #[serde(default = "default_charset")]
    pub charset: String,

    #[serde(default = "default_autocommit")]
    pub autocommit: bool,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_charset() -> String {
    "utf8".to_string()
}

fn default_autocommit() -> bool {
    true
}

impl ConnectOptions {
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        db: impl Into<String>,
    ) -> ConnectOptions {
        ConnectOptions {
            host: default_host(),
            port: default_port(),
            user: user.into(),
            password: password.into(),
            db: db.into(),
            charset: default_charset(),
            autocommit: default_autocommit(),
        }
    }
}
