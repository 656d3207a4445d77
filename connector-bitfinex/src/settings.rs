// settings.rs
// Connection and credential settings. Credentials are opaque values here;
// nothing in the adapter core reads them.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AdapterSettings {
    /// Address of the vendor socket bridge.
    pub address: String,
    pub port: u16,
    pub key: String,
    pub secret: String,
    pub client_id: Option<i32>,
}

impl AdapterSettings {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("address", "127.0.0.1")?
            .set_default("port", 4001_i64)?
            .set_default("key", "")?
            .set_default("secret", "")?
            .add_source(File::with_name("connector").required(false))
            .build()?;

        s.try_deserialize()
    }
}
