//! Adapter configuration
//!
//! Loaded with the `config` crate from an optional file layered under
//! `AMO_`-prefixed environment variables. Nested keys use a double
//! underscore, so the custom field table can be set from the environment
//! too:
//!
//! ```bash
//! AMO_SUBDOMAIN=prosto
//! AMO_USER_LOGIN=robot@prosto.insure
//! AMO_USER_HASH=...
//! AMO_CUSTOM_FIELDS__ORDER_NUMBER=1450321
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::error::CrmError;
use crate::fields::FieldRegistry;

/// Default location of the optional config file (extension resolved by `config`)
pub const DEFAULT_CONFIG_FILE: &str = "config/amocrm";

/// amoCRM adapter configuration
#[derive(Clone, Deserialize)]
pub struct AmoCrmConfig {
    /// Account subdomain, as in `https://<subdomain>.amocrm.ru`
    pub subdomain: String,
    /// API user login
    pub user_login: String,
    /// API user hash (secret)
    pub user_hash: String,
    /// Logical field name -> CRM custom field id
    #[serde(default)]
    pub custom_fields: HashMap<String, u64>,
    /// Overrides the URL derived from the subdomain
    #[serde(default)]
    pub base_url: Option<String>,
    /// Prefix of the customer-facing order page link
    #[serde(default = "default_order_link_base")]
    pub order_link_base: String,
    /// Product name used in lead names
    #[serde(default = "default_product_label")]
    pub product_label: String,
    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// When false every event is acknowledged without contacting the CRM
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Log level for the operator binary
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_order_link_base() -> String {
    "https://osago.prosto.insure/order/".to_string()
}

fn default_product_label() -> String {
    "Осаго".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_enabled() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AmoCrmConfig {
    /// Creates a config with defaults for everything but the credentials
    pub fn new(
        subdomain: impl Into<String>,
        user_login: impl Into<String>,
        user_hash: impl Into<String>,
    ) -> Self {
        Self {
            subdomain: subdomain.into(),
            user_login: user_login.into(),
            user_hash: user_hash.into(),
            custom_fields: HashMap::new(),
            base_url: None,
            order_link_base: default_order_link_base(),
            product_label: default_product_label(),
            timeout_secs: default_timeout_secs(),
            enabled: default_enabled(),
            log_level: default_log_level(),
        }
    }

    /// Loads configuration from the file named by `AMO_CONFIG_FILE`
    /// (default [`DEFAULT_CONFIG_FILE`]) and the environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let file = std::env::var("AMO_CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load(&file)
    }

    /// Loads configuration from `file` (optional) and the environment
    pub fn load(file: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("AMO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Rejects configurations that cannot possibly authenticate
    pub fn validate(&self) -> Result<(), CrmError> {
        let required = [
            ("subdomain", &self.subdomain),
            ("user_login", &self.user_login),
            ("user_hash", &self.user_hash),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(CrmError::configuration(format!("{key} must not be empty")));
            }
        }
        if self.timeout_secs == 0 {
            return Err(CrmError::configuration("timeout_secs must be positive"));
        }
        Ok(())
    }

    /// Root URL of the CRM account, without a trailing slash
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.amocrm.ru", self.subdomain),
        }
    }

    pub fn field_registry(&self) -> FieldRegistry {
        FieldRegistry::new(self.custom_fields.clone())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_custom_fields(mut self, custom_fields: HashMap<String, u64>) -> Self {
        self.custom_fields = custom_fields;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl fmt::Debug for AmoCrmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmoCrmConfig")
            .field("subdomain", &self.subdomain)
            .field("user_login", &self.user_login)
            .field("user_hash", &"<redacted>")
            .field("custom_fields", &self.custom_fields.len())
            .field("base_url", &self.base_url)
            .field("order_link_base", &self.order_link_base)
            .field("product_label", &self.product_label)
            .field("timeout_secs", &self.timeout_secs)
            .field("enabled", &self.enabled)
            .finish()
    }
}
