//! Metadata server configuration.
use eyre::Context;
use serde::Deserialize;

/// Configuration of the metadata server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address the HTTP server listens on.
    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,

    /// Location token images are served from.
    #[serde(default = "defaults::image_base_url")]
    pub image_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: defaults::bind_address(),
            image_base_url: defaults::image_base_url(),
        }
    }
}

impl Config {
    /// Load the configuration from `srtk-metadata.toml` (if present) and
    /// `SRTK_METADATA_*` environment variables.
    ///
    /// # Errors
    ///
    /// May fail if a source cannot be read or holds invalid values.
    pub fn load() -> eyre::Result<Self> {
        config::Config::builder()
            .add_source(
                config::File::with_name("srtk-metadata").required(false),
            )
            .add_source(config::Environment::with_prefix("SRTK_METADATA"))
            .build()
            .wrap_err("failed to read configuration sources")?
            .try_deserialize()
            .wrap_err("failed to deserialize metadata configuration")
    }
}

mod defaults {
    pub(super) fn bind_address() -> String {
        "0.0.0.0:3000".into()
    }

    pub(super) fn image_base_url() -> String {
        crate::resolver::IMAGE_BASE_URL.into()
    }
}
