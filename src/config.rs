use std::path::PathBuf;

use color_eyre::{Result, eyre::Context};
use serde::Deserialize;

const ENV_PREFIX: &str = "CATALOG_DIFF_";

/// Runtime settings, read from `CATALOG_DIFF_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Capture directory used when none is given on the command line.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_group_selector")]
    pub group_selector: String,
    #[serde(default = "default_group_attr")]
    pub group_attr: String,
    #[serde(default = "default_item_selector")]
    pub item_selector: String,
    #[serde(default = "default_item_attr")]
    pub item_attr: String,
}

/// Structural markers identifying groups and items in a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub group_selector: String,
    pub group_attr: String,
    pub item_selector: String,
    pub item_attr: String,
}

fn default_extension() -> String {
    "html".into()
}

fn default_group_selector() -> String {
    ".shop-group-row".into()
}

fn default_group_attr() -> String {
    "data-producer-id".into()
}

fn default_item_selector() -> String {
    ".product-row".into()
}

fn default_item_attr() -> String {
    "data-product-id".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dir: None,
            extension: default_extension(),
            group_selector: default_group_selector(),
            group_attr: default_group_attr(),
            item_selector: default_item_selector(),
            item_attr: default_item_attr(),
        }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Config::default().markers()
    }
}

impl Config {
    /// Loads `.env` (if any) and then the process environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, Config>(vars)
            .wrap_err("failed to load config")
    }

    pub fn markers(&self) -> Markers {
        Markers {
            group_selector: self.group_selector.clone(),
            group_attr: self.group_attr.clone(),
            item_selector: self.item_selector.clone(),
            item_attr: self.item_attr.clone(),
        }
    }
}
