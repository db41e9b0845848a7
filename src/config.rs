//! Configuration file handling for the ledger.
//!
//! The configuration file is stored at `$LEDGER_HOME/config.json` and holds the denomination
//! table and the default ticket catalogue. Ledger snapshots live in `$LEDGER_HOME/data`.

use crate::model::{Catalogue, Denominations};
use crate::store::FileStore;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "ledger";
const CONFIG_VERSION: u8 = 1;
const DATA: &str = "data";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$LEDGER_HOME` and from there it loads `$LEDGER_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    data: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, its `data` subdirectory and an initial `config.json` holding
    /// the default denomination table and catalogue.
    ///
    /// # Errors
    /// - Returns an error if `dir` already holds a `config.json` or if any file operation fails.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the ledger home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.is_file() {
            bail!(
                "The ledger home is already initialized, '{}' exists",
                config_path.display()
            )
        }

        let data = root.join(DATA);
        utils::make_dir(&data).await?;

        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            data,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `ledger_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the data directory exists
    pub async fn load(ledger_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = ledger_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Ledger Home is missing, run 'ledger init' first")?;
        let _ = utils::read_dir(&root)
            .await
            .context("Ledger Home is not a directory")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let data = root.join(DATA);
        if !data.is_dir() {
            bail!("The data directory is missing '{}'", data.display())
        }

        Ok(Self {
            root,
            data,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn data_dir(&self) -> &Path {
        &self.data
    }

    pub fn denominations(&self) -> &Denominations {
        &self.config_file.denominations
    }

    pub fn default_catalogue(&self) -> &Catalogue {
        &self.config_file.default_catalogue
    }

    /// The store that holds this home's ledger snapshots.
    pub fn store(&self) -> FileStore {
        FileStore::new(&self.data)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "ledger",
///   "config_version": 1,
///   "denominations": [
///     { "denomination": "$1", "roll_length": 300, "wrap": "remainder" },
///     { "denomination": "$2", "roll_length": 150 }
///   ],
///   "default_catalogue": { "$1": ["1544", "7026"] }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "ledger"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Roll length and wrap rule per denomination
    #[serde(default)]
    denominations: Denominations,

    /// Ticket numbers the catalogue starts from before saved entries are merged in
    #[serde(default = "default_catalogue")]
    default_catalogue: Catalogue,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            denominations: Denominations::default(),
            default_catalogue: default_catalogue(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or names a different app
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

/// The ticket numbers the store stocked when the ledger was first set up.
fn default_catalogue() -> Catalogue {
    [
        ("$1", vec!["1544", "7026", "1536"]),
        (
            "$2",
            vec!["1510", "1541", "7027", "1594", "1537", "1530", "1533", "1545"],
        ),
        ("$3", vec!["1531", "1516", "1497"]),
        (
            "$5",
            vec![
                "7023", "5054", "1514", "1499", "1511", "1521", "1522", "7020", "5052", "1524",
                "1527", "1534", "1538", "1542", "1546",
            ],
        ),
        (
            "$10",
            vec![
                "1547", "7025", "1528", "5053", "1508", "5028", "1454", "1512", "5049", "1535",
            ],
        ),
        ("$20", vec!["1543", "1501", "1513", "1457", "1539"]),
        ("$30", vec!["5048"]),
        ("$50", vec!["1529"]),
    ]
    .into_iter()
    .collect()
}
