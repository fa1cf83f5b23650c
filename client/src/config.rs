/*
 * SPDX-License-Identifier: MIT
 *
 * Permission is hereby granted, free of charge, to any person obtaining a
 * copy of this software and associated documentation files (the "Software"),
 * to deal in the Software without restriction, including without limitation
 * the rights to use, copy, modify, merge, publish, distribute, sublicense,
 * and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in
 * all copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
 * THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
 * FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
 * DEALINGS IN THE SOFTWARE.
 */
//! bmc-cli configuration: built-in defaults, then a YAML file, then environment.

use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use libbmc::{BmcVendor, Endpoint};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

const SAMPLE_CONFIG: &str = r#"# bmc-cli configuration
# BMC type: 'ilo' for HP iLO or 'idrac' for Dell iDRAC
bmc_type: ilo

# HP iLO
ilo:
  host: "192.168.1.100"
  username: "admin"
  password: "password"
  port: 443
  use_https: true

# Dell iDRAC
idrac:
  host: "192.168.1.101"
  username: "root"
  password: "calvin"
  port: 443
  use_https: true
"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ilo or idrac
    pub bmc_type: String,
    pub ilo: BmcConfig,
    pub idrac: BmcConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bmc_type: BmcVendor::Ilo.to_string(),
            ilo: BmcConfig::default(),
            idrac: BmcConfig::default(),
        }
    }
}

/// Connection settings for one BMC
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BmcConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub port: u16,
    pub use_https: bool,
}

impl Default for BmcConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            password: String::new(),
            port: libbmc::DEFAULT_PORT,
            use_https: true,
        }
    }
}

/// Debug structure omits the password
impl Debug for BmcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BmcConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("port", &self.port)
            .field("use_https", &self.use_https)
            .finish()
    }
}

impl BmcConfig {
    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    fn validate(&self, vendor: BmcVendor) -> anyhow::Result<()> {
        let (label, env) = match vendor {
            BmcVendor::Ilo => ("iLO", "ILO"),
            BmcVendor::Idrac => ("iDRAC", "IDRAC"),
        };
        for (field, value) in [
            ("host", &self.host),
            ("username", &self.username),
            ("password", &self.password),
        ] {
            if value.is_empty() {
                bail!(
                    "{label} {field} is required (set {env}_{} environment variable or {vendor}.{field} in config file)",
                    field.to_uppercase()
                );
            }
        }
        Ok(())
    }
}

impl Config {
    /// Load the configuration.
    ///
    /// An explicit `config_path` must exist. Without one `./config.yaml` is used
    /// if it is there, otherwise only defaults and environment apply.
    pub fn load(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        match config_path {
            Some(path) => {
                if !path.is_file() {
                    bail!("Config file {} not found", path.display());
                }
                debug!("Using config file {}", path.display());
                figment = figment.merge(Yaml::file(path));
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    debug!("Using config file {}", path.display());
                    figment = figment.merge(Yaml::file(path));
                } else {
                    debug!("No config file, using environment and defaults");
                }
            }
        }

        figment = figment
            .merge(Env::raw().only(&["BMC_TYPE"]))
            .merge(Env::prefixed("ILO_").map(|key| format!("ilo.{key}").into()))
            .merge(Env::prefixed("IDRAC_").map(|key| format!("idrac.{key}").into()));

        let config: Config = figment
            .extract()
            .context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn vendor(&self) -> anyhow::Result<BmcVendor> {
        Ok(self.bmc_type.parse::<BmcVendor>()?)
    }

    /// The settings of the selected BMC type
    pub fn active(&self) -> anyhow::Result<&BmcConfig> {
        Ok(match self.vendor()? {
            BmcVendor::Ilo => &self.ilo,
            BmcVendor::Idrac => &self.idrac,
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let vendor = self.vendor()?;
        self.active()?.validate(vendor)
    }

    pub fn endpoint(&self) -> anyhow::Result<Endpoint> {
        let bmc = self.active()?;
        Ok(Endpoint {
            host: bmc.host.clone(),
            port: Some(bmc.port),
            user: bmc.username.clone(),
            password: bmc.password.clone(),
            use_https: bmc.use_https,
        })
    }
}

/// Write a sample config.yaml into `dir`. An existing file is left alone.
pub fn generate_sample(dir: &Path) -> anyhow::Result<PathBuf> {
    let path = dir.join(DEFAULT_CONFIG_FILE);
    if path.exists() {
        bail!("Config file already exists at {}", path.display());
    }
    fs::write(&path, SAMPLE_CONFIG)
        .with_context(|| format!("Error creating sample config {}", path.display()))?;
    Ok(path)
}
