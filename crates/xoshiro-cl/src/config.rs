//! Konfiguration aus Umgebungsvariablen (optional per `.env`).

use std::{ffi::OsString, str::FromStr};

use log::LevelFilter;

use crate::{program::DEFAULT_BUILD_OPTIONS, ClError};

pub const BUILD_OPTIONS_VAR: &str = "XOSHIRO_CL_BUILD_OPTIONS";
pub const LOG_VAR: &str = "XOSHIRO_CL_LOG";
pub const SHOW_KERNELS_VAR: &str = "XOSHIRO_CL_SHOW_KERNELS";

static KNOWN_VARS: [&str; 3] = [BUILD_OPTIONS_VAR, LOG_VAR, SHOW_KERNELS_VAR];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub build_options: String,
    pub log_level: LevelFilter,
    /// Eingebettete Kernel beim Start ausgeben
    pub show_kernels: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build_options: DEFAULT_BUILD_OPTIONS.to_owned(),
            log_level: LevelFilter::Info,
            show_kernels: false,
        }
    }
}

impl Config {
    /// Lädt `.env` (falls vorhanden) und liest dann die Prozess‑Umgebung.
    pub fn from_env() -> Result<Self, ClError> {
        dotenv::dotenv().ok();
        Self::from_vars_os(std::env::vars_os())
    }

    /// Wie [`Config::from_vars`], aber über rohe OS‑Strings.
    ///
    /// Nicht‑UTF‑8‑Schlüssel werden übersprungen; ein Nicht‑UTF‑8‑Wert bei einem
    /// eigenen Schlüssel ist ein `ClError::Config`.
    pub fn from_vars_os<I>(vars: I) -> Result<Self, ClError>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut known = Vec::new();
        for (key, value) in vars {
            let Some(key) = key
                .to_str()
                .and_then(|k| KNOWN_VARS.iter().copied().find(|v| *v == k))
            else {
                continue;
            };
            let value = value.into_string().map_err(|raw| ClError::Config {
                key,
                value: raw.to_string_lossy().into_owned(),
            })?;
            known.push((key, value));
        }
        Self::from_vars(known)
    }

    /// Unbekannte Schlüssel werden ignoriert, ungültige Werte sind ein Fehler.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ClError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Config::default();
        for (key, value) in vars {
            let value = value.as_ref().trim();
            match key.as_ref() {
                BUILD_OPTIONS_VAR => config.build_options = value.to_owned(),
                LOG_VAR => {
                    config.log_level = LevelFilter::from_str(value).map_err(|_| ClError::Config {
                        key: LOG_VAR,
                        value: value.to_owned(),
                    })?;
                }
                SHOW_KERNELS_VAR => config.show_kernels = parse_flag(SHOW_KERNELS_VAR, value)?,
                _ => {}
            }
        }
        Ok(config)
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ClError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ClError::Config {
            key,
            value: value.to_owned(),
        }),
    }
}
