//! Configuration for the scanner.
//!
//! Values start from built-in defaults or a TOML file named on the command
//! line, and are then overridden by flags. Nothing is read unless a file is
//! named, and nothing is ever written.

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Longest inquiry the HCI `Inquiry` command accepts, in 1.28 s units.
pub const MAX_INQUIRY_LENGTH: u8 = 0x30;

/// Radio transport used for discovery.
#[derive(
   Debug,
   Clone,
   Copy,
   Default,
   PartialEq,
   Eq,
   Serialize,
   Deserialize,
   strum::Display,
   strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Transport {
   /// Classic inquiry.
   #[default]
   BrEdr,
   Le,
   Auto,
}

/// Main configuration structure for a run.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
   /// Inquiry length in 1.28 s units.
   #[serde(default = "default_inquiry_length")]
   pub inquiry_length: u8,

   #[serde(default = "default_max_devices")]
   pub max_devices: u16,

   #[serde(default = "default_name_attempts")]
   pub name_attempts: u8,

   /// Per-attempt remote name timeout.
   #[serde(default = "default_name_timeout")]
   pub name_timeout_ms: u64,

   #[serde(default)]
   pub transport: Transport,
}

const fn default_inquiry_length() -> u8 {
   8
}

const fn default_max_devices() -> u16 {
   255
}

const fn default_name_attempts() -> u8 {
   3
}

const fn default_name_timeout() -> u64 {
   5000
}

impl Default for Config {
   fn default() -> Self {
      Self {
         inquiry_length: default_inquiry_length(),
         max_devices: default_max_devices(),
         name_attempts: default_name_attempts(),
         name_timeout_ms: default_name_timeout(),
         transport: Transport::default(),
      }
   }
}

impl Config {
   /// Loads configuration from `path`, or the defaults when none is given.
   ///
   /// Values are not validated here; callers validate once every override
   /// has been applied.
   pub fn load(path: Option<&Path>) -> Result<Self> {
      match path {
         Some(path) => Self::read(path),
         None => Ok(Self::default()),
      }
   }

   fn read(path: &Path) -> Result<Self> {
      let contents = fs::read_to_string(path)?;
      log::debug!("Loaded configuration from {}", path.display());
      Ok(toml::from_str(&contents)?)
   }

   /// Rejects values the controller cannot honour.
   pub fn validate(&self) -> Result<()> {
      if !(1..=MAX_INQUIRY_LENGTH).contains(&self.inquiry_length) {
         return Err(Error::InvalidConfig(format!(
            "inquiry length must be between 1 and {MAX_INQUIRY_LENGTH}, got {}",
            self.inquiry_length
         )));
      }
      if self.max_devices == 0 {
         return Err(Error::InvalidConfig(
            "max devices must be at least 1".to_string(),
         ));
      }
      Ok(())
   }

   pub const fn name_timeout(&self) -> Duration {
      Duration::from_millis(self.name_timeout_ms)
   }
}
