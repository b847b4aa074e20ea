//! Command line surface.
//!
//! Every flag is optional and overrides the matching configuration value.

use std::path::PathBuf;

use clap::Parser;

use crate::{
   config::{Config, Transport},
   error::Result,
};

#[derive(Parser, Debug)]
#[command(name = "bluescan")]
#[command(about = "Discover nearby Bluetooth devices and look up one by number.")]
pub struct CommandLine {
   /// Read settings from this TOML file before applying flags
   #[arg(long, value_name = "PATH")]
   pub config: Option<PathBuf>,

   /// Inquiry length in 1.28 s units
   #[arg(short, long, value_name = "UNITS")]
   pub duration: Option<u8>,

   /// Stop collecting after this many devices
   #[arg(short, long, value_name = "N")]
   pub max_devices: Option<u16>,

   /// Name requests per device before giving up
   #[arg(short, long, value_name = "N")]
   pub retries: Option<u8>,

   /// Timeout of a single name request in milliseconds
   #[arg(long, value_name = "MS")]
   pub name_timeout: Option<u64>,

   /// Radio transport to discover on: bredr, le or auto
   #[arg(short, long)]
   pub transport: Option<Transport>,
}

impl CommandLine {
   pub fn parse_args() -> Self {
      Self::parse()
   }

   /// Builds the run configuration: file (if any), then flags, then validation.
   pub fn config(&self) -> Result<Config> {
      let mut config = Config::load(self.config.as_deref())?;
      self.apply(&mut config);
      config.validate()?;
      Ok(config)
   }

   /// Replaces file values with any flag given on the command line.
   pub fn apply(&self, config: &mut Config) {
      if let Some(duration) = self.duration {
         config.inquiry_length = duration;
      }
      if let Some(max_devices) = self.max_devices {
         config.max_devices = max_devices;
      }
      if let Some(retries) = self.retries {
         config.name_attempts = retries;
      }
      if let Some(timeout) = self.name_timeout {
         config.name_timeout_ms = timeout;
      }
      if let Some(transport) = self.transport {
         config.transport = transport;
      }
   }
}
