//! Access to the local Bluetooth controller.
//!
//! The scanner talks to the controller only through [`Stack`] and
//! [`Controller`]. [`bluez`] implements them on top of BlueZ; tests use an
//! in-memory mock.

use std::time::Duration;

use smol_str::SmolStr;

use crate::error::{AdapterError, ControllerError};

pub mod adapter;
pub mod bluez;
#[cfg(test)]
pub mod mock;

/// Six byte hardware address, rendered as `AA:BB:CC:DD:EE:FF`.
pub use bluer::Address as DeviceAddress;

/// Wall time of one inquiry length unit.
pub const INQUIRY_UNIT: Duration = Duration::from_millis(1280);

/// Converts an inquiry length in protocol units to wall time.
pub fn inquiry_length(units: u8) -> Duration {
   INQUIRY_UNIT * u32::from(units)
}

/// Entry point to a host Bluetooth stack.
pub trait Stack {
   type Controller: Controller;

   /// Selects the default local controller and connects to it.
   async fn open_default_controller(&self) -> Result<Self::Controller, AdapterError>;
}

/// An open connection to one local controller.
pub trait Controller {
   fn name(&self) -> &str;

   /// Broadcasts an inquiry and returns responding addresses in report order.
   ///
   /// With `flush_cache` set, devices the controller remembers from earlier
   /// inquiries are not reported unless they answer this one.
   async fn inquiry(
      &self,
      length: Duration,
      max_responses: u16,
      flush_cache: bool,
   ) -> Result<Vec<DeviceAddress>, ControllerError>;

   /// Asks a remote device for its human readable name.
   async fn read_remote_name(
      &self,
      address: DeviceAddress,
      timeout: Duration,
   ) -> Result<SmolStr, ControllerError>;

   /// Gives the connection back to the OS.
   fn release(&mut self);
}
