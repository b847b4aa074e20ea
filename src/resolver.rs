//! Best-effort remote name lookup.
//!
//! A failed lookup is normal (device out of range, not discoverable, slow to
//! answer) and never fails the run.

use log::debug;
use smol_str::SmolStr;

use crate::{
   bluetooth::{Controller, DeviceAddress, adapter::AdapterHandle},
   scanner::{ScanResult, UNKNOWN_NAME},
};

/// Asks `address` for its name up to `max_attempts` times in a row.
pub async fn try_resolve_name<C: Controller>(
   handle: &AdapterHandle<C>,
   address: &DeviceAddress,
   max_attempts: u8,
) -> Option<SmolStr> {
   for attempt in 1..=max_attempts {
      match handle
         .controller()
         .read_remote_name(*address, handle.name_timeout())
         .await
      {
         Ok(name) => return Some(name),
         Err(e) => debug!("Name request {attempt}/{max_attempts} for {address} failed: {e}"),
      }
   }
   None
}

/// Resolves the name of `address`, or [`UNKNOWN_NAME`] once every attempt failed.
pub async fn resolve_name<C: Controller>(
   handle: &AdapterHandle<C>,
   address: &DeviceAddress,
   max_attempts: u8,
) -> String {
   try_resolve_name(handle, address, max_attempts)
      .await
      .map_or_else(|| UNKNOWN_NAME.to_string(), String::from)
}

/// Fills in the names of a scan result, one device at a time.
pub async fn resolve_all<C: Controller>(
   handle: &AdapterHandle<C>,
   result: &mut ScanResult,
   max_attempts: u8,
) {
   for device in result.devices_mut() {
      device.resolved_name = try_resolve_name(handle, &device.address, max_attempts).await;
   }
}
