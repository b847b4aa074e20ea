//! Inquiry phase: collects the addresses of nearby devices.

use std::ops::Deref;

use log::{debug, info};
use smol_str::SmolStr;

use crate::{
   bluetooth::{Controller, DeviceAddress, adapter::AdapterHandle, inquiry_length},
   error::ScanError,
};

/// Shown in place of a name that could not be resolved.
pub const UNKNOWN_NAME: &str = "[unknown]";

/// A device that answered the inquiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
   pub address: DeviceAddress,
   pub resolved_name: Option<SmolStr>,
}

impl DiscoveredDevice {
   pub const fn new(address: DeviceAddress) -> Self {
      Self {
         address,
         resolved_name: None,
      }
   }

   pub fn display_name(&self) -> &str {
      self.resolved_name.as_deref().unwrap_or(UNKNOWN_NAME)
   }
}

/// Devices in the order the controller reported them, never more than the
/// capacity given at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
   devices: Vec<DiscoveredDevice>,
   capacity: usize,
}

impl ScanResult {
   pub fn with_capacity(capacity: usize) -> Result<Self, ScanError> {
      if capacity == 0 {
         return Err(ScanError::InvalidCapacity);
      }
      Ok(Self {
         devices: Vec::new(),
         capacity,
      })
   }

   pub const fn capacity(&self) -> usize {
      self.capacity
   }

   /// Appends a device; refused once the result is full.
   pub fn push(&mut self, device: DiscoveredDevice) -> bool {
      if self.devices.len() >= self.capacity {
         return false;
      }
      self.devices.push(device);
      true
   }

   pub(crate) fn devices_mut(&mut self) -> &mut [DiscoveredDevice] {
      &mut self.devices
   }
}

impl Deref for ScanResult {
   type Target = [DiscoveredDevice];

   fn deref(&self) -> &Self::Target {
      &self.devices
   }
}

/// Runs a cache-flushed inquiry for `duration_units` and returns at most
/// `max_devices` devices, none of them named yet.
pub async fn scan<C: Controller>(
   handle: &AdapterHandle<C>,
   duration_units: u8,
   max_devices: u16,
) -> Result<ScanResult, ScanError> {
   let mut result = ScanResult::with_capacity(usize::from(max_devices))?;

   let addresses = handle
      .controller()
      .inquiry(inquiry_length(duration_units), max_devices, true)
      .await
      .map_err(ScanError::InquiryFailed)?;

   let reported = addresses.len();
   for address in addresses {
      if !result.push(DiscoveredDevice::new(address)) {
         debug!("Dropping inquiry responses beyond {}", result.capacity());
         break;
      }
   }

   info!("Inquiry found {} devices ({reported} reported)", result.len());
   Ok(result)
}
