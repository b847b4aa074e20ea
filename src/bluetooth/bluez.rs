//! BlueZ backed controller.
//!
//! Talks to `bluetoothd` over D-Bus. An inquiry is a discovery session on
//! the default adapter, bounded by the inquiry length and the response cap.

use std::{collections::HashSet, future::ready, pin::pin, time::Duration};

use bluer::{
   Adapter, AdapterEvent, Device, DeviceEvent, DeviceProperty, DiscoveryFilter,
   DiscoveryTransport, Session,
};
use futures::stream::{self, LocalBoxStream, SelectAll, Stream, StreamExt};
use log::{debug, info, warn};
use smol_str::SmolStr;
use tokio::{select, time};

use super::{Controller, DeviceAddress, Stack};
use crate::{
   config::Transport,
   error::{AdapterError, ControllerError},
};

impl From<Transport> for DiscoveryTransport {
   fn from(transport: Transport) -> Self {
      match transport {
         Transport::BrEdr => Self::BrEdr,
         Transport::Le => Self::Le,
         Transport::Auto => Self::Auto,
      }
   }
}

/// The system Bluetooth stack, reached through `bluetoothd`.
pub struct BluezStack {
   transport: Transport,
}

impl BluezStack {
   pub const fn new(transport: Transport) -> Self {
      Self { transport }
   }
}

impl Stack for BluezStack {
   type Controller = BluezController;

   async fn open_default_controller(&self) -> Result<BluezController, AdapterError> {
      let session = Session::new()
         .await
         .map_err(|e| AdapterError::ConnectionFailed(e.into()))?;

      let names = session
         .adapter_names()
         .await
         .map_err(|e| AdapterError::ConnectionFailed(e.into()))?;
      if names.is_empty() {
         return Err(AdapterError::NoController);
      }

      let adapter = session
         .default_adapter()
         .await
         .map_err(|e| AdapterError::ConnectionFailed(e.into()))?;

      if let Ok(powered) = adapter.is_powered().await
         && !powered
      {
         adapter
            .set_powered(true)
            .await
            .map_err(|e| AdapterError::ConnectionFailed(e.into()))?;
         info!("Powered on adapter: {}", adapter.name());
      }

      Ok(BluezController {
         _session: session,
         adapter,
         transport: self.transport,
      })
   }
}

/// Connection to one BlueZ adapter. Dropping it closes the D-Bus session.
pub struct BluezController {
   _session: Session,
   adapter: Adapter,
   transport: Transport,
}

impl BluezController {
   /// Forgets devices that are neither paired nor connected.
   ///
   /// Returns the devices that had to be kept; they only count as inquiry
   /// responses once they report a fresh signal strength.
   async fn flush_cache(&self) -> Result<HashSet<DeviceAddress>, ControllerError> {
      let mut retained = HashSet::new();
      for addr in self.adapter.device_addresses().await? {
         let Ok(device) = self.adapter.device(addr) else {
            continue;
         };
         let in_use =
            device.is_paired().await.unwrap_or(true) || device.is_connected().await.unwrap_or(true);
         if in_use {
            retained.insert(addr);
            continue;
         }
         match self.adapter.remove_device(addr).await {
            Ok(()) => debug!("Flushed cached device {addr}"),
            Err(e) => {
               warn!("Failed to flush cached device {addr}: {e}");
               retained.insert(addr);
            },
         }
      }
      Ok(retained)
   }
}

/// One `DeviceAdded` per device, emitted on its first RSSI update.
async fn rssi_responses(devices: &[Device]) -> SelectAll<LocalBoxStream<'_, AdapterEvent>> {
   let mut updates = Vec::new();
   for device in devices {
      let addr = device.address();
      match device.events().await {
         Ok(events) => updates.push(
            events
               .filter_map(move |event| {
                  ready(
                     matches!(event, DeviceEvent::PropertyChanged(DeviceProperty::Rssi(_)))
                        .then_some(AdapterEvent::DeviceAdded(addr)),
                  )
               })
               .take(1)
               .boxed_local(),
         ),
         Err(e) => warn!("Failed to watch cached device {addr}: {e}"),
      }
   }
   stream::select_all(updates)
}

/// Drops the `DeviceAdded` events BlueZ replays for devices it already knew.
fn drop_stale<S>(events: S, stale: HashSet<DeviceAddress>) -> impl Stream<Item = AdapterEvent>
where
   S: Stream<Item = AdapterEvent>,
{
   events.filter(move |event| {
      ready(!matches!(event, AdapterEvent::DeviceAdded(addr) if stale.contains(addr)))
   })
}

/// Collects `DeviceAdded` addresses until `length` elapses, `max_responses`
/// were seen or the stream ends.
async fn collect_responses<S>(
   events: S,
   length: Duration,
   max_responses: u16,
) -> Vec<DeviceAddress>
where
   S: Stream<Item = AdapterEvent>,
{
   let mut events = pin!(events);
   let mut deadline = pin!(time::sleep(length));
   let mut found = Vec::new();

   while found.len() < usize::from(max_responses) {
      select! {
         () = &mut deadline => break,
         event = events.next() => match event {
            Some(AdapterEvent::DeviceAdded(addr)) => {
               debug!("Inquiry response from {addr}");
               found.push(addr);
            },
            Some(_) => {},
            None => break,
         },
      }
   }
   found
}

impl Controller for BluezController {
   fn name(&self) -> &str {
      self.adapter.name()
   }

   async fn inquiry(
      &self,
      length: Duration,
      max_responses: u16,
      flush_cache: bool,
   ) -> Result<Vec<DeviceAddress>, ControllerError> {
      let retained = if flush_cache {
         self.flush_cache().await?
      } else {
         HashSet::new()
      };

      self
         .adapter
         .set_discovery_filter(DiscoveryFilter {
            transport: self.transport.into(),
            duplicate_data: false,
            ..Default::default()
         })
         .await?;

      info!(
         "Starting {} inquiry on {} for {:.2}s",
         self.transport,
         self.adapter.name(),
         length.as_secs_f64()
      );
      let known: Vec<Device> = retained
         .iter()
         .filter_map(|&addr| self.adapter.device(addr).ok())
         .collect();
      let refreshed = rssi_responses(&known).await;
      let discovered = drop_stale(self.adapter.discover_devices().await?, retained);
      let found =
         collect_responses(stream::select(discovered, refreshed), length, max_responses).await;

      debug!("Inquiry finished with {} responses", found.len());
      Ok(found)
   }

   async fn read_remote_name(
      &self,
      address: DeviceAddress,
      timeout: Duration,
   ) -> Result<SmolStr, ControllerError> {
      let device = self.adapter.device(address)?;
      // Subscribe before reading so a name arriving in between is not lost.
      let mut events = pin!(device.events().await?);
      if let Some(name) = device.name().await? {
         return Ok(name.into());
      }

      let wait_for_name = async {
         while let Some(event) = events.next().await {
            if let DeviceEvent::PropertyChanged(DeviceProperty::Name(name)) = event {
               return Ok(SmolStr::from(name));
            }
         }
         Err(ControllerError::NameUnavailable)
      };
      time::timeout(timeout, wait_for_name)
         .await
         .map_err(|_| ControllerError::RequestTimeout)?
   }

   fn release(&mut self) {
      info!("Releasing adapter {}", self.adapter.name());
   }
}
