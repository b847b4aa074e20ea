//! A single scanner run: open, scan, list, choose, look up, release.

use std::io::{BufRead, Write};

use log::info;

use crate::{
   bluetooth::{Stack, adapter::AdapterHandle},
   config::Config,
   error::{Result, ScanError},
   prompt::prompt_selection,
   resolver::{resolve_all, resolve_name},
   scanner::{self, ScanResult},
};

/// Outcome of a successful run.
#[derive(Debug)]
pub struct Report {
   pub devices: ScanResult,
   pub selected: usize,
   pub name: String,
}

/// Runs one discovery session against `stack`.
///
/// The adapter is released on every path once it was opened. An empty scan
/// ends the run before the operator is asked for anything.
pub async fn run<S, R, W>(
   stack: &S,
   config: &Config,
   input: &mut R,
   output: &mut W,
) -> Result<Report>
where
   S: Stack,
   R: BufRead,
   W: Write,
{
   let handle = AdapterHandle::open(stack)
      .await?
      .with_name_timeout(config.name_timeout());

   let mut devices = scanner::scan(&handle, config.inquiry_length, config.max_devices).await?;
   if devices.is_empty() {
      return Err(ScanError::NoDevicesFound.into());
   }

   resolve_all(&handle, &mut devices, config.name_attempts).await;
   for (index, device) in devices.iter().enumerate() {
      writeln!(output, "{index}: {}  {}", device.address, device.display_name())?;
   }

   writeln!(output, "\nChoose your device by number")?;
   let selected = prompt_selection(devices.len(), input, output)?;

   let address = devices[selected].address;
   let name = resolve_name(&handle, &address, config.name_attempts).await;
   writeln!(
      output,
      "The device {selected} is chosen,\naddress is: {address}\nname is: {name}"
   )?;
   info!("Selected {address} ({name})");

   handle.close();
   Ok(Report {
      devices,
      selected,
      name,
   })
}
