//! Bluetooth device scanner
//!
//! Runs an inquiry on the default local controller, lists every device
//! that answered with its name, and looks up the name of the device the
//! operator picks.

use std::{io, process::ExitCode};

use log::debug;

use bluetooth::bluez::BluezStack;
use cli::CommandLine;

mod app;
mod bluetooth;
mod cli;
mod config;
mod error;
mod prompt;
mod resolver;
mod scanner;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
   env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

   let commands = CommandLine::parse_args();

   let config = match commands.config() {
      Ok(config) => config,
      Err(e) => {
         eprintln!("bluescan: {e}");
         return ExitCode::FAILURE;
      },
   };
   debug!("Running with {config:?}");

   let stack = BluezStack::new(config.transport);
   let mut input = io::stdin().lock();
   let mut output = io::stdout().lock();

   match app::run(&stack, &config, &mut input, &mut output).await {
      Ok(report) => {
         debug!(
            "Chose device {} of {}: {}",
            report.selected,
            report.devices.len(),
            report.name
         );
         ExitCode::SUCCESS
      },
      Err(e) => {
         eprintln!("bluescan: {e}");
         ExitCode::FAILURE
      },
   }
}
