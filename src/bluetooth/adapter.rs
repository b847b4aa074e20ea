//! Scoped ownership of the local controller connection.

use std::time::Duration;

use log::debug;

use super::{Controller, Stack};
use crate::error::AdapterError;

/// Default per-attempt timeout for remote name requests.
pub const DEFAULT_NAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns the open controller connection for the duration of a run.
///
/// The connection is released exactly once, either by [`AdapterHandle::close`]
/// or when the handle is dropped on an early return.
pub struct AdapterHandle<C: Controller> {
   controller: C,
   name_timeout: Duration,
   released: bool,
}

impl<C: Controller> AdapterHandle<C> {
   /// Opens the default controller of `stack`.
   pub async fn open<S>(stack: &S) -> Result<Self, AdapterError>
   where
      S: Stack<Controller = C>,
   {
      let controller = stack.open_default_controller().await?;
      debug!("Opened controller {}", controller.name());
      Ok(Self {
         controller,
         name_timeout: DEFAULT_NAME_TIMEOUT,
         released: false,
      })
   }

   #[must_use]
   pub fn with_name_timeout(mut self, timeout: Duration) -> Self {
      self.name_timeout = timeout;
      self
   }

   pub const fn controller(&self) -> &C {
      &self.controller
   }

   pub const fn name_timeout(&self) -> Duration {
      self.name_timeout
   }

   pub fn close(mut self) {
      self.release();
   }

   fn release(&mut self) {
      if self.released {
         return;
      }
      self.released = true;
      debug!("Releasing controller {}", self.controller.name());
      self.controller.release();
   }
}

impl<C: Controller> Drop for AdapterHandle<C> {
   fn drop(&mut self) {
      self.release();
   }
}
