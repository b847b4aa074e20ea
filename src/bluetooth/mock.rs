//! In-memory controller for tests.

use std::{
   cell::{Cell, RefCell},
   collections::HashMap,
   rc::Rc,
   time::Duration,
};

use smol_str::SmolStr;

use super::{Controller, DeviceAddress, Stack};
use crate::error::{AdapterError, ControllerError};

#[derive(Debug, Clone, Copy)]
pub enum OpenFailure {
   NoController,
   ConnectionFailed,
}

/// How a device answers remote name requests.
#[derive(Debug, Clone)]
pub enum NameReply {
   Always(SmolStr),
   Never,
   /// Fails the first `n` requests, then answers.
   After(u32, SmolStr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InquiryRequest {
   pub length: Duration,
   pub max_responses: u16,
   pub flush_cache: bool,
}

#[derive(Default)]
struct State {
   opens: Cell<u32>,
   releases: Cell<u32>,
   open_failure: Cell<Option<OpenFailure>>,
   inquiry_fails: Cell<bool>,
   devices: RefCell<Vec<DeviceAddress>>,
   names: RefCell<HashMap<DeviceAddress, NameReply>>,
   name_requests: RefCell<HashMap<DeviceAddress, u32>>,
   inquiries: RefCell<Vec<InquiryRequest>>,
}

/// Scriptable stack that counts every open and release.
#[derive(Clone, Default)]
pub struct MockStack {
   state: Rc<State>,
}

impl MockStack {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn fail_open(self, failure: OpenFailure) -> Self {
      self.state.open_failure.set(Some(failure));
      self
   }

   pub fn fail_inquiry(self) -> Self {
      self.state.inquiry_fails.set(true);
      self
   }

   pub fn with_device(self, address: &str, reply: NameReply) -> Self {
      let address: DeviceAddress = address.parse().expect("valid test address");
      self.state.devices.borrow_mut().push(address);
      self.state.names.borrow_mut().insert(address, reply);
      self
   }

   pub fn opens(&self) -> u32 {
      self.state.opens.get()
   }

   pub fn releases(&self) -> u32 {
      self.state.releases.get()
   }

   pub fn name_requests(&self, address: &str) -> u32 {
      let address: DeviceAddress = address.parse().expect("valid test address");
      self
         .state
         .name_requests
         .borrow()
         .get(&address)
         .copied()
         .unwrap_or(0)
   }

   pub fn inquiries(&self) -> Vec<InquiryRequest> {
      self.state.inquiries.borrow().clone()
   }
}

impl Stack for MockStack {
   type Controller = MockController;

   async fn open_default_controller(&self) -> Result<MockController, AdapterError> {
      match self.state.open_failure.get() {
         Some(OpenFailure::NoController) => Err(AdapterError::NoController),
         Some(OpenFailure::ConnectionFailed) => {
            Err(AdapterError::ConnectionFailed(ControllerError::RequestTimeout))
         },
         None => {
            self.state.opens.set(self.state.opens.get() + 1);
            Ok(MockController {
               state: self.state.clone(),
            })
         },
      }
   }
}

pub struct MockController {
   state: Rc<State>,
}

impl Controller for MockController {
   fn name(&self) -> &str {
      "mock0"
   }

   async fn inquiry(
      &self,
      length: Duration,
      max_responses: u16,
      flush_cache: bool,
   ) -> Result<Vec<DeviceAddress>, ControllerError> {
      self.state.inquiries.borrow_mut().push(InquiryRequest {
         length,
         max_responses,
         flush_cache,
      });
      if self.state.inquiry_fails.get() {
         return Err(ControllerError::RequestTimeout);
      }
      Ok(self.state.devices.borrow().clone())
   }

   async fn read_remote_name(
      &self,
      address: DeviceAddress,
      _timeout: Duration,
   ) -> Result<SmolStr, ControllerError> {
      let attempt = {
         let mut requests = self.state.name_requests.borrow_mut();
         let count = requests.entry(address).or_default();
         *count += 1;
         *count
      };
      match self.state.names.borrow().get(&address) {
         Some(NameReply::Always(name)) => Ok(name.clone()),
         Some(NameReply::After(failures, name)) if attempt > *failures => Ok(name.clone()),
         _ => Err(ControllerError::NameUnavailable),
      }
   }

   fn release(&mut self) {
      self.state.releases.set(self.state.releases.get() + 1);
   }
}
