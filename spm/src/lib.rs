#![no_std]
#![warn(rust_2018_idioms)]

#[macro_use]
pub mod r#macro;

pub mod config;
pub mod context;
pub mod dispatch;
pub mod entry;
pub mod error;
pub mod logger;
pub mod mm;
pub mod platform;
pub mod setup;
pub mod smc;
pub mod sync;
#[cfg(any(test, feature = "mock"))]
pub mod test_utils;
pub mod world;

#[cfg(any(test, feature = "mock"))]
extern crate alloc;

#[macro_use]
extern crate log;

use crate::context::{ContextId, SpmContext};
use crate::platform::Platform;
use crate::setup::InitState;

/// Secure Partition Manager of one core.
///
/// Owns the secure partition's context together with the cold boot flag and
/// is threaded through every entry point of the dispatcher as `&mut self`.
pub struct Spm<P: Platform> {
    pub(crate) platform: P,
    pub(crate) ctx: SpmContext,
    /// Set only while the cold boot entry into the secure partition is in flight.
    pub(crate) init_in_progress: bool,
    pub(crate) state: InitState,
}

impl<P: Platform> Spm<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            ctx: SpmContext::new(ContextId::secure(config::PRIMARY_CPU)),
            init_in_progress: false,
            state: InitState::Uninitialized,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn context(&self) -> &SpmContext {
        &self.ctx
    }

    pub fn state(&self) -> InitState {
        self.state
    }

    pub fn init_in_progress(&self) -> bool {
        self.init_in_progress
    }
}
