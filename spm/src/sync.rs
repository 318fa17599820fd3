//! Synchronous entry into and exit from the secure partition.
//!
//! `synchronous_enter` parks its caller in a [`CallFrame`] and switches to
//! the secure world. Every SMC the partition issues meanwhile goes through
//! the dispatcher; the one that ends in `synchronous_exit` hands back a
//! [`Resume`] for that frame and the blocked caller returns with its result.
//! Only this module fills or empties the pending frame.

use crate::dispatch::Flow;
use crate::platform::{ContextManager, Platform, Transfer};
use crate::world::SecurityState;
use crate::Spm;

/// Continuation of a caller blocked in `synchronous_enter`.
#[derive(Debug, PartialEq, Eq)]
pub struct CallFrame {
    seq: u64,
}

/// Slot holding the frame of the single outstanding synchronous entry.
#[derive(Debug, Default)]
pub struct PendingFrame {
    slot: Option<CallFrame>,
    seq: u64,
}

impl PendingFrame {
    pub(crate) fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    fn capture(&mut self) -> u64 {
        assert!(
            self.slot.is_none(),
            "SPM: synchronous entry while another one is pending"
        );
        self.seq = self.seq.wrapping_add(1);
        self.slot = Some(CallFrame { seq: self.seq });
        self.seq
    }

    fn take(&mut self) -> CallFrame {
        match self.slot.take() {
            Some(frame) => frame,
            None => panic!("SPM: synchronous exit without a pending entry"),
        }
    }
}

/// Result on its way back to the frame it belongs to.
#[must_use]
#[derive(Debug)]
pub struct Resume {
    frame: CallFrame,
    ret: u64,
}

impl Resume {
    fn deliver(self, seq: u64) -> u64 {
        assert_eq!(
            self.frame.seq, seq,
            "SPM: resuming a call frame that was not captured here"
        );
        self.ret
    }
}

impl<P: Platform> Spm<P> {
    /// Enters the secure partition and blocks until it reports completion
    /// through `synchronous_exit`. Returns the partition's result.
    pub(crate) fn synchronous_enter(&mut self) -> u64 {
        assert!(
            !self.ctx.frame.is_pending(),
            "SPM: synchronous entry while another one is pending"
        );
        self.assert_secure_active();

        // Apply the S-EL1 system register context and switch to it
        self.el1_sysregs_restore(SecurityState::Secure);
        self.platform.set_next_eret_context(SecurityState::Secure);

        debug!("SPM: about to enter the secure partition");

        let seq = self.ctx.frame.capture();
        let ret = loop {
            let call = self.platform.enter_secure(&mut self.ctx.cpu);
            match self.dispatch(&call) {
                Flow::Eret => continue,
                Flow::Resume(resume) => break resume.deliver(seq),
            }
        };

        debug_assert!(!self.ctx.frame.is_pending());
        ret
    }

    /// Hands `ret` back to the caller blocked in `synchronous_enter`.
    ///
    /// The returned token must travel straight up to that caller; there is
    /// no other path it can take.
    pub(crate) fn synchronous_exit(&mut self, ret: u64) -> Resume {
        // Save the secure EL1 system register context
        self.assert_secure_active();
        self.el1_sysregs_save(SecurityState::Secure);

        let frame = self.ctx.frame.take();
        Resume { frame, ret }
    }
}
