use crate::config::PAGE_SIZE;
use crate::mm::{self, translate_attributes, Xlat};
use crate::platform::{ContextManager, Platform};
use crate::smc::{self, Request, SmcCall, SMC_UNK};
use crate::sync::Resume;
use crate::world::SecurityState;
use crate::Spm;

/// What happens after a call was served.
#[derive(Debug)]
pub(crate) enum Flow {
    /// Return out of EL3 through the context selected for the next eret.
    Eret,
    /// Resume the caller blocked in `synchronous_enter`.
    Resume(Resume),
}

impl<P: Platform> Spm<P> {
    /// Entry point of the EL3 runtime for every SMC routed to the SPM.
    ///
    /// Return values are written into the register context of the world
    /// that runs next.
    pub fn smc_handler(&mut self, call: &SmcCall) {
        if let Flow::Resume(resume) = self.dispatch(call) {
            // Only the cold boot entry ever waits for a completion
            panic!("SPM: {:?} reached the runtime without a blocked entry", resume);
        }
    }

    pub(crate) fn dispatch(&mut self, call: &SmcCall) -> Flow {
        trace!(
            "SPM: {0: <32} {1:X?} from {2:?}",
            smc::to_str(call.fid),
            call.args,
            call.origin
        );

        if !self.state.is_enabled() {
            return self.unknown(call);
        }

        match Request::parse(call) {
            Request::EventComplete { result } => self.event_complete(result),
            Request::MemAttributesSet { base, pages, attr } => {
                let status = self.mem_attributes_set(base, pages, attr);
                self.smc_ret(SecurityState::Secure, &[status]);
                Flow::Eret
            }
            Request::Communicate { fid, x2, x3 } => self.communicate(fid, x2, x3),
            Request::Unknown(_) => self.unknown(call),
        }
    }

    fn unknown(&mut self, call: &SmcCall) -> Flow {
        warn!(
            "SPM: unhandled SMC {:#X} ({}) from {:?}",
            call.fid,
            smc::to_str(call.fid),
            call.origin
        );
        self.smc_ret(call.origin, &[SMC_UNK]);
        Flow::Eret
    }

    fn event_complete(&mut self, result: u64) -> Flow {
        self.assert_secure_active();
        self.el1_sysregs_save(SecurityState::Secure);
        self.setup_next_eret_into_sel0();
        // Every later request resumes the partition right here
        self.ctx.park();

        if self.init_in_progress {
            // The completion belongs to the cold boot entry, jump back to it
            return Flow::Resume(self.synchronous_exit(result));
        }

        // Result of an earlier request, hand it to the normal world
        assert!(
            self.platform.context(SecurityState::NonSecure).is_some(),
            "SPM: no non-secure context to return to"
        );
        self.el1_sysregs_restore(SecurityState::NonSecure);
        self.platform.set_next_eret_context(SecurityState::NonSecure);
        self.smc_ret(SecurityState::NonSecure, &[result]);
        Flow::Eret
    }

    fn mem_attributes_set(&mut self, base: usize, pages: usize, attr: u64) -> u64 {
        let size = pages.wrapping_mul(PAGE_SIZE);
        let tf_attr = translate_attributes(attr);

        info!("Received SP_MEMORY_ATTRIBUTES_SET SMC");
        info!("  Start address  : {:#x}", base);
        info!("  Number of pages: {} ({} bytes)", pages, size);
        info!("  Attributes     : {:#x} ({:?})", attr, tf_attr);

        mm::status(self.platform.change_mem_attributes(base, size, tf_attr))
    }

    fn communicate(&mut self, fid: u32, x2: u64, x3: u64) -> Flow {
        // The partition is resumed as if it returned from its last
        // completion call, so it has to be sitting there
        if !self.ctx.is_parked() {
            warn!("SPM: secure partition is not waiting for requests");
            self.smc_ret(SecurityState::NonSecure, &[SMC_UNK]);
            return Flow::Eret;
        }

        // Save the normal world context
        self.el1_sysregs_save(SecurityState::NonSecure);

        // Restore the secure world context and prepare for entry in S-EL0
        self.assert_secure_active();
        self.el1_sysregs_restore(SecurityState::Secure);
        self.platform.set_next_eret_context(SecurityState::Secure);
        self.ctx.unpark();

        let core = self.platform.core_pos() as u64;
        self.smc_ret(SecurityState::Secure, &[fid as u64, x2, x3, core]);
        Flow::Eret
    }
}
