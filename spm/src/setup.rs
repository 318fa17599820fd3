use crate::config::SP_INIT_SUCCESS;
use crate::error::Error;
use crate::mm::Xlat;
use crate::platform::{Boot, ContextManager, Platform};
use crate::world::SecurityState;
use crate::Spm;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    EntryDiscovered,
    ContextPrepared,
    Registered,
    Running,
    /// Setup failed; no call is ever served.
    Disabled,
}

impl InitState {
    pub fn is_enabled(&self) -> bool {
        matches!(self, InitState::Registered | InitState::Running)
    }
}

/// Proof of a successful `Spm::setup`, handed to the boot orchestrator
/// which passes it back to `Spm::init` once.
#[must_use]
#[derive(Debug)]
pub struct InitHook {
    _private: (),
}

impl<P: Platform> Spm<P> {
    /// Finds the secure partition's entry point, prepares its context and
    /// address space and registers `init` for deferred invocation.
    ///
    /// Failing here is not fatal: the dispatcher stays disabled and every
    /// call it gets answers `SMC_UNK`.
    pub fn setup(&mut self) -> Result<(), Error> {
        debug!("SPM: setup entry");

        if self.state != InitState::Uninitialized {
            return Err(Error::AlreadySetup);
        }

        if let Err(e) = self.try_setup() {
            warn!("SPM: setup failed with {:?}, disabled", e);
            self.state = InitState::Disabled;
            return Err(e);
        }

        self.platform.register_init(InitHook { _private: () });
        self.state = InitState::Registered;

        debug!("SPM: setup exit");
        Ok(())
    }

    fn try_setup(&mut self) -> Result<(), Error> {
        let big_endian = self.platform.el3_big_endian();

        let ep = match self.platform.secure_ep_info() {
            Some(ep) => ep,
            None => {
                warn!(
                    "No SPM provided by the boot loader, booting without SPM initialization. \
                     SMCs destined for SPM will return SMC_UNK"
                );
                return Err(Error::NoEntryPoint);
            }
        };

        // No valid entry point for the partition, bail out without
        // registering anything
        if ep.pc == 0 {
            return Err(Error::NullEntryPoint);
        }
        self.state = InitState::EntryDiscovered;

        let pc = ep.pc;
        ep.init_secure_el0(pc, big_endian);
        self.platform.set_context(self.ctx.id(), SecurityState::Secure);

        // The S-EL1 MMU configuration lands in the secure context and is
        // applied on every entry
        self.platform.setup_secure_partition(&mut self.ctx.cpu)?;
        self.state = InitState::ContextPrepared;

        Ok(())
    }

    /// Passes control to the secure partition for the first time after a
    /// cold boot and waits for it to report its initialisation done.
    pub fn init(&mut self, hook: InitHook) -> u64 {
        let InitHook { .. } = hook;
        debug!("SPM: init entry");

        assert_eq!(
            self.state,
            InitState::Registered,
            "SPM: init without a successful setup"
        );

        // setup() has seen the descriptor, losing it now is a broken boot
        let ep = match self.platform.secure_ep_info() {
            Some(ep) => *ep,
            None => panic!("SPM: secure payload entry point missing at init"),
        };
        self.ctx.cpu.init(&ep);

        self.init_in_progress = true;
        let rc = self.synchronous_enter();
        assert_eq!(
            rc, SP_INIT_SUCCESS,
            "SPM: secure partition failed to initialise"
        );
        self.init_in_progress = false;

        self.state = InitState::Running;
        info!("SPM: secure partition initialised");
        rc
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entry::{EpAttr, Spsr};
    use crate::error::Error;
    use crate::mm::XlatError;
    use crate::smc::*;
    use crate::test_utils::mock::MockPlatform;
    use crate::test_utils::*;

    #[test]
    fn setup_registers_init() {
        let mut spm = Spm::new(MockPlatform::new());

        assert_eq!(spm.setup(), Ok(()));
        assert_eq!(spm.state(), InitState::Registered);
        assert!(spm.platform().init_hook.is_some());
        assert_eq!(
            spm.platform().contexts[SecurityState::Secure.index()],
            Some(spm.context().id())
        );
        // translation tables were built into the secure context
        assert_eq!(spm.context().cpu().sys_regs.ttbr0, SP_TTBR0);
    }

    #[test]
    fn setup_completes_descriptor() {
        let mut spm = Spm::new(MockPlatform::new());
        spm.platform_mut().big_endian = true;

        spm.setup().unwrap();

        let ep = spm.platform().ep.unwrap();
        assert_eq!(ep.pc, SP_ENTRY);
        assert_eq!(ep.attr, EpAttr::ST_ENABLE | EpAttr::EE_BIG);
        assert_eq!(ep.spsr, Spsr::el0_sp0_masked());
        assert_eq!(ep.args, [0; 8]);
    }

    #[test]
    fn setup_without_entry_point_disables() {
        let mut spm = Spm::new(MockPlatform::new());
        spm.platform_mut().ep = None;

        assert_eq!(spm.setup(), Err(Error::NoEntryPoint));
        assert_eq!(spm.state(), InitState::Disabled);
        assert!(spm.platform().init_hook.is_none());
    }

    #[test]
    fn setup_with_null_pc_disables() {
        let mut spm = Spm::new(MockPlatform::new());
        spm.platform_mut().ep.as_mut().unwrap().pc = 0;

        assert_eq!(spm.setup(), Err(Error::NullEntryPoint));
        assert_eq!(spm.state(), InitState::Disabled);
        assert!(spm.platform().init_hook.is_none());
    }

    #[test]
    fn setup_with_failing_xlat_disables() {
        let mut spm = Spm::new(MockPlatform::new());
        spm.platform_mut().setup_result = Err(XlatError::EINVAL);

        assert_eq!(spm.setup(), Err(Error::Xlat(XlatError::EINVAL)));
        assert_eq!(spm.state(), InitState::Disabled);
    }

    #[test]
    fn setup_only_once() {
        let mut spm = setup_spm();
        assert_eq!(spm.setup(), Err(Error::AlreadySetup));
        assert_eq!(spm.state(), InitState::Registered);
    }

    #[test]
    fn disabled_spm_answers_unknown() {
        let mut spm = Spm::new(MockPlatform::new());
        spm.platform_mut().ep = None;
        let _ = spm.setup();

        let calls = [
            SmcCall::from_non_secure(SP_COMMUNICATE_AARCH64, &[0, 0x8800_0000, 0x100]),
            SmcCall::from_non_secure(SP_COMMUNICATE_AARCH32, &[0, 0x8800_0000, 0x100]),
            SmcCall::from_non_secure(0xc400_0001, &[]),
        ];
        for call in calls.iter() {
            spm.platform_mut().ns.gp_regs[0] = 0;
            spm.smc_handler(call);
            assert_eq!(spm.platform().ns.gp_regs[0], SMC_UNK);
        }

        let calls = [
            SmcCall::from_secure(SP_EVENT_COMPLETE_AARCH64, &[0]),
            SmcCall::from_secure(SP_MEMORY_ATTRIBUTES_SET_AARCH64, &[SP_BASE, 1, 1]),
            SmcCall::from_secure(SP_COMMUNICATE_AARCH64, &[0, 0x8800_0000, 0x100]),
        ];
        for call in calls.iter() {
            spm.ctx.cpu.gp_regs[0] = 0;
            spm.smc_handler(call);
            assert_eq!(spm.context().cpu().gp_regs[0], SMC_UNK);
        }

        assert!(spm.platform().attr_changes.is_empty());
        assert!(spm.platform().secure_entries.is_empty());
    }

    #[test]
    fn init_enters_partition_at_el0() {
        let mut spm = setup_spm();
        spm.platform_mut()
            .script_secure(&[SmcCall::from_secure(SP_EVENT_COMPLETE_AARCH64, &[0])]);
        let hook = spm.platform_mut().init_hook.take().unwrap();

        assert_eq!(spm.init(hook), SP_INIT_SUCCESS);
        assert_eq!(spm.state(), InitState::Running);
        assert!(!spm.init_in_progress());
        assert!(spm.context().is_parked());

        let entry = &spm.platform().secure_entries[0];
        assert_eq!(entry.elr, SP_ENTRY);
        assert_eq!(entry.spsr, Spsr::el0_sp0_masked().get());
        assert_eq!(entry.regs, [0; 4]);
    }

    #[test]
    fn init_flag_is_set_while_partition_boots() {
        let mut spm = setup_spm();
        spm.platform_mut().script_secure(&[
            SmcCall::from_secure(SP_MEMORY_ATTRIBUTES_SET_AARCH64, &[SP_BASE, 1, 0b001]),
            SmcCall::from_secure(SP_EVENT_COMPLETE_AARCH64, &[0]),
        ]);
        let hook = spm.platform_mut().init_hook.take().unwrap();

        spm.init(hook);

        // the partition was entered a second time to get the status of its
        // attribute change, still inside the cold boot entry
        let entries = &spm.platform().secure_entries;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].regs[0], 0);
        assert!(!spm.init_in_progress());
    }

    #[test]
    #[should_panic(expected = "failed to initialise")]
    fn init_aborts_on_partition_failure() {
        let mut spm = setup_spm();
        spm.platform_mut()
            .script_secure(&[SmcCall::from_secure(SP_EVENT_COMPLETE_AARCH64, &[1])]);
        let hook = spm.platform_mut().init_hook.take().unwrap();

        spm.init(hook);
    }

    #[test]
    #[should_panic(expected = "entry point missing at init")]
    fn init_aborts_without_entry_point() {
        let mut spm = setup_spm();
        let hook = spm.platform_mut().init_hook.take().unwrap();
        spm.platform_mut().ep = None;

        spm.init(hook);
    }
}
