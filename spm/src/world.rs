use crate::context::CpuContext;
use crate::platform::{ContextManager, Platform};
use crate::Spm;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecurityState {
    Secure,
    NonSecure,
}

impl SecurityState {
    pub fn index(&self) -> usize {
        match self {
            SecurityState::Secure => 0,
            SecurityState::NonSecure => 1,
        }
    }
}

/// Replaces the S-EL1 re-entry information of the secure context with the
/// S-EL0 re-entry information recorded in its banked ELR_EL1/SPSR_EL1, so
/// the next exception return lands in the secure partition itself.
pub fn prepare_unprivileged_return(ctx: &mut CpuContext) {
    ctx.el3_state.elr = ctx.sys_regs.elr;
    ctx.el3_state.spsr = ctx.sys_regs.spsr;
}

impl<P: Platform> Spm<P> {
    /// Aborts unless the secure partition's context is the one registered
    /// as the active secure context.
    pub(crate) fn assert_secure_active(&self) {
        let active = self.platform.context(SecurityState::Secure);
        assert!(
            active == Some(self.ctx.id()),
            "SPM: secure context mismatch, active {:?}",
            active
        );
    }

    pub(crate) fn setup_next_eret_into_sel0(&mut self) {
        self.assert_secure_active();
        prepare_unprivileged_return(&mut self.ctx.cpu);
        trace!(
            "SPM: next secure eret to EL0 at {:#X} spsr {:#X}",
            self.ctx.cpu.el3_state.elr,
            self.ctx.cpu.el3_state.spsr
        );
    }

    /// Saves the live EL1 system registers into the bank of `state`.
    pub(crate) fn el1_sysregs_save(&mut self, state: SecurityState) {
        let regs = self.platform.read_el1_sysregs();
        match state {
            SecurityState::Secure => self.ctx.cpu.sys_regs = regs,
            SecurityState::NonSecure => self.platform.non_secure_context().sys_regs = regs,
        }
    }

    /// Loads the EL1 system registers saved in the bank of `state`.
    pub(crate) fn el1_sysregs_restore(&mut self, state: SecurityState) {
        let regs = match state {
            SecurityState::Secure => self.ctx.cpu.sys_regs.clone(),
            SecurityState::NonSecure => self.platform.non_secure_context().sys_regs.clone(),
        };
        self.platform.write_el1_sysregs(&regs);
    }

    /// Writes the return values of an SMC into x0.. of the bank of `state`.
    pub(crate) fn smc_ret(&mut self, state: SecurityState, regs: &[u64]) {
        let bank = match state {
            SecurityState::Secure => &mut self.ctx.cpu,
            SecurityState::NonSecure => self.platform.non_secure_context(),
        };
        bank.gp_regs[..regs.len()].copy_from_slice(regs);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::mock::MockPlatform;
    use crate::test_utils::*;

    #[test]
    fn unprivileged_return_uses_el1_banked_state() {
        let mut cpu = CpuContext::default();
        cpu.el3_state.elr = 0x1000;
        cpu.el3_state.spsr = 0x5;
        cpu.sys_regs.elr = 0x7000_2040;
        cpu.sys_regs.spsr = 0x3c0;
        cpu.gp_regs[0] = 0x11;

        prepare_unprivileged_return(&mut cpu);

        assert_eq!(cpu.el3_state.elr, 0x7000_2040);
        assert_eq!(cpu.el3_state.spsr, 0x3c0);
        assert_eq!(cpu.gp_regs[0], 0x11);
    }

    #[test]
    #[should_panic(expected = "secure context mismatch")]
    fn next_eret_requires_active_context() {
        // never set up, so no secure context is registered
        let mut spm = Spm::new(MockPlatform::new());
        spm.setup_next_eret_into_sel0();
    }

    #[test]
    fn sysregs_switch_between_banks() {
        let mut spm = setup_spm();
        spm.platform_mut().live_el1.vbar = 0x4000;
        spm.el1_sysregs_save(SecurityState::NonSecure);
        assert_eq!(spm.platform_mut().ns.sys_regs.vbar, 0x4000);

        spm.el1_sysregs_restore(SecurityState::Secure);
        assert_eq!(spm.platform().live_el1, spm.context().cpu().sys_regs);

        spm.el1_sysregs_restore(SecurityState::NonSecure);
        assert_eq!(spm.platform().live_el1.vbar, 0x4000);
    }

    #[test]
    fn smc_ret_targets_bank() {
        let mut spm = setup_spm();

        spm.smc_ret(SecurityState::Secure, &[1, 2, 3, 4]);
        spm.smc_ret(SecurityState::NonSecure, &[9]);

        assert_eq!(&spm.context().cpu().gp_regs[..4], &[1, 2, 3, 4]);
        assert_eq!(spm.platform().ns.gp_regs[0], 9);
    }
}
