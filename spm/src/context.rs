use crate::config::NUM_OF_CPU;
use crate::entry::{EntryPointInfo, EpAttr};
use crate::sync::PendingFrame;
use crate::world::SecurityState;

crate::define_bits!(
    Scr,
    // Secure timer register accesses from S-EL1 enabled.
    ST[11 - 11],
    // Lower levels are AArch64.
    RW[10 - 10],
    // Lower levels are in the non-secure state.
    NS[0 - 0]
);

crate::define_bits!(
    Sctlr,
    // Endianness of data accesses at EL1.
    EE[25 - 25],
    // Endianness of data accesses at EL0.
    E0E[24 - 24]
);

/// Identifies a register context registered with the context manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContextId {
    core: usize,
    state: SecurityState,
}

impl ContextId {
    pub fn new(core: usize, state: SecurityState) -> Self {
        debug_assert!(core < NUM_OF_CPU);
        Self { core, state }
    }

    pub fn secure(core: usize) -> Self {
        Self::new(core, SecurityState::Secure)
    }

    pub fn non_secure(core: usize) -> Self {
        Self::new(core, SecurityState::NonSecure)
    }

    pub fn core(&self) -> usize {
        self.core
    }

    pub fn state(&self) -> SecurityState {
        self.state
    }
}

/// State consumed by the exception return out of EL3.
#[repr(C)]
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct El3State {
    pub elr: u64,
    pub spsr: u64,
    pub scr: Scr,
}

/// EL1 system registers switched between the worlds.
#[repr(C)]
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct El1SysRegs {
    pub elr: u64,
    pub spsr: u64,
    pub sctlr: Sctlr,
    pub sp_el0: u64,
    pub ttbr0: u64,
    pub tcr: u64,
    pub mair: u64,
    pub vbar: u64,
    pub cpacr: u64,
}

#[repr(C)]
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CpuContext {
    pub gp_regs: [u64; 31],
    pub el3_state: El3State,
    pub sys_regs: El1SysRegs,
}

impl CpuContext {
    /// Seeds the context for the first entry described by `ep`.
    ///
    /// The MMU configuration already recorded in `sys_regs` is kept, only
    /// the endianness bits are rewritten.
    pub fn init(&mut self, ep: &EntryPointInfo) {
        self.gp_regs = [0; 31];
        self.gp_regs[..ep.args.len()].copy_from_slice(&ep.args);

        let mut scr = Scr::new(0);
        if ep.attr.contains(EpAttr::NON_SECURE) {
            scr.set_bits(Scr::NS);
        }
        if ep.attr.contains(EpAttr::ST_ENABLE) {
            scr.set_bits(Scr::ST);
        }
        if ep.spsr.is_aarch64() {
            scr.set_bits(Scr::RW);
        }

        self.el3_state = El3State {
            elr: ep.pc,
            spsr: ep.spsr.get(),
            scr,
        };

        if ep.attr.contains(EpAttr::EE_BIG) {
            self.sys_regs.sctlr.set_bits(Sctlr::EE | Sctlr::E0E);
        } else {
            self.sys_regs.sctlr.clear_bits(Sctlr::EE | Sctlr::E0E);
        }
    }
}

/// The secure partition's context. One per core driving a partition,
/// which is only ever the primary core.
#[derive(Debug)]
pub struct SpmContext {
    id: ContextId,
    pub(crate) cpu: CpuContext,
    pub(crate) frame: PendingFrame,
    // Set while the partition sits right after its last completion call.
    parked: bool,
}

impl SpmContext {
    pub fn new(id: ContextId) -> Self {
        Self {
            id,
            cpu: CpuContext::default(),
            frame: PendingFrame::default(),
            parked: false,
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn cpu(&self) -> &CpuContext {
        &self.cpu
    }

    pub fn is_parked(&self) -> bool {
        self.parked
    }

    pub(crate) fn park(&mut self) {
        self.parked = true;
    }

    pub(crate) fn unpark(&mut self) {
        self.parked = false;
    }
}
