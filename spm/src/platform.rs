//! Services of the EL3 firmware the dispatcher is built upon.

use crate::context::{ContextId, CpuContext, El1SysRegs};
use crate::entry::EntryPointInfo;
use crate::mm::Xlat;
use crate::setup::InitHook;
use crate::smc::SmcCall;
use crate::world::SecurityState;

/// Boot orchestrator: hands over the secure image and runs deferred
/// initialisation once the cold boot path is done.
pub trait Boot {
    /// Entry point of the secure payload loaded by the previous boot stage.
    fn secure_ep_info(&mut self) -> Option<&mut EntryPointInfo>;

    /// Keeps `hook` and passes it back to `Spm::init` exactly once, after
    /// the cold boot path is done.
    fn register_init(&mut self, hook: InitHook);
}

/// Per world register context bookkeeping.
pub trait ContextManager {
    fn context(&self, state: SecurityState) -> Option<ContextId>;

    fn set_context(&mut self, id: ContextId, state: SecurityState);

    fn read_el1_sysregs(&self) -> El1SysRegs;

    fn write_el1_sysregs(&mut self, regs: &El1SysRegs);

    /// Selects the context the next exception return out of EL3 uses.
    fn set_next_eret_context(&mut self, state: SecurityState);

    fn non_secure_context(&mut self) -> &mut CpuContext;

    /// Whether EL3 runs big-endian (SCTLR_EL3.EE).
    fn el3_big_endian(&self) -> bool;

    fn core_pos(&self) -> usize;
}

/// Low level world transfer.
pub trait Transfer {
    /// Leaves EL3 through the EL3 state of `ctx` and comes back once the
    /// secure world traps with its next SMC. The general purpose registers
    /// of `ctx` are loaded on the way out and saved on the way back.
    ///
    /// The transfer can't be cancelled.
    fn enter_secure(&mut self, ctx: &mut CpuContext) -> SmcCall;
}

pub trait Platform: Boot + ContextManager + Transfer + Xlat {}

impl<T: Boot + ContextManager + Transfer + Xlat> Platform for T {}
