use crate::smc::{SmcCall, SP_EVENT_COMPLETE_AARCH64};
use crate::Spm;

use mock::MockPlatform;

pub const SP_ENTRY: u64 = 0x7000_0000;
pub const SP_BASE: u64 = 0x7010_0000;
pub const SP_TTBR0: u64 = 0x7020_0000;

/// Identifiers of the SPM service range the dispatcher doesn't serve:
/// SPM_VERSION_AARCH32 and SP_MEMORY_ATTRIBUTES_GET_AARCH64.
pub const UNSUPPORTED_FIDS: [u32; 2] = [0x8400_0060, 0xc400_0064];

/// SPM whose setup went through, waiting for its deferred init.
pub fn setup_spm() -> Spm<MockPlatform> {
    let mut spm = Spm::new(MockPlatform::new());
    if let Err(e) = spm.setup() {
        panic!("setup failed: {:?}", e);
    }
    spm
}

/// SPM whose secure partition went through its cold boot and now waits
/// for requests.
pub fn booted_spm() -> Spm<MockPlatform> {
    let mut spm = setup_spm();
    spm.platform_mut()
        .script_secure(&[SmcCall::from_secure(SP_EVENT_COMPLETE_AARCH64, &[0])]);

    let hook = match spm.platform_mut().init_hook.take() {
        Some(hook) => hook,
        None => panic!("setup registered no init hook"),
    };
    spm.init(hook);
    spm
}

pub mod mock {
    use super::{SP_ENTRY, SP_TTBR0};
    use crate::context::{ContextId, CpuContext, El1SysRegs};
    use crate::entry::EntryPointInfo;
    use crate::mm::{MemAttr, Xlat, XlatError};
    use crate::platform::{Boot, ContextManager, Transfer};
    use crate::setup::InitHook;
    use crate::smc::SmcCall;
    use crate::world::SecurityState;

    use alloc::collections::vec_deque::VecDeque;
    use alloc::vec::Vec;

    /// What the secure world found when it was entered.
    #[derive(Debug, Clone)]
    pub struct SecureEntry {
        pub regs: [u64; 4],
        pub elr: u64,
        pub spsr: u64,
        pub sys_regs: El1SysRegs,
        pub next_eret: Option<SecurityState>,
    }

    /// EL3 firmware stand-in. The secure world replays `secure_script`,
    /// one SMC per entry.
    pub struct MockPlatform {
        pub ep: Option<EntryPointInfo>,
        pub init_hook: Option<InitHook>,
        pub contexts: [Option<ContextId>; 2],
        pub live_el1: El1SysRegs,
        pub ns: CpuContext,
        pub next_eret: Option<SecurityState>,
        pub big_endian: bool,
        pub core_pos: usize,
        pub setup_result: Result<(), XlatError>,
        pub xlat_result: Result<(), XlatError>,
        pub attr_changes: Vec<(usize, usize, MemAttr)>,
        pub secure_script: VecDeque<SmcCall>,
        pub secure_entries: Vec<SecureEntry>,
    }

    impl MockPlatform {
        pub fn new() -> Self {
            let mut contexts = [None; 2];
            contexts[SecurityState::NonSecure.index()] = Some(ContextId::non_secure(0));

            Self {
                ep: Some(EntryPointInfo::new(SP_ENTRY)),
                init_hook: None,
                contexts,
                live_el1: El1SysRegs::default(),
                ns: CpuContext::default(),
                next_eret: None,
                big_endian: false,
                core_pos: 0,
                setup_result: Ok(()),
                xlat_result: Ok(()),
                attr_changes: Vec::new(),
                secure_script: VecDeque::new(),
                secure_entries: Vec::new(),
            }
        }

        pub fn script_secure(&mut self, calls: &[SmcCall]) {
            self.secure_script.extend(calls.iter().copied());
        }
    }

    impl Default for MockPlatform {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Boot for MockPlatform {
        fn secure_ep_info(&mut self) -> Option<&mut EntryPointInfo> {
            self.ep.as_mut()
        }

        fn register_init(&mut self, hook: InitHook) {
            self.init_hook = Some(hook);
        }
    }

    impl ContextManager for MockPlatform {
        fn context(&self, state: SecurityState) -> Option<ContextId> {
            self.contexts[state.index()]
        }

        fn set_context(&mut self, id: ContextId, state: SecurityState) {
            self.contexts[state.index()] = Some(id);
        }

        fn read_el1_sysregs(&self) -> El1SysRegs {
            self.live_el1.clone()
        }

        fn write_el1_sysregs(&mut self, regs: &El1SysRegs) {
            self.live_el1 = regs.clone();
        }

        fn set_next_eret_context(&mut self, state: SecurityState) {
            self.next_eret = Some(state);
        }

        fn non_secure_context(&mut self) -> &mut CpuContext {
            &mut self.ns
        }

        fn el3_big_endian(&self) -> bool {
            self.big_endian
        }

        fn core_pos(&self) -> usize {
            self.core_pos
        }
    }

    impl Transfer for MockPlatform {
        fn enter_secure(&mut self, ctx: &mut CpuContext) -> SmcCall {
            let mut regs = [0; 4];
            regs.copy_from_slice(&ctx.gp_regs[..4]);
            self.secure_entries.push(SecureEntry {
                regs,
                elr: ctx.el3_state.elr,
                spsr: ctx.el3_state.spsr,
                sys_regs: self.live_el1.clone(),
                next_eret: self.next_eret,
            });

            let call = match self.secure_script.pop_front() {
                Some(call) => call,
                None => panic!("secure world has nothing left to do"),
            };

            // SMC entry saves the caller's registers in its context
            ctx.gp_regs[0] = call.fid as u64;
            ctx.gp_regs[1..5].copy_from_slice(&call.args);
            call
        }
    }

    impl Xlat for MockPlatform {
        fn setup_secure_partition(&mut self, ctx: &mut CpuContext) -> Result<(), XlatError> {
            self.setup_result?;
            ctx.sys_regs.ttbr0 = SP_TTBR0;
            Ok(())
        }

        fn change_mem_attributes(
            &mut self,
            base: usize,
            size: usize,
            attr: MemAttr,
        ) -> Result<(), XlatError> {
            self.attr_changes.push((base, size, attr));
            self.xlat_result
        }
    }
}
