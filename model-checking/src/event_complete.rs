use islet_spm::smc::{SmcCall, SP_COMMUNICATE_AARCH64, SP_EVENT_COMPLETE_AARCH64};
use islet_spm::test_utils::*;
use islet_spm::world::SecurityState;

#[kani::proof]
#[kani::unwind(4)]
fn verify_event_complete() {
    // Initialize registers (symbolic input)
    let result: u64 = kani::any();
    let x2: u64 = kani::any();
    let x3: u64 = kani::any();

    let mut spm = booted_spm();

    // Pre-conditions
    spm.smc_handler(&SmcCall::from_non_secure(SP_COMMUNICATE_AARCH64, &[0, x2, x3]));
    assert!(!spm.context().is_parked());

    spm.smc_handler(&SmcCall::from_secure(SP_EVENT_COMPLETE_AARCH64, &[result]));

    // Result assertion
    kani::cover!();
    assert!(spm.context().is_parked());
    assert!(!spm.init_in_progress());
    assert_eq!(spm.platform().ns.gp_regs[0], result);
    assert_eq!(spm.platform().next_eret, Some(SecurityState::NonSecure));
}
