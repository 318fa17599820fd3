use islet_spm::smc::{self, SmcCall, SMC_UNK};
use islet_spm::test_utils::*;

#[kani::proof]
#[kani::unwind(4)]
fn verify_ns_unknown_smc() {
    // Initialize registers (symbolic input)
    let fid: u32 = kani::any();
    let args: [u64; 4] = kani::any();
    kani::assume(fid != smc::SP_COMMUNICATE_AARCH32);
    kani::assume(fid != smc::SP_COMMUNICATE_AARCH64);

    let mut spm = setup_spm();
    let secure_pre = spm.context().cpu().clone();

    spm.smc_handler(&SmcCall::from_non_secure(fid, &args));

    // Result assertion
    kani::cover!();
    assert_eq!(spm.platform().ns.gp_regs[0], SMC_UNK);
    // the secure partition is never touched
    assert_eq!(spm.context().cpu(), &secure_pre);
    assert!(spm.platform().attr_changes.is_empty());
}
