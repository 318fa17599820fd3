#![no_main]

use islet_spm::smc::{SmcCall, SMC_UNK, SP_COMMUNICATE_AARCH64, SP_EVENT_COMPLETE_AARCH64};
use islet_spm::test_utils::*;
use islet_spm::world::SecurityState;

use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Step {
    Communicate { x2: u64, x3: u64 },
    Complete { result: u64 },
}

fuzz_target!(|steps: Vec<Step>| {
    let mut spm = booted_spm();

    for step in steps {
        let parked = spm.context().is_parked();
        match step {
            Step::Communicate { x2, x3 } => {
                spm.smc_handler(&SmcCall::from_non_secure(
                    SP_COMMUNICATE_AARCH64,
                    &[0, x2, x3],
                ));
                if parked {
                    assert_eq!(&spm.context().cpu().gp_regs[1..3], &[x2, x3]);
                    assert_eq!(spm.platform().next_eret, Some(SecurityState::Secure));
                } else {
                    assert_eq!(spm.platform().ns.gp_regs[0], SMC_UNK);
                }
            }
            Step::Complete { result } => {
                spm.smc_handler(&SmcCall::from_secure(SP_EVENT_COMPLETE_AARCH64, &[result]));
                assert_eq!(spm.platform().ns.gp_regs[0], result);
                assert_eq!(spm.platform().next_eret, Some(SecurityState::NonSecure));
            }
        }
        assert!(!spm.init_in_progress());
    }
});
