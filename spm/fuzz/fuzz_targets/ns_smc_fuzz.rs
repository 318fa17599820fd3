#![no_main]

use islet_spm::smc::{self, SmcCall, SMC_UNK};
use islet_spm::test_utils::*;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (u32, [u64; 4])| {
    let (fid, args) = data;
    let mut spm = booted_spm();

    spm.smc_handler(&SmcCall::from_non_secure(fid, &args));

    match fid {
        smc::SP_COMMUNICATE_AARCH32 | smc::SP_COMMUNICATE_AARCH64 => {
            let cpu = spm.context().cpu();
            assert_eq!(cpu.gp_regs[0], fid as u64);
            assert_eq!(&cpu.gp_regs[1..3], &args[1..3]);
            assert!(!spm.context().is_parked());
        }
        _ => assert_eq!(spm.platform().ns.gp_regs[0], SMC_UNK),
    }
});
