#![no_main]

use islet_spm::config::PAGE_SIZE;
use islet_spm::mm::{translate_attributes, XlatError};
use islet_spm::smc::{SmcCall, SP_MEMORY_ATTRIBUTES_SET_AARCH64};
use islet_spm::test_utils::*;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (u64, u64, u64, i32)| {
    let (base, pages, attr, status) = data;
    let mut spm = booted_spm();
    if status < 0 {
        spm.platform_mut().xlat_result = Err(XlatError(status));
    }

    spm.smc_handler(&SmcCall::from_secure(
        SP_MEMORY_ATTRIBUTES_SET_AARCH64,
        &[base, pages, attr],
    ));

    let (got_base, got_size, got_attr) = spm.platform().attr_changes[0];
    assert_eq!(got_base, base as usize);
    assert_eq!(got_size, (pages as usize).wrapping_mul(PAGE_SIZE));
    assert_eq!(got_attr, translate_attributes(attr));

    let expected = if status < 0 { status as i64 as u64 } else { 0 };
    assert_eq!(spm.context().cpu().gp_regs[0], expected);
});
