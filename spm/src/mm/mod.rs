pub mod attr;

pub use attr::{translate_attributes, MemAttr};

use crate::context::CpuContext;

/// Status code of a failed translation table operation, as the
/// translation library reports it (a negative errno).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XlatError(pub i32);

impl XlatError {
    pub const EINVAL: XlatError = XlatError(-22);
}

impl From<XlatError> for u64 {
    fn from(e: XlatError) -> Self {
        // sign-extended into the return register
        e.0 as i64 as u64
    }
}

/// Converts the outcome of a translation table operation into the
/// status word handed back to the secure partition.
pub fn status(res: Result<(), XlatError>) -> u64 {
    match res {
        Ok(()) => 0,
        Err(e) => e.into(),
    }
}

/// Translation table service owning the secure partition's address space.
pub trait Xlat {
    /// Builds the secure partition's translation tables and records the
    /// S-EL1 MMU configuration (TTBR0/TCR/MAIR/SCTLR/VBAR) into `ctx`.
    fn setup_secure_partition(&mut self, ctx: &mut CpuContext) -> Result<(), XlatError>;

    /// Changes the attributes of `[base, base + size)`. Misaligned or
    /// unmapped ranges are rejected here, not by the caller.
    fn change_mem_attributes(
        &mut self,
        base: usize,
        size: usize,
        attr: MemAttr,
    ) -> Result<(), XlatError>;
}
