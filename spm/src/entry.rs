use bitflags::bitflags;

crate::define_bits!(
    Spsr,
    // Debug exception mask.
    D[9 - 9],
    // SError interrupt mask.
    A[8 - 8],
    // IRQ interrupt mask.
    I[7 - 7],
    // FIQ interrupt mask.
    F[6 - 6],
    // Execution state, 0 for AArch64.
    M_RW[4 - 4],
    // Exception level.
    M_EL[3 - 2],
    // Stack pointer selection, 0 for SP_EL0.
    M_SP[0 - 0]
);

pub const MODE_EL0: u64 = 0;
pub const MODE_SP_EL0: u64 = 0;

impl Spsr {
    /// SPSR for an AArch64 exception return.
    pub fn aarch64(el: u64, sp: u64, mask_all: bool) -> Self {
        let mut spsr = Spsr::new(0);
        spsr.set_masked_value(Spsr::M_EL, el)
            .set_masked_value(Spsr::M_SP, sp);
        if mask_all {
            spsr.set_bits(Spsr::D | Spsr::A | Spsr::I | Spsr::F);
        }
        spsr
    }

    /// EL0 on its own stack with every exception masked, the way the
    /// secure partition is entered.
    pub fn el0_sp0_masked() -> Self {
        Self::aarch64(MODE_EL0, MODE_SP_EL0, true)
    }

    pub fn is_aarch64(&self) -> bool {
        self.get_masked_value(Spsr::M_RW) == 0
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EpAttr: u32 {
        /// Cleared for an image executing in the secure state.
        const NON_SECURE = 1 << 0;
        const EE_BIG = 1 << 1;
        const ST_ENABLE = 1 << 2;
    }
}

/// Where and how an image is entered for the first time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPointInfo {
    pub pc: u64,
    pub spsr: Spsr,
    pub attr: EpAttr,
    pub args: [u64; 8],
}

impl EntryPointInfo {
    pub fn new(pc: u64) -> Self {
        Self {
            pc,
            spsr: Spsr::new(0),
            attr: EpAttr::empty(),
            args: [0; 8],
        }
    }

    /// Completes the descriptor for a secure partition running at S-EL0.
    pub fn init_secure_el0(&mut self, pc: u64, big_endian: bool) {
        let mut attr = EpAttr::ST_ENABLE;
        if big_endian {
            attr |= EpAttr::EE_BIG;
        }

        self.attr = attr;
        self.pc = pc;
        self.spsr = Spsr::el0_sp0_masked();
        self.args = [0; 8];
    }
}
