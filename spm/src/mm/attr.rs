use bitflags::bitflags;

bitflags! {
    /// Region attributes understood by the translation table library.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MemAttr: u32 {
        const MEMORY = 1 << 0;
        const DEVICE = 1 << 1;
        const RW = 1 << 2;
        const SECURE = 1 << 3;
        const EXECUTE_NEVER = 1 << 4;
    }
}

// Encoding used by SP_MEMORY_ATTRIBUTES_SET
const SMC_ATTR_RW: u64 = 1 << 0;
const SMC_ATTR_EXECUTE_NEVER: u64 = 1 << 2;

impl MemAttr {
    /// Attributes the secure partition can't change through an SMC.
    pub const BASE: MemAttr = MemAttr::MEMORY.union(MemAttr::SECURE);
}

/// Converts attributes from the SMC encoding into `MemAttr`.
///
/// Only the access (bit 0) and execute-never (bit 2) bits are honoured,
/// everything else is ignored. The base attributes are always set.
pub fn translate_attributes(bits: u64) -> MemAttr {
    let mut attr = MemAttr::BASE;

    if bits & SMC_ATTR_RW != 0 {
        attr |= MemAttr::RW;
    }
    if bits & SMC_ATTR_EXECUTE_NEVER != 0 {
        attr |= MemAttr::EXECUTE_NEVER;
    }
    attr
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn no_bits_give_base_attributes() {
        assert_eq!(translate_attributes(0b000), MemAttr::MEMORY | MemAttr::SECURE);
    }

    #[test]
    fn rw_and_execute_never() {
        assert_eq!(
            translate_attributes(0b101),
            MemAttr::BASE | MemAttr::RW | MemAttr::EXECUTE_NEVER
        );
        assert_eq!(translate_attributes(0b001), MemAttr::BASE | MemAttr::RW);
        assert_eq!(translate_attributes(0b100), MemAttr::BASE | MemAttr::EXECUTE_NEVER);
    }

    #[test]
    fn upper_bits_are_ignored() {
        for bits in [0b000u64, 0b001, 0b100, 0b101] {
            let expected = translate_attributes(bits);
            assert_eq!(translate_attributes(bits | 0b1000), expected);
            assert_eq!(translate_attributes(bits | 0xffff_fff8), expected);
            assert_eq!(translate_attributes(bits | (u64::MAX << 3)), expected);
        }
        assert_eq!(translate_attributes(0b010), MemAttr::BASE);
    }
}
