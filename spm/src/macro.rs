#[macro_export]
macro_rules! define_interface {
    (command {$($variant:ident = $val:expr),*,}) => {
        $(pub const $variant: u32 = $val;)*
        pub fn to_str(code: u32) -> &'static str {
            match code {
                $($variant => stringify!($variant)),*,
                _ => "UNDEFINED",
            }
        }
    };
}

#[macro_export]
macro_rules! define_mask {
    ($end:expr, $beg:expr) => {
        ((1 << $end) - (1 << $beg) + (1 << $end))
    };
}

#[macro_export]
macro_rules! define_bitfield {
    ($field:ident, [$($end:tt-$beg:tt)|*]) => {
        #[allow(non_upper_case_globals)]
        pub const $field: u64 = $( $crate::define_mask!($end, $beg) )|*;
    };
}

#[macro_export]
macro_rules! define_bits {
    ($name:ident, $($field:ident $bits:tt),*) => {
        #[allow(non_snake_case)]
        #[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
        #[repr(C)]
        pub struct $name(u64);
        impl $name {
            #[inline(always)]
            pub const fn new(data: u64) -> $name {
                $name(data)
            }

            #[inline(always)]
            pub fn get(&self) -> u64 {
                self.0
            }

            #[inline(always)]
            pub fn get_masked_value(&self, mask: u64) -> u64 {
                (self.0 & mask) >> (mask.trailing_zeros())
            }

            #[inline(always)]
            pub fn set_masked_value(&mut self, mask: u64, val: u64) -> &mut Self {
                self.0 = (self.0 & !mask) | ((val << (mask.trailing_zeros())) & mask);
                self
            }

            #[inline(always)]
            pub fn set_bits(&mut self, mask: u64) -> &mut Self {
                self.0 |= mask;
                self
            }

            #[inline(always)]
            pub fn clear_bits(&mut self, mask: u64) -> &mut Self {
                self.0 &= !mask;
                self
            }

            $( $crate::define_bitfield!($field, $bits); )*
        }
    };
}

#[cfg(test)]
mod test {
    crate::define_bits!(TestReg, HI[7 - 4], LO[3 - 0]);

    #[test]
    fn bits_masked_value() {
        let mut reg = TestReg::new(0);
        reg.set_masked_value(TestReg::HI, 0xa)
            .set_masked_value(TestReg::LO, 0x5);

        assert_eq!(reg.get(), 0xa5);
        assert_eq!(reg.get_masked_value(TestReg::HI), 0xa);

        reg.clear_bits(TestReg::LO);
        assert_eq!(reg.get(), 0xa0);
    }
}
