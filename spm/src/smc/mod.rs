use crate::define_interface;
use crate::world::SecurityState;

define_interface! {
    command {
        SP_COMMUNICATE_AARCH32              = 0x8400_0041,
        SP_COMMUNICATE_AARCH64              = 0xc400_0041,
        SP_EVENT_COMPLETE_AARCH64           = 0xc400_0061,
        SP_MEMORY_ATTRIBUTES_SET_AARCH64    = 0xc400_0065,
    }
}

/// Returned for any function identifier the dispatcher does not handle.
pub const SMC_UNK: u64 = 0xffff_ffff;

pub const NR_ARGS: usize = 4;

/// An SMC trapped into EL3: function identifier in w0, x1..x4 and the
/// security state it was issued from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmcCall {
    pub fid: u32,
    pub args: [u64; NR_ARGS],
    pub origin: SecurityState,
}

impl SmcCall {
    pub fn new(origin: SecurityState, fid: u32, args: &[u64]) -> Self {
        let mut padded = [0u64; NR_ARGS];
        let len = args.len().min(NR_ARGS);
        padded[..len].copy_from_slice(&args[..len]);
        Self {
            fid,
            args: padded,
            origin,
        }
    }

    pub fn from_secure(fid: u32, args: &[u64]) -> Self {
        Self::new(SecurityState::Secure, fid, args)
    }

    pub fn from_non_secure(fid: u32, args: &[u64]) -> Self {
        Self::new(SecurityState::NonSecure, fid, args)
    }

    pub fn x(&self, n: usize) -> u64 {
        self.args[n - 1]
    }
}

/// Decoded request. Every identifier the dispatcher knows has a variant of
/// its own, the rest ends up in `Unknown`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    EventComplete { result: u64 },
    MemAttributesSet { base: usize, pages: usize, attr: u64 },
    Communicate { fid: u32, x2: u64, x3: u64 },
    Unknown(u32),
}

impl Request {
    pub fn parse(call: &SmcCall) -> Request {
        match (call.origin, call.fid) {
            (SecurityState::Secure, SP_EVENT_COMPLETE_AARCH64) => {
                Request::EventComplete { result: call.x(1) }
            }
            (SecurityState::Secure, SP_MEMORY_ATTRIBUTES_SET_AARCH64) => {
                Request::MemAttributesSet {
                    base: call.x(1) as usize,
                    pages: call.x(2) as usize,
                    attr: call.x(3),
                }
            }
            (SecurityState::NonSecure, SP_COMMUNICATE_AARCH32 | SP_COMMUNICATE_AARCH64) => {
                Request::Communicate {
                    fid: call.fid,
                    x2: call.x(2),
                    x3: call.x(3),
                }
            }
            (_, fid) => Request::Unknown(fid),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::UNSUPPORTED_FIDS;

    #[test]
    fn names() {
        assert_eq!(to_str(SP_EVENT_COMPLETE_AARCH64), "SP_EVENT_COMPLETE_AARCH64");
        assert_eq!(to_str(0x1234), "UNDEFINED");
    }

    #[test]
    fn parse_depends_on_origin() {
        let complete = SmcCall::from_secure(SP_EVENT_COMPLETE_AARCH64, &[7]);
        assert_eq!(Request::parse(&complete), Request::EventComplete { result: 7 });

        let spoofed = SmcCall::from_non_secure(SP_EVENT_COMPLETE_AARCH64, &[7]);
        assert_eq!(
            Request::parse(&spoofed),
            Request::Unknown(SP_EVENT_COMPLETE_AARCH64)
        );

        let from_secure = SmcCall::from_secure(SP_COMMUNICATE_AARCH64, &[0, 1, 2]);
        assert_eq!(
            Request::parse(&from_secure),
            Request::Unknown(SP_COMMUNICATE_AARCH64)
        );
    }

    #[test]
    fn parse_communicate_both_widths() {
        for fid in [SP_COMMUNICATE_AARCH32, SP_COMMUNICATE_AARCH64] {
            let call = SmcCall::from_non_secure(fid, &[0xaa, 0x8800_0000, 0x100]);
            assert_eq!(
                Request::parse(&call),
                Request::Communicate {
                    fid,
                    x2: 0x8800_0000,
                    x3: 0x100
                }
            );
        }
    }

    #[test]
    fn parse_memory_attributes() {
        let call =
            SmcCall::from_secure(SP_MEMORY_ATTRIBUTES_SET_AARCH64, &[0x8000_0000, 3, 0b101]);
        assert_eq!(
            Request::parse(&call),
            Request::MemAttributesSet {
                base: 0x8000_0000,
                pages: 3,
                attr: 0b101
            }
        );
    }

    #[test]
    fn other_spm_ids_are_unknown() {
        for fid in UNSUPPORTED_FIDS {
            for origin in [SecurityState::Secure, SecurityState::NonSecure] {
                let call = SmcCall::new(origin, fid, &[0x8000_0000]);
                assert_eq!(Request::parse(&call), Request::Unknown(fid));
            }
        }
    }
}
