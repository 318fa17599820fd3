pub const NUM_OF_CPU: usize = 8;
pub const PRIMARY_CPU: usize = 0;

pub const PAGE_BITS: usize = 12;
pub const PAGE_SIZE: usize = 1 << PAGE_BITS; // 4KiB

// Result the secure partition reports when its cold boot initialisation is done
pub const SP_INIT_SUCCESS: u64 = 0;
