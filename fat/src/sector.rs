use derive_more::{Add, From, Into};

pub const SECTOR_SIZE: usize = 512;

/// 分区内的相对扇区号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Add, From, Into)]
#[repr(transparent)]
pub struct SectorId(u64);

impl core::ops::Add<u64> for SectorId {
    type Output = Self;

    fn add(self, rhs: u64) -> Self::Output {
        self + Self(rhs)
    }
}

impl SectorId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// 扇区起始处在分区内的字节偏移
    pub const fn byte_offset(self) -> u64 {
        self.0 * SECTOR_SIZE as u64
    }
}
