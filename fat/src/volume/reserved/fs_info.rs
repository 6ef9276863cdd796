use binrw::{BinRead, BinWrite};

use crate::{encode, SECTOR_SIZE};

/// # 文件系统信息
///
/// 仅FAT32格式在用，位于#1扇区。
/// 本格式化程序不统计空闲簇，两个提示字段都填“不知道”。
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct FsInfo {
    /// 头签名 0x41615252
    lead_sig: u32,

    _reserved1: [u8; 480],

    /// 额外签名 0x61417272
    struc_sig: u32,

    /// 剩余空闲簇数量
    /// - 0xFFFFFFFF 表示不知道
    free_count: u32,

    /// 下一个空闲簇
    /// - 0xFFFFFFFF 表示不知道
    nxt_free: u32,

    _reserved2: [u8; 12],

    /// 尾签名 0xAA550000
    trail_sig: u32,
}

impl FsInfo {
    pub const UNKNOWN: u32 = 0xFFFF_FFFF;

    pub fn new() -> Self {
        Self {
            lead_sig: 0x4161_5252,
            _reserved1: [0; 480],
            struc_sig: 0x6141_7272,
            free_count: Self::UNKNOWN,
            nxt_free: Self::UNKNOWN,
            _reserved2: [0; 12],
            trail_sig: 0xAA55_0000,
        }
    }

    pub const fn free_count(&self) -> u32 {
        self.free_count
    }

    pub const fn next_free(&self) -> u32 {
        self.nxt_free
    }

    pub fn to_bytes(&self) -> [u8; SECTOR_SIZE] {
        let mut sector = [0; SECTOR_SIZE];
        sector.copy_from_slice(&encode(self));
        sector
    }
}

impl Default for FsInfo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::FsInfo;

    #[test]
    fn signatures() {
        let bytes = FsInfo::new().to_bytes();
        assert_eq!(b"RRaA", &bytes[0..4]);
        assert_eq!(b"rrAa", &bytes[484..488]);
        assert_eq!([0xFFu8; 4], bytes[488..492]);
        assert_eq!([0xFFu8; 4], bytes[492..496]);
        assert_eq!([0x00u8, 0x00, 0x55, 0xAA], bytes[508..512]);
    }
}
