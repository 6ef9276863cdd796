//! 保护性MBR：只有一个类型为0xEE的分区，覆盖整个磁盘，
//! 让不认识GPT的工具把磁盘当作已占用。

use binrw::{BinRead, BinWrite};

use crate::{to_sector, SECTOR_SIZE};

/// GPT保护分区的类型
pub const GPT_PROTECTIVE: u8 = 0xEE;

#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct ProtectiveMbr {
    _boot_code: [u8; 440],

    _disk_signature: u32,

    _reserved: u16,

    /// 位于0x1BE，共4项
    pub partitions: [MbrPartition; 4],

    /// [0x55, 0xAA]
    signature_word: [u8; 2],
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct MbrPartition {
    /// 0x00 不可启动
    pub boot_indicator: u8,

    /// 无意义的CHS地址
    pub start_chs: [u8; 3],

    pub os_type: u8,

    pub end_chs: [u8; 3],

    pub starting_lba: u32,

    pub size_in_lba: u32,
}

impl ProtectiveMbr {
    pub fn new(total_sectors: u64) -> Self {
        let mut partitions = [MbrPartition::default(); 4];
        partitions[0] = MbrPartition {
            boot_indicator: 0x00,
            start_chs: [0x00, 0x01, 0x00],
            os_type: GPT_PROTECTIVE,
            end_chs: [0xFE, 0xFF, 0xFF],
            starting_lba: 1,
            size_in_lba: total_sectors.saturating_sub(1).min(u32::MAX as u64) as u32,
        };

        Self {
            _boot_code: [0; 440],
            _disk_signature: 0,
            _reserved: 0,
            partitions,
            signature_word: [0x55, 0xAA],
        }
    }

    pub const fn signature_word(&self) -> [u8; 2] {
        self.signature_word
    }

    pub fn to_bytes(&self) -> [u8; SECTOR_SIZE] {
        to_sector(self)
    }
}

/// 为`total_sectors`个扇区的磁盘生成0号扇区
pub fn build_protective_mbr(total_sectors: u64) -> [u8; SECTOR_SIZE] {
    ProtectiveMbr::new(total_sectors).to_bytes()
}
