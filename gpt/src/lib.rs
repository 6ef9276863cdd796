//! # GUID分区表
//!
//! ```text
//! LBA 0               保护性MBR
//! LBA 1               主GPT头
//! LBA 2..34           主分区项数组（128项 × 128字节）
//! ...                 分区
//! LBA total-33..-1    备份分区项数组
//! LBA total-1         备份GPT头
//! ```
//!
//! 所有记录先在内存中填好，计算校验和后整扇区写出。

mod builder;
mod entropy;
mod entry;
mod error;
mod header;
mod mbr;

use std::io::Cursor;

use binrw::{BinRead, BinResult, BinWrite, Endian};
use uguid::{guid, Guid};

pub use self::{
    builder::GptBuilder,
    entropy::{Entropy, FixedEntropy, OsEntropy},
    entry::{PartitionEntry, NAME_LEN},
    error::GptError,
    header::GptHeader,
    mbr::{build_protective_mbr, MbrPartition, ProtectiveMbr},
};

/// EFI系统分区的类型GUID
pub const EFI_SYSTEM_PARTITION: Guid = guid!("C12A7328-F81F-11D2-BA4B-00A0C93EC93B");

/// 分区项数量
pub const ENTRY_COUNT: usize = 128;

/// 分区项字节量
pub const ENTRY_SIZE: usize = 128;

/// 分区项数组占用的扇区数
pub const ENTRIES_SECTORS: u64 = (ENTRY_COUNT * ENTRY_SIZE / SECTOR_SIZE) as u64;

/// 主分区项数组的起始LBA
pub const ENTRIES_LBA: u64 = 2;

/// 分区最小的起始LBA，之前是MBR、GPT头与分区项数组
pub const MIN_FIRST_LBA: u64 = ENTRIES_LBA + ENTRIES_SECTORS;

const SECTOR_SIZE: usize = 512;

/// 按字段顺序序列化一条记录（小端）
pub(crate) fn encode<T>(record: &T) -> Vec<u8>
where
    T: for<'a> BinWrite<Args<'a> = ()>,
{
    let mut cursor = Cursor::new(Vec::new());
    record
        .write_options(&mut cursor, Endian::Little, ())
        .expect("writing into a Vec never fails");
    cursor.into_inner()
}

/// 从字节串解析一条记录（小端）
pub fn decode<T>(bytes: &[u8]) -> BinResult<T>
where
    T: for<'a> BinRead<Args<'a> = ()>,
{
    T::read_options(&mut Cursor::new(bytes), Endian::Little, ())
}

/// 整扇区序列化，记录之后填0
pub(crate) fn to_sector<T>(record: &T) -> [u8; SECTOR_SIZE]
where
    T: for<'a> BinWrite<Args<'a> = ()>,
{
    let bytes = encode(record);
    let mut sector = [0; SECTOR_SIZE];
    sector[..bytes.len()].copy_from_slice(&bytes);
    sector
}
