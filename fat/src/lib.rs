//! FAT32格式化：为EFI系统分区生成固定的`/EFI/BOOT`目录树。
//!
//! 先由[`EfiLayout::plan`]纯计算出全部布局，再一次性写入块设备。

mod arch;
mod cluster;
mod error;
mod layout;
mod sector;
pub mod volume;

use std::io::Cursor;

use binrw::{BinRead, BinResult, BinWrite, Endian};

pub use self::{
    arch::Arch,
    cluster::{ClusterError, ClusterId},
    error::FormatError,
    layout::{Directory, EfiLayout, KernelRun},
    sector::{SectorId, SECTOR_SIZE},
};

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
