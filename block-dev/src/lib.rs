//! # 块设备接口层
//!
//! 块设备是以**块**为单位存储数据的设备，例如磁盘镜像文件、内存盘等；
//! [`BlockDevice`] 就是对读写块设备的抽象。
//!
//! 镜像生成器只通过 [`SectorWriter`] 定位并写入扇区，
//! 目标设备必须事先分配好最终大小，越界或写不完整一律视为致命错误。

mod ram_disk;
mod sector_writer;

use std::io;

pub use self::{ram_disk::RamDisk, sector_writer::SectorWriter};

/// 块的字节量，与扇区大小一致
pub const BLOCK_SIZE: usize = 512;

/// 块设备驱动特质
pub trait BlockDevice {
    /// 设备的块总数
    fn block_count(&self) -> u64;

    /// 从`block_id`起读取`buf.len() / BLOCK_SIZE`个块
    fn read_blocks(&mut self, block_id: u64, buf: &mut [u8]) -> io::Result<()>;

    /// 从`block_id`起写入`buf.len() / BLOCK_SIZE`个块
    fn write_blocks(&mut self, block_id: u64, buf: &[u8]) -> io::Result<()>;
}

impl<D: BlockDevice + ?Sized> BlockDevice for &mut D {
    fn block_count(&self) -> u64 {
        (**self).block_count()
    }

    fn read_blocks(&mut self, block_id: u64, buf: &mut [u8]) -> io::Result<()> {
        (**self).read_blocks(block_id, buf)
    }

    fn write_blocks(&mut self, block_id: u64, buf: &[u8]) -> io::Result<()> {
        (**self).write_blocks(block_id, buf)
    }
}

/// 检查`[block_id, block_id + len / BLOCK_SIZE)`是否完整落在设备内。
pub fn check_range(block_count: u64, block_id: u64, len: usize) -> io::Result<()> {
    if len % BLOCK_SIZE != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("buffer of {len} bytes is not a whole number of blocks"),
        ));
    }

    let end = block_id
        .checked_add((len / BLOCK_SIZE) as u64)
        .filter(|&end| end <= block_count);
    if end.is_none() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "blocks {block_id}..+{} exceed a device of {block_count} blocks",
                len / BLOCK_SIZE
            ),
        ));
    }

    Ok(())
}

/// 底层写入的字节数不足时报错。
pub fn check_transfer(transferred: usize, expected: usize) -> io::Result<()> {
    if transferred == expected {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("not a complete transfer: {transferred} of {expected} bytes"),
        ))
    }
}
