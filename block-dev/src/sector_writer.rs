use std::io;

use crate::{BlockDevice, BLOCK_SIZE};

/// 以`base`为零号扇区，向块设备定位写入整扇区。
///
/// 分区内的结构都用分区相对的扇区号寻址，`base`即分区的首个LBA。
#[derive(Debug)]
pub struct SectorWriter<'a, D: BlockDevice + ?Sized> {
    dev: &'a mut D,
    base: u64,
}

impl<'a, D: BlockDevice + ?Sized> SectorWriter<'a, D> {
    pub fn new(dev: &'a mut D, base: u64) -> Self {
        Self { dev, base }
    }

    pub const fn base(&self) -> u64 {
        self.base
    }

    /// 写入`count`个扇区，`bytes`的长度必须恰为`count * 512`。
    pub fn write(&mut self, sector: u64, count: u64, bytes: &[u8]) -> io::Result<()> {
        if bytes.len() as u64 != count * BLOCK_SIZE as u64 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "{} bytes given for {count} sectors at sector {sector}",
                    bytes.len()
                ),
            ));
        }

        log::trace!("write sectors {}..+{count}", self.base + sector);
        self.dev.write_blocks(self.base + sector, bytes)
    }

    /// 从`sector`起偏移`offset`字节处写入任意长度的字节串。
    ///
    /// 首尾不满一扇区的部分先读出原扇区再合并写回，
    /// 所以字节串之外的内容保持原样。
    pub fn write_at(&mut self, sector: u64, offset: usize, bytes: &[u8]) -> io::Result<()> {
        let mut pos = (self.base + sector) * BLOCK_SIZE as u64 + offset as u64;
        let mut rest = bytes;

        while !rest.is_empty() {
            let block = pos / BLOCK_SIZE as u64;
            let head = (pos % BLOCK_SIZE as u64) as usize;

            let n = if head == 0 && rest.len() >= BLOCK_SIZE {
                let n = rest.len() / BLOCK_SIZE * BLOCK_SIZE;
                self.dev.write_blocks(block, &rest[..n])?;
                n
            } else {
                let n = (BLOCK_SIZE - head).min(rest.len());
                let mut buf = [0u8; BLOCK_SIZE];
                self.dev.read_blocks(block, &mut buf)?;
                buf[head..head + n].copy_from_slice(&rest[..n]);
                self.dev.write_blocks(block, &buf)?;
                n
            };

            pos += n as u64;
            rest = &rest[n..];
        }

        Ok(())
    }
}
