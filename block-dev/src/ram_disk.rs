use std::io;

use crate::{check_range, BlockDevice, BLOCK_SIZE};

/// 定长的内存盘，初始内容全为0
#[derive(Debug, Clone)]
pub struct RamDisk {
    data: Vec<u8>,
}

impl RamDisk {
    pub fn new(block_count: u64) -> Self {
        Self {
            data: vec![0; block_count as usize * BLOCK_SIZE],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// 第`id`块的内容
    pub fn block(&self, id: u64) -> &[u8] {
        let start = id as usize * BLOCK_SIZE;
        &self.data[start..start + BLOCK_SIZE]
    }

    /// 从`id`起连续`count`块的内容
    pub fn blocks(&self, id: u64, count: u64) -> &[u8] {
        let start = id as usize * BLOCK_SIZE;
        &self.data[start..start + count as usize * BLOCK_SIZE]
    }
}

impl BlockDevice for RamDisk {
    fn block_count(&self) -> u64 {
        (self.data.len() / BLOCK_SIZE) as u64
    }

    fn read_blocks(&mut self, block_id: u64, buf: &mut [u8]) -> io::Result<()> {
        check_range(self.block_count(), block_id, buf.len())?;
        let start = block_id as usize * BLOCK_SIZE;
        buf.copy_from_slice(&self.data[start..start + buf.len()]);
        Ok(())
    }

    fn write_blocks(&mut self, block_id: u64, buf: &[u8]) -> io::Result<()> {
        check_range(self.block_count(), block_id, buf.len())?;
        let start = block_id as usize * BLOCK_SIZE;
        self.data[start..start + buf.len()].copy_from_slice(buf);
        Ok(())
    }
}
