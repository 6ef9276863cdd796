//! 随机数来源，用于磁盘、分区的GUID与卷序列号。

use std::io;

use uguid::Guid;

pub trait Entropy {
    /// 用随机字节填满`buf`
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// 随机（第4版）GUID
    fn guid(&mut self) -> io::Result<Guid> {
        let mut bytes = [0; 16];
        self.fill(&mut bytes)?;
        Ok(Guid::from_random_bytes(bytes))
    }

    fn u32(&mut self) -> io::Result<u32> {
        let mut bytes = [0; 4];
        self.fill(&mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }
}

/// 操作系统提供的随机数
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl Entropy for OsEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()> {
        getrandom::getrandom(buf).map_err(io::Error::from)
    }
}

/// 由种子决定的伪随机序列，同一种子生成的镜像逐字节相同。
#[derive(Debug, Clone)]
pub struct FixedEntropy {
    state: u64,
}

impl FixedEntropy {
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl Entropy for FixedEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()> {
        // splitmix64
        for chunk in buf.chunks_mut(8) {
            self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = self.state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^= z >> 31;
            chunk.copy_from_slice(&z.to_le_bytes()[..chunk.len()]);
        }
        Ok(())
    }
}
