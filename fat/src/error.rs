use core::fmt;
use std::{error, io};

#[derive(Debug)]
pub enum FormatError {
    /// 扇区数超出`BPB_TotSec32`的表示范围
    VolumeTooLarge { sectors: u64 },
    /// 簇数少于65525，按定义不是FAT32
    TooFewClusters { clusters: u32 },
    /// 簇数超出28位簇号能寻址的范围
    TooManyClusters { clusters: u32 },
    /// 簇超过32KiB
    ClusterTooLarge { bytes: u32 },
    /// 文件大小字段只有32位
    KernelTooLarge { size: u64 },
    /// 数据区放不下目录树与载荷
    NoSpace { needed: u32, available: u32 },
    /// 写入时提供的载荷与规划时的大小不符
    PayloadMismatch {
        planned: Option<u64>,
        given: Option<u64>,
    },
    Io(io::Error),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VolumeTooLarge { sectors } => {
                write!(f, "volume of {sectors} sectors is too large for FAT32")
            }
            Self::TooFewClusters { clusters } => {
                write!(f, "fat number of clusters < 65525 ({clusters})")
            }
            Self::TooManyClusters { clusters } => {
                write!(f, "fat number of clusters exceeds 0x0FFFFFF5 ({clusters})")
            }
            Self::ClusterTooLarge { bytes } => write!(f, "fat cluster size > 32768 ({bytes})"),
            Self::KernelTooLarge { size } => write!(f, "kernel too big ({size} bytes)"),
            Self::NoSpace { needed, available } => write!(
                f,
                "EFI system partition too small: {needed} clusters needed, {available} available"
            ),
            Self::PayloadMismatch { planned, given } => write!(
                f,
                "payload of {given:?} bytes does not match the planned {planned:?} bytes"
            ),
            Self::Io(e) => write!(f, "failed to write EFI system partition: {e}"),
        }
    }
}

impl error::Error for FormatError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FormatError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
