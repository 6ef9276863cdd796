use core::fmt;
use std::{error, io};

#[derive(Debug)]
pub enum GptError {
    /// 容纳不下两份分区表
    DiskTooSmall { sectors: u64 },
    /// 分区与分区表重叠
    Overlap(String),
    /// 分区超出最后一个可用LBA
    DoesNotFit(String),
    /// 起始LBA大于结束LBA
    InvalidRange(String),
    /// 没有空闲的分区项
    TableFull(String),
    Io(io::Error),
}

impl fmt::Display for GptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiskTooSmall { sectors } => {
                write!(f, "disk of {sectors} sectors cannot hold a partition table")
            }
            Self::Overlap(name) => write!(f, "partition '{name}' overlaps partition table"),
            Self::DoesNotFit(name) => write!(f, "partition '{name}' does not fit on disk"),
            Self::InvalidRange(name) => write!(f, "partition '{name}' ends before it starts"),
            Self::TableFull(name) => {
                write!(f, "out of partition table entries for partition '{name}'")
            }
            Self::Io(e) => write!(f, "failed to write partition table: {e}"),
        }
    }
}

impl error::Error for GptError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for GptError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
