//! 卷的布局
//!
//! 保留区 | FAT区 | 数据区
//!
//! - 保留区：启动扇区(#0)、FSINFO(#1)、启动扇区备份(#6)，共32个扇区
//! - FAT区：两份完全相同的FAT
//! - 数据区：从2号簇开始，2号簇即根目录

pub mod data;
pub mod fat;
mod geometry;
pub mod reserved;

pub use self::geometry::{
    Geometry, FAT_COUNT, MAX_CLUSTERS, MAX_CLUSTER_BYTES, MIN_CLUSTERS, RESERVED_SECTORS,
};
