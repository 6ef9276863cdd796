//! 保留区：启动扇区与FSINFO

mod bpb;
mod fs_info;

pub use self::{bpb::*, fs_info::FsInfo};
