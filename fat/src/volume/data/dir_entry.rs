//! 32字节的短目录项。
//!
//! 镜像里只有三个目录、至多一个文件，全部用8.3短名，不生成长文件名项；
//! 时间戳一律为0。

use binrw::{BinRead, BinWrite};
use enumflags2::{bitflags, BitFlags};

use crate::{encode, ClusterId};

/// 目录项的字节量
pub const DIR_ENTRY_SIZE: usize = 32;

const CWD_NAME: [u8; 11] = *b".          ";

const PARENT_NAME: [u8; 11] = *b"..         ";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct ShortDirEntry {
    /// 主名8字节 + 扩展名3字节，空格补齐
    name: [u8; 11],

    #[br(map = |raw: u8| BitFlags::from_bits_truncate(raw))]
    #[bw(map = |attr: &BitFlags<AttrFlag>| attr.bits())]
    pub attr: BitFlags<AttrFlag>,

    _nt_res: u8,

    /// 创建时间的10毫秒部分
    _crt_tenth: u8,

    _crt_time: u16,

    _crt_date: u16,

    _acc_date: u16,

    /// 首簇号的高16位
    clus_hi: u16,

    _wrt_time: u16,

    _wrt_date: u16,

    /// 首簇号的低16位
    clus_lo: u16,

    /// 文件字节数，目录为0
    file_size: u32,
}

impl ShortDirEntry {
    pub fn new_directory(name: &str, id: ClusterId) -> Self {
        let mut dirent = Self {
            name: short_name(name, ""),
            ..Default::default()
        };
        dirent.set_cluster_id(id);
        dirent.attr |= AttrFlag::Directory;
        dirent
    }

    pub fn new_file(name: &str, ext: &str, id: ClusterId, size: u32) -> Self {
        let mut dirent = Self {
            name: short_name(name, ext),
            file_size: size,
            ..Default::default()
        };
        dirent.set_cluster_id(id);
        dirent.attr |= AttrFlag::Archive;
        dirent
    }

    /// 指向本目录的目录项(.)
    pub fn new_cwd(id: ClusterId) -> Self {
        let mut dirent = Self::new_directory("", id);
        dirent.name = CWD_NAME;
        dirent
    }

    /// 指向上级目录的目录项(..)，上级为根目录时簇号记为0
    pub fn new_parent(parent: ClusterId) -> Self {
        let id = if parent == ClusterId::MIN {
            ClusterId::FREE
        } else {
            parent
        };

        let mut dirent = Self::new_directory("", id);
        dirent.name = PARENT_NAME;
        dirent
    }

    pub const fn name(&self) -> &[u8; 11] {
        &self.name
    }

    /// 目录项中存放的原始簇编号
    pub fn cluster_id(&self) -> ClusterId {
        (self.clus_lo, self.clus_hi).into()
    }

    pub fn set_cluster_id(&mut self, id: ClusterId) {
        (self.clus_lo, self.clus_hi) = id.split();
    }

    pub const fn size(&self) -> u32 {
        self.file_size
    }

    pub fn is_directory(&self) -> bool {
        self.attr.contains(AttrFlag::Directory)
    }

    /// `.`或`..`
    pub fn is_relative(&self) -> bool {
        matches!(self.name, CWD_NAME | PARENT_NAME)
    }

    pub fn to_bytes(&self) -> [u8; DIR_ENTRY_SIZE] {
        let mut bytes = [0; DIR_ENTRY_SIZE];
        bytes.copy_from_slice(&encode(self));
        bytes
    }
}

/// 将名称转为8.3短名：转大写，主名与扩展名分别截断并填空格。
pub fn short_name(name: &str, ext: &str) -> [u8; 11] {
    let mut short = [b' '; 11];
    let (main, suffix) = short.split_at_mut(8);
    for (dst, src) in main.iter_mut().zip(name.bytes()) {
        *dst = src.to_ascii_uppercase();
    }
    for (dst, src) in suffix.iter_mut().zip(ext.bytes()) {
        *dst = src.to_ascii_uppercase();
    }
    short
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[bitflags]
#[repr(u8)]
pub enum AttrFlag {
    ReadOnly = 0x01,
    Hidden = 0x02,
    System = 0x04,
    VolumeId = 0x08,
    Directory = 0x10,
    /// 新写入的文件都带此标志
    Archive = 0x20,
}
