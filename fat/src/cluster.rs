#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct ClusterId(u32);

#[derive(Debug, PartialEq, Eq)]
pub enum ClusterError {
    Free,
    Defective,
    Reserved,
    Eof,
}

impl From<u32> for ClusterId {
    fn from(raw: u32) -> Self {
        Self(raw & 0x0FFF_FFFF)
    }
}

impl From<ClusterId> for u32 {
    fn from(id: ClusterId) -> Self {
        id.0
    }
}

impl From<ClusterId> for usize {
    fn from(id: ClusterId) -> Self {
        id.0 as usize
    }
}

/// (低16位, 高16位)
impl From<(u16, u16)> for ClusterId {
    fn from((low, high): (u16, u16)) -> Self {
        Self::new((high as u32) << 16 | low as u32)
    }
}

impl core::ops::Add<u32> for ClusterId {
    type Output = Self;

    fn add(self, rhs: u32) -> Self::Output {
        Self::new(self.0 + rhs)
    }
}

impl core::ops::Sub for ClusterId {
    type Output = u32;

    fn sub(self, rhs: Self) -> Self::Output {
        self.0 - rhs.0
    }
}

impl ClusterId {
    pub const FREE: Self = Self(0);

    /// 最小的可用簇号，恒为根目录
    pub const MIN: Self = Self(2);

    /// 簇链表的结尾
    pub const EOF: Self = Self(0x0FFF_FFFF);

    pub const BAD: Self = Self(0x0FFF_FFF7);

    /// FAT[0]：低8位为媒介类型
    pub const MEDIA: Self = Self(0x0FFF_FFF8);

    pub const fn new(raw: u32) -> Self {
        Self(raw & 0x0FFF_FFFF)
    }

    /// 拆分为目录项中的(低16位, 高16位)
    pub const fn split(self) -> (u16, u16) {
        (self.0 as u16, (self.0 >> 16) as u16)
    }

    pub fn is_unavailable(&self) -> bool {
        *self < Self::MIN || (Self(0x0FFF_FFF8)..=Self(0x0FFF_FFFE)).contains(self)
    }

    pub fn validate(self) -> Result<Self, ClusterError> {
        match self {
            ClusterId::FREE => Err(ClusterError::Free),
            ClusterId::BAD => Err(ClusterError::Defective),
            ClusterId::EOF => Err(ClusterError::Eof),
            id if id.is_unavailable() => Err(ClusterError::Reserved),
            id => Ok(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClusterError, ClusterId};

    #[test]
    fn split_and_join() {
        let id = ClusterId::new(0x0123_4567);
        assert_eq!((0x4567, 0x0123), id.split());
        assert_eq!(id, ClusterId::from(id.split()));
    }

    #[test]
    fn validate() {
        assert_eq!(Err(ClusterError::Free), ClusterId::FREE.validate());
        assert_eq!(Err(ClusterError::Reserved), ClusterId::new(1).validate());
        assert_eq!(Err(ClusterError::Eof), ClusterId::EOF.validate());
        assert_eq!(Err(ClusterError::Defective), ClusterId::BAD.validate());
        assert_eq!(Err(ClusterError::Reserved), ClusterId::MEDIA.validate());
        assert_eq!(Ok(ClusterId::new(5)), ClusterId::new(5).validate());
    }

    #[test]
    fn masked_to_28_bits() {
        assert_eq!(ClusterId::EOF, ClusterId::from(u32::MAX));
    }
}
