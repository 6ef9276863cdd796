use core::fmt;
use core::str::FromStr;

/// 目标架构，决定固件默认加载的`/EFI/BOOT/BOOT<ARCH>.EFI`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arch {
    #[default]
    X64,
    Ia32,
    Aa64,
    Arm,
}

impl Arch {
    /// 8.3短名中的主名部分
    pub const fn boot_name(self) -> &'static str {
        match self {
            Self::X64 => "BOOTX64",
            Self::Ia32 => "BOOTIA32",
            Self::Aa64 => "BOOTAA64",
            Self::Arm => "BOOTARM",
        }
    }

    pub const fn boot_ext() -> &'static str {
        "EFI"
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X64 => "x64",
            Self::Ia32 => "ia32",
            Self::Aa64 => "aa64",
            Self::Arm => "arm",
        };
        f.write_str(name)
    }
}

impl FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" => Ok(Self::X64),
            "ia32" | "x86" | "i686" => Ok(Self::Ia32),
            "aa64" | "aarch64" | "arm64" => Ok(Self::Aa64),
            "arm" | "armv7" => Ok(Self::Arm),
            _ => Err(format!(
                "unknown architecture `{s}` (expected x64, ia32, aa64 or arm)"
            )),
        }
    }
}
