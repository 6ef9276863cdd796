use std::path::PathBuf;

use clap::Parser;
use fat::Arch;

#[derive(Parser)]
#[command(about = "Build a GPT disk image with a FAT32 EFI system partition")]
pub struct Cli {
    /// Output image file
    #[arg(long, short)]
    pub output: PathBuf,

    /// Kernel installed as /EFI/BOOT/BOOT<ARCH>.EFI
    #[arg(long, short)]
    pub kernel: Option<PathBuf>,

    /// Image size in MiB
    #[arg(long, short, default_value_t = 1024)]
    pub size: u64,

    /// Target architecture: x64, ia32, aa64 or arm
    #[arg(long, short, default_value_t = Arch::X64)]
    pub arch: Arch,
}
