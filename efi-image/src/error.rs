use std::{error, fmt, io};

use fat::FormatError;
use gpt::GptError;

#[derive(Debug)]
pub enum Error {
    /// The disk cannot hold both partition tables and an ESP.
    DiskTooSmall { sectors: u64 },
    /// The destination has fewer blocks than the image.
    DeviceTooSmall { blocks: u64, needed: u64 },
    Format(FormatError),
    Gpt(GptError),
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiskTooSmall { sectors } => {
                write!(f, "disk of {sectors} sectors has no room for an EFI system partition")
            }
            Self::DeviceTooSmall { blocks, needed } => {
                write!(f, "sink too small: {blocks} blocks, {needed} needed")
            }
            Self::Format(e) => write!(f, "{e}"),
            Self::Gpt(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Format(e) => Some(e),
            Self::Gpt(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FormatError> for Error {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

impl From<GptError> for Error {
    fn from(e: GptError) -> Self {
        Self::Gpt(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
