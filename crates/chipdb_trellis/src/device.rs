//! Supported ECP5 devices.

use crate::error::ProviderError;
use std::fmt;
use std::str::FromStr;

/// An ECP5 device the compiler can build a database for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    /// LFE5U-25F.
    Lfe5u25f,
    /// LFE5U-45F.
    Lfe5u45f,
    /// LFE5U-85F.
    Lfe5u85f,
}

impl Device {
    /// All supported devices.
    pub const ALL: [Device; 3] = [Device::Lfe5u25f, Device::Lfe5u45f, Device::Lfe5u85f];

    /// Short device name used on the command line and in blob names.
    pub fn name(self) -> &'static str {
        match self {
            Device::Lfe5u25f => "25k",
            Device::Lfe5u45f => "45k",
            Device::Lfe5u85f => "85k",
        }
    }

    /// Full part name used for the database directory.
    pub fn part_name(self) -> &'static str {
        match self {
            Device::Lfe5u25f => "LFE5U-25F",
            Device::Lfe5u45f => "LFE5U-45F",
            Device::Lfe5u85f => "LFE5U-85F",
        }
    }

    /// Looks up a device by its short name.
    pub fn from_name(name: &str) -> Option<Device> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }
}

impl FromStr for Device {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Device::from_name(s).ok_or_else(|| ProviderError::UnknownDevice(s.to_string()))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
