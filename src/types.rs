use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Coarse platform category of a memory image.
///
/// Only used to filter which routine names are offered; the routine string is
/// what actually reaches the analysis tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Windows,
    Linux,
    Mac,
}

impl OsFamily {
    pub const ALL: [OsFamily; 3] = [OsFamily::Windows, OsFamily::Linux, OsFamily::Mac];

    pub fn as_str(self) -> &'static str {
        match self {
            OsFamily::Windows => "windows",
            OsFamily::Linux => "linux",
            OsFamily::Mac => "mac",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "windows" => Ok(OsFamily::Windows),
            "linux" => Ok(OsFamily::Linux),
            "mac" => Ok(OsFamily::Mac),
            other => Err(format!(
                "invalid OS family: {other} (expected \"windows\", \"linux\" or \"mac\")"
            )),
        }
    }
}
