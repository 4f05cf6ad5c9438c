//! Operating system identifiers used to restrict descriptor entries.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Target operating system of a distributed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Os {
    Windows,
    Mac,
    Linux,
    Other,
}

impl Os {
    pub const ALL: [Os; 4] = [Os::Windows, Os::Mac, Os::Linux, Os::Other];

    /// Short name as written in the manifest.
    pub fn short_name(&self) -> &'static str {
        match self {
            Os::Windows => "win",
            Os::Mac => "mac",
            Os::Linux => "linux",
            Os::Other => "other",
        }
    }

    /// Map a short name (`win`, `mac`, `linux`, `other`) to its OS.
    pub fn from_short_name(name: &str) -> crate::Result<Self> {
        Os::ALL
            .into_iter()
            .find(|os| os.short_name() == name)
            .ok_or_else(|| crate::Error::UnsupportedOs(name.to_string()))
    }

    /// Detect a platform suffix in a file name such as `javafx-graphics-21-linux.jar`.
    ///
    /// Only `-linux`, `-win` and `-mac` directly before the extension are recognized.
    pub fn from_filename(filename: &str) -> Option<Self> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = PATTERN
            .get_or_init(|| Regex::new(r"^.+-(linux|win|mac)\.[^.]+$").expect("valid regex"));

        let captures = pattern.captures(filename)?;
        Os::from_short_name(&captures[1]).ok()
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Os {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Os::from_short_name(s)
    }
}

impl TryFrom<String> for Os {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Os::from_short_name(&value)
    }
}

impl From<Os> for String {
    fn from(os: Os) -> Self {
        os.short_name().to_string()
    }
}
