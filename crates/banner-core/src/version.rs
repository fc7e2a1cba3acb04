//! Version ordinals used to order release labels chronologically
//!
//! Ordinary labels are dotted numbers (`4.3`, `4.3.2`). The `Luna` series
//! replaced the 5.x line after 5.8 and is slotted in as 5.9 through 5.16.
//! This assumes no ordinary 5.9-5.16 release ever coexists with a Luna label.

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// Roman numerals recognised after `Luna`, in release order
const LUNA_NUMERALS: [&str; 8] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII"];

/// Last ordinary version before the Luna series
const LUNA_BASE: (u32, u32) = (5, 8);

static LUNA_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Luna ([IVX]+)(?:\.(\d+))?$").expect("Invalid Luna label regex")
});

/// A totally ordered sort key for a version label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionOrdinal(pub u32, pub u32, pub u32);

impl VersionOrdinal {
    /// Ordinal given to labels that cannot be parsed; sorts after everything
    pub const SENTINEL: VersionOrdinal = VersionOrdinal(999, 999, 999);

    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }
}

impl fmt::Display for VersionOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Convert a version label into its ordinal
///
/// Examples:
/// - "4.3" -> (4, 3, 0)
/// - "4.3.2.9" -> (4, 3, 2)
/// - "Luna II" -> (5, 10, 0)
/// - "Luna II.3" -> (5, 10, 3)
/// - "invalid" -> (999, 999, 999)
pub fn to_ordinal(label: &str) -> VersionOrdinal {
    if let Some(caps) = LUNA_LABEL.captures(label) {
        let rank = LUNA_NUMERALS
            .iter()
            .position(|n| *n == &caps[1])
            .map(|i| i as u32 + 1)
            .unwrap_or(1);

        let minor = match caps.get(2) {
            Some(m) => match m.as_str().parse::<u32>() {
                Ok(minor) => minor,
                Err(_) => return VersionOrdinal::SENTINEL,
            },
            None => 0,
        };

        return VersionOrdinal(LUNA_BASE.0, LUNA_BASE.1 + rank, minor);
    }

    let mut parts = [0u32; 3];
    for (i, component) in label.split('.').enumerate() {
        match component.parse::<u32>() {
            Ok(n) if i < 3 => parts[i] = n,
            Ok(_) => {}
            Err(_) => return VersionOrdinal::SENTINEL,
        }
    }

    VersionOrdinal(parts[0], parts[1], parts[2])
}

/// Compare two labels by ordinal
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    to_ordinal(a).cmp(&to_ordinal(b))
}

/// Stable sort of labels by ordinal
pub fn sort_versions(versions: &mut [String]) {
    versions.sort_by_cached_key(|v| to_ordinal(v));
}
