use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOrStd {
    Path(PathBuf),
    StdStream,
}

impl From<&std::ffi::OsStr> for PathOrStd {
    fn from(value: &std::ffi::OsStr) -> Self {
        if value == "-" {
            Self::StdStream
        } else {
            Self::Path(value.into())
        }
    }
}

/// Parses an integer the way C's `strtol` does with base 0: `0x` or `0X` for hex, a leading `0`
/// for octal and decimal otherwise. Only one sign is allowed, in front of the prefix.
pub fn parse_c_int(s: &str) -> Option<u64> {
    let s = s.strip_prefix('+').unwrap_or(s);
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };

    // `from_str_radix` takes a sign of its own
    if digits.starts_with('+') {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}
