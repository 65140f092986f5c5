//! Textual forms of the non-finite values.

use crate::float::Kind;

/// The spellings match the MSVC and recent Apple Clang runtimes, which keep
/// the quiet/signaling distinction and mark the indeterminate negative NaN.
/// Format and precision never alter these forms.
pub fn repr(negative: bool, kind: Kind) -> &'static str {
    match kind {
        Kind::Inf => {
            if negative {
                "-inf"
            } else {
                "inf"
            }
        }
        Kind::QuietNan => {
            if negative {
                "-nan(ind)"
            } else {
                "nan"
            }
        }
        Kind::SignalingNan => {
            if negative {
                "-nan(snan)"
            } else {
                "nan(snan)"
            }
        }
        // Finite kinds never reach the non-finite formatter.
        Kind::Zero | Kind::Subnormal | Kind::Normal => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table() {
        assert_eq!(repr(false, Kind::Inf), "inf");
        assert_eq!(repr(true, Kind::Inf), "-inf");
        assert_eq!(repr(false, Kind::QuietNan), "nan");
        assert_eq!(repr(true, Kind::QuietNan), "-nan(ind)");
        assert_eq!(repr(false, Kind::SignalingNan), "nan(snan)");
        assert_eq!(repr(true, Kind::SignalingNan), "-nan(snan)");
    }
}
