//! Locale-independent, allocation-free conversion of IEEE-754 floats to
//! text: shortest round-trip digits by default, with scientific, fixed,
//! general and hexadecimal layouts.
//!
//! The digits are found with one cached-power-of-ten multiply per value and
//! emitted with multiply-shift digit extraction; nothing allocates, nothing
//! panics on the conversion paths, and every call is a pure function of its
//! arguments.
//!
//! ## Example
//!
//! ```
//! let mut buffer = charconv::Buffer::new();
//! let printed = buffer.format(1.234);
//! assert_eq!(printed, "1.234e+00");
//! ```
//!
//! The slice entry points report truncation instead of panicking:
//!
//! ```
//! let mut buf = [0u8; 32];
//! let n = charconv::to_chars(&mut buf, 1e300f64).unwrap();
//! assert_eq!(&buf[..n], b"1e+300");
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

mod common;
mod float;
mod fmt;
mod hex;
mod layout;
mod lut;
mod nonfinite;
mod shortest;

pub use float::Float;
use float::Kind;

/// Output layout selector, after C++'s `chars_format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharsFormat {
    /// `d.ddde±EE` with a two-digit minimum exponent.
    Scientific,
    /// Positional, no exponent suffix.
    Fixed,
    /// Hexadecimal significand with a binary exponent, `d.hhhp±E`.
    Hex,
    /// Shortest digits; scientific layout, except that a precision selects
    /// between fixed and scientific the way printf's `%g` does.
    #[default]
    General,
}

/// Conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The text does not fit in the provided buffer. Nothing useful has
    /// been written, and nothing outside the buffer has been touched.
    OutOfRange,
    /// The pointer range was malformed (`first > last`).
    InvalidArgument,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Error::OutOfRange => "value does not fit in the provided buffer",
            Error::InvalidArgument => "malformed output range",
        })
    }
}

impl core::error::Error for Error {}

fn write_value<F: Float>(
    buf: &mut [u8],
    value: F,
    format: CharsFormat,
    precision: Option<usize>,
) -> Result<usize, Error> {
    let class = value.classify();
    match class.kind {
        Kind::Inf | Kind::QuietNan | Kind::SignalingNan => {
            let text = nonfinite::repr(class.negative, class.kind);
            match buf.get_mut(..text.len()) {
                Some(dst) => {
                    dst.copy_from_slice(text.as_bytes());
                    Ok(text.len())
                }
                None => Err(Error::OutOfRange),
            }
        }
        Kind::Zero => layout::zero(buf, class.negative, format, precision),
        Kind::Subnormal | Kind::Normal => match (format, precision) {
            (CharsFormat::Hex, precision) => {
                hex::write(buf, class.negative, value.hex_parts(), precision)
            }
            (CharsFormat::Fixed, precision) => {
                let (digits, k) = value.shortest();
                layout::fixed(buf, class.negative, digits, k, precision)
            }
            (CharsFormat::Scientific | CharsFormat::General, None) => {
                let (digits, k) = value.shortest();
                layout::sci_shortest(buf, class.negative, digits, k, F::MAX_SCI_LEN)
            }
            (CharsFormat::Scientific, Some(p)) => {
                let (digits, k) = value.shortest();
                layout::sci_prec(buf, class.negative, digits, k, p)
            }
            (CharsFormat::General, Some(p)) => {
                let (digits, k) = value.shortest();
                layout::general_prec(buf, class.negative, digits, k, p)
            }
        },
    }
}

/// Writes `value` into `buf` in the general format with shortest round-trip
/// digits, returning the number of bytes written.
pub fn to_chars<F: Float>(buf: &mut [u8], value: F) -> Result<usize, Error> {
    write_value(buf, value, CharsFormat::General, None)
}

/// Writes `value` into `buf` in the chosen format with shortest round-trip
/// digits.
pub fn to_chars_fmt<F: Float>(
    buf: &mut [u8],
    value: F,
    format: CharsFormat,
) -> Result<usize, Error> {
    write_value(buf, value, format, None)
}

/// Writes `value` with exactly `precision` fractional digits (significant
/// digits for [CharsFormat::General], fraction nibbles for
/// [CharsFormat::Hex]).
///
/// The digits come from the shortest round-trip representation, rounded
/// half-to-even where the precision is smaller and zero-padded where it is
/// larger. Non-finite values ignore the precision.
pub fn to_chars_prec<F: Float>(
    buf: &mut [u8],
    value: F,
    format: CharsFormat,
    precision: usize,
) -> Result<usize, Error> {
    write_value(buf, value, format, Some(precision))
}

/// The pointer-range form: writes into `[first, last)` and returns the
/// past-the-end pointer of the text.
///
/// `precision < 0` selects shortest digits. A range with `first > last`
/// reports [Error::InvalidArgument]; a range too small for the text reports
/// [Error::OutOfRange], and the range contents are then unspecified, but no
/// byte outside `[first, last)` is ever touched.
///
/// # Safety
///
/// When `first <= last`, the range must be valid writable memory.
pub unsafe fn to_chars_raw<F: Float>(
    first: *mut u8,
    last: *mut u8,
    value: F,
    format: CharsFormat,
    precision: i32,
) -> Result<*mut u8, Error> {
    if first > last {
        return Err(Error::InvalidArgument);
    }
    let buf = unsafe { core::slice::from_raw_parts_mut(first, last.offset_from(first) as usize) };
    let precision = if precision < 0 { None } else { Some(precision as usize) };
    let n = write_value(buf, value, format, precision)?;
    Ok(unsafe { first.add(n) })
}

/// Safe API for formatting floats into an owned stack buffer.
///
/// ## Example
///
/// ```
/// let mut buffer = charconv::Buffer::new();
/// assert_eq!(buffer.format_fixed(1.5), "1.5");
/// assert_eq!(buffer.format_hex(1.5), "1.8p+0");
/// ```
#[derive(Clone, Copy)]
pub struct Buffer<F: Float = f64> {
    bytes: F::Buffer,
}

impl<F: Float> Buffer<F> {
    /// This is a cheap operation; you don't need to worry about reusing
    /// buffers for efficiency.
    pub fn new() -> Self {
        Buffer { bytes: F::new_buffer() }
    }

    fn write(&mut self, num: F, format: CharsFormat) -> &str {
        let buf = F::buffer(&mut self.bytes);
        // The buffer is sized for the worst case of every shortest layout.
        let n = write_value(buf, num, format, None).unwrap_or(0);
        debug_assert!(n > 0);
        unsafe { core::str::from_utf8_unchecked(&buf[..n]) }
    }

    /// Prints `num` with shortest round-trip digits in the general format
    /// and returns the text within the buffer.
    ///
    /// Non-finite values format as `inf`, `nan`, `nan(ind)` or `nan(snan)`,
    /// with a leading `-` when the sign bit is set.
    pub fn format(&mut self, num: F) -> &str {
        self.write(num, CharsFormat::General)
    }

    /// Like [Self::format], **provided that `num` is finite**; this is not
    /// checked outside debug builds, and a non-finite `num` prints its
    /// non-finite form anyway.
    pub fn format_finite(&mut self, num: F) -> &str {
        debug_assert!(matches!(
            num.classify().kind,
            Kind::Zero | Kind::Subnormal | Kind::Normal
        ));
        self.write(num, CharsFormat::General)
    }

    /// Prints `num` in scientific notation.
    pub fn format_scientific(&mut self, num: F) -> &str {
        self.write(num, CharsFormat::Scientific)
    }

    /// Prints `num` positionally, with no exponent suffix.
    pub fn format_fixed(&mut self, num: F) -> &str {
        self.write(num, CharsFormat::Fixed)
    }

    /// Prints `num` as a hexadecimal significand with a binary exponent.
    pub fn format_hex(&mut self, num: F) -> &str {
        self.write(num, CharsFormat::Hex)
    }
}

impl<F: Float> Default for Buffer<F> {
    fn default() -> Self {
        Self::new()
    }
}
