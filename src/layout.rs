//! Shaping the shortest digits into the requested textual layout.
//!
//! Every function takes `(digits, k)` with `value = digits * 10^k` from the
//! shortest engine. The bounded scientific layout is emitted directly (or
//! through a scratch buffer when the caller's is smaller than the worst
//! case); the unbounded layouts compute their exact length first and refuse
//! before writing anything.

use core::ptr;

use crate::common::{Exp, POW10};
use crate::fmt;
use crate::{CharsFormat, Error};

/// Drops `drop` digits from the right, rounding half to even.
fn round_at(digits: u64, drop: usize) -> u64 {
    if drop == 0 {
        return digits;
    }
    if drop >= 20 {
        return 0;
    }
    let div = POW10[drop];
    let q = digits / div;
    let r = digits % div;
    let half = div / 2;
    if r > half || (r == half && q % 2 == 1) {
        q + 1
    } else {
        q
    }
}

unsafe fn write_sci(negative: bool, digits: u64, k: Exp, buf: *mut u8) -> usize {
    unsafe {
        *buf = b'-';
        let start = buf.add(negative as usize);
        let mut exponent = k;
        let end = if digits < 100_000_000 {
            fmt::print_significand_9(digits as u32, &mut exponent, start)
        } else {
            fmt::print_significand_17(digits, &mut exponent, start)
        };
        let exp_len = fmt::print_exponent(exponent, end);
        end.offset_from(buf) as usize + exp_len
    }
}

/// Shortest scientific layout; `max_len` is the format's worst case.
pub fn sci_shortest(
    buf: &mut [u8],
    negative: bool,
    digits: u64,
    k: Exp,
    max_len: usize,
) -> Result<usize, Error> {
    if buf.len() >= max_len {
        Ok(unsafe { write_sci(negative, digits, k, buf.as_mut_ptr()) })
    } else {
        let mut tmp = [0u8; 32];
        let len = unsafe { write_sci(negative, digits, k, tmp.as_mut_ptr()) };
        if len <= buf.len() {
            buf[..len].copy_from_slice(&tmp[..len]);
            Ok(len)
        } else {
            Err(Error::OutOfRange)
        }
    }
}

/// Scientific layout with exactly `p` fractional digits, rounded half to
/// even from the shortest digits and zero-padded past them.
pub fn sci_prec(
    buf: &mut [u8],
    negative: bool,
    digits: u64,
    k: Exp,
    p: usize,
) -> Result<usize, Error> {
    // No output is shorter than its fractional digits; this also keeps the
    // length arithmetic below in range.
    if p > buf.len() {
        return Err(Error::OutOfRange);
    }
    let n = fmt::len_u64(digits);
    let mut sci_exp = k + n as Exp - 1;
    let (digits, n) = if p + 1 < n {
        let keep = p + 1;
        let mut q = round_at(digits, n - keep);
        if q == POW10[keep] {
            q /= 10;
            sci_exp += 1;
        }
        (q, keep)
    } else {
        (digits, n)
    };

    let exp_len = if sci_exp.unsigned_abs() >= 100 { 5 } else { 4 };
    let len = negative as usize + 1 + if p > 0 { 1 + p } else { 0 } + exp_len;
    if len > buf.len() {
        return Err(Error::OutOfRange);
    }

    unsafe {
        let mut ptr = buf.as_mut_ptr();
        if negative {
            *ptr = b'-';
            ptr = ptr.add(1);
        }
        let mut tmp = [0u8; 17];
        fmt::print_digits_known_len(digits, n, tmp.as_mut_ptr());
        *ptr = tmp[0];
        ptr = ptr.add(1);
        if p > 0 {
            *ptr = b'.';
            ptr = ptr.add(1);
            ptr::copy_nonoverlapping(tmp.as_ptr().add(1), ptr, n - 1);
            ptr = ptr.add(n - 1);
            ptr::write_bytes(ptr, b'0', p - (n - 1));
            ptr = ptr.add(p - (n - 1));
        }
        fmt::print_exponent(sci_exp, ptr);
    }
    Ok(len)
}

/// Positional layout with exactly `pad_to` fractional digits; the fraction
/// carried by `(digits, k)` must already fit in `pad_to`.
fn fixed_layout(
    buf: &mut [u8],
    negative: bool,
    digits: u64,
    k: Exp,
    pad_to: usize,
) -> Result<usize, Error> {
    debug_assert!(k >= 0 || (-k) as usize <= pad_to);
    let n = fmt::len_u64(digits);

    let int_len = if n as i64 + k as i64 > 0 { (n as i64 + k as i64) as usize } else { 1 };
    let len = negative as usize + int_len + if pad_to > 0 { 1 + pad_to } else { 0 };
    if len > buf.len() {
        return Err(Error::OutOfRange);
    }

    unsafe {
        let mut ptr = buf.as_mut_ptr();
        if negative {
            *ptr = b'-';
            ptr = ptr.add(1);
        }
        if k >= 0 {
            fmt::print_digits_known_len(digits, n, ptr);
            ptr = ptr.add(n);
            ptr::write_bytes(ptr, b'0', k as usize);
            ptr = ptr.add(k as usize);
            if pad_to > 0 {
                *ptr = b'.';
                ptr::write_bytes(ptr.add(1), b'0', pad_to);
            }
        } else if n as i64 + k as i64 > 0 {
            // The point falls inside the digit string.
            let int_digits = (n as i64 + k as i64) as usize;
            let frac_digits = (-k) as usize;
            let mut tmp = [0u8; 17];
            fmt::print_digits_known_len(digits, n, tmp.as_mut_ptr());
            ptr::copy_nonoverlapping(tmp.as_ptr(), ptr, int_digits);
            ptr = ptr.add(int_digits);
            *ptr = b'.';
            ptr = ptr.add(1);
            ptr::copy_nonoverlapping(tmp.as_ptr().add(int_digits), ptr, frac_digits);
            ptr = ptr.add(frac_digits);
            ptr::write_bytes(ptr, b'0', pad_to - frac_digits);
        } else {
            let lead = (-k) as usize - n;
            *ptr = b'0';
            *ptr.add(1) = b'.';
            ptr = ptr.add(2);
            ptr::write_bytes(ptr, b'0', lead);
            ptr = ptr.add(lead);
            fmt::print_digits_known_len(digits, n, ptr);
            ptr = ptr.add(n);
            ptr::write_bytes(ptr, b'0', pad_to - (-k) as usize);
        }
    }
    Ok(len)
}

/// Fixed layout; `precision` of `None` keeps the natural fraction, `Some(p)`
/// rounds or pads to exactly `p` fractional digits.
pub fn fixed(
    buf: &mut [u8],
    negative: bool,
    digits: u64,
    k: Exp,
    precision: Option<usize>,
) -> Result<usize, Error> {
    match precision {
        None => {
            let pad = if k < 0 { (-k) as usize } else { 0 };
            fixed_layout(buf, negative, digits, k, pad)
        }
        Some(p) => {
            if p > buf.len() {
                return Err(Error::OutOfRange);
            }
            let (digits, k) = if k < 0 && (-k) as usize > p {
                let drop = (-k) as usize - p;
                (round_at(digits, drop), k + drop as Exp)
            } else {
                (digits, k)
            };
            // Everything rounded away: the value is now plain zero.
            let (digits, k) = if digits == 0 { (0, 0) } else { (digits, k) };
            fixed_layout(buf, negative, digits, k, p)
        }
    }
}

/// `%g`-style layout with `p` significant digits: round, strip the zeros
/// the rounding created, then pick fixed or scientific by the exponent
/// window.
pub fn general_prec(
    buf: &mut [u8],
    negative: bool,
    digits: u64,
    k: Exp,
    p: usize,
) -> Result<usize, Error> {
    // The decimal exponent never exceeds a few hundred, so any cap past
    // 1000 behaves like infinity in the window test below.
    let cap = if p == 0 { 1 } else { p.min(1000) };
    let n = fmt::len_u64(digits);
    let mut sci_exp = k + n as Exp - 1;
    let (digits, k) = if cap < n {
        let mut q = round_at(digits, n - cap);
        if q == POW10[cap] {
            q /= 10;
            sci_exp += 1;
        }
        while q % 10 == 0 {
            q /= 10;
        }
        (q, sci_exp - fmt::len_u64(q) as Exp + 1)
    } else {
        (digits, k)
    };

    if -4 <= sci_exp && sci_exp < cap as Exp {
        let pad = if k < 0 { (-k) as usize } else { 0 };
        fixed_layout(buf, negative, digits, k, pad)
    } else {
        sci_shortest(buf, negative, digits, k, 24)
    }
}

/// All textual forms of `±0`.
pub fn zero(
    buf: &mut [u8],
    negative: bool,
    fmt: CharsFormat,
    precision: Option<usize>,
) -> Result<usize, Error> {
    let (pad, suffix): (usize, &str) = match fmt {
        CharsFormat::Scientific => (precision.unwrap_or(0), "e+00"),
        CharsFormat::General => (0, if precision.is_some() { "" } else { "e+00" }),
        CharsFormat::Fixed => (precision.unwrap_or(0), ""),
        CharsFormat::Hex => (precision.unwrap_or(0), "p+0"),
    };
    if pad > buf.len() {
        return Err(Error::OutOfRange);
    }
    let len = negative as usize + 1 + if pad > 0 { 1 + pad } else { 0 } + suffix.len();
    if len > buf.len() {
        return Err(Error::OutOfRange);
    }
    let mut i = 0;
    if negative {
        buf[0] = b'-';
        i = 1;
    }
    buf[i] = b'0';
    i += 1;
    if pad > 0 {
        buf[i] = b'.';
        i += 1;
        buf[i..i + pad].fill(b'0');
        i += pad;
    }
    buf[i..i + suffix.len()].copy_from_slice(suffix.as_bytes());
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<F>(f: F) -> String
    where
        F: FnOnce(&mut [u8]) -> Result<usize, Error>,
    {
        let mut buf = [0u8; 512];
        let len = f(&mut buf).unwrap();
        core::str::from_utf8(&buf[..len]).unwrap().to_string()
    }

    #[test]
    fn rounding() {
        assert_eq!(round_at(12345, 0), 12345);
        assert_eq!(round_at(12345, 1), 1234); // tie to even
        assert_eq!(round_at(12355, 1), 1236);
        assert_eq!(round_at(12351, 1), 1235);
        assert_eq!(round_at(999, 1), 100);
        assert_eq!(round_at(4, 1), 0);
        assert_eq!(round_at(5, 1), 0); // tie, 0 is even
        assert_eq!(round_at(6, 1), 1);
        assert_eq!(round_at(17976931348623157, 19), 0);
        assert_eq!(round_at(17976931348623157, 25), 0);
    }

    #[test]
    fn sci() {
        assert_eq!(run(|b| sci_shortest(b, false, 12345, -4, 24)), "1.2345e+00");
        assert_eq!(run(|b| sci_shortest(b, true, 1, 300, 24)), "-1e+300");
        assert_eq!(run(|b| sci_shortest(b, false, 5, -324, 24)), "5e-324");
    }

    #[test]
    fn sci_small_buffer_exact_fit() {
        let mut buf = [0u8; 10];
        let len = sci_shortest(&mut buf, false, 12345, -4, 24).unwrap();
        assert_eq!(&buf[..len], b"1.2345e+00");
        let mut buf = [0u8; 9];
        assert_eq!(sci_shortest(&mut buf, false, 12345, -4, 24), Err(Error::OutOfRange));
    }

    #[test]
    fn sci_precision() {
        assert_eq!(run(|b| sci_prec(b, false, 3, -1, 4)), "3.0000e-01");
        assert_eq!(run(|b| sci_prec(b, false, 125, -3, 2)), "1.25e-01");
        assert_eq!(run(|b| sci_prec(b, false, 125, -3, 1)), "1.2e-01"); // tie to even
        assert_eq!(run(|b| sci_prec(b, false, 135, -3, 1)), "1.4e-01");
        assert_eq!(run(|b| sci_prec(b, false, 999, -2, 1)), "1.0e+01"); // carry
        assert_eq!(run(|b| sci_prec(b, false, 999, -2, 0)), "1e+01");
        assert_eq!(run(|b| sci_prec(b, true, 1, 300, 2)), "-1.00e+300");
    }

    #[test]
    fn fixed_shortest() {
        assert_eq!(run(|b| fixed(b, false, 123456, -3, None)), "123.456");
        assert_eq!(run(|b| fixed(b, false, 5, -1, None)), "0.5");
        assert_eq!(run(|b| fixed(b, true, 5, -4, None)), "-0.0005");
        assert_eq!(run(|b| fixed(b, false, 1, 5, None)), "100000");
        assert_eq!(run(|b| fixed(b, false, 17, 0, None)), "17");
    }

    #[test]
    fn fixed_precision() {
        assert_eq!(run(|b| fixed(b, false, 123456, -3, Some(5))), "123.45600");
        assert_eq!(run(|b| fixed(b, false, 123456, -3, Some(0))), "123");
        assert_eq!(run(|b| fixed(b, false, 125, -3, Some(2))), "0.12"); // tie to even
        assert_eq!(run(|b| fixed(b, false, 135, -3, Some(2))), "0.14");
        assert_eq!(run(|b| fixed(b, false, 999, -5, Some(2))), "0.01");
        assert_eq!(run(|b| fixed(b, false, 996, -4, Some(2))), "0.10"); // carry across point
        assert_eq!(run(|b| fixed(b, true, 1, -4, Some(2))), "-0.00"); // rounded to nothing
        assert_eq!(run(|b| fixed(b, false, 1, 2, Some(3))), "100.000");
    }

    #[test]
    fn general_precision() {
        assert_eq!(run(|b| general_prec(b, false, 12345, -1, 2)), "1.2e+03");
        assert_eq!(run(|b| general_prec(b, false, 1234, -7, 2)), "0.00012");
        assert_eq!(run(|b| general_prec(b, false, 1, 5, 3)), "1e+05");
        assert_eq!(run(|b| general_prec(b, false, 1, 0, 5)), "1");
        assert_eq!(run(|b| general_prec(b, false, 5, -1, 1)), "0.5");
        assert_eq!(run(|b| general_prec(b, false, 999, -2, 1)), "1e+01");
        assert_eq!(run(|b| general_prec(b, false, 15, 0, 1)), "2e+01"); // tie to even, up
        assert_eq!(run(|b| general_prec(b, false, 25, 0, 1)), "2e+01"); // tie to even, down
        assert_eq!(run(|b| general_prec(b, false, 12345, -4, 0)), "1");
    }

    #[test]
    fn zeros() {
        assert_eq!(run(|b| zero(b, false, CharsFormat::General, None)), "0e+00");
        assert_eq!(run(|b| zero(b, true, CharsFormat::General, None)), "-0e+00");
        assert_eq!(run(|b| zero(b, false, CharsFormat::Scientific, None)), "0e+00");
        assert_eq!(run(|b| zero(b, false, CharsFormat::Scientific, Some(3))), "0.000e+00");
        assert_eq!(run(|b| zero(b, false, CharsFormat::Fixed, None)), "0");
        assert_eq!(run(|b| zero(b, true, CharsFormat::Fixed, Some(2))), "-0.00");
        assert_eq!(run(|b| zero(b, false, CharsFormat::Hex, None)), "0p+0");
        assert_eq!(run(|b| zero(b, false, CharsFormat::General, Some(4))), "0");
    }
}
