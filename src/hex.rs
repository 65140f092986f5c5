//! Hexadecimal-significand formatting, straight from the raw encoding.
//!
//! The exponent marker is `p` because `e` is a hexadecimal digit. The
//! binary exponent is printed in decimal with a mandatory sign and no
//! minimum width.

use crate::float::HexParts;
use crate::fmt;
use crate::Error;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Writes `±d.hhhp±EE` for a finite nonzero value. Shortest mode strips
/// trailing zero nibbles; a precision gives exactly that many fraction
/// nibbles, rounded half to even at the nibble boundary (the carry may bump
/// the integer digit, as in printf's `%.Na`).
pub fn write(
    buf: &mut [u8],
    negative: bool,
    parts: HexParts,
    precision: Option<usize>,
) -> Result<usize, Error> {
    if let Some(p) = precision {
        // No output is shorter than its fraction nibbles.
        if p > buf.len() {
            return Err(Error::OutOfRange);
        }
    }
    let nibbles = parts.nibbles as usize;
    let mut leading = parts.leading;

    // `frac` stays right-aligned over `frac_nibbles` nibbles; `pad` zero
    // nibbles follow it.
    let (frac, frac_nibbles, pad) = match precision {
        None => {
            if parts.mantissa == 0 {
                (0, 0, 0)
            } else {
                let tz = parts.mantissa.trailing_zeros() as usize / 4;
                (parts.mantissa >> (4 * tz), nibbles - tz, 0)
            }
        }
        Some(p) if p < nibbles => {
            let dropbits = 4 * (nibbles - p) as u32;
            let q = parts.mantissa >> dropbits;
            let r = parts.mantissa & ((1u64 << dropbits) - 1);
            let half = 1u64 << (dropbits - 1);
            let kept_parity = if p == 0 { leading as u64 } else { q };
            let up = r > half || (r == half && kept_parity & 1 == 1);
            let q = q + up as u64;
            if p == 0 || q >> (4 * p) != 0 {
                // p == 0 leaves no fraction; otherwise the carry ran
                // through every kept nibble.
                leading += (p == 0 && up) as u8 + (p != 0) as u8;
                (0, p, 0)
            } else {
                (q, p, 0)
            }
        }
        Some(p) => (parts.mantissa, nibbles, p - nibbles),
    };

    let exp_abs = parts.exp.unsigned_abs() as u64;
    let exp_len = fmt::len_u64(exp_abs);
    let emit = frac_nibbles + pad;
    let len = negative as usize + 1 + if emit > 0 { 1 + emit } else { 0 } + 2 + exp_len;
    if len > buf.len() {
        return Err(Error::OutOfRange);
    }

    let mut i = 0;
    if negative {
        buf[i] = b'-';
        i += 1;
    }
    buf[i] = b'0' + leading;
    i += 1;
    if emit > 0 {
        buf[i] = b'.';
        i += 1;
        for j in 0..frac_nibbles {
            buf[i + j] = HEX_DIGITS[(frac >> (4 * (frac_nibbles - 1 - j))) as usize & 0xF];
        }
        i += frac_nibbles;
        buf[i..i + pad].fill(b'0');
        i += pad;
    }
    buf[i] = b'p';
    i += 1;
    buf[i] = if parts.exp < 0 { b'-' } else { b'+' };
    i += 1;
    unsafe { fmt::print_digits_known_len(exp_abs, exp_len, buf.as_mut_ptr().add(i)) };
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::Sealed;

    fn hex64(num: f64, precision: Option<usize>) -> String {
        let mut buf = [0u8; 64];
        let c = Sealed::classify(num);
        let len = write(&mut buf, c.negative, num.hex_parts(), precision).unwrap();
        core::str::from_utf8(&buf[..len]).unwrap().to_string()
    }

    fn hex32(num: f32, precision: Option<usize>) -> String {
        let mut buf = [0u8; 64];
        let c = Sealed::classify(num);
        let len = write(&mut buf, c.negative, num.hex_parts(), precision).unwrap();
        core::str::from_utf8(&buf[..len]).unwrap().to_string()
    }

    #[test]
    fn shortest() {
        assert_eq!(hex64(1.0, None), "1p+0");
        assert_eq!(hex64(-1.0, None), "-1p+0");
        assert_eq!(hex64(0.5, None), "1p-1");
        assert_eq!(hex64(1.5, None), "1.8p+0");
        assert_eq!(hex64(255.0, None), "1.fep+7");
        assert_eq!(hex64(f64::MAX, None), "1.fffffffffffffp+1023");
        assert_eq!(hex64(f64::MIN_POSITIVE, None), "1p-1022");
        assert_eq!(hex64(f64::from_bits(1), None), "0.0000000000001p-1022");
    }

    #[test]
    fn one_ulp_apart() {
        // Adjacent floats differ in the last nibble.
        assert_eq!(hex64(-1.08260383390082950e+20, None), "-1.779a8946bb5fap+66");
        assert_eq!(hex64(-1.08260383390082946e+20, None), "-1.779a8946bb5f9p+66");
    }

    #[test]
    fn shortest32() {
        assert_eq!(hex32(1.0, None), "1p+0");
        assert_eq!(hex32(1.5, None), "1.8p+0");
        assert_eq!(hex32(f32::MAX, None), "1.fffffep+127");
        assert_eq!(hex32(f32::MIN_POSITIVE, None), "1p-126");
        assert_eq!(hex32(f32::from_bits(1), None), "0.000002p-126");
    }

    #[test]
    fn precision() {
        assert_eq!(hex64(1.5, Some(3)), "1.800p+0");
        assert_eq!(hex64(1.0, Some(0)), "1p+0");
        assert_eq!(hex64(1.0, Some(15)), "1.000000000000000p+0");
        // 0x1.fffp+0 rounded to two nibbles carries into the integer digit.
        assert_eq!(hex64(f64::from_bits(0x3FFF_FF00_0000_0000), Some(2)), "2.00p+0");
        // 0x1.8p+3 to no fraction: tie, the odd integer digit rounds up.
        assert_eq!(hex64(12.0, Some(0)), "2p+3");
        // 0x1.08p+0: tie at the dropped nibble, even stays.
        assert_eq!(hex64(f64::from_bits(0x3FF0_8000_0000_0000), Some(1)), "1.0p+0");
        // 0x1.18p+0: tie, odd kept nibble rounds up.
        assert_eq!(hex64(f64::from_bits(0x3FF1_8000_0000_0000), Some(1)), "1.2p+0");
    }
}
