//! Digit emission for decimal significands.
//!
//! The emitters write the significand with a decimal point after the leading
//! digit and strip trailing zeros as they go. Digit pairs are produced by
//! multiply-shift extraction: for a block `n`, find `y` with
//! `floor(10^k * y / 2^32) == n`, then each `(low32(y) * 100) >> 32` step
//! yields the next two digits without a division.

use core::ptr;

pub const RADIX_100_TABLE: &[u8; 200] = b"\
    0001020304050607080910111213141516171819\
    2021222324252627282930313233343536373839\
    4041424344454647484950515253545556575859\
    6061626364656667686970717273747576777879\
    8081828384858687888990919293949596979899";

/// For a 1..=2 digit head value `i`: its leading digit followed by the
/// decimal point. The point is overwritten afterwards when the head has two
/// digits, or left dangling past the returned end when nothing follows it.
pub static RADIX_100_HEAD_TABLE: [u8; 200] = {
    let mut t = [b'.'; 200];
    let mut i = 0;
    while i < 10 {
        t[2 * i] = b'0' + i as u8;
        i += 1;
    }
    while i < 100 {
        t[2 * i] = RADIX_100_TABLE[2 * i];
        i += 1;
    }
    t
};

#[inline]
unsafe fn print_1_digit(n: u32, buf: *mut u8) {
    unsafe { *buf = b'0' + n as u8 }
}

#[inline]
unsafe fn print_2_digits(n: u32, buf: *mut u8) {
    unsafe { ptr::copy_nonoverlapping(RADIX_100_TABLE.as_ptr().add(n as usize * 2), buf, 2) }
}

#[inline]
unsafe fn print_head(n: u32, buf: *mut u8) {
    unsafe { ptr::copy_nonoverlapping(RADIX_100_HEAD_TABLE.as_ptr().add(n as usize * 2), buf, 2) }
}

/// Number of decimal digits of `x`. Invariant: `x` has at most 17 digits.
pub fn len_u64(x: u64) -> usize {
    debug_assert!(x < 10u64.pow(17));
    // High-to-low: long outputs dominate over random floats.
    if x >= 10000000000000000 {
        17
    } else if x >= 1000000000000000 {
        16
    } else if x >= 100000000000000 {
        15
    } else if x >= 10000000000000 {
        14
    } else if x >= 1000000000000 {
        13
    } else if x >= 100000000000 {
        12
    } else if x >= 10000000000 {
        11
    } else if x >= 1000000000 {
        10
    } else if x >= 100000000 {
        9
    } else if x >= 10000000 {
        8
    } else if x >= 1000000 {
        7
    } else if x >= 100000 {
        6
    } else if x >= 10000 {
        5
    } else if x >= 1000 {
        4
    } else if x >= 100 {
        3
    } else if x >= 10 {
        2
    } else {
        1
    }
}

/// Writes `s32` as `d[.ddd…]` with trailing zeros stripped, adds
/// `digit_count - 1` to `exponent`, and returns the advanced pointer.
///
/// The buffer needs room for up to 11 bytes; one byte past the returned end
/// may hold a clobbered `.` or digit.
pub unsafe fn print_significand_9(s32: u32, exponent: &mut i32, buf: *mut u8) -> *mut u8 {
    debug_assert!(s32 < 1_000_000_000);
    // A full 9-digit block cannot end in zero; shorter values may.
    debug_assert!(s32 % 10 != 0 || s32 < 100_000_000);
    unsafe {
        if s32 >= 100_000_000 {
            // 9 digits; the shortest-digits invariant means no trailing
            // zeros here. 1441151882 = ceil(2^57 / 10^8) + 1
            let mut prod = s32 as u64 * 1441151882;
            prod >>= 25;
            print_head((prod >> 32) as u32, buf);
            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(2));
            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(4));
            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(6));
            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(8));

            *exponent += 8;
            buf.add(10)
        } else if s32 >= 1_000_000 {
            // 7 or 8 digits. 281474978 = ceil(2^48 / 10^6) + 1
            let mut prod = s32 as u64 * 281474978;
            prod >>= 16;
            let head = (prod >> 32) as u32;
            *exponent += 6 + (head >= 10) as i32;

            print_head(head, buf);
            // Overwritten by the next pair when more digits follow.
            *buf.add(2) = RADIX_100_TABLE[head as usize * 2 + 1];

            if prod as u32 <= ((1u64 << 32) / 1_000_000) as u32 {
                // Remaining 6 digits are all zero: one char when only the
                // leading digit is nonzero, three otherwise.
                buf.add(1 + ((head >= 10) as usize & (*buf.add(2) > b'0') as usize) * 2)
            } else {
                let buf = buf.add((head >= 10) as usize);
                prod = (prod as u32 as u64) * 100;
                print_2_digits((prod >> 32) as u32, buf.add(2));
                if prod as u32 <= ((1u64 << 32) / 10_000) as u32 {
                    buf.add(3 + (*buf.add(3) > b'0') as usize)
                } else {
                    prod = (prod as u32 as u64) * 100;
                    print_2_digits((prod >> 32) as u32, buf.add(4));
                    if prod as u32 <= ((1u64 << 32) / 100) as u32 {
                        buf.add(5 + (*buf.add(5) > b'0') as usize)
                    } else {
                        prod = (prod as u32 as u64) * 100;
                        print_2_digits((prod >> 32) as u32, buf.add(6));
                        buf.add(7 + (*buf.add(7) > b'0') as usize)
                    }
                }
            }
        } else if s32 >= 10_000 {
            // 5 or 6 digits. 429497 = ceil(2^32 / 10^4)
            let prod = s32 as u64 * 429497;
            let head = (prod >> 32) as u32;
            *exponent += 4 + (head >= 10) as i32;

            print_head(head, buf);
            *buf.add(2) = RADIX_100_TABLE[head as usize * 2 + 1];

            if prod as u32 <= ((1u64 << 32) / 10_000) as u32 {
                buf.add(1 + ((head >= 10) as usize & (*buf.add(2) > b'0') as usize) * 2)
            } else {
                let buf = buf.add((head >= 10) as usize);
                let prod = (prod as u32 as u64) * 100;
                print_2_digits((prod >> 32) as u32, buf.add(2));
                if prod as u32 <= ((1u64 << 32) / 100) as u32 {
                    buf.add(3 + (*buf.add(3) > b'0') as usize)
                } else {
                    let prod = (prod as u32 as u64) * 100;
                    print_2_digits((prod >> 32) as u32, buf.add(4));
                    buf.add(5 + (*buf.add(5) > b'0') as usize)
                }
            }
        } else if s32 >= 100 {
            // 3 or 4 digits. 42949673 = ceil(2^32 / 100)
            let prod = s32 as u64 * 42949673;
            let head = (prod >> 32) as u32;
            *exponent += 2 + (head >= 10) as i32;

            print_head(head, buf);
            *buf.add(2) = RADIX_100_TABLE[head as usize * 2 + 1];

            if prod as u32 <= ((1u64 << 32) / 100) as u32 {
                buf.add(1 + ((head >= 10) as usize & (*buf.add(2) > b'0') as usize) * 2)
            } else {
                let buf = buf.add((head >= 10) as usize);
                let prod = (prod as u32 as u64) * 100;
                print_2_digits((prod >> 32) as u32, buf.add(2));
                buf.add(3 + (*buf.add(3) > b'0') as usize)
            }
        } else {
            // 1 or 2 digits.
            *exponent += (s32 >= 10) as i32;

            print_head(s32, buf);
            *buf.add(2) = RADIX_100_TABLE[s32 as usize * 2 + 1];

            buf.add(1 + ((s32 >= 10) as usize & (*buf.add(2) > b'0') as usize) * 2)
        }
    }
}

/// Writes a significand of up to 17 digits, split into a 9-digit and an
/// 8-digit block. Same contract as [print_significand_9]; the buffer needs
/// room for up to 19 bytes.
pub unsafe fn print_significand_17(significand: u64, exponent: &mut i32, buf: *mut u8) -> *mut u8 {
    debug_assert!(significand < 10u64.pow(17));
    debug_assert!(significand % 10 != 0 || significand < 100_000_000);
    unsafe {
        let first_block;
        let mut second_block = 0u32;
        let no_second_block;

        if significand >= 100_000_000 {
            first_block = (significand / 100_000_000) as u32;
            second_block = (significand - first_block as u64 * 100_000_000) as u32;
            *exponent += 8;
            no_second_block = second_block == 0;
        } else {
            first_block = significand as u32;
            no_second_block = true;
        }

        if no_second_block {
            return print_significand_9(first_block, exponent, buf);
        }

        // The second block ends in a nonzero digit whenever the significand
        // does, so the first block is written without stripping.
        if first_block >= 100_000_000 {
            // 17 digits in total.
            let mut prod = first_block as u64 * 1441151882;
            prod >>= 25;
            print_head((prod >> 32) as u32, buf);
            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(2));
            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(4));
            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(6));
            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(8));

            // 8 more digits, no trailing zeros possible.
            let mut prod = second_block as u64 * 281474978;
            prod >>= 16;
            prod += 1;
            print_2_digits((prod >> 32) as u32, buf.add(10));
            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(12));
            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(14));
            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(16));

            *exponent += 8;
            return buf.add(18);
        }

        let mut buf = buf;
        if first_block >= 1_000_000 {
            // 7 or 8 digits.
            let mut prod = first_block as u64 * 281474978;
            prod >>= 16;
            let head = (prod >> 32) as u32;

            print_head(head, buf);
            *buf.add(2) = RADIX_100_TABLE[head as usize * 2 + 1];

            *exponent += 6 + (head >= 10) as i32;
            buf = buf.add((head >= 10) as usize);

            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(2));
            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(4));
            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(6));

            buf = buf.add(8);
        } else if first_block >= 10_000 {
            // 5 or 6 digits.
            let mut prod = first_block as u64 * 429497;
            let head = (prod >> 32) as u32;

            print_head(head, buf);
            *buf.add(2) = RADIX_100_TABLE[head as usize * 2 + 1];

            *exponent += 4 + (head >= 10) as i32;
            buf = buf.add((head >= 10) as usize);

            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(2));
            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(4));

            buf = buf.add(6);
        } else if first_block >= 100 {
            // 3 or 4 digits.
            let mut prod = first_block as u64 * 42949673;
            let head = (prod >> 32) as u32;

            print_head(head, buf);
            *buf.add(2) = RADIX_100_TABLE[head as usize * 2 + 1];

            *exponent += 2 + (head >= 10) as i32;
            buf = buf.add((head >= 10) as usize);

            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(2));

            buf = buf.add(4);
        } else {
            // 1 or 2 digits.
            print_head(first_block, buf);
            *buf.add(2) = RADIX_100_TABLE[first_block as usize * 2 + 1];

            *exponent += (first_block >= 10) as i32;
            buf = buf.add(2 + (first_block >= 10) as usize);
        }

        // The 8-digit second block, which may carry trailing zeros.
        let mut prod = second_block as u64 * 281474978;
        prod >>= 16;
        prod += 1;
        print_2_digits((prod >> 32) as u32, buf);

        if prod as u32 <= ((1u64 << 32) / 1_000_000) as u32 {
            buf.add(1 + (*buf.add(1) > b'0') as usize)
        } else {
            prod = (prod as u32 as u64) * 100;
            print_2_digits((prod >> 32) as u32, buf.add(2));
            if prod as u32 <= ((1u64 << 32) / 10_000) as u32 {
                buf.add(3 + (*buf.add(3) > b'0') as usize)
            } else {
                prod = (prod as u32 as u64) * 100;
                print_2_digits((prod >> 32) as u32, buf.add(4));
                if prod as u32 <= ((1u64 << 32) / 100) as u32 {
                    buf.add(5 + (*buf.add(5) > b'0') as usize)
                } else {
                    prod = (prod as u32 as u64) * 100;
                    print_2_digits((prod >> 32) as u32, buf.add(6));
                    buf.add(7 + (*buf.add(7) > b'0') as usize)
                }
            }
        }
    }
}

/// Writes `e`, a mandatory sign, and the exponent with at least two digits
/// (three for `|exp| >= 100`). Returns the number of bytes written.
pub unsafe fn print_exponent(exp: i32, buf: *mut u8) -> usize {
    debug_assert!(-999 <= exp && exp <= 999);
    unsafe {
        *buf = b'e';
        let abs = if exp < 0 {
            *buf.add(1) = b'-';
            -exp as u32
        } else {
            *buf.add(1) = b'+';
            exp as u32
        };

        if abs >= 100 {
            // d1 = abs / 10, d2 = abs % 10; 6554 = ceil(2^16 / 10)
            let prod = abs * 6554;
            let d1 = prod >> 16;
            let prod = (prod as u16 as u32) * 5;
            let d2 = prod >> 15;
            print_2_digits(d1, buf.add(2));
            print_1_digit(d2, buf.add(4));
            5
        } else {
            print_2_digits(abs, buf.add(2));
            4
        }
    }
}

/// Writes the decimal digits of `x` with no point. Invariant: `x` has
/// exactly `len` digits.
pub unsafe fn print_digits_known_len(mut x: u64, len: usize, buf: *mut u8) {
    debug_assert!(len == len_u64(x));
    unsafe {
        let mut i = len;
        while x >= 100 {
            i -= 2;
            print_2_digits((x % 100) as u32, buf.add(i));
            x /= 100;
        }
        if x >= 10 {
            print_2_digits(x as u32, buf);
        } else {
            print_1_digit(x as u32, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// What the significand emitters must produce for `x`: digits with
    /// trailing zeros dropped, a point after the first digit when more than
    /// one remains, and an exponent gain of `digit_count - 1`.
    fn reference(x: u64) -> (String, i32) {
        let s = x.to_string();
        let stripped = s.trim_end_matches('0');
        let stripped = if stripped.is_empty() { "0" } else { stripped };
        let text = if stripped.len() == 1 {
            stripped.to_string()
        } else {
            format!("{}.{}", &stripped[..1], &stripped[1..])
        };
        (text, s.len() as i32 - 1)
    }

    fn run_9(x: u32) -> (String, i32) {
        let mut buf = [0u8; 32];
        let mut exp = 0;
        let end = unsafe { print_significand_9(x, &mut exp, buf.as_mut_ptr()) };
        let len = unsafe { end.offset_from(buf.as_ptr()) } as usize;
        (core::str::from_utf8(&buf[..len]).unwrap().to_string(), exp)
    }

    fn run_17(x: u64) -> (String, i32) {
        let mut buf = [0u8; 32];
        let mut exp = 0;
        let end = unsafe { print_significand_17(x, &mut exp, buf.as_mut_ptr()) };
        let len = unsafe { end.offset_from(buf.as_ptr()) } as usize;
        (core::str::from_utf8(&buf[..len]).unwrap().to_string(), exp)
    }

    #[test]
    fn significand_9_spots() {
        assert_eq!(run_9(1), ("1".to_string(), 0));
        assert_eq!(run_9(7), ("7".to_string(), 0));
        assert_eq!(run_9(42), ("4.2".to_string(), 1));
        assert_eq!(run_9(40), ("4".to_string(), 1));
        assert_eq!(run_9(1200), ("1.2".to_string(), 3));
        assert_eq!(run_9(123456), ("1.23456".to_string(), 5));
        assert_eq!(run_9(12340600), ("1.23406".to_string(), 7));
        assert_eq!(run_9(999999999), ("9.99999999".to_string(), 8));
    }

    #[test]
    fn significand_17_spots() {
        assert_eq!(run_17(1), ("1".to_string(), 0));
        assert_eq!(run_17(17976931348623157), ("1.7976931348623157".to_string(), 16));
        assert_eq!(run_17(22250738585072014), ("2.2250738585072014".to_string(), 16));
        assert_eq!(run_17(100000001), ("1.00000001".to_string(), 8));
        assert_eq!(run_17(10400000000000003), ("1.0400000000000003".to_string(), 16));
    }

    /// The engine never hands the emitters a value ending in zero unless it
    /// is short enough to dodge the unstripped 9-digit block.
    fn strip(mut x: u64) -> u64 {
        while x % 10 == 0 {
            x /= 10;
        }
        x
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50_000))]

        #[test]
        fn significand_9_short(x in 1u32..100_000_000) {
            prop_assert_eq!(run_9(x), reference(x as u64));
        }

        #[test]
        fn significand_9_full(x in 100_000_000u32..1_000_000_000) {
            let x = strip(x as u64) as u32;
            prop_assert_eq!(run_9(x), reference(x as u64));
        }

        #[test]
        fn significand_17(x in 1u64..100_000_000_000_000_000) {
            let x = strip(x);
            prop_assert_eq!(run_17(x), reference(x));
        }

        #[test]
        fn digits_known_len(x in 0u64..100_000_000_000_000_000) {
            let mut buf = [0u8; 24];
            let expected = x.to_string();
            unsafe { print_digits_known_len(x, expected.len(), buf.as_mut_ptr()) };
            prop_assert_eq!(&buf[..expected.len()], expected.as_bytes());
        }
    }

    #[test]
    fn exponents() {
        let mut buf = [0u8; 8];
        for exp in -999..=999 {
            let len = unsafe { print_exponent(exp, buf.as_mut_ptr()) };
            let expected = if exp.abs() >= 100 {
                format!("e{}{:03}", if exp < 0 { '-' } else { '+' }, exp.abs())
            } else {
                format!("e{}{:02}", if exp < 0 { '-' } else { '+' }, exp.abs())
            };
            assert_eq!(&buf[..len], expected.as_bytes(), "exp = {exp}");
        }
    }
}
