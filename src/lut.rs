//! Power-of-ten lookup tables.
//!
//! Every table is a `static` whose contents are computed at compile time by
//! exact big-integer arithmetic. An entry for the decimal exponent `f` is the
//! upper approximation `ceil(2^(Q - 1 + e0(f)) * 10^-f)`, where `Q` is the
//! bit width of the entry and `e0(f)` the smallest binary exponent whose
//! `floor(log10(2^e))` equals `f`; by construction each entry has exactly
//! `Q` significant bits.

use crate::common::{exp_log2_pow10, Exp, MultInverse, MultInverses, Multiplier, Multipliers};

/// Working width of the compile-time big integers: 896 bits. The largest
/// intermediate value is `5^324` at 753 bits.
const WORDS: usize = 14;

/// Little-endian fixed-width unsigned integer, compile-time use only.
#[derive(Clone, Copy)]
struct Big {
    w: [u64; WORDS],
}

const ZERO: Big = Big { w: [0; WORDS] };

const fn big_from(x: u64) -> Big {
    let mut b = ZERO;
    b.w[0] = x;
    b
}

const fn big_mul5(a: Big) -> Big {
    let mut out = ZERO;
    let mut carry = 0u64;
    let mut i = 0;
    while i < WORDS {
        let p = a.w[i] as u128 * 5 + carry as u128;
        out.w[i] = p as u64;
        carry = (p >> 64) as u64;
        i += 1;
    }
    assert!(carry == 0);
    out
}

const fn big_is_zero(a: &Big) -> bool {
    let mut i = 0;
    while i < WORDS {
        if a.w[i] != 0 {
            return false;
        }
        i += 1;
    }
    true
}

const fn big_bitlen(a: &Big) -> i32 {
    let mut i = WORDS;
    while i > 0 {
        i -= 1;
        if a.w[i] != 0 {
            return i as i32 * 64 + 64 - a.w[i].leading_zeros() as i32;
        }
    }
    0
}

const fn big_shl1(a: Big) -> Big {
    let mut out = ZERO;
    let mut i = WORDS;
    while i > 1 {
        i -= 1;
        out.w[i] = (a.w[i] << 1) | (a.w[i - 1] >> 63);
    }
    out.w[0] = a.w[0] << 1;
    out
}

const fn big_ge(a: &Big, b: &Big) -> bool {
    let mut i = WORDS;
    while i > 0 {
        i -= 1;
        if a.w[i] != b.w[i] {
            return a.w[i] > b.w[i];
        }
    }
    true
}

const fn big_sub(a: Big, b: Big) -> Big {
    let mut out = ZERO;
    let mut borrow = 0u64;
    let mut i = 0;
    while i < WORDS {
        let (d, b1) = a.w[i].overflowing_sub(b.w[i]);
        let (d, b2) = d.overflowing_sub(borrow);
        out.w[i] = d;
        borrow = (b1 | b2) as u64;
        i += 1;
    }
    assert!(borrow == 0);
    out
}

/// 64 bits of `a` starting at bit `at`.
const fn big_extract64(a: &Big, at: i32) -> u64 {
    let idx = (at / 64) as usize;
    let off = (at % 64) as u32;
    if off == 0 {
        a.w[idx]
    } else {
        (a.w[idx] >> off) | (a.w[idx + 1] << (64 - off))
    }
}

/// Whether any bit of `a` below position `below` is set.
const fn big_low_nonzero(a: &Big, below: i32) -> bool {
    let mut i = 0;
    while (i as i32) < (below + 63) / 64 {
        let in_word = below - i as i32 * 64;
        let mask = if in_word >= 64 { u64::MAX } else { (1u64 << in_word) - 1 };
        if a.w[i] & mask != 0 {
            return true;
        }
        i += 1;
    }
    false
}

const fn big_as_u128(a: &Big) -> u128 {
    let mut i = 2;
    while i < WORDS {
        assert!(a.w[i] == 0);
        i += 1;
    }
    ((a.w[1] as u128) << 64) | a.w[0] as u128
}

/// `ceil(2^p / d)`, which must have at most `qbits` significant bits.
///
/// Restoring long division, fast-forwarded past the leading zero quotient
/// bits so the loop runs `p - bitlen(d) + 2` times.
const fn div_pow2_ceil(p: i32, d: &Big, qbits: i32) -> u128 {
    let nb = big_bitlen(d);
    assert!(nb >= 2);
    let steps = p - nb + 2;
    assert!(1 <= steps && steps <= qbits + 1);

    // Remainder after consuming the top `nb - 1` bits of 2^p.
    let mut r = ZERO;
    r.w[((nb - 2) / 64) as usize] = 1 << ((nb - 2) % 64) as u32;

    let mut q: u128 = 0;
    let mut i = 0;
    while i < steps {
        q <<= 1;
        r = big_shl1(r);
        if big_ge(&r, d) {
            r = big_sub(r, *d);
            q |= 1;
        }
        i += 1;
    }
    if !big_is_zero(&r) {
        q += 1;
    }
    q
}

/// The top `qbits` bits of `a`, rounded up if any lower bit is set.
const fn top_bits_ceil(a: &Big, qbits: i32) -> u128 {
    let s = big_bitlen(a) - qbits;
    assert!(s > 0);
    let mut v = if qbits > 64 {
        ((big_extract64(a, s + 64) as u128) << 64) | big_extract64(a, s) as u128
    } else {
        big_extract64(a, s) as u128
    };
    if big_low_nonzero(a, s) {
        v += 1;
    }
    v
}

/// Smallest binary exponent `e` with `floor(log10(2^e)) == f`.
const fn min_binary_exp(f: Exp) -> Exp {
    if f == 0 {
        0
    } else {
        exp_log2_pow10(f) + 1
    }
}

/// Entry for `f > 0`, given `d = 5^f`.
const fn entry_pos(d: &Big, f: Exp, qbits: i32) -> u128 {
    // 10^f = 5^f * 2^f, so divide 2^(qbits - 1 + e0 - f) by 5^f.
    div_pow2_ceil(qbits - 1 + min_binary_exp(f) - f, d, qbits)
}

/// Entry for `f = -g < 0`, given `b = 5^g`.
const fn entry_neg(b: &Big, g: Exp, qbits: i32) -> u128 {
    let t = qbits - 1 + min_binary_exp(-g) + g;
    assert!(big_bitlen(b) + t == qbits);
    if t >= 0 {
        big_as_u128(b) << t
    } else {
        top_bits_ceil(b, qbits)
    }
}

const fn split64(u: u128) -> Multiplier<u64> {
    Multiplier { hi: (u >> 64) as u64, lo: u as u64 }
}

const fn split32(u: u128) -> Multiplier<u32> {
    assert!(u >> 64 == 0);
    Multiplier { hi: (u >> 32) as u32, lo: u as u32 }
}

pub mod b64 {
    use super::*;

    /// Decimal exponent range of finite nonzero `f64`s:
    /// `floor(log10(2^e))` for `e` in `[-1074, 971]`.
    pub const OFFSET: Exp = -324;
    pub const LEN: usize = 617;

    pub static MULTIPLIERS: Multipliers<u64, LEN> = Multipliers::new(OFFSET, build());

    const fn build() -> [Multiplier<u64>; LEN] {
        let mut t = [Multiplier { hi: 0, lo: 0 }; LEN];
        t[(-OFFSET) as usize] = Multiplier { hi: 1 << 63, lo: 0 };
        let mut d = big_from(1);
        let mut f = 1;
        while f < OFFSET + LEN as Exp {
            d = big_mul5(d);
            t[(f - OFFSET) as usize] = split64(entry_pos(&d, f, 128));
            f += 1;
        }
        let mut b = big_from(1);
        let mut g = 1;
        while g <= -OFFSET {
            b = big_mul5(b);
            t[(-g - OFFSET) as usize] = split64(entry_neg(&b, g, 128));
            g += 1;
        }
        t
    }

    /// `5^26` is the largest power of five below the mantissa range.
    pub static MULT_INVERSES: MultInverses<u64, 27> = MultInverses::new(build_inverses());

    const fn build_inverses() -> [MultInverse<u64>; 27] {
        const INV5: u64 = 0xCCCC_CCCC_CCCC_CCCD;
        let mut t = [MultInverse { multiplier: 0, bound: 0 }; 27];
        let mut m: u64 = 1;
        let mut pow5: u64 = 1;
        let mut j = 0;
        while j < 27 {
            t[j] = MultInverse { multiplier: m, bound: u64::MAX / pow5 };
            m = m.wrapping_mul(INV5);
            pow5 *= 5;
            j += 1;
        }
        t
    }
}

pub mod b32 {
    use super::*;

    /// `floor(log10(2^e))` for `e` in `[-149, 104]`.
    pub const OFFSET: Exp = -45;
    pub const LEN: usize = 77;

    pub static MULTIPLIERS: Multipliers<u32, LEN> = Multipliers::new(OFFSET, build());

    const fn build() -> [Multiplier<u32>; LEN] {
        let mut t = [Multiplier { hi: 0, lo: 0 }; LEN];
        t[(-OFFSET) as usize] = Multiplier { hi: 1 << 31, lo: 0 };
        let mut d = big_from(1);
        let mut f = 1;
        while f < OFFSET + LEN as Exp {
            d = big_mul5(d);
            t[(f - OFFSET) as usize] = split32(entry_pos(&d, f, 64));
            f += 1;
        }
        let mut b = big_from(1);
        let mut g = 1;
        while g <= -OFFSET {
            b = big_mul5(b);
            t[(-g - OFFSET) as usize] = split32(entry_neg(&b, g, 64));
            g += 1;
        }
        t
    }

    /// `5^12` is the largest power of five below the mantissa range.
    pub static MULT_INVERSES: MultInverses<u32, 13> = MultInverses::new(build_inverses());

    const fn build_inverses() -> [MultInverse<u32>; 13] {
        const INV5: u32 = 0xCCCC_CCCD;
        let mut t = [MultInverse { multiplier: 0, bound: 0 }; 13];
        let mut m: u32 = 1;
        let mut pow5: u32 = 1;
        let mut j = 0;
        while j < 13 {
            t[j] = MultInverse { multiplier: m, bound: u32::MAX / pow5 };
            m = m.wrapping_mul(INV5);
            pow5 *= 5;
            j += 1;
        }
        t
    }
}
