//! The shortest round-trip decimal engine, instantiated per float width.
//!
//! For a finite nonzero value `mant * 2^exp` the engine scales the rounding
//! interval of the value into the decimal window `10^floor(log10(2^exp))`
//! with one two-word multiply against a cached upper approximation of the
//! scaled power of ten, then picks the shortest decimal inside the interval,
//! breaking ties to even.

use crate::common::Exp;

macro_rules! mk_impl {
    (
        $mod:ident,
        float: $float:ty,
        mant: $t:ty,
        wide: $w:ty,
        mantissa_bits: $mbits:expr,
        lut: $lut:ident,
        hex_nibbles: $nibbles:expr,
        hex_shift: $hshift:expr
    ) => {
        pub(crate) mod $mod {
            use crate::common::{self, Exp, Multiplier};
            use crate::float::{Class, HexParts, Kind};
            use crate::lut::$lut as lut;

            /// The mantissa is an unsigned integer of the same width as the
            /// float.
            pub type Mant = $t;

            /// The **absolute value** of a finite float decoded into binary
            /// exponent and mantissa.
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct Binary {
                pub exp: Exp,
                pub mant: Mant,
            }

            /// A decimal representation `mant * 10^exp` of the **absolute
            /// value** of a finite float.
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct Decimal {
                pub exp: Exp,
                pub mant: Mant,
            }

            /// `a * mult / 2^(2N)` without overflow, where `N` is the bit
            /// width of `a`, `mult.hi` and `mult.lo`.
            #[inline]
            const fn multiword_multiply_shift(a: Mant, mult: &Multiplier<Mant>) -> Mant {
                let result_hi = mult.hi as $w * a as $w;
                let result_lo = mult.lo as $w * a as $w;
                ((result_hi + (result_lo >> Mant::BITS)) >> Mant::BITS) as Mant
            }

            /// `multiword_multiply_shift(2^k, mult)` for `k < N`; the low
            /// word cannot contribute to the shifted-out result there.
            #[inline]
            const fn multiword_multiply_shift_pow2(k: u32, mult: &Multiplier<Mant>) -> Mant {
                debug_assert!(k < Mant::BITS);
                mult.hi >> (Mant::BITS - k)
            }

            /// Returns the lowest `n` bits of `x`.
            #[inline]
            pub const fn lsb(x: Mant, n: u32) -> Mant {
                x % ((1 as Mant) << n)
            }

            /// An even mantissa wins the tiebreak against its neighbours
            /// under round-to-nearest, ties-to-even.
            #[inline]
            const fn is_even(n: Mant) -> bool {
                n % 2 == 0
            }

            impl Binary {
                /// Bits of mantissa precision, including the implicit `1.`.
                pub const BITS_MANTISSA: u32 = $mbits;

                /// Mantissa bits that are actually stored.
                pub const BITS_MANTISSA_EXPLICIT: u32 = Self::BITS_MANTISSA - 1;

                const EXP_FIELD_MASK: u32 =
                    (1 << (Mant::BITS - Self::BITS_MANTISSA)) - 1;

                /// The exponent bias, folded with the factor of
                /// `2^BITS_MANTISSA` from treating the mantissa as an
                /// integer.
                pub const MIN_EXP: Exp = <$float>::MIN_EXP - Self::BITS_MANTISSA as i32;

                /// 1 + the largest storable mantissa; the implicit-bit value
                /// of the power-of-two inputs.
                const MAX_MANT: Mant = 1 << Self::BITS_MANTISSA_EXPLICIT;

                /// Decomposes a **finite** float into the binary exponent and
                /// mantissa of its absolute value, `|num| = mant * 2^exp`.
                ///
                /// For infinities and NaN the result is unspecified; this is
                /// only checked by a debug assertion.
                #[inline]
                pub fn new(num: $float) -> Self {
                    debug_assert!(num.is_finite());

                    let bits = num.abs().to_bits();
                    let mut mant = lsb(bits, Self::BITS_MANTISSA_EXPLICIT);
                    let mut exp = (bits >> Self::BITS_MANTISSA_EXPLICIT) as Exp;

                    if exp != 0 {
                        exp -= 1;
                        mant |= 1 << Self::BITS_MANTISSA_EXPLICIT;
                    }

                    Binary { exp: exp + Self::MIN_EXP, mant }
                }

                /// Integer part of `log10(2^exp)`.
                #[inline]
                const fn exp_log10_pow2(&self) -> Exp {
                    common::exp_log10_pow2(self.exp)
                }

                /// `exp - e_0`, where `e_0` is the smallest exponent whose
                /// `log10(2^e_0)` has the same integer part.
                #[inline]
                const fn exp_log10_pow2_residual(&self) -> u32 {
                    common::exp_log10_pow2_residual(self.exp)
                }

                /// Whether `mant` is a multiple of `2^exp`. Requires
                /// `0 <= exp < Mant::BITS`.
                #[inline]
                const fn is_multiple_of_pow2(&self) -> bool {
                    lsb(self.mant, self.exp as u32) == 0
                }

                /// Whether `self` is in the range of contiguous integers the
                /// float type represents exactly.
                #[inline]
                const fn is_small_integer(&self) -> bool {
                    let neg_exp = -self.exp;
                    0 <= neg_exp
                        && neg_exp < Self::BITS_MANTISSA as Exp
                        && Binary { exp: neg_exp, ..*self }.is_multiple_of_pow2()
                }

                /// The shortest decimal representation of `self` if one
                /// exists in its rounding interval, or the nearest decimal
                /// (ties to even) if it must round.
                fn to_decimal_core(self) -> Decimal {
                    if self.mant == 0 {
                        return Decimal { exp: 0, mant: 0 };
                    }

                    let exp_floor = self.exp_log10_pow2();
                    let exp_residual = self.exp_log10_pow2_residual();
                    let mult = lut::MULTIPLIERS.get(exp_floor);

                    if self.mant != Self::MAX_MANT || self.exp == Self::MIN_EXP {
                        // Centered case: both neighbours are half a ULP away.
                        let mant_a = (2 * self.mant - 1) << exp_residual;
                        let mant_b = (2 * self.mant + 1) << exp_residual;
                        let a = multiword_multiply_shift(mant_a, mult);
                        let b = multiword_multiply_shift(mant_b, mult);
                        let decimal_a = Decimal { exp: exp_floor, mant: mant_a };
                        let decimal_b = Decimal { exp: exp_floor, mant: mant_b };

                        let q = b / 10;
                        let s = q * 10;
                        if a < s {
                            if s < b || is_even(self.mant) || !decimal_b.is_tie() {
                                return Decimal { exp: exp_floor + 1, mant: q }
                                    .remove_trailing_zeros();
                            }
                        } else if s == a && is_even(self.mant) && decimal_a.is_tie() {
                            return Decimal { exp: exp_floor + 1, mant: q }
                                .remove_trailing_zeros();
                        } else if !is_even(a + b) {
                            return Decimal { exp: exp_floor, mant: (a + b) / 2 + 1 };
                        }

                        // No shorter decimal fits: round the scaled value.
                        let mant_c = (4 * self.mant) << exp_residual;
                        let c2 = multiword_multiply_shift(mant_c, mult);
                        let c = c2 / 2;

                        let round_up = !(is_even(c2)
                            || (is_even(c) && Decimal { exp: -exp_floor, mant: c2 }.is_tie()));
                        Decimal { exp: exp_floor, mant: c + round_up as Mant }
                    } else {
                        // Uncentered case: power-of-two mantissa, the lower
                        // neighbour is half as far as the upper one.
                        let mant_a = (4 * Self::MAX_MANT - 1) << exp_residual;
                        let mant_b = (2 * Self::MAX_MANT + 1) << exp_residual;
                        let a = multiword_multiply_shift(mant_a, mult) / 2;
                        let b = multiword_multiply_shift(mant_b, mult);
                        let decimal_a = Decimal { exp: exp_floor, mant: mant_a };

                        if a < b {
                            let q = b / 10;
                            let s = q * 10;
                            if a < s {
                                // MAX_MANT is even, so a boundary hit always
                                // rounds towards the shorter decimal.
                                return Decimal { exp: exp_floor + 1, mant: q }
                                    .remove_trailing_zeros();
                            } else if s == a && decimal_a.is_tie_uncentered() {
                                return Decimal { exp: exp_floor + 1, mant: q }
                                    .remove_trailing_zeros();
                            } else if !is_even(a + b) {
                                return Decimal { exp: exp_floor, mant: (a + b) / 2 + 1 };
                            }

                            let log2_mant_c = Self::BITS_MANTISSA + exp_residual + 1;
                            let c2 = multiword_multiply_shift_pow2(log2_mant_c, mult);
                            let c = c2 / 2;

                            let round_up = (c == a && !decimal_a.is_tie_uncentered())
                                || !(is_even(c2)
                                    || (is_even(c)
                                        && Decimal { exp: -exp_floor, mant: c2 }.is_tie()));
                            Decimal { exp: exp_floor, mant: c + round_up as Mant }
                        } else if decimal_a.is_tie_uncentered() {
                            Decimal { exp: exp_floor, mant: a }.remove_trailing_zeros()
                        } else {
                            let mant_c = (40 * Self::MAX_MANT) << exp_residual;
                            let c2 = multiword_multiply_shift(mant_c, mult);
                            let c = c2 / 2;

                            let round_up = !(is_even(c2)
                                || (is_even(c)
                                    && Decimal { exp: -exp_floor, mant: c2 }.is_tie()));
                            Decimal { exp: exp_floor - 1, mant: c + round_up as Mant }
                        }
                    }
                }

                /// The shortest decimal, short-circuiting the exact small
                /// integers.
                pub fn to_decimal(self) -> Decimal {
                    if self.is_small_integer() {
                        debug_assert!(self.exp <= 0);
                        return Decimal { exp: 0, mant: self.mant >> (-self.exp as u32) }
                            .remove_trailing_zeros();
                    }
                    self.to_decimal_core()
                }
            }

            impl Decimal {
                #[inline]
                fn is_tie(&self) -> bool {
                    0 <= self.exp && self.is_multiple_of_pow5()
                }

                #[inline]
                fn is_tie_uncentered(&self) -> bool {
                    self.mant % 5 == 0 && 0 <= self.exp && self.is_multiple_of_pow5()
                }

                /// Whether `mant` is a multiple of `5^exp`. Exponents past
                /// the table are unreachable for any mantissa of this width.
                #[inline]
                fn is_multiple_of_pow5(&self) -> bool {
                    match lut::MULT_INVERSES.get(self.exp) {
                        Some(entry) => self.mant.wrapping_mul(entry.multiplier) <= entry.bound,
                        None => false,
                    }
                }

                /// Strips factors of ten from `mant`, bumping `exp` once per
                /// stripped digit.
                pub(crate) const fn remove_trailing_zeros(mut self) -> Self {
                    const M_INV5: Mant = Mant::MAX / 5 * 4 + 1;
                    const BOUND: Mant = Mant::MAX / 10 + 1;
                    loop {
                        let q = self.mant.wrapping_mul(M_INV5).rotate_right(1);
                        if q >= BOUND {
                            return self;
                        }
                        self.exp += 1;
                        self.mant = q;
                    }
                }
            }

            /// IEEE-754 class of `num`, with the sign split out.
            pub fn classify(num: $float) -> Class {
                let bits = num.to_bits();
                let negative = bits >> (Mant::BITS - 1) != 0;
                let exp_bits =
                    (bits >> Binary::BITS_MANTISSA_EXPLICIT) as u32 & Binary::EXP_FIELD_MASK;
                let mant = lsb(bits, Binary::BITS_MANTISSA_EXPLICIT);
                let kind = if exp_bits == Binary::EXP_FIELD_MASK {
                    if mant == 0 {
                        Kind::Inf
                    } else if mant >> (Binary::BITS_MANTISSA_EXPLICIT - 1) != 0 {
                        Kind::QuietNan
                    } else {
                        Kind::SignalingNan
                    }
                } else if exp_bits == 0 {
                    if mant == 0 {
                        Kind::Zero
                    } else {
                        Kind::Subnormal
                    }
                } else {
                    Kind::Normal
                };
                Class { negative, kind }
            }

            /// Raw mantissa nibbles and binary exponent for the hex format.
            /// `num` must be finite and nonzero.
            pub fn hex_parts(num: $float) -> HexParts {
                let bits = num.to_bits();
                let exp_bits =
                    (bits >> Binary::BITS_MANTISSA_EXPLICIT) as u32 & Binary::EXP_FIELD_MASK;
                let mantissa = (lsb(bits, Binary::BITS_MANTISSA_EXPLICIT) as u64) << $hshift;
                if exp_bits != 0 {
                    HexParts {
                        leading: 1,
                        mantissa,
                        nibbles: $nibbles,
                        exp: exp_bits as Exp - (<$float>::MAX_EXP - 1),
                    }
                } else {
                    HexParts {
                        leading: 0,
                        mantissa,
                        nibbles: $nibbles,
                        exp: <$float>::MIN_EXP - 1,
                    }
                }
            }
        }
    };
}

mk_impl! {
    b64,
    float: f64,
    mant: u64,
    wide: u128,
    mantissa_bits: 53,
    lut: b64,
    hex_nibbles: 13,
    hex_shift: 0
}

// The 23 explicit bits are shifted by one so they fill 6 whole nibbles.
mk_impl! {
    b32,
    float: f32,
    mant: u32,
    wide: u64,
    mantissa_bits: 24,
    lut: b32,
    hex_nibbles: 6,
    hex_shift: 1
}

/// Shortest decimal of a finite nonzero `f64`, widened to a common shape:
/// `(digits, k)` with `|num| = digits * 10^k` and no trailing zero digits.
#[inline]
pub fn shortest64(num: f64) -> (u64, Exp) {
    let d = b64::Binary::new(num).to_decimal();
    (d.mant, d.exp)
}

/// Shortest decimal of a finite nonzero `f32`.
#[inline]
pub fn shortest32(num: f32) -> (u64, Exp) {
    let d = b32::Binary::new(num).to_decimal();
    (d.mant as u64, d.exp)
}
