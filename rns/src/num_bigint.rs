use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};

/// Floor and round divisions of big integers.
pub trait Div {
    fn div_floor(&self, other: &Self) -> Self;
    /// Rounds half away from zero when the quotient is exactly halfway.
    fn div_round(&self, other: &Self) -> Self;
}

impl Div for BigInt {
    fn div_floor(&self, other: &Self) -> Self {
        Integer::div_floor(self, other)
    }

    fn div_round(&self, other: &Self) -> Self {
        let (quo, rem) = self.div_rem(other);
        let twice_rem: BigInt = rem << 1;
        if twice_rem.is_zero() || twice_rem.magnitude() < other.magnitude() {
            return quo;
        }
        if self.sign() == other.sign() {
            quo + BigInt::one()
        } else {
            quo - BigInt::one()
        }
    }
}
