pub mod barrett;
pub mod montgomery;
pub mod operations;
pub mod prime;

use crate::modulus::ReduceOnce;

impl ReduceOnce<u64> for u64 {
    #[inline(always)]
    fn reduce_once_constant_time_assign(&mut self, q: u64) {
        debug_assert!(q < 0x8000000000000000, "2q >= 2^64");
        *self -= (q.wrapping_sub(*self).wrapping_sub(1) >> 63) * q;
    }

    #[inline(always)]
    fn reduce_once_constant_time(&self, q: u64) -> u64 {
        debug_assert!(q < 0x8000000000000000, "2q >= 2^64");
        self - (q.wrapping_sub(*self).wrapping_sub(1) >> 63) * q
    }

    #[inline(always)]
    fn reduce_once_assign(&mut self, q: u64) {
        debug_assert!(q < 0x8000000000000000, "2q >= 2^64");
        *self = (*self).min(self.wrapping_sub(q))
    }

    #[inline(always)]
    fn reduce_once(&self, q: u64) -> u64 {
        debug_assert!(q < 0x8000000000000000, "2q >= 2^64");
        (*self).min(self.wrapping_sub(q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduce_once_variants_agree() {
        let q: u64 = 0x1fffffffffe00001;
        for x in [0, 1, q - 1, q, q + 1, 2 * q - 1] {
            let expected: u64 = if x >= q { x - q } else { x };
            assert_eq!(x.reduce_once(q), expected);
            assert_eq!(x.reduce_once_constant_time(q), expected);
            let mut y: u64 = x;
            y.reduce_once_constant_time_assign(q);
            assert_eq!(y, expected);
        }
    }
}
