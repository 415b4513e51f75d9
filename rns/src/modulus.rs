pub mod barrett;
pub mod impl_u64;
pub mod montgomery;
pub mod prime;
pub mod prime_generator;

pub type REDUCEMOD = u8;

pub const NONE: REDUCEMOD = 0;
pub const ONCE: REDUCEMOD = 1;
pub const TWICE: REDUCEMOD = 2;
pub const FOURTIMES: REDUCEMOD = 3;
pub const BARRETT: REDUCEMOD = 4;
pub const BARRETTLAZY: REDUCEMOD = 5;

/// Largest supported bit size of a prime, so that 4q fits in a u64.
pub const MAX_MODULUS_BITS: u32 = 61;

pub trait WordOps<O> {
    fn log2(self) -> usize;
    fn reverse_bits_msb(self, n: u32) -> O;
    fn mask(self) -> O;
}

impl WordOps<u64> for u64 {
    #[inline(always)]
    fn log2(self) -> usize {
        (u64::BITS - (self - 1).leading_zeros()) as _
    }
    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> u64 {
        self.reverse_bits() >> (u64::BITS - n)
    }
    #[inline(always)]
    fn mask(self) -> u64 {
        if self.log2() == 64 {
            return u64::MAX;
        }
        (1 << self.log2()) - 1
    }
}

impl WordOps<usize> for usize {
    #[inline(always)]
    fn log2(self) -> usize {
        (usize::BITS - (self - 1).leading_zeros()) as _
    }
    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> usize {
        if n == 0 {
            return 0;
        }
        self.reverse_bits() >> (usize::BITS - n)
    }
    #[inline(always)]
    fn mask(self) -> usize {
        (1 << self.log2()) - 1
    }
}

pub trait ReduceOnce<O> {
    /// Assigns self-q to self if self >= q in constant time.
    /// User must ensure that 2q fits in O.
    fn reduce_once_constant_time_assign(&mut self, q: O);
    /// Returns self-q if self >= q else self in constant time.
    fn reduce_once_constant_time(&self, q: O) -> O;
    /// Assigns self-q to self if self >= q.
    fn reduce_once_assign(&mut self, q: O);
    /// Returns self-q if self >= q else self.
    fn reduce_once(&self, q: O) -> O;
}

pub trait ScalarOperations<O> {
    // Applies a parameterized modular reduction.
    fn sa_reduce_into_sa<const REDUCE: REDUCEMOD>(&self, a: &mut O);

    // Assigns a reduced to b.
    fn sa_reduce_into_sb<const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut O);

    // Assigns a + b to c.
    fn sa_add_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &O, b: &O, c: &mut O);

    // Assigns a + b to b.
    fn sa_add_sb_into_sb<const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut O);

    // Assigns a + SBRANGE * q - b to c.
    fn sa_sub_sb_into_sc<const SBRANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &O, b: &O, c: &mut O);

    // Assigns a + SBRANGE * q - b to b.
    fn sa_sub_sb_into_sb<const SBRANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut O);

    // Assigns a + SBRANGE * q - b to a.
    fn sa_sub_sb_into_sa<const SBRANGE: u8, const REDUCE: REDUCEMOD>(&self, b: &O, a: &mut O);

    // Assigns SARANGE * q - a to a.
    fn sa_neg_into_sa<const SARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &mut O);

    // Assigns SARANGE * q - a to b.
    fn sa_neg_into_sb<const SARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut O);

    // Assigns a * 2^64 to a.
    fn sa_prepare_montgomery_into_sa<const REDUCE: REDUCEMOD>(&self, a: &mut montgomery::Montgomery<O>);

    // Assigns a * 2^64 to b.
    fn sa_prepare_montgomery_into_sb<const REDUCE: REDUCEMOD>(
        &self,
        a: &O,
        b: &mut montgomery::Montgomery<O>,
    );

    // Assigns a * 2^-64 to a.
    fn sa_unprepare_montgomery_into_sa<const REDUCE: REDUCEMOD>(&self, a: &mut montgomery::Montgomery<O>);

    // Assigns a * b to c.
    fn sa_mul_sb_montgomery_into_sc<const REDUCE: REDUCEMOD>(
        &self,
        a: &montgomery::Montgomery<O>,
        b: &O,
        c: &mut O,
    );

    // Assigns a * b + c to c.
    fn sa_mul_sb_montgomery_add_sc_into_sc<const REDUCE1: REDUCEMOD, const REDUCE2: REDUCEMOD>(
        &self,
        a: &montgomery::Montgomery<O>,
        b: &O,
        c: &mut O,
    );

    // Assigns a * b to a.
    fn sa_mul_sb_montgomery_into_sa<const REDUCE: REDUCEMOD>(
        &self,
        b: &montgomery::Montgomery<O>,
        a: &mut O,
    );

    // Assigns a * b to c.
    fn sa_mul_sb_barrett_into_sc<const REDUCE: REDUCEMOD>(
        &self,
        a: &O,
        b: &barrett::Barrett<O>,
        c: &mut O,
    );

    // Assigns a * b to a.
    fn sa_mul_sb_barrett_into_sa<const REDUCE: REDUCEMOD>(&self, b: &barrett::Barrett<O>, a: &mut O);

    // Assigns (a + SBRANGE * q - b) * c to d.
    fn sa_sub_sb_mul_sc_barrett_into_sd<const SBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &O,
        b: &O,
        c: &barrett::Barrett<O>,
        d: &mut O,
    );

    // Assigns (a + SBRANGE * q - b) * c to a.
    fn sa_sub_sb_mul_sc_barrett_into_sa<const SBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        b: &O,
        c: &barrett::Barrett<O>,
        a: &mut O,
    );
}

pub trait VectorOperations<O> {
    // vec(a) <- reduce(vec(a)).
    fn va_reduce_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &mut [O]);

    // vec(b) <- reduce(vec(a)).
    fn va_reduce_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &[O], b: &mut [O]);

    // vec(c) <- vec(a) + vec(b).
    fn va_add_vb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &[O],
        c: &mut [O],
    );

    // vec(b) <- vec(a) + vec(b).
    fn va_add_vb_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &[O], b: &mut [O]);

    // vec(c) <- vec(a) + scalar(b).
    fn va_add_sb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &O,
        c: &mut [O],
    );

    // vec(a) <- vec(a) + scalar(b).
    fn va_add_sb_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, b: &O, a: &mut [O]);

    // vec(c) <- vec(a) - vec(b).
    fn va_sub_vb_into_vc<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &[O],
        c: &mut [O],
    );

    // vec(b) <- vec(a) - vec(b).
    fn va_sub_vb_into_vb<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &mut [O],
    );

    // vec(a) <- vec(a) - vec(b).
    fn va_sub_vb_into_va<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        b: &[O],
        a: &mut [O],
    );

    // vec(a) <- -vec(a).
    fn va_neg_into_va<const CHUNK: usize, const VARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &mut [O]);

    // vec(b) <- -vec(a).
    fn va_neg_into_vb<const CHUNK: usize, const VARANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &mut [O],
    );

    // vec(a) <- vec(a) * 2^64.
    fn va_prepare_montgomery_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &mut [montgomery::Montgomery<O>],
    );

    // vec(b) <- vec(a) * 2^64.
    fn va_prepare_montgomery_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &mut [montgomery::Montgomery<O>],
    );

    // vec(a) <- vec(a) * 2^-64.
    fn va_unprepare_montgomery_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &mut [montgomery::Montgomery<O>],
    );

    // vec(c) <- vec(a) * vec(b).
    fn va_mul_vb_montgomery_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[montgomery::Montgomery<O>],
        b: &[O],
        c: &mut [O],
    );

    // vec(c) <- vec(a) * vec(b) + vec(c).
    fn va_mul_vb_montgomery_add_vc_into_vc<
        const CHUNK: usize,
        const REDUCE1: REDUCEMOD,
        const REDUCE2: REDUCEMOD,
    >(
        &self,
        a: &[montgomery::Montgomery<O>],
        b: &[O],
        c: &mut [O],
    );

    // vec(a) <- vec(a) * vec(b).
    fn va_mul_vb_montgomery_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        b: &[montgomery::Montgomery<O>],
        a: &mut [O],
    );

    // vec(a) <- vec(a) * scalar(b).
    fn va_mul_sb_barrett_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        b: &barrett::Barrett<O>,
        a: &mut [O],
    );

    // vec(c) <- vec(a) * scalar(b).
    fn va_mul_sb_barrett_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &barrett::Barrett<O>,
        c: &mut [O],
    );

    // vec(d) <- (vec(a) + VBRANGE * q - vec(b)) * scalar(c).
    fn va_sub_vb_mul_sc_barrett_into_vd<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &[O],
        c: &barrett::Barrett<O>,
        d: &mut [O],
    );

    // vec(a) <- (vec(a) + VBRANGE * q - vec(b)) * scalar(c).
    fn va_sub_vb_mul_sc_barrett_into_va<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        b: &[O],
        c: &barrett::Barrett<O>,
        a: &mut [O],
    );
}
