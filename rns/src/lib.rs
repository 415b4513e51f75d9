pub mod automorphism;
pub mod basis_extension;
pub mod dft;
pub mod error;
pub mod modulus;
pub mod num_bigint;
pub mod poly;
pub mod ring;
pub mod scaling;
pub mod serialization;

pub use error::{check_level, Error, Result};

pub const CHUNK: usize = 8;

/// Largest supported log2 of the ring degree.
pub const MAX_LOG_N: usize = 20;

pub mod macros {

    /// Applies `$f(&$self, &mut a)` on every entry of `$a`, unrolled by 8.
    #[macro_export]
    macro_rules! apply_v {
        ($self:expr, $f:expr, $a:expr, $CHUNK:expr) => {
            match $CHUNK {
                8 => {
                    $a.chunks_exact_mut(8).for_each(|a| {
                        $f(&$self, &mut a[0]);
                        $f(&$self, &mut a[1]);
                        $f(&$self, &mut a[2]);
                        $f(&$self, &mut a[3]);
                        $f(&$self, &mut a[4]);
                        $f(&$self, &mut a[5]);
                        $f(&$self, &mut a[6]);
                        $f(&$self, &mut a[7]);
                    });

                    let n: usize = $a.len();
                    let m = n - (n & 7);
                    $a[m..].iter_mut().for_each(|a| {
                        $f(&$self, a);
                    });
                }
                _ => {
                    $a.iter_mut().for_each(|a| {
                        $f(&$self, a);
                    });
                }
            }
        };
    }

    /// Applies `$f(&$self, &a, &mut b)` entry-wise.
    #[macro_export]
    macro_rules! apply_vv {
        ($self:expr, $f:expr, $a:expr, $b:expr, $CHUNK:expr) => {
            let n: usize = $a.len();
            debug_assert!(
                $b.len() == n,
                "invalid argument b: b.len() = {} != a.len() = {}",
                $b.len(),
                n
            );
            debug_assert!(
                $CHUNK & ($CHUNK - 1) == 0,
                "invalid CHUNK const: not a power of two"
            );

            match $CHUNK {
                8 => {
                    itertools::izip!($a.chunks_exact(8), $b.chunks_exact_mut(8)).for_each(
                        |(a, b)| {
                            $f(&$self, &a[0], &mut b[0]);
                            $f(&$self, &a[1], &mut b[1]);
                            $f(&$self, &a[2], &mut b[2]);
                            $f(&$self, &a[3], &mut b[3]);
                            $f(&$self, &a[4], &mut b[4]);
                            $f(&$self, &a[5], &mut b[5]);
                            $f(&$self, &a[6], &mut b[6]);
                            $f(&$self, &a[7], &mut b[7]);
                        },
                    );

                    let m = n - (n & 7);
                    itertools::izip!($a[m..].iter(), $b[m..].iter_mut()).for_each(|(a, b)| {
                        $f(&$self, a, b);
                    });
                }
                _ => {
                    itertools::izip!($a.iter(), $b.iter_mut()).for_each(|(a, b)| {
                        $f(&$self, a, b);
                    });
                }
            }
        };
    }

    /// Applies `$f(&$self, &a, &b, &mut c)` entry-wise.
    #[macro_export]
    macro_rules! apply_vvv {
        ($self:expr, $f:expr, $a:expr, $b:expr, $c:expr, $CHUNK:expr) => {
            let n: usize = $a.len();
            debug_assert!(
                $b.len() == n,
                "invalid argument b: b.len() = {} != a.len() = {}",
                $b.len(),
                n
            );
            debug_assert!(
                $c.len() == n,
                "invalid argument c: c.len() = {} != a.len() = {}",
                $c.len(),
                n
            );

            match $CHUNK {
                8 => {
                    itertools::izip!(
                        $a.chunks_exact(8),
                        $b.chunks_exact(8),
                        $c.chunks_exact_mut(8)
                    )
                    .for_each(|(a, b, c)| {
                        $f(&$self, &a[0], &b[0], &mut c[0]);
                        $f(&$self, &a[1], &b[1], &mut c[1]);
                        $f(&$self, &a[2], &b[2], &mut c[2]);
                        $f(&$self, &a[3], &b[3], &mut c[3]);
                        $f(&$self, &a[4], &b[4], &mut c[4]);
                        $f(&$self, &a[5], &b[5], &mut c[5]);
                        $f(&$self, &a[6], &b[6], &mut c[6]);
                        $f(&$self, &a[7], &b[7], &mut c[7]);
                    });

                    let m = n - (n & 7);
                    itertools::izip!($a[m..].iter(), $b[m..].iter(), $c[m..].iter_mut())
                        .for_each(|(a, b, c)| {
                            $f(&$self, a, b, c);
                        });
                }
                _ => {
                    itertools::izip!($a.iter(), $b.iter(), $c.iter_mut()).for_each(|(a, b, c)| {
                        $f(&$self, a, b, c);
                    });
                }
            }
        };
    }

    /// Applies `$f(&$self, s, &mut a)` entry-wise with a scalar first argument.
    #[macro_export]
    macro_rules! apply_sv {
        ($self:expr, $f:expr, $s:expr, $a:expr, $CHUNK:expr) => {
            match $CHUNK {
                8 => {
                    $a.chunks_exact_mut(8).for_each(|a| {
                        $f(&$self, $s, &mut a[0]);
                        $f(&$self, $s, &mut a[1]);
                        $f(&$self, $s, &mut a[2]);
                        $f(&$self, $s, &mut a[3]);
                        $f(&$self, $s, &mut a[4]);
                        $f(&$self, $s, &mut a[5]);
                        $f(&$self, $s, &mut a[6]);
                        $f(&$self, $s, &mut a[7]);
                    });

                    let n: usize = $a.len();
                    let m = n - (n & 7);
                    $a[m..].iter_mut().for_each(|a| {
                        $f(&$self, $s, a);
                    });
                }
                _ => {
                    $a.iter_mut().for_each(|a| {
                        $f(&$self, $s, a);
                    });
                }
            }
        };
    }

    /// Applies `$f(&$self, &a, s, &mut b)` entry-wise.
    #[macro_export]
    macro_rules! apply_vsv {
        ($self:expr, $f:expr, $a:expr, $s:expr, $b:expr, $CHUNK:expr) => {
            let n: usize = $a.len();
            debug_assert!(
                $b.len() == n,
                "invalid argument b: b.len() = {} != a.len() = {}",
                $b.len(),
                n
            );

            match $CHUNK {
                8 => {
                    itertools::izip!($a.chunks_exact(8), $b.chunks_exact_mut(8)).for_each(
                        |(a, b)| {
                            $f(&$self, &a[0], $s, &mut b[0]);
                            $f(&$self, &a[1], $s, &mut b[1]);
                            $f(&$self, &a[2], $s, &mut b[2]);
                            $f(&$self, &a[3], $s, &mut b[3]);
                            $f(&$self, &a[4], $s, &mut b[4]);
                            $f(&$self, &a[5], $s, &mut b[5]);
                            $f(&$self, &a[6], $s, &mut b[6]);
                            $f(&$self, &a[7], $s, &mut b[7]);
                        },
                    );

                    let m = n - (n & 7);
                    itertools::izip!($a[m..].iter(), $b[m..].iter_mut()).for_each(|(a, b)| {
                        $f(&$self, a, $s, b);
                    });
                }
                _ => {
                    itertools::izip!($a.iter(), $b.iter_mut()).for_each(|(a, b)| {
                        $f(&$self, a, $s, b);
                    });
                }
            }
        };
    }

    /// Applies `$f(&$self, &a, &b, s, &mut c)` entry-wise.
    #[macro_export]
    macro_rules! apply_vvsv {
        ($self:expr, $f:expr, $a:expr, $b:expr, $s:expr, $c:expr, $CHUNK:expr) => {
            let n: usize = $a.len();
            debug_assert!(
                $b.len() == n,
                "invalid argument b: b.len() = {} != a.len() = {}",
                $b.len(),
                n
            );
            debug_assert!(
                $c.len() == n,
                "invalid argument c: c.len() = {} != a.len() = {}",
                $c.len(),
                n
            );

            match $CHUNK {
                8 => {
                    itertools::izip!(
                        $a.chunks_exact(8),
                        $b.chunks_exact(8),
                        $c.chunks_exact_mut(8)
                    )
                    .for_each(|(a, b, c)| {
                        $f(&$self, &a[0], &b[0], $s, &mut c[0]);
                        $f(&$self, &a[1], &b[1], $s, &mut c[1]);
                        $f(&$self, &a[2], &b[2], $s, &mut c[2]);
                        $f(&$self, &a[3], &b[3], $s, &mut c[3]);
                        $f(&$self, &a[4], &b[4], $s, &mut c[4]);
                        $f(&$self, &a[5], &b[5], $s, &mut c[5]);
                        $f(&$self, &a[6], &b[6], $s, &mut c[6]);
                        $f(&$self, &a[7], &b[7], $s, &mut c[7]);
                    });

                    let m = n - (n & 7);
                    itertools::izip!($a[m..].iter(), $b[m..].iter(), $c[m..].iter_mut())
                        .for_each(|(a, b, c)| {
                            $f(&$self, a, b, $s, c);
                        });
                }
                _ => {
                    itertools::izip!($a.iter(), $b.iter(), $c.iter_mut()).for_each(|(a, b, c)| {
                        $f(&$self, a, b, $s, c);
                    });
                }
            }
        };
    }
}
