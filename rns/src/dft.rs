pub mod ntt;

/// A negacyclic transform over one prime modulus.
///
/// Forward inputs must be in [0, 4q) and backward inputs in [0, 2q).
/// Lazy variants return values in [0, 2q), the others in [0, q).
pub trait DFT<O>: Send + Sync {
    fn forward_inplace(&self, x: &mut [O]);
    fn forward_inplace_lazy(&self, x: &mut [O]);
    fn backward_inplace(&self, x: &mut [O]);
    fn backward_inplace_lazy(&self, x: &mut [O]);
    /// Same as forward_inplace, multiplying by the twiddles in the Montgomery domain.
    fn forward_inplace_montgomery(&self, x: &mut [O]);
    /// Same as backward_inplace, multiplying by the twiddles in the Montgomery domain.
    fn backward_inplace_montgomery(&self, x: &mut [O]);
}
