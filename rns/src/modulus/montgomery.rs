use crate::modulus::barrett::BarrettPrecomp;

/// An element stored in the Montgomery domain, i.e. x * 2^64 mod q.
pub type Montgomery<O> = O;

/// Precomputations for Montgomery arithmetic modulo q with radix 2^64.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MontgomeryPrecomp<O> {
    pub q: O,
    pub two_q: O,
    pub four_q: O,
    pub barrett: BarrettPrecomp<O>,
    pub q_inv: O,
    pub one: Montgomery<O>,
    pub minus_one: Montgomery<O>,
}
