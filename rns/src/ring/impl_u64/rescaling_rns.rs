use crate::modulus::barrett::Barrett;
use crate::modulus::{BARRETT, ONCE};
use crate::poly::{Poly, PolyRNS};
use crate::ring::RingRNS;
use num_bigint::BigInt;

impl RingRNS<u64> {
    /// Updates b to floor(a / q[self.level()]) (or round if ROUND is set),
    /// at level self.level()-1.
    /// If NTT is set, a is expected in the NTT domain and b is returned in the NTT domain.
    pub fn div_by_last_modulus<const ROUND: bool, const NTT: bool>(
        &self,
        a: &PolyRNS<u64>,
        buf: &mut [Poly<u64>; 2],
        b: &mut PolyRNS<u64>,
    ) {
        let level = self.level();
        assert!(level > 0, "invalid call: cannot divide a single-limb polynomial");
        assert!(
            a.level() >= level,
            "invalid input a: a.level()={} < self.level()={}",
            a.level(),
            level
        );
        assert!(
            b.level() >= level - 1,
            "invalid input b: b.level()={} < self.level()-1={}",
            b.level(),
            level - 1
        );

        let rescaling_constants: Vec<Barrett<u64>> = self.rescaling_constant();
        let (buf_q_scaling, buf_qi_scaling) = buf.split_at_mut(1);

        let half: u64 = self.last_modulus_to_coeffs_domain::<ROUND, NTT>(a.at(level), &mut buf_q_scaling[0]);

        for (i, r) in self.0[0..level].iter().enumerate() {
            self.last_modulus_to_qi::<ROUND, NTT>(i, half, &buf_q_scaling[0], &mut buf_qi_scaling[0]);
            r.a_sub_b_mul_c_scalar_barrett::<2, ONCE>(
                a.at(i),
                &buf_qi_scaling[0],
                &rescaling_constants[i],
                b.at_mut(i),
            );
        }

        b.truncate(level - 1);
        b.is_ntt = NTT;
        b.is_montgomery = false;
    }

    /// Updates a to floor(a / q[self.level()]) (or round if ROUND is set),
    /// dropping its last limb.
    /// If NTT is set, a is expected in the NTT domain.
    pub fn div_by_last_modulus_inplace<const ROUND: bool, const NTT: bool>(
        &self,
        buf: &mut [Poly<u64>; 2],
        a: &mut PolyRNS<u64>,
    ) {
        let level = self.level();
        assert!(level > 0, "invalid call: cannot divide a single-limb polynomial");
        assert!(
            a.level() >= level,
            "invalid input a: a.level()={} < self.level()={}",
            a.level(),
            level
        );

        let rescaling_constants: Vec<Barrett<u64>> = self.rescaling_constant();
        let (buf_q_scaling, buf_qi_scaling) = buf.split_at_mut(1);

        let half: u64 = self.last_modulus_to_coeffs_domain::<ROUND, NTT>(a.at(level), &mut buf_q_scaling[0]);

        for (i, r) in self.0[0..level].iter().enumerate() {
            self.last_modulus_to_qi::<ROUND, NTT>(i, half, &buf_q_scaling[0], &mut buf_qi_scaling[0]);
            r.a_sub_b_mul_c_scalar_barrett_inplace::<2, ONCE>(
                &buf_qi_scaling[0],
                &rescaling_constants[i],
                a.at_mut(i),
            );
        }

        a.truncate(level - 1);
    }

    /// Writes the last limb of a, in the coefficient domain and shifted by
    /// floor(q_last/2) if ROUND is set, into buf. Returns the shift.
    fn last_modulus_to_coeffs_domain<const ROUND: bool, const NTT: bool>(
        &self,
        a_last: &Poly<u64>,
        buf: &mut Poly<u64>,
    ) -> u64 {
        let r_last = &self.0[self.level()];
        if NTT {
            r_last.intt::<false>(a_last, buf);
        } else {
            buf.copy_from(a_last);
        }
        if ROUND {
            let half: u64 = r_last.modulus.q >> 1;
            r_last.add_scalar_inplace::<ONCE>(&half, buf);
            half
        } else {
            0
        }
    }

    /// Writes [buf_last]_{q_i} - [half]_{q_i} into buf_qi,
    /// lazily transformed to the NTT domain if NTT is set.
    fn last_modulus_to_qi<const ROUND: bool, const NTT: bool>(
        &self,
        i: usize,
        half: u64,
        buf_last: &Poly<u64>,
        buf_qi: &mut Poly<u64>,
    ) {
        let r = &self.0[i];
        r.reduce::<BARRETT>(buf_last, buf_qi);
        if ROUND {
            let half_qi: u64 = r.modulus.barrett.reduce::<BARRETT>(&half);
            r.add_scalar_inplace::<ONCE>(&(r.modulus.q - half_qi), buf_qi);
        }
        if NTT {
            r.ntt_inplace::<true>(buf_qi);
        }
    }

    /// Updates c to floor(a / prod_{j<nb_moduli} q[self.level()-j]) (or round if ROUND is set),
    /// at level self.level()-nb_moduli.
    /// If NTT is set, a is expected in the NTT domain and c is returned in the NTT domain.
    pub fn div_by_last_moduli<const ROUND: bool, const NTT: bool>(
        &self,
        nb_moduli: usize,
        a: &PolyRNS<u64>,
        buf0: &mut [Poly<u64>; 2],
        buf1: &mut PolyRNS<u64>,
        c: &mut PolyRNS<u64>,
    ) {
        assert!(
            nb_moduli <= self.level(),
            "invalid input nb_moduli: nb_moduli={} > self.level()={}",
            nb_moduli,
            self.level()
        );
        assert!(
            a.level() >= self.level(),
            "invalid input a: a.level()={} < self.level()={}",
            a.level(),
            self.level()
        );

        if nb_moduli == 0 {
            c.copy(a);
            c.truncate(self.level());
            return;
        }

        buf1.copy(a);
        buf1.truncate(self.level());
        self.div_by_last_moduli_inplace::<ROUND, NTT>(nb_moduli, buf0, buf1);
        c.copy(buf1);
    }

    /// Updates a to floor(a / prod_{j<nb_moduli} q[self.level()-j]) (or round if ROUND is set),
    /// dropping its last nb_moduli limbs.
    /// If NTT is set, a is expected in the NTT domain.
    pub fn div_by_last_moduli_inplace<const ROUND: bool, const NTT: bool>(
        &self,
        nb_moduli: usize,
        buf: &mut [Poly<u64>; 2],
        a: &mut PolyRNS<u64>,
    ) {
        let level: usize = self.level();
        assert!(
            nb_moduli <= level,
            "invalid input nb_moduli: nb_moduli={} > self.level()={}",
            nb_moduli,
            level
        );
        assert!(
            a.level() >= level,
            "invalid input a: a.level()={} < self.level()={}",
            a.level(),
            level
        );

        if nb_moduli == 0 {
            return;
        }

        if nb_moduli == 1 {
            self.div_by_last_modulus_inplace::<ROUND, NTT>(buf, a);
            return;
        }

        a.truncate(level);

        if NTT {
            self.intt_inplace::<false>(a);
        }

        // round(a/P) = floor((a + floor(P/2))/P) for odd P
        if ROUND {
            let mut p_big: BigInt = BigInt::from(1);
            (0..nb_moduli).for_each(|j| p_big *= BigInt::from(self.0[level - j].modulus.q));
            let half: BigInt = p_big >> 1;
            self.0.iter().enumerate().for_each(|(i, r)| {
                let q_big: BigInt = BigInt::from(r.modulus.q);
                let (_, digits) = (&half % &q_big).to_u64_digits();
                r.add_scalar_inplace::<ONCE>(&digits.first().copied().unwrap_or(0), a.at_mut(i));
            });
        }

        (0..nb_moduli).for_each(|j| {
            self.at_level_unchecked(level - j)
                .div_by_last_modulus_inplace::<false, false>(buf, a)
        });

        if NTT {
            self.at_level_unchecked(level - nb_moduli).ntt_inplace::<false>(a);
        }
    }

    /// Updates b to floor(a / q[self.level()]), at level self.level()-1.
    pub fn div_floor_by_last_modulus<const NTT: bool>(
        &self,
        a: &PolyRNS<u64>,
        buf: &mut [Poly<u64>; 2],
        b: &mut PolyRNS<u64>,
    ) {
        self.div_by_last_modulus::<false, NTT>(a, buf, b)
    }

    /// Updates b to round(a / q[self.level()]), at level self.level()-1.
    pub fn div_round_by_last_modulus<const NTT: bool>(
        &self,
        a: &PolyRNS<u64>,
        buf: &mut [Poly<u64>; 2],
        b: &mut PolyRNS<u64>,
    ) {
        self.div_by_last_modulus::<true, NTT>(a, buf, b)
    }

    /// Updates c to floor(a / prod of the last nb_moduli moduli).
    pub fn div_floor_by_last_moduli<const NTT: bool>(
        &self,
        nb_moduli: usize,
        a: &PolyRNS<u64>,
        buf0: &mut [Poly<u64>; 2],
        buf1: &mut PolyRNS<u64>,
        c: &mut PolyRNS<u64>,
    ) {
        self.div_by_last_moduli::<false, NTT>(nb_moduli, a, buf0, buf1, c)
    }

    /// Updates c to round(a / prod of the last nb_moduli moduli).
    pub fn div_round_by_last_moduli<const NTT: bool>(
        &self,
        nb_moduli: usize,
        a: &PolyRNS<u64>,
        buf0: &mut [Poly<u64>; 2],
        buf1: &mut PolyRNS<u64>,
        c: &mut PolyRNS<u64>,
    ) {
        self.div_by_last_moduli::<true, NTT>(nb_moduli, a, buf0, buf1, c)
    }
}
