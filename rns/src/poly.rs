/// A polynomial modulo a single prime, stored as its n coefficients
/// (or its n evaluations in the NTT domain).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly<O>(pub Vec<O>);

impl<O> Poly<O>
where
    O: Default + Clone + Copy,
{
    pub fn new(n: usize) -> Self {
        Self(vec![O::default(); n])
    }

    pub fn n(&self) -> usize {
        self.0.len()
    }

    pub fn log_n(&self) -> usize {
        (usize::BITS - (self.n() - 1).leading_zeros()) as usize
    }

    pub fn resize(&mut self, n: usize) {
        self.0.resize(n, O::default());
    }

    pub fn set_all(&mut self, v: &O) {
        self.0.fill(*v)
    }

    pub fn zero(&mut self) {
        self.set_all(&O::default())
    }

    pub fn copy_from(&mut self, other: &Poly<O>) {
        self.resize(other.n());
        self.0.copy_from_slice(&other.0)
    }
}

/// A polynomial in RNS representation: one [Poly] per limb of the basis.
/// A PolyRNS at level l holds exactly l+1 limbs of the same degree.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PolyRNS<O> {
    pub polys: Vec<Poly<O>>,
    /// limbs hold NTT evaluations
    pub is_ntt: bool,
    /// limbs are scaled by 2^64
    pub is_montgomery: bool,
}

impl<O> PolyRNS<O>
where
    O: Default + Clone + Copy,
{
    pub fn new(n: usize, level: usize) -> Self {
        Self {
            polys: (0..level + 1).map(|_| Poly::new(n)).collect(),
            is_ntt: false,
            is_montgomery: false,
        }
    }

    pub fn n(&self) -> usize {
        self.polys[0].n()
    }

    pub fn log_n(&self) -> usize {
        self.polys[0].log_n()
    }

    pub fn level(&self) -> usize {
        self.polys.len() - 1
    }

    /// Sets the number of limbs to level+1, zero-filling new limbs.
    pub fn resize(&mut self, level: usize) {
        let n: usize = self.n();
        self.polys.resize(level + 1, Poly::new(n));
    }

    /// Drops the limbs above level.
    pub fn truncate(&mut self, level: usize) {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        self.polys.truncate(level + 1);
    }

    pub fn split_at_mut(&mut self, level: usize) -> (&mut [Poly<O>], &mut [Poly<O>]) {
        self.polys.split_at_mut(level)
    }

    pub fn at(&self, level: usize) -> &Poly<O> {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        &self.polys[level]
    }

    pub fn at_mut(&mut self, level: usize) -> &mut Poly<O> {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        &mut self.polys[level]
    }

    pub fn set_all(&mut self, v: &O) {
        self.polys.iter_mut().for_each(|p| p.set_all(v))
    }

    pub fn zero(&mut self) {
        self.set_all(&O::default())
    }

    /// Copies other into self, including its level and flags.
    pub fn copy(&mut self, other: &PolyRNS<O>) {
        self.polys.resize(other.polys.len(), Poly::new(other.n()));
        self.copy_level(other.level(), other);
    }

    /// Copies the first level+1 limbs and the flags of other into self.
    pub fn copy_level(&mut self, level: usize, other: &PolyRNS<O>) {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        assert!(
            level <= other.level(),
            "invalid argument level: level={} > other.level()={}",
            level,
            other.level()
        );
        (0..level + 1).for_each(|i| self.polys[i].copy_from(&other.polys[i]));
        self.is_ntt = other.is_ntt;
        self.is_montgomery = other.is_montgomery;
    }
}
