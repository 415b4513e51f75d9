use crate::parameters::Parameters;
use rns::poly::PolyRNS;
use rns::serialization::{ReaderFrom, WriterTo};
use byteorder::{ReadBytesExt, WriteBytesExt};
use std::io::{Error, ErrorKind, Read, Write};

/// Common capabilities of the objects that schemes operate on.
pub trait Element {
    /// Number of polynomials minus one.
    fn degree(&self) -> usize;

    fn value(&self) -> &[PolyRNS<u64>];

    fn value_mut(&mut self) -> &mut [PolyRNS<u64>];

    fn level(&self) -> usize {
        self.value()[0].level()
    }

    fn n(&self) -> usize {
        self.value()[0].n()
    }

    fn is_ntt(&self) -> bool {
        self.value()[0].is_ntt
    }

    fn at(&self, i: usize) -> &PolyRNS<u64> {
        assert!(
            i <= self.degree(),
            "invalid argument i: i={} > self.degree()={}",
            i,
            self.degree()
        );
        &self.value()[i]
    }

    fn at_mut(&mut self, i: usize) -> &mut PolyRNS<u64> {
        assert!(
            i <= self.degree(),
            "invalid argument i: i={} > self.degree()={}",
            i,
            self.degree()
        );
        &mut self.value_mut()[i]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Plaintext {
    pub value: PolyRNS<u64>,
}

/// An RLWE ciphertext (c_0, ..., c_d), whose phase is sum_i c_i * s^i.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Ciphertext {
    pub value: Vec<PolyRNS<u64>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Plaintext(Plaintext),
    Ciphertext(Ciphertext),
}

impl Element for Plaintext {
    fn degree(&self) -> usize {
        0
    }

    fn value(&self) -> &[PolyRNS<u64>] {
        std::slice::from_ref(&self.value)
    }

    fn value_mut(&mut self) -> &mut [PolyRNS<u64>] {
        std::slice::from_mut(&mut self.value)
    }
}

impl Element for Ciphertext {
    fn degree(&self) -> usize {
        self.value.len() - 1
    }

    fn value(&self) -> &[PolyRNS<u64>] {
        &self.value
    }

    fn value_mut(&mut self) -> &mut [PolyRNS<u64>] {
        &mut self.value
    }
}

impl Element for Operand {
    fn degree(&self) -> usize {
        match self {
            Operand::Plaintext(pt) => pt.degree(),
            Operand::Ciphertext(ct) => ct.degree(),
        }
    }

    fn value(&self) -> &[PolyRNS<u64>] {
        match self {
            Operand::Plaintext(pt) => pt.value(),
            Operand::Ciphertext(ct) => ct.value(),
        }
    }

    fn value_mut(&mut self) -> &mut [PolyRNS<u64>] {
        match self {
            Operand::Plaintext(pt) => pt.value_mut(),
            Operand::Ciphertext(ct) => ct.value_mut(),
        }
    }
}

impl From<Plaintext> for Operand {
    fn from(pt: Plaintext) -> Self {
        Operand::Plaintext(pt)
    }
}

impl From<Ciphertext> for Operand {
    fn from(ct: Ciphertext) -> Self {
        Operand::Ciphertext(ct)
    }
}

impl Ciphertext {
    /// Sets the domain flag of every polynomial.
    pub fn set_ntt(&mut self, is_ntt: bool) {
        self.value.iter_mut().for_each(|p| p.is_ntt = is_ntt);
    }
}

impl Parameters {
    pub fn new_plaintext(&self, level: usize) -> Plaintext {
        Plaintext {
            value: PolyRNS::new(self.n(), level),
        }
    }

    pub fn new_ciphertext(&self, degree: usize, level: usize) -> Ciphertext {
        Ciphertext {
            value: (0..degree + 1)
                .map(|_| PolyRNS::new(self.n(), level))
                .collect(),
        }
    }
}

impl WriterTo for Plaintext {
    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.value.write_to(writer)
    }
}

impl ReaderFrom for Plaintext {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> std::io::Result<()> {
        self.value.read_from(reader)
    }
}

/// Layout: degree+1 (u8), then each polynomial.
impl WriterTo for Ciphertext {
    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let polys: usize = self.value.len();
        if polys == 0 || polys > u8::MAX as usize {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("invalid ciphertext: {} polynomials", polys),
            ));
        }
        writer.write_u8(polys as u8)?;
        self.value.iter().try_for_each(|p| p.write_to(writer))
    }
}

impl ReaderFrom for Ciphertext {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> std::io::Result<()> {
        let polys: usize = reader.read_u8()? as usize;
        if polys == 0 {
            return Err(Error::new(ErrorKind::InvalidData, "ciphertext of degree -1"));
        }
        let mut value: Vec<PolyRNS<u64>> = vec![PolyRNS::default(); polys];
        value.iter_mut().try_for_each(|p| p.read_from(reader))?;
        if value.iter().any(|p| p.n() != value[0].n() || p.level() != value[0].level()) {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "ciphertext polynomials differ in degree or level",
            ));
        }
        self.value = value;
        Ok(())
    }
}
