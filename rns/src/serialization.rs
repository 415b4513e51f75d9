use crate::poly::{Poly, PolyRNS};
use crate::MAX_LOG_N;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Error, ErrorKind, Read, Result, Write};

pub trait WriterTo {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()>;
}

pub trait ReaderFrom {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()>;
}

const FLAG_NTT: u8 = 1;
const FLAG_MONTGOMERY: u8 = 2;

/// Layout: flags (bit 0: NTT, bit 1: Montgomery), number of limbs (u8),
/// n (u64), then the n coefficients (u64) of each limb.
impl WriterTo for PolyRNS<u64> {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let limbs: usize = self.polys.len();
        if limbs > u8::MAX as usize {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("#limbs={} does not fit in a byte", limbs),
            ));
        }
        let mut flags: u8 = 0;
        if self.is_ntt {
            flags |= FLAG_NTT;
        }
        if self.is_montgomery {
            flags |= FLAG_MONTGOMERY;
        }
        writer.write_u8(flags)?;
        writer.write_u8(limbs as u8)?;
        writer.write_u64::<LittleEndian>(self.n() as u64)?;
        for poly in self.polys.iter() {
            for x in poly.0.iter() {
                writer.write_u64::<LittleEndian>(*x)?;
            }
        }
        Ok(())
    }
}

impl ReaderFrom for PolyRNS<u64> {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        let flags: u8 = reader.read_u8()?;
        if flags & !(FLAG_NTT | FLAG_MONTGOMERY) != 0 {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("invalid flags={:#04x}", flags),
            ));
        }
        let limbs: usize = reader.read_u8()? as usize;
        if limbs == 0 {
            return Err(Error::new(ErrorKind::InvalidData, "#limbs=0"));
        }
        let n: u64 = reader.read_u64::<LittleEndian>()?;
        let n: usize = usize::try_from(n).map_err(|_| {
            Error::new(ErrorKind::InvalidData, format!("invalid n={}", n))
        })?;
        if n == 0 || n & (n - 1) != 0 {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("invalid n={}: not a power of two", n),
            ));
        }
        if n > 1 << MAX_LOG_N {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("invalid n={}: > 2^{}", n, MAX_LOG_N),
            ));
        }
        let mut polys: Vec<Poly<u64>> = Vec::with_capacity(limbs);
        for _ in 0..limbs {
            let mut poly: Poly<u64> = Poly::new(n);
            reader.read_u64_into::<LittleEndian>(&mut poly.0)?;
            polys.push(poly);
        }
        self.polys = polys;
        self.is_ntt = flags & FLAG_NTT != 0;
        self.is_montgomery = flags & FLAG_MONTGOMERY != 0;
        Ok(())
    }
}
