use crate::error::{Error, Result};
use crate::poly_qp::PolyQP;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use fnv::FnvHashMap;
use rns::serialization::{ReaderFrom, WriterTo};
use std::io::{ErrorKind, Read, Write};

/// Secret s over QP, in NTT and Montgomery form.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SecretKey {
    pub value: PolyQP,
}

impl SecretKey {
    pub fn n(&self) -> usize {
        self.value.n()
    }
}

/// Encryption of zero (-a*s + e, a) over QP, in NTT and Montgomery form.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PublicKey {
    pub value: [PolyQP; 2],
}

impl PublicKey {
    pub fn n(&self) -> usize {
        self.value[0].n()
    }
}

/// Gadget ciphertext: row i is an encryption of w_i * s_in under s_out over QP,
/// with w_i = P * (Q/Q_i) * [(Q/Q_i)^-1]_{Q_i}.
/// Rows are stored in NTT and Montgomery form.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SwitchingKey {
    pub value: Vec<[PolyQP; 2]>,
}

impl SwitchingKey {
    pub fn n(&self) -> usize {
        self.value[0][0].n()
    }

    /// Number of digits the key can absorb.
    pub fn digits(&self) -> usize {
        self.value.len()
    }

    pub fn at(&self, digit: usize) -> &[PolyQP; 2] {
        assert!(
            digit < self.digits(),
            "invalid argument digit: digit={} >= self.digits()={}",
            digit,
            self.digits()
        );
        &self.value[digit]
    }
}

/// Switching key from s^2 to s.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RelinearizationKey(pub SwitchingKey);

/// Switching keys from s(X^g) to s, indexed by the Galois element g.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RotationKeySet {
    pub keys: FnvHashMap<u64, SwitchingKey>,
}

impl RotationKeySet {
    pub fn insert(&mut self, gal_el: u64, key: SwitchingKey) {
        self.keys.insert(gal_el, key);
    }

    pub fn get(&self, gal_el: u64) -> Result<&SwitchingKey> {
        self.keys
            .get(&gal_el)
            .ok_or(Error::KeyNotAvailable { gal_el })
    }

    pub fn contains(&self, gal_el: u64) -> bool {
        self.keys.contains_key(&gal_el)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl WriterTo for SecretKey {
    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.value.write_to(writer)
    }
}

impl ReaderFrom for SecretKey {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> std::io::Result<()> {
        self.value.read_from(reader)
    }
}

impl WriterTo for PublicKey {
    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.value.iter().try_for_each(|p| p.write_to(writer))
    }
}

impl ReaderFrom for PublicKey {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> std::io::Result<()> {
        let mut value: [PolyQP; 2] = Default::default();
        value.iter_mut().try_for_each(|p| p.read_from(reader))?;
        if value[0].n() != value[1].n() {
            return Err(std::io::Error::new(
                ErrorKind::InvalidData,
                format!(
                    "invalid public key: n={} != n={}",
                    value[0].n(),
                    value[1].n()
                ),
            ));
        }
        self.value = value;
        Ok(())
    }
}

/// Layout: number of digits (u8), then the two PolyQP of each digit.
impl WriterTo for SwitchingKey {
    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        if self.value.is_empty() || self.value.len() > u8::MAX as usize {
            return Err(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("invalid switching key: {} digits", self.value.len()),
            ));
        }
        writer.write_u8(self.value.len() as u8)?;
        self.value
            .iter()
            .flatten()
            .try_for_each(|p| p.write_to(writer))
    }
}

impl ReaderFrom for SwitchingKey {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> std::io::Result<()> {
        let digits: usize = reader.read_u8()? as usize;
        if digits == 0 {
            return Err(std::io::Error::new(
                ErrorKind::InvalidData,
                "switching key without digits",
            ));
        }
        let mut value: Vec<[PolyQP; 2]> = vec![Default::default(); digits];
        value
            .iter_mut()
            .flatten()
            .try_for_each(|p| p.read_from(reader))?;
        self.value = value;
        Ok(())
    }
}

impl WriterTo for RelinearizationKey {
    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.write_to(writer)
    }
}

impl ReaderFrom for RelinearizationKey {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> std::io::Result<()> {
        self.0.read_from(reader)
    }
}

/// Layout: number of keys (u32), then for each key its Galois element (u64)
/// followed by the key, in increasing order of Galois element.
impl WriterTo for RotationKeySet {
    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u32::<LittleEndian>(self.keys.len() as u32)?;
        let mut gal_els: Vec<&u64> = self.keys.keys().collect();
        gal_els.sort();
        gal_els.into_iter().try_for_each(|gal_el| {
            writer.write_u64::<LittleEndian>(*gal_el)?;
            self.keys[gal_el].write_to(writer)
        })
    }
}

impl ReaderFrom for RotationKeySet {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> std::io::Result<()> {
        let len: usize = reader.read_u32::<LittleEndian>()? as usize;
        let mut keys: FnvHashMap<u64, SwitchingKey> = FnvHashMap::default();
        for _ in 0..len {
            let gal_el: u64 = reader.read_u64::<LittleEndian>()?;
            let mut key: SwitchingKey = SwitchingKey::default();
            key.read_from(reader)?;
            keys.insert(gal_el, key);
        }
        self.keys = keys;
        Ok(())
    }
}
