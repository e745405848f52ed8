use crate::surface::FrameRGBA;

/// 128-bit content fingerprint of a rendered frame.
///
/// Two independently seeded FNV-1a streams over the same bytes; equal
/// fingerprints mean equal pixels for any realistic frame count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for FrameFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

pub fn fingerprint_frame(frame: &FrameRGBA) -> FrameFingerprint {
    let mut a = Fnv1a64::new(0xcbf29ce484222325);
    let mut b = Fnv1a64::new(0x9ae16a3b2f90404f);

    write_u64_pair(&mut a, &mut b, u64::from(frame.width));
    write_u64_pair(&mut a, &mut b, u64::from(frame.height));
    write_u8_pair(&mut a, &mut b, u8::from(frame.premultiplied));
    a.write_bytes(&frame.data);
    b.write_bytes(&frame.data);

    FrameFingerprint {
        hi: a.finish(),
        lo: b.finish(),
    }
}

fn write_u8_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u8) {
    a.write_u8(v);
    b.write_u8(v);
}

fn write_u64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u64) {
    a.write_bytes(&v.to_le_bytes());
    b.write_bytes(&v.to_le_bytes());
}

#[derive(Clone, Copy)]
struct Fnv1a64(u64);

impl Fnv1a64 {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(0x100000001b3);
        }
        self.0 = h;
    }

    fn finish(self) -> u64 {
        self.0
    }
}
