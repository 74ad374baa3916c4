use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x8b5a_d4a0_c7d8_e9f1;

/// Stable 128-bit content hash of a finished spread.
///
/// Byte-equal rasters hash equal across processes and machines; the
/// determinism tests and any caller deduplicating identical spreads rely on
/// this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpreadFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for SpreadFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Fingerprint a flattened RGB raster.
pub fn fingerprint_rgb(image: &image::RgbImage) -> SpreadFingerprint {
    let mut h = Xxh3::with_seed(XXH3_SEED);
    h.update(&image.width().to_le_bytes());
    h.update(&image.height().to_le_bytes());
    h.update(image.as_raw());
    let v = h.digest128();
    SpreadFingerprint {
        hi: (v >> 64) as u64,
        lo: v as u64,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/fingerprint.rs"]
mod tests;
