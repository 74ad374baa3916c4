pub(crate) const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// 64-bit FNV-1a over a byte slice, folded from an explicit seed state.
pub(crate) fn fnv1a64(seed: u64, bytes: &[u8]) -> u64 {
    const PRIME: u64 = 0x0000_0100_0000_01B3;
    bytes
        .iter()
        .fold(seed, |h, &b| (h ^ u64::from(b)).wrapping_mul(PRIME))
}

/// Deterministic per-cell hash used by procedural paper grain.
pub(crate) fn hash_cell(seed: u64, x: u32, y: u32) -> u32 {
    let mut cell = [0u8; 16];
    cell[..8].copy_from_slice(&u64::from(x).to_le_bytes());
    cell[8..].copy_from_slice(&u64::from(y).to_le_bytes());
    let v = fnv1a64(seed ^ FNV_OFFSET_BASIS, &cell);
    (v ^ (v >> 32)) as u32
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Linear interpolation between two u8 values with `t` in `[0, 1]`.
pub(crate) fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let t = t.clamp(0.0, 1.0);
    (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
