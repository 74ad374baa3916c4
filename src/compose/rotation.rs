use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::foundation::error::{PlatenError, PlatenResult};

/// Fixed seed so the oracle is stable across processes and machines.
const ROTATION_SEED: u64 = 0x9d3f_52a7_b1c4_08e6;

/// Deterministic "chaos rotation" for an element identifier.
///
/// Returns an angle in `[-max_deg, max_deg]`, uniform across identifiers.
/// This is a pure function: the generator is a fixed-seed xxh3 of the
/// identifier bytes, constructed locally per call, so there is no shared
/// random state and concurrent callers cannot race.
///
/// Empty identifiers are rejected rather than silently mapped to a default
/// angle.
pub fn chaos_rotation(element_id: &str, max_deg: f64) -> PlatenResult<f64> {
    if element_id.is_empty() {
        return Err(PlatenError::invalid_layout(
            "chaos rotation requires a non-empty element id",
        ));
    }
    if !max_deg.is_finite() || max_deg < 0.0 {
        return Err(PlatenError::invalid_layout(
            "rotation ceiling must be finite and >= 0",
        ));
    }
    if max_deg == 0.0 {
        return Ok(0.0);
    }

    let h = xxh3_64_with_seed(element_id.as_bytes(), ROTATION_SEED);
    // Top 53 bits give a uniform value in [0, 1) at full f64 precision.
    let unit = (h >> 11) as f64 / (1u64 << 53) as f64;
    Ok((unit * 2.0 - 1.0) * max_deg)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/rotation.rs"]
mod tests;
