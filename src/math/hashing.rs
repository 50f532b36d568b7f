//! Integer hashing of grid coordinates

/// Hash `(x, y, seed)` to a value in `[0, 1]`
///
/// Arithmetic wraps at 32 bits, so the same inputs give the same value on
/// every platform.
pub const fn hash2d(x: u32, y: u32, seed: u32) -> f64 {
    let mut h = x
        .wrapping_mul(374_761_393)
        .wrapping_add(y.wrapping_mul(668_265_263))
        .wrapping_add(seed.wrapping_mul(1_597_334_677));
    h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
    h ^= h >> 16;
    h as f64 / u32::MAX as f64
}
