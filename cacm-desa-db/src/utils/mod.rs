use blake3::Hasher as Blake3Hasher;
use serde::Serialize;

/// Hashes serializable data into an i64 using its JSON form and blake3.
///
/// The first eight bytes of the digest are read little-endian, so the value is
/// stable across runs and machines.
pub fn hash_as_i64<T: Serialize>(data: &T) -> Result<i64, String> {
    let json = serde_json::to_vec(data)
        .map_err(|e| format!("Failed to serialize data for hashing: {e}"))?;
    let mut hasher = Blake3Hasher::new();
    hasher.update(&json);
    let digest = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[0..8]);
    Ok(i64::from_le_bytes(head))
}
