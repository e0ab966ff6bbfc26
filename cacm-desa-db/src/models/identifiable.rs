use uuid::Uuid;

/// Trait for rows that carry a surrogate UUID next to their natural key
pub trait Identifiable {
    /// Returns the unique identifier of the row
    fn get_id(&self) -> Uuid;
}
