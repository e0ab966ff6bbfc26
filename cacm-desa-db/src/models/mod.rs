pub mod access;
pub mod atensi;
pub mod identifiable;

// Re-exports
pub use access::*;
pub use atensi::*;
pub use identifiable::*;
