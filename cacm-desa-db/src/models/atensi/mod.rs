pub mod atensi_period;
pub mod flag_detail;
pub mod flag_type;
pub mod identification_log;
pub mod status;
pub mod status_transition;
pub mod village_finding;

pub use atensi_period::*;
pub use flag_detail::*;
pub use flag_type::*;
pub use identification_log::*;
pub use status::*;
pub use status_transition::*;
pub use village_finding::*;
