pub mod create_batch;
pub mod find_by_id;
pub mod find_by_village;
pub mod increment_counters;
pub mod list;
pub mod repo_impl;
pub mod update_batch;

pub use repo_impl::VillageFindingRepositoryImpl;
