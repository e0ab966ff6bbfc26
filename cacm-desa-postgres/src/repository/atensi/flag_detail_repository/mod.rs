pub mod create_batch;
pub mod distinct_flag_types;
pub mod find_by_id;
pub mod find_by_natural_key;
pub mod find_for_update;
pub mod list;
pub mod repo_impl;
pub mod test_utils;
pub mod update_batch;

pub use repo_impl::FlagDetailRepositoryImpl;
