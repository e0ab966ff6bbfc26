pub mod access;
pub mod atensi;
pub mod db_init;
