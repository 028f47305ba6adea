pub mod impl_log;
pub mod interface;
