pub mod attendance;
pub mod finalize;
