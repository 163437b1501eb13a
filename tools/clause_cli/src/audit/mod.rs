pub mod digest;
pub mod event;
pub mod lifecycle;
pub mod log;
