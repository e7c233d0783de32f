pub mod category;
pub mod interval;
pub mod session;
