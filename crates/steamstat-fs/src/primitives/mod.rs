pub mod atomic_write;
pub mod copy;
