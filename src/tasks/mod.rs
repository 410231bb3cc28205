pub mod gesture;
pub mod stream;
