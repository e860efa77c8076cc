pub mod fit;
pub mod render;
pub mod watch;
