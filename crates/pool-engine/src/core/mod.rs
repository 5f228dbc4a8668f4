pub mod physics;
#[cfg(feature = "physics")]
pub mod rapier;
pub mod time;
