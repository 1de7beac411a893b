//! Turns decoded model output into the answer shown to the user.

pub mod echo;

pub use echo::strip_echo;
