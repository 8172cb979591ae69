//! Glove Catch
//!
//! A catching game loop for an augmented-reality style scene: balls are
//! thrown along tweened trajectories and scored when they touch a glove
//! anchored to a tracked face.

pub mod catch3d;
