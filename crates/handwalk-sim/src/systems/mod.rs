//! Systems that operate on the scene each tick.
//!
//! Systems are functions or small structs that take the state they touch
//! by reference. The engine owns all state and decides the order.

pub mod animation;
pub mod effect;
pub mod gait;
pub mod layout;
pub mod smoothing;
pub mod snapshot;
pub mod spawn_pool;
