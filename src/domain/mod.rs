//! Domain types: chain profiles, amount scaling, lending actions, submission lifecycle

pub mod amount;
pub mod chain;
pub mod lending;
pub mod session;
pub mod submit;
