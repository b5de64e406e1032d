//! Implementations that are useful accross the whole project
//!
//! Tracked data, the habit chain engine and the wealth classifier

pub mod date;
pub mod deadline;
pub mod entry;
pub mod error;
pub mod goal;
pub mod habit;
pub mod linkage;
pub mod skill;
pub mod state;
pub mod wealth;
