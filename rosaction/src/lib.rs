//! ROS1 action discovery and client helpers over `rosrust`.

#![warn(rust_2018_idioms)]

mod action_client;
mod discovery;
mod error;
mod master;
pub mod rosrust_utils;
mod status;
mod yaml;

#[cfg(test)]
mod test_msgs;

// re-export
pub use rosrust::{init, is_ok, rate};

#[doc(hidden)]
pub use paste;

pub use crate::{
    action_client::*, discovery::*, error::Error, master::*, rosrust_utils::*, status::*, yaml::*,
};
