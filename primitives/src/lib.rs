#![cfg_attr(not(feature = "std"), no_std)]

pub mod ecosystem;
pub mod staking;

pub use ecosystem::*;
pub use staking::*;
