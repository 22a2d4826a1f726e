//! Instruction execution core of the Game Boy CPU (a Z80-derived 8-bit part).
//!
//! The core owns nothing but the register file and its clocks. Memory is
//! supplied by the caller through the [`Memory`] trait on every call, so any
//! number of independent [`Cpu`] values can coexist.

#[macro_use]
extern crate log;

pub mod cpu;
pub mod error;
pub mod mem;

pub use crate::cpu::{Clock, Cpu, Snapshot};
pub use crate::error::Error;
pub use crate::mem::{Memory, Ram};
