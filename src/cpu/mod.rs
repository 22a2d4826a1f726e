use serde::{Deserialize, Serialize};

pub mod alu;
mod cpu;
pub mod instr;
pub mod reg;
pub mod timing;

use self::reg::Registers;

pub struct Cpu {
  pub regs: Registers,

  /// Cumulative clock.
  clock: Clock,
  /// Clock of the last step.
  last: Clock,

  halt: bool,
  stop: bool,
  /// Set by an illegal opcode. Nothing clears it but a reset.
  locked: bool,
  ime: bool,

  /// Last fetched opcode and, after a prefix, the extended opcode.
  op: u8,
  cb_op: u8,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Clock {
  /// Machine cycles.
  pub m: u64,
  /// Clock periods.
  pub t: u64,
}

impl Clock {
  fn set(&mut self, m: u32) {
    self.m = u64::from(m);
    self.t = timing::T_PER_M * self.m;
  }

  fn add(&mut self, m: u32) {
    self.m += u64::from(m);
    self.t += timing::T_PER_M * u64::from(m);
  }
}

/// Complete CPU state, for saving and inspection.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
  pub a: u8,
  pub f: u8,
  pub b: u8,
  pub c: u8,
  pub d: u8,
  pub e: u8,
  pub h: u8,
  pub l: u8,
  pub sp: u16,
  pub pc: u16,

  pub halted: bool,
  pub stopped: bool,
  pub locked: bool,
  pub interrupts_enabled: bool,

  pub opcode: u8,
  pub cb_opcode: u8,

  pub clock: Clock,
  pub last: Clock,
}
