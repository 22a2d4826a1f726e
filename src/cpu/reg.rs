use std::fmt;

pub const Z: u8 = 0x80;
pub const N: u8 = 0x40;
pub const H: u8 = 0x20;
pub const C: u8 = 0x10;

/// A 16-bit register pair. The 8-bit halves are views of the same value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Pair(u16);

impl Pair {
  pub fn new(value: u16) -> Pair {
    Pair(value)
  }

  pub fn get(self) -> u16 {
    self.0
  }
  pub fn set(&mut self, value: u16) {
    self.0 = value;
  }

  pub fn hi(self) -> u8 {
    (self.0 >> 8) as u8
  }
  pub fn lo(self) -> u8 {
    (self.0 & 0xff) as u8
  }

  pub fn set_hi(&mut self, value: u8) {
    self.0 = (u16::from(value) << 8) | (self.0 & 0x00ff);
  }
  pub fn set_lo(&mut self, value: u8) {
    self.0 = (self.0 & 0xff00) | u16::from(value);
  }
}

/// The four status flags held in F.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Flags {
  pub z: bool,
  pub n: bool,
  pub h: bool,
  pub c: bool,
}

impl Flags {
  /// Decode F. The low nibble is ignored.
  pub fn from_byte(f: u8) -> Flags {
    Flags {
      z: f & Z != 0,
      n: f & N != 0,
      h: f & H != 0,
      c: f & C != 0,
    }
  }

  pub fn to_byte(self) -> u8 {
    (if self.z { Z } else { 0 }) |
      (if self.n { N } else { 0 }) |
      (if self.h { H } else { 0 }) |
      (if self.c { C } else { 0 })
  }
}

/// 8-bit operand, in the order the opcode encodings use.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum R8 {
  B,
  C,
  D,
  E,
  H,
  L,
  /// The byte addressed by HL.
  HLInd,
  A,
}

impl R8 {
  /// Operand selected by the low three bits of `bits`.
  pub fn from_bits(bits: u8) -> R8 {
    match bits & 0x7 {
      0 => R8::B,
      1 => R8::C,
      2 => R8::D,
      3 => R8::E,
      4 => R8::H,
      5 => R8::L,
      6 => R8::HLInd,
      _ => R8::A,
    }
  }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum R16 {
  BC,
  DE,
  HL,
  SP,
}

impl R16 {
  pub fn from_bits(bits: u8) -> R16 {
    match bits & 0x3 {
      0 => R16::BC,
      1 => R16::DE,
      2 => R16::HL,
      _ => R16::SP,
    }
  }
}

/// Register pairs reachable by PUSH and POP.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stack {
  BC,
  DE,
  HL,
  AF,
}

impl Stack {
  pub fn from_bits(bits: u8) -> Stack {
    match bits & 0x3 {
      0 => Stack::BC,
      1 => Stack::DE,
      2 => Stack::HL,
      _ => Stack::AF,
    }
  }
}

/// Branch conditions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cond {
  NZ,
  Z,
  NC,
  C,
}

impl Cond {
  pub fn from_bits(bits: u8) -> Cond {
    match bits & 0x3 {
      0 => Cond::NZ,
      1 => Cond::Z,
      2 => Cond::NC,
      _ => Cond::C,
    }
  }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Registers {
  af: Pair,
  bc: Pair,
  de: Pair,
  hl: Pair,

  /// Program counter.
  pub pc: u16,

  /// Stack pointer.
  pub sp: u16,
}

impl Registers {
  /// Register values left behind by the boot ROM.
  pub fn new() -> Registers {
    Registers {
      af: Pair::new(0x01b0),
      bc: Pair::new(0x0013),
      de: Pair::new(0x00d8),
      hl: Pair::new(0x014d),

      sp: 0xfffe,
      pc: 0x100,
    }
  }

  pub fn a(&self) -> u8 {
    self.af.hi()
  }
  pub fn f(&self) -> u8 {
    self.af.lo()
  }
  pub fn b(&self) -> u8 {
    self.bc.hi()
  }
  pub fn c(&self) -> u8 {
    self.bc.lo()
  }
  pub fn d(&self) -> u8 {
    self.de.hi()
  }
  pub fn e(&self) -> u8 {
    self.de.lo()
  }
  pub fn h(&self) -> u8 {
    self.hl.hi()
  }
  pub fn l(&self) -> u8 {
    self.hl.lo()
  }

  pub fn set_a(&mut self, value: u8) {
    self.af.set_hi(value);
  }
  pub fn set_b(&mut self, value: u8) {
    self.bc.set_hi(value);
  }
  pub fn set_c(&mut self, value: u8) {
    self.bc.set_lo(value);
  }
  pub fn set_d(&mut self, value: u8) {
    self.de.set_hi(value);
  }
  pub fn set_e(&mut self, value: u8) {
    self.de.set_lo(value);
  }
  pub fn set_h(&mut self, value: u8) {
    self.hl.set_hi(value);
  }
  pub fn set_l(&mut self, value: u8) {
    self.hl.set_lo(value);
  }

  pub fn af(&self) -> u16 {
    self.af.get()
  }
  pub fn bc(&self) -> u16 {
    self.bc.get()
  }
  pub fn de(&self) -> u16 {
    self.de.get()
  }
  pub fn hl(&self) -> u16 {
    self.hl.get()
  }

  /// Unused flag bits are dropped.
  pub fn set_af(&mut self, value: u16) {
    self.af.set(value & 0xfff0);
  }
  pub fn set_bc(&mut self, value: u16) {
    self.bc.set(value);
  }
  pub fn set_de(&mut self, value: u16) {
    self.de.set(value);
  }
  pub fn set_hl(&mut self, value: u16) {
    self.hl.set(value);
  }

  /// Register operand. `R8::HLInd` is memory, so it has no register value.
  pub fn get8(&self, r: R8) -> Option<u8> {
    match r {
      R8::A => Some(self.a()),
      R8::B => Some(self.b()),
      R8::C => Some(self.c()),
      R8::D => Some(self.d()),
      R8::E => Some(self.e()),
      R8::H => Some(self.h()),
      R8::L => Some(self.l()),
      R8::HLInd => None,
    }
  }

  /// Returns false for `R8::HLInd`, which must be written through memory.
  pub fn set8(&mut self, r: R8, value: u8) -> bool {
    match r {
      R8::A => self.set_a(value),
      R8::B => self.set_b(value),
      R8::C => self.set_c(value),
      R8::D => self.set_d(value),
      R8::E => self.set_e(value),
      R8::H => self.set_h(value),
      R8::L => self.set_l(value),
      R8::HLInd => return false,
    }
    true
  }

  pub fn get16(&self, r: R16) -> u16 {
    match r {
      R16::BC => self.bc(),
      R16::DE => self.de(),
      R16::HL => self.hl(),
      R16::SP => self.sp,
    }
  }

  pub fn set16(&mut self, r: R16, value: u16) {
    match r {
      R16::BC => self.set_bc(value),
      R16::DE => self.set_de(value),
      R16::HL => self.set_hl(value),
      R16::SP => self.sp = value,
    }
  }

  pub fn flags(&self) -> Flags {
    Flags::from_byte(self.f())
  }
  pub fn set_flags(&mut self, flags: Flags) {
    self.af.set_lo(flags.to_byte());
  }

  /// Zero flag
  pub fn zf(&self) -> bool {
    self.f() & Z != 0
  }
  /// Subtract flag
  pub fn nf(&self) -> bool {
    self.f() & N != 0
  }
  /// Half carry flag
  pub fn hf(&self) -> bool {
    self.f() & H != 0
  }
  /// Carry flag
  pub fn cf(&self) -> bool {
    self.f() & C != 0
  }

  pub fn check(&self, cond: Cond) -> bool {
    match cond {
      Cond::NZ => !self.zf(),
      Cond::Z => self.zf(),
      Cond::NC => !self.cf(),
      Cond::C => self.cf(),
    }
  }

  pub fn hl_inc(&mut self) {
    let hl = self.hl().wrapping_add(1);
    self.set_hl(hl);
  }
  pub fn hl_dec(&mut self) {
    let hl = self.hl().wrapping_sub(1);
    self.set_hl(hl);
  }
}

impl Default for Registers {
  fn default() -> Registers {
    Registers::new()
  }
}

impl fmt::Display for R8 {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match self {
      R8::B => "B",
      R8::C => "C",
      R8::D => "D",
      R8::E => "E",
      R8::H => "H",
      R8::L => "L",
      R8::HLInd => "(HL)",
      R8::A => "A",
    };
    f.write_str(name)
  }
}

impl fmt::Display for R16 {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match self {
      R16::BC => "BC",
      R16::DE => "DE",
      R16::HL => "HL",
      R16::SP => "SP",
    };
    f.write_str(name)
  }
}

impl fmt::Display for Stack {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match self {
      Stack::BC => "BC",
      Stack::DE => "DE",
      Stack::HL => "HL",
      Stack::AF => "AF",
    };
    f.write_str(name)
  }
}

impl fmt::Display for Cond {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match self {
      Cond::NZ => "NZ",
      Cond::Z => "Z",
      Cond::NC => "NC",
      Cond::C => "C",
    };
    f.write_str(name)
  }
}
