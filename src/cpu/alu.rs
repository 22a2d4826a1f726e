//! Arithmetic and logic unit.
//!
//! Every operation is a pure function of its operands. Where an instruction
//! leaves some flags untouched, the current flags come in as an argument and
//! the untouched ones are copied through, so each function always returns the
//! complete flag state.

use crate::cpu::reg::Flags;

fn zero(result: u8) -> bool {
  result == 0
}

pub fn add(a: u8, b: u8) -> (u8, Flags) {
  adc(a, b, false)
}

/// Add with carry-in. Carries out of either the operand add or the carry add
/// are both caught since the sums are formed in wider integers.
pub fn adc(a: u8, b: u8, carry: bool) -> (u8, Flags) {
  let c = u8::from(carry);
  let result = a.wrapping_add(b).wrapping_add(c);
  let flags = Flags {
    z: zero(result),
    n: false,
    h: (a & 0xf) + (b & 0xf) + c > 0xf,
    c: u16::from(a) + u16::from(b) + u16::from(c) > 0xff,
  };
  (result, flags)
}

pub fn sub(a: u8, b: u8) -> (u8, Flags) {
  sbc(a, b, false)
}

/// Subtract with borrow-in.
pub fn sbc(a: u8, b: u8, carry: bool) -> (u8, Flags) {
  let c = u8::from(carry);
  let result = a.wrapping_sub(b).wrapping_sub(c);
  let flags = Flags {
    z: zero(result),
    n: true,
    h: (a & 0xf) < (b & 0xf) + c,
    c: u16::from(a) < u16::from(b) + u16::from(c),
  };
  (result, flags)
}

/// Compare: the flags of `a - b`, result discarded.
pub fn cp(a: u8, b: u8) -> Flags {
  sub(a, b).1
}

pub fn and(a: u8, b: u8) -> (u8, Flags) {
  let result = a & b;
  let flags = Flags {
    z: zero(result),
    n: false,
    h: true,
    c: false,
  };
  (result, flags)
}

pub fn or(a: u8, b: u8) -> (u8, Flags) {
  let result = a | b;
  (result, logic_flags(result))
}

pub fn xor(a: u8, b: u8) -> (u8, Flags) {
  let result = a ^ b;
  (result, logic_flags(result))
}

fn logic_flags(result: u8) -> Flags {
  Flags {
    z: zero(result),
    ..Flags::default()
  }
}

/// Carry is preserved.
pub fn inc8(a: u8, f: Flags) -> (u8, Flags) {
  let result = a.wrapping_add(1);
  let flags = Flags {
    z: zero(result),
    n: false,
    h: a & 0xf == 0xf,
    c: f.c,
  };
  (result, flags)
}

/// Carry is preserved.
pub fn dec8(a: u8, f: Flags) -> (u8, Flags) {
  let result = a.wrapping_sub(1);
  let flags = Flags {
    z: zero(result),
    n: true,
    h: a & 0xf == 0,
    c: f.c,
  };
  (result, flags)
}

pub fn inc16(a: u16) -> u16 {
  a.wrapping_add(1)
}

pub fn dec16(a: u16) -> u16 {
  a.wrapping_sub(1)
}

/// `ADD HL,rr`. Zero is left as it was.
pub fn add16(a: u16, b: u16, f: Flags) -> (u16, Flags) {
  let result = a.wrapping_add(b);
  let flags = Flags {
    z: f.z,
    n: false,
    h: (a & 0x0fff) + (b & 0x0fff) > 0x0fff,
    c: u32::from(a) + u32::from(b) > 0xffff,
  };
  (result, flags)
}

/// `ADD SP,e` and `LD HL,SP+e`: the displacement is signed, but the flags come
/// from an unsigned add of the low bytes.
pub fn add16_signed(a: u16, e: u8) -> (u16, Flags) {
  let result = a.wrapping_add(e as i8 as u16);
  let flags = Flags {
    z: false,
    n: false,
    h: (a & 0xf) + u16::from(e & 0xf) > 0xf,
    c: (a & 0xff) + u16::from(e) > 0xff,
  };
  (result, flags)
}

pub fn swap(a: u8) -> (u8, Flags) {
  let result = (a << 4) | (a >> 4);
  (result, logic_flags(result))
}

fn shift_flags(result: u8, carry: bool) -> Flags {
  Flags {
    z: zero(result),
    n: false,
    h: false,
    c: carry,
  }
}

pub fn rlc(a: u8) -> (u8, Flags) {
  let result = a.rotate_left(1);
  (result, shift_flags(result, a & 0x80 != 0))
}

pub fn rrc(a: u8) -> (u8, Flags) {
  let result = a.rotate_right(1);
  (result, shift_flags(result, a & 0x01 != 0))
}

/// Rotate left through carry.
pub fn rl(a: u8, carry: bool) -> (u8, Flags) {
  let result = (a << 1) | u8::from(carry);
  (result, shift_flags(result, a & 0x80 != 0))
}

/// Rotate right through carry.
pub fn rr(a: u8, carry: bool) -> (u8, Flags) {
  let result = (a >> 1) | (u8::from(carry) << 7);
  (result, shift_flags(result, a & 0x01 != 0))
}

pub fn sla(a: u8) -> (u8, Flags) {
  let result = a << 1;
  (result, shift_flags(result, a & 0x80 != 0))
}

/// Bit 7 is kept.
pub fn sra(a: u8) -> (u8, Flags) {
  let result = (a >> 1) | (a & 0x80);
  (result, shift_flags(result, a & 0x01 != 0))
}

pub fn srl(a: u8) -> (u8, Flags) {
  let result = a >> 1;
  (result, shift_flags(result, a & 0x01 != 0))
}

// The accumulator rotates always clear Z, whatever the result.

pub fn rlca(a: u8) -> (u8, Flags) {
  accumulator(rlc(a))
}

pub fn rrca(a: u8) -> (u8, Flags) {
  accumulator(rrc(a))
}

pub fn rla(a: u8, carry: bool) -> (u8, Flags) {
  accumulator(rl(a, carry))
}

pub fn rra(a: u8, carry: bool) -> (u8, Flags) {
  accumulator(rr(a, carry))
}

fn accumulator((result, flags): (u8, Flags)) -> (u8, Flags) {
  (result, Flags { z: false, ..flags })
}

/// Test bit `index` of `value`. Carry is preserved.
pub fn bit(value: u8, index: u8, f: Flags) -> Flags {
  Flags {
    z: value & (1 << index) == 0,
    n: false,
    h: true,
    c: f.c,
  }
}

pub fn set(value: u8, index: u8) -> u8 {
  value | (1 << index)
}

pub fn res(value: u8, index: u8) -> u8 {
  value & !(1 << index)
}

/// Decimal adjust after a BCD add (N clear) or subtract (N set).
pub fn daa(a: u8, f: Flags) -> (u8, Flags) {
  let mut adjust = 0;
  let mut carry = f.c;
  let result = if !f.n {
    if f.c || a > 0x99 {
      adjust |= 0x60;
      carry = true;
    }
    if f.h || (a & 0xf) > 0x9 {
      adjust |= 0x06;
    }
    a.wrapping_add(adjust)
  } else {
    if f.c {
      adjust |= 0x60;
    }
    if f.h {
      adjust |= 0x06;
    }
    a.wrapping_sub(adjust)
  };
  let flags = Flags {
    z: zero(result),
    n: f.n,
    h: false,
    c: carry,
  };
  (result, flags)
}

pub fn cpl(a: u8, f: Flags) -> (u8, Flags) {
  let flags = Flags {
    n: true,
    h: true,
    ..f
  };
  (!a, flags)
}

pub fn ccf(f: Flags) -> Flags {
  Flags {
    z: f.z,
    n: false,
    h: false,
    c: !f.c,
  }
}

pub fn scf(f: Flags) -> Flags {
  Flags {
    z: f.z,
    n: false,
    h: false,
    c: true,
  }
}
