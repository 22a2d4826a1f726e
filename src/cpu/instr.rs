//! Opcode decoding.
//!
//! `decode` and `decode_cb` are total: every byte maps to exactly one
//! instruction, and execution matches on the result exhaustively.

use std::fmt;

use crate::cpu::reg::{Cond, Stack, R16, R8};

/// Opcode that selects the extended table.
pub const PREFIX: u8 = 0xcb;

/// 8-bit accumulator operations, in encoding order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AluOp {
  Add,
  Adc,
  Sub,
  Sbc,
  And,
  Xor,
  Or,
  Cp,
}

impl AluOp {
  fn from_bits(bits: u8) -> AluOp {
    match bits & 0x7 {
      0 => AluOp::Add,
      1 => AluOp::Adc,
      2 => AluOp::Sub,
      3 => AluOp::Sbc,
      4 => AluOp::And,
      5 => AluOp::Xor,
      6 => AluOp::Or,
      _ => AluOp::Cp,
    }
  }
}

/// Memory operand of the accumulator loads and stores.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Indirect {
  BC,
  DE,
  /// (HL), then HL is incremented.
  HLInc,
  /// (HL), then HL is decremented.
  HLDec,
}

impl Indirect {
  fn from_bits(bits: u8) -> Indirect {
    match bits & 0x3 {
      0 => Indirect::BC,
      1 => Indirect::DE,
      2 => Indirect::HLInc,
      _ => Indirect::HLDec,
    }
  }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Instruction {
  Nop,
  Stop,
  Halt,
  Di,
  Ei,

  /// LD r,r'
  Ld(R8, R8),
  /// LD r,n
  LdImm(R8),
  /// LD rr,nn
  LdImm16(R16),
  /// LD (rr),A
  LdIndA(Indirect),
  /// LD A,(rr)
  LdAInd(Indirect),
  /// LD (nn),A
  LdAbsA,
  /// LD A,(nn)
  LdAAbs,
  /// LDH (n),A
  LdhImmA,
  /// LDH A,(n)
  LdhAImm,
  /// LD (C),A
  LdhCA,
  /// LD A,(C)
  LdhAC,
  /// LD (nn),SP
  LdAbsSp,
  LdSpHl,
  /// LD HL,SP+e
  LdHlSpImm,
  Push(Stack),
  Pop(Stack),

  Alu(AluOp, R8),
  AluImm(AluOp),
  Inc(R8),
  Dec(R8),
  Inc16(R16),
  Dec16(R16),
  AddHl(R16),
  /// ADD SP,e
  AddSpImm,

  Rlca,
  Rrca,
  Rla,
  Rra,
  Daa,
  Cpl,
  Scf,
  Ccf,

  Jp,
  JpCond(Cond),
  JpHl,
  Jr,
  JrCond(Cond),
  Call,
  CallCond(Cond),
  Ret,
  RetCond(Cond),
  Reti,
  /// RST to the given vector.
  Rst(u16),

  /// Continue in the extended table.
  Prefix,
  /// Opcode with no instruction behind it.
  Illegal(u8),
}

/// Rotates and shifts of the extended table, in encoding order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShiftOp {
  Rlc,
  Rrc,
  Rl,
  Rr,
  Sla,
  Sra,
  Swap,
  Srl,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CbInstruction {
  Shift(ShiftOp, R8),
  Bit(u8, R8),
  Res(u8, R8),
  Set(u8, R8),
}

pub fn decode(op: u8) -> Instruction {
  use self::Instruction::*;

  // Register fields sit in bits 5-3 and 2-0, the pair field in bits 5-4.
  let y = (op >> 3) & 0x7;
  let z = op & 0x7;
  let p = (op >> 4) & 0x3;
  let q = y & 0x1 == 1;

  match op {
    0x00..=0x3f => match z {
      0 => match y {
        0 => Nop,
        1 => LdAbsSp,
        2 => Stop,
        3 => Jr,
        _ => JrCond(Cond::from_bits(y)),
      },
      1 if q => AddHl(R16::from_bits(p)),
      1 => LdImm16(R16::from_bits(p)),
      2 if q => LdAInd(Indirect::from_bits(p)),
      2 => LdIndA(Indirect::from_bits(p)),
      3 if q => Dec16(R16::from_bits(p)),
      3 => Inc16(R16::from_bits(p)),
      4 => Inc(R8::from_bits(y)),
      5 => Dec(R8::from_bits(y)),
      6 => LdImm(R8::from_bits(y)),
      _ => match y {
        0 => Rlca,
        1 => Rrca,
        2 => Rla,
        3 => Rra,
        4 => Daa,
        5 => Cpl,
        6 => Scf,
        _ => Ccf,
      },
    },

    0x76 => Halt,
    0x40..=0x7f => Ld(R8::from_bits(y), R8::from_bits(z)),

    0x80..=0xbf => Alu(AluOp::from_bits(y), R8::from_bits(z)),

    0xc0 | 0xc8 | 0xd0 | 0xd8 => RetCond(Cond::from_bits(y)),
    0xc2 | 0xca | 0xd2 | 0xda => JpCond(Cond::from_bits(y)),
    0xc4 | 0xcc | 0xd4 | 0xdc => CallCond(Cond::from_bits(y)),
    0xc1 | 0xd1 | 0xe1 | 0xf1 => Pop(Stack::from_bits(p)),
    0xc5 | 0xd5 | 0xe5 | 0xf5 => Push(Stack::from_bits(p)),
    0xc6 | 0xce | 0xd6 | 0xde | 0xe6 | 0xee | 0xf6 | 0xfe => {
      AluImm(AluOp::from_bits(y))
    }
    0xc7 | 0xcf | 0xd7 | 0xdf | 0xe7 | 0xef | 0xf7 | 0xff => {
      Rst(u16::from(y) << 3)
    }
    0xc3 => Jp,
    0xc9 => Ret,
    0xcb => Prefix,
    0xcd => Call,
    0xd9 => Reti,
    0xe0 => LdhImmA,
    0xe2 => LdhCA,
    0xe8 => AddSpImm,
    0xe9 => JpHl,
    0xea => LdAbsA,
    0xf0 => LdhAImm,
    0xf2 => LdhAC,
    0xf3 => Di,
    0xf8 => LdHlSpImm,
    0xf9 => LdSpHl,
    0xfa => LdAAbs,
    0xfb => Ei,
    0xd3 | 0xdb | 0xdd | 0xe3 | 0xe4 | 0xeb | 0xec | 0xed | 0xf4 | 0xfc |
    0xfd => Illegal(op),
  }
}

pub fn decode_cb(op: u8) -> CbInstruction {
  let y = (op >> 3) & 0x7;
  let r = R8::from_bits(op);
  match op >> 6 {
    0 => {
      let shift = match y {
        0 => ShiftOp::Rlc,
        1 => ShiftOp::Rrc,
        2 => ShiftOp::Rl,
        3 => ShiftOp::Rr,
        4 => ShiftOp::Sla,
        5 => ShiftOp::Sra,
        6 => ShiftOp::Swap,
        _ => ShiftOp::Srl,
      };
      CbInstruction::Shift(shift, r)
    }
    1 => CbInstruction::Bit(y, r),
    2 => CbInstruction::Res(y, r),
    _ => CbInstruction::Set(y, r),
  }
}

impl fmt::Display for AluOp {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match self {
      AluOp::Add => "ADD A,",
      AluOp::Adc => "ADC A,",
      AluOp::Sub => "SUB ",
      AluOp::Sbc => "SBC A,",
      AluOp::And => "AND ",
      AluOp::Xor => "XOR ",
      AluOp::Or => "OR ",
      AluOp::Cp => "CP ",
    };
    f.write_str(name)
  }
}

impl fmt::Display for Indirect {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match self {
      Indirect::BC => "(BC)",
      Indirect::DE => "(DE)",
      Indirect::HLInc => "(HL+)",
      Indirect::HLDec => "(HL-)",
    };
    f.write_str(name)
  }
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    use self::Instruction::*;
    match *self {
      Nop => write!(f, "NOP"),
      Stop => write!(f, "STOP"),
      Halt => write!(f, "HALT"),
      Di => write!(f, "DI"),
      Ei => write!(f, "EI"),
      Ld(dst, src) => write!(f, "LD {},{}", dst, src),
      LdImm(r) => write!(f, "LD {},n", r),
      LdImm16(rr) => write!(f, "LD {},nn", rr),
      LdIndA(ind) => write!(f, "LD {},A", ind),
      LdAInd(ind) => write!(f, "LD A,{}", ind),
      LdAbsA => write!(f, "LD (nn),A"),
      LdAAbs => write!(f, "LD A,(nn)"),
      LdhImmA => write!(f, "LDH (n),A"),
      LdhAImm => write!(f, "LDH A,(n)"),
      LdhCA => write!(f, "LD (C),A"),
      LdhAC => write!(f, "LD A,(C)"),
      LdAbsSp => write!(f, "LD (nn),SP"),
      LdSpHl => write!(f, "LD SP,HL"),
      LdHlSpImm => write!(f, "LD HL,SP+e"),
      Push(rr) => write!(f, "PUSH {}", rr),
      Pop(rr) => write!(f, "POP {}", rr),
      Alu(op, r) => write!(f, "{}{}", op, r),
      AluImm(op) => write!(f, "{}n", op),
      Inc(r) => write!(f, "INC {}", r),
      Dec(r) => write!(f, "DEC {}", r),
      Inc16(rr) => write!(f, "INC {}", rr),
      Dec16(rr) => write!(f, "DEC {}", rr),
      AddHl(rr) => write!(f, "ADD HL,{}", rr),
      AddSpImm => write!(f, "ADD SP,e"),
      Rlca => write!(f, "RLCA"),
      Rrca => write!(f, "RRCA"),
      Rla => write!(f, "RLA"),
      Rra => write!(f, "RRA"),
      Daa => write!(f, "DAA"),
      Cpl => write!(f, "CPL"),
      Scf => write!(f, "SCF"),
      Ccf => write!(f, "CCF"),
      Jp => write!(f, "JP nn"),
      JpCond(cc) => write!(f, "JP {},nn", cc),
      JpHl => write!(f, "JP HL"),
      Jr => write!(f, "JR e"),
      JrCond(cc) => write!(f, "JR {},e", cc),
      Call => write!(f, "CALL nn"),
      CallCond(cc) => write!(f, "CALL {},nn", cc),
      Ret => write!(f, "RET"),
      RetCond(cc) => write!(f, "RET {}", cc),
      Reti => write!(f, "RETI"),
      Rst(vector) => write!(f, "RST {:02X}h", vector),
      Prefix => write!(f, "PREFIX CB"),
      Illegal(op) => write!(f, "ILLEGAL {:02X}h", op),
    }
  }
}

impl fmt::Display for CbInstruction {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      CbInstruction::Shift(op, r) => {
        let name = match op {
          ShiftOp::Rlc => "RLC",
          ShiftOp::Rrc => "RRC",
          ShiftOp::Rl => "RL",
          ShiftOp::Rr => "RR",
          ShiftOp::Sla => "SLA",
          ShiftOp::Sra => "SRA",
          ShiftOp::Swap => "SWAP",
          ShiftOp::Srl => "SRL",
        };
        write!(f, "{} {}", name, r)
      }
      CbInstruction::Bit(b, r) => write!(f, "BIT {},{}", b, r),
      CbInstruction::Res(b, r) => write!(f, "RES {},{}", b, r),
      CbInstruction::Set(b, r) => write!(f, "SET {},{}", b, r),
    }
  }
}
