use crate::cpu::alu;
use crate::cpu::instr::{
  decode, decode_cb, AluOp, CbInstruction, Indirect, Instruction, ShiftOp, PREFIX,
};
use crate::cpu::reg::{Registers, Stack, R8};
use crate::cpu::timing::{self, CB_TIMINGS, TAKEN_TIMINGS, TIMINGS};
use crate::cpu::{Clock, Cpu, Snapshot};

use crate::mem::Memory;

impl Cpu {
  /// A CPU in its power-on state.
  pub fn new() -> Cpu {
    Cpu {
      regs: Registers::new(),
      clock: Clock::default(),
      last: Clock::default(),
      halt: false,
      stop: false,
      locked: false,
      ime: false,
      op: 0,
      cb_op: 0,
    }
  }

  /// Return to the power-on state. Clocks are zeroed.
  pub fn reset(&mut self) {
    *self = Cpu::new();
    debug!("reset, pc=0x{:04x} sp=0x{:04x}", self.regs.pc, self.regs.sp);
  }

  /// Step until at least `budget` machine cycles have been spent.
  /// Return the number actually spent, which may overshoot by part of
  /// one instruction. The count saturates at `u32::MAX`.
  pub fn run<M: Memory>(&mut self, mem: &mut M, budget: u32) -> u32 {
    self.run_from(mem, budget, 0)
  }

  /// `run` with `spent` cycles already counted against the budget.
  pub(crate) fn run_from<M: Memory>(
    &mut self,
    mem: &mut M,
    budget: u32,
    spent: u32,
  ) -> u32 {
    let mut total = spent;
    while total < budget {
      total = total.saturating_add(self.step(mem));
    }
    debug!("ran {} of {} machine cycles", total, budget);
    total
  }

  /// Service a pending interrupt, idle, or run one instruction.
  /// Return the machine cycles taken.
  pub fn step<M: Memory>(&mut self, mem: &mut M) -> u32 {
    let m = match self.interrupt(mem) {
      Some(m) => m,
      None if self.halt || self.stop || self.locked => timing::IDLE,
      None => self.dispatch(mem),
    };
    self.last.set(m);
    self.clock.add(m);
    m
  }

  fn interrupt<M: Memory>(&mut self, mem: &mut M) -> Option<u32> {
    if self.locked || self.stop {
      return None;
    }
    let vector = mem.pending_interrupt()?;
    if self.halt {
      debug!("woken by interrupt 0x{:04x}", vector);
      self.halt = false;
    }
    if !self.ime {
      return None;
    }

    mem.acknowledge_interrupt(vector);
    self.ime = false;
    let pc = self.regs.pc;
    self.push(mem, pc);
    self.regs.pc = vector;
    debug!("interrupt 0x{:04x}, return to 0x{:04x}", vector, pc);
    Some(timing::INTERRUPT)
  }

  fn dispatch<M: Memory>(&mut self, mem: &mut M) -> u32 {
    let pc = self.regs.pc;
    let op = self.bump(mem);
    self.op = op;
    if op != PREFIX {
      self.cb_op = 0;
    }
    let instr = decode(op);
    trace!("0x{:04x}: {:02x} {}", pc, op, instr);

    let taken = self.exec(mem, instr);
    let m = if op == PREFIX {
      CB_TIMINGS[self.cb_op as usize]
    } else if taken {
      TAKEN_TIMINGS[op as usize]
    } else {
      TIMINGS[op as usize]
    };
    u32::from(m)
  }

  /// Execute one decoded instruction. Operands are fetched from PC.
  /// Return true if a conditional branch was taken.
  fn exec<M: Memory>(&mut self, mem: &mut M, instr: Instruction) -> bool {
    use crate::cpu::instr::Instruction::*;

    // Store the flags of an (value, flags) result and yield the value.
    macro_rules! with_flags {
      ($e:expr) => {{
        let (value, flags) = $e;
        self.regs.set_flags(flags);
        value
      }};
    }

    match instr {
      Nop => {}
      Stop => {
        // STOP is two bytes long.
        self.bump(mem);
        self.stop = true;
        debug!("stopped at 0x{:04x}", self.regs.pc);
      }
      Halt => {
        self.halt = true;
        debug!("halted at 0x{:04x}", self.regs.pc);
      }
      Di => self.ime = false,
      // No one-instruction delay before IME is set.
      Ei => self.ime = true,

      Ld(dst, src) => {
        let value = self.read(mem, src);
        self.write(mem, dst, value);
      }
      LdImm(r) => {
        let n = self.bump(mem);
        self.write(mem, r, n);
      }
      LdImm16(rr) => {
        let nn = self.bump16(mem);
        self.regs.set16(rr, nn);
      }
      LdIndA(ind) => {
        let addr = self.indirect(ind);
        mem.wb(addr, self.regs.a());
      }
      LdAInd(ind) => {
        let addr = self.indirect(ind);
        self.regs.set_a(mem.rb(addr));
      }
      LdAbsA => {
        let nn = self.bump16(mem);
        mem.wb(nn, self.regs.a());
      }
      LdAAbs => {
        let nn = self.bump16(mem);
        self.regs.set_a(mem.rb(nn));
      }
      LdhImmA => {
        let n = self.bump(mem);
        mem.wb(0xff00 | u16::from(n), self.regs.a());
      }
      LdhAImm => {
        let n = self.bump(mem);
        self.regs.set_a(mem.rb(0xff00 | u16::from(n)));
      }
      LdhCA => mem.wb(0xff00 | u16::from(self.regs.c()), self.regs.a()),
      LdhAC => {
        let value = mem.rb(0xff00 | u16::from(self.regs.c()));
        self.regs.set_a(value);
      }
      LdAbsSp => {
        let nn = self.bump16(mem);
        mem.ww(nn, self.regs.sp);
      }
      LdSpHl => self.regs.sp = self.regs.hl(),
      LdHlSpImm => {
        let e = self.bump(mem);
        let hl = with_flags!(alu::add16_signed(self.regs.sp, e));
        self.regs.set_hl(hl);
      }
      Push(rr) => {
        let value = self.stack_pair(rr);
        self.push(mem, value);
      }
      Pop(rr) => {
        let value = self.pop(mem);
        self.set_stack_pair(rr, value);
      }

      Alu(op, r) => {
        let n = self.read(mem, r);
        self.accumulate(op, n);
      }
      AluImm(op) => {
        let n = self.bump(mem);
        self.accumulate(op, n);
      }
      Inc(r) => {
        let value = self.read(mem, r);
        let value = with_flags!(alu::inc8(value, self.regs.flags()));
        self.write(mem, r, value);
      }
      Dec(r) => {
        let value = self.read(mem, r);
        let value = with_flags!(alu::dec8(value, self.regs.flags()));
        self.write(mem, r, value);
      }
      Inc16(rr) => {
        let value = alu::inc16(self.regs.get16(rr));
        self.regs.set16(rr, value);
      }
      Dec16(rr) => {
        let value = alu::dec16(self.regs.get16(rr));
        self.regs.set16(rr, value);
      }
      AddHl(rr) => {
        let hl = with_flags!(alu::add16(
          self.regs.hl(),
          self.regs.get16(rr),
          self.regs.flags()
        ));
        self.regs.set_hl(hl);
      }
      AddSpImm => {
        let e = self.bump(mem);
        let sp = with_flags!(alu::add16_signed(self.regs.sp, e));
        self.regs.sp = sp;
      }

      Rlca => {
        let a = with_flags!(alu::rlca(self.regs.a()));
        self.regs.set_a(a);
      }
      Rrca => {
        let a = with_flags!(alu::rrca(self.regs.a()));
        self.regs.set_a(a);
      }
      Rla => {
        let a = with_flags!(alu::rla(self.regs.a(), self.regs.cf()));
        self.regs.set_a(a);
      }
      Rra => {
        let a = with_flags!(alu::rra(self.regs.a(), self.regs.cf()));
        self.regs.set_a(a);
      }
      Daa => {
        let a = with_flags!(alu::daa(self.regs.a(), self.regs.flags()));
        self.regs.set_a(a);
      }
      Cpl => {
        let a = with_flags!(alu::cpl(self.regs.a(), self.regs.flags()));
        self.regs.set_a(a);
      }
      Scf => {
        let flags = alu::scf(self.regs.flags());
        self.regs.set_flags(flags);
      }
      Ccf => {
        let flags = alu::ccf(self.regs.flags());
        self.regs.set_flags(flags);
      }

      Jp => self.regs.pc = self.bump16(mem),
      JpCond(cc) => {
        let nn = self.bump16(mem);
        if self.regs.check(cc) {
          self.regs.pc = nn;
          return true;
        }
      }
      JpHl => self.regs.pc = self.regs.hl(),
      Jr => {
        let e = self.bump(mem);
        self.jr(e);
      }
      JrCond(cc) => {
        let e = self.bump(mem);
        if self.regs.check(cc) {
          self.jr(e);
          return true;
        }
      }
      Call => {
        let nn = self.bump16(mem);
        self.call(mem, nn);
      }
      CallCond(cc) => {
        let nn = self.bump16(mem);
        if self.regs.check(cc) {
          self.call(mem, nn);
          return true;
        }
      }
      Ret => self.regs.pc = self.pop(mem),
      RetCond(cc) => {
        if self.regs.check(cc) {
          self.regs.pc = self.pop(mem);
          return true;
        }
      }
      Reti => {
        self.regs.pc = self.pop(mem);
        self.ime = true;
      }
      Rst(vector) => self.call(mem, vector),

      Prefix => {
        let cb = self.bump(mem);
        self.cb_op = cb;
        let instr = decode_cb(cb);
        trace!("  cb {:02x} {}", cb, instr);
        self.exec_cb(mem, instr);
      }
      Illegal(op) => {
        warn!(
          "illegal opcode 0x{:02x} at 0x{:04x}, cpu locked",
          op,
          self.regs.pc.wrapping_sub(1)
        );
        self.locked = true;
      }
    }
    false
  }

  fn exec_cb<M: Memory>(&mut self, mem: &mut M, instr: CbInstruction) {
    match instr {
      CbInstruction::Shift(op, r) => {
        let value = self.read(mem, r);
        let carry = self.regs.cf();
        let (value, flags) = match op {
          ShiftOp::Rlc => alu::rlc(value),
          ShiftOp::Rrc => alu::rrc(value),
          ShiftOp::Rl => alu::rl(value, carry),
          ShiftOp::Rr => alu::rr(value, carry),
          ShiftOp::Sla => alu::sla(value),
          ShiftOp::Sra => alu::sra(value),
          ShiftOp::Swap => alu::swap(value),
          ShiftOp::Srl => alu::srl(value),
        };
        self.regs.set_flags(flags);
        self.write(mem, r, value);
      }
      CbInstruction::Bit(b, r) => {
        let value = self.read(mem, r);
        let flags = alu::bit(value, b, self.regs.flags());
        self.regs.set_flags(flags);
      }
      CbInstruction::Res(b, r) => {
        let value = self.read(mem, r);
        self.write(mem, r, alu::res(value, b));
      }
      CbInstruction::Set(b, r) => {
        let value = self.read(mem, r);
        self.write(mem, r, alu::set(value, b));
      }
    }
  }

  fn accumulate(&mut self, op: AluOp, n: u8) {
    let a = self.regs.a();
    let carry = self.regs.cf();
    let (result, flags) = match op {
      AluOp::Add => alu::add(a, n),
      AluOp::Adc => alu::adc(a, n, carry),
      AluOp::Sub => alu::sub(a, n),
      AluOp::Sbc => alu::sbc(a, n, carry),
      AluOp::And => alu::and(a, n),
      AluOp::Xor => alu::xor(a, n),
      AluOp::Or => alu::or(a, n),
      // CP only compares.
      AluOp::Cp => (a, alu::cp(a, n)),
    };
    self.regs.set_a(result);
    self.regs.set_flags(flags);
  }

  fn bump<M: Memory>(&mut self, mem: &M) -> u8 {
    let result = mem.rb(self.regs.pc);
    self.regs.pc = self.regs.pc.wrapping_add(1);
    result
  }

  fn bump16<M: Memory>(&mut self, mem: &M) -> u16 {
    let lo = self.bump(mem);
    let hi = self.bump(mem);
    u16::from_le_bytes([lo, hi])
  }

  /// 8-bit operand, reading through HL for (HL).
  fn read<M: Memory>(&self, mem: &M, r: R8) -> u8 {
    match self.regs.get8(r) {
      Some(value) => value,
      None => mem.rb(self.regs.hl()),
    }
  }

  fn write<M: Memory>(&mut self, mem: &mut M, r: R8, value: u8) {
    if !self.regs.set8(r, value) {
      mem.wb(self.regs.hl(), value);
    }
  }

  fn indirect(&mut self, ind: Indirect) -> u16 {
    match ind {
      Indirect::BC => self.regs.bc(),
      Indirect::DE => self.regs.de(),
      Indirect::HLInc => {
        let hl = self.regs.hl();
        self.regs.hl_inc();
        hl
      }
      Indirect::HLDec => {
        let hl = self.regs.hl();
        self.regs.hl_dec();
        hl
      }
    }
  }

  fn stack_pair(&self, rr: Stack) -> u16 {
    match rr {
      Stack::BC => self.regs.bc(),
      Stack::DE => self.regs.de(),
      Stack::HL => self.regs.hl(),
      Stack::AF => self.regs.af(),
    }
  }

  fn set_stack_pair(&mut self, rr: Stack, value: u16) {
    match rr {
      Stack::BC => self.regs.set_bc(value),
      Stack::DE => self.regs.set_de(value),
      Stack::HL => self.regs.set_hl(value),
      // The low nibble of F does not exist.
      Stack::AF => self.regs.set_af(value),
    }
  }

  pub(crate) fn push<M: Memory>(&mut self, mem: &mut M, value: u16) {
    self.regs.sp = self.regs.sp.wrapping_sub(2);
    mem.ww(self.regs.sp, value);
  }

  pub(crate) fn pop<M: Memory>(&mut self, mem: &M) -> u16 {
    let value = mem.rw(self.regs.sp);
    self.regs.sp = self.regs.sp.wrapping_add(2);
    value
  }

  fn call<M: Memory>(&mut self, mem: &mut M, addr: u16) {
    let ret = self.regs.pc;
    self.push(mem, ret);
    self.regs.pc = addr;
  }

  fn jr(&mut self, e: u8) {
    self.regs.pc = self.regs.pc.wrapping_add(e as i8 as u16);
  }

  pub fn clock(&self) -> Clock {
    self.clock
  }

  pub fn last_clock(&self) -> Clock {
    self.last
  }

  pub fn halted(&self) -> bool {
    self.halt
  }

  pub fn stopped(&self) -> bool {
    self.stop
  }

  pub fn locked(&self) -> bool {
    self.locked
  }

  pub fn interrupts_enabled(&self) -> bool {
    self.ime
  }

  pub fn opcode(&self) -> u8 {
    self.op
  }

  /// Extended opcode of the last instruction, or 0 if it was not prefixed.
  pub fn cb_opcode(&self) -> u8 {
    self.cb_op
  }

  pub fn snapshot(&self) -> Snapshot {
    let r = &self.regs;
    Snapshot {
      a: r.a(),
      f: r.f(),
      b: r.b(),
      c: r.c(),
      d: r.d(),
      e: r.e(),
      h: r.h(),
      l: r.l(),
      sp: r.sp,
      pc: r.pc,
      halted: self.halt,
      stopped: self.stop,
      locked: self.locked,
      interrupts_enabled: self.ime,
      opcode: self.op,
      cb_opcode: self.cb_op,
      clock: self.clock,
      last: self.last,
    }
  }

  /// Load a state saved by `snapshot`. The low nibble of F is dropped.
  pub fn restore(&mut self, s: &Snapshot) {
    self.regs.set_af(u16::from_be_bytes([s.a, s.f]));
    self.regs.set_bc(u16::from_be_bytes([s.b, s.c]));
    self.regs.set_de(u16::from_be_bytes([s.d, s.e]));
    self.regs.set_hl(u16::from_be_bytes([s.h, s.l]));
    self.regs.sp = s.sp;
    self.regs.pc = s.pc;
    self.halt = s.halted;
    self.stop = s.stopped;
    self.locked = s.locked;
    self.ime = s.interrupts_enabled;
    self.op = s.opcode;
    self.cb_op = s.cb_opcode;
    self.clock = s.clock;
    self.last = s.last;
  }
}

impl Default for Cpu {
  fn default() -> Cpu {
    Cpu::new()
  }
}
