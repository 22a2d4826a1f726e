mod ram;

pub use self::ram::Ram;

/// The flat 16-bit address space seen by the CPU.
///
/// Only the byte primitives are required. Word accesses are little-endian and
/// built from them, so an implementation with side effects on access sees
/// exactly the byte traffic the CPU generates.
pub trait Memory {
  /// Read a byte at address `addr`.
  fn rb(&self, addr: u16) -> u8;

  /// Write `value` at address `addr`.
  fn wb(&mut self, addr: u16, value: u8);

  /// Read a 2-byte little-endian word from `addr`.
  fn rw(&self, addr: u16) -> u16 {
    let lo = u16::from(self.rb(addr));
    let hi = u16::from(self.rb(addr.wrapping_add(1)));
    (hi << 8) | lo
  }

  /// Write a 2-byte little-endian word to `addr`.
  fn ww(&mut self, addr: u16, value: u16) {
    self.wb(addr, (value & 0xff) as u8);
    self.wb(addr.wrapping_add(1), (value >> 8) as u8);
  }

  /// Vector of the highest-priority interrupt waiting to be serviced.
  ///
  /// Interrupt controller wiring lives outside the core. The default never
  /// raises anything.
  fn pending_interrupt(&self) -> Option<u16> {
    None
  }

  /// Called once the CPU has committed to servicing `vector`.
  fn acknowledge_interrupt(&mut self, _vector: u16) {}
}
