use crate::error::Error;
use crate::mem::Memory;

const RAM_SIZE: usize = 0x10000;

/// 64 KiB of plain read/write memory with no mapped devices.
#[derive(Clone)]
pub struct Ram {
  bytes: Vec<u8>,
}

impl Ram {
  pub fn new() -> Self {
    Self {
      bytes: vec![0; RAM_SIZE],
    }
  }

  /// Copy `image` into memory starting at `origin`.
  ///
  /// Nothing is written unless the whole image fits below 0x10000.
  pub fn load(&mut self, origin: u16, image: &[u8]) -> Result<(), Error> {
    let start = origin as usize;
    if image.len() > RAM_SIZE - start {
      return Err(Error::ImageTooLarge {
        origin,
        len: image.len(),
      });
    }
    self.bytes[start..start + image.len()].copy_from_slice(image);
    debug!("loaded {} bytes at 0x{:04x}", image.len(), origin);
    Ok(())
  }
}

impl Default for Ram {
  fn default() -> Self {
    Self::new()
  }
}

impl Memory for Ram {
  fn rb(&self, addr: u16) -> u8 {
    self.bytes[addr as usize]
  }

  fn wb(&mut self, addr: u16, value: u8) {
    self.bytes[addr as usize] = value;
  }
}
