#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum Error {
  #[error("image of {len} bytes does not fit at origin 0x{origin:04x}")]
  ImageTooLarge { origin: u16, len: usize },
}
