#[macro_use]
extern crate log;

use std::fs;

use anyhow::{bail, Context, Result};
use clap::{App, Arg};

use gb_cpu::{Cpu, Ram};

/// Parse a number given either as decimal or as 0x-prefixed hex.
fn parse_num(s: &str) -> Result<u64> {
  let value = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
    u64::from_str_radix(hex, 16)
  } else {
    s.parse()
  };
  value.with_context(|| format!("invalid number: {}", s))
}

fn parse_addr(s: &str) -> Result<u16> {
  let value = parse_num(s)?;
  if value > 0xffff {
    bail!("address out of range: {}", s);
  }
  Ok(value as u16)
}

fn main() -> Result<()> {
  env_logger::init();

  let matches = App::new("gb-cpu-run")
    .about("Runs a raw memory image on the CPU core and prints its final state")
    .arg(
      Arg::with_name("IMAGE")
        .help("Raw image to load")
        .required(true)
        .index(1),
    )
    .arg(
      Arg::with_name("origin")
        .long("origin")
        .takes_value(true)
        .default_value("0")
        .help("Address the image is loaded at"),
    )
    .arg(
      Arg::with_name("pc")
        .long("pc")
        .takes_value(true)
        .default_value("0x0100")
        .help("Entry point"),
    )
    .arg(
      Arg::with_name("cycles")
        .long("cycles")
        .takes_value(true)
        .default_value("17556")
        .help("Machine cycle budget"),
    )
    .get_matches();

  // Defaulted arguments are always present.
  let path = matches.value_of("IMAGE").unwrap_or_default();
  let origin = parse_addr(matches.value_of("origin").unwrap_or("0"))?;
  let pc = parse_addr(matches.value_of("pc").unwrap_or("0x0100"))?;
  let budget = parse_num(matches.value_of("cycles").unwrap_or("17556"))?;
  if budget > u64::from(u32::max_value()) {
    bail!("cycle budget too large: {}", budget);
  }

  let image = fs::read(path).with_context(|| format!("failed to read {}", path))?;
  let mut mem = Ram::new();
  mem
    .load(origin, &image)
    .with_context(|| format!("failed to load {}", path))?;

  let mut cpu = Cpu::new();
  cpu.reset();
  cpu.regs.pc = pc;
  let spent = cpu.run(&mut mem, budget as u32);
  info!("spent {} machine cycles", spent);

  println!("{}", serde_json::to_string_pretty(&cpu.snapshot())?);
  Ok(())
}
