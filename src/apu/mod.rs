//! NES APU seam.
//!
//! Sound synthesis lives outside this crate. The bus only needs something that answers the
//! $4000–$4017 register window and can be stepped with a read-only view of console RAM (for
//! DMC-style sample fetches). [`apu::ApuRegisters`] is the default register latch.

pub mod apu;
