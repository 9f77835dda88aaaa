//! APU register window ($4000–$4017).
//!
//! See [APU registers](https://www.nesdev.org/wiki/APU_registers). $4016 reads and writes never
//! arrive here (controller port); $4017 writes do (frame counter).

/// Audio collaborator driven by the bus.
pub trait AudioUnit {
    /// Register read; $4015 is the only readable APU register on hardware.
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, data: u8);
    /// Called once per CPU instruction with the 2 KiB of console RAM.
    fn step(&mut self, ram: &[u8]);
}

/// Latches register writes without producing sound.
#[derive(Clone, Debug)]
pub struct ApuRegisters {
    regs: [u8; 0x18],
    steps: u64,
}

impl Default for ApuRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl ApuRegisters {
    pub fn new() -> Self {
        Self {
            regs: [0; 0x18],
            steps: 0,
        }
    }

    /// Last value written to `addr` in $4000–$4017.
    pub fn register(&self, addr: u16) -> Option<u8> {
        let i = addr.checked_sub(0x4000)? as usize;
        self.regs.get(i).copied()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl AudioUnit for ApuRegisters {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            // Channel enable bits: pulse 1/2, triangle, noise, DMC
            0x4015 => self.regs[0x15] & 0x1F,
            _ => 0,
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        if let Some(r) = addr
            .checked_sub(0x4000)
            .and_then(|i| self.regs.get_mut(i as usize))
        {
            *r = data;
        }
    }

    fn step(&mut self, _ram: &[u8]) {
        self.steps += 1;
    }
}
