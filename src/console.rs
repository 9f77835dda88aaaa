//! The driving loop: CPU instruction, PPU dots, interrupt delivery, audio tick.

use crate::{
    bus::NesBus,
    cartridge::cartridge::Cartridge,
    config::{Config, Timing},
    controller::Controller,
    cpu::cpu::CPU,
    error::EmuError,
};

/// A powered-on console with a cartridge inserted.
pub struct Console {
    cpu: CPU<NesBus>,
    timing: Timing,
}

impl Console {
    /// Build the bus around `cartridge` and reset the CPU through $FFFC.
    pub fn new(cartridge: Cartridge, config: &Config) -> Self {
        let mut cpu = CPU::new(NesBus::new(cartridge));
        cpu.reset();
        Self {
            cpu,
            timing: config.timing,
        }
    }

    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    /// Run one instruction and the PPU dots it owes, then deliver interrupts.
    ///
    /// NMI is edge-triggered: the PPU latch is consumed here, so one VBlank entry raises one NMI.
    /// The cartridge IRQ is level-triggered and retried every step until acknowledged.
    pub fn step(&mut self) -> Result<u32, EmuError> {
        let cycles = self.cpu.step()?;

        for _ in 0..self.timing.ppu_dots(cycles) {
            self.cpu.bus.step_ppu();
        }

        if self.cpu.bus.take_nmi() {
            self.cpu.trigger_nmi();
        } else if self.cpu.bus.irq_pending() {
            self.cpu.trigger_irq();
        }

        self.cpu.bus.step_audio();
        Ok(cycles)
    }

    /// Step until the PPU finishes a frame.
    pub fn run_frame(&mut self) -> Result<(), EmuError> {
        loop {
            self.step()?;
            if self.cpu.bus.take_frame_ready() {
                return Ok(());
            }
        }
    }

    /// Last completed frame, 256×240 0xAARRGGBB pixels.
    pub fn framebuffer(&self) -> &[u32] {
        self.cpu.bus.ppu.framebuffer()
    }

    /// Controller on port 0 ($4016) or 1 ($4017).
    ///
    /// # Panics
    /// If `port` is not 0 or 1.
    pub fn controller_mut(&mut self, port: usize) -> &mut Controller {
        &mut self.cpu.bus.controllers[port]
    }

    pub fn frame_count(&self) -> u64 {
        self.cpu.bus.ppu.frame_count()
    }

    pub fn cpu(&self) -> &CPU<NesBus> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut CPU<NesBus> {
        &mut self.cpu
    }

    pub fn bus(&self) -> &NesBus {
        &self.cpu.bus
    }

    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.cpu.bus
    }
}
