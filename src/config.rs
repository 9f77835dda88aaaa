//! Run-time options shared by the console and the binary.

use clap::ValueEnum;

/// How many PPU dots run per CPU step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Timing {
    /// Three dots per instruction, whatever it costs.
    #[default]
    Instruction,
    /// Three dots per CPU cycle the instruction consumed.
    Cycle,
}

impl Timing {
    /// PPU dots owed for an instruction that took `cycles` CPU cycles.
    pub fn ppu_dots(self, cycles: u32) -> u32 {
        match self {
            Timing::Instruction => 3,
            Timing::Cycle => cycles * 3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub timing: Timing,
    /// Integer window scale (1 = 256×240).
    pub scale: usize,
    /// Stop after this many frames.
    pub frame_limit: Option<u64>,
    /// Run without opening a window.
    pub headless: bool,
    /// Write battery-backed PRG RAM to `<rom>.sav` on exit.
    pub save_battery: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timing: Timing::Instruction,
            scale: 2,
            frame_limit: None,
            headless: false,
            save_battery: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.timing, Timing::Instruction);
        assert_eq!(config.scale, 2);
        assert_eq!(config.frame_limit, None);
        assert!(!config.headless);
        assert!(config.save_battery);
    }

    #[test]
    fn dots_per_step() {
        assert_eq!(Timing::Instruction.ppu_dots(7), 3);
        assert_eq!(Timing::Cycle.ppu_dots(2), 6);
        assert_eq!(Timing::Cycle.ppu_dots(7), 21);
    }

    #[test]
    fn timing_parses_from_command_line_names() {
        assert_eq!(Timing::from_str("cycle", true), Ok(Timing::Cycle));
        assert_eq!(Timing::from_str("instruction", true), Ok(Timing::Instruction));
        assert!(Timing::from_str("dot", true).is_err());
    }
}
