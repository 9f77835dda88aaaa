//! NES controller input handling.
//!
//! Implements the standard NES controller shift register protocol:
//! write $01 to $4016 to latch current state; then read $4016/$4017 repeatedly
//! to get one bit per read (A, B, Select, Start, Up, Down, Left, Right).

/// Buttons in shift-out order; the discriminant is the bit in the state byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    A = 0,
    B = 1,
    Select = 2,
    Start = 3,
    Up = 4,
    Down = 5,
    Left = 6,
    Right = 7,
}

/// A single NES controller on port 1 ($4016) or port 2 ($4017).
#[derive(Clone, Debug, Default)]
pub struct Controller {
    /// Live button states: bit 0 = A, 1 = B, 2 = Select, 3 = Start, 4 = Up, 5 = Down, 6 = Left, 7 = Right.
    state: u8,
    /// Shift register: latched from `state`; shifted out LSB-first on read, 1s fill in behind.
    shift: u8,
    /// Bits left before the register runs dry.
    remaining: u8,
    strobe: bool,
}

impl Controller {
    /// Create a new controller with no buttons pressed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        let bit = 1 << button as u8;
        if pressed {
            self.state |= bit;
        } else {
            self.state &= !bit;
        }
        if self.strobe {
            self.latch();
        }
    }

    /// Replace all eight buttons at once (front ends polling a whole keyboard).
    pub fn set_buttons(&mut self, state: u8) {
        self.state = state;
        if self.strobe {
            self.latch();
        }
    }

    pub fn buttons(&self) -> u8 {
        self.state
    }

    /// Read one button state. While strobe is high this is always the live A button; otherwise
    /// each read advances the shift, and after eight reads the line reads 1.
    pub fn read(&mut self) -> u8 {
        if self.strobe {
            return self.state & 1;
        }
        if self.remaining == 0 {
            return 1;
        }
        let bit = self.shift & 1;
        self.shift >>= 1;
        self.remaining -= 1;
        bit
    }

    /// Write to $4016. Bit 0 high holds the register on the live state; the falling edge leaves
    /// the last snapshot ready to shift out.
    pub fn write(&mut self, data: u8) {
        self.strobe = data & 1 != 0;
        if self.strobe {
            self.latch();
        }
    }

    fn latch(&mut self) {
        self.shift = self.state;
        self.remaining = 8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(c: &mut Controller, n: usize) -> Vec<u8> {
        (0..n).map(|_| c.read()).collect()
    }

    #[test]
    fn shifts_lsb_first_then_reads_one() {
        let mut c = Controller::new();
        c.set_button(Button::A, true);
        c.set_button(Button::Start, true);
        c.set_button(Button::Right, true);
        c.write(1);
        c.write(0);
        assert_eq!(read_all(&mut c, 10), [1, 0, 0, 1, 0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn strobe_high_returns_live_a() {
        let mut c = Controller::new();
        c.write(1);
        assert_eq!(c.read(), 0);
        c.set_button(Button::A, true);
        assert_eq!(read_all(&mut c, 3), [1, 1, 1]);
    }

    #[test]
    fn snapshot_is_frozen_after_strobe_falls() {
        let mut c = Controller::new();
        c.set_buttons(0b0000_0010);
        c.write(1);
        c.write(0);
        c.set_buttons(0xFF);
        assert_eq!(read_all(&mut c, 2), [0, 1]);
        assert_eq!(c.buttons(), 0xFF);
    }

    #[test]
    fn unlatched_controller_reads_one() {
        let mut c = Controller::new();
        assert_eq!(c.read(), 1);
    }
}
