//! Host-facing configuration, capability trait and run-loop types.

use crate::decoder::DecodedOpcode;
use crate::ExpectedTrace;

/// Register state a machine starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum EntryMode {
    /// Zeroed registers, `PC = 0x0000`: run the bootstrap image first.
    #[default]
    Bootstrap,
    /// Post-bootstrap register preset, `PC = 0x0100`.
    Cartridge,
}

/// Construction-time configuration for a [`crate::Machine`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineConfig {
    /// Register state applied at construction.
    pub entry: EntryMode,
    /// Keeps every snapshot line in the trace log. Counting and reference
    /// verification run either way.
    pub record_trace: bool,
    /// Reference trace the first snapshots must reproduce.
    pub expected_trace: Option<ExpectedTrace>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            entry: EntryMode::Bootstrap,
            record_trace: true,
            expected_trace: None,
        }
    }
}

impl MachineConfig {
    /// Configuration that starts at the cartridge entry point.
    #[must_use]
    pub fn cartridge() -> Self {
        Self {
            entry: EntryMode::Cartridge,
            ..Self::default()
        }
    }

    /// Returns this configuration with a reference trace attached.
    #[must_use]
    pub fn with_expected_trace(mut self, expected: ExpectedTrace) -> Self {
        self.expected_trace = Some(expected);
        self
    }
}

/// Joypad button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Button {
    const fn mask(self) -> u8 {
        match self {
            Self::Right => 1 << 0,
            Self::Left => 1 << 1,
            Self::Up => 1 << 2,
            Self::Down => 1 << 3,
            Self::A => 1 << 4,
            Self::B => 1 << 5,
            Self::Select => 1 << 6,
            Self::Start => 1 << 7,
        }
    }
}

/// Input sampled from the host. The core does not consume it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InputState {
    pressed: u8,
}

impl InputState {
    /// Returns this state with `button` held.
    #[must_use]
    pub const fn with_pressed(self, button: Button) -> Self {
        Self {
            pressed: self.pressed | button.mask(),
        }
    }

    /// Returns `true` while `button` is held.
    #[must_use]
    pub const fn is_pressed(self, button: Button) -> bool {
        self.pressed & button.mask() != 0
    }
}

/// Presentation and input capability supplied by the embedding application.
pub trait Host {
    /// Called once when the machine starts.
    fn startup(&mut self);

    /// Receives a rendered frame. Its layout is not defined by the core.
    fn update_screen(&mut self, frame: &[u8]);

    /// Samples the current input.
    fn get_input(&mut self) -> InputState;
}

/// Host with no output and no input. Counts the calls it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeadlessHost {
    /// Number of `startup` calls.
    pub startups: u32,
    /// Number of frames received.
    pub frames: u32,
    /// Number of input polls.
    pub input_polls: u32,
}

impl Host for HeadlessHost {
    fn startup(&mut self) {
        self.startups += 1;
    }

    fn update_screen(&mut self, _frame: &[u8]) {
        self.frames += 1;
    }

    fn get_input(&mut self) -> InputState {
        self.input_polls += 1;
        InputState::default()
    }
}

/// Result of one executed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepOutcome {
    /// The opcode that ran.
    pub opcode: DecodedOpcode,
    /// Cycles consumed.
    pub cycles: u8,
    /// `true` when a conditional branch was taken.
    pub branch_taken: bool,
}

/// Where [`crate::Machine::run`] stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunBoundary {
    /// After this many instructions.
    Steps(u64),
    /// Before executing the instruction at this address.
    ProgramCounter(u16),
    /// Only on a fatal error.
    Unbounded,
}

/// Totals for one [`crate::Machine::run`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RunOutcome {
    /// Instructions executed.
    pub steps: u64,
    /// Cycles consumed.
    pub cycles: u64,
}

#[cfg(test)]
mod tests {
    use super::{Button, EntryMode, HeadlessHost, Host, InputState, MachineConfig};
    use crate::ExpectedTrace;

    #[test]
    fn default_config_runs_the_bootstrap_and_records() {
        let config = MachineConfig::default();
        assert_eq!(config.entry, EntryMode::Bootstrap);
        assert!(config.record_trace);
        assert!(config.expected_trace.is_none());
    }

    #[test]
    fn cartridge_config_keeps_other_defaults() {
        let reference = ExpectedTrace::parse("x");
        let config = MachineConfig::cartridge().with_expected_trace(reference);
        assert_eq!(config.entry, EntryMode::Cartridge);
        assert!(config.record_trace);
        assert_eq!(config.expected_trace.map(|trace| trace.len()), Some(1));
    }

    #[test]
    fn headless_host_counts_calls() {
        let mut host = HeadlessHost::default();
        host.startup();
        host.update_screen(&[0; 4]);
        host.update_screen(&[]);
        assert_eq!(host.get_input(), InputState::default());
        assert_eq!(
            host,
            HeadlessHost {
                startups: 1,
                frames: 2,
                input_polls: 1
            }
        );
    }

    #[test]
    fn input_buttons_are_independent() {
        let input = InputState::default()
            .with_pressed(Button::A)
            .with_pressed(Button::Start);
        assert!(input.is_pressed(Button::A));
        assert!(input.is_pressed(Button::Start));
        assert!(!input.is_pressed(Button::B));
    }
}
