use crate::MachineError;

/// Execution state of a machine as seen by its driver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunState {
    /// Constructed but `start` has not recorded the entry snapshot yet.
    #[default]
    Idle,
    /// Ready to execute the next instruction.
    Running,
    /// A fatal error stopped the run; every further step reports it again.
    FaultLatched(MachineError),
}

impl RunState {
    /// Returns the latched error, if this state is fault-latched.
    #[must_use]
    pub const fn latched_fault(&self) -> Option<&MachineError> {
        match self {
            Self::FaultLatched(cause) => Some(cause),
            Self::Idle | Self::Running => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RunState;
    use crate::{MachineError, OpcodeBank};

    #[test]
    fn run_state_default_is_idle() {
        assert_eq!(RunState::default(), RunState::Idle);
    }

    #[test]
    fn latched_fault_accessor_reports_only_fault_latched_variant() {
        assert_eq!(RunState::Idle.latched_fault(), None);
        assert_eq!(RunState::Running.latched_fault(), None);

        let cause = MachineError::UnimplementedOpcode {
            bank: OpcodeBank::Default,
            opcode: 0xD3,
            pc: 0x0150,
        };
        assert_eq!(
            RunState::FaultLatched(cause.clone()).latched_fault(),
            Some(&cause)
        );
    }
}
