// File: src/interpreter/control_flow.rs
//
// Break signal for the walker.
//
// A `dip` sets the signal and unwinds block frames up to the nearest loop,
// switch or try frame. Blocks stop running statements while the signal is
// pending. A loop or switch takes the signal and stops; a try only takes it
// when no loop or switch encloses it.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ControlFlow {
    /// Normal execution, continue to next statement
    #[default]
    Normal,
    /// A break is propagating towards its target frame
    Break,
}

impl ControlFlow {
    pub(crate) fn is_break(self) -> bool {
        self == ControlFlow::Break
    }

    /// Reports whether a break was pending and clears it
    pub(crate) fn take_break(&mut self) -> bool {
        std::mem::take(self) == ControlFlow::Break
    }
}
