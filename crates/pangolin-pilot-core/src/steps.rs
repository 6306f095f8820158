//! Step navigator
//!
//! The wizard renders one step at a time from a fixed ordered list. The
//! cursor is a plain index; the only rule beyond bounds is that jumping
//! past the early steps requires the two mandatory fields to be set.

/// Ordered wizard steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    Welcome,
    MediaServer,
    Storage,
    MediaAutomation,
    DownloadTools,
    ContentEnhancement,
    Monitoring,
    ServiceSettings,
    Review,
}

pub const ALL_STEPS: [SetupStep; 9] = [
    SetupStep::Welcome,
    SetupStep::MediaServer,
    SetupStep::Storage,
    SetupStep::MediaAutomation,
    SetupStep::DownloadTools,
    SetupStep::ContentEnhancement,
    SetupStep::Monitoring,
    SetupStep::ServiceSettings,
    SetupStep::Review,
];

/// Steps reachable by direct jump regardless of configuration state
const FREE_JUMP_STEPS: usize = 3;

impl SetupStep {
    pub fn title(&self) -> &'static str {
        match self {
            SetupStep::Welcome => "Welcome",
            SetupStep::MediaServer => "Media Server",
            SetupStep::Storage => "Storage",
            SetupStep::MediaAutomation => "Media Automation",
            SetupStep::DownloadTools => "Download Tools",
            SetupStep::ContentEnhancement => "Content Enhancement",
            SetupStep::Monitoring => "Monitoring",
            SetupStep::ServiceSettings => "Service Settings",
            SetupStep::Review => "Review & Deploy",
        }
    }
}

/// Position in the step list. Invariant: `index < ALL_STEPS.len()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepCursor {
    index: usize,
}

impl StepCursor {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> SetupStep {
        ALL_STEPS[self.index]
    }

    /// 1-based step number for the header
    pub fn step_number(&self) -> usize {
        self.index + 1
    }

    pub fn total_steps() -> usize {
        ALL_STEPS.len()
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index == ALL_STEPS.len() - 1
    }

    /// Move forward one step; no-op on the last step
    pub fn advance(&mut self) {
        if !self.is_last() {
            self.index += 1;
        }
    }

    /// Move back one step; no-op on the first step
    pub fn retreat(&mut self) {
        if !self.is_first() {
            self.index -= 1;
        }
    }

    /// Jump directly to a step. The first three steps are always reachable;
    /// later steps only once the mandatory fields are set. Out-of-range or
    /// disallowed jumps are silent no-ops. Returns whether the jump happened.
    pub fn jump_to(&mut self, index: usize, mandatory_set: bool) -> bool {
        if index >= ALL_STEPS.len() {
            return false;
        }
        if index >= FREE_JUMP_STEPS && !mandatory_set {
            return false;
        }
        self.index = index;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_stops_at_last_step() {
        let mut cursor = StepCursor::default();
        for _ in 0..ALL_STEPS.len() * 2 {
            cursor.advance();
        }
        assert!(cursor.is_last());
        assert_eq!(cursor.current(), SetupStep::Review);
    }

    #[test]
    fn retreat_stops_at_first_step() {
        let mut cursor = StepCursor::default();
        cursor.retreat();
        assert!(cursor.is_first());
        assert_eq!(cursor.current(), SetupStep::Welcome);
    }

    #[test]
    fn early_jumps_always_succeed() {
        let mut cursor = StepCursor::default();
        for index in 0..3 {
            assert!(cursor.jump_to(index, false));
            assert_eq!(cursor.index(), index);
        }
    }

    #[test]
    fn late_jumps_require_mandatory_fields() {
        let mut cursor = StepCursor::default();
        assert!(!cursor.jump_to(3, false));
        assert_eq!(cursor.index(), 0);

        assert!(cursor.jump_to(3, true));
        assert_eq!(cursor.index(), 3);
    }

    #[test]
    fn out_of_range_jump_is_a_no_op() {
        let mut cursor = StepCursor::default();
        assert!(!cursor.jump_to(ALL_STEPS.len(), true));
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn step_numbers_are_one_based() {
        let cursor = StepCursor::default();
        assert_eq!(cursor.step_number(), 1);
        assert_eq!(StepCursor::total_steps(), 9);
    }
}
