//! Shared status reporting for user-triggered actions.
//!
//! Uploads, exports and ticket submissions all follow the same lifecycle:
//! idle, a working phase with a short label, then a success or error
//! message. Views map the variants onto their status line classes.

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActionStatus {
    #[default]
    Idle,
    Working(&'static str),
    Done(String),
    Error(String),
}

impl ActionStatus {
    pub fn is_working(&self) -> bool {
        matches!(self, ActionStatus::Working(_))
    }
}

/// Claims an idle busy flag, reporting whether the caller got it.
///
/// Handlers bail out when this returns `false`, so a double-click cannot
/// start a second run of the same action.
pub fn begin_if_idle(busy: &mut bool) -> bool {
    if *busy {
        return false;
    }
    *busy = true;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_claims_an_idle_flag_once() {
        let mut busy = false;
        assert!(begin_if_idle(&mut busy));
        assert!(busy);
        assert!(!begin_if_idle(&mut busy));
    }

    #[test]
    fn begin_claims_again_after_release() {
        let mut busy = false;
        assert!(begin_if_idle(&mut busy));
        busy = false;
        assert!(begin_if_idle(&mut busy));
    }

    #[test]
    fn only_the_working_variant_reads_as_busy() {
        assert!(ActionStatus::Working("Preparing").is_working());
        assert!(!ActionStatus::Idle.is_working());
        assert!(!ActionStatus::Done("ok".to_string()).is_working());
        assert!(!ActionStatus::Error("no".to_string()).is_working());
    }
}
