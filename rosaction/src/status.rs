//! Mirror of `actionlib_msgs/GoalStatus` usable without generated
//! message types.

use crate::error::Error;

/// Status of one goal as carried on the result, feedback and status
/// topics of an action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalStatus {
    pub goal_id: String,
    pub code: u8,
    pub text: String,
}

impl GoalStatus {
    pub const PENDING: u8 = 0;
    pub const ACTIVE: u8 = 1;
    pub const PREEMPTED: u8 = 2;
    pub const SUCCEEDED: u8 = 3;
    pub const ABORTED: u8 = 4;
    pub const REJECTED: u8 = 5;
    pub const PREEMPTING: u8 = 6;
    pub const RECALLING: u8 = 7;
    pub const RECALLED: u8 = 8;
    pub const LOST: u8 = 9;

    pub fn state(&self) -> Option<GoalState> {
        GoalState::from_code(self.code)
    }
}

/// The status codes as an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalState {
    Pending,
    Active,
    Preempted,
    Succeeded,
    Aborted,
    Rejected,
    Preempting,
    Recalling,
    Recalled,
    Lost,
}

impl GoalState {
    /// `None` for codes outside the protocol.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            GoalStatus::PENDING => Self::Pending,
            GoalStatus::ACTIVE => Self::Active,
            GoalStatus::PREEMPTED => Self::Preempted,
            GoalStatus::SUCCEEDED => Self::Succeeded,
            GoalStatus::ABORTED => Self::Aborted,
            GoalStatus::REJECTED => Self::Rejected,
            GoalStatus::PREEMPTING => Self::Preempting,
            GoalStatus::RECALLING => Self::Recalling,
            GoalStatus::RECALLED => Self::Recalled,
            GoalStatus::LOST => Self::Lost,
            _ => return None,
        })
    }

    /// Whether the goal can no longer change state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Preempted
                | Self::Succeeded
                | Self::Aborted
                | Self::Rejected
                | Self::Recalled
                | Self::Lost
        )
    }
}

/// Maps a result publication to the outcome `wait_for_result` reports.
pub(crate) fn result_outcome<T>(status: &GoalStatus, result: T) -> Result<T, Error> {
    match status.code {
        GoalStatus::SUCCEEDED => Ok(result),
        GoalStatus::PREEMPTED => Err(Error::ActionResultPreempted(format!("{status:?}"))),
        _ => Err(Error::ActionResultNotSuccess(format!("{status:?}"))),
    }
}
