//! Answer code table
//!
//! Which response codes a command may produce given the acknowledgement
//! flags. The session never consults this to gate sends; it is published
//! for callers that want to match replies to commands.

use super::codes;

/// Acknowledgement flags that affect the answer set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AckFlags {
    pub eob: bool,
    pub eom: bool,
}

impl AckFlags {
    pub fn new(eob: bool, eom: bool) -> Self {
        Self { eob, eom }
    }
}

/// Commands whose answers do not depend on the flags
const STATIC_ANSWERS: &[(&str, &[u16])] = &[
    ("ActivateRobot", &[codes::MOTORS_ACTIVATED, codes::MOTORS_ALREADY_ACTIVATED]),
    ("ActivateSim", &[codes::SIM_ACTIVATED]),
    ("BrakesOff", &[codes::BRAKES_OFF]),
    ("BrakesOn", &[codes::BRAKES_ON]),
    ("ClearMotion", &[codes::MOTION_CLEARED]),
    ("DeactivateRobot", &[codes::MOTORS_DEACTIVATED]),
    ("DeactivateSim", &[codes::SIM_DEACTIVATED]),
    ("GetConf", &[codes::CONF]),
    ("GetFwVersion", &[codes::FW_VERSION]),
    ("GetJoints", &[codes::JOINTS]),
    ("GetPose", &[codes::POSE]),
    ("GetProductType", &[codes::PRODUCT_TYPE]),
    ("GetStatusGripper", &[codes::STATUS_GRIPPER]),
    ("GetStatusRobot", &[codes::STATUS_ROBOT]),
    ("Home", &[codes::HOMING_DONE, codes::HOMING_ALREADY_DONE]),
    ("ResetError", &[codes::ERROR_RESET, codes::NO_ERROR_TO_RESET]),
    ("ResumeMotion", &[codes::MOTION_RESUMED]),
    ("SetEOB", &[codes::EOB_ENABLED, codes::EOB_DISABLED]),
    ("SetEOM", &[codes::EOM_ENABLED, codes::EOM_DISABLED]),
];

/// Motion and parameter commands that receive an end-of-movement ack
const EOM_COMMANDS: &[&str] = &[
    "MoveJoints",
    "MoveLin",
    "MoveLinRelTRF",
    "MoveLinRelWRF",
    "MovePose",
    "SetCartAcc",
    "SetJointAcc",
    "SetTRF",
    "SetWRF",
];

const PAUSE_MOTION: &str = "PauseMotion";

/// Flag-independent answers for `command`, if it has any
pub fn static_answers(command: &str) -> Option<&'static [u16]> {
    STATIC_ANSWERS
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, answers)| *answers)
}

/// Every command with a flag-independent answer set
pub fn static_commands() -> impl Iterator<Item = &'static str> {
    STATIC_ANSWERS.iter().map(|(name, _)| *name)
}

/// Whether the controller sends an end-of-movement ack for `command`
pub fn acknowledges_eom(command: &str) -> bool {
    EOM_COMMANDS.iter().any(|name| *name == command)
}

/// Codes a reply to `command` may carry under `flags`
///
/// Acks are prepended as they are added, so with both flags on a motion
/// command yields `[3004, 3012]`.
pub fn answer_codes(command: &str, flags: AckFlags) -> Vec<u16> {
    if let Some(answers) = static_answers(command) {
        return answers.to_vec();
    }

    let mut answers = Vec::new();

    if command == PAUSE_MOTION {
        answers.push(codes::MOTION_PAUSED);
        if flags.eom {
            answers.insert(0, codes::EOM_ACK);
        }
        return answers;
    }

    if flags.eob {
        answers.insert(0, codes::EOB_ACK);
    }
    if flags.eom && acknowledges_eom(command) {
        answers.insert(0, codes::EOM_ACK);
    }

    answers
}
