//! Mock robot state and reply rules

use crate::protocol::{acknowledges_eom, codes, static_answers, Response};

/// Text confirming a cleared error
pub const ERROR_RESET_TEXT: &str = "The error was reset.";

/// Text when there was nothing to clear
pub const NO_ERROR_TEXT: &str = "There was no error to reset.";

/// Reply to a command the controller does not know
pub const UNKNOWN_COMMAND: u16 = 1000;
pub const UNKNOWN_COMMAND_TEXT: &str = "Command not recognized.";

/// Commands accepted without a dedicated reply
const ACK_ONLY_COMMANDS: &[&str] = &[
    "Delay",
    "GripperClose",
    "GripperOpen",
    "MoveLinRelTRF",
    "MoveLinRelWRF",
    "SetAutoConf",
    "SetBlending",
    "SetCartAcc",
    "SetCartAngVel",
    "SetCartLinVel",
    "SetConf",
    "SetGripperForce",
    "SetGripperVel",
    "SetJointAcc",
    "SetJointVel",
    "SetTRF",
    "SetVelTimeout",
    "SetWRF",
];

/// Simulated controller state
///
/// Starts deactivated, unhomed, with both acks enabled.
#[derive(Debug, Clone)]
pub struct MockRobot {
    eob: bool,
    eom: bool,
    activated: bool,
    homed: bool,
    in_error: bool,
    sim: bool,
    paused: bool,
    joints: [f64; 6],
    pose: [f64; 6],
    conf: [i64; 3],
}

impl Default for MockRobot {
    fn default() -> Self {
        Self {
            eob: true,
            eom: true,
            activated: false,
            homed: false,
            in_error: false,
            sim: false,
            paused: false,
            joints: [0.0; 6],
            pose: [190.0, 0.0, 308.0, 0.0, 90.0, 0.0],
            conf: [1, 1, 1],
        }
    }
}

impl MockRobot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the error state, as a failed motion would
    pub fn inject_error(&mut self) {
        self.in_error = true;
    }

    pub fn is_in_error(&self) -> bool {
        self.in_error
    }

    pub fn joints(&self) -> [f64; 6] {
        self.joints
    }

    /// Replies for one command text (terminator already stripped)
    ///
    /// Commands with a fixed answer get exactly that one frame, whatever
    /// the ack flags. `PauseMotion` gets 2042, preceded by 3004 while EOM is
    /// on. Motion and parameter commands get only the acks enabled at that
    /// moment, which may be none at all.
    pub fn respond(&mut self, text: &str) -> Vec<Response> {
        let (name, args) = split_command(text);

        if self.in_error && name != "ResetError" && !name.starts_with("Get") {
            return vec![Response::new(1011, "The robot is in error.")];
        }

        if static_answers(name).is_some() {
            return vec![self.answer(name, &args)];
        }

        match name {
            "PauseMotion" => {
                self.paused = true;
                let mut replies = Vec::new();
                if self.eom {
                    replies.push(Response::new(codes::EOM_ACK, "End of movement."));
                }
                replies.push(Response::new(codes::MOTION_PAUSED, "Motion paused."));
                replies
            }
            "MoveJoints" | "MovePose" | "MoveLin" => self.move_to(name, &args),
            _ if ACK_ONLY_COMMANDS.iter().any(|c| *c == name) => self.acks(name),
            _ => {
                tracing::debug!("Unrecognized command '{}'", name);
                self.in_error = true;
                vec![Response::new(UNKNOWN_COMMAND, UNKNOWN_COMMAND_TEXT)]
            }
        }
    }

    fn answer(&mut self, name: &str, args: &[f64]) -> Response {
        match name {
            "ActivateRobot" if self.activated => {
                Response::new(codes::MOTORS_ALREADY_ACTIVATED, "Motors already activated.")
            }
            "ActivateRobot" => {
                self.activated = true;
                Response::new(codes::MOTORS_ACTIVATED, "Motors activated.")
            }
            "DeactivateRobot" => {
                self.activated = false;
                self.homed = false;
                Response::new(codes::MOTORS_DEACTIVATED, "Motors deactivated.")
            }
            "Home" if self.homed => Response::new(codes::HOMING_ALREADY_DONE, "Homing already done."),
            "Home" if !self.activated => {
                self.in_error = true;
                Response::new(1006, "Motors are not activated.")
            }
            "Home" => {
                self.homed = true;
                Response::new(codes::HOMING_DONE, "Homing done.")
            }
            "ResetError" if self.in_error => {
                self.in_error = false;
                Response::new(codes::ERROR_RESET, ERROR_RESET_TEXT)
            }
            "ResetError" => Response::new(codes::NO_ERROR_TO_RESET, NO_ERROR_TEXT),
            "ActivateSim" => {
                self.sim = true;
                Response::new(codes::SIM_ACTIVATED, "The simulation mode is enabled.")
            }
            "DeactivateSim" => {
                self.sim = false;
                Response::new(codes::SIM_DEACTIVATED, "The simulation mode is disabled.")
            }
            "BrakesOn" => Response::new(codes::BRAKES_ON, "Brakes activated."),
            "BrakesOff" => Response::new(codes::BRAKES_OFF, "Brakes deactivated."),
            "ClearMotion" => Response::new(codes::MOTION_CLEARED, "The motion was cleared."),
            "ResumeMotion" => {
                self.paused = false;
                Response::new(codes::MOTION_RESUMED, "Motion resumed.")
            }
            "SetEOB" => {
                self.eob = flag_arg(args);
                if self.eob {
                    Response::new(codes::EOB_ENABLED, "End of block is enabled.")
                } else {
                    Response::new(codes::EOB_DISABLED, "End of block is disabled.")
                }
            }
            "SetEOM" => {
                self.eom = flag_arg(args);
                if self.eom {
                    Response::new(codes::EOM_ENABLED, "End of movement is enabled.")
                } else {
                    Response::new(codes::EOM_DISABLED, "End of movement is disabled.")
                }
            }
            "GetJoints" => Response::new(codes::JOINTS, join_floats(&self.joints)),
            "GetPose" => Response::new(codes::POSE, join_floats(&self.pose)),
            "GetConf" => Response::new(codes::CONF, join_ints(&self.conf)),
            "GetStatusRobot" => {
                let status = [
                    self.activated as i64,
                    self.homed as i64,
                    self.sim as i64,
                    self.in_error as i64,
                    self.paused as i64,
                    self.eob as i64,
                    self.eom as i64,
                ];
                Response::new(codes::STATUS_ROBOT, join_ints(&status))
            }
            "GetStatusGripper" => Response::new(codes::STATUS_GRIPPER, "0,0,0,0,0,0"),
            "GetFwVersion" => Response::new(codes::FW_VERSION, "v8.3.0"),
            "GetProductType" => Response::new(codes::PRODUCT_TYPE, "Meca500"),
            // Table entry without a handler above
            _ => Response::new(UNKNOWN_COMMAND, UNKNOWN_COMMAND_TEXT),
        }
    }

    fn move_to(&mut self, name: &str, args: &[f64]) -> Vec<Response> {
        if !self.activated || !self.homed {
            self.in_error = true;
            return vec![Response::new(1005, "The robot is not homed.")];
        }

        let Ok(target) = <[f64; 6]>::try_from(args) else {
            self.in_error = true;
            return vec![Response::new(
                1006,
                format!("{} expects 6 arguments, got {}", name, args.len()),
            )];
        };

        if name == "MoveJoints" {
            self.joints = target;
        } else {
            self.pose = target;
        }

        self.acks(name)
    }

    fn acks(&self, name: &str) -> Vec<Response> {
        let mut replies = Vec::new();
        if self.eom && acknowledges_eom(name) {
            replies.push(Response::new(codes::EOM_ACK, "End of movement."));
        }
        if self.eob {
            replies.push(Response::new(codes::EOB_ACK, "End of block."));
        }
        replies
    }
}

/// Split `Name(a,b,c)` into the name and its numeric arguments
///
/// Non-numeric arguments are dropped; the mock only needs numbers.
fn split_command(text: &str) -> (&str, Vec<f64>) {
    let Some((name, rest)) = text.split_once('(') else {
        return (text.trim(), Vec::new());
    };

    let inner = rest.strip_suffix(')').unwrap_or(rest);
    let args = inner
        .split(',')
        .filter_map(|a| a.trim().parse::<f64>().ok())
        .collect();

    (name.trim(), args)
}

fn flag_arg(args: &[f64]) -> bool {
    args.first().map_or(true, |v| *v != 0.0)
}

fn join_floats(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{:.3}", v))
        .collect::<Vec<_>>()
        .join(",")
}

fn join_ints(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
