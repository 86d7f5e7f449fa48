//! Robot command surface
//!
//! One method per controller command. Each builds the named command with
//! its arguments in order and hands it to [`Client::run`]. Ranges noted
//! below are enforced by the controller, not here.
//!
//! Units: joint angles in degrees, positions in millimetres, orientations
//! as XYZ Euler angles in degrees.

use crate::client::Client;
use crate::error::Result;
use crate::protocol::Arg;
use crate::session::Outcome;

/// Six joint angles or a six-component pose
pub type Vector6 = [f64; 6];

fn floats(values: &[f64]) -> Vec<Arg> {
    values.iter().copied().map(Arg::from).collect()
}

impl Client {
    // =========================================================================
    // Robot state
    // =========================================================================

    pub fn activate_robot(&self) -> Result<Outcome> {
        self.run("ActivateRobot", &[])
    }

    pub fn deactivate_robot(&self) -> Result<Outcome> {
        self.run("DeactivateRobot", &[])
    }

    /// Enter simulation mode (motors stay off, motion is simulated)
    pub fn activate_sim(&self) -> Result<Outcome> {
        self.run("ActivateSim", &[])
    }

    pub fn deactivate_sim(&self) -> Result<Outcome> {
        self.run("DeactivateSim", &[])
    }

    pub fn home(&self) -> Result<Outcome> {
        self.run("Home", &[])
    }

    pub fn brakes_on(&self) -> Result<Outcome> {
        self.run("BrakesOn", &[])
    }

    pub fn brakes_off(&self) -> Result<Outcome> {
        self.run("BrakesOff", &[])
    }

    // =========================================================================
    // Motion queue
    // =========================================================================

    pub fn pause_motion(&self) -> Result<Outcome> {
        self.run("PauseMotion", &[])
    }

    pub fn resume_motion(&self) -> Result<Outcome> {
        self.run("ResumeMotion", &[])
    }

    /// Drop every queued motion command
    pub fn clear_motion(&self) -> Result<Outcome> {
        self.run("ClearMotion", &[])
    }

    /// Insert a pause of `seconds` into the motion queue
    pub fn delay(&self, seconds: f64) -> Result<Outcome> {
        self.run("Delay", &[seconds.into()])
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get_joints(&self) -> Result<Outcome> {
        self.run("GetJoints", &[])
    }

    pub fn get_pose(&self) -> Result<Outcome> {
        self.run("GetPose", &[])
    }

    /// Posture configuration parameters `c1, c3, c5`
    pub fn get_conf(&self) -> Result<Outcome> {
        self.run("GetConf", &[])
    }

    /// `activated, homed, sim, error, paused, eob, eom`
    pub fn get_status_robot(&self) -> Result<Outcome> {
        self.run("GetStatusRobot", &[])
    }

    pub fn get_status_gripper(&self) -> Result<Outcome> {
        self.run("GetStatusGripper", &[])
    }

    pub fn get_fw_version(&self) -> Result<Outcome> {
        self.run("GetFwVersion", &[])
    }

    pub fn get_product_type(&self) -> Result<Outcome> {
        self.run("GetProductType", &[])
    }

    // =========================================================================
    // Motion
    // =========================================================================

    pub fn move_joints(&self, joints: Vector6) -> Result<Outcome> {
        self.run("MoveJoints", &floats(&joints))
    }

    pub fn move_pose(&self, pose: Vector6) -> Result<Outcome> {
        self.run("MovePose", &floats(&pose))
    }

    /// Linear move of the tool to `pose`
    pub fn move_lin(&self, pose: Vector6) -> Result<Outcome> {
        self.run("MoveLin", &floats(&pose))
    }

    /// Linear move relative to the tool reference frame
    pub fn move_lin_rel_trf(&self, offset: Vector6) -> Result<Outcome> {
        self.run("MoveLinRelTRF", &floats(&offset))
    }

    /// Linear move relative to the world reference frame
    pub fn move_lin_rel_wrf(&self, offset: Vector6) -> Result<Outcome> {
        self.run("MoveLinRelWRF", &floats(&offset))
    }

    // =========================================================================
    // Motion parameters
    // =========================================================================

    /// Joint velocity, percent of maximum (1-100)
    pub fn set_joint_vel(&self, percent: f64) -> Result<Outcome> {
        self.run("SetJointVel", &[percent.into()])
    }

    /// Joint acceleration, percent of maximum (1-100)
    pub fn set_joint_acc(&self, percent: f64) -> Result<Outcome> {
        self.run("SetJointAcc", &[percent.into()])
    }

    /// Tool linear velocity in mm/s (0.001-1000)
    pub fn set_cart_lin_vel(&self, velocity: f64) -> Result<Outcome> {
        self.run("SetCartLinVel", &[velocity.into()])
    }

    /// Tool angular velocity in deg/s (0.001-300)
    pub fn set_cart_ang_vel(&self, velocity: f64) -> Result<Outcome> {
        self.run("SetCartAngVel", &[velocity.into()])
    }

    /// Cartesian acceleration, percent of maximum (1-100)
    pub fn set_cart_acc(&self, percent: f64) -> Result<Outcome> {
        self.run("SetCartAcc", &[percent.into()])
    }

    /// Tool reference frame relative to the flange
    pub fn set_trf(&self, frame: Vector6) -> Result<Outcome> {
        self.run("SetTRF", &floats(&frame))
    }

    /// World reference frame relative to the base
    pub fn set_wrf(&self, frame: Vector6) -> Result<Outcome> {
        self.run("SetWRF", &floats(&frame))
    }

    /// Posture configuration, each of `c1, c3, c5` is -1 or 1
    pub fn set_conf(&self, c1: i32, c3: i32, c5: i32) -> Result<Outcome> {
        self.run("SetConf", &[c1.into(), c3.into(), c5.into()])
    }

    pub fn set_auto_conf(&self, enabled: bool) -> Result<Outcome> {
        self.run("SetAutoConf", &[enabled.into()])
    }

    /// Blending between consecutive moves, percent (0-100)
    pub fn set_blending(&self, percent: f64) -> Result<Outcome> {
        self.run("SetBlending", &[percent.into()])
    }

    /// Velocity-mode watchdog in seconds (0.001-1)
    pub fn set_velocity_timeout(&self, seconds: f64) -> Result<Outcome> {
        self.run("SetVelTimeout", &[seconds.into()])
    }

    // =========================================================================
    // Gripper
    // =========================================================================

    pub fn gripper_open(&self) -> Result<Outcome> {
        self.run("GripperOpen", &[])
    }

    pub fn gripper_close(&self) -> Result<Outcome> {
        self.run("GripperClose", &[])
    }

    /// Grip force, percent of maximum (1-100)
    pub fn set_gripper_force(&self, percent: f64) -> Result<Outcome> {
        self.run("SetGripperForce", &[percent.into()])
    }

    /// Finger velocity, percent of maximum (1-100)
    pub fn set_gripper_vel(&self, percent: f64) -> Result<Outcome> {
        self.run("SetGripperVel", &[percent.into()])
    }
}
