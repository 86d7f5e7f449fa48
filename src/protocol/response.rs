//! Response definitions
//!
//! A parsed reply frame and the response codes the engine cares about.

/// A reply frame split into its code and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Four-digit response code
    pub code: u16,

    /// Text between the body brackets
    pub body: String,
}

impl Response {
    pub fn new(code: u16, body: impl Into<String>) -> Self {
        Self {
            code,
            body: body.into(),
        }
    }

    /// Whether this reply latches the session error mode
    pub fn is_error(&self) -> bool {
        codes::is_error(self.code)
    }
}

/// Response codes
pub mod codes {
    /// Greeting on a fresh connection
    pub const CONNECTED: u16 = 3000;
    /// Greeting when another client holds the controller
    pub const ALREADY_CONNECTED: u16 = 3001;
    pub const EOM_ACK: u16 = 3004;
    pub const EOB_ACK: u16 = 3012;

    pub const MOTORS_ACTIVATED: u16 = 2000;
    pub const MOTORS_ALREADY_ACTIVATED: u16 = 2001;
    pub const HOMING_DONE: u16 = 2002;
    pub const HOMING_ALREADY_DONE: u16 = 2003;
    pub const MOTORS_DEACTIVATED: u16 = 2004;
    pub const ERROR_RESET: u16 = 2005;
    pub const NO_ERROR_TO_RESET: u16 = 2006;
    pub const STATUS_ROBOT: u16 = 2007;
    pub const BRAKES_OFF: u16 = 2008;
    pub const BRAKES_ON: u16 = 2010;
    pub const JOINTS: u16 = 2026;
    pub const POSE: u16 = 2027;
    pub const CONF: u16 = 2029;
    pub const MOTION_PAUSED: u16 = 2042;
    pub const MOTION_RESUMED: u16 = 2043;
    pub const MOTION_CLEARED: u16 = 2044;
    pub const SIM_ACTIVATED: u16 = 2045;
    pub const SIM_DEACTIVATED: u16 = 2046;
    pub const EOM_ENABLED: u16 = 2052;
    pub const EOM_DISABLED: u16 = 2053;
    pub const EOB_ENABLED: u16 = 2054;
    pub const EOB_DISABLED: u16 = 2055;
    pub const STATUS_GRIPPER: u16 = 2079;
    pub const FW_VERSION: u16 = 2081;
    pub const PRODUCT_TYPE: u16 = 2084;

    /// Command-level error range
    pub const COMMAND_ERRORS: std::ops::RangeInclusive<u16> = 1000..=1999;

    /// General protocol errors outside the command range
    pub const GENERAL_ERRORS: [u16; 6] = [3001, 3003, 3005, 3009, 3014, 3026];

    pub fn is_error(code: u16) -> bool {
        COMMAND_ERRORS.contains(&code) || GENERAL_ERRORS.contains(&code)
    }
}
