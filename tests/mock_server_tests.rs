//! End-to-end tests against the mock controller over real TCP

use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use meca_client::mock::{MockRobot, UNKNOWN_COMMAND};
use meca_client::network::{Server, ServerHandle};
use meca_client::protocol::{
    answer_codes, codes, static_answers, static_commands, AckFlags, DecodedBody, Response,
};
use meca_client::{Client, Config, MecaError, Outcome, ServerConfig, Session};

// =============================================================================
// Helper Functions
// =============================================================================

fn start_server() -> ServerHandle {
    start_server_with_limit(1)
}

fn start_server_with_limit(max_sessions: usize) -> ServerHandle {
    let config = ServerConfig {
        listen_addr: "127.0.0.1:0".to_string(),
        max_sessions,
        ..ServerConfig::default()
    };
    Server::bind(config).unwrap().spawn().unwrap()
}

fn client_config(server: &ServerHandle) -> Config {
    Config::builder()
        .host("127.0.0.1")
        .port(server.addr().port())
        .connect_timeout_ms(1000)
        .handshake_timeout_ms(1000)
        .read_timeout_ms(2000)
        .build()
}

fn text(outcome: Outcome) -> String {
    match outcome {
        Outcome::Body(DecodedBody::Text(s)) => s,
        other => panic!("expected text body, got {:?}", other),
    }
}

// =============================================================================
// Session Lifecycle
// =============================================================================

#[test]
fn test_connect_activate_home_query() {
    let server = start_server();
    let client = Client::connect(&client_config(&server)).unwrap();

    assert_eq!(text(client.activate_robot().unwrap()), "Motors activated.");
    assert_eq!(text(client.activate_robot().unwrap()), "Motors already activated.");
    assert_eq!(text(client.home().unwrap()), "Homing done.");

    let joints = client.get_joints().unwrap().into_body().unwrap();
    assert_eq!(joints, DecodedBody::Floats(vec![0.0; 6]));

    let status = client.get_status_robot().unwrap().into_body().unwrap();
    assert_eq!(status, DecodedBody::Ints(vec![1, 1, 0, 0, 0, 1, 1]));

    client.disconnect().unwrap();
}

#[test]
fn test_second_client_is_refused() {
    let server = start_server();
    let config = client_config(&server);
    let _first = Client::connect(&config).unwrap();

    match Session::connect(&config) {
        Err(MecaError::AlreadyConnected(_)) => {}
        Err(e) => panic!("expected AlreadyConnected, got {}", e),
        Ok(_) => panic!("second session should be refused"),
    }
}

#[test]
fn test_session_limit_is_configurable() {
    let server = start_server_with_limit(2);
    let config = client_config(&server);

    let first = Client::connect(&config).unwrap();
    let second = Client::connect(&config).unwrap();
    assert!(matches!(
        Session::connect(&config),
        Err(MecaError::AlreadyConnected(_))
    ));

    // Both sessions drive the same controller
    assert_eq!(text(first.activate_robot().unwrap()), "Motors activated.");
    assert_eq!(text(second.activate_robot().unwrap()), "Motors already activated.");
}

#[test]
fn test_zero_session_limit_is_rejected() {
    let config = ServerConfig {
        listen_addr: "127.0.0.1:0".to_string(),
        max_sessions: 0,
        ..ServerConfig::default()
    };
    assert!(matches!(Server::bind(config), Err(MecaError::Config(_))));
}

#[test]
fn test_session_slot_frees_after_disconnect() {
    let server = start_server();
    let config = client_config(&server);

    let first = Client::connect(&config).unwrap();
    first.disconnect().unwrap();

    // The server notices the close asynchronously
    let mut attempts = 0;
    let second = loop {
        match Client::connect(&config) {
            Ok(client) => break client,
            Err(MecaError::AlreadyConnected(_)) if attempts < 50 => {
                attempts += 1;
                thread::sleep(Duration::from_millis(20));
            }
            Err(e) => panic!("reconnect failed: {}", e),
        }
    };
    assert!(second.get_pose().is_ok());
}

#[test]
fn test_connect_rejects_empty_host() {
    let config = Config::builder().host("").build();
    assert!(matches!(Session::connect(&config), Err(MecaError::Config(_))));
}

#[test]
fn test_handshake_timeout() {
    // Accepts but never greets
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let holder = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_millis(500));
        drop(stream);
    });

    let config = Config::builder()
        .host("127.0.0.1")
        .port(port)
        .handshake_timeout_ms(100)
        .build();

    assert!(matches!(Session::connect(&config), Err(MecaError::Io(_))));
    holder.join().unwrap();
}

// =============================================================================
// Motion and Acks
// =============================================================================

#[test]
fn test_move_with_eom_ack() {
    let server = start_server();
    let client = Client::connect(&client_config(&server)).unwrap();

    client.activate_robot().unwrap();
    client.home().unwrap();
    assert_eq!(text(client.set_eob(false).unwrap()), "End of block is disabled.");

    let target = [10.0, -20.0, 30.0, 0.0, 45.0, 90.0];
    assert_eq!(text(client.move_joints(target).unwrap()), "End of movement.");

    let joints = client.get_joints().unwrap().into_body().unwrap();
    assert_eq!(joints.as_floats(), Some(&target[..]));
    assert_eq!(server.robot().lock().joints(), target);
}

#[test]
fn test_queueing_leaves_replies_for_later_calls() {
    let server = start_server();
    let client = Client::connect(&client_config(&server)).unwrap();

    client.activate_robot().unwrap();
    client.home().unwrap();
    client.set_eob(false).unwrap();

    // SetEOM(0) is sent but its reply stays unread
    assert!(client.set_queue(true).unwrap());
    assert!(client.move_joints([1.0; 6]).unwrap().is_queueing());
    assert!(client.move_joints([2.0; 6]).unwrap().is_queueing());

    // Restoring EOM reads the oldest pending reply, not its own
    assert!(!client.set_queue(false).unwrap());
    let flags = client.flags().unwrap();
    assert!(flags.eom);
    assert!(!flags.queueing);

    // The SetEOM(1) confirmation is the next frame in line
    assert_eq!(text(client.get_joints().unwrap()), "End of movement is enabled.");
}

// =============================================================================
// Error Mode
// =============================================================================

#[test]
fn test_device_error_latches_session() {
    let server = start_server();
    let client = Client::connect(&client_config(&server)).unwrap();

    // Not homed
    let reply = text(client.move_joints([0.0; 6]).unwrap());
    assert_eq!(reply, "The robot is not homed.");
    assert!(client.is_in_error_mode().unwrap());
    assert!(server.robot().lock().is_in_error());

    // Known boundary: the reset is never sent while latched
    assert_eq!(client.reset_error().unwrap(), Outcome::InErrorMode);
    assert!(client.is_in_error_mode().unwrap());
    assert!(server.robot().lock().is_in_error());
}

#[test]
fn test_reset_error_before_latch() {
    let server = start_server();
    server.robot().lock().inject_error();
    let client = Client::connect(&client_config(&server)).unwrap();

    // The controller is in error but the session has not seen an error code
    assert_eq!(text(client.reset_error().unwrap()), "The error was reset.");
    assert!(!client.is_in_error_mode().unwrap());
    assert!(!server.robot().lock().is_in_error());

    assert_eq!(text(client.reset_error().unwrap()), "There was no error to reset.");
    assert!(!client.is_in_error_mode().unwrap());
}

// =============================================================================
// Mock Robot Rules
// =============================================================================

#[test]
fn test_mock_robot_fixed_answers() {
    let mut robot = MockRobot::new();

    let replies = robot.respond("ActivateRobot");
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].code, codes::MOTORS_ACTIVATED);

    let replies = robot.respond("SetEOB(0)");
    assert_eq!(replies[0].code, codes::EOB_DISABLED);

    let replies = robot.respond("GetPose");
    assert_eq!(replies[0].code, codes::POSE);
    assert_eq!(replies[0].body, "190.000,0.000,308.000,0.000,90.000,0.000");
}

#[test]
fn test_mock_robot_fixed_answers_carry_no_acks() {
    let mut robot = MockRobot::new();

    // Both acks are on, yet every fixed-answer command gets one frame
    for command in static_commands() {
        // Keep every command out of the error path
        robot.respond("ResetError");
        robot.respond("ActivateRobot");
        robot.respond("SetEOB(1)");
        robot.respond("SetEOM(1)");

        let replies = robot.respond(command);
        assert_eq!(replies.len(), 1, "{}", command);
        assert!(static_answers(command).unwrap().contains(&replies[0].code), "{}", command);
    }
}

#[test]
fn test_mock_robot_pause_motion_follows_eom() {
    let mut robot = MockRobot::new();
    let codes_of = |robot: &mut MockRobot| -> Vec<u16> {
        robot.respond("PauseMotion").iter().map(|r| r.code).collect()
    };

    assert_eq!(codes_of(&mut robot), vec![3004, 2042]);
    assert_eq!(codes_of(&mut robot), answer_codes("PauseMotion", AckFlags::new(true, true)));

    robot.respond("SetEOM(0)");
    assert_eq!(codes_of(&mut robot), vec![2042]);
}

#[test]
fn test_mock_robot_acks_follow_its_flags() {
    let mut robot = MockRobot::new();
    robot.respond("ActivateRobot");
    robot.respond("Home");

    let codes_of = |robot: &mut MockRobot, cmd: &str| -> Vec<u16> {
        robot.respond(cmd).iter().map(|r| r.code).collect()
    };

    assert_eq!(codes_of(&mut robot, "MoveJoints(1,2,3,4,5,6)"), vec![3004, 3012]);
    assert_eq!(codes_of(&mut robot, "SetJointVel(50)"), vec![3012]);

    robot.respond("SetEOB(0)");
    robot.respond("SetEOM(0)");
    assert!(codes_of(&mut robot, "MoveJoints(1,2,3,4,5,6)").is_empty());
    assert_eq!(robot.joints(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn test_mock_robot_errors() {
    let mut robot = MockRobot::new();

    let replies = robot.respond("Dance");
    assert_eq!(replies, vec![Response::new(UNKNOWN_COMMAND, "Command not recognized.")]);
    assert_eq!(replies[0].code, 1000);
    assert!(robot.is_in_error());

    // Motion is refused until the error is reset
    assert_eq!(robot.respond("ActivateRobot")[0].code, 1011);
    assert_eq!(robot.respond("GetJoints")[0].code, codes::JOINTS);
    assert_eq!(robot.respond("ResetError")[0].code, codes::ERROR_RESET);
    assert_eq!(robot.respond("ActivateRobot")[0].code, codes::MOTORS_ACTIVATED);

    robot.respond("Home");
    assert_eq!(robot.respond("MoveJoints(1,2,3)")[0].code, 1006);
}
