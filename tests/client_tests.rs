//! Tests for Client
//!
//! The mediator must serialize calls from many threads onto one session
//! and report `SessionClosed` once the session is gone.

mod common;

use std::thread;

use common::scripted_session;
use meca_client::protocol::DecodedBody;
use meca_client::{Client, MecaError, Outcome};

#[test]
fn test_client_runs_commands() {
    let (wire, session) = scripted_session();
    wire.reply(2000, "Motors activated.")
        .reply(2026, "1.0,2.0,3.0,4.0,5.0,6.0");

    let client = Client::spawn(session).unwrap();

    assert_eq!(
        client.activate_robot().unwrap(),
        Outcome::Body(DecodedBody::Text("Motors activated.".to_string()))
    );
    assert_eq!(
        client.get_joints().unwrap().body().and_then(DecodedBody::as_floats),
        Some(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0][..])
    );
    assert_eq!(wire.sent(), vec!["ActivateRobot\0", "GetJoints\0"]);
}

#[test]
fn test_client_command_surface_wire_format() {
    let (wire, session) = scripted_session();
    let client = Client::spawn(session).unwrap();

    // Nothing is read while queueing, so no replies need scripting
    assert!(client.set_queue(true).unwrap());
    client.move_joints([0.0, -20.0, 20.0, 0.0, 30.0, 60.0]).unwrap();
    client.set_conf(1, -1, 1).unwrap();
    client.set_joint_vel(25.0).unwrap();
    client.gripper_open().unwrap();
    client.delay(0.5).unwrap();

    assert_eq!(
        wire.sent(),
        vec![
            "SetEOM(0)\0",
            "MoveJoints(0.0,-20.0,20.0,0.0,30.0,60.0)\0",
            "SetConf(1,-1,1)\0",
            "SetJointVel(25.0)\0",
            "GripperOpen\0",
            "Delay(0.5)\0",
        ]
    );
}

#[test]
fn test_client_serializes_concurrent_calls() {
    const CALLERS: usize = 8;
    const CALLS: usize = 25;

    let (wire, session) = scripted_session();
    for _ in 0..CALLERS * CALLS {
        wire.reply(2026, "0,0,0,0,0,0");
    }

    let client = Client::spawn(session).unwrap();

    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let client = client.clone();
            thread::spawn(move || {
                for _ in 0..CALLS {
                    let outcome = client.get_joints().unwrap();
                    assert_eq!(outcome.into_body(), Some(DecodedBody::Floats(vec![0.0; 6])));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(wire.sent().len(), CALLERS * CALLS);
    assert_eq!(wire.pending_replies(), 0);
}

#[test]
fn test_client_flags_and_error_mode() {
    let (wire, session) = scripted_session();
    wire.reply(1005, "The robot is not homed.");

    let client = Client::spawn(session).unwrap();
    assert!(!client.is_in_error_mode().unwrap());

    client.move_lin([190.0, 0.0, 308.0, 0.0, 90.0, 0.0]).unwrap();

    assert!(client.is_in_error_mode().unwrap());
    assert_eq!(client.reset_error().unwrap(), Outcome::InErrorMode);
    assert!(client.flags().unwrap().error_mode);
    assert_eq!(wire.sent().len(), 1);
}

#[test]
fn test_client_disconnect_closes_every_handle() {
    let (wire, session) = scripted_session();
    let client = Client::spawn(session).unwrap();
    let other = client.clone();

    client.disconnect().unwrap();
    assert!(wire.is_closed());

    assert!(matches!(other.get_pose(), Err(MecaError::SessionClosed)));
    assert!(matches!(client.flags(), Err(MecaError::SessionClosed)));
}
