//! Property tests for the base device under arbitrary call patterns

use proptest::prelude::*;
use tether_core::{Action, CommDevice, ConnectionState, IpCommDevice};

const TX: usize = 16;

#[derive(Debug, Clone)]
enum Step {
    Connect,
    Disconnect,
    Write(Vec<u8>),
    Read(usize),
    Service,
    NegotiationComplete,
    NegotiationFailed,
    TeardownComplete,
    LinkDropped,
    Receive(Vec<u8>),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Connect),
        Just(Step::Disconnect),
        prop::collection::vec(any::<u8>(), 0..24).prop_map(Step::Write),
        (0usize..24).prop_map(Step::Read),
        Just(Step::Service),
        Just(Step::NegotiationComplete),
        Just(Step::NegotiationFailed),
        Just(Step::TeardownComplete),
        Just(Step::LinkDropped),
        prop::collection::vec(any::<u8>(), 0..24).prop_map(Step::Receive),
    ]
}

proptest! {
    #[test]
    fn interface_invariants_hold(steps in prop::collection::vec(step(), 1..80)) {
        let mut device = IpCommDevice::<32, TX>::new();
        device.set_host_port("203.0.113.5", 1883).unwrap();
        // Set once a disconnect lands while the link is still coming up
        let mut aborting = false;

        for step in steps {
            let before = device.state();
            match step {
                Step::Connect => {
                    let accepted = device.connect();
                    prop_assert_eq!(accepted, before == ConnectionState::NotConnected);
                    if accepted {
                        prop_assert!(!device.is_idle());
                        aborting = false;
                    }
                }
                Step::Disconnect => {
                    device.disconnect();
                    prop_assert!(device.pending().disconnect);
                    if before == ConnectionState::Connecting {
                        aborting = true;
                    }
                }
                Step::Write(data) => {
                    let space = device.space_available();
                    let accepted = device.write(&data);
                    if before != ConnectionState::Connected {
                        prop_assert_eq!(accepted, 0);
                        prop_assert_eq!(space, 0);
                    } else {
                        prop_assert_eq!(accepted as usize, data.len().min(space as usize));
                    }
                }
                Step::Read(max) => {
                    let available = device.bytes_available() as usize;
                    let mut buf = vec![0u8; max];
                    let n = device.read(&mut buf) as usize;
                    prop_assert_eq!(n, max.min(available));
                }
                Step::Service => {
                    match device.next_action() {
                        Some(Action::Connect) => {
                            prop_assert_eq!(before, ConnectionState::ConnectPending);
                            prop_assert_eq!(device.state(), ConnectionState::Connecting);
                        }
                        Some(Action::Disconnect) => {
                            prop_assert_eq!(before, ConnectionState::DisconnectPending);
                            prop_assert_eq!(device.state(), ConnectionState::Disconnecting);
                        }
                        None => prop_assert_eq!(device.state(), before),
                    }
                }
                Step::NegotiationComplete => device.negotiation_complete(),
                Step::NegotiationFailed => device.negotiation_failed(),
                Step::TeardownComplete => device.teardown_complete(),
                Step::LinkDropped => device.link_dropped(),
                Step::Receive(data) => {
                    device.receive_buffer_mut().push(&data);
                }
            }

            if device.is_idle() {
                aborting = false;
            }
            if aborting {
                prop_assert!(!device.is_connected());
            }

            prop_assert!(!(device.is_connected() && device.is_idle()));
            if !device.is_connected() {
                prop_assert_eq!(device.space_available(), 0);
            } else {
                prop_assert_eq!(
                    device.space_available(),
                    device.transmit_buffer().available_space()
                );
            }
            prop_assert_eq!(
                device.transmit_buffer().available_data() as usize
                    + device.transmit_buffer().available_space() as usize,
                TX
            );
        }
    }
}
