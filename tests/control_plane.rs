//! Crate-level integration tests exercising the control engine and peer-network
//! stream bookkeeping together through their public API.

use p25_fne::config::EngineConfig;
use p25_fne::control::site::{IdentityTable, SiteData};
use p25_fne::control::{Control, GrantDenial, GrantOutcome};
use p25_fne::network::peer::{create_stream_id, PacketSequencer, END_OF_CALL_SEQ};

fn site() -> SiteData {
    SiteData::new(0x0ABCDE, 0x123, 1, 1, 1, 100, 0b0011_0000, "TEST")
}

fn control_with_channel(channel: u16) -> Control {
    let mut control = Control::new(site(), IdentityTable::new(), EngineConfig::default(), false);
    control.add_free_channel(channel);
    control
}

#[test]
fn test_grant_admission_happy_path() {
    let mut control = control_with_channel(2);

    let outcome = control.admit_group_grant(1001, 100, false);
    assert_eq!(outcome, GrantOutcome::Granted { channel: 2 });
    assert!(control.grants.is_granted(100));
    assert_eq!(control.grants.granted_source(100), Some(1001));
    assert_eq!(control.site_status().chan_cnt(), 1);
}

#[test]
fn test_grant_admission_collision_denies_second_source() {
    let mut control = control_with_channel(2);
    control.admit_group_grant(1001, 100, false);

    let outcome = control.admit_group_grant(1002, 100, false);
    assert_eq!(outcome, GrantOutcome::Denied(GrantDenial::PttCollision));

    // the original grant is untouched by the rejected second source
    assert_eq!(control.grants.granted_source(100), Some(1001));
}

/// §8 scenario 8: a stream opens with LDU1 at sequence 0, continues with LDU2 at
/// sequence 1, closes with a TDU at the end-of-call sequence, runs at least 180ms,
/// and the destination's grant is released once the call tears down.
#[test]
fn test_stream_termination_releases_the_grant_after_a_tdu() {
    let mut control = control_with_channel(2);
    let outcome = control.admit_group_grant(1001, 100, false);
    assert_eq!(outcome, GrantOutcome::Granted { channel: 2 });

    let stream_id = create_stream_id();
    assert!(stream_id >= 1 && stream_id < u32::MAX);

    let mut seq = PacketSequencer::new();
    let ldu1_seq = seq.next();
    let ldu2_seq = seq.next();
    assert_eq!(ldu1_seq, 0);
    assert_eq!(ldu2_seq, 1);

    // run the call for 180ms across several ticks before it tears down
    let mut elapsed_ms = 0;
    for _ in 0..18 {
        control.tick(10);
        elapsed_ms += 10;
    }
    assert!(elapsed_ms >= 180);
    assert!(control.grants.is_granted(100));

    // a TDU at the wraparound boundary closes the stream
    let mut closing = PacketSequencer::new();
    for _ in 0..(END_OF_CALL_SEQ - 1) {
        closing.next();
    }
    let tdu_seq = closing.next();
    assert_eq!(tdu_seq, END_OF_CALL_SEQ - 1);

    control.on_transmission_loss(100);
    assert!(!control.grants.is_granted(100));
    assert_eq!(control.site_status().chan_cnt(), 0);
}
