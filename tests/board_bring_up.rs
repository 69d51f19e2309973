// Integration tests for board bring-up against simulated pins

use hellen_board::board::{Board, requested_state};
use hellen_board::pin_map::PULL_RESISTOR_PINS;
use hellen_board::registry::PinRegistry;
use hellen_board::sim::RecordingPinProvider;
use hellen_board::{BoardError, BoardRevision, PinRole, build_defaults};
use hellen_shared::Gpio;

#[test]
fn test_unassigned_role_never_acquires() {
    let mut registry = PinRegistry::new(RecordingPinProvider::new());
    registry.initialize(PinRole::CamPullDown, Gpio::Unassigned).unwrap();

    assert!(registry.is_initialized(PinRole::CamPullDown));
    assert!(registry.provider().acquisitions().is_empty());
}

#[test]
fn test_bring_up_matches_defaults() {
    for code in ["D", "F", "G", "J"] {
        let revision = BoardRevision::from_code(code);
        let config = build_defaults(revision);
        let board = Board::new(RecordingPinProvider::new(), revision)
            .init_hardware(&config)
            .unwrap();

        for entry in PULL_RESISTOR_PINS.iter() {
            let pin = entry.pin_for(revision.band());
            let wanted = requested_state(entry.role, &config);
            assert_eq!(board.pull_resistor(entry.role), Some(wanted), "{} on rev {}", entry.role, code);
            assert_eq!(board.provider().level(pin), Some(wanted), "{} on rev {}", pin, code);
        }
        // temp pull-up is the only one on by default
        assert_eq!(board.provider().levels().values().filter(|on| **on).count(), 1);
    }
}

#[test]
fn test_revision_selects_physical_pins() {
    let legacy = Board::new(RecordingPinProvider::new(), BoardRevision::from_letter('E'))
        .init_hardware(&build_defaults(BoardRevision::from_letter('E')))
        .unwrap();
    let mega = Board::new(RecordingPinProvider::new(), BoardRevision::from_letter('G'))
        .init_hardware(&build_defaults(BoardRevision::from_letter('G')))
        .unwrap();

    assert_eq!(legacy.registry().physical_pin(PinRole::D2PullDown), Some(Gpio::H144_LS_5));
    assert_eq!(mega.registry().physical_pin(PinRole::D2PullDown), Some(Gpio::H144_OUT_IO13));
    assert_eq!(legacy.registry().physical_pin(PinRole::CamPullDown), Some(Gpio::H144_OUT_IO8));
    assert_eq!(mega.registry().physical_pin(PinRole::CamPullDown), Some(Gpio::H144_GP4));
    assert_eq!(
        legacy.registry().physical_pin(PinRole::TachPullUp),
        mega.registry().physical_pin(PinRole::TachPullUp)
    );
}

#[test]
fn test_apply_is_idempotent() {
    let revision = BoardRevision::from_letter('G');
    let mut config = build_defaults(revision);
    config.board_use_cam_vr_pull_up = true;
    config.board_use_d4_pull_down = true;

    let mut board = Board::new(RecordingPinProvider::new(), revision)
        .init_hardware(&config)
        .unwrap();
    let once = board.provider().levels().clone();
    board.on_configuration_change(&config, None);
    board.on_configuration_change(&config, Some(&config));

    assert_eq!(&once, board.provider().levels());
}

#[test]
fn test_latest_configuration_wins() {
    let revision = BoardRevision::from_letter('F');
    let mut config = build_defaults(revision);
    let mut board = Board::new(RecordingPinProvider::new(), revision)
        .init_hardware(&config)
        .unwrap();

    config.board_use_d3_pull_down = true;
    board.on_configuration_change(&config, None);
    config.board_use_d3_pull_down = false;
    board.on_configuration_change(&config, None);

    assert_eq!(board.pull_resistor(PinRole::D3PullDown), Some(false));
    assert_eq!(board.provider().level(Gpio::H144_LS_6), Some(false));
}

#[test]
fn test_busy_pin_aborts_bring_up() {
    let provider = RecordingPinProvider::new().failing_on(Gpio::H144_OUT_IO9);
    let result = Board::new(provider, BoardRevision::from_letter('D'))
        .init_hardware(&build_defaults(BoardRevision::from_letter('D')));

    match result {
        Err(BoardError::PinUnavailable { role, pin, .. }) => {
            assert_eq!(role, PinRole::CamVrPullUp);
            assert_eq!(pin, Gpio::H144_OUT_IO9);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("bring-up should fail on a busy pin"),
    }
}
