// Integration tests for the write-once machine

use wormtape::machine::config::{MachineConfig, StepPolicy};
use wormtape::machine::engine::{Machine, RunOutcome};
use wormtape::machine::errors::MachineError;
use wormtape::machine::mediator::WormTape;
use wormtape::parser::parse_rule_table;
use wormtape::tape::BLANK;

const SINGLE_WRITE: &str = include_str!("../demos/single_write.tm");
const BINARY_INCREMENT: &str = include_str!("../demos/binary_increment.tm");
const ERASER: &str = include_str!("../demos/eraser.tm");

fn machine_from(source: &str, config: MachineConfig) -> Machine {
    let table = parse_rule_table(source).expect("Parsing failed");
    Machine::new(table, config).expect("Machine creation failed")
}

/// Logical contents of positions `0..len`, read without moving the head
fn logical_contents(machine: &Machine, len: usize) -> Vec<u8> {
    (0..len)
        .map(|position| machine.tape().peek(position).expect("Peek failed"))
        .collect()
}

#[test]
fn test_single_write_scenario() {
    let config = MachineConfig::with_capacity(4).with_policy(StepPolicy::Single);
    let mut machine = machine_from(SINGLE_WRITE, config);

    let outcome = machine.run().expect("Execution failed");
    assert_eq!(outcome, RunOutcome::StepLimitReached { steps: 1 });

    let report = machine.report().expect("Report failed");
    assert_eq!(report.final_state_name, "A");
    assert_eq!(report.final_state.0, 1);
    assert_eq!(report.head_position, 1);
    assert_eq!(report.final_symbol, BLANK);
    assert_eq!(report.cells_consumed, 1);

    let mut tape = machine.tape().clone();
    assert_eq!(tape.logical_read(0).expect("Read failed"), b'b');
}

#[test]
fn test_report_format() {
    let config = MachineConfig::with_capacity(4).with_policy(StepPolicy::Single);
    let mut machine = machine_from(SINGLE_WRITE, config);
    machine.run().expect("Execution failed");

    let report = machine.report().expect("Report failed");
    let expected = "Final state: A (1)\n\
                    Final position on the (virtual) tape: 1\n\
                    Final symbol on the tape: 0 (_)\n\
                    -----\n\
                    Statistics\n\
                    Physical tape length: 1\n\
                    Steps: 1\n\
                    Physical head travel: 1";
    assert_eq!(report.to_string(), expected);

    // Only the final read moved the head
    let output = machine.tape().head().log().get_output();
    assert_eq!(output, vec!["Moving right".to_string()]);
}

#[test]
fn test_binary_increment() {
    let mut machine = machine_from(BINARY_INCREMENT, MachineConfig::with_capacity(16));
    machine.load_input(b"011").expect("Loading input failed");

    let outcome = machine.run().expect("Execution failed");
    assert_eq!(outcome, RunOutcome::Halted { steps: 7 });
    assert!(machine.is_halted());
    assert_eq!(machine.state_name(), "DONE");
    assert_eq!(machine.head_position(), 0);
    assert_eq!(logical_contents(&machine, 4), b"100\0".to_vec());

    // Three input cells plus one per carried digit
    assert_eq!(machine.tape().cells_consumed(), 6);

    // The superseded input cells are still physically there
    let store = machine.tape().store();
    let physical: Vec<u8> = store.cells()[..6].iter().map(|cell| cell.symbol).collect();
    assert_eq!(physical, b"011001".to_vec());
}

#[test]
fn test_binary_increment_all_ones_needs_leading_zero() {
    let mut machine = machine_from(BINARY_INCREMENT, MachineConfig::with_capacity(16));
    machine.load_input(b"11").expect("Loading input failed");

    let result = machine.run();
    assert!(
        matches!(result, Err(MachineError::OutOfBounds { position: -1, .. })),
        "Expected the carry to fall off the left edge, got {:?}",
        result
    );
}

#[test]
fn test_exhaustion_with_one_physical_cell() {
    let source = "start W;\n(*, *) -> ('x', R, *);";
    let config = MachineConfig {
        physical_capacity: 1,
        virtual_capacity: 4,
        ..MachineConfig::default()
    };
    let mut machine = machine_from(source, config);

    let result = machine.run();
    assert_eq!(result, Err(MachineError::OutOfCapacity { capacity: 1 }));
    assert_eq!(machine.steps_taken(), 1);
    assert_eq!(machine.tape().cells_consumed(), 1);
}

#[test]
fn test_rewrite_redirection() {
    let mut tape = WormTape::new(4, 4).expect("Tape creation failed");

    let first = tape.logical_write(0, b'a').expect("Write failed");
    let second = tape.logical_write(0, b'b').expect("Write failed");
    assert_eq!((first, second), (0, 1));

    assert_eq!(tape.logical_read(0).expect("Read failed"), b'b');
    assert_eq!(tape.head().current_position(), 1);
    // The old cell keeps its symbol
    assert_eq!(tape.store().read(0).expect("Read failed"), b'a');
    assert_eq!(tape.cells_consumed(), 2);
}

#[test]
fn test_eraser_runs_out_of_cells() {
    let config = MachineConfig::with_capacity(3);
    let mut machine = machine_from(ERASER, config);
    machine.load_input(b"abc").expect("Loading input failed");

    assert_eq!(
        machine.run(),
        Err(MachineError::OutOfCapacity { capacity: 3 })
    );
    // Nothing fired, so only the starting snapshot exists
    assert_eq!(machine.total_snapshots(), 1);
    assert_eq!(logical_contents(&machine, 3), b"abc".to_vec());
}

#[test]
fn test_eraser_with_room_to_spare() {
    let config = MachineConfig::with_capacity(6);
    let mut machine = machine_from(ERASER, config);
    machine.load_input(b"abc").expect("Loading input failed");

    let outcome = machine.run().expect("Execution failed");
    assert_eq!(outcome, RunOutcome::Halted { steps: 4 });
    assert_eq!(machine.state_name(), "STOP");
    assert_eq!(machine.head_position(), 3);
    assert_eq!(logical_contents(&machine, 4), vec![BLANK; 4]);
    assert_eq!(machine.tape().cells_consumed(), 6);
}

#[test]
fn test_history_replays_tape_contents() {
    let mut machine = machine_from(BINARY_INCREMENT, MachineConfig::with_capacity(16));
    machine.load_input(b"01").expect("Loading input failed");
    machine.run().expect("Execution failed");

    machine.rewind_to_start().expect("Rewind failed");
    assert_eq!(logical_contents(&machine, 2), b"01".to_vec());
    assert_eq!(machine.state_name(), "RIGHT");
    assert!(!machine.is_halted());

    machine.jump_to_end().expect("Jump failed");
    assert_eq!(logical_contents(&machine, 2), b"10".to_vec());
    assert!(machine.is_halted());
}

#[test]
fn test_long_shuttle_run_under_default_config() {
    // Walks back and forth over its input forever without writing
    let source = "
        start RIGHT;
        (RIGHT, 'm')   -> (*, R, RIGHT);
        (RIGHT, 'a')   -> (*, R, RIGHT);
        (RIGHT, blank) -> (*, L, LEFT);
        (LEFT, 'a')    -> (*, L, LEFT);
        (LEFT, 'm')    -> (*, R, RIGHT);
    ";
    let mut machine = machine_from(source, MachineConfig::default());
    let input = format!("m{}", "a".repeat(200));
    machine.load_input(input.as_bytes()).expect("Loading input failed");

    let outcome = machine.run().expect("Execution failed");
    assert_eq!(outcome, RunOutcome::StepLimitReached { steps: 10_000 });
    assert!(machine.history_overflow().is_none());
    assert_eq!(machine.total_snapshots(), 10_001);
    assert!(machine.history_memory() <= machine.config().snapshot_limit);
    assert_eq!(machine.tape().cells_consumed(), 201);

    let travelled = machine.tape().head().travelled();
    assert!(travelled >= 10_000);

    // Replay shares the one motion log
    machine.rewind_to_start().expect("Rewind failed");
    assert_eq!(machine.tape().head().travelled(), 200);
    machine.jump_to_end().expect("Jump failed");
    assert_eq!(machine.tape().head().travelled(), travelled);
}

#[test]
fn test_parse_errors_are_reported_with_location() {
    let err = parse_rule_table("start A;\n(A, 'x') => ('y', R, A);").unwrap_err();
    assert_eq!(err.location.line, 2);
    assert!(err.to_string().starts_with("Parse error at line 2"));
}
