//! # Program Loader Tests

use l1sim_core::common::{LoadError, WidthClass};
use l1sim_core::isa::Instruction;
use l1sim_core::sim::{Preload, Program};

#[test]
fn test_program_from_json() {
    let program = Program::from_json(
        r#"{
            "preload": [ { "addr": 256, "words": [1, 2] } ],
            "instructions": [
                { "op": "set_dma_reg", "half_index": 16, "value": 16 },
                { "op": "dma_nop" },
                { "op": "store_ind", "width": 32, "offset_reg": 16,
                  "data_reg": 0, "base_reg": 8 }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(program.len(), 3);
    assert_eq!(program.instructions[1], Instruction::DmaNop);
    assert_eq!(
        program.preload,
        vec![Preload {
            addr: 256,
            words: vec![1, 2]
        }]
    );
}

#[test]
fn test_preload_is_optional() {
    let program = Program::from_json(r#"{ "instructions": [] }"#).unwrap();
    assert!(program.is_empty());
    assert!(program.preload.is_empty());
}

#[test]
fn test_preload_bytes_are_little_endian() {
    let preload = Preload {
        addr: 0,
        words: vec![0x0403_0201, 0x0807_0605],
    };
    assert_eq!(preload.bytes(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_builder() {
    let mut program = Program::from(vec![Instruction::DmaNop]);
    program.push(Instruction::store_ind(WidthClass::Bits8, 0, 0, 0, 0));
    let program = program.with_preload(0x40, vec![7]);
    assert_eq!(program.len(), 2);
    assert_eq!(program.preload[0].addr, 0x40);
}

#[test]
fn test_malformed_documents() {
    assert!(matches!(Program::from_json("{"), Err(LoadError::Parse(_))));
    assert!(matches!(
        Program::from_json(r#"{ "instructions": [ { "op": "jump" } ] }"#),
        Err(LoadError::Parse(_))
    ));
    assert!(matches!(Program::from_json("{}"), Err(LoadError::Parse(_))));
}

#[test]
fn test_missing_file() {
    let err = Program::from_file("/nonexistent/l1sim/program.json").unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
    assert!(err.to_string().starts_with("failed to read program"));
}

#[test]
fn test_round_trip_through_json() {
    let program = Program::new(vec![
        Instruction::at_cas(1, 0, 2, 8),
        Instruction::at_swap(0xF0, 4, 9),
    ])
    .with_preload(0, vec![1]);
    let text = serde_json::to_string(&program).unwrap();
    assert_eq!(Program::from_json(&text).unwrap(), program);
}
