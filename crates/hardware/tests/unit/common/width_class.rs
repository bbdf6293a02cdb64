//! # Width Class Tests

use l1sim_core::common::WidthClass;
use rstest::rstest;

#[rstest]
#[case(WidthClass::Bits8, 1, 1, 0xFF)]
#[case(WidthClass::Bits16, 2, 1, 0xFFFF)]
#[case(WidthClass::Bits32, 4, 1, 0xFFFF_FFFF)]
#[case(WidthClass::Bits128, 16, 4, u128::MAX)]
fn test_width_geometry(
    #[case] width: WidthClass,
    #[case] bytes: usize,
    #[case] registers: usize,
    #[case] mask: u128,
) {
    assert_eq!(width.bytes(), bytes);
    assert_eq!(width.bits() as usize, bytes * 8);
    assert_eq!(width.registers(), registers);
    assert_eq!(width.value_mask(), mask);
}

#[test]
fn test_width_from_bits() {
    for width in WidthClass::ALL {
        assert_eq!(WidthClass::try_from(width.bits()), Ok(width));
        assert_eq!(u32::from(width), width.bits());
    }
    assert!(WidthClass::try_from(64).is_err());
    assert!(WidthClass::try_from(0).is_err());
}

#[test]
fn test_width_serde_as_bit_count() {
    let json = serde_json::to_string(&WidthClass::Bits16).unwrap();
    assert_eq!(json, "16");
    let width: WidthClass = serde_json::from_str("128").unwrap();
    assert_eq!(width, WidthClass::Bits128);
    assert!(serde_json::from_str::<WidthClass>("24").is_err());
}
