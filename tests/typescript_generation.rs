//! TypeScript Generation Tests
//!
//! Validates that racewire data types can be exported to TypeScript when the
//! tauri feature is enabled.

#[cfg(feature = "tauri")]
#[test]
fn test_core_types_implement_specta_type() {
    use specta::Type;

    // If this compiles, the types are configured for TypeScript export.
    fn assert_type<T: Type>() {}

    // Wire records
    assert_type::<racewire::PacketHeader>();
    assert_type::<racewire::PacketId>();
    assert_type::<racewire::CarTelemetryRecord>();
    assert_type::<racewire::LapDataRecord>();
    assert_type::<racewire::CarMotionRecord>();
    assert_type::<racewire::Wheel>();

    // Events and derived values
    assert_type::<racewire::PacketData>();
    assert_type::<racewire::LapCompleted>();
    assert_type::<racewire::SectorChanged>();
    assert_type::<racewire::Gear>();
    assert_type::<racewire::UpdateRate>();
    assert_type::<racewire::SessionSummary>();
}

#[cfg(not(feature = "tauri"))]
#[test]
fn test_tauri_feature_disabled() {
    // Types still compile without specta::Type
    let _ = racewire::UpdateRate::Native;
    let _ = racewire::Gear::from_raw(3);
}
