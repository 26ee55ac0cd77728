//! Packet builders for tests and benchmarks.
//!
//! Encoders write records in wire layout so decoders can be exercised
//! against byte buffers that look exactly like what the game sends.

#![cfg(any(test, feature = "benchmark"))]

use crate::wire::{
    CarMotionRecord, CarTelemetryRecord, HEADER_SIZE, LapDataRecord, NO_SECONDARY_PLAYER,
    PacketHeader, PacketId,
};

/// Header for an F1 25 packet of the given kind.
pub fn sample_header(packet: PacketId, player_car_index: u8) -> PacketHeader {
    PacketHeader {
        packet_format: 2025,
        game_year: 25,
        game_major_version: 1,
        game_minor_version: 6,
        packet_version: 1,
        packet_id: packet.as_u8(),
        session_uid: 0x5EED_CAFE_F00D_0001,
        session_time: 123.25,
        frame_identifier: 4_200,
        overall_frame_identifier: 4_200,
        player_car_index,
        secondary_player_car_index: NO_SECONDARY_PLAYER,
    }
}

/// Telemetry record whose values vary with `seed`.
pub fn sample_car_telemetry(seed: u16) -> CarTelemetryRecord {
    let s = seed as f32;
    let t = (seed % 200) as u8;
    CarTelemetryRecord {
        speed: 180 + seed,
        throttle: 0.75,
        steer: -0.125,
        brake: 0.0,
        clutch: 0,
        gear: (seed % 8) as i8 + 1,
        engine_rpm: 10_500 + seed,
        drs: (seed % 2) as u8,
        rev_lights_percent: 60,
        rev_lights_bit_value: 0x03FF,
        brakes_temperature: [400 + seed, 410 + seed, 380 + seed, 390 + seed],
        tyres_surface_temperature: [90 + t / 4, 91 + t / 4, 88 + t / 4, 89 + t / 4],
        tyres_inner_temperature: [100, 101, 98, 99],
        engine_temperature: 105,
        tyres_pressure: [23.5 + s / 100.0, 23.5, 21.75, 21.75],
        surface_type: [0, 0, 1, 0],
    }
}

/// Lap data record for `lap` and `sector` with plausible timing values.
pub fn sample_lap_data(lap: u8, sector: u8) -> LapDataRecord {
    LapDataRecord {
        last_lap_time_in_ms: 90_000 + u32::from(lap) * 17,
        current_lap_time_in_ms: 31_250,
        sector1_time_in_ms: 28_500,
        sector1_time_minutes: 0,
        sector2_time_in_ms: 30_100,
        sector2_time_minutes: 0,
        delta_to_car_in_front_in_ms: 850,
        delta_to_race_leader_in_ms: 4_200,
        lap_distance: 1_250.5,
        total_distance: 5_400.0 * f32::from(lap) + 1_250.5,
        safety_car_delta: 0.0,
        car_position: 4,
        current_lap_num: lap,
        pit_status: 0,
        num_pit_stops: 0,
        sector,
        current_lap_invalid: 0,
        penalties: 0,
        total_warnings: 1,
        corner_cutting_warnings: 1,
        num_unserved_drive_through_pens: 0,
        num_unserved_stop_go_pens: 0,
        grid_position: 6,
        driver_status: 4,
        result_status: 2,
        pit_lane_timer_active: 0,
        pit_lane_time_in_lane_in_ms: 0,
        pit_stop_timer_in_ms: 0,
        pit_stop_should_serve_pen: 0,
        speed_trap_fastest_speed: 318.5,
    }
}

/// Motion record whose values vary with `seed`.
pub fn sample_motion(seed: i16) -> CarMotionRecord {
    let s = f32::from(seed);
    CarMotionRecord {
        world_position_x: 100.0 + s,
        world_position_y: 2.5,
        world_position_z: -300.0 - s,
        world_velocity_x: 50.0,
        world_velocity_y: 0.0,
        world_velocity_z: 12.5,
        world_forward_dir_x: 30_000 - seed,
        world_forward_dir_y: 0,
        world_forward_dir_z: 13_000 + seed,
        world_right_dir_x: -13_000,
        world_right_dir_y: 0,
        world_right_dir_z: 30_000,
        g_force_lateral: 1.25 + s / 10.0,
        g_force_longitudinal: -0.5,
        g_force_vertical: 1.0,
        yaw: 0.75,
        pitch: 0.01,
        roll: -0.02,
    }
}

pub fn encode_header(header: &PacketHeader) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE);
    out.extend_from_slice(&header.packet_format.to_le_bytes());
    out.push(header.game_year);
    out.push(header.game_major_version);
    out.push(header.game_minor_version);
    out.push(header.packet_version);
    out.push(header.packet_id);
    out.extend_from_slice(&header.session_uid.to_le_bytes());
    out.extend_from_slice(&header.session_time.to_le_bytes());
    out.extend_from_slice(&header.frame_identifier.to_le_bytes());
    out.extend_from_slice(&header.overall_frame_identifier.to_le_bytes());
    out.push(header.player_car_index);
    out.push(header.secondary_player_car_index);
    out
}

pub fn encode_car_telemetry(t: &CarTelemetryRecord) -> Vec<u8> {
    let mut out = Vec::with_capacity(crate::wire::CAR_TELEMETRY_RECORD_SIZE);
    out.extend_from_slice(&t.speed.to_le_bytes());
    out.extend_from_slice(&t.throttle.to_le_bytes());
    out.extend_from_slice(&t.steer.to_le_bytes());
    out.extend_from_slice(&t.brake.to_le_bytes());
    out.push(t.clutch);
    out.extend_from_slice(&t.gear.to_le_bytes());
    out.extend_from_slice(&t.engine_rpm.to_le_bytes());
    out.push(t.drs);
    out.push(t.rev_lights_percent);
    out.extend_from_slice(&t.rev_lights_bit_value.to_le_bytes());
    for v in t.brakes_temperature {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.extend_from_slice(&t.tyres_surface_temperature);
    out.extend_from_slice(&t.tyres_inner_temperature);
    out.extend_from_slice(&t.engine_temperature.to_le_bytes());
    for v in t.tyres_pressure {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.extend_from_slice(&t.surface_type);
    out
}

pub fn encode_lap_data(l: &LapDataRecord) -> Vec<u8> {
    let mut out = Vec::with_capacity(crate::wire::LAP_DATA_RECORD_SIZE);
    out.extend_from_slice(&l.last_lap_time_in_ms.to_le_bytes());
    out.extend_from_slice(&l.current_lap_time_in_ms.to_le_bytes());
    out.extend_from_slice(&l.sector1_time_in_ms.to_le_bytes());
    out.push(l.sector1_time_minutes);
    out.extend_from_slice(&l.sector2_time_in_ms.to_le_bytes());
    out.push(l.sector2_time_minutes);
    out.extend_from_slice(&l.delta_to_car_in_front_in_ms.to_le_bytes());
    out.extend_from_slice(&l.delta_to_race_leader_in_ms.to_le_bytes());
    out.extend_from_slice(&l.lap_distance.to_le_bytes());
    out.extend_from_slice(&l.total_distance.to_le_bytes());
    out.extend_from_slice(&l.safety_car_delta.to_le_bytes());
    out.extend_from_slice(&[
        l.car_position,
        l.current_lap_num,
        l.pit_status,
        l.num_pit_stops,
        l.sector,
        l.current_lap_invalid,
        l.penalties,
        l.total_warnings,
        l.corner_cutting_warnings,
        l.num_unserved_drive_through_pens,
        l.num_unserved_stop_go_pens,
        l.grid_position,
        l.driver_status,
        l.result_status,
        l.pit_lane_timer_active,
    ]);
    out.extend_from_slice(&l.pit_lane_time_in_lane_in_ms.to_le_bytes());
    out.extend_from_slice(&l.pit_stop_timer_in_ms.to_le_bytes());
    out.push(l.pit_stop_should_serve_pen);
    out.extend_from_slice(&l.speed_trap_fastest_speed.to_le_bytes());
    out
}

pub fn encode_motion(m: &CarMotionRecord) -> Vec<u8> {
    let mut out = Vec::with_capacity(crate::wire::MOTION_RECORD_SIZE);
    for v in [
        m.world_position_x,
        m.world_position_y,
        m.world_position_z,
        m.world_velocity_x,
        m.world_velocity_y,
        m.world_velocity_z,
    ] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    for v in [
        m.world_forward_dir_x,
        m.world_forward_dir_y,
        m.world_forward_dir_z,
        m.world_right_dir_x,
        m.world_right_dir_y,
        m.world_right_dir_z,
    ] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    for v in [m.g_force_lateral, m.g_force_longitudinal, m.g_force_vertical, m.yaw, m.pitch, m.roll] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

/// Header followed by the given encoded records.
pub fn build_packet(header: &PacketHeader, records: &[Vec<u8>]) -> Vec<u8> {
    let mut out = encode_header(header);
    for record in records {
        out.extend_from_slice(record);
    }
    out
}

/// Full-grid packet of the given kind with the player's record at `player`.
pub fn full_grid_packet(packet: PacketId, player: u8) -> Vec<u8> {
    let header = sample_header(packet, player);
    let records: Vec<Vec<u8>> = (0..crate::wire::MAX_CARS as u16)
        .map(|i| match packet {
            PacketId::Motion => encode_motion(&sample_motion(i as i16)),
            PacketId::LapData => encode_lap_data(&sample_lap_data(i as u8 + 1, (i % 3) as u8)),
            _ => encode_car_telemetry(&sample_car_telemetry(i)),
        })
        .collect();
    build_packet(&header, &records)
}
