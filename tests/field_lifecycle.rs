//! Integration tests for the field lifecycle.
//!
//! These drive a [`ParticleField`] headless with a [`ManualHost`] and a
//! [`RecordingSurface`], one frame at a time, the way a host event loop would.

use particle_field::prelude::*;
use particle_field::{FrameToken, ListenerKind};

const FRAME: f32 = 1.0 / 60.0;

type TestField = ParticleField<RecordingSurface, ManualHost>;

fn mount(config: FieldConfig, viewport: Viewport) -> (TestField, RecordingSurface) {
    let surface = RecordingSurface::new();
    let recording = surface.clone();
    let mut field = ParticleField::new(config, ManualHost::new());
    assert!(field.initialize(viewport, |_| Ok(surface)));
    (field, recording)
}

fn mount_default(seed: u64) -> (TestField, RecordingSurface) {
    mount(
        FieldConfig::new().with_seed(seed),
        Viewport::new(800.0, 600.0, 1.0),
    )
}

/// Run `frames` scheduled frames, advancing elapsed time by one 60 Hz step each.
fn run_frames(field: &mut TestField, start: f32, frames: u32) -> f32 {
    let mut elapsed = start;
    for _ in 0..frames {
        let token = field
            .host_mut()
            .take_due_frame()
            .expect("a running field always has a frame pending");
        elapsed += FRAME;
        assert!(field.on_frame(token, elapsed).is_some());
    }
    elapsed
}

// ============================================================================
// Mount
// ============================================================================

#[test]
fn test_mount_starts_running() {
    let (field, recording) = mount_default(1);

    assert_eq!(field.state(), FieldState::Running);
    assert_eq!(field.particles().len(), 120);
    assert!(field.host().is_listening(ListenerKind::PointerMove));
    assert!(field.host().is_listening(ListenerKind::Resize));
    assert_eq!(field.host().frames_requested, 1);
    assert_eq!(recording.draw_count(), 0);
}

#[test]
fn test_pixel_ratio_capped_at_mount() {
    let (field, recording) = mount(
        FieldConfig::new().with_seed(1),
        Viewport::new(1280.0, 720.0, 3.0),
    );
    assert_eq!(field.viewport().pixel_ratio, 2.0);
    assert_eq!(recording.viewport(), Some(Viewport::new(1280.0, 720.0, 2.0)));
}

#[test]
fn test_missing_context_degrades_to_blank() {
    let mut field: TestField = ParticleField::new(FieldConfig::new(), ManualHost::new());
    let started = field.initialize(Viewport::new(800.0, 600.0, 1.0), |_| {
        Err(FieldError::NoSurface)
    });

    assert!(!started);
    assert_eq!(field.state(), FieldState::Uninitialized);
    assert!(field.particles().is_empty());
    assert_eq!(field.host().listener_count(), 0);
    assert_eq!(field.host().frames_requested, 0);
    assert!(field.tick(1.0).is_none());

    // Unmounting a blank field is still clean
    assert!(!field.teardown());
    assert_eq!(field.state(), FieldState::TornDown);
    assert!(field.host().cancelled.is_empty());
}

#[test]
fn test_invalid_config_degrades_to_blank() {
    let config = FieldConfig::new()
        .with_radius(0.0)
        .with_distribution(Distribution::Cube);
    let mut field: TestField = ParticleField::new(config, ManualHost::new());

    let acquired = std::cell::Cell::new(false);
    let started = field.initialize(Viewport::new(800.0, 600.0, 1.0), |_| {
        acquired.set(true);
        Ok(RecordingSurface::new())
    });

    assert!(!started);
    assert!(!acquired.get(), "no surface is acquired for a rejected config");
    assert_eq!(field.state(), FieldState::Uninitialized);
    assert!(field.particles().is_empty());
    assert_eq!(field.host().listener_count(), 0);
    assert_eq!(field.host().frames_requested, 0);
}

// ============================================================================
// Frames
// ============================================================================

#[test]
fn test_point_count_constant_across_frames() {
    let (mut field, recording) = mount_default(2);
    let mut elapsed = 0.0;

    for _ in 0..30 {
        elapsed = run_frames(&mut field, elapsed, 1);
        assert_eq!(field.particles().len(), 120);
        let frame = recording.last_frame().expect("frame drawn");
        assert_eq!(frame.points.len(), 120);
    }
    assert_eq!(recording.draw_count(), 30);
    assert_eq!(field.frames(), 30);
}

#[test]
fn test_edges_match_distance_threshold() {
    let config = FieldConfig::new()
        .with_seed(3)
        .with_connection_distance(20.0);
    let (mut field, _recording) = mount(config, Viewport::new(800.0, 600.0, 1.0));
    run_frames(&mut field, 0.0, 10);

    let particles = field.particles();
    let edges = field.edges();
    assert!(!edges.is_empty());

    for i in 0..particles.len() {
        for j in (i + 1)..particles.len() {
            let close = particles[i].position.distance(particles[j].position) < 20.0;
            let found = edges
                .iter()
                .any(|e| e.a as usize == i && e.b as usize == j);
            assert_eq!(close, found, "pair ({}, {})", i, j);
        }
    }
}

#[test]
fn test_line_count_bounded_by_edges() {
    let (mut field, recording) = mount_default(4);
    let token = field.host_mut().take_due_frame().unwrap();
    let stats = field.on_frame(token, 0.5).unwrap();

    assert_eq!(stats.points, 120);
    assert_eq!(stats.edges, field.edges().len());
    assert!(stats.lines <= stats.edges);
    assert_eq!(recording.last_frame().unwrap().lines.len(), stats.lines);
}

#[test]
fn test_same_seed_same_frames() {
    let (mut a, recording_a) = mount_default(11);
    let (mut b, recording_b) = mount_default(11);

    run_frames(&mut a, 0.0, 20);
    run_frames(&mut b, 0.0, 20);

    assert_eq!(a.particles(), b.particles());
    assert_eq!(a.edges(), b.edges());
    let frame_a = recording_a.last_frame().unwrap();
    let frame_b = recording_b.last_frame().unwrap();
    assert_eq!(frame_a.points, frame_b.points);
    assert_eq!(frame_a.lines, frame_b.lines);
}

#[test]
fn test_different_seeds_differ() {
    let (a, _) = mount_default(1);
    let (b, _) = mount_default(2);
    assert_ne!(a.particles(), b.particles());
}

#[test]
fn test_stale_token_ignored() {
    let (mut field, _recording) = mount_default(5);
    let first = field.host_mut().take_due_frame().unwrap();
    assert!(field.on_frame(first, FRAME).is_some());

    // The first token has been consumed; replaying it must not tick
    assert!(field.on_frame(first, 2.0 * FRAME).is_none());
    assert!(field.on_frame(FrameToken(999), 2.0 * FRAME).is_none());
    assert_eq!(field.frames(), 1);
    assert!(field.host().has_pending_frame());
}

#[test]
fn test_positions_depend_only_on_elapsed() {
    let (mut stepped, _) = mount_default(6);
    let (mut jumped, _) = mount_default(6);

    let elapsed = run_frames(&mut stepped, 0.0, 90);
    let token = jumped.host_mut().take_due_frame().unwrap();
    jumped.on_frame(token, elapsed);

    assert_eq!(stepped.particles(), jumped.particles());
}

// ============================================================================
// Resize and pointer
// ============================================================================

#[test]
fn test_resize_applied_on_next_frame() {
    let (mut field, recording) = mount_default(7);
    field.on_resize(Viewport::new(1024.0, 768.0, 3.0));

    // Recorded, not applied
    assert_eq!(recording.viewport(), Some(Viewport::new(800.0, 600.0, 1.0)));
    assert_eq!(field.camera().aspect, 800.0 / 600.0);

    run_frames(&mut field, 0.0, 1);
    assert_eq!(recording.viewport(), Some(Viewport::new(1024.0, 768.0, 2.0)));
    assert_eq!(field.viewport(), Viewport::new(1024.0, 768.0, 2.0));
    assert!((field.camera().aspect - 1024.0 / 768.0).abs() < 1e-6);
}

#[test]
fn test_only_latest_resize_applies() {
    let (mut field, recording) = mount_default(7);
    field.on_resize(Viewport::new(300.0, 300.0, 1.0));
    field.on_resize(Viewport::new(640.0, 480.0, 1.0));
    run_frames(&mut field, 0.0, 1);
    assert_eq!(recording.viewport(), Some(Viewport::new(640.0, 480.0, 1.0)));
}

#[test]
fn test_camera_eases_toward_pointer() {
    let config = FieldConfig::new().with_seed(8);
    let sway = config.pointer_sway;
    let distance = config.camera_distance;
    let (mut field, _recording) = mount(config, Viewport::new(800.0, 600.0, 1.0));

    field.on_pointer_move(1.0, 1.0);
    let mut elapsed = 0.0;
    let mut last_gap = f32::MAX;
    for _ in 0..60 {
        // Keep the pointer active so the idle orbit never takes over
        field.on_pointer_move(1.0, 1.0);
        elapsed = run_frames(&mut field, elapsed, 1);
        let gap = field
            .camera()
            .position
            .distance(Vec3::new(sway, sway, distance));
        assert!(gap < last_gap);
        last_gap = gap;
    }
    // 60 frames at 5% per frame closes about 95% of the gap
    assert!(last_gap < 0.06 * sway * std::f32::consts::SQRT_2);
}

#[test]
fn test_non_finite_pointer_ignored() {
    let config = FieldConfig::new().with_seed(8);
    let distance = config.camera_distance;
    let (mut field, _recording) = mount(config, Viewport::new(800.0, 600.0, 1.0));

    field.on_pointer_move(f32::NAN, 0.0);
    field.on_pointer_move(0.0, f32::INFINITY);
    let elapsed = run_frames(&mut field, 0.0, 1);
    assert!(field.camera().position.is_finite());

    field.on_pointer_move(0.0, 0.0);
    run_frames(&mut field, elapsed, 100);
    let position = field.camera().position;
    assert!(position.is_finite());
    assert!(position.distance(Vec3::new(0.0, 0.0, distance)) < 1.0);
}

#[test]
fn test_camera_orbits_when_idle() {
    let config = FieldConfig::new().with_seed(9).with_camera_damping(1.0);
    let distance = config.camera_distance;
    let (mut field, _recording) = mount(config, Viewport::new(800.0, 600.0, 1.0));

    run_frames(&mut field, 10.0, 1);
    let position = field.camera().position;
    assert!((position.length() - distance).abs() < 1e-2);
    assert!(position.x.abs() > 1.0, "camera should have rotated away from +Z");
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn test_teardown_releases_everything() {
    let (mut field, recording) = mount_default(10);
    run_frames(&mut field, 0.0, 3);
    let pending = field.pending_frame().unwrap();

    assert!(field.teardown());

    assert_eq!(field.state(), FieldState::TornDown);
    assert_eq!(field.host().cancelled, vec![pending]);
    assert!(!field.host().has_pending_frame());
    assert_eq!(field.host().listener_count(), 0);
    assert!(recording.released());
    assert!(field.particles().is_empty());
    assert!(field.edges().is_empty());
}

#[test]
fn test_no_frames_after_teardown() {
    let (mut field, recording) = mount_default(10);
    run_frames(&mut field, 0.0, 2);
    let requested = field.host().frames_requested;
    let pending = field.pending_frame().unwrap();
    field.teardown();

    assert!(field.on_frame(pending, 1.0).is_none());
    assert!(field.tick(1.0).is_none());
    field.on_pointer_move(0.5, 0.5);
    field.on_resize(Viewport::new(10.0, 10.0, 1.0));

    assert_eq!(field.host().frames_requested, requested);
    assert_eq!(recording.draw_count(), 2);
}

#[test]
fn test_teardown_is_idempotent() {
    let (mut field, _recording) = mount_default(10);
    assert!(field.teardown());
    assert!(!field.teardown());
    assert_eq!(field.host().cancelled.len(), 1);

    // A torn-down field cannot be remounted
    assert!(!field.initialize(Viewport::new(800.0, 600.0, 1.0), |_| Ok(RecordingSurface::new())));
    assert_eq!(field.state(), FieldState::TornDown);
}
