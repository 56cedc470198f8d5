//! Integration tests for the application state: settings files, particle
//! field and debug panel edits, without a window.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use scene_demos_lib::assets::AlphaMap;
use scene_demos_lib::particles::ParticleField;
use scene_demos_lib::state::{AppSettings, AppState, DemoKind, SettingsError};
use shared::{ConfigError, HauntedConfig, ParticleConfig, Rgb, ScrollConfig, TrainerConfig};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scene-demos-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn test_settings_file_drives_state() {
    let path = scratch("state.json");
    std::fs::write(
        &path,
        r##"{
            "demo": "particles",
            "trainer": { "trials_per_session": 5, "idle_color": "#112233" },
            "particles": { "count": 2100, "theme": 4 },
            "asset_dir": "/nonexistent/assets"
        }"##,
    )
    .unwrap();

    let settings = AppSettings::load_from(&path).unwrap();
    let state = AppState::from_settings(settings);

    assert_eq!(state.demo, DemoKind::Particles);
    assert_eq!(state.trainer.config().trials_per_session, 5);
    assert_eq!(state.trainer.config().idle_color.to_hex(), "#112233");
    assert_eq!(state.particles.count(), 2100);
    // Missing sprite file falls back to the procedural one
    assert_eq!(*state.sprite, AlphaMap::soft_disc(32));
}

#[test]
fn test_bad_color_rejected() {
    let path = scratch("bad_color.json");
    std::fs::write(&path, r#"{"trainer": {"hover_color": "red"}}"#).unwrap();
    assert!(matches!(AppSettings::load_from(&path), Err(SettingsError::Parse(_))));
}

#[test]
fn test_inverted_scale_range_rejected_by_state() {
    let mut state = AppState::default();
    let cfg = TrainerConfig {
        scale_min: 2.0,
        scale_max: 1.0,
        ..Default::default()
    };
    let err = state.apply_trainer_config(cfg).unwrap_err();
    assert!(matches!(err, ConfigError::InvertedRange { field: "scale", .. }));
    assert_eq!(state.trainer.config(), &TrainerConfig::default());
    assert!(state.last_error.as_deref().is_some_and(|m| m.contains("scale")));
}

#[test]
fn test_particle_edit_regenerates() {
    let mut state = AppState::default();
    let before = state.particles.version();
    let cfg = ParticleConfig {
        count: 5100,
        size: 0.05,
        ..Default::default()
    };
    state.apply_particle_config(cfg.clone()).unwrap();

    assert_eq!(state.particles.count(), 5100);
    assert_eq!(state.particles.version(), before + 1);
    assert_eq!(state.settings.particles, cfg);
}

#[test]
fn test_particle_wave_over_time() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut field = ParticleField::generate(ParticleConfig::default(), &mut rng).unwrap();

    for t in [0.0_f32, 0.5, 3.0, 120.0] {
        field.animate(t);
        for p in field.positions().chunks_exact(3) {
            assert!((p[1] - (t + p[0]).sin()).abs() < 1e-5);
            assert!((-5.0..5.0).contains(&p[0]));
            assert!((-5.0..5.0).contains(&p[2]));
        }
    }
}

#[test]
fn test_same_seed_same_field() {
    let a = ParticleField::generate(ParticleConfig::default(), &mut StdRng::seed_from_u64(1)).unwrap();
    let b = ParticleField::generate(ParticleConfig::default(), &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(a.positions(), b.positions());
    assert_eq!(a.colors(), b.colors());
}

#[test]
fn test_scene_settings_round_trip() {
    let path = scratch("scenes.json");
    let settings = AppSettings {
        demo: DemoKind::Haunted,
        scroll: ScrollConfig {
            section_distance: 5.0,
            star_count: 40,
            material_color: Rgb([0xff, 0xee, 0xdd]),
            ..Default::default()
        },
        haunted: HauntedConfig {
            grave_count: 7,
            fog_color: Rgb([0x10, 0x10, 0x20]),
            ..Default::default()
        },
        ..Default::default()
    };
    settings.save_to(&path).unwrap();

    let state = AppState::from_settings(AppSettings::load_from(&path).unwrap());
    assert_eq!(state.demo, DemoKind::Haunted);
    assert_eq!(state.scroll.stars().len(), 40 * 3);
    assert_eq!(state.scroll.sections()[1].position.y, -5.0);
    assert_eq!(state.haunted.graves().len(), 7);
    assert_eq!(state.haunted.config().fog_color.to_hex(), "#101020");
}

#[test]
fn test_inverted_fog_rejected_on_load() {
    let path = scratch("bad_fog.json");
    std::fs::write(&path, r#"{"haunted": {"fog_near": 20.0, "fog_far": 5.0}}"#).unwrap();
    assert!(AppSettings::load_from(&path).is_err());
}
