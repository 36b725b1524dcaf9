use std::sync::Mutex;

use tempfile::NamedTempFile;

use detection_hud::config::HudConfig;
use detection_hud::Color;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "HUD_CONFIG",
        "HUD_MODEL_INPUT_SIZE",
        "HUD_HEADER_HEIGHT",
        "HUD_LABELS",
        "HUD_FONT_PATH",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r##"{
        "overlay": {
            "model_input_size": 608.0,
            "header_height": 96.0,
            "base_stroke_width": 8.0,
            "max_opacity": 0.8
        },
        "labels": ["person", "car", "dog"],
        "colors": ["#ff0000", "#00ff00", "#0000ff"],
        "font_path": "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
    }"##;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("HUD_CONFIG", file.path());
    std::env::set_var("HUD_HEADER_HEIGHT", "128");
    std::env::set_var("HUD_LABELS", "person, bicycle , car");

    let cfg = HudConfig::load().expect("load config");

    assert_eq!(cfg.overlay.model_input_size, 608.0);
    assert_eq!(cfg.overlay.header_height, 128.0);
    assert_eq!(cfg.overlay.base_stroke_width, 8.0);
    assert_eq!(cfg.overlay.max_opacity, 0.8);
    // File defaults survive where nothing overrides them.
    assert_eq!(cfg.overlay.edge_padding, 5.0);
    assert_eq!(cfg.labels, vec!["person", "bicycle", "car"]);
    assert_eq!(
        cfg.colors.as_deref(),
        Some(&[Color::rgb(255, 0, 0), Color::rgb(0, 255, 0), Color::rgb(0, 0, 255)][..])
    );
    assert_eq!(
        cfg.font_path.as_ref().map(|p| p.display().to_string()),
        Some("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".to_string())
    );

    clear_env();
}

#[test]
fn defaults_apply_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = HudConfig::load().expect("load defaults");
    assert_eq!(cfg.overlay.model_input_size, 416.0);
    assert_eq!(cfg.overlay.header_height, 112.0);
    assert_eq!(cfg.labels.len(), 20);
    assert!(cfg.colors.is_none());
    assert!(cfg.font_path.is_none());
    // Generated palette covers every label.
    let palette = cfg.palette().expect("palette");
    assert_eq!(palette.len(), cfg.labels.len());

    clear_env();
}

#[test]
fn short_color_table_is_rejected_at_load_time() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r##"{
        "labels": ["person", "car", "dog"],
        "colors": ["#ff0000"]
    }"##;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");
    std::env::set_var("HUD_CONFIG", file.path());

    let err = HudConfig::load().expect_err("short color table must fail");
    assert!(err.to_string().contains("color table"));

    clear_env();
}

#[test]
fn invalid_geometry_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("HUD_MODEL_INPUT_SIZE", "0");
    let err = HudConfig::load().expect_err("zero input size must fail");
    assert!(err.to_string().contains("model_input_size"));

    std::env::set_var("HUD_MODEL_INPUT_SIZE", "not-a-number");
    assert!(HudConfig::load().is_err());

    clear_env();
}
