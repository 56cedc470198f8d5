mod app;
pub mod i18n;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state` etc. resolve to the lib
// crate types everywhere in the binary.
pub use scene_demos_lib::state;

use std::path::PathBuf;

use app::{DemoApp, LaunchOptions};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scene_demos=info,scene_demos_lib=info".into()),
        )
        .init();

    let options = parse_args(std::env::args().skip(1));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Scene Demos")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "scene-demos",
        native_options,
        Box::new(move |cc| Ok(Box::new(DemoApp::new(cc, options)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

/// `--demo <aim|particles|scroll|haunted>` and `--settings <path>`; anything else is logged and ignored
fn parse_args(mut args: impl Iterator<Item = String>) -> LaunchOptions {
    let mut options = LaunchOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => match args.next().map(|v| v.parse()) {
                Some(Ok(demo)) => options.demo = Some(demo),
                Some(Err(e)) => tracing::error!("{e}"),
                None => tracing::error!("--demo needs a value"),
            },
            "--settings" => match args.next() {
                Some(path) => {
                    tracing::info!("Using settings from {path}");
                    options.settings_path = Some(PathBuf::from(path));
                }
                None => tracing::error!("--settings needs a path"),
            },
            other => tracing::warn!("Ignoring unknown argument {other}"),
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DemoKind;

    fn parse(args: &[&str]) -> LaunchOptions {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_demo_and_settings() {
        let o = parse(&["--demo", "particles", "--settings", "/tmp/s.json"]);
        assert_eq!(o.demo, Some(DemoKind::Particles));
        assert_eq!(o.settings_path, Some(PathBuf::from("/tmp/s.json")));
    }

    #[test]
    fn test_parse_scene_demos() {
        assert_eq!(parse(&["--demo", "scroll"]).demo, Some(DemoKind::Scroll));
        assert_eq!(parse(&["--demo", "haunted"]).demo, Some(DemoKind::Haunted));
    }

    #[test]
    fn test_parse_bad_demo_ignored() {
        let o = parse(&["--demo", "haunted-house", "--bogus"]);
        assert_eq!(o.demo, None);
        assert_eq!(o.settings_path, None);
    }

    #[test]
    fn test_parse_missing_value() {
        let o = parse(&["--demo"]);
        assert_eq!(o.demo, None);
    }
}
