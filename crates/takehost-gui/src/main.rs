//! takehost-gui - edit one plugin's settings and save them as a preset.
//!
//! Exit codes: 2 invalid arguments, 3 plugin file not found, 4 plugin failed
//! to load. Otherwise runs until the window is closed.

use std::process::ExitCode;

use clap::Parser;
use eframe::egui;
use takehost_gui::{EditorApp, LaunchArgs, LaunchError, launch};

const APP_NAME: &str = "takehost";

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    // Bridge log:: records from eframe/egui into tracing
    let fallback = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .init();
    tracing_log::LogTracer::init().ok();
}

/// Report a start-up failure in a message box and on stderr.
fn report_failure(error: &LaunchError) {
    tracing::error!(code = error.exit_code(), "{error}");
    eprintln!("error: {error}");
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title(APP_NAME)
        .set_description(error.to_string())
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

fn main() -> ExitCode {
    let args = match LaunchArgs::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            init_logging(false);
            let error = LaunchError::InvalidArguments(e.render().to_string());
            report_failure(&error);
            return ExitCode::from(error.exit_code());
        }
    };

    init_logging(args.verbose);
    tracing::info!(
        sample_rate = args.sample_rate,
        block_size = args.block,
        "starting takehost editor"
    );

    let registry = takehost_builtin::default_registry();
    let editor = match launch(&registry, &args) {
        Ok(editor) => editor,
        Err(e) => {
            report_failure(&e);
            return ExitCode::from(e.exit_code());
        }
    };

    let title = args
        .plugin
        .as_deref()
        .and_then(|p| p.file_name())
        .map_or_else(|| APP_NAME.to_string(), |n| n.to_string_lossy().into_owned());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 480.0])
            .with_min_inner_size([360.0, 240.0])
            .with_title(title),
        ..Default::default()
    };

    match eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| Ok(Box::new(EditorApp::new(cc, editor)))),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "window system failed");
            ExitCode::FAILURE
        }
    }
}
