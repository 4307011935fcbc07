use simon_says::ui::app::SimonApp;
use simon_says::{
    AudioEngine, GameConfig, GameSequencer, create_command_channel, create_notification_channel,
};
use std::sync::{Arc, Mutex};

// Ringbuffer capacity constants
// Commands are at most a handful per frame (one tone per pad press or
// playback step), so these are generous.
const COMMAND_RINGBUFFER_CAPACITY: usize = 64;
const NOTIFICATION_RINGBUFFER_CAPACITY: usize = 256;

fn main() {
    println!("=== Simon Says ===\n");

    let config = GameConfig::load();

    let (command_tx, command_rx) = create_command_channel(COMMAND_RINGBUFFER_CAPACITY);
    let (notification_tx, notification_rx) =
        create_notification_channel(NOTIFICATION_RINGBUFFER_CAPACITY);
    let notification_tx = Arc::new(Mutex::new(notification_tx));

    println!("Audio engine initialisation...");
    let audio_engine = match AudioEngine::new(command_rx, notification_tx, config.volume) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return;
        }
    };
    println!("Audio device: {}", audio_engine.device_name());

    let sequencer = GameSequencer::new(command_tx, config.speed);

    println!("\nLaunching UI...\n");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([360.0, 560.0])
            .with_title("Simon Says"),
        ..Default::default()
    };

    let device_name = audio_engine.device_name().to_string();
    let volume = audio_engine.volume.clone();
    let status = audio_engine.status.clone();

    let _ = eframe::run_native(
        "Simon Says",
        native_options,
        Box::new(move |_cc| {
            let app = SimonApp::new(
                sequencer,
                volume,
                status,
                device_name,
                notification_rx,
                config,
            );

            Ok(Box::new(app))
        }),
    );
}
