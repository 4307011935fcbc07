// Main UI - Game window

use crate::audio::parameters::AtomicF32;
use crate::audio::status::{AtomicDeviceStatus, DeviceStatus};
use crate::config::GameConfig;
use crate::game::sequencer::{GamePhase, GameSequencer};
use crate::game::signal::Signal;
use crate::game::speed::PlaybackSpeed;
use crate::messaging::channels::NotificationConsumer;
use crate::messaging::notification::{Notification, NotificationCategory, NotificationLevel};
use eframe::egui;
use std::collections::VecDeque;
use std::time::Instant;

const PAD_SIZE: f32 = 130.0;
const MAX_NOTIFICATIONS: usize = 10;
/// How long a notification stays visible in the status bar.
const NOTIFICATION_AGE_MS: u64 = 5000;

pub struct SimonApp {
    sequencer: GameSequencer,
    volume_atomic: AtomicF32,
    volume_ui: f32,
    device_status: AtomicDeviceStatus,
    device_name: String,
    config: GameConfig,
    notification_rx: NotificationConsumer,
    notification_queue: VecDeque<Notification>,
}

impl SimonApp {
    pub fn new(
        sequencer: GameSequencer,
        volume_atomic: AtomicF32,
        device_status: AtomicDeviceStatus,
        device_name: String,
        notification_rx: NotificationConsumer,
        config: GameConfig,
    ) -> Self {
        let volume_ui = volume_atomic.get();

        Self {
            sequencer,
            volume_atomic,
            volume_ui,
            device_status,
            device_name,
            config,
            notification_rx,
            notification_queue: VecDeque::new(),
        }
    }

    /// Pull new notifications out of the ring buffer into the display queue.
    fn update_notifications(&mut self) {
        while let Some(notification) =
            ringbuf::traits::Consumer::try_pop(&mut self.notification_rx)
        {
            self.notification_queue.push_back(notification);

            if self.notification_queue.len() > MAX_NOTIFICATIONS {
                self.notification_queue.pop_front();
            }
        }
    }

    fn recent_notifications(&self) -> Vec<&Notification> {
        self.notification_queue
            .iter()
            .rev()
            .filter(|n| n.is_recent(NOTIFICATION_AGE_MS))
            .take(3)
            .collect()
    }

    fn save_config(&mut self) {
        if let Err(e) = self.config.save() {
            self.notification_queue.push_back(Notification::warning(
                NotificationCategory::Config,
                format!("Could not save settings: {}", e),
            ));
        }
    }

    fn pad_fill(signal: Signal, lit: bool) -> egui::Color32 {
        match (signal, lit) {
            (Signal::Green, false) => egui::Color32::from_rgb(76, 175, 80),
            (Signal::Green, true) => egui::Color32::from_rgb(165, 214, 167),
            (Signal::Red, false) => egui::Color32::from_rgb(244, 67, 54),
            (Signal::Red, true) => egui::Color32::from_rgb(239, 154, 154),
            (Signal::Yellow, false) => egui::Color32::from_rgb(255, 235, 59),
            (Signal::Yellow, true) => egui::Color32::from_rgb(255, 245, 157),
            (Signal::Blue, false) => egui::Color32::from_rgb(33, 150, 243),
            (Signal::Blue, true) => egui::Color32::from_rgb(144, 202, 249),
        }
    }

    fn draw_board(&mut self, ui: &mut egui::Ui, now: Instant) {
        let active = self.sequencer.active_signal();
        let accepting = self.sequencer.phase().accepts_input();

        for row in Signal::ALL.chunks(2) {
            ui.horizontal(|ui| {
                for &signal in row {
                    let lit = active == Some(signal);
                    let button = egui::Button::new("")
                        .fill(Self::pad_fill(signal, lit))
                        .min_size(egui::vec2(PAD_SIZE, PAD_SIZE));

                    let response = ui.add_enabled(accepting, button).on_hover_text(signal.label());
                    if response.clicked() {
                        self.sequencer.submit_input(signal, now);
                    }
                }
            });
        }
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui, now: Instant) {
        let running = self.sequencer.phase().is_running();

        ui.horizontal(|ui| {
            let start_label = if self.sequencer.phase() == GamePhase::GameOver {
                "Play again"
            } else {
                "Start game"
            };
            if ui
                .add_enabled(!running, egui::Button::new(start_label))
                .clicked()
            {
                self.sequencer.start_game(now);
            }

            if ui.button("Reset").clicked() {
                self.sequencer.reset_game();
            }
        });

        ui.add_space(5.0);

        let mut selected = self.sequencer.speed();
        ui.add_enabled_ui(!running, |ui| {
            egui::ComboBox::from_label("Speed")
                .selected_text(selected.label())
                .show_ui(ui, |ui| {
                    for speed in PlaybackSpeed::ALL {
                        ui.selectable_value(&mut selected, speed, speed.label());
                    }
                });
        });
        if selected != self.sequencer.speed() {
            self.sequencer.set_speed(selected);
            self.config.speed = self.sequencer.speed();
            self.save_config();
        }

        let response = ui.add(egui::Slider::new(&mut self.volume_ui, 0.0..=1.0).text("Volume"));
        if response.changed() {
            self.volume_atomic.set(self.volume_ui);
            self.config.volume = self.volume_ui;
        }
        if response.drag_stopped() {
            self.save_config();
        }
    }

    fn message(&self) -> String {
        match self.sequencer.phase() {
            GamePhase::Idle => String::new(),
            GamePhase::ShowingSequence => "Watch the sequence!".to_string(),
            GamePhase::AwaitingInput => "Your turn!".to_string(),
            GamePhase::RoundComplete => "Correct!".to_string(),
            GamePhase::GameOver => {
                format!("Game over! You reached round {}", self.sequencer.round())
            }
        }
    }

    fn draw_status_bar(&self, ui: &mut egui::Ui) {
        ui.separator();
        ui.horizontal(|ui| {
            let (status_text, status_color) = match self.device_status.get() {
                DeviceStatus::Connected => ("OK", egui::Color32::from_rgb(100, 200, 100)),
                DeviceStatus::Connecting => ("...", egui::Color32::from_rgb(255, 165, 0)),
                DeviceStatus::Disconnected => ("off", egui::Color32::GRAY),
                DeviceStatus::Error => ("error", egui::Color32::RED),
            };
            ui.colored_label(
                status_color,
                format!("Audio: {} ({})", self.device_name, status_text),
            );
            ui.add_space(10.0);

            let recent = self.recent_notifications();
            if recent.is_empty() {
                ui.label("Ready");
            } else {
                for notification in recent {
                    let (icon, color) = match notification.level {
                        NotificationLevel::Info => ("ℹ", egui::Color32::from_rgb(100, 150, 255)),
                        NotificationLevel::Warning => ("⚠", egui::Color32::from_rgb(255, 165, 0)),
                        NotificationLevel::Error => ("✖", egui::Color32::RED),
                    };
                    ui.colored_label(color, icon);
                    ui.colored_label(color, &notification.message);
                    ui.add_space(10.0);
                }
            }
        });
    }
}

impl eframe::App for SimonApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Repaint every frame so scheduled game steps fire on time.
        ctx.request_repaint();

        let now = Instant::now();
        self.sequencer.tick(now);
        self.update_notifications();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Simon Says");
            ui.label("Watch the color sequence, memorize it and repeat it.");
            ui.add_space(10.0);

            ui.strong(format!("Round: {}", self.sequencer.round()));
            ui.add_space(10.0);

            self.draw_board(ui, now);
            ui.add_space(10.0);

            self.draw_controls(ui, now);
            ui.add_space(10.0);

            ui.strong(self.message());

            self.draw_status_bar(ui);
        });
    }
}
