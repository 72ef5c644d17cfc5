// Copyright 2026 WakeDeck Desktop Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::Duration;

use eframe::egui;
use log::warn;
use wake_client::{Dashboard, PingPhase, ServerRecord, StatusKind};

use crate::config::AppConfig;

/// Shared dashboard password, fixed at build time. When unset, every login
/// attempt is rejected.
const DASHBOARD_PASSWORD: Option<&str> = option_env!("WAKEDECK_PASSWORD");

const REPAINT_PERIOD: Duration = Duration::from_millis(100);

pub struct WakeDeckApp {
    config: AppConfig,
    dashboard: Dashboard,

    // Add-server form state
    url_input: String,
    name_input: String,

    // Login screen state
    password_input: String,
    show_password: bool,
    login_error: String,
}

impl WakeDeckApp {
    pub fn new(config: AppConfig, dashboard: Dashboard) -> Self {
        if config.authenticated {
            dashboard.reload();
        }
        Self {
            config,
            dashboard,
            url_input: String::new(),
            name_input: String::new(),
            password_input: String::new(),
            show_password: false,
            login_error: String::new(),
        }
    }

    fn try_login(&mut self) {
        self.login_error.clear();

        let expected = DASHBOARD_PASSWORD.map(str::trim);
        if expected.is_some_and(|p| p == self.password_input) {
            self.config.authenticated = true;
            if let Err(e) = self.config.save() {
                warn!("Failed to persist session flag: {}", e);
            }
            self.password_input.clear();
            self.dashboard.reload();
        } else {
            self.login_error = "Invalid password. Please try again.".to_string();
        }
    }

    fn logout(&mut self) {
        self.config.authenticated = false;
        if let Err(e) = self.config.save() {
            warn!("Failed to persist session flag: {}", e);
        }
        self.password_input.clear();
        self.login_error.clear();
        self.dashboard.clear_servers();
    }

    fn draw_login(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(ui.available_height() * 0.25);
            ui.vertical_centered(|ui| {
                ui.heading(
                    egui::RichText::new("Server Dashboard")
                        .size(28.0)
                        .strong(),
                );
                ui.label(
                    egui::RichText::new("Enter password to access the dashboard")
                        .color(egui::Color32::from_rgb(150, 150, 150)),
                );
                ui.add_space(16.0);

                ui.allocate_ui(egui::vec2(280.0, 0.0), |ui| {
                    ui.horizontal(|ui| {
                        let field = ui.add(
                            egui::TextEdit::singleline(&mut self.password_input)
                                .password(!self.show_password)
                                .hint_text("Enter password")
                                .desired_width(220.0),
                        );
                        let submitted = field.lost_focus()
                            && ui.input(|i| i.key_pressed(egui::Key::Enter));

                        let eye = if self.show_password { "🙈" } else { "👁" };
                        if ui.button(eye).on_hover_text("Show/hide password").clicked() {
                            self.show_password = !self.show_password;
                        }

                        if submitted {
                            self.try_login();
                        }
                    });

                    ui.add_space(8.0);
                    if ui
                        .add_sized(egui::vec2(250.0, 30.0), egui::Button::new("Access Dashboard"))
                        .clicked()
                    {
                        self.try_login();
                    }
                });

                if !self.login_error.is_empty() {
                    ui.add_space(10.0);
                    egui::Frame::group(ui.style())
                        .fill(egui::Color32::from_rgba_unmultiplied(80, 20, 20, 200))
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(&self.login_error)
                                    .color(egui::Color32::from_rgb(255, 150, 150)),
                            );
                        });
                }
            });
        });
    }

    fn draw_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(egui::RichText::new("Server Dashboard").size(24.0).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Logout").on_hover_text("Logout").clicked() {
                    self.logout();
                }
            });
        });
        ui.add_space(8.0);
    }

    fn draw_add_form(&mut self, ui: &mut egui::Ui) {
        // Consume the one-shot clear event raised by a successful add.
        if self.dashboard.take_clear_inputs() {
            self.url_input.clear();
            self.name_input.clear();
        }

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.label(egui::RichText::new("Add New Server").size(16.0).strong());
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.url_input)
                        .hint_text("Server URL (e.g., https://myapp.onrender.com)")
                        .desired_width(320.0),
                );
                ui.add(
                    egui::TextEdit::singleline(&mut self.name_input)
                        .hint_text("Server Name (optional)")
                        .desired_width(200.0),
                );
            });

            ui.add_space(6.0);

            let adding = self.dashboard.is_adding();
            let can_submit = !adding && !self.url_input.trim().is_empty();
            let label = if adding { "Adding..." } else { "Add Server" };
            if ui
                .add_enabled(can_submit, egui::Button::new(label))
                .clicked()
            {
                self.dashboard.add_server(&self.url_input, &self.name_input);
            }

            if let Some((text, kind)) = self.dashboard.status() {
                ui.add_space(6.0);
                let color = match kind {
                    StatusKind::Success => egui::Color32::from_rgb(120, 220, 120),
                    StatusKind::Error => egui::Color32::from_rgb(255, 130, 130),
                    StatusKind::Info => egui::Color32::from_rgb(130, 180, 255),
                };
                ui.label(egui::RichText::new(text).color(color));
            }
        });
    }

    fn draw_server_list(&mut self, ui: &mut egui::Ui) {
        let servers = self.dashboard.servers();

        egui::Frame::group(ui.style()).show(ui, |ui| {
            let count = servers.as_ref().map_or(0, Vec::len);
            ui.label(
                egui::RichText::new(format!("Your Servers ({})", count))
                    .size(16.0)
                    .strong(),
            );
            ui.add_space(4.0);

            match servers {
                None => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(
                            egui::RichText::new("Loading servers...")
                                .color(egui::Color32::from_rgb(150, 150, 150)),
                        );
                    });
                }
                Some(servers) if servers.is_empty() => {
                    ui.vertical_centered(|ui| {
                        ui.add_space(24.0);
                        ui.label(egui::RichText::new("No servers added yet").size(15.0).strong());
                        ui.label(
                            egui::RichText::new("Add your first server above to get started!")
                                .color(egui::Color32::from_rgb(150, 150, 150)),
                        );
                        ui.add_space(24.0);
                    });
                }
                Some(servers) => {
                    for server in &servers {
                        self.draw_server_card(ui, server);
                        ui.add_space(4.0);
                    }
                }
            }
        });
    }

    fn draw_server_card(&self, ui: &mut egui::Ui, server: &ServerRecord) {
        let pinging = self.dashboard.is_pinging(server.id);
        let deleting = self.dashboard.is_deleting(server.id);

        egui::Frame::group(ui.style())
            .fill(egui::Color32::from_rgba_unmultiplied(40, 45, 50, 180))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(
                            egui::RichText::new(server.display_name())
                                .size(14.0)
                                .strong(),
                        );
                        ui.label(
                            egui::RichText::new(&server.url)
                                .size(11.0)
                                .color(egui::Color32::from_rgb(150, 150, 150)),
                        );
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let delete_label = if deleting { "Deleting..." } else { "Delete" };
                        if ui
                            .add_enabled(
                                !deleting && !pinging,
                                egui::Button::new(
                                    egui::RichText::new(delete_label)
                                        .color(egui::Color32::from_rgb(255, 150, 150)),
                                ),
                            )
                            .clicked()
                        {
                            self.dashboard.delete_server(server.id);
                        }

                        let wake_label = if pinging { "Pinging..." } else { "Wake" };
                        if ui
                            .add_enabled(
                                !pinging && !deleting,
                                egui::Button::new(
                                    egui::RichText::new(wake_label)
                                        .color(egui::Color32::from_rgb(150, 220, 150)),
                                ),
                            )
                            .clicked()
                        {
                            self.dashboard.start_ping(server);
                        }
                    });
                });

                if let Some(session) = self.dashboard.ping_session(server.id) {
                    let color = match session.phase {
                        PingPhase::Pinging => egui::Color32::from_rgb(130, 180, 255),
                        PingPhase::Resolved => egui::Color32::from_rgb(120, 220, 120),
                    };
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(&session.message).size(11.0).color(color));
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                ui.label(
                                    egui::RichText::new(&session.timestamp)
                                        .size(10.0)
                                        .color(egui::Color32::from_rgb(120, 120, 120)),
                                );
                            },
                        );
                    });
                }
            });
    }
}

impl eframe::App for WakeDeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keep repainting so ticking ping messages stay live.
        ctx.request_repaint_after(REPAINT_PERIOD);

        if !self.config.authenticated {
            self.draw_login(ctx);
            return;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.draw_header(ui);
                self.draw_add_form(ui);
                ui.add_space(8.0);
                self.draw_server_list(ui);
            });
        });
    }
}
