//! Application state and main loop

use crate::action::Action;
use crate::clipboard;
use crate::components::{Component, WizardComponent};
use crate::persist;
use crate::tui::{self, Tui};
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use pangolin_api::SetupClient;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Main application state
pub struct App {
    /// Whether the application should quit
    should_quit: bool,
    /// The wizard owns all configuration state
    wizard: WizardComponent,
    /// Client for the setup daemon
    client: SetupClient,
    /// Local blob path for the persistence fallback
    blob_path: Option<PathBuf>,
    /// Tick rate for animations (ms)
    tick_rate: Duration,
    /// Channel for async call results
    result_rx: mpsc::UnboundedReceiver<AsyncResult>,
    result_tx: mpsc::UnboundedSender<AsyncResult>,
}

/// Results from async operations
#[derive(Debug)]
enum AsyncResult {
    TokenDiscovered(Option<String>),
    Hydrated {
        autodetect: Option<Value>,
        local: Option<Value>,
    },
    SaveFinished(Result<(), String>),
    DeployFinished(String),
    TestFinished {
        service: String,
        message: String,
    },
}

impl App {
    pub fn new(client: SetupClient, config_dir: Option<PathBuf>) -> Self {
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        let blob_path = match persist::blob_path(config_dir.as_deref()) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("Local persistence disabled: {}", e);
                None
            }
        };
        let wizard = WizardComponent::new(client.base_url().to_string());
        Self {
            should_quit: false,
            wizard,
            client,
            blob_path,
            tick_rate: Duration::from_millis(100),
            result_rx,
            result_tx,
        }
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        // Install panic hook
        tui::install_panic_hook();

        // Initialize terminal
        let mut terminal = tui::init()?;

        // Main loop
        let result = self.main_loop(&mut terminal).await;

        // Restore terminal
        tui::restore()?;

        result
    }

    /// Kick off token discovery and hydration without blocking the UI
    fn spawn_startup(&self) {
        let mut client = self.client.clone();
        let blob_path = self.blob_path.clone();
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let token = client.discover_token().await;
            let _ = tx.send(AsyncResult::TokenDiscovered(token));

            let autodetect = match client.autodetect().await {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::info!("Autodetect unavailable: {}", e);
                    None
                }
            };
            let local = if autodetect.is_none() {
                blob_path.as_deref().and_then(persist::load_blob)
            } else {
                None
            };
            let _ = tx.send(AsyncResult::Hydrated { autodetect, local });
        });
    }

    /// Main event loop
    async fn main_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        self.spawn_startup();

        loop {
            // Draw
            terminal.draw(|frame| {
                let _ = self.wizard.draw(frame, frame.area());
            })?;

            // Handle events with timeout
            if event::poll(self.tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = self.wizard.handle_key_event(key)? {
                            self.handle_action(action).await?;
                        }
                    }
                    Event::Resize(w, h) => {
                        self.handle_action(Action::Resize(w, h)).await?;
                    }
                    _ => {}
                }
            } else {
                // Tick for animations
                self.handle_action(Action::Tick).await?;
            }

            // Check async results (non-blocking)
            while let Ok(result) = self.result_rx.try_recv() {
                self.handle_async_result(result);
            }

            // Check if we should quit
            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Handle an action
    async fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Tick => {
                if let Some(next_action) = self.wizard.update(Action::Tick)? {
                    Box::pin(self.handle_action(next_action)).await?;
                }
            }
            Action::Resize(_w, _h) => {
                // Terminal will automatically resize on next draw
            }
            Action::SaveConfig => self.save_config(),
            Action::Deploy => self.deploy(),
            Action::TestConnection(service) => self.test_connection(service),
            Action::CopyConfig => self.copy_config(),
        }
        Ok(())
    }

    /// Write the local blob and POST the record to the daemon
    fn save_config(&mut self) {
        self.wizard.set_status("Saving configuration...".to_string());
        let config = self.wizard.config().clone();

        if let Some(path) = &self.blob_path
            && let Err(e) = persist::store_blob(path, &config)
        {
            tracing::warn!("Failed to write local config copy: {}", e);
        }

        let client = self.client.clone();
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let result = client.save_config(&config).await.map_err(|e| e.to_string());
            let _ = tx.send(AsyncResult::SaveFinished(result));
        });
    }

    fn deploy(&mut self) {
        tracing::info!("Deploy requested");
        self.wizard.deploy_started();

        let client = self.client.clone();
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let message = match client.deploy_services().await {
                Ok(response) => response.deploy_message(),
                Err(e) => format!("Error: {}", e),
            };
            let _ = tx.send(AsyncResult::DeployFinished(message));
        });
    }

    fn test_connection(&mut self, service: String) {
        let Some((url, api_key)) = self.wizard.connection_probe(&service) else {
            return;
        };

        let client = self.client.clone();
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let message = match client.test_connection(&url, &api_key).await {
                Ok(response) => response.connection_message(),
                Err(e) => format!("Error: {}", e),
            };
            let _ = tx.send(AsyncResult::TestFinished { service, message });
        });
    }

    fn copy_config(&mut self) {
        match serde_json::to_string_pretty(self.wizard.config()) {
            Ok(json) => {
                clipboard::copy_text(json);
                self.wizard
                    .set_status("Configuration copied to clipboard".to_string());
            }
            Err(e) => {
                self.wizard.set_status(format!("Error: {}", e));
            }
        }
    }

    fn handle_async_result(&mut self, result: AsyncResult) {
        match result {
            AsyncResult::TokenDiscovered(token) => {
                self.wizard.set_token_present(token.is_some());
                self.client.set_token(token);
            }
            AsyncResult::Hydrated { autodetect, local } => {
                let source = persist::hydrate(self.wizard.config_mut(), autodetect, local);
                tracing::info!("Configuration hydrated: {}", source.label());
                self.wizard.set_hydration(source);
            }
            AsyncResult::SaveFinished(result) => match result {
                Ok(()) => {
                    self.wizard.set_status("Configuration saved.".to_string());
                }
                Err(e) => {
                    tracing::warn!("Save failed: {}", e);
                    self.wizard.set_status(format!("Error: {}", e));
                }
            },
            AsyncResult::DeployFinished(message) => {
                tracing::info!("Deploy finished: {}", message);
                self.wizard.deploy_finished(message);
            }
            AsyncResult::TestFinished { service, message } => {
                self.wizard.set_status(format!("{}: {}", service, message));
            }
        }
    }
}
