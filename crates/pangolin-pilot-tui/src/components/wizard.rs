//! Setup Wizard - step-driven configuration flow
//!
//! Guides users through assembling a media stack:
//! 1. Welcome and daemon status
//! 2. Pick a media server
//! 3. Storage paths and system settings
//! 4.-7. Toggle services per category
//! 8. Per-service settings and connection tests
//! 9. Review, save and deploy

use crate::action::Action;
use crate::components::Component;
use crate::persist::HydrationSource;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use pangolin_pilot_core::catalog::{self, MEDIA_SERVERS, ServiceCategory, TESTABLE_SERVICES};
use pangolin_pilot_core::config::{SERVICE_FIELDS, sanitize_numeric};
use pangolin_pilot_core::{Selections, ServiceField, SetupStep, StackConfig, StepCursor};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::time::Instant;

/// Spinner frames for the deploy wait state
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Editable field on the storage step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum StorageField {
    #[default]
    StoragePath,
    DownloadsPath,
    ConfigPath,
    Timezone,
    Puid,
    Pgid,
}

const STORAGE_FIELDS: [StorageField; 6] = [
    StorageField::StoragePath,
    StorageField::DownloadsPath,
    StorageField::ConfigPath,
    StorageField::Timezone,
    StorageField::Puid,
    StorageField::Pgid,
];

impl StorageField {
    fn label(&self) -> &'static str {
        match self {
            StorageField::StoragePath => "Storage Path",
            StorageField::DownloadsPath => "Downloads Path",
            StorageField::ConfigPath => "Config Path",
            StorageField::Timezone => "Timezone",
            StorageField::Puid => "PUID",
            StorageField::Pgid => "PGID",
        }
    }

    /// Placeholder shown when the field is unset
    fn placeholder(&self) -> &'static str {
        match self {
            StorageField::StoragePath => "required, e.g. /mnt/media",
            StorageField::DownloadsPath => "<storage path>/downloads",
            StorageField::ConfigPath => "/opt/pangolin",
            StorageField::Timezone => "UTC",
            StorageField::Puid => "1000",
            StorageField::Pgid => "1000",
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, StorageField::Puid | StorageField::Pgid)
    }

    fn next(&self) -> Self {
        let idx = STORAGE_FIELDS.iter().position(|f| f == self).unwrap_or(0);
        STORAGE_FIELDS[(idx + 1) % STORAGE_FIELDS.len()]
    }

    fn prev(&self) -> Self {
        let idx = STORAGE_FIELDS.iter().position(|f| f == self).unwrap_or(0);
        STORAGE_FIELDS[(idx + STORAGE_FIELDS.len() - 1) % STORAGE_FIELDS.len()]
    }
}

/// In-progress text edit. Esc throws the buffer away, leaving the previous
/// value untouched.
#[derive(Debug, Clone)]
struct EditState {
    buffer: String,
}

/// Deploy trigger state on the review step
#[derive(Debug, Clone)]
enum DeployState {
    Idle,
    Running { started: Instant },
    Finished(String),
}

/// Setup wizard component
pub struct WizardComponent {
    /// Position in the fixed step list
    cursor: StepCursor,

    /// The configuration record every step reads and writes
    config: StackConfig,

    /// Per-category service selection maps
    selections: Selections,

    backend_url: String,
    token_present: bool,
    hydration: Option<HydrationSource>,

    /// Active field on the storage step
    storage_field: StorageField,

    /// Highlighted row on list-style steps
    row: usize,

    /// Active field on the service settings step
    service_field: ServiceField,

    edit: Option<EditState>,

    /// Footer feedback from save / copy / connection test
    status: Option<String>,

    deploy: DeployState,
    spinner_frame: usize,
}

impl WizardComponent {
    pub fn new(backend_url: String) -> Self {
        Self {
            cursor: StepCursor::default(),
            config: StackConfig::default(),
            selections: Selections::with_defaults(),
            backend_url,
            token_present: false,
            hydration: None,
            storage_field: StorageField::default(),
            row: 0,
            service_field: ServiceField::default(),
            edit: None,
            status: None,
            deploy: DeployState::Idle,
            spinner_frame: 0,
        }
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut StackConfig {
        &mut self.config
    }

    pub fn set_hydration(&mut self, source: HydrationSource) {
        self.hydration = Some(source);
    }

    pub fn set_token_present(&mut self, present: bool) {
        self.token_present = present;
    }

    pub fn set_status(&mut self, message: String) {
        self.status = Some(message);
    }

    pub fn deploy_started(&mut self) {
        self.deploy = DeployState::Running {
            started: Instant::now(),
        };
    }

    pub fn deploy_finished(&mut self, message: String) {
        self.deploy = DeployState::Finished(message);
    }

    pub fn deploy_in_flight(&self) -> bool {
        matches!(self.deploy, DeployState::Running { .. })
    }

    /// URL/API-key pair for a service's connection test, if both are set
    pub fn connection_probe(&self, service: &str) -> Option<(String, String)> {
        let settings = self.config.service(service)?;
        let url = settings.url.clone()?;
        let api_key = settings.api_key.clone()?;
        Some((url, api_key))
    }

    fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    /// Services that show up on the settings step: everything currently
    /// enabled, in category order
    fn settings_services(&self) -> Vec<String> {
        let mut services = Vec::new();
        for category in [
            ServiceCategory::MediaAutomation,
            ServiceCategory::DownloadTools,
            ServiceCategory::ContentEnhancement,
            ServiceCategory::Monitoring,
        ] {
            for key in self.selections.enabled(category) {
                services.push(key.to_string());
            }
        }
        services
    }

    fn selected_settings_service(&self) -> Option<String> {
        let services = self.settings_services();
        if services.is_empty() {
            return None;
        }
        services.get(self.row.min(services.len() - 1)).cloned()
    }

    fn category_for_step(step: SetupStep) -> Option<ServiceCategory> {
        match step {
            SetupStep::MediaAutomation => Some(ServiceCategory::MediaAutomation),
            SetupStep::DownloadTools => Some(ServiceCategory::DownloadTools),
            SetupStep::ContentEnhancement => Some(ServiceCategory::ContentEnhancement),
            SetupStep::Monitoring => Some(ServiceCategory::Monitoring),
            _ => None,
        }
    }

    // ============ NAVIGATION ============

    fn goto_next_step(&mut self) {
        self.cursor.advance();
        self.row = 0;
    }

    fn goto_prev_step(&mut self) {
        self.cursor.retreat();
        self.row = 0;
    }

    fn jump(&mut self, index: usize) {
        if self.cursor.jump_to(index, self.config.deploy_ready()) {
            self.row = 0;
        }
    }

    fn move_row(&mut self, down: bool, len: usize) {
        if len == 0 {
            return;
        }
        if down {
            self.row = (self.row + 1) % len;
        } else {
            self.row = if self.row == 0 { len - 1 } else { self.row - 1 };
        }
    }

    // ============ FIELD ACCESS ============

    fn storage_value(&self, field: StorageField) -> &str {
        match field {
            StorageField::StoragePath => &self.config.storage_path,
            StorageField::DownloadsPath => self.config.downloads_path.as_deref().unwrap_or(""),
            StorageField::ConfigPath => self.config.config_path.as_deref().unwrap_or(""),
            StorageField::Timezone => self.config.timezone.as_deref().unwrap_or(""),
            StorageField::Puid => self.config.puid.as_deref().unwrap_or(""),
            StorageField::Pgid => self.config.pgid.as_deref().unwrap_or(""),
        }
    }

    fn set_storage_value(&mut self, field: StorageField, raw: &str) {
        let value = if field.is_numeric() {
            sanitize_numeric(raw)
        } else {
            raw.to_string()
        };
        let optional = if value.is_empty() {
            None
        } else {
            Some(value.clone())
        };
        match field {
            StorageField::StoragePath => self.config.storage_path = value,
            StorageField::DownloadsPath => self.config.downloads_path = optional,
            StorageField::ConfigPath => self.config.config_path = optional,
            StorageField::Timezone => self.config.timezone = optional,
            StorageField::Puid => self.config.puid = optional,
            StorageField::Pgid => self.config.pgid = optional,
        }
    }

    // ============ KEY HANDLING ============

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let Some(edit) = &mut self.edit else {
            return;
        };
        match key.code {
            KeyCode::Char(c) => edit.buffer.push(c),
            KeyCode::Backspace => {
                edit.buffer.pop();
            }
            KeyCode::Enter => {
                let buffer = edit.buffer.clone();
                self.edit = None;
                self.commit_edit(&buffer);
            }
            KeyCode::Esc => {
                // Cancelled edit leaves the previous value unchanged
                self.edit = None;
            }
            _ => {}
        }
    }

    fn begin_edit(&mut self, current: &str) {
        self.edit = Some(EditState {
            buffer: current.to_string(),
        });
    }

    fn commit_edit(&mut self, buffer: &str) {
        match self.cursor.current() {
            SetupStep::Storage => {
                self.set_storage_value(self.storage_field, buffer);
            }
            SetupStep::ServiceSettings => {
                if let Some(service) = self.selected_settings_service() {
                    self.config
                        .set_service_field(&service, self.service_field, buffer);
                }
            }
            _ => {}
        }
    }

    fn handle_welcome_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => {
                self.goto_next_step();
                None
            }
            _ => None,
        }
    }

    fn handle_media_server_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_row(false, MEDIA_SERVERS.len());
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_row(true, MEDIA_SERVERS.len());
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let option = MEDIA_SERVERS[self.row.min(MEDIA_SERVERS.len() - 1)];
                self.config.media_server = option.key.to_string();
                None
            }
            _ => None,
        }
    }

    fn handle_storage_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.storage_field = self.storage_field.next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.storage_field = self.storage_field.prev();
                None
            }
            KeyCode::Enter => {
                let current = self.storage_value(self.storage_field).to_string();
                self.begin_edit(&current);
                None
            }
            _ => None,
        }
    }

    fn handle_category_key(&mut self, key: KeyEvent, category: ServiceCategory) -> Option<Action> {
        let entries = catalog::services(category);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_row(false, entries.len());
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_row(true, entries.len());
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(entry) = entries.get(self.row) {
                    self.selections.toggle(category, entry.key);
                }
                None
            }
            _ => None,
        }
    }

    fn handle_settings_key(&mut self, key: KeyEvent) -> Option<Action> {
        let services = self.settings_services();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_row(false, services.len());
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_row(true, services.len());
                None
            }
            KeyCode::Tab => {
                self.service_field = self.service_field.next();
                None
            }
            KeyCode::BackTab => {
                self.service_field = self.service_field.prev();
                None
            }
            KeyCode::Enter => {
                if let Some(service) = self.selected_settings_service() {
                    let current = self
                        .config
                        .service(&service)
                        .and_then(|s| s.get(self.service_field))
                        .unwrap_or("")
                        .to_string();
                    self.begin_edit(&current);
                }
                None
            }
            KeyCode::Char('t') => {
                let service = self.selected_settings_service()?;
                if !TESTABLE_SERVICES.contains(&service.as_str()) {
                    self.status = Some(format!("No connection test available for {}", service));
                    return None;
                }
                if self.connection_probe(&service).is_none() {
                    self.status = Some("Set URL and API Key first".to_string());
                    return None;
                }
                self.status = Some(format!("Testing {}...", service));
                Some(Action::TestConnection(service))
            }
            _ => None,
        }
    }

    fn handle_review_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('s') => Some(Action::SaveConfig),
            KeyCode::Char('y') => Some(Action::CopyConfig),
            KeyCode::Enter | KeyCode::Char('d') => {
                if self.deploy_in_flight() {
                    return None;
                }
                if !self.config.deploy_ready() {
                    self.status =
                        Some("Pick a media server and set a storage path first".to_string());
                    return None;
                }
                Some(Action::Deploy)
            }
            _ => None,
        }
    }

    // ============ DRAWING ============

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let step = self.cursor.step_number();
        let total = StepCursor::total_steps();
        let title = self.cursor.current().title();

        let header = Line::from(vec![
            Span::styled(
                " Pangolin Setup ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("Step {} of {}: ", step, total),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(title, Style::default().fg(Color::White)),
        ]);

        frame.render_widget(Paragraph::new(header), area);
    }

    fn draw_welcome(&self, frame: &mut Frame, area: Rect) {
        let hydration = match &self.hydration {
            Some(source) => Span::styled(source.label(), Style::default().fg(Color::Green)),
            None => Span::styled(
                format!("{} contacting setup daemon...", self.spinner()),
                Style::default().fg(Color::Yellow),
            ),
        };

        let content = Paragraph::new(vec![
            Line::raw(""),
            Line::styled(
                "  Welcome! This wizard configures and deploys your media stack.",
                Style::default().fg(Color::White),
            ),
            Line::raw(""),
            Line::from(vec![
                Span::styled("  Daemon:    ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    self.backend_url.clone(),
                    Style::default().fg(Color::Cyan),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Token:     ", Style::default().fg(Color::DarkGray)),
                if self.token_present {
                    Span::styled("present", Style::default().fg(Color::Green))
                } else {
                    Span::styled("none", Style::default().fg(Color::DarkGray))
                },
            ]),
            Line::from(vec![
                Span::styled("  Defaults:  ", Style::default().fg(Color::DarkGray)),
                hydration,
            ]),
            Line::raw(""),
            Line::styled(
                "  Nothing is deployed until you confirm on the final step.",
                Style::default().fg(Color::DarkGray),
            ),
            Line::raw(""),
            Line::from(vec![
                Span::styled(" [Enter] ", Style::default().fg(Color::Green)),
                Span::raw("Begin"),
            ]),
        ])
        .block(Block::default().borders(Borders::ALL));

        frame.render_widget(content, area);
    }

    fn draw_media_server(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::raw(""),
            Line::styled(
                "  Choose the media server the stack is built around:",
                Style::default().fg(Color::White),
            ),
            Line::raw(""),
        ];

        for (idx, option) in MEDIA_SERVERS.iter().enumerate() {
            let selected = self.config.media_server == option.key;
            let marker = if selected { "(•)" } else { "( )" };
            let mut style = Style::default().fg(Color::White);
            if idx == self.row {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!(
                        "{} {:<10} port {}",
                        marker, option.name, option.default_port
                    ),
                    style,
                ),
                if selected {
                    Span::styled(" ✓", Style::default().fg(Color::Green))
                } else {
                    Span::raw("")
                },
            ]));
        }

        if self.config.media_server.is_empty() {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                "  A media server is required before deploying.",
                Style::default().fg(Color::Yellow),
            ));
        }

        let content = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
        frame.render_widget(content, area);
    }

    fn field_line(
        &self,
        label: &str,
        value: &str,
        placeholder: &str,
        active: bool,
        editing: Option<&str>,
    ) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!("  {:<16}", label),
            Style::default().fg(Color::Cyan),
        )];

        if let Some(buffer) = editing {
            spans.push(Span::styled(
                buffer.to_string(),
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
        } else if value.is_empty() {
            spans.push(Span::styled(
                placeholder.to_string(),
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            let style = if active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(value.to_string(), style));
        }

        if active && editing.is_none() {
            spans.push(Span::styled(
                "  ← Enter to edit",
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    }

    fn draw_storage(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![Line::raw("")];
        for field in STORAGE_FIELDS {
            let active = self.storage_field == field;
            let editing = if active {
                self.edit.as_ref().map(|e| e.buffer.as_str())
            } else {
                None
            };
            lines.push(self.field_line(
                field.label(),
                self.storage_value(field),
                field.placeholder(),
                active,
                editing,
            ));
        }

        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "  The storage path is required before deploying.",
            Style::default().fg(if self.config.storage_path.is_empty() {
                Color::Yellow
            } else {
                Color::DarkGray
            }),
        ));

        let content = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
        frame.render_widget(content, area);
    }

    fn draw_category(&self, frame: &mut Frame, area: Rect, category: ServiceCategory) {
        let entries = catalog::services(category);
        let mut lines = vec![
            Line::raw(""),
            Line::from(vec![Span::styled(
                format!("  Enable {} services:", category.title()),
                Style::default().fg(Color::White),
            )]),
            Line::raw(""),
        ];

        for (idx, entry) in entries.iter().enumerate() {
            let enabled = self.selections.is_enabled(category, entry.key);
            let checkbox = if enabled { "[x]" } else { "[ ]" };
            let mut style = if enabled {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            if idx == self.row {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!(
                        "{} {:<14} port {}",
                        checkbox, entry.name, entry.default_port
                    ),
                    style,
                ),
            ]));
        }

        let title = format!(
            " {} ({} enabled) ",
            category.title(),
            self.selections.enabled(category).len()
        );
        let content =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(content, area);
    }

    fn draw_settings(&self, frame: &mut Frame, area: Rect) {
        let services = self.settings_services();

        if services.is_empty() {
            let content = Paragraph::new(vec![
                Line::raw(""),
                Line::styled(
                    "  No services enabled yet.",
                    Style::default().fg(Color::Yellow),
                ),
                Line::styled(
                    "  Go back and enable some services first.",
                    Style::default().fg(Color::DarkGray),
                ),
            ])
            .block(Block::default().borders(Borders::ALL));
            frame.render_widget(content, area);
            return;
        }

        let layout = Layout::horizontal([Constraint::Length(22), Constraint::Fill(1)]).split(area);

        // Service list
        let mut service_lines = vec![Line::raw("")];
        for (idx, key) in services.iter().enumerate() {
            let name = catalog::entry(key).map(|e| e.name).unwrap_or(key.as_str());
            let mut style = Style::default().fg(Color::White);
            if idx == self.row.min(services.len() - 1) {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            service_lines.push(Line::from(Span::styled(format!("  {}", name), style)));
        }
        let list = Paragraph::new(service_lines)
            .block(Block::default().borders(Borders::ALL).title(" Services "));
        frame.render_widget(list, layout[0]);

        // Field editor for the selected service
        let Some(service) = self.selected_settings_service() else {
            return;
        };
        let settings = self.config.service(&service).cloned().unwrap_or_default();

        let mut field_lines = vec![Line::raw("")];
        for field in SERVICE_FIELDS {
            let active = self.service_field == *field;
            let editing = if active {
                self.edit.as_ref().map(|e| e.buffer.as_str())
            } else {
                None
            };
            let placeholder = match field {
                ServiceField::Port => StackConfig::port_placeholder(&service),
                ServiceField::LogLevel => "info".to_string(),
                ServiceField::Branch => "master".to_string(),
                _ => String::new(),
            };
            field_lines.push(self.field_line(
                field.label(),
                settings.get(*field).unwrap_or(""),
                &placeholder,
                active,
                editing,
            ));
        }

        if TESTABLE_SERVICES.contains(&service.as_str()) {
            field_lines.push(Line::raw(""));
            field_lines.push(Line::from(vec![
                Span::styled(" [t] ", Style::default().fg(Color::Cyan)),
                Span::raw("Test connection (uses URL + API Key)"),
            ]));
        }

        let name = catalog::entry(&service)
            .map(|e| e.name)
            .unwrap_or(service.as_str());
        let editor = Paragraph::new(field_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", name)),
        );
        frame.render_widget(editor, layout[1]);
    }

    fn draw_review(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([Constraint::Fill(1), Constraint::Length(6)]).split(area);

        let mut lines = vec![
            Line::raw(""),
            Line::from(vec![
                Span::styled("  Media Server:  ", Style::default().fg(Color::DarkGray)),
                if self.config.media_server.is_empty() {
                    Span::styled("not set", Style::default().fg(Color::Red))
                } else {
                    Span::styled(
                        self.config.media_server.clone(),
                        Style::default().fg(Color::Green),
                    )
                },
            ]),
            Line::from(vec![
                Span::styled("  Storage Path:  ", Style::default().fg(Color::DarkGray)),
                if self.config.storage_path.is_empty() {
                    Span::styled("not set", Style::default().fg(Color::Red))
                } else {
                    Span::styled(
                        self.config.storage_path.clone(),
                        Style::default().fg(Color::Green),
                    )
                },
            ]),
            Line::raw(""),
        ];

        for category in [
            ServiceCategory::MediaAutomation,
            ServiceCategory::DownloadTools,
            ServiceCategory::ContentEnhancement,
            ServiceCategory::Monitoring,
        ] {
            let enabled = self.selections.enabled(category);
            let names: Vec<&str> = enabled
                .iter()
                .map(|key| catalog::entry(key).map(|e| e.name).unwrap_or(*key))
                .collect();
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<21}", format!("{}:", category.title())),
                    Style::default().fg(Color::DarkGray),
                ),
                if names.is_empty() {
                    Span::styled("none", Style::default().fg(Color::DarkGray))
                } else {
                    Span::styled(names.join(", "), Style::default().fg(Color::White))
                },
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("  {} services enabled", self.selections.enabled_count()),
            Style::default().fg(Color::White),
        ));

        let summary = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Summary "))
            .wrap(Wrap { trim: false });
        frame.render_widget(summary, layout[0]);

        // Deploy panel
        let deploy_lines = match &self.deploy {
            DeployState::Idle => {
                if self.config.deploy_ready() {
                    vec![
                        Line::raw(""),
                        Line::from(vec![
                            Span::styled(" [d/Enter] ", Style::default().fg(Color::Green)),
                            Span::raw("Deploy"),
                            Span::raw("  "),
                            Span::styled(" [s] ", Style::default().fg(Color::Cyan)),
                            Span::raw("Save"),
                            Span::raw("  "),
                            Span::styled(" [y] ", Style::default().fg(Color::Cyan)),
                            Span::raw("Copy config"),
                        ]),
                    ]
                } else {
                    vec![
                        Line::raw(""),
                        Line::styled(
                            "  Deploy is disabled until a media server and storage path are set.",
                            Style::default().fg(Color::Yellow),
                        ),
                    ]
                }
            }
            DeployState::Running { started } => vec![
                Line::raw(""),
                Line::from(vec![
                    Span::styled(
                        format!("  {} ", self.spinner()),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled("Deploying services...", Style::default().fg(Color::Yellow)),
                    Span::styled(
                        format!("  ({}s elapsed)", started.elapsed().as_secs()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::styled(
                    "  The daemon reports no intermediate progress; this can take a while.",
                    Style::default().fg(Color::DarkGray),
                ),
            ],
            DeployState::Finished(message) => {
                let color = if message == "Deployment successful!" {
                    Color::Green
                } else {
                    Color::Red
                };
                vec![
                    Line::raw(""),
                    Line::styled(format!("  {}", message), Style::default().fg(color)),
                    Line::styled(
                        "  Press [d] to deploy again, [q] to quit.",
                        Style::default().fg(Color::DarkGray),
                    ),
                ]
            }
        };

        let deploy = Paragraph::new(deploy_lines)
            .block(Block::default().borders(Borders::ALL).title(" Deploy "));
        frame.render_widget(deploy, layout[1]);
    }

    fn help_line(&self) -> Line<'static> {
        if self.edit.is_some() {
            return Line::from(vec![
                Span::styled(" [Enter] ", Style::default().fg(Color::Green)),
                Span::raw("Apply"),
                Span::raw("  "),
                Span::styled(" [Esc] ", Style::default().fg(Color::Cyan)),
                Span::raw("Cancel"),
            ]);
        }
        let mut spans = vec![
            Span::styled(" [←/→] ", Style::default().fg(Color::Cyan)),
            Span::raw("Steps"),
            Span::raw("  "),
            Span::styled(" [1-9] ", Style::default().fg(Color::Cyan)),
            Span::raw("Jump"),
            Span::raw("  "),
        ];
        match self.cursor.current() {
            SetupStep::MediaAutomation
            | SetupStep::DownloadTools
            | SetupStep::ContentEnhancement
            | SetupStep::Monitoring => {
                spans.push(Span::styled(" [Space] ", Style::default().fg(Color::Green)));
                spans.push(Span::raw("Toggle"));
                spans.push(Span::raw("  "));
            }
            SetupStep::Storage | SetupStep::ServiceSettings => {
                spans.push(Span::styled(" [Enter] ", Style::default().fg(Color::Green)));
                spans.push(Span::raw("Edit"));
                spans.push(Span::raw("  "));
            }
            _ => {}
        }
        spans.push(Span::styled(" [q] ", Style::default().fg(Color::Cyan)));
        spans.push(Span::raw("Quit"));
        Line::from(spans)
    }
}

impl Component for WizardComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.edit.is_some() {
            self.handle_edit_key(key);
            return Ok(None);
        }

        // Step navigation works everywhere outside an edit
        match key.code {
            KeyCode::Left => {
                self.goto_prev_step();
                return Ok(None);
            }
            KeyCode::Right => {
                self.goto_next_step();
                return Ok(None);
            }
            KeyCode::Char(c @ '1'..='9') => {
                self.jump(c as usize - '1' as usize);
                return Ok(None);
            }
            KeyCode::Char('q') => return Ok(Some(Action::Quit)),
            KeyCode::Esc => {
                if self.cursor.is_first() {
                    return Ok(Some(Action::Quit));
                }
                self.goto_prev_step();
                return Ok(None);
            }
            _ => {}
        }

        let action = match self.cursor.current() {
            SetupStep::Welcome => self.handle_welcome_key(key),
            SetupStep::MediaServer => self.handle_media_server_key(key),
            SetupStep::Storage => self.handle_storage_key(key),
            step @ (SetupStep::MediaAutomation
            | SetupStep::DownloadTools
            | SetupStep::ContentEnhancement
            | SetupStep::Monitoring) => match Self::category_for_step(step) {
                Some(category) => self.handle_category_key(key, category),
                None => None,
            },
            SetupStep::ServiceSettings => self.handle_settings_key(key),
            SetupStep::Review => self.handle_review_key(key),
        };

        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action == Action::Tick {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Fill(1),   // Content
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help
        ])
        .split(area);

        self.draw_header(frame, layout[0]);

        match self.cursor.current() {
            SetupStep::Welcome => self.draw_welcome(frame, layout[1]),
            SetupStep::MediaServer => self.draw_media_server(frame, layout[1]),
            SetupStep::Storage => self.draw_storage(frame, layout[1]),
            step @ (SetupStep::MediaAutomation
            | SetupStep::DownloadTools
            | SetupStep::ContentEnhancement
            | SetupStep::Monitoring) => {
                if let Some(category) = Self::category_for_step(step) {
                    self.draw_category(frame, layout[1], category);
                }
            }
            SetupStep::ServiceSettings => self.draw_settings(frame, layout[1]),
            SetupStep::Review => self.draw_review(frame, layout[1]),
        }

        if let Some(status) = &self.status {
            frame.render_widget(
                Paragraph::new(Line::styled(
                    format!("  {}", status),
                    Style::default().fg(Color::Yellow),
                )),
                layout[2],
            );
        }

        frame.render_widget(Paragraph::new(self.help_line()), layout[3]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn wizard() -> WizardComponent {
        WizardComponent::new("http://127.0.0.1:8484".to_string())
    }

    #[test]
    fn digit_jump_respects_readiness_gate() {
        let mut w = wizard();
        w.handle_key_event(key(KeyCode::Char('4'))).unwrap();
        assert_eq!(w.cursor.index(), 0);

        w.config.media_server = "jellyfin".to_string();
        w.config.storage_path = "/mnt/media".to_string();
        w.handle_key_event(key(KeyCode::Char('4'))).unwrap();
        assert_eq!(w.cursor.index(), 3);
    }

    #[test]
    fn space_toggles_highlighted_service() {
        let mut w = wizard();
        w.config.media_server = "plex".to_string();
        w.config.storage_path = "/data".to_string();
        w.handle_key_event(key(KeyCode::Char('4'))).unwrap();
        assert_eq!(w.cursor.current(), SetupStep::MediaAutomation);

        // sonarr is first in the category and enabled by default
        assert!(
            w.selections
                .is_enabled(ServiceCategory::MediaAutomation, "sonarr")
        );
        w.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        assert!(
            !w.selections
                .is_enabled(ServiceCategory::MediaAutomation, "sonarr")
        );
    }

    #[test]
    fn cancelled_edit_keeps_previous_value() {
        let mut w = wizard();
        w.handle_key_event(key(KeyCode::Char('3'))).unwrap();
        assert_eq!(w.cursor.current(), SetupStep::Storage);

        w.handle_key_event(key(KeyCode::Enter)).unwrap();
        w.handle_key_event(key(KeyCode::Char('/'))).unwrap();
        w.handle_key_event(key(KeyCode::Char('x'))).unwrap();
        w.handle_key_event(key(KeyCode::Esc)).unwrap();

        assert_eq!(w.config.storage_path, "");
    }

    #[test]
    fn committed_edit_writes_the_gating_field() {
        let mut w = wizard();
        w.handle_key_event(key(KeyCode::Char('3'))).unwrap();
        w.handle_key_event(key(KeyCode::Enter)).unwrap();
        for c in "/mnt/media".chars() {
            w.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        w.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(w.config.storage_path, "/mnt/media");
    }

    #[test]
    fn puid_edit_is_sanitized_to_digits() {
        let mut w = wizard();
        w.handle_key_event(key(KeyCode::Char('3'))).unwrap();
        // PUID is the fifth storage field
        for _ in 0..4 {
            w.handle_key_event(key(KeyCode::Tab)).unwrap();
        }
        w.handle_key_event(key(KeyCode::Enter)).unwrap();
        for c in "10a0b0".chars() {
            w.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        w.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(w.config.puid.as_deref(), Some("1000"));
    }

    #[test]
    fn deploy_requires_readiness() {
        let mut w = wizard();
        w.config.storage_path = "/data".to_string();
        assert_eq!(w.handle_review_key(key(KeyCode::Char('d'))), None);

        w.config.media_server = "plex".to_string();
        assert_eq!(
            w.handle_review_key(key(KeyCode::Char('d'))),
            Some(Action::Deploy)
        );
    }

    #[test]
    fn deploy_is_not_retriggered_while_running() {
        let mut w = wizard();
        w.config.media_server = "plex".to_string();
        w.config.storage_path = "/data".to_string();
        w.deploy_started();
        assert_eq!(w.handle_review_key(key(KeyCode::Enter)), None);

        w.deploy_finished("Deployment successful!".to_string());
        assert_eq!(
            w.handle_review_key(key(KeyCode::Enter)),
            Some(Action::Deploy)
        );
    }

    #[test]
    fn media_server_selection_sets_config() {
        let mut w = wizard();
        w.handle_key_event(key(KeyCode::Char('2'))).unwrap();
        assert_eq!(w.cursor.current(), SetupStep::MediaServer);

        w.handle_key_event(key(KeyCode::Down)).unwrap();
        w.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(w.config.media_server, "jellyfin");
    }

    #[test]
    fn connection_probe_needs_both_fields() {
        let mut w = wizard();
        w.config
            .set_service_field("sonarr", ServiceField::Url, "http://localhost:8989");
        assert!(w.connection_probe("sonarr").is_none());

        w.config
            .set_service_field("sonarr", ServiceField::ApiKey, "abc");
        assert_eq!(
            w.connection_probe("sonarr"),
            Some(("http://localhost:8989".to_string(), "abc".to_string()))
        );
    }
}
