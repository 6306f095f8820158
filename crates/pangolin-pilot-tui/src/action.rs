//! Actions flowing from components back to the application loop

/// Things a component can ask the application to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Exit the application
    Quit,
    /// Periodic tick for animations
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Persist the configuration record locally and to the daemon
    SaveConfig,
    /// Trigger the remote deployment
    Deploy,
    /// Probe one service's URL/API-key pair
    TestConnection(String),
    /// Copy the serialized configuration record to the clipboard
    CopyConfig,
}
