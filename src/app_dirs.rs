use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dogtap").map(|pd| pd.config_dir().join("config.json"))
    }

    /// Default log location; the TUI owns stdout so logs never go there
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("dogtap");
            Some(state_dir.join("dogtap.log"))
        } else {
            ProjectDirs::from("", "", "dogtap")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("dogtap.log"))
        }
    }
}
