/// Runtime settings shared by every extension context

/// What to do when a stored bookmark already has a marker on the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateMarkerPolicy {
    /// Leave the existing marker in place
    #[default]
    Skip,
    /// Remove the existing marker and draw it again at the current layout
    Replace,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionConfig {
    /// Query parameter carrying the video identifier on a watch page
    pub video_id_param: &'static str,
    /// Pixels subtracted from the progress track width before placing markers
    pub track_inset_px: f64,
    /// How long to wait for the page bridge to report the duration
    pub duration_timeout_ms: u32,
    /// How long the bookmark button shows the filled icon after a click
    pub icon_flash_ms: u32,
    pub duplicate_markers: DuplicateMarkerPolicy,
    pub log_level: log::Level,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        ExtensionConfig {
            video_id_param: "v",
            track_inset_px: 9.0,
            duration_timeout_ms: 2000,
            icon_flash_ms: 1000,
            duplicate_markers: DuplicateMarkerPolicy::Skip,
            log_level: log::Level::Info,
        }
    }
}
