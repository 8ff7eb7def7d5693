use serde::{Deserialize, Serialize};

/// The persisted preference record for the plugin.
///
/// The on-disk shape is a flat JSON object with camelCase keys; any subset of
/// keys may be present, the rest fall back to their defaults on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub style_lists: bool,

    pub debug: bool,

    pub stick_cursor: bool,

    pub better_enter: bool,

    pub select_all: bool,

    pub disable_zoom_notification: bool,

    pub hide_warning: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            style_lists: false,
            debug: false,
            stick_cursor: true,
            better_enter: true,
            select_all: true,
            disable_zoom_notification: false,
            hide_warning: false,
        }
    }
}

impl Settings {
    /// Build a record from a persisted JSON object, merging over defaults.
    ///
    /// Missing keys take their default value, unknown keys are ignored.
    pub fn from_persisted(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::StyleLists => self.style_lists,
            SettingKey::Debug => self.debug,
            SettingKey::StickCursor => self.stick_cursor,
            SettingKey::BetterEnter => self.better_enter,
            SettingKey::SelectAll => self.select_all,
            SettingKey::DisableZoomNotification => self.disable_zoom_notification,
            SettingKey::HideWarning => self.hide_warning,
        }
    }

    pub fn set(&mut self, key: SettingKey, value: bool) {
        match key {
            SettingKey::StyleLists => self.style_lists = value,
            SettingKey::Debug => self.debug = value,
            SettingKey::StickCursor => self.stick_cursor = value,
            SettingKey::BetterEnter => self.better_enter = value,
            SettingKey::SelectAll => self.select_all = value,
            SettingKey::DisableZoomNotification => self.disable_zoom_notification = value,
            SettingKey::HideWarning => self.hide_warning = value,
        }
    }
}

/// One key per preference flag. Adding a flag extends this enum, which keeps
/// every `match` over keys exhaustive at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    StyleLists,
    Debug,
    StickCursor,
    BetterEnter,
    SelectAll,
    DisableZoomNotification,
    HideWarning,
}

impl SettingKey {
    pub const ALL: [SettingKey; 7] = [
        SettingKey::StyleLists,
        SettingKey::Debug,
        SettingKey::StickCursor,
        SettingKey::BetterEnter,
        SettingKey::SelectAll,
        SettingKey::DisableZoomNotification,
        SettingKey::HideWarning,
    ];

    /// The persisted JSON key for this flag.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::StyleLists => "styleLists",
            SettingKey::Debug => "debug",
            SettingKey::StickCursor => "stickCursor",
            SettingKey::BetterEnter => "betterEnter",
            SettingKey::SelectAll => "selectAll",
            SettingKey::DisableZoomNotification => "disableZoomNotification",
            SettingKey::HideWarning => "hideWarning",
        }
    }

    /// Label shown next to the toggle in the preferences panel.
    pub fn label(&self) -> &'static str {
        match self {
            SettingKey::StyleLists => "Improve the style of your lists",
            SettingKey::Debug => "Debug mode",
            SettingKey::StickCursor => "Stick the cursor to the content",
            SettingKey::BetterEnter => "Enhance the Enter key",
            SettingKey::SelectAll => "Enhance the Select All behavior",
            SettingKey::DisableZoomNotification => "Hide the zoom notification",
            SettingKey::HideWarning => "Hide the tab size warning",
        }
    }

    /// Optional secondary line under the label.
    pub fn description(&self) -> Option<&'static str> {
        match self {
            SettingKey::StyleLists => Some("Tweak bullet and indentation rendering for outlines"),
            SettingKey::Debug => Some("Log every setting mutation and editor operation"),
            SettingKey::StickCursor => {
                Some("Prevent the cursor from moving before the bullet point")
            }
            SettingKey::BetterEnter => Some("Make Enter behave the same as other outliners"),
            SettingKey::SelectAll => {
                Some("Select the list item on the first press, the whole list on the second")
            }
            SettingKey::DisableZoomNotification => None,
            SettingKey::HideWarning => Some("Suppress the warning shown when tab size is not 4"),
        }
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert_eq!(s.style_lists, false);
        assert_eq!(s.debug, false);
        assert_eq!(s.stick_cursor, true);
        assert_eq!(s.better_enter, true);
        assert_eq!(s.select_all, true);
        assert_eq!(s.disable_zoom_notification, false);
        assert_eq!(s.hide_warning, false);
    }

    #[test]
    fn test_empty_object_loads_as_defaults() {
        let s = Settings::from_persisted(json!({})).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_partial_object_merges_over_defaults() {
        let s = Settings::from_persisted(json!({
            "styleLists": true,
            "stickCursor": false,
        }))
        .unwrap();
        assert_eq!(s.style_lists, true);
        assert_eq!(s.stick_cursor, false);
        // Untouched keys keep their defaults
        assert_eq!(s.better_enter, true);
        assert_eq!(s.hide_warning, false);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let s = Settings::from_persisted(json!({
            "debug": true,
            "someRemovedSetting": 42,
        }))
        .unwrap();
        assert_eq!(s.debug, true);
        assert_eq!(s.style_lists, false);
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        let obj = value.as_object().unwrap();
        for key in SettingKey::ALL {
            assert!(obj.contains_key(key.as_str()), "missing key {}", key);
        }
    }

    #[test]
    fn test_get_and_set_cover_every_key() {
        let mut s = Settings::default();
        for key in SettingKey::ALL {
            s.set(key, true);
            assert_eq!(s.get(key), true);
            s.set(key, false);
            assert_eq!(s.get(key), false);
        }
    }
}
