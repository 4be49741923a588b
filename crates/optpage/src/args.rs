//! Page configuration types and their merge rules.
//!
//! Configuration is layered in three steps:
//!
//! ```text
//! built-in SharedProps defaults
//!   ← PropsOverride          (shallow, at construction)
//!   → DefaultArgs            (derived, never edited on its own)
//!   ← ArgsOverride           (deep, per render call)
//!   → resolved DefaultArgs
//! ```
//!
//! Shallow merges replace whole fields. The per-render merge is deep: the
//! nested [`BoxLocations`] map merges key by key, every other field replaces.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Action fired by the simple layout when no override is given.
pub const SIMPLE_ACTION: &str = "cmb2_options_simple_page";

/// The only context location the post layout renders above the columns.
pub const TOP_LOCATION: &str = "edit_form_after_title";

/// Layout used to render the form body.
///
/// Anything that is not exactly `"post"` is treated as [`PageFormat::Simple`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PageFormat {
    /// All fields in one visual block, rendered by a single action.
    #[default]
    Simple,
    /// Post-editor style columns with meta-box locations.
    Post,
}

impl PageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageFormat::Simple => "simple",
            PageFormat::Post => "post",
        }
    }

    pub fn is_post(&self) -> bool {
        matches!(self, PageFormat::Post)
    }
}

impl From<&str> for PageFormat {
    fn from(s: &str) -> Self {
        if s == "post" {
            PageFormat::Post
        } else {
            PageFormat::Simple
        }
    }
}

impl From<String> for PageFormat {
    fn from(s: String) -> Self {
        PageFormat::from(s.as_str())
    }
}

impl From<PageFormat> for String {
    fn from(format: PageFormat) -> Self {
        format.as_str().to_string()
    }
}

impl std::fmt::Display for PageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page-level values shared by every box rendered on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedProps {
    /// Number of layout columns, always at least 1.
    pub page_columns: i64,
    pub page_format: PageFormat,
    /// Reset button label; empty means no reset button.
    pub reset_button: String,
    /// Save button label; empty means no save button.
    pub save_button: String,
    pub title: String,
}

impl Default for SharedProps {
    fn default() -> Self {
        Self {
            page_columns: 1,
            page_format: PageFormat::Simple,
            reset_button: String::new(),
            save_button: "Save".to_string(),
            title: String::new(),
        }
    }
}

impl SharedProps {
    /// Returns a copy with every field defined by `over` replaced.
    pub fn merged(&self, over: &PropsOverride) -> SharedProps {
        SharedProps {
            page_columns: over.page_columns.unwrap_or(self.page_columns).max(1),
            page_format: over.page_format.unwrap_or(self.page_format),
            reset_button: over
                .reset_button
                .clone()
                .unwrap_or_else(|| self.reset_button.clone()),
            save_button: over
                .save_button
                .clone()
                .unwrap_or_else(|| self.save_button.clone()),
            title: over.title.clone().unwrap_or_else(|| self.title.clone()),
        }
    }
}

/// Partial [`SharedProps`], merged shallowly onto the stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_columns: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_format: Option<PageFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_button: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_button: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PropsOverride {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads an override from an untyped value.
    ///
    /// A non-object value yields an empty override. Keys with the wrong type
    /// are ignored individually rather than failing the whole document.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        let string = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            page_columns: map.get("page_columns").and_then(Value::as_i64),
            page_format: map
                .get("page_format")
                .and_then(Value::as_str)
                .map(PageFormat::from),
            reset_button: string("reset_button"),
            save_button: string("save_button"),
            title: string("title"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn page_columns(mut self, cols: i64) -> Self {
        self.page_columns = Some(cols);
        self
    }

    pub fn page_format(mut self, format: PageFormat) -> Self {
        self.page_format = Some(format);
        self
    }

    pub fn reset_button(mut self, label: impl Into<String>) -> Self {
        self.reset_button = Some(label.into());
        self
    }

    pub fn save_button(mut self, label: impl Into<String>) -> Self {
        self.save_button = Some(label.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Named meta-box locations used by the post layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxLocations {
    pub top: String,
    pub side: String,
    pub normal: String,
    pub advanced: String,
}

impl Default for BoxLocations {
    fn default() -> Self {
        Self {
            top: TOP_LOCATION.to_string(),
            side: "side".to_string(),
            normal: "normal".to_string(),
            advanced: "advanced".to_string(),
        }
    }
}

impl BoxLocations {
    pub fn merged(&self, over: &BoxesOverride) -> BoxLocations {
        let pick = |o: &Option<String>, base: &String| o.clone().unwrap_or_else(|| base.clone());
        BoxLocations {
            top: pick(&over.top, &self.top),
            side: pick(&over.side, &self.side),
            normal: pick(&over.normal, &self.normal),
            advanced: pick(&over.advanced, &self.advanced),
        }
    }
}

/// Partial [`BoxLocations`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxesOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced: Option<String>,
}

/// Fully resolved arguments for [`page`](crate::PageDisplay::page) and
/// [`page_form`](crate::PageDisplay::page_form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultArgs {
    pub option_key: String,
    pub page_format: PageFormat,
    pub simple_action: String,
    pub page_nonces: bool,
    pub page_columns: i64,
    pub page_metaboxes: BoxLocations,
    pub save_button: String,
    pub reset_button: String,
    pub button_wrap: bool,
    pub title: String,
}

impl DefaultArgs {
    /// Derives the default arguments for an option key from shared props.
    pub fn derive(option_key: &str, shared: &SharedProps) -> DefaultArgs {
        DefaultArgs {
            option_key: option_key.to_string(),
            page_format: shared.page_format,
            simple_action: SIMPLE_ACTION.to_string(),
            page_nonces: true,
            page_columns: shared.page_columns,
            page_metaboxes: BoxLocations::default(),
            save_button: shared.save_button.clone(),
            reset_button: shared.reset_button.clone(),
            button_wrap: true,
            title: shared.title.clone(),
        }
    }

    /// Deep-merges `over` onto these arguments.
    pub fn apply(&self, over: &ArgsOverride) -> DefaultArgs {
        let text = |o: &Option<String>, base: &String| o.clone().unwrap_or_else(|| base.clone());
        DefaultArgs {
            option_key: text(&over.option_key, &self.option_key),
            page_format: over.page_format.unwrap_or(self.page_format),
            simple_action: text(&over.simple_action, &self.simple_action),
            page_nonces: over.page_nonces.unwrap_or(self.page_nonces),
            page_columns: over.page_columns.unwrap_or(self.page_columns),
            page_metaboxes: self.page_metaboxes.merged(&over.page_metaboxes),
            save_button: text(&over.save_button, &self.save_button),
            reset_button: text(&over.reset_button, &self.reset_button),
            button_wrap: over.button_wrap.unwrap_or(self.button_wrap),
            title: text(&over.title, &self.title),
        }
    }
}

/// Per-render overrides for [`DefaultArgs`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArgsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_format: Option<PageFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simple_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_nonces: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_columns: Option<i64>,
    pub page_metaboxes: BoxesOverride,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_button: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_button: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_wrap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ArgsOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_format(mut self, format: PageFormat) -> Self {
        self.page_format = Some(format);
        self
    }

    pub fn page_columns(mut self, cols: i64) -> Self {
        self.page_columns = Some(cols);
        self
    }

    pub fn page_nonces(mut self, nonces: bool) -> Self {
        self.page_nonces = Some(nonces);
        self
    }

    pub fn simple_action(mut self, action: impl Into<String>) -> Self {
        self.simple_action = Some(action.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn save_button(mut self, label: impl Into<String>) -> Self {
        self.save_button = Some(label.into());
        self
    }

    pub fn reset_button(mut self, label: impl Into<String>) -> Self {
        self.reset_button = Some(label.into());
        self
    }

    pub fn button_wrap(mut self, wrap: bool) -> Self {
        self.button_wrap = Some(wrap);
        self
    }

    pub fn boxes(mut self, boxes: BoxesOverride) -> Self {
        self.page_metaboxes = boxes;
        self
    }
}
