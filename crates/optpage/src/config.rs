//! Page definitions loaded from YAML or JSON.
//!
//! A [`SiteConfig`] describes a set of options pages together with the static
//! content that stands in for a live admin environment: action output, filter
//! content and meta boxes. It is what the command-line renderer runs on.
//!
//! ```yaml
//! admin_url: https://example.com/wp-admin/
//! pages:
//!   - option_key: opts1
//!     page: my-page
//!     props:
//!       title: My Settings
//!       page_format: post
//!       page_columns: 2
//! meta_boxes:
//!   - id: help
//!     title: Help
//!     page: my-page
//!     location: side
//!     content: <p>Need a hand?</p>
//! actions:
//!   edit_form_after_title: <p class="intro">Intro text</p>
//! filters:
//!   cmb2_options_page_after: <p class="footer">Footer</p>
//! ```
//!
//! # Layering
//!
//! [`SiteConfig::load_layered`] reads several files and folds them with
//! [`replace_recursive`](crate::merge::replace_recursive) before
//! deserializing: maps merge key by key, later files win, and lists (such as
//! `pages`) are replaced as a whole.

use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::args::{ArgsOverride, PropsOverride};
use crate::display::PageDisplay;
use crate::error::{ConfigError, ConfigResult, RegistryError};
use crate::hooks::{FilterPoint, Hooks};
use crate::host::{Host, MetaBox, WpHost};
use crate::merge::merge_into;
use crate::registry::Pages;

/// One options page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub option_key: String,
    /// Page slug, also the registry id.
    pub page: String,
    /// Shared props; anything other than a map counts as no props.
    pub props: Value,
    /// Render-time overrides applied when the page is rendered.
    pub args: ArgsOverride,
}

impl PageConfig {
    pub fn props(&self) -> PropsOverride {
        PropsOverride::from_value(&self.props)
    }

    /// Builds the display for this page.
    pub fn display(&self, hooks: &Hooks, host: Rc<dyn Host>) -> PageDisplay {
        PageDisplay::new(&self.option_key, &self.page, self.props())
            .with_hooks(hooks.clone())
            .with_host_rc(host)
    }
}

/// A set of pages plus the static environment they render in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Admin base URL; defaults to `/wp-admin/`.
    pub admin_url: Option<String>,
    pub nonce_salt: String,
    pub pages: Vec<PageConfig>,
    pub meta_boxes: Vec<MetaBox>,
    /// Action name → HTML emitted when the action fires.
    pub actions: BTreeMap<String, String>,
    /// Filter hook name → HTML. HTML filters append it, `cmb2_options_form_id`
    /// replaces the id with it.
    pub filters: BTreeMap<String, String>,
}

impl SiteConfig {
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let value = parse_yaml(yaml).map_err(|message| ConfigError::Parse {
            path: None,
            message,
        })?;
        Self::from_value(value, None)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.to_string(),
        })?;
        Self::from_value(value, None)
    }

    /// Loads a single `.yaml`, `.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let value = read_value(path)?;
        Self::from_value(value, Some(path))
    }

    /// Loads and merges several files, later files taking precedence.
    pub fn load_layered<P: AsRef<Path>>(paths: &[P]) -> ConfigResult<Self> {
        let mut merged = Value::Object(Default::default());
        for path in paths {
            let path = path.as_ref();
            debug!(path = %path.display(), "loading config layer");
            match read_value(path)? {
                Value::Null => debug!(path = %path.display(), "empty config layer, skipping"),
                layer @ Value::Object(_) => merge_into(&mut merged, layer),
                _ => {
                    return Err(ConfigError::Parse {
                        path: Some(path.to_path_buf()),
                        message: "top level of a config layer must be a map".to_string(),
                    })
                }
            }
        }
        Self::from_value(merged, None)
    }

    fn from_value(value: Value, path: Option<&Path>) -> ConfigResult<Self> {
        let value = if value.is_null() {
            Value::Object(Default::default())
        } else {
            value
        };
        serde_json::from_value(value).map_err(|e| ConfigError::Parse {
            path: path.map(Path::to_path_buf),
            message: e.to_string(),
        })
    }

    /// Finds the page with the given slug. When several pages share it, the
    /// last one wins, as in [`registry`](Self::registry).
    pub fn page(&self, slug: &str) -> Option<&PageConfig> {
        self.pages.iter().rev().find(|p| p.page == slug)
    }

    /// Builds hooks serving the configured action and filter content.
    pub fn hooks(&self) -> Hooks {
        let mut hooks = Hooks::new();

        for (name, html) in &self.actions {
            let html = html.clone();
            hooks = hooks.action(name.clone(), move |_page, out| {
                out.push_str(&html);
                Ok(())
            });
        }

        for (name, html) in &self.filters {
            let Some(point) = FilterPoint::from_hook_name(name) else {
                warn!(hook = %name, "unknown filter hook in config, ignoring");
                continue;
            };
            let html = html.clone();
            hooks = match point {
                FilterPoint::PageBefore => hooks.on_page_before(move |h, _| Ok(h + &html)),
                FilterPoint::PageAfter => hooks.on_page_after(move |h, _| Ok(h + &html)),
                FilterPoint::FormTop => hooks.on_form_top(move |h, _| Ok(h + &html)),
                FilterPoint::FormBottom => hooks.on_form_bottom(move |h, _| Ok(h + &html)),
                FilterPoint::FormId => hooks.on_form_id(move |_, _| Ok(html.clone())),
                FilterPoint::SaveHtml => {
                    hooks.on_save_html(move |h, _, _| Ok(h.map(|h| h + &html)))
                }
            };
        }

        hooks
    }

    /// Builds the host serving the configured meta boxes.
    pub fn host(&self) -> WpHost {
        let mut host = WpHost::new().nonce_salt(self.nonce_salt.clone());
        if let Some(url) = &self.admin_url {
            host = host.admin_base(url.clone());
        }
        for meta_box in &self.meta_boxes {
            host = host.meta_box(meta_box.clone());
        }
        host
    }

    /// Builds a registry holding a display for every configured page.
    pub fn registry(&self) -> Result<Pages, RegistryError> {
        let hooks = self.hooks();
        let host: Rc<dyn Host> = Rc::new(self.host());

        let mut pages = Pages::new();
        for page in &self.pages {
            pages.add(Rc::new(page.display(&hooks, host.clone())))?;
        }
        Ok(pages)
    }
}

fn read_value(path: &Path) -> ConfigResult<Value> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_error = |message: String| ConfigError::Parse {
        path: Some(path.to_path_buf()),
        message,
    };

    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => parse_yaml(&content).map_err(parse_error),
        Some("json") => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
        _ => Err(ConfigError::UnknownFormat(path.to_path_buf())),
    }
}

/// Parses YAML into a JSON value. A blank document is null.
fn parse_yaml(yaml: &str) -> Result<Value, String> {
    if yaml.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(yaml).map_err(|e| e.to_string())
}
