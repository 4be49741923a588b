//! Services provided by the hosting admin environment.
//!
//! The renderer never generates nonces, button markup or meta-box panels on
//! its own; it asks a [`Host`]. [`WpHost`] is a self-contained implementation
//! that produces WordPress-compatible markup, suitable for previews, tests and
//! the command-line renderer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hooks::HookError;
use crate::html::{esc_attr, esc_html, sanitize_post};

/// Visual weight of a submit button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Primary,
    Secondary,
}

impl ButtonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonKind::Primary => "primary",
            ButtonKind::Secondary => "secondary",
        }
    }
}

/// Meta-box locations the post layout may render.
///
/// This is the allowlist: location names outside it never reach the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaBoxLocation {
    Side,
    Normal,
    Advanced,
}

impl MetaBoxLocation {
    /// Parses an allowed location name. Anything else is `None`.
    pub fn parse(name: &str) -> Option<MetaBoxLocation> {
        match name {
            "side" => Some(MetaBoxLocation::Side),
            "normal" => Some(MetaBoxLocation::Normal),
            "advanced" => Some(MetaBoxLocation::Advanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetaBoxLocation::Side => "side",
            MetaBoxLocation::Normal => "normal",
            MetaBoxLocation::Advanced => "advanced",
        }
    }
}

impl fmt::Display for MetaBoxLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host services consumed by the page renderer.
pub trait Host {
    /// Hidden nonce input for `action`, named `name`, without a referer field.
    fn nonce_field(&self, action: &str, name: &str) -> String;

    /// A submit control. `label` arrives attribute-escaped.
    fn submit_button(&self, label: &str, kind: ButtonKind, name: &str) -> String;

    /// Sanitizes rich text such as the page title.
    fn sanitize_post(&self, html: &str) -> String {
        sanitize_post(html)
    }

    /// Translation pass for button labels.
    fn translate(&self, text: &str) -> String {
        text.to_string()
    }

    /// Absolute URL of an admin endpoint.
    fn admin_url(&self, path: &str) -> String;

    /// Emits the meta boxes registered for `page` at `location` into `out`.
    fn do_meta_boxes(
        &self,
        page: &str,
        location: MetaBoxLocation,
        out: &mut String,
    ) -> Result<(), HookError>;
}

/// A static meta-box panel registered with [`WpHost`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaBox {
    pub id: String,
    pub title: String,
    /// Page slug the box belongs to.
    pub page: String,
    pub location: MetaBoxLocation,
    /// Pre-rendered inner HTML.
    #[serde(default)]
    pub content: String,
}

/// Default [`Host`] producing WordPress-style markup.
#[derive(Debug, Clone)]
pub struct WpHost {
    admin_base: String,
    nonce_salt: String,
    meta_boxes: Vec<MetaBox>,
}

impl Default for WpHost {
    fn default() -> Self {
        Self {
            admin_base: "/wp-admin/".to_string(),
            nonce_salt: String::new(),
            meta_boxes: Vec::new(),
        }
    }
}

impl WpHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the admin base URL; a trailing slash is added when missing.
    pub fn admin_base(mut self, base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        self.admin_base = base;
        self
    }

    /// Sets the salt mixed into nonce tokens.
    pub fn nonce_salt(mut self, salt: impl Into<String>) -> Self {
        self.nonce_salt = salt.into();
        self
    }

    pub fn meta_box(mut self, meta_box: MetaBox) -> Self {
        self.meta_boxes.push(meta_box);
        self
    }

    pub fn meta_boxes(&self) -> &[MetaBox] {
        &self.meta_boxes
    }

    /// Ten-character hex token for `action`, derived from the salt with
    /// 64-bit FNV-1a. The same salt and action always give the same token.
    pub fn nonce(&self, action: &str) -> String {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;

        let hash = self
            .nonce_salt
            .bytes()
            .chain(std::iter::once(0))
            .chain(action.bytes())
            .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME));
        format!("{:016x}", hash)[..10].to_string()
    }
}

impl Host for WpHost {
    fn nonce_field(&self, action: &str, name: &str) -> String {
        let name = esc_attr(name);
        format!(
            r#"<input type="hidden" id="{name}" name="{name}" value="{}" />"#,
            self.nonce(action)
        )
    }

    fn submit_button(&self, label: &str, kind: ButtonKind, name: &str) -> String {
        let name = esc_attr(name);
        format!(
            r#"<input type="submit" name="{name}" id="{name}" class="button button-{}" value="{label}" />"#,
            kind.as_str()
        )
    }

    fn admin_url(&self, path: &str) -> String {
        format!("{}{}", self.admin_base, path.trim_start_matches('/'))
    }

    fn do_meta_boxes(
        &self,
        page: &str,
        location: MetaBoxLocation,
        out: &mut String,
    ) -> Result<(), HookError> {
        out.push_str(&format!(
            r#"<div id="{location}-sortables" class="meta-box-sortables">"#
        ));
        for meta_box in self
            .meta_boxes
            .iter()
            .filter(|b| b.page == page && b.location == location)
        {
            out.push_str(&format!(
                r#"<div id="{}" class="postbox"><div class="postbox-header"><h2 class="hndle">{}</h2></div><div class="inside">{}</div></div>"#,
                esc_attr(&meta_box.id),
                esc_html(&meta_box.title),
                meta_box.content
            ));
        }
        out.push_str("</div>");
        Ok(())
    }
}
