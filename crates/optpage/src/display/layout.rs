//! Simple and post-style form layouts.

use tracing::trace;

use super::PageDisplay;
use crate::args::{BoxLocations, BoxesOverride, TOP_LOCATION};
use crate::error::RenderError;
use crate::host::MetaBoxLocation;

/// Nonce (action, field name) pairs emitted by the post layout.
const POST_NONCES: [(&str, &str); 2] = [
    ("meta-box-order", "meta-box-order-nonce"),
    ("closedpostboxes", "closedpostboxesnonce"),
];

impl PageDisplay {
    /// Simple layout: everything the `action` hook emits for `page`.
    ///
    /// An empty `action` renders nothing; an empty `page` uses the stored slug.
    /// Every box hooked into the action appears as one visual block.
    pub fn page_form_simple(&self, action: &str, page: &str) -> Result<String, RenderError> {
        if action.is_empty() {
            return Ok(String::new());
        }
        let page = if page.is_empty() { self.page.as_str() } else { page };

        let mut html = String::new();
        self.actions.do_action(action, page, &mut html)?;
        Ok(html)
    }

    /// Post-editor style layout.
    ///
    /// `cols` below 1 falls back to the shared column count. `boxes` is merged
    /// onto the default locations.
    pub fn page_form_post(
        &self,
        nonces: bool,
        cols: i64,
        boxes: &BoxesOverride,
    ) -> Result<String, RenderError> {
        let locations = BoxLocations::default().merged(boxes);
        self.render_post(nonces, cols, &locations)
    }

    pub(super) fn render_post(
        &self,
        nonces: bool,
        cols: i64,
        loc: &BoxLocations,
    ) -> Result<String, RenderError> {
        let cols = self.columns(cols);

        let mut html = self.page_form_post_nonces(nonces);
        html.push_str(&self.page_form_post_context_boxes(&loc.top)?);

        html.push_str(r#"<div id="poststuff">"#);
        html.push_str(&format!(
            r#"<div id="post-body" class="metabox-holder columns-{cols}">"#
        ));

        html.push_str(&self.page_form_post_sidebar(cols, &loc.side)?);

        html.push_str(&format!(
            r#"<div id="postbox-container-{cols}" class="postbox-container">"#
        ));
        html.push_str(&self.page_form_post_meta_boxes(&loc.normal)?);
        html.push_str(&self.page_form_post_meta_boxes(&loc.advanced)?);
        html.push_str("</div>");

        html.push_str("</div>");
        html.push_str("</div>");

        Ok(html)
    }

    /// Sidebar column, present only in two-column layouts.
    pub fn page_form_post_sidebar(&self, cols: i64, side: &str) -> Result<String, RenderError> {
        if self.columns(cols) != 2 {
            return Ok(String::new());
        }

        let mut html = String::from(r#"<div id="postbox-container-1" class="postbox-container">"#);
        html.push_str(&self.page_form_post_meta_boxes(side)?);
        html.push_str("</div>");
        Ok(html)
    }

    /// The meta-box ordering and closed-state nonce fields.
    pub fn page_form_post_nonces(&self, nonces: bool) -> String {
        if !nonces {
            return String::new();
        }
        POST_NONCES
            .iter()
            .map(|(action, name)| self.host.nonce_field(action, name))
            .collect()
    }

    /// Context boxes hooked at `location`.
    ///
    /// Only [`TOP_LOCATION`] is allowed; any other name renders nothing.
    pub fn page_form_post_context_boxes(&self, location: &str) -> Result<String, RenderError> {
        if location != TOP_LOCATION {
            trace!(location, "context location not allowed, skipping");
            return Ok(String::new());
        }

        let mut html = String::new();
        self.actions.do_action(location, &self.page, &mut html)?;
        Ok(html)
    }

    /// Meta boxes registered at `location`.
    ///
    /// Only `side`, `normal` and `advanced` are allowed; other names render
    /// nothing and never reach the host.
    pub fn page_form_post_meta_boxes(&self, location: &str) -> Result<String, RenderError> {
        let Some(location) = MetaBoxLocation::parse(location) else {
            trace!(location, "meta-box location not allowed, skipping");
            return Ok(String::new());
        };

        let mut html = String::new();
        self.host.do_meta_boxes(&self.page, location, &mut html)?;
        Ok(html)
    }

    fn columns(&self, cols: i64) -> i64 {
        if cols < 1 {
            self.shared.page_columns
        } else {
            cols
        }
    }
}
