//! Options-page display.
//!
//! [`PageDisplay`] turns a resolved [`DefaultArgs`] set into page HTML. Output
//! is built in a fixed order; filters see the HTML built so far only through
//! the display they are handed, and cannot reorder the surrounding fragments.
//!
//! ```text
//! page()
//!   <div class="wrap [cmb2-options-page] options-{key}">
//!   <h1>title</h1>                      (when non-empty)
//!   page_before filter
//!   page_form()
//!     <form ... id="{form_id filter}">
//!     form_top filter
//!     <input type="hidden" name="action" value="{key}">
//!     simple layout | post layout      (by page_format)
//!     save/reset buttons
//!     form_bottom filter
//!     </form>
//!   page_after filter
//!   </div>
//! ```
//!
//! # Example
//!
//! ```rust
//! use optpage::{ArgsOverride, Hooks, PageDisplay, PropsOverride};
//!
//! let hooks = Hooks::new().action("cmb2_options_simple_page", |page, out| {
//!     out.push_str(&format!("<div class=\"fields-{page}\"></div>"));
//!     Ok(())
//! });
//!
//! let display = PageDisplay::new("opts1", "my-page", PropsOverride::new().title("My Settings"))
//!     .with_hooks(hooks);
//!
//! let html = display.page(&ArgsOverride::new()).unwrap();
//! assert!(html.starts_with(r#"<div class="wrap cmb2-options-page options-opts1">"#));
//! assert!(html.contains(r#"<h1 class="wp-heading-inline">My Settings</h1>"#));
//! assert!(html.contains(r#"<div class="fields-my-page"></div>"#));
//! ```

mod buttons;
mod layout;

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::args::{ArgsOverride, DefaultArgs, PropsOverride, SharedProps};
use crate::error::RenderError;
use crate::hooks::{Actions, Filters, Hooks};
use crate::host::{Host, WpHost};
use crate::html::{esc_attr, esc_url};

/// Class added to the wrap of every non-post page.
pub const OPTIONS_PAGE_CLASS: &str = "cmb2-options-page";

/// Renders one options page.
///
/// A display is built once per page and then rendered any number of times,
/// optionally with per-call [`ArgsOverride`]s. Its stored configuration never
/// changes after construction.
pub struct PageDisplay {
    option_key: String,
    page: String,
    shared: SharedProps,
    default_args: DefaultArgs,
    filters: Rc<dyn Filters>,
    actions: Rc<dyn Actions>,
    host: Rc<dyn Host>,
}

impl PageDisplay {
    /// Creates a display for `option_key` on the page `page`.
    ///
    /// `props` is merged shallowly onto the built-in [`SharedProps`] defaults,
    /// and the default render arguments are derived from the result. The
    /// display starts with no hooks and a default [`WpHost`].
    pub fn new(option_key: impl Into<String>, page: impl Into<String>, props: PropsOverride) -> Self {
        let option_key = option_key.into();
        let shared = SharedProps::default().merged(&props);
        let default_args = DefaultArgs::derive(&option_key, &shared);
        let hooks = Rc::new(Hooks::new());

        Self {
            option_key,
            page: page.into(),
            shared,
            default_args,
            filters: hooks.clone(),
            actions: hooks,
            host: Rc::new(WpHost::new()),
        }
    }

    /// Uses `hooks` for both filters and actions.
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        let hooks = Rc::new(hooks);
        self.filters = hooks.clone();
        self.actions = hooks;
        self
    }

    pub fn with_filters(mut self, filters: Rc<dyn Filters>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_actions(mut self, actions: Rc<dyn Actions>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_host<H: Host + 'static>(self, host: H) -> Self {
        self.with_host_rc(Rc::new(host))
    }

    /// Uses a host shared with other displays.
    pub fn with_host_rc(mut self, host: Rc<dyn Host>) -> Self {
        self.host = host;
        self
    }

    pub fn option_key(&self) -> &str {
        &self.option_key
    }

    /// The page (menu) slug.
    pub fn slug(&self) -> &str {
        &self.page
    }

    pub fn shared(&self) -> &SharedProps {
        &self.shared
    }

    pub fn default_args(&self) -> &DefaultArgs {
        &self.default_args
    }

    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    /// Derives default arguments without touching the stored ones.
    ///
    /// An absent or empty `option_key` uses the stored key. An absent or empty
    /// `shared` override uses the stored shared props; otherwise the override
    /// is merged shallowly onto them first.
    pub fn merge_default_args(
        &self,
        option_key: Option<&str>,
        shared: Option<&PropsOverride>,
    ) -> DefaultArgs {
        let option_key = option_key
            .filter(|k| !k.is_empty())
            .unwrap_or(self.option_key.as_str());

        match shared.filter(|s| !s.is_empty()) {
            Some(over) => DefaultArgs::derive(option_key, &self.shared.merged(over)),
            None => DefaultArgs::derive(option_key, &self.shared),
        }
    }

    /// Renders the whole page: wrap, title, before/after filters and form.
    pub fn page(&self, args: &ArgsOverride) -> Result<String, RenderError> {
        let args = self.default_args.apply(args);
        self.render_page(&args)
    }

    /// Renders only the form, choosing the layout from `page_format`.
    pub fn page_form(&self, args: &ArgsOverride) -> Result<String, RenderError> {
        let args = self.default_args.apply(args);
        self.render_form(&args)
    }

    fn render_page(&self, args: &DefaultArgs) -> Result<String, RenderError> {
        let wrap_class = if args.page_format.is_post() {
            String::new()
        } else {
            format!(" {}", OPTIONS_PAGE_CLASS)
        };

        let mut html = format!(
            r#"<div class="wrap{} options-{}">"#,
            wrap_class,
            esc_attr(&args.option_key)
        );

        if !args.title.is_empty() {
            html.push_str(&format!(
                r#"<h1 class="wp-heading-inline">{}</h1>"#,
                self.host.sanitize_post(&args.title)
            ));
        }

        html.push_str(&self.filters.page_before(String::new(), self)?);
        html.push_str(&self.render_form(args)?);
        html.push_str(&self.filters.page_after(String::new(), self)?);
        html.push_str("</div>");

        Ok(html)
    }

    fn render_form(&self, args: &DefaultArgs) -> Result<String, RenderError> {
        let id = format!("cmb2-option-{}", args.option_key);
        let filtered = self.filters.form_id(id.clone(), self)?;
        let form_id = if filtered.is_empty() { id } else { filtered };

        let mut html = format!(
            r#"<form action="{}" method="POST" id="{}" enctype="multipart/form-data" encoding="multipart/form-data">"#,
            esc_url(&self.host.admin_url("admin-post.php")),
            esc_attr(&form_id)
        );

        html.push_str(&self.filters.form_top(String::new(), self)?);

        html.push_str(&format!(
            r#"<input type="hidden" name="action" value="{}">"#,
            esc_attr(&args.option_key)
        ));

        debug!(
            page = %self.page,
            format = %args.page_format,
            "rendering options form"
        );
        if args.page_format.is_post() {
            html.push_str(&self.render_post(
                args.page_nonces,
                args.page_columns,
                &args.page_metaboxes,
            )?);
        } else {
            html.push_str(&self.page_form_simple(&args.simple_action, "")?);
        }

        html.push_str(&self.save_button(&args.save_button, &args.reset_button, args.button_wrap)?);
        html.push_str(&self.filters.form_bottom(String::new(), self)?);
        html.push_str("</form>");

        Ok(html)
    }
}

impl fmt::Debug for PageDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageDisplay")
            .field("option_key", &self.option_key)
            .field("page", &self.page)
            .field("shared", &self.shared)
            .field("default_args", &self.default_args)
            .finish_non_exhaustive()
    }
}
