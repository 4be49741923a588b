//! Extension points for page rendering.
//!
//! Hooks let external code inject or rewrite HTML at fixed points of the page
//! pipeline without touching the layout logic.
//!
//! # Pipeline Position
//!
//! ```text
//! <div class="wrap ...">
//!   <h1>title</h1>
//!   → PAGE BEFORE filter
//!   <form id="FORM ID filter">
//!     → FORM TOP filter
//!     <input type="hidden" name="action">
//!     simple layout  → ACTION hook (output captured)
//!     post layout    → ACTION hook for the top location, meta boxes from the host
//!     buttons        → SAVE HTML filter
//!     → FORM BOTTOM filter
//!   </form>
//!   → PAGE AFTER filter
//! </div>
//! ```
//!
//! # Hook Kinds
//!
//! - Filters ([`Filters`]): receive the in-flight value and return a
//!   replacement. HTML filters start from an empty string; the form-id filter
//!   starts from the computed id; the save-html filter starts from the button
//!   block and may return `None` to signal an unusable value.
//! - Actions ([`Actions`]): named hooks whose listeners emit HTML into a
//!   capture buffer. The buffer's contents become the rendered fragment.
//!
//! [`Hooks`] is a closure-based implementation of both traits. Listeners on the
//! same point run in registration order, each receiving the previous result.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

use crate::display::PageDisplay;

/// The six named filter points of the page pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterPoint {
    /// Content between the title and the form.
    PageBefore,
    /// Content after the form, inside the wrap.
    PageAfter,
    /// The form element's `id` attribute.
    FormId,
    /// Content just after the opening form tag.
    FormTop,
    /// Content just before the closing form tag.
    FormBottom,
    /// The final save/reset button block.
    SaveHtml,
}

impl FilterPoint {
    /// Every filter point, in pipeline order.
    pub const ALL: [FilterPoint; 6] = [
        FilterPoint::PageBefore,
        FilterPoint::FormId,
        FilterPoint::FormTop,
        FilterPoint::SaveHtml,
        FilterPoint::FormBottom,
        FilterPoint::PageAfter,
    ];

    /// Stable hook name, as used in configuration files.
    pub fn hook_name(&self) -> &'static str {
        match self {
            FilterPoint::PageBefore => "cmb2_options_page_before",
            FilterPoint::PageAfter => "cmb2_options_page_after",
            FilterPoint::FormId => "cmb2_options_form_id",
            FilterPoint::FormTop => "cmb2_options_form_top",
            FilterPoint::FormBottom => "cmb2_options_form_bottom",
            FilterPoint::SaveHtml => "cmb2_options_page_save_html",
        }
    }

    /// Looks a filter point up by its hook name.
    pub fn from_hook_name(name: &str) -> Option<FilterPoint> {
        Self::ALL.into_iter().find(|p| p.hook_name() == name)
    }
}

impl fmt::Display for FilterPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hook_name())
    }
}

/// Error raised by a filter or action listener.
///
/// Hook errors are never swallowed by the renderer; they abort the render and
/// surface as [`RenderError::Hook`](crate::RenderError::Hook).
#[derive(Debug, Error)]
#[error("hook error ({hook}): {message}")]
pub struct HookError {
    /// Human-readable error message
    pub message: String,
    /// Name of the filter point or action that failed
    pub hook: String,
    /// The underlying error source, if any
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl HookError {
    /// Creates an error for a filter point.
    pub fn filter(point: FilterPoint, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hook: point.hook_name().to_string(),
            source: None,
        }
    }

    /// Creates an error for a named action.
    pub fn action(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hook: name.into(),
            source: None,
        }
    }

    /// Sets the source error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        self.source = Some(source.into());
        self
    }
}

/// The unwrapped parts of the save/reset button block, handed to the
/// save-html filter alongside the assembled HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveButtonPieces {
    /// Wrap template with `{reset}` and `{save}` placeholders.
    pub button_wrap: String,
    /// Reset button markup, empty when there is no reset button.
    pub reset_button: String,
    /// Save button markup, empty when there is no save button.
    pub save_button: String,
}

/// Filter points of the page pipeline.
///
/// Every method defaults to passing its value through unchanged, so an
/// implementation only overrides the points it cares about.
pub trait Filters {
    fn page_before(&self, html: String, _display: &PageDisplay) -> Result<String, HookError> {
        Ok(html)
    }

    fn page_after(&self, html: String, _display: &PageDisplay) -> Result<String, HookError> {
        Ok(html)
    }

    /// Returning an empty id makes the renderer fall back to the computed id.
    fn form_id(&self, id: String, _display: &PageDisplay) -> Result<String, HookError> {
        Ok(id)
    }

    fn form_top(&self, html: String, _display: &PageDisplay) -> Result<String, HookError> {
        Ok(html)
    }

    fn form_bottom(&self, html: String, _display: &PageDisplay) -> Result<String, HookError> {
        Ok(html)
    }

    /// `None` (or an empty string) drops the button block entirely.
    fn save_html(
        &self,
        html: String,
        _pieces: &SaveButtonPieces,
        _page: &str,
    ) -> Result<Option<String>, HookError> {
        Ok(Some(html))
    }
}

/// Named action hooks that emit HTML.
pub trait Actions {
    /// Runs every listener of `name` with the page slug, appending their
    /// output to `out`. Unknown actions emit nothing.
    fn do_action(&self, name: &str, page: &str, out: &mut String) -> Result<(), HookError>;
}

/// Type alias for HTML filter listeners.
pub type HtmlFilterFn = Rc<dyn Fn(String, &PageDisplay) -> Result<String, HookError>>;

/// Type alias for save-html filter listeners.
///
/// Listeners receive the value produced by the previous listener, which is
/// `None` once any listener has returned a non-string.
pub type SaveHtmlFn =
    Rc<dyn Fn(Option<String>, &SaveButtonPieces, &str) -> Result<Option<String>, HookError>>;

/// Type alias for action listeners.
pub type ActionFn = Rc<dyn Fn(&str, &mut String) -> Result<(), HookError>>;

/// Closure-registered filters and actions.
///
/// # Example
///
/// ```rust
/// use optpage::Hooks;
///
/// let hooks = Hooks::new()
///     .on_page_before(|html, _display| Ok(html + "<p class=\"notice\">Saved.</p>"))
///     .action("cmb2_options_simple_page", |page, out| {
///         out.push_str(&format!("<div class=\"fields {page}\"></div>"));
///         Ok(())
///     });
/// assert!(!hooks.is_empty());
/// ```
#[derive(Clone, Default)]
pub struct Hooks {
    html_filters: HashMap<FilterPoint, Vec<HtmlFilterFn>>,
    save_html: Vec<SaveHtmlFn>,
    actions: HashMap<String, Vec<ActionFn>>,
}

impl Hooks {
    /// Creates a new empty hooks configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.html_filters.values().all(Vec::is_empty)
            && self.save_html.is_empty()
            && self.actions.values().all(Vec::is_empty)
    }

    /// Returns true if `name` has at least one listener.
    pub fn has_action(&self, name: &str) -> bool {
        self.actions.get(name).is_some_and(|l| !l.is_empty())
    }

    fn html_filter<F>(mut self, point: FilterPoint, f: F) -> Self
    where
        F: Fn(String, &PageDisplay) -> Result<String, HookError> + 'static,
    {
        self.html_filters.entry(point).or_default().push(Rc::new(f));
        self
    }

    pub fn on_page_before<F>(self, f: F) -> Self
    where
        F: Fn(String, &PageDisplay) -> Result<String, HookError> + 'static,
    {
        self.html_filter(FilterPoint::PageBefore, f)
    }

    pub fn on_page_after<F>(self, f: F) -> Self
    where
        F: Fn(String, &PageDisplay) -> Result<String, HookError> + 'static,
    {
        self.html_filter(FilterPoint::PageAfter, f)
    }

    pub fn on_form_id<F>(self, f: F) -> Self
    where
        F: Fn(String, &PageDisplay) -> Result<String, HookError> + 'static,
    {
        self.html_filter(FilterPoint::FormId, f)
    }

    pub fn on_form_top<F>(self, f: F) -> Self
    where
        F: Fn(String, &PageDisplay) -> Result<String, HookError> + 'static,
    {
        self.html_filter(FilterPoint::FormTop, f)
    }

    pub fn on_form_bottom<F>(self, f: F) -> Self
    where
        F: Fn(String, &PageDisplay) -> Result<String, HookError> + 'static,
    {
        self.html_filter(FilterPoint::FormBottom, f)
    }

    pub fn on_save_html<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<String>, &SaveButtonPieces, &str) -> Result<Option<String>, HookError>
            + 'static,
    {
        self.save_html.push(Rc::new(f));
        self
    }

    /// Adds a listener to a named action.
    pub fn action<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str, &mut String) -> Result<(), HookError> + 'static,
    {
        self.actions.entry(name.into()).or_default().push(Rc::new(f));
        self
    }

    fn run_html(
        &self,
        point: FilterPoint,
        value: String,
        display: &PageDisplay,
    ) -> Result<String, HookError> {
        let mut current = value;
        if let Some(listeners) = self.html_filters.get(&point) {
            for listener in listeners {
                current = listener(current, display)?;
            }
        }
        Ok(current)
    }
}

impl Filters for Hooks {
    fn page_before(&self, html: String, display: &PageDisplay) -> Result<String, HookError> {
        self.run_html(FilterPoint::PageBefore, html, display)
    }

    fn page_after(&self, html: String, display: &PageDisplay) -> Result<String, HookError> {
        self.run_html(FilterPoint::PageAfter, html, display)
    }

    fn form_id(&self, id: String, display: &PageDisplay) -> Result<String, HookError> {
        self.run_html(FilterPoint::FormId, id, display)
    }

    fn form_top(&self, html: String, display: &PageDisplay) -> Result<String, HookError> {
        self.run_html(FilterPoint::FormTop, html, display)
    }

    fn form_bottom(&self, html: String, display: &PageDisplay) -> Result<String, HookError> {
        self.run_html(FilterPoint::FormBottom, html, display)
    }

    fn save_html(
        &self,
        html: String,
        pieces: &SaveButtonPieces,
        page: &str,
    ) -> Result<Option<String>, HookError> {
        let mut current = Some(html);
        for listener in &self.save_html {
            current = listener(current, pieces, page)?;
        }
        Ok(current)
    }
}

impl Actions for Hooks {
    fn do_action(&self, name: &str, page: &str, out: &mut String) -> Result<(), HookError> {
        if let Some(listeners) = self.actions.get(name) {
            for listener in listeners {
                listener(page, out)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filter_count: usize = self.html_filters.values().map(Vec::len).sum();
        f.debug_struct("Hooks")
            .field("html_filter_count", &filter_count)
            .field("save_html_count", &self.save_html.len())
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::PropsOverride;

    fn display() -> PageDisplay {
        PageDisplay::new("opts", "my-page", PropsOverride::new())
    }

    fn pieces() -> SaveButtonPieces {
        SaveButtonPieces {
            button_wrap: "{reset}{save}".into(),
            reset_button: String::new(),
            save_button: "<input>".into(),
        }
    }

    #[test]
    fn test_hook_names_round_trip() {
        for point in FilterPoint::ALL {
            assert_eq!(FilterPoint::from_hook_name(point.hook_name()), Some(point));
        }
        assert_eq!(FilterPoint::from_hook_name("nope"), None);
    }

    #[test]
    fn test_hook_names_use_cmb2_prefix() {
        let names: Vec<_> = FilterPoint::ALL.iter().map(|p| p.hook_name()).collect();
        assert_eq!(
            names,
            [
                "cmb2_options_page_before",
                "cmb2_options_form_id",
                "cmb2_options_form_top",
                "cmb2_options_page_save_html",
                "cmb2_options_form_bottom",
                "cmb2_options_page_after",
            ]
        );
        assert_eq!(crate::args::SIMPLE_ACTION, "cmb2_options_simple_page");
        assert_eq!(FilterPoint::from_hook_name("options_form_id"), None);
    }

    #[test]
    fn test_hook_error_display() {
        let err = HookError::filter(FilterPoint::FormTop, "boom");
        assert_eq!(err.hook, "cmb2_options_form_top");
        assert_eq!(err.to_string(), "hook error (cmb2_options_form_top): boom");
    }

    #[test]
    fn test_hooks_empty() {
        assert!(Hooks::new().is_empty());
        assert!(!Hooks::new().on_form_top(|h, _| Ok(h)).is_empty());
    }

    #[test]
    fn test_filters_chain_in_order() {
        let hooks = Hooks::new()
            .on_page_before(|html, _| Ok(html + "a"))
            .on_page_before(|html, _| Ok(html + "b"));
        let out = hooks.page_before(String::new(), &display()).unwrap();
        assert_eq!(out, "ab");
    }

    #[test]
    fn test_filters_are_scoped_to_their_point() {
        let hooks = Hooks::new().on_page_before(|_, _| Ok("before".into()));
        assert_eq!(hooks.page_after(String::new(), &display()).unwrap(), "");
    }

    #[test]
    fn test_filter_receives_display_context() {
        let hooks = Hooks::new().on_form_id(|id, d| Ok(format!("{}-{}", id, d.slug())));
        assert_eq!(hooks.form_id("x".into(), &display()).unwrap(), "x-my-page");
    }

    #[test]
    fn test_filter_error_aborts_chain() {
        let hooks = Hooks::new()
            .on_form_bottom(|_, _| Err(HookError::filter(FilterPoint::FormBottom, "first fails")))
            .on_form_bottom(|_, _| panic!("should not be called"));
        assert!(hooks.form_bottom(String::new(), &display()).is_err());
    }

    #[test]
    fn test_save_html_none_propagates() {
        let hooks = Hooks::new()
            .on_save_html(|_, _, _| Ok(None))
            .on_save_html(|prev, _, _| Ok(prev));
        assert_eq!(hooks.save_html("x".into(), &pieces(), "p").unwrap(), None);
    }

    #[test]
    fn test_save_html_sees_pieces_and_page() {
        let hooks = Hooks::new().on_save_html(|_, pieces, page| {
            Ok(Some(format!("{}|{}", pieces.save_button, page)))
        });
        assert_eq!(
            hooks.save_html("x".into(), &pieces(), "my-page").unwrap(),
            Some("<input>|my-page".into())
        );
    }

    #[test]
    fn test_actions_emit_in_order() {
        let hooks = Hooks::new()
            .action("render", |page, out| {
                out.push_str(page);
                Ok(())
            })
            .action("render", |_, out| {
                out.push('!');
                Ok(())
            });
        let mut out = String::new();
        hooks.do_action("render", "p", &mut out).unwrap();
        assert_eq!(out, "p!");
        assert!(hooks.has_action("render"));
    }

    #[test]
    fn test_unknown_action_emits_nothing() {
        let mut out = String::new();
        Hooks::new().do_action("missing", "p", &mut out).unwrap();
        assert!(out.is_empty());
    }
}
