//! Options-page rendering for admin screens.
//!
//! `optpage` renders the HTML of a settings page: the outer wrap, an optional
//! title, a form posting to the admin endpoint, and either a simple field
//! layout or a post-editor style layout with meta-box columns, followed by
//! save/reset buttons. Every point where a plugin could contribute markup is a
//! typed hook, and every service the surrounding admin normally provides
//! (nonces, button markup, sanitizing, meta boxes) comes from a [`Host`].
//!
//! # Features
//!
//! - **Layered arguments**: [`SharedProps`] page defaults, derived
//!   [`DefaultArgs`], per-render [`ArgsOverride`]s
//! - **Two layouts**: `simple` (one action renders all fields) and `post`
//!   (one or two meta-box columns)
//! - **Hooks**: [`Filters`] and [`Actions`], with a closure-based [`Hooks`]
//!   builder implementing both
//! - **Registry**: [`Pages`] maps page ids to displays and groups them by
//!   option key
//! - **Config files**: [`config::SiteConfig`] loads pages from YAML or JSON,
//!   layering several files with [`merge::replace_recursive`]
//!
//! # Quick Start
//!
//! ```rust
//! use optpage::{ArgsOverride, Hooks, PageDisplay, PageFormat, PropsOverride};
//!
//! let display = PageDisplay::new(
//!     "opts1",
//!     "my-page",
//!     PropsOverride::new()
//!         .title("My Settings")
//!         .page_format(PageFormat::Post)
//!         .page_columns(2),
//! )
//! .with_hooks(Hooks::new().on_page_after(|html, _| Ok(html + "<p>Thanks!</p>")));
//!
//! let html = display.page(&ArgsOverride::new().save_button("Update")).unwrap();
//! assert!(html.contains(r#"class="metabox-holder columns-2""#));
//! assert!(html.contains(r#"value="Update""#));
//! ```
//!
//! # Output escaping
//!
//! Attribute values (option key, form id, button labels) are attribute-escaped,
//! the form action is URL-escaped, and the title goes through
//! [`Host::sanitize_post`]. Filter and action output is inserted verbatim:
//! listeners are trusted code.

pub mod args;
pub mod config;
mod display;
mod error;
pub mod hooks;
pub mod host;
pub mod html;
pub mod merge;
mod registry;

pub use args::{
    ArgsOverride, BoxLocations, BoxesOverride, DefaultArgs, PageFormat, PropsOverride,
    SharedProps, SIMPLE_ACTION, TOP_LOCATION,
};
pub use config::{PageConfig, SiteConfig};
pub use display::{PageDisplay, OPTIONS_PAGE_CLASS};
pub use error::{ConfigError, ConfigResult, RegistryError, RenderError};
pub use hooks::{Actions, FilterPoint, Filters, HookError, Hooks, SaveButtonPieces};
pub use host::{ButtonKind, Host, MetaBox, MetaBoxLocation, WpHost};
pub use registry::{Page, PageMap, Pages};
