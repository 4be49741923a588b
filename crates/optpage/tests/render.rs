//! End-to-end rendering through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use optpage::{
    ArgsOverride, BoxesOverride, ButtonKind, FilterPoint, HookError, Hooks, Host, MetaBox,
    MetaBoxLocation, PageDisplay, PageFormat, PropsOverride, RenderError, WpHost,
    OPTIONS_PAGE_CLASS,
};

/// Asserts that every needle appears in `html`, in the given order.
fn assert_in_order(html: &str, needles: &[&str]) {
    let mut from = 0;
    for needle in needles {
        match html[from..].find(needle) {
            Some(pos) => from += pos + needle.len(),
            None => panic!("{needle:?} not found after byte {from} in:\n{html}"),
        }
    }
}

// =============================================================================
// Simple pages
// =============================================================================

#[test]
fn test_simple_page_end_to_end() {
    let display = PageDisplay::new(
        "opts1",
        "my-page",
        PropsOverride::new()
            .title("My Settings")
            .page_format(PageFormat::Simple),
    );

    let html = display.page(&ArgsOverride::new()).unwrap();

    assert_in_order(
        &html,
        &[
            r#"<div class="wrap cmb2-options-page options-opts1">"#,
            r#"<h1 class="wp-heading-inline">My Settings</h1>"#,
            "<form ",
            r#"<input type="hidden" name="action" value="opts1">"#,
            r#"<p class="cmb-submit-wrap clear"><input type="submit" name="submit-cmb" id="submit-cmb" class="button button-primary" value="Save" /></p>"#,
            "</form>",
            "</div>",
        ],
    );
    assert!(!html.contains("reset-cmb"));
}

#[test]
fn test_simple_page_fields_come_from_action() {
    let hooks = Hooks::new()
        .action("cmb2_options_simple_page", |page, out| {
            out.push_str(&format!(r#"<div class="cmb2-metabox" data-page="{page}">"#));
            Ok(())
        })
        .action("cmb2_options_simple_page", |_, out| {
            out.push_str("</div>");
            Ok(())
        });
    let display = PageDisplay::new("opts1", "my-page", PropsOverride::new()).with_hooks(hooks);

    let html = display.page(&ArgsOverride::new()).unwrap();
    assert_in_order(
        &html,
        &[
            r#"name="action" value="opts1">"#,
            r#"<div class="cmb2-metabox" data-page="my-page"></div>"#,
            "submit-cmb",
        ],
    );
}

#[test]
fn test_custom_simple_action() {
    let hooks = Hooks::new().action("my_fields", |_, out| {
        out.push_str("[fields]");
        Ok(())
    });
    let display = PageDisplay::new("opts1", "my-page", PropsOverride::new()).with_hooks(hooks);

    let default = display.page_form(&ArgsOverride::new()).unwrap();
    assert!(!default.contains("[fields]"));

    let custom = display
        .page_form(&ArgsOverride::new().simple_action("my_fields"))
        .unwrap();
    assert!(custom.contains("[fields]"));
}

// =============================================================================
// Post-style pages
// =============================================================================

fn post_host() -> WpHost {
    let meta_box = |id: &str, location| MetaBox {
        id: id.to_string(),
        title: id.to_uppercase(),
        page: "my-page".into(),
        location,
        content: format!("<p>{id}</p>"),
    };
    WpHost::new()
        .meta_box(meta_box("main", MetaBoxLocation::Normal))
        .meta_box(meta_box("extra", MetaBoxLocation::Advanced))
        .meta_box(meta_box("aside", MetaBoxLocation::Side))
}

#[test]
fn test_post_page_one_column() {
    let display = PageDisplay::new(
        "opts1",
        "my-page",
        PropsOverride::new().page_format(PageFormat::Post),
    )
    .with_host(post_host());

    let html = display.page(&ArgsOverride::new()).unwrap();

    assert!(html.starts_with(r#"<div class="wrap options-opts1">"#));
    assert!(!html.contains(OPTIONS_PAGE_CLASS));
    assert!(!html.contains("<p>aside</p>"));
    assert!(!html.contains("postbox-container-2"));
    assert_in_order(
        &html,
        &[
            r#"id="meta-box-order-nonce""#,
            r#"id="closedpostboxesnonce""#,
            r#"<div id="poststuff">"#,
            r#"<div id="post-body" class="metabox-holder columns-1">"#,
            r#"<div id="postbox-container-1" class="postbox-container">"#,
            "<p>main</p>",
            "<p>extra</p>",
            "submit-cmb",
        ],
    );
}

#[test]
fn test_post_page_two_columns() {
    let display = PageDisplay::new(
        "opts1",
        "my-page",
        PropsOverride::new()
            .page_format(PageFormat::Post)
            .page_columns(2),
    )
    .with_host(post_host());

    let html = display.page_form(&ArgsOverride::new()).unwrap();

    assert_in_order(
        &html,
        &[
            r#"<div id="post-body" class="metabox-holder columns-2">"#,
            r#"<div id="postbox-container-1" class="postbox-container">"#,
            "<p>aside</p>",
            r#"<div id="postbox-container-2" class="postbox-container">"#,
            "<p>main</p>",
            "<p>extra</p>",
        ],
    );
}

#[test]
fn test_post_page_without_nonces() {
    let display = PageDisplay::new(
        "opts1",
        "my-page",
        PropsOverride::new().page_format(PageFormat::Post),
    );
    let html = display
        .page_form(&ArgsOverride::new().page_nonces(false))
        .unwrap();
    assert!(!html.contains("nonce"));
}

#[test]
fn test_post_page_box_override_merges_per_key() {
    let display = PageDisplay::new(
        "opts1",
        "my-page",
        PropsOverride::new()
            .page_format(PageFormat::Post)
            .page_columns(2),
    )
    .with_host(post_host());

    // Only `normal` is overridden; the other locations keep their defaults.
    let html = display
        .page_form(&ArgsOverride::new().boxes(BoxesOverride {
            normal: Some("side".into()),
            ..Default::default()
        }))
        .unwrap();

    assert_eq!(html.matches("<p>aside</p>").count(), 2);
    assert!(!html.contains("<p>main</p>"));
    assert!(html.contains("<p>extra</p>"));
}

#[test]
fn test_render_time_format_override() {
    let display = PageDisplay::new("opts1", "my-page", PropsOverride::new());
    let html = display
        .page(&ArgsOverride::new().page_format(PageFormat::Post))
        .unwrap();
    assert!(!html.contains(OPTIONS_PAGE_CLASS));
    assert!(html.contains(r#"<div id="poststuff">"#));
}

// =============================================================================
// Buttons
// =============================================================================

#[test]
fn test_display_only_page_has_no_buttons() {
    let display = PageDisplay::new("opts1", "my-page", PropsOverride::new().save_button(""));
    let html = display.page_form(&ArgsOverride::new()).unwrap();
    assert!(!html.contains("cmb-submit-wrap"));
    assert!(!html.contains(r#"type="submit""#));
}

#[test]
fn test_reset_and_save_unwrapped() {
    let display = PageDisplay::new(
        "opts1",
        "my-page",
        PropsOverride::new().reset_button("Reset"),
    );
    let html = display
        .page_form(&ArgsOverride::new().button_wrap(false))
        .unwrap();
    assert!(!html.contains("cmb-submit-wrap"));
    assert_in_order(&html, &["reset-cmb", "submit-cmb", "</form>"]);
}

// =============================================================================
// Hosts and hooks
// =============================================================================

/// Host that counts meta-box requests and localizes labels.
#[derive(Default)]
struct CountingHost {
    meta_box_calls: RefCell<usize>,
}

impl Host for CountingHost {
    fn nonce_field(&self, action: &str, name: &str) -> String {
        format!("<nonce {action} {name}>")
    }

    fn submit_button(&self, label: &str, kind: ButtonKind, name: &str) -> String {
        format!("<button {} {name}>{label}</button>", kind.as_str())
    }

    fn translate(&self, text: &str) -> String {
        format!("{text} (fr)")
    }

    fn admin_url(&self, path: &str) -> String {
        format!("https://admin.example/{path}")
    }

    fn do_meta_boxes(
        &self,
        _page: &str,
        location: MetaBoxLocation,
        out: &mut String,
    ) -> Result<(), HookError> {
        *self.meta_box_calls.borrow_mut() += 1;
        out.push_str(&format!("<boxes {location}>"));
        Ok(())
    }
}

#[test]
fn test_custom_host_services() {
    let host = Rc::new(CountingHost::default());
    let display = PageDisplay::new(
        "opts1",
        "my-page",
        PropsOverride::new().page_format(PageFormat::Post),
    )
    .with_host_rc(host.clone());

    let html = display.page_form(&ArgsOverride::new()).unwrap();

    assert!(html.starts_with(r#"<form action="https://admin.example/admin-post.php""#));
    assert!(html.contains("<nonce meta-box-order meta-box-order-nonce>"));
    assert!(html.contains("<button primary submit-cmb>Save (fr)</button>"));
    assert_eq!(*host.meta_box_calls.borrow(), 2);
}

#[test]
fn test_filters_chain_in_registration_order() {
    let hooks = Hooks::new()
        .on_form_bottom(|html, _| Ok(html + "[one]"))
        .on_form_bottom(|html, _| Ok(html + "[two]"));
    let display = PageDisplay::new("opts1", "my-page", PropsOverride::new()).with_hooks(hooks);

    let html = display.page_form(&ArgsOverride::new()).unwrap();
    assert!(html.ends_with("[one][two]</form>"));
}

#[test]
fn test_filters_see_the_display() {
    let hooks = Hooks::new().on_page_before(|html, display| {
        Ok(format!("{html}<p>{} / {}</p>", display.option_key(), display.slug()))
    });
    let display = PageDisplay::new("opts1", "my-page", PropsOverride::new()).with_hooks(hooks);

    let html = display.page(&ArgsOverride::new()).unwrap();
    assert_in_order(&html, &["<p>opts1 / my-page</p>", "<form "]);
}

#[test]
fn test_failing_action_aborts_render() {
    let hooks = Hooks::new().action("cmb2_options_simple_page", |_, _| {
        Err(HookError::action("cmb2_options_simple_page", "database unavailable"))
    });
    let display = PageDisplay::new("opts1", "my-page", PropsOverride::new()).with_hooks(hooks);

    let err = display.page(&ArgsOverride::new()).unwrap_err();
    assert!(matches!(err, RenderError::Hook(_)));
    assert!(err.to_string().contains("database unavailable"));
}

#[test]
fn test_filter_error_names_hook() {
    let hooks = Hooks::new().on_form_id(|_, _| Err(HookError::filter(FilterPoint::FormId, "no")));
    let display = PageDisplay::new("opts1", "my-page", PropsOverride::new()).with_hooks(hooks);

    let err = display.page_form(&ArgsOverride::new()).unwrap_err();
    assert!(err.to_string().contains("cmb2_options_form_id"));
}
