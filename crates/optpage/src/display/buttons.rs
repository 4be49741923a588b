//! Save and reset buttons.

use tracing::warn;

use super::PageDisplay;
use crate::error::RenderError;
use crate::hooks::SaveButtonPieces;
use crate::host::ButtonKind;
use crate::html::esc_attr;

const WRAPPED: &str = r#"<p class="cmb-submit-wrap clear">{reset}{save}</p>"#;
const UNWRAPPED: &str = "{reset}{save}";

impl PageDisplay {
    /// The save/reset button block.
    ///
    /// Empty labels fall back to the shared defaults. When both labels end up
    /// empty there is no block at all, as on display-only pages. The reset
    /// button, when present, comes before the save button.
    pub fn save_button(&self, save: &str, reset: &str, wrap: bool) -> Result<String, RenderError> {
        let save = self.button_label(save, &self.shared.save_button);
        let reset = self.button_label(reset, &self.shared.reset_button);

        if save.is_empty() && reset.is_empty() {
            return Ok(String::new());
        }

        let pieces = SaveButtonPieces {
            button_wrap: if wrap { WRAPPED } else { UNWRAPPED }.to_string(),
            reset_button: if reset.is_empty() {
                String::new()
            } else {
                self.host
                    .submit_button(&esc_attr(&reset), ButtonKind::Secondary, "reset-cmb")
            },
            save_button: if save.is_empty() {
                String::new()
            } else {
                self.host
                    .submit_button(&esc_attr(&save), ButtonKind::Primary, "submit-cmb")
            },
        };

        let html = fill_wrap(&pieces);

        match self.filters.save_html(html, &pieces, &self.page)? {
            Some(html) => Ok(html),
            None => {
                warn!(page = %self.page, "save-html filter returned no string, dropping buttons");
                Ok(String::new())
            }
        }
    }

    fn button_label(&self, label: &str, fallback: &str) -> String {
        let label = if label.is_empty() { fallback } else { label };
        if label.is_empty() {
            String::new()
        } else {
            self.host.translate(label)
        }
    }
}

/// Fills the `{reset}` and `{save}` slots of the wrap template in one pass, so
/// a label containing a slot name is left alone.
fn fill_wrap(pieces: &SaveButtonPieces) -> String {
    let mut html = String::new();
    let mut rest = pieces.button_wrap.as_str();
    while let Some(start) = rest.find('{') {
        let (before, tail) = rest.split_at(start);
        html.push_str(before);
        if let Some(after) = tail.strip_prefix("{reset}") {
            html.push_str(&pieces.reset_button);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{save}") {
            html.push_str(&pieces.save_button);
            rest = after;
        } else {
            html.push('{');
            rest = &tail[1..];
        }
    }
    html.push_str(rest);
    html
}
