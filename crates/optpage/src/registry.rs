//! Registry of page instances.
//!
//! [`Pages`] maps page ids to shared page handles. It is an ordinary value:
//! the hosting application creates one, passes it to whatever needs page
//! lookup, and calls [`Pages::clear`] to reset it between tests or requests.
//!
//! Several pages may render the same option group, so lookups by option key
//! return a map of every match.
//!
//! ```rust
//! use std::rc::Rc;
//! use optpage::{PageDisplay, Pages, PropsOverride};
//!
//! let mut pages = Pages::new();
//! pages.add(Rc::new(PageDisplay::new("group1", "general", PropsOverride::new()))).unwrap();
//! pages.add(Rc::new(PageDisplay::new("group1", "advanced", PropsOverride::new()))).unwrap();
//!
//! let group = pages.get_by_options_key("group1").unwrap();
//! assert_eq!(group.len(), 2);
//! assert!(pages.get("general").is_some());
//! ```

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::display::PageDisplay;
use crate::error::RegistryError;

/// Anything the registry can hold.
pub trait Page {
    /// Unique id of the page.
    fn page_id(&self) -> &str;

    /// Option group the page renders.
    fn option_key(&self) -> &str;
}

impl Page for PageDisplay {
    fn page_id(&self) -> &str {
        self.slug()
    }

    fn option_key(&self) -> &str {
        PageDisplay::option_key(self)
    }
}

/// Id-keyed page map returned by registry queries.
pub type PageMap<P> = HashMap<String, Rc<P>>;

/// Id-keyed store of pages.
#[derive(Debug)]
pub struct Pages<P: Page + ?Sized = PageDisplay> {
    pages: PageMap<P>,
}

impl<P: Page + ?Sized> Default for Pages<P> {
    fn default() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }
}

impl<P: Page + ?Sized> Pages<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `page` under its id, replacing any page with the same id.
    ///
    /// Returns the id, or [`RegistryError::InvalidPage`] when the id or the
    /// option key is empty. An empty key could never be looked up again
    /// through [`get_by_options_key`](Self::get_by_options_key).
    pub fn add(&mut self, page: Rc<P>) -> Result<String, RegistryError> {
        let id = page.page_id().to_string();
        if id.is_empty() || page.option_key().is_empty() {
            return Err(RegistryError::InvalidPage);
        }

        if self.pages.insert(id.clone(), page).is_some() {
            debug!(page_id = %id, "replaced registered page");
        }
        Ok(id)
    }

    /// Returns the page registered under `id`.
    pub fn get(&self, id: &str) -> Option<Rc<P>> {
        if id.is_empty() {
            return None;
        }
        self.pages.get(id).cloned()
    }

    pub fn get_all(&self) -> &PageMap<P> {
        &self.pages
    }

    /// Returns every page whose option key equals `key`.
    ///
    /// An empty key is rejected with [`RegistryError::InvalidKey`]; no stored
    /// page can have one, since [`add`](Self::add) refuses them. A valid key
    /// with no matching pages yields an empty map.
    pub fn get_by_options_key(&self, key: &str) -> Result<PageMap<P>, RegistryError> {
        if key.is_empty() {
            return Err(RegistryError::InvalidKey(key.to_string()));
        }

        Ok(self
            .pages
            .iter()
            .filter(|(_, page)| page.option_key() == key)
            .map(|(id, page)| (id.clone(), Rc::clone(page)))
            .collect())
    }

    /// Removes the page registered under `id`. Returns whether one was present.
    pub fn remove(&mut self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        self.pages.remove(id).is_some()
    }

    /// Removes every page.
    pub fn clear(&mut self) {
        self.pages.clear();
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
