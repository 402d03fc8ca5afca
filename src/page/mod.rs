//! In-memory model of the listing page the controller works against.
//!
//! The page owns every element and both display regions. Controllers get
//! shared handles to the pieces they touch at construction time instead of
//! looking them up by selector when an event fires.

pub mod element;
pub mod region;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::warn;

use crate::model::RestaurantSummary;

pub use element::{Element, HIDDEN_CLASS};
pub use region::{Fragment, Region};

pub const UPDATE_TRIGGER_ID: &str = "update";
pub const UPDATE_FORM_ID: &str = "updateform";
pub const ENTRY_CLASS: &str = "restaurant";
pub const REVIEWS_REGION: &str = "reviews";
pub const PHOTOS_REGION: &str = "photos";

pub type Shared<T> = Rc<RefCell<T>>;
pub type ElementHandle = Shared<Element>;
pub type RegionHandle = Shared<Region>;

pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

// ---------------------------------------------------------------------------
// Activation: a user-initiated click/enter on an element
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    target: String,
    default_prevented: bool,
}

impl Activation {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            default_prevented: false,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Page {
    elements: BTreeMap<String, ElementHandle>,
    entries: Vec<ElementHandle>,
    reviews: RegionHandle,
    photos: RegionHandle,
    location: String,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// A page with the update trigger, the (hidden) update form and two
    /// empty regions, but no restaurant entries.
    pub fn new() -> Self {
        let mut page = Self {
            elements: BTreeMap::new(),
            entries: Vec::new(),
            reviews: shared(Region::new(REVIEWS_REGION)),
            photos: shared(Region::new(PHOTOS_REGION)),
            location: "/".to_string(),
        };
        page.insert(Element::new(UPDATE_TRIGGER_ID).with_label("Update"));
        page.insert(Element::new(UPDATE_FORM_ID).with_class(HIDDEN_CLASS));
        page
    }

    pub fn from_listing(listing: &[RestaurantSummary]) -> Self {
        let mut page = Self::new();
        page.set_entries(listing);
        page
    }

    /// Replace the restaurant entries, keeping every other element and both
    /// regions as they are.
    pub fn set_entries(&mut self, listing: &[RestaurantSummary]) {
        for old in self.entries.drain(..) {
            let id = old.borrow().id().to_string();
            self.elements.remove(&id);
        }

        for summary in listing {
            let id = summary.id.as_str();
            if self.elements.contains_key(id) {
                warn!(id, "entry id collides with an existing element, skipping");
                continue;
            }
            let mut el = Element::new(id)
                .with_class(ENTRY_CLASS)
                .with_label(summary.name.clone());
            if let Some(href) = &summary.href {
                el = el.with_href(href.clone());
            }
            let handle = self.insert(el);
            self.entries.push(handle);
        }
    }

    pub fn insert(&mut self, element: Element) -> ElementHandle {
        let id = element.id().to_string();
        let handle = shared(element);
        self.elements.insert(id, Rc::clone(&handle));
        handle
    }

    /// Look up an element by id.
    pub fn element(&self, id: &str) -> Option<ElementHandle> {
        self.elements.get(id).cloned()
    }

    /// Remove an element by id. Entries removed this way also leave the
    /// entry list.
    pub fn remove(&mut self, id: &str) -> Option<ElementHandle> {
        let removed = self.elements.remove(id)?;
        self.entries.retain(|e| !Rc::ptr_eq(e, &removed));
        Some(removed)
    }

    /// All elements carrying `class`, in id order.
    pub fn select_class(&self, class: &str) -> Vec<ElementHandle> {
        self.elements
            .values()
            .filter(|e| e.borrow().has_class(class))
            .cloned()
            .collect()
    }

    /// Restaurant entries, in listing order.
    pub fn entries(&self) -> &[ElementHandle] {
        &self.entries
    }

    pub fn reviews(&self) -> RegionHandle {
        Rc::clone(&self.reviews)
    }

    pub fn photos(&self) -> RegionHandle {
        Rc::clone(&self.photos)
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Run the default action of an activation once its handlers are done:
    /// follow the target's link unless a handler prevented it. Returns
    /// whether the page navigated.
    pub fn finish_activation(&mut self, activation: &Activation) -> bool {
        if activation.default_prevented() {
            return false;
        }
        let href = self
            .element(activation.target())
            .and_then(|e| e.borrow().href().map(str::to_string));
        match href {
            Some(href) => {
                self.location = href;
                true
            }
            None => false,
        }
    }
}
