//! Restaurant listing detail panel.
//!
//! A page model (`page`), the controller that toggles the update form and
//! fetches/renders restaurant details into it (`panel`), the HTTP source it
//! fetches from (`source`), and the listing file that seeds the page's
//! entries (`listing`).

pub mod listing;
pub mod model;
pub mod page;
pub mod panel;
pub mod source;
