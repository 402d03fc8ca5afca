//! Detail fetch-and-render.
//!
//! Activating an entry suppresses its default action, issues a numbered
//! request and spawns the fetch. The fetch task reports back over a channel
//! as a [`DetailLoaded`]; the owner of the page feeds it to
//! [`DetailPanel::apply`], which renders it into the reviews and photos
//! regions. With [`ResponseOrdering::LatestOnly`] only the most recently
//! issued request may render.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::model::{RestaurantDetail, RestaurantId, ResponseOrdering};
use crate::page::{Activation, Element, Page, RegionHandle};
use crate::source::{DetailSource, FetchError};

use super::render::render_detail;

/// One issued detail request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    /// Monotonic, starting at 1.
    pub seq: u64,
    pub id: RestaurantId,
}

/// A finished fetch, waiting to be applied to the page.
#[derive(Debug)]
pub struct DetailLoaded {
    pub request: DetailRequest,
    pub result: Result<RestaurantDetail, FetchError>,
}

/// What applying a finished fetch did to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Rendered {
        id: RestaurantId,
        reviews: usize,
        photos: usize,
    },
    /// A newer request was issued; the regions were left alone.
    Stale {
        id: RestaurantId,
        seq: u64,
        latest: u64,
    },
}

pub struct DetailPanel {
    source: Arc<dyn DetailSource>,
    reviews: RegionHandle,
    photos: RegionHandle,
    ordering: ResponseOrdering,
    loaded_tx: mpsc::UnboundedSender<DetailLoaded>,
    last_issued: u64,
    in_flight: usize,
    shown: Option<(RestaurantId, String)>,
}

impl DetailPanel {
    pub fn new(
        source: Arc<dyn DetailSource>,
        reviews: RegionHandle,
        photos: RegionHandle,
        loaded_tx: mpsc::UnboundedSender<DetailLoaded>,
    ) -> Self {
        Self {
            source,
            reviews,
            photos,
            ordering: ResponseOrdering::default(),
            loaded_tx,
            last_issued: 0,
            in_flight: 0,
            shown: None,
        }
    }

    /// Wire the panel to the regions of `page`.
    pub fn for_page(
        page: &Page,
        source: Arc<dyn DetailSource>,
        loaded_tx: mpsc::UnboundedSender<DetailLoaded>,
    ) -> Self {
        Self::new(source, page.reviews(), page.photos(), loaded_tx)
    }

    pub fn with_ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    pub fn set_ordering(&mut self, ordering: ResponseOrdering) {
        self.ordering = ordering;
    }

    /// Number of requests issued but not applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }

    /// Id and name of the detail currently rendered in the regions.
    pub fn shown(&self) -> Option<(&RestaurantId, &str)> {
        self.shown.as_ref().map(|(id, name)| (id, name.as_str()))
    }

    /// Handle an activation on a restaurant entry. Must be called from
    /// within a tokio runtime; the fetch runs as a spawned task.
    pub fn activate(&mut self, entry: &Element, activation: &mut Activation) -> DetailRequest {
        activation.prevent_default();

        let request = self.issue(RestaurantId::new(entry.id()));
        info!(id = request.id.as_str(), seq = request.seq, "requesting details");

        let source = Arc::clone(&self.source);
        let tx = self.loaded_tx.clone();
        let spawned = request.clone();
        tokio::spawn(async move {
            let result = source.fetch(&spawned.id).await;
            if tx
                .send(DetailLoaded {
                    request: spawned,
                    result,
                })
                .is_err()
            {
                debug!("detail receiver dropped, discarding response");
            }
        });

        request
    }

    /// Fetch and apply in one go, without going through the channel.
    pub async fn load(&mut self, id: RestaurantId) -> Result<Applied, FetchError> {
        let request = self.issue(id);
        let result = self.source.fetch(&request.id).await;
        self.apply(DetailLoaded { request, result })
    }

    /// Render a finished fetch, subject to the ordering policy. A failed
    /// fetch leaves both regions untouched.
    pub fn apply(&mut self, loaded: DetailLoaded) -> Result<Applied, FetchError> {
        self.in_flight = self.in_flight.saturating_sub(1);
        let DetailLoaded { request, result } = loaded;

        if self.ordering == ResponseOrdering::LatestOnly && request.seq != self.last_issued {
            debug!(
                id = request.id.as_str(),
                seq = request.seq,
                latest = self.last_issued,
                "discarding response to superseded request"
            );
            return Ok(Applied::Stale {
                id: request.id,
                seq: request.seq,
                latest: self.last_issued,
            });
        }

        let detail = result.inspect_err(|e| {
            warn!(id = request.id.as_str(), error = %e, "detail fetch failed");
        })?;

        debug!(id = request.id.as_str(), status = %detail.status, "detail status");

        render_detail(
            &detail,
            &mut self.reviews.borrow_mut(),
            &mut self.photos.borrow_mut(),
        );

        let applied = Applied::Rendered {
            id: request.id.clone(),
            reviews: detail.reviews.len(),
            photos: detail.photos.len(),
        };
        debug!(?applied, "rendered details");
        self.shown = Some((request.id, detail.name));
        Ok(applied)
    }

    fn issue(&mut self, id: RestaurantId) -> DetailRequest {
        self.last_issued += 1;
        self.in_flight += 1;
        DetailRequest {
            seq: self.last_issued,
            id,
        }
    }
}
