//! Sync transport adapter for the external real-time channel.
//!
//! Translates finished local mutations into outbound channel messages
//! and applies inbound messages from remote peers to the local store.
//! Sync is best-effort: a send failure is logged and dropped, and a
//! peer that misses a broadcast reconciles only on the next upsert of
//! the same element.

use crate::elements::Element;
use crate::store::ElementStore;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of points a freehand stroke may carry on the wire.
/// Strokes above the cap are thinned before transmission.
pub const MAX_SYNC_POINTS: usize = 60;

/// Approximate payload ceiling of the channel, in bytes.
pub const PAYLOAD_LIMIT: usize = 2048;

/// Errors surfaced by a channel implementation. These never propagate
/// past the adapter.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("send failed: {0}")]
    Send(String),
    #[error("channel closed")]
    Closed,
}

/// Whether an element upsert introduces or revises the element.
/// Receivers treat both the same way (add-or-replace by id); the
/// distinction is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Add,
    Update,
}

/// Messages exchanged between peers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SyncMessage {
    /// Add-or-replace one element by id.
    #[serde(rename = "wb_element")]
    Element {
        action: UpsertAction,
        element: Element,
    },
    /// Drop every element and the whole history.
    #[serde(rename = "wb_clear")]
    Clear,
}

impl SyncMessage {
    pub fn add(element: Element) -> Self {
        SyncMessage::Element {
            action: UpsertAction::Add,
            element,
        }
    }

    pub fn update(element: Element) -> Self {
        SyncMessage::Element {
            action: UpsertAction::Update,
            element,
        }
    }
}

/// The external pub/sub channel, reduced to what the whiteboard
/// needs: send one message, and hand over whatever arrived since the
/// last poll. Implementations wrap the session's real-time transport.
pub trait EventChannel {
    fn send(&mut self, message: &SyncMessage) -> Result<(), ChannelError>;

    /// Drain inbound messages received since the last poll. Channels
    /// that deliver through another path may leave this empty and let
    /// the host call [`SyncAdapter::apply`] directly.
    fn poll(&mut self) -> Vec<SyncMessage> {
        Vec::new()
    }
}

/// Bridges the element store and the event channel.
///
/// Inbound application runs entirely inside [`SyncAdapter::apply`] and
/// never re-enters the broadcast path, so a peer cannot echo a
/// mutation back to its originator. The `applying_remote` tag guards
/// the door for hosts that drive broadcasts from store-change hooks.
#[derive(Debug)]
pub struct SyncAdapter<C> {
    channel: C,
    applying_remote: bool,
}

impl<C: EventChannel> SyncAdapter<C> {
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            applying_remote: false,
        }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// True while an inbound message is being applied.
    pub fn is_applying_remote(&self) -> bool {
        self.applying_remote
    }

    /// Send a message to remote peers, applying the wire transforms:
    /// image elements are dropped entirely (their payload would blow
    /// the channel's size ceiling), oversized freehand strokes are
    /// thinned, and all coordinates are rounded to one decimal place.
    pub fn broadcast(&mut self, message: &SyncMessage) {
        if self.applying_remote {
            return;
        }

        let prepared = match message {
            SyncMessage::Element { action, element } => {
                if element.is_image() {
                    log::debug!("not broadcasting image element {}", element.id());
                    return;
                }
                SyncMessage::Element {
                    action: *action,
                    element: prepare_for_wire(element),
                }
            }
            SyncMessage::Clear => SyncMessage::Clear,
        };

        if let Ok(json) = serde_json::to_string(&prepared) {
            if json.len() > PAYLOAD_LIMIT {
                log::warn!(
                    "sync payload is {} bytes, over the {} byte channel limit",
                    json.len(),
                    PAYLOAD_LIMIT
                );
            }
        }

        if let Err(err) = self.channel.send(&prepared) {
            // Best-effort sync: the update is simply lost.
            log::warn!("whiteboard sync send failed: {err}");
        }
    }

    /// Poll the channel and apply every waiting inbound message.
    /// Returns how many were applied.
    pub fn pump(&mut self, store: &mut ElementStore) -> usize {
        let inbound = self.channel.poll();
        let count = inbound.len();
        for message in inbound {
            self.apply(message, store);
        }
        count
    }

    /// Apply an inbound message from a remote peer to the local store.
    pub fn apply(&mut self, message: SyncMessage, store: &mut ElementStore) {
        self.applying_remote = true;
        match message {
            SyncMessage::Element { action, element } => {
                log::debug!(
                    "applying remote {:?} of {} {}",
                    action,
                    element.kind_name(),
                    element.id()
                );
                store.upsert(element);
            }
            SyncMessage::Clear => {
                log::debug!("applying remote clear");
                store.reset();
            }
        }
        self.applying_remote = false;
    }
}

/// Clone an element with the wire transforms applied.
fn prepare_for_wire(element: &Element) -> Element {
    let mut wire = element.clone();
    if let Element::Freehand(stroke) = &mut wire {
        if stroke.points.len() > MAX_SYNC_POINTS {
            stroke.points = thin_points(&stroke.points, MAX_SYNC_POINTS);
        }
    }
    wire.map_points(|p| Point::new(round1(p.x), round1(p.y)));
    wire
}

/// Round a coordinate to one decimal place.
fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Deterministic point thinning: keep every Nth point with
/// `N = ceil(len / cap)`, always retaining the original first and last
/// point. The result never exceeds `cap` points.
pub fn thin_points(points: &[Point], cap: usize) -> Vec<Point> {
    if cap < 2 || points.len() <= cap {
        return points.to_vec();
    }

    let step = points.len().div_ceil(cap);
    let mut kept: Vec<Point> = points.iter().copied().step_by(step).collect();
    // The stride may step over the final point; replace the last
    // sample so the stroke still ends where the user ended it.
    if (points.len() - 1) % step != 0 {
        if let (Some(tail), Some(last)) = (kept.last_mut(), points.last()) {
            *tail = *last;
        }
    }
    kept
}
