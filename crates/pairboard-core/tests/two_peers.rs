//! Two whiteboards syncing over an in-memory channel.

use kurbo::{Point, Size};
use pairboard_core::{
    ChannelError, Element, EventChannel, PointerEvent, MouseButton, SyncAdapter, SyncMessage,
    Tool, Whiteboard,
};
use std::cell::RefCell;
use std::rc::Rc;

type Queue = Rc<RefCell<Vec<SyncMessage>>>;

/// In-memory stand-in for the session's pub/sub side-channel: sends
/// land in a shared outbox, polls drain an inbox another peer fills.
struct LoopbackChannel {
    outbox: Queue,
    inbox: Queue,
}

impl EventChannel for LoopbackChannel {
    fn send(&mut self, message: &SyncMessage) -> Result<(), ChannelError> {
        self.outbox.borrow_mut().push(message.clone());
        Ok(())
    }

    fn poll(&mut self) -> Vec<SyncMessage> {
        std::mem::take(&mut *self.inbox.borrow_mut())
    }
}

struct Peer {
    board: Whiteboard,
    adapter: SyncAdapter<LoopbackChannel>,
    outbox: Queue,
    inbox: Queue,
}

impl Peer {
    fn new(is_host: bool) -> Self {
        let outbox: Queue = Rc::new(RefCell::new(Vec::new()));
        let inbox: Queue = Rc::new(RefCell::new(Vec::new()));
        Self {
            board: Whiteboard::new(Size::new(800.0, 600.0)).with_host_role(is_host),
            adapter: SyncAdapter::new(LoopbackChannel {
                outbox: outbox.clone(),
                inbox: inbox.clone(),
            }),
            outbox,
            inbox,
        }
    }

    /// Deliver everything this peer has sent to another peer.
    fn drain_into(&mut self, other: &mut Peer) {
        other
            .inbox
            .borrow_mut()
            .extend(self.outbox.borrow_mut().drain(..));
        other.adapter.pump(&mut other.board.store);
    }

    fn draw(&mut self, tool: Tool, path: &[(f64, f64)]) {
        self.board.set_tool(tool);
        let mut points = path.iter();
        let (x, y) = points.next().expect("path needs a start point");
        let down = self.board.handle_pointer(PointerEvent::Down {
            position: Point::new(*x, *y),
            button: MouseButton::Left,
        });
        assert!(down.is_none());
        let mut last = Point::new(*x, *y);
        for (x, y) in points {
            last = Point::new(*x, *y);
            self.board.handle_pointer(PointerEvent::Move { position: last });
        }
        let up = self.board.handle_pointer(PointerEvent::Up {
            position: last,
            button: MouseButton::Left,
        });
        if let Some(message) = up {
            self.adapter.broadcast(&message);
        }
    }
}

#[test]
fn backwards_rectangle_replicates_normalized() {
    let mut alice = Peer::new(true);
    let mut bob = Peer::new(false);

    // Drag from (10,10) up-left to (5,5).
    alice.draw(Tool::Rectangle, &[(10.0, 10.0), (5.0, 5.0)]);
    alice.drain_into(&mut bob);

    assert_eq!(bob.board.store.len(), 1);
    let Element::Rectangle(rect) = &bob.board.store.elements()[0] else {
        panic!("expected rectangle");
    };
    assert_eq!(rect.p1, Point::new(5.0, 5.0));
    assert_eq!(rect.p2, Point::new(10.0, 10.0));

    // Local and remote copies agree.
    let Element::Rectangle(local) = &alice.board.store.elements()[0] else {
        panic!("expected rectangle");
    };
    assert_eq!(local.p1, rect.p1);
    assert_eq!(local.p2, rect.p2);
}

#[test]
fn long_pencil_stroke_arrives_thinned() {
    let mut alice = Peer::new(true);
    let mut bob = Peer::new(false);

    let path: Vec<(f64, f64)> = (0..200)
        .map(|i| (i as f64, (i as f64 / 7.0).sin() * 40.0))
        .collect();
    alice.draw(Tool::Pencil, &path);

    // The full-resolution stroke stays local.
    let local = {
        let Element::Freehand(local) = &alice.board.store.elements()[0] else {
            panic!("expected stroke");
        };
        local.clone()
    };
    assert_eq!(local.len(), 200);

    alice.drain_into(&mut bob);
    let Element::Freehand(remote) = &bob.board.store.elements()[0] else {
        panic!("expected stroke");
    };
    assert!(remote.len() <= 60, "got {} points", remote.len());
    assert_eq!(remote.points[0], local.points[0]);
    // Endpoints survive thinning; rounding keeps one decimal.
    let last_local = local.points[local.len() - 1];
    let last_remote = remote.points[remote.len() - 1];
    assert!((last_remote.x - last_local.x).abs() <= 0.05);
    assert!((last_remote.y - last_local.y).abs() <= 0.05);
}

#[test]
fn repeated_delivery_is_idempotent() {
    let mut alice = Peer::new(true);
    let mut bob = Peer::new(false);

    alice.draw(Tool::Circle, &[(0.0, 0.0), (30.0, 30.0)]);
    let messages: Vec<SyncMessage> = alice.outbox.borrow().clone();
    alice.drain_into(&mut bob);
    // The channel redelivers the same upsert.
    for message in messages {
        bob.adapter.apply(message, &mut bob.board.store);
    }
    assert_eq!(bob.board.store.len(), 1);
}

#[test]
fn host_clear_empties_every_peer() {
    let mut alice = Peer::new(true);
    let mut bob = Peer::new(false);

    alice.draw(Tool::Rectangle, &[(0.0, 0.0), (50.0, 50.0)]);
    alice.draw(Tool::Line, &[(0.0, 0.0), (100.0, 10.0)]);
    alice.drain_into(&mut bob);
    assert_eq!(bob.board.store.len(), 2);

    let clear = alice.board.clear_canvas().expect("host may clear");
    alice.adapter.broadcast(&clear);
    alice.drain_into(&mut bob);

    assert!(bob.board.store.is_empty());
    // Remote clears drop history too: redo cannot resurrect elements
    // the host no longer has.
    assert!(!bob.board.store.can_undo());
    assert!(!bob.board.store.can_redo());

    // The host's own clear stays undoable.
    alice.board.undo();
    assert_eq!(alice.board.store.len(), 2);
}

#[test]
fn receiving_peer_does_not_echo() {
    let mut alice = Peer::new(true);
    let mut bob = Peer::new(false);

    alice.draw(Tool::Rectangle, &[(0.0, 0.0), (20.0, 20.0)]);
    alice.drain_into(&mut bob);

    assert_eq!(bob.board.store.len(), 1);
    assert!(bob.outbox.borrow().is_empty());
}
