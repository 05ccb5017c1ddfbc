//! State-change events and the listener registry.
//!
//! [`ViewerSession`](crate::ViewerSession) emits one [`ViewerEvent`] after
//! each mutation. Listeners are plain closures run synchronously, in
//! registration order, on the thread that made the change.

use pixelscope_core::{Rect, SampleKind};
use pixelscope_ops::{BrightnessParams, ChannelSelection};

/// Something about the session changed.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    /// An image was appended to the list.
    ImageAdded {
        /// Position in the image list.
        index: usize,
        /// Display name.
        name: String,
    },

    /// A different image became current (or none is current).
    ImageChanged {
        /// New current index.
        index: Option<usize>,
    },

    /// An image was removed from the list.
    ImageClosed {
        /// Position it had.
        index: usize,
    },

    /// Scale or scroll changed.
    ViewportChanged {
        /// New scale.
        scale: f64,
        /// New horizontal scroll.
        scroll_x: i64,
        /// New vertical scroll.
        scroll_y: i64,
    },

    /// The fit toggle flipped.
    FitToggled {
        /// `true` when the view is now fitted.
        at_fit: bool,
    },

    /// Brightness parameters changed for a sample kind.
    BrightnessChanged {
        /// Which kind the params apply to.
        kind: SampleKind,
        /// The new params.
        params: BrightnessParams,
    },

    /// Channel visibility or colours changed.
    ChannelsChanged {
        /// Visibility flags after the change.
        selection: ChannelSelection,
    },

    /// The current image's bit shift changed.
    BitShiftChanged {
        /// Accumulated shift.
        shift: i32,
    },

    /// The region of interest changed.
    RoiChanged {
        /// New ROI in image coordinates, `None` when cleared.
        roi: Option<Rect>,
    },
}

/// Handle returned by [`Listeners::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&ViewerEvent)>;

/// Ordered set of event callbacks.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Callback)>,
}

impl Listeners {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback`; it runs for every later event.
    pub fn subscribe<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&ViewerEvent) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Calls every listener with `event`.
    pub fn emit(&mut self, event: &ViewerEvent) {
        for (_, callback) in &mut self.entries {
            callback(event);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners").field("count", &self.entries.len()).finish()
    }
}
