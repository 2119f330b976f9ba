use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`] area.
///
/// A `Component` is a [`Model`](crate::Model) whose [`view`](Component::view)
/// receives the area to draw into, so a parent decides where each child
/// renders. Children report upward by returning messages; the parent wraps
/// the child's message type in one of its own variants and lifts commands
/// with [`Command::map`]:
///
/// ```rust,ignore
/// struct Checkout { picker: CouponPicker, applied: Option<ClassifiedCoupon> }
///
/// enum Msg { Picker(picker::Message) }
///
/// impl Model for Checkout {
///     // ...
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Picker(picker::Message::Selected(coupon)) => {
///                 self.picker.set_selected(Some(coupon.clone()));
///                 self.applied = Some(coupon);
///                 Command::none()
///             }
///             Msg::Picker(m) => self.picker.update(m).map(Msg::Picker),
///         }
///     }
///
///     fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///         self.picker
///             .subscriptions()
///             .into_iter()
///             .map(|sub| sub.map(Msg::Picker))
///             .collect()
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`. Implementations confine all drawing to it, except
    /// for overlays that deliberately extend past it.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Declare active subscriptions for this component.
    ///
    /// The parent collects these into its own
    /// [`Model::subscriptions`](crate::Model::subscriptions). Once the parent
    /// stops returning them (because the component was dropped or hidden),
    /// the runtime aborts them.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }

    /// Whether this component currently wants keyboard input.
    fn focused(&self) -> bool {
        false
    }
}
