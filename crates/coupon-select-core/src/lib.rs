//! Runtime for the **coupon-select** terminal widgets.
//!
//! The design follows the [Elm Architecture]: state lives in a [`Model`] (or
//! a nested [`Component`]), events arrive as messages, [`Model::update`]
//! mutates state and returns a [`Command`] describing side effects, and
//! [`Model::view`] renders the current state to a [`ratatui::Frame`].
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application trait (init / update / view) |
//! | [`Component`] | Reusable sub-model that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | Describes a side effect to be executed by the runtime |
//! | [`Subscription`] | Long-lived event source (terminal events, keyboard visibility) |
//! | [`KeyboardSignals`] | Host handle publishing keyboard show/hide notifications |
//! | [`Program`] | Wires a [`Model`] to a real terminal and drives the event loop |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for unit-testing a [`Model`] |
//!
//! # Lifecycle
//!
//! 1. **init** -- [`Model::init`] creates the initial state and may return a
//!    [`Command`].
//! 2. **view** -- the runtime calls [`Model::view`] to render.
//! 3. **event** -- key presses and platform notifications arrive through
//!    [`Subscription`]s and are mapped into the model's `Message` type.
//! 4. **update** -- [`Model::update`] receives the message and returns a
//!    [`Command`].
//! 5. **reconcile** -- the runtime asks for [`Model::subscriptions`] again,
//!    starting new ones and aborting the ones no longer declared.
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod event;
pub mod model;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::Command;
pub use component::Component;
pub use event::TerminalEvent;
pub use model::Model;
pub use runtime::{log_to_file, OutputTarget, Program, ProgramError, ProgramHandle, ProgramOptions};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::{keyboard_visibility, terminal_events, KeyboardEdge, KeyboardListener, KeyboardSignals};

/// Run a model with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
