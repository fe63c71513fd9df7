//! Terminal front-end: key decoding, the view state machine and painting.

mod app;
mod confirm;
mod filter;
mod forms;
mod helpers;
mod input;
mod render;
mod terminal;

pub use app::{
    Controller, Outcome, ScheduledReturn, SessionState, StatusKind, StatusMessage, View,
    MAIN_MENU,
};
pub use confirm::{Choice, PendingAction};
pub use filter::{filter_records, matches};
pub use forms::{steps_for, FormStep, ValueKind, CUSTOMER_STEPS, PRODUCT_STEPS};
pub use input::{decode, from_key_event, LogicalKey};
pub use render::draw;
pub use terminal::run_app;
