//! Storefront admin core: catalog and UPI models, the REST resource client and
//! the edit/confirm/persist workflow shared by the admin list views.

pub mod client;
pub mod config;
pub mod error;
pub mod field;
pub mod gate;
pub mod list_view;
pub mod model;
pub mod resource;
pub mod session;

pub use client::{HttpResourceClient, ResourceClient};
pub use config::ClientConfig;
pub use error::{ApiError, GateError, SessionError, ValidationError};
pub use field::{EditableField, FieldKind, FieldValue};
pub use gate::{AutoApprove, ConfirmationGate, Decision, GateTicket, Prompt};
pub use list_view::{Commit, CommitOutcome, ListView, Settlement};
pub use model::{
    ColorOption, NewProduct, PaymentOptions, PaymentProvider, Product, ProductField, UpiConfig,
    UpiField,
};
pub use resource::Resource;
pub use session::{Draft, EditSession, EditState, PendingAction};
