mod product;
mod upi;

pub use product::{ColorOption, NewProduct, Product, ProductField, DEFAULT_ASSURED_IMAGE};
pub use upi::{PaymentOptions, PaymentProvider, UpiConfig, UpiField};
