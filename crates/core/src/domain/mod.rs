// Domain Layer - Quote model

pub mod quote;

pub use quote::{Quote, QuoteId, QuotePayload, StoreId};
