//! Quotation pricing module for the operations team.
//!
//! Prices medical-tourism quotes (procedure, stay, transport, tourism extras)
//! in USD with client-type markup/margin rules, and stores finalized quotes.

pub mod calculators;
pub mod coerce;
pub mod defaults;
pub mod input;
pub mod models;
pub mod queries;
pub mod responses;
pub mod routes;
pub mod services;
pub mod settings;
pub mod validation;

// Re-export commonly used items
pub use calculators::{calculate_quote, round_money, PricingError};
pub use defaults::build_default_quote_input;
pub use input::QuoteInput;
pub use responses::{QuoteComputed, QuoteSummary};
pub use routes::router;
pub use settings::{ClientType, PricingSettings, PricingSettingsInput};
pub use validation::{validate_quote_input, FieldError};
