pub mod billing;
pub mod paypal;

pub use billing::BillingService;
pub use paypal::PayPalClient;
