// Labor-market proxy: fronts the France Travail partner API behind one
// client-credentials identity with a single cached access token.
// No other module talks to the identity provider or the partner API.

pub mod endpoints;
pub mod handlers;
pub mod proxy;
pub mod token_acquirer;
pub mod token_cache;

pub use handlers::router;
pub use proxy::LaborMarketProxy;
