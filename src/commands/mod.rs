//! The Command Surface (§4.4): one thin method per legacy command, each
//! normalizing its key, running the Parameter Translator, calling the
//! single best native method, then running the Result Translator.
//!
//! Every function here is generic over [`Driver`] rather than tied to
//! [`crate::client::Client`] directly, so the exact same translation path
//! serves both direct calls and buffered pipeline/transaction replay
//! (§4.5/§9: "a batch object maps entries one-to-one"): `fred`'s own
//! `Client`, `Pipeline`, and `Transaction` types all implement its command
//! interface traits over any `ClientLike`, so a pipeline or transaction is
//! just another `Driver`.

use fred::interfaces::ClientLike;

pub mod bitops;
pub mod geo;
pub mod hashes;
pub mod hyperloglog;
pub mod keys;
pub mod lists;
pub mod params;
pub mod raw;
pub mod results;
pub mod server;
pub mod sets;
pub mod sorted_sets;
pub mod streams;
pub mod strings;

/// Anything the command surface can dispatch against: a connected client, a
/// buffered pipeline, or a buffered transaction. Mirrors the
/// "capability-set trait" option of §9's cluster-vs-standalone note, applied
/// instead to the pipeline/transaction/direct-call polymorphism.
pub trait Driver: ClientLike + Send + Sync {}
impl<T> Driver for T where T: ClientLike + Send + Sync {}
