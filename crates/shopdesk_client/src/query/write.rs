//! Terminal write responses.

use crate::envelope::Envelope;
use crate::error::ClientResult;
use shopdesk_store::Row;
use std::future::{ready, IntoFuture, Ready};

/// Outcome of `insert`, `upsert`, `update` or `delete`.
///
/// The write has already been dispatched when this value exists. Awaiting it
/// yields the rows the store handed back. `select()` and `single()` are
/// identity continuations over the same outcome.
#[must_use = "a write response carries the outcome of the write"]
#[derive(Debug, Clone, PartialEq)]
pub struct WriteResponse {
    envelope: Envelope<Vec<Row>>,
}

impl WriteResponse {
    pub(crate) fn from_result(result: ClientResult<Vec<Row>>) -> Self {
        Self {
            envelope: result.into(),
        }
    }

    /// Identity continuation.
    pub fn select(self) -> Self {
        self
    }

    /// Identity continuation.
    pub fn single(self) -> Self {
        self
    }

    /// Borrows the outcome without awaiting.
    pub fn envelope(&self) -> &Envelope<Vec<Row>> {
        &self.envelope
    }

    /// Takes the outcome without awaiting.
    pub fn into_envelope(self) -> Envelope<Vec<Row>> {
        self.envelope
    }
}

impl IntoFuture for WriteResponse {
    type Output = Envelope<Vec<Row>>;
    type IntoFuture = Ready<Envelope<Vec<Row>>>;

    fn into_future(self) -> Self::IntoFuture {
        ready(self.envelope)
    }
}
