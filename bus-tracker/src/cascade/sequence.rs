//! Per-collection sequence tokens.
//!
//! Every fetch is issued with a token. A later selection change issues a
//! newer token (or invalidates the collection outright), and a completed
//! fetch only applies if its token is still the latest for its collection.
//! Requests are never aborted; superseded results are dropped on arrival.

/// A collection the cascade fetches into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Routes,
    Directions,
    Stops,
    Vehicles,
    Predictions,
    Location,
}

impl Collection {
    const COUNT: usize = 6;

    fn index(self) -> usize {
        match self {
            Collection::Routes => 0,
            Collection::Directions => 1,
            Collection::Stops => 2,
            Collection::Vehicles => 3,
            Collection::Predictions => 4,
            Collection::Location => 5,
        }
    }
}

/// Identifies one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchToken {
    collection: Collection,
    seq: u64,
}

impl FetchToken {
    pub fn collection(&self) -> Collection {
        self.collection
    }
}

/// Latest issued sequence number for each collection.
#[derive(Debug, Default)]
pub struct TokenLedger {
    latest: [u64; Collection::COUNT],
}

impl TokenLedger {
    /// Issue a token for a new fetch, superseding any pending one.
    pub fn issue(&mut self, collection: Collection) -> FetchToken {
        let slot = &mut self.latest[collection.index()];
        *slot += 1;
        FetchToken {
            collection,
            seq: *slot,
        }
    }

    /// Supersede any pending fetch without issuing a new one.
    pub fn invalidate(&mut self, collection: Collection) {
        self.latest[collection.index()] += 1;
    }

    /// Whether `token` is still the latest for its collection.
    pub fn is_current(&self, token: FetchToken) -> bool {
        self.latest[token.collection.index()] == token.seq
    }
}
