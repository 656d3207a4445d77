use serde::{Deserialize, Serialize};

/// Identity of a tradable instrument as the engine sees it.
///
/// `native` carries the venue's numeric contract id; `code` and `board`
/// are the normalized symbol and board codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecurityId {
    pub code: String,
    pub board: String,
    pub native: i64,
    pub isin: String,
}
