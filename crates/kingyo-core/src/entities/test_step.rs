use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One ordered action / expected-result pair of a test case.
///
/// `order` is 1-based and contiguous within a case. Steps are replaced in bulk,
/// never patched one by one.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestStep {
    pub id: u64,
    pub case: u64,
    pub order: u32,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub expected_result: String,
}
