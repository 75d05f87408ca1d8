//! The agent seam

use crate::{Context, Result};
use async_trait::async_trait;

/// Something that turns a rendered task prompt into a final answer
///
/// Tool use, if any, happens inside `process`. Crew workers are looked up
/// by [`Agent::name`], so for them it must equal the role string exactly.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn process(&self, input: String, context: &mut Context) -> Result<String>;

    fn name(&self) -> &str;
}
