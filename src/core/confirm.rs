// Confirmation
// Yes/no decision point between planning and execution

use anyhow::Result;

/// Asks whether to go ahead with a batch of operations
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Answers every prompt with a fixed value
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}
