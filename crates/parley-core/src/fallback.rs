//! Deterministic substitute reply for provider outages.
//!
//! Lets the orchestrator answer every accepted user message even when the
//! completion provider cannot be reached.

/// Stateless fallback reply generator.
pub struct FallbackSynthesizer;

impl FallbackSynthesizer {
    /// Build the fallback reply for `user_text`.
    ///
    /// Pure function of its input: states that the provider is unavailable,
    /// echoes the user's text verbatim, and says live data is out of reach.
    pub fn synthesize(user_text: &str) -> String {
        format!(
            "The external AI service is currently unavailable, but I received your message: \
             \"{user_text}\". I can't access live external data like real-time weather, \
             but I can still respond and keep the conversation going."
        )
    }
}
