pub mod classifier; // Remote classifier collaborator
pub mod normalize; // Diagnostic response normalizer
pub mod upload; // Upload validation
