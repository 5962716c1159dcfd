//! Collaborator traits (ports)

pub mod user_directory;
pub mod credential_verifier;

pub use user_directory::UserDirectory;
pub use credential_verifier::CredentialVerifier;

#[cfg(test)]
pub use credential_verifier::MockCredentialVerifier;
#[cfg(test)]
pub use user_directory::MockUserDirectory;
