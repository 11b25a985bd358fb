use async_trait::async_trait;
use uuid::Uuid;

/// Trait for generating player identifiers
#[async_trait]
pub trait UuidGenerator: Send + Sync {
    async fn generate(&self) -> String;
}

/// UUID v4 based identifier generator
pub struct DefaultUuidGenerator;

impl DefaultUuidGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DefaultUuidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UuidGenerator for DefaultUuidGenerator {
    async fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Trait for generating usernames
#[async_trait]
pub trait UsernameGenerator: Send + Sync {
    async fn generate(&self) -> String;
}

/// Pet name-based username generator
pub struct PetNameUsernameGenerator;

impl PetNameUsernameGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PetNameUsernameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsernameGenerator for PetNameUsernameGenerator {
    async fn generate(&self) -> String {
        petname::Petnames::default().generate_one(2, "-")
    }
}
