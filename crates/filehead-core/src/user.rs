//! Acting-user identity

/// Supplies the name of the user on whose behalf operations run.
///
/// Used for lock ownership and as the reported author of items.
pub trait CurrentUser: Send + Sync + std::fmt::Debug {
    fn username(&self) -> String;
}

/// A fixed user name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticUser(String);

impl StaticUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl CurrentUser for StaticUser {
    fn username(&self) -> String {
        self.0.clone()
    }
}

/// The operating system login of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUser;

impl CurrentUser for SystemUser {
    fn username(&self) -> String {
        whoami::username()
    }
}
