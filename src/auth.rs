use std::str::FromStr;

use hashbrown::HashMap;

/// Decides who may open a dashboard session
pub trait Authenticator {
    fn authenticate(&self, username: &str, password: &str) -> bool;
}

/// A fixed username to password mapping
/// Passwords are kept and compared in clear text, this is a demo gate and nothing more
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    users: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(username.into(), password.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Authenticator for StaticCredentials {
    fn authenticate(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .map_or(false, |expected| expected == password)
    }
}

/// A single `user:password` pair as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl FromStr for Credential {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((username, password)) if !username.is_empty() => Ok(Self {
                username: username.to_owned(),
                password: password.to_owned(),
            }),
            _ => Err(format!("expected `user:password`, got `{}`", s)),
        }
    }
}

impl FromIterator<Credential> for StaticCredentials {
    fn from_iter<I: IntoIterator<Item = Credential>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |credentials, c| {
            credentials.with_user(c.username, c.password)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticate() {
        let credentials = StaticCredentials::new()
            .with_user("admin", "admin123")
            .with_user("viewer", "");

        assert!(credentials.authenticate("admin", "admin123"));
        assert!(credentials.authenticate("viewer", ""));
        assert!(!credentials.authenticate("admin", "wrong"));
        assert!(!credentials.authenticate("nobody", "admin123"));
        assert!(!StaticCredentials::new().authenticate("", ""));
    }

    #[test]
    fn test_parse_credential() {
        let credential: Credential = "alice:s3cr:et".parse().unwrap();
        assert_eq!(credential.username, "alice");
        assert_eq!(credential.password, "s3cr:et");

        assert!("alice".parse::<Credential>().is_err());
        assert!(":password".parse::<Credential>().is_err());
    }

    #[test]
    fn test_collect_credentials() {
        let credentials: StaticCredentials = vec!["a:1", "b:2"]
            .into_iter()
            .map(|s| s.parse::<Credential>().unwrap())
            .collect();

        assert!(credentials.authenticate("b", "2"));
        assert!(!credentials.authenticate("a", "2"));
    }
}
