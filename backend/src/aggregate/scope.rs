//! Region scopes and their string tokens
//!
//! | Scope             | Token        |
//! |-------------------|--------------|
//! | National          | `national`   |
//! | State / territory | `state:NSW`  |
//! | Single city       | `city:SYD`   |

use crate::error::SimulationError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Scope {
    National,
    State(String),
    City(String),
}

impl Scope {
    /// Parse a scope token
    ///
    /// # Example
    ///
    /// ```rust
    /// use housing_simulator_core_rs::aggregate::Scope;
    ///
    /// assert_eq!(Scope::parse("state:VIC").unwrap(), Scope::State("VIC".to_string()));
    /// assert!(Scope::parse("suburb:Carlton").is_err());
    /// ```
    pub fn parse(token: &str) -> Result<Self, SimulationError> {
        let token = token.trim();
        if token == "national" {
            return Ok(Scope::National);
        }
        match token.split_once(':') {
            Some(("state", code)) if !code.is_empty() => Ok(Scope::State(code.to_string())),
            Some(("city", id)) if !id.is_empty() => Ok(Scope::City(id.to_string())),
            _ => Err(SimulationError::ScopeNotFound(token.to_string())),
        }
    }

    pub fn token(&self) -> String {
        self.to_string()
    }

    /// Human-readable label
    pub fn label(&self) -> String {
        match self {
            Scope::National => "National".to_string(),
            Scope::State(code) => format!("State {}", code),
            Scope::City(id) => format!("City {}", id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::National => write!(f, "national"),
            Scope::State(code) => write!(f, "state:{}", code),
            Scope::City(id) => write!(f, "city:{}", id),
        }
    }
}

impl TryFrom<String> for Scope {
    type Error = SimulationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Scope::parse(&value)
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        for token in ["national", "state:NSW", "city:SYD"] {
            assert_eq!(Scope::parse(token).unwrap().token(), token);
        }
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert!(Scope::parse("state:").is_err());
        assert!(Scope::parse("nation").is_err());
        assert!(matches!(
            Scope::parse("region:x"),
            Err(SimulationError::ScopeNotFound(_))
        ));
    }

    #[test]
    fn test_scope_serializes_as_token() {
        let json = serde_json::to_string(&Scope::City("MEL".to_string())).unwrap();
        assert_eq!(json, "\"city:MEL\"");
    }
}
