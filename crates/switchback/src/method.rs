use std::fmt;
use std::str::FromStr;

use crate::error::ParseMethodError;

/// HTTP methods a route can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    /// Upper-case wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a method name case-insensitively (`"get"`, `"GET"` and `"Get"` all work).
impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(ParseMethodError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("get".parse::<Method>(), Ok(Method::Get));
        assert_eq!("Delete".parse::<Method>(), Ok(Method::Delete));
        assert_eq!("OPTIONS".parse::<Method>(), Ok(Method::Options));
    }

    #[test]
    fn test_parse_unknown_method() {
        let err = "BREW".parse::<Method>().unwrap_err();
        assert_eq!(err, ParseMethodError("BREW".to_string()));
    }

    #[test]
    fn test_display_round_trips() {
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!(Method::Patch.to_string().parse::<Method>(), Ok(Method::Patch));
    }
}
