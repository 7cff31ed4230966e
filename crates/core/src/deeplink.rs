//! In-app deep links, e.g. the `app://challenge?month=5` link sent with a
//! challenge reminder.

use std::fmt;

use url::Url;

use crate::constants::DEEP_LINK_SCHEME;
use crate::errors::{Error, Result, ValidationError};

/// A screen the app can be opened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeepLink {
    /// Ranking of the given month (1..=12) of the current year.
    Challenge { month: u32 },
}

impl DeepLink {
    pub fn parse(uri: &str) -> Result<Self> {
        let url = Url::parse(uri.trim())?;
        if url.scheme() != DEEP_LINK_SCHEME {
            return Err(invalid_link(format!("unsupported scheme '{}'", url.scheme())));
        }

        match url.host_str() {
            Some("challenge") => {
                let month = url
                    .query_pairs()
                    .find(|(key, _)| key == "month")
                    .map(|(_, value)| value.into_owned())
                    .ok_or_else(|| {
                        Error::Validation(ValidationError::MissingField("month".to_string()))
                    })?;
                let month: u32 = month
                    .parse()
                    .map_err(|_| invalid_link(format!("month '{}' is not a number", month)))?;
                if !(1..=12).contains(&month) {
                    return Err(Error::Validation(ValidationError::OutOfRange {
                        field: "month".to_string(),
                        min: 1,
                        max: 12,
                    }));
                }
                Ok(DeepLink::Challenge { month })
            }
            Some(other) => Err(invalid_link(format!("unknown destination '{}'", other))),
            None => Err(invalid_link("missing destination".to_string())),
        }
    }

    pub fn to_uri(&self) -> String {
        match self {
            DeepLink::Challenge { month } => {
                format!("{}://challenge?month={}", DEEP_LINK_SCHEME, month)
            }
        }
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}

fn invalid_link(msg: String) -> Error {
    Error::Validation(ValidationError::InvalidLink(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_challenge_link() {
        assert_eq!(
            DeepLink::parse("app://challenge?month=5").unwrap(),
            DeepLink::Challenge { month: 5 }
        );
        assert_eq!(
            DeepLink::parse("app://challenge?ref=push&month=12").unwrap(),
            DeepLink::Challenge { month: 12 }
        );
    }

    #[test]
    fn test_rejects_bad_links() {
        for uri in [
            "https://challenge?month=5",
            "app://ranking?month=5",
            "app://challenge",
            "app://challenge?month=13",
            "app://challenge?month=0",
            "app://challenge?month=may",
            "not a link",
        ] {
            assert!(
                matches!(DeepLink::parse(uri), Err(Error::Validation(_))),
                "{} should be rejected",
                uri
            );
        }
    }

    #[test]
    fn test_to_uri() {
        let link = DeepLink::Challenge { month: 3 };
        assert_eq!(link.to_uri(), "app://challenge?month=3");
        assert_eq!(DeepLink::parse(&link.to_string()).unwrap(), link);
    }
}
