use {
    crate::IamError,
    log::debug,
    serde::{
        de::{self, Deserializer, Unexpected, Visitor},
        ser::Serializer,
        Deserialize, Serialize,
    },
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// An action in a policy statement: either the wildcard `*` or `service:ActionName`.
///
/// Action names may contain the IAM wildcards `*` and `?` (e.g. `s3:Get*`). Whether the action actually exists in
/// the service is not checked; the service catalogue is advisory.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Action {
    Any,
    Specific {
        service: String,
        action: String,
    },
}

impl Action {
    pub fn new<S: Into<String>, A: Into<String>>(service: S, action: A) -> Result<Self, IamError> {
        let service = service.into();
        let action = action.into();

        if !is_valid_service_prefix(&service) {
            debug!("Action '{service}:{action}' has an invalid service prefix.");
            return Err(IamError::InvalidAction(format!("{}:{}", service, action)));
        }

        if action.is_empty() || !action.is_ascii() {
            debug!("Action '{service}:{action}' has an empty or non-ASCII name.");
            return Err(IamError::InvalidAction(format!("{}:{}", service, action)));
        }

        for (i, c) in action.bytes().enumerate() {
            let inner = i > 0 && i < action.len() - 1;
            if !c.is_ascii_alphanumeric() && c != b'*' && c != b'?' && !(inner && (c == b'-' || c == b'_')) {
                debug!("Action '{service}:{action}' has an invalid action name.");
                return Err(IamError::InvalidAction(format!("{}:{}", service, action)));
            }
        }

        Ok(Action::Specific {
            service,
            action,
        })
    }

    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    #[inline]
    pub fn service(&self) -> &str {
        match self {
            Self::Any => "*",
            Self::Specific {
                service,
                ..
            } => service,
        }
    }

    #[inline]
    pub fn action(&self) -> &str {
        match self {
            Self::Any => "*",
            Self::Specific {
                action,
                ..
            } => action,
        }
    }
}

/// Service prefixes are lowercase-ish ASCII identifiers; `-` and `_` are allowed only in the interior.
pub(crate) fn is_valid_service_prefix(service: &str) -> bool {
    if service.is_empty() || !service.is_ascii() {
        return false;
    }

    service.bytes().enumerate().all(|(i, c)| {
        c.is_ascii_alphanumeric() || (i > 0 && i < service.len() - 1 && (c == b'-' || c == b'_'))
    })
}

impl FromStr for Action {
    type Err = IamError;

    fn from_str(v: &str) -> Result<Self, Self::Err> {
        if v == "*" {
            return Ok(Self::Any);
        }

        match v.split_once(':') {
            Some((service, action)) if !action.contains(':') => Action::new(service, action),
            _ => {
                debug!("Action '{v}' is not of the form service:action.");
                Err(IamError::InvalidAction(v.to_string()))
            }
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Any => f.write_str("*"),
            Self::Specific {
                service,
                action,
            } => write!(f, "{}:{}", service, action),
        }
    }
}

struct ActionVisitor;

impl<'de> Visitor<'de> for ActionVisitor {
    type Value = Action;

    fn expecting(&self, f: &mut Formatter) -> FmtResult {
        f.write_str("service:action or \"*\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Action::from_str(v).map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(ActionVisitor)
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The coarse classification AWS assigns to every action.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum AccessLevel {
    List,
    Read,
    Write,
    PermissionsManagement,
    Tagging,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "List",
            Self::Read => "Read",
            Self::Write => "Write",
            Self::PermissionsManagement => "Permissions management",
            Self::Tagging => "Tagging",
        }
    }
}

impl Display for AccessLevel {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = IamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "List" => Ok(Self::List),
            "Read" => Ok(Self::Read),
            "Write" => Ok(Self::Write),
            // The older catalogue generation spelled this without the space.
            "Permissions management" | "PermissionsManagement" => Ok(Self::PermissionsManagement),
            "Tagging" => Ok(Self::Tagging),
            _ => Err(IamError::InvalidAccessLevel(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for AccessLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        AccessLevel::from_str(&s).map_err(de::Error::custom)
    }
}

impl Serialize for AccessLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
