mod arn;
pub(crate) mod template;

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

pub use {
    arn::ResourceArn,
    template::{default_partition, set_default_partition, ArnDefaults, ArnOverrides, ArnTemplate},
};

/// A resource in a policy statement: the wildcard `*` or a concrete ARN.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Resource {
    Any,
    Arn(ResourceArn),
}

impl Resource {
    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl FromStr for Resource {
    type Err = IamError;

    /// Parse a resource string.
    ///
    /// # Errors
    ///
    /// [IamError::UnresolvedPlaceholder] if the string still carries an ARN template placeholder such as
    /// `${QueueName}`; [IamError::InvalidResource] if it is neither `*` nor a well-formed ARN.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(Self::Any);
        }

        if template::has_unresolved_placeholder(s) {
            debug!("Resource still contains a template placeholder: {}", s);
            return Err(IamError::UnresolvedPlaceholder(s.to_string()));
        }

        Ok(Self::Arn(ResourceArn::from_str(s)?))
    }
}

impl From<ResourceArn> for Resource {
    fn from(arn: ResourceArn) -> Self {
        Self::Arn(arn)
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Any => f.write_str("*"),
            Self::Arn(arn) => f.write_str(arn.as_str()),
        }
    }
}

struct ResourceVisitor;

impl<'de> Visitor<'de> for ResourceVisitor {
    type Value = Resource;

    fn expecting(&self, f: &mut Formatter) -> FmtResult {
        f.write_str("an ARN or \"*\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Resource::from_str(v).map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(ResourceVisitor)
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
