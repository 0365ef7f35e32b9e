use {
    crate::{display_json, from_str_json, serutil::OneOrMany, IamError, PolicyStatement, Statement},
    derive_builder::Builder,
    serde::{
        de,
        de::{Deserializer, MapAccess, Visitor},
        ser::{SerializeMap, Serializer},
        Deserialize, Serialize,
    },
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// Policy versions.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PolicyVersion {
    None,
    V2008_10_17,
    V2012_10_17,
}

impl PolicyVersion {
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    #[inline]
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }
}

impl Default for PolicyVersion {
    fn default() -> Self {
        Self::None
    }
}

impl Display for PolicyVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::None => Ok(()),
            Self::V2008_10_17 => f.write_str("2008-10-17"),
            Self::V2012_10_17 => f.write_str("2012-10-17"),
        }
    }
}

impl<'de> Deserialize<'de> for PolicyVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        match PolicyVersion::from_str(&value) {
            Ok(v) => Ok(v),
            Err(e) => Err(serde::de::Error::custom(e)),
        }
    }
}

impl FromStr for PolicyVersion {
    type Err = IamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2008-10-17" => Ok(Self::V2008_10_17),
            "2012-10-17" => Ok(Self::V2012_10_17),
            _ => Err(IamError::InvalidPolicyVersion(s.to_string())),
        }
    }
}

impl Serialize for PolicyVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// A policy document: a version, an optional id, and the statements.
///
/// This does not directly derive Deserialize/Serialize to prevent serde from allowing this to be represented as an
/// array.
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
pub struct Policy {
    /// The policy language version. Policy variables such as `${aws:username}` require `2012-10-17`. If omitted,
    /// AWS treats the policy as `2008-10-17`.
    #[builder(setter(into, strip_option), default)]
    version: PolicyVersion,

    /// An optional identifier for the policy.
    #[builder(setter(into, strip_option), default)]
    id: Option<String>,

    /// The statements. When parsing, a single statement object is accepted in place of a list.
    #[builder(setter(into))]
    statement: Vec<Statement>,
}

impl Policy {
    #[inline]
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    /// A `2012-10-17` policy holding the given statements in order.
    pub fn from_statements<I>(statements: I) -> Self
    where
        I: IntoIterator<Item = Statement>,
    {
        Self {
            version: PolicyVersion::V2012_10_17,
            id: None,
            statement: statements.into_iter().collect(),
        }
    }

    pub fn version(&self) -> PolicyVersion {
        self.version
    }

    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[inline]
    pub fn statement(&self) -> &[Statement] {
        &self.statement
    }
}

impl<'a> FromIterator<&'a PolicyStatement> for Policy {
    fn from_iter<I: IntoIterator<Item = &'a PolicyStatement>>(iter: I) -> Self {
        Self::from_statements(iter.into_iter().map(PolicyStatement::to_statement))
    }
}

display_json!(Policy);
from_str_json!(Policy);

impl<'de> Visitor<'de> for PolicyBuilder {
    type Value = Policy;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.write_str("policy")
    }

    fn visit_map<A: MapAccess<'de>>(mut self, mut access: A) -> Result<Self::Value, A::Error> {
        let builder = &mut self;
        let mut version_seen = false;
        let mut id_seen = false;
        let mut statement_seen = false;

        while let Some(key) = access.next_key::<String>()? {
            match key.as_str() {
                "Version" => {
                    if version_seen {
                        return Err(de::Error::duplicate_field("Version"));
                    }
                    version_seen = true;
                    builder.version(access.next_value::<PolicyVersion>()?);
                }
                "Id" => {
                    if id_seen {
                        return Err(de::Error::duplicate_field("Id"));
                    }
                    id_seen = true;
                    builder.id(access.next_value::<String>()?);
                }
                "Statement" => {
                    if statement_seen {
                        return Err(de::Error::duplicate_field("Statement"));
                    }
                    statement_seen = true;
                    builder.statement(access.next_value::<OneOrMany<Statement>>()?.0);
                }
                _ => return Err(de::Error::unknown_field(&key, &["Version", "Id", "Statement"])),
            }
        }

        if !statement_seen {
            return Err(de::Error::missing_field("Statement"));
        }

        self.build().map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Policy {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Policy, D::Error> {
        d.deserialize_map(PolicyBuilder::default())
    }
}

impl Serialize for Policy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(None)?;
        if self.version.is_some() {
            state.serialize_entry("Version", &self.version)?;
        }
        if let Some(id) = &self.id {
            state.serialize_entry("Id", id)?;
        }
        state.serialize_entry("Statement", &self.statement)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::{Action, Effect, IamError, Policy, PolicyStatement, PolicyVersion},
        indoc::indoc,
        pretty_assertions::{assert_eq, assert_ne},
        std::{
            collections::hash_map::DefaultHasher,
            hash::{Hash, Hasher},
            str::FromStr,
        },
    };

    #[test_log::test]
    fn test_typical_policy_import() {
        let policy_str = indoc! { r#"
        {
            "Version": "2012-10-17",
            "Id": "PolicyId",
            "Statement": [
                {
                    "Sid": "1",
                    "Effect": "Allow",
                    "Action": [
                        "sqs:Get*",
                        "sqs:SendMessage"
                    ],
                    "Resource": [
                        "*"
                    ],
                    "Condition": {
                        "StringEquals": {
                            "aws:RequestedRegion": [
                                "us-west-2",
                                "us-east-1"
                            ]
                        }
                    }
                },
                {
                    "Sid": "2",
                    "Effect": "Deny",
                    "NotAction": [
                        "sqs:ReceiveMessage"
                    ],
                    "Resource": [
                        "arn:aws:sqs:us-east-1:123456789012:MyQueue"
                    ]
                }
            ]
        }"# };
        let policy = Policy::from_str(policy_str).unwrap();

        assert_eq!(policy.version(), PolicyVersion::V2012_10_17);
        assert_eq!(policy.id(), Some("PolicyId"));
        assert_eq!(policy.statement().len(), 2);

        let s = &policy.statement()[0];
        assert_eq!(s.effect(), Effect::Allow);
        assert_eq!(s.action().unwrap()[0], Action::new("sqs", "Get*").unwrap());
        assert!(s.condition().is_some());

        let s = &policy.statement()[1];
        assert_eq!(s.effect(), Effect::Deny);
        assert!(s.action().is_none());
        assert_eq!(s.not_action().unwrap().len(), 1);

        assert_eq!(policy.to_string(), policy_str);
    }

    #[test_log::test]
    fn test_single_statement() {
        let policy = Policy::from_str(indoc! { r#"
            {
                "Statement": {
                    "Effect": "Allow",
                    "Action": "sqs:SendMessage",
                    "Resource": "*"
                }
            }"# })
        .unwrap();

        assert_eq!(policy.version(), PolicyVersion::None);
        assert_eq!(policy.statement().len(), 1);
        assert_eq!(
            policy.to_string(),
            indoc! { r#"
                {
                    "Statement": [
                        {
                            "Effect": "Allow",
                            "Action": [
                                "sqs:SendMessage"
                            ],
                            "Resource": [
                                "*"
                            ]
                        }
                    ]
                }"# }
        );
    }

    #[test_log::test]
    fn test_from_builders() {
        let mut send = PolicyStatement::for_service_prefix("sqs").unwrap();
        send.sid("Send").to("SendMessage").unwrap();

        let mut deny = PolicyStatement::for_service_prefix("cloud9").unwrap();
        deny.deny().sid("NoDelete").to("DeleteEnvironment").unwrap();

        let policy: Policy = [&send, &deny].into_iter().collect();
        assert_eq!(policy.version(), PolicyVersion::V2012_10_17);
        assert_eq!(policy.statement().len(), 2);
        assert_eq!(policy.statement()[1].sid(), Some("NoDelete"));

        let reparsed = Policy::from_str(&policy.to_string()).unwrap();
        assert_eq!(reparsed, policy);

        let built = Policy::builder().id("p").statement(vec![send.to_statement()]).build().unwrap();
        assert_eq!(built.version(), PolicyVersion::None);
        assert_eq!(built.id(), Some("p"));
        assert_ne!(built, policy);
    }

    #[test_log::test]
    fn test_bad_policies() {
        let e = Policy::from_str(r#"{"Version": "2012-10-17"}"#).unwrap_err();
        assert!(e.to_string().starts_with("missing field `Statement`"));

        let e = Policy::from_str(r#"{"Statement": [], "Test": true}"#).unwrap_err();
        assert!(e.to_string().starts_with("unknown field `Test`, expected one of `Version`, `Id`, `Statement`"));

        let e = Policy::from_str(r#"{"Statement": [], "Id": "a", "Id": "b"}"#).unwrap_err();
        assert!(e.to_string().starts_with("duplicate field `Id`"));

        let e = Policy::from_str(r#"{"Statement": [{"Effect": "Allow", "Action": "*"}]}"#).unwrap_err();
        assert!(e.to_string().starts_with("Either Resource or NotResource must be set"));
    }

    #[test_log::test]
    fn test_policy_version() {
        assert_eq!(PolicyVersion::default(), PolicyVersion::None);

        assert_eq!(format!("{}", PolicyVersion::None), "");
        assert_eq!(format!("{}", PolicyVersion::V2008_10_17), "2008-10-17");
        assert_eq!(format!("{}", PolicyVersion::V2012_10_17), "2012-10-17");

        let mut h1 = DefaultHasher::new();
        let mut h2 = DefaultHasher::new();
        PolicyVersion::None.hash(&mut h1);
        PolicyVersion::V2012_10_17.hash(&mut h2);
        assert_ne!(h1.finish(), h2.finish());

        assert_eq!(PolicyVersion::from_str("2008-10-17").unwrap(), PolicyVersion::V2008_10_17);
        assert_eq!(
            PolicyVersion::from_str("2012-10-18").unwrap_err(),
            IamError::InvalidPolicyVersion("2012-10-18".to_string())
        );

        let e = serde_json::from_str::<PolicyVersion>(r#""2012-10-18""#).unwrap_err();
        assert_eq!(e.to_string(), "Invalid policy version: 2012-10-18");

        let e = serde_json::from_str::<PolicyVersion>(r#"2012"#).unwrap_err();
        assert_eq!(e.to_string(), "invalid type: integer `2012`, expected a string at line 1 column 4");
    }
}
