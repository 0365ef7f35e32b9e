use {
    crate::{
        action::is_valid_service_prefix, condop, display_json, AccessLevel, Action, ArnTemplate, IamError, Operator,
    },
    log::debug,
    serde::{de, Deserialize, Deserializer, Serialize, Serializer},
    std::{
        collections::BTreeMap,
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// The data type AWS documents for a condition key.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ConditionType {
    String,
    Arn,
    Numeric,
    Date,
    Bool,
    IpAddress,
    Binary,
    ArrayOfString,
    ArrayOfArn,
    ArrayOfNumeric,
    ArrayOfDate,
    ArrayOfBool,
}

impl ConditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Arn => "ARN",
            Self::Numeric => "Numeric",
            Self::Date => "Date",
            Self::Bool => "Bool",
            Self::IpAddress => "IPAddress",
            Self::Binary => "Binary",
            Self::ArrayOfString => "ArrayOfString",
            Self::ArrayOfArn => "ArrayOfARN",
            Self::ArrayOfNumeric => "ArrayOfNumeric",
            Self::ArrayOfDate => "ArrayOfDate",
            Self::ArrayOfBool => "ArrayOfBool",
        }
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            Self::ArrayOfString | Self::ArrayOfArn | Self::ArrayOfNumeric | Self::ArrayOfDate | Self::ArrayOfBool
        )
    }

    /// The operator used for a key of this type when the caller does not name one. Multivalued keys use the same
    /// operator as their element type, unqualified.
    pub fn default_operator(&self) -> Operator {
        match self {
            Self::String | Self::ArrayOfString => condop::StringLike,
            Self::Arn | Self::ArrayOfArn => condop::ArnLike,
            Self::Numeric | Self::ArrayOfNumeric => condop::NumericEquals,
            Self::Date | Self::ArrayOfDate => condop::DateEquals,
            Self::Bool | Self::ArrayOfBool => condop::Bool,
            Self::IpAddress => condop::IpAddress,
            Self::Binary => condop::BinaryEquals,
        }
        .into()
    }
}

impl Display for ConditionType {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionType {
    type Err = IamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "String" => Ok(Self::String),
            "ARN" | "Arn" => Ok(Self::Arn),
            "Numeric" => Ok(Self::Numeric),
            "Date" => Ok(Self::Date),
            "Bool" | "Boolean" => Ok(Self::Bool),
            "IPAddress" | "IpAddress" => Ok(Self::IpAddress),
            "Binary" => Ok(Self::Binary),
            "ArrayOfString" => Ok(Self::ArrayOfString),
            "ArrayOfARN" | "ArrayOfArn" => Ok(Self::ArrayOfArn),
            "ArrayOfNumeric" => Ok(Self::ArrayOfNumeric),
            "ArrayOfDate" => Ok(Self::ArrayOfDate),
            "ArrayOfBool" | "ArrayOfBoolean" => Ok(Self::ArrayOfBool),
            _ => Err(IamError::InvalidServiceDefinition(format!("unknown condition key type {}", s))),
        }
    }
}

impl<'de> Deserialize<'de> for ConditionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ConditionType::from_str(&s).map_err(de::Error::custom)
    }
}

impl Serialize for ConditionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// How an action relates to one resource type.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeOnAction {
    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
}

/// Descriptive metadata for one action. Nothing here is consulted when a statement is built.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMetadata {
    #[serde(skip)]
    name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    access_level: AccessLevel,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    resource_types: BTreeMap<String, ResourceTypeOnAction>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    conditions: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    dependent_actions: Vec<String>,
}

impl ActionMetadata {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    #[inline]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[inline]
    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    #[inline]
    pub fn resource_types(&self) -> &BTreeMap<String, ResourceTypeOnAction> {
        &self.resource_types
    }

    #[inline]
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    #[inline]
    pub fn dependent_actions(&self) -> &[String] {
        &self.dependent_actions
    }
}

/// A resource type and the ARN template its resources follow.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,

    #[serde(serialize_with = "serialize_template")]
    arn: ArnTemplate,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    condition_keys: Vec<String>,
}

fn serialize_template<S: Serializer>(template: &ArnTemplate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(template.template())
}

impl ResourceType {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    #[inline]
    pub fn arn(&self) -> &ArnTemplate {
        &self.arn
    }

    #[inline]
    pub fn condition_keys(&self) -> &[String] {
        &self.condition_keys
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionKeyMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub condition_type: ConditionType,
}

/// Everything known about one AWS service: its actions, resource types, and condition keys.
///
/// Service definitions are loaded from JSON. Three shapes are accepted and normalized into the same value:
///
/// * an `actions` map whose entries carry their own `accessLevel` (this is also what [ServiceDefinition] serializes
///   to);
/// * an `actionList` map, optionally paired with an `accessLevelList` of `level -> [action names]`, or an
///   `accessLevelList` alone;
/// * the older generation's `actions` map, which has no `name` or `conditionKeys`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDefinition {
    name: String,
    service_prefix: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,

    actions: BTreeMap<String, ActionMetadata>,
    resource_types: BTreeMap<String, ResourceType>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    condition_keys: BTreeMap<String, ConditionKeyMetadata>,
}

display_json!(ServiceDefinition);

impl ServiceDefinition {
    /// Parse and normalize a service definition document.
    ///
    /// # Errors
    ///
    /// [IamError::InvalidServiceDefinition] if the document is not valid JSON, does not match any accepted shape, has
    /// an invalid service prefix or action name, or names an action without an access level.
    pub fn from_json(json: &str) -> Result<Self, IamError> {
        let raw: RawServiceDefinition = serde_json::from_str(json).map_err(|e| {
            debug!("Failed to parse service definition: {}", e);
            IamError::InvalidServiceDefinition(e.to_string())
        })?;

        Self::try_from(raw)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn service_prefix(&self) -> &str {
        &self.service_prefix
    }

    #[inline]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    #[inline]
    pub fn action(&self, name: &str) -> Option<&ActionMetadata> {
        self.actions.get(name)
    }

    /// All actions, ordered by name.
    #[inline]
    pub fn actions(&self) -> impl Iterator<Item = &ActionMetadata> {
        self.actions.values()
    }

    pub fn actions_with_access_level(&self, level: AccessLevel) -> impl Iterator<Item = &ActionMetadata> {
        self.actions.values().filter(move |a| a.access_level == level)
    }

    #[inline]
    pub fn resource_type(&self, name: &str) -> Option<&ResourceType> {
        self.resource_types.get(name)
    }

    #[inline]
    pub fn resource_types(&self) -> impl Iterator<Item = &ResourceType> {
        self.resource_types.values()
    }

    #[inline]
    pub fn condition_key(&self, key: &str) -> Option<&ConditionKeyMetadata> {
        self.condition_keys.get(key)
    }

    #[inline]
    pub fn condition_keys(&self) -> impl Iterator<Item = (&String, &ConditionKeyMetadata)> {
        self.condition_keys.iter()
    }
}

/// The service definition document as written, before normalization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawServiceDefinition {
    #[serde(default)]
    name: Option<String>,
    service_prefix: String,

    #[serde(default)]
    url: Option<String>,

    #[serde(default)]
    actions: Option<BTreeMap<String, RawAction>>,

    #[serde(default)]
    action_list: Option<BTreeMap<String, RawAction>>,

    #[serde(default)]
    access_level_list: BTreeMap<AccessLevel, Vec<String>>,

    #[serde(default)]
    resource_types: BTreeMap<String, RawResourceType>,

    #[serde(default)]
    condition_keys: BTreeMap<String, ConditionKeyMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAction {
    #[serde(default)]
    url: Option<String>,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    access_level: Option<AccessLevel>,

    #[serde(default)]
    resource_types: BTreeMap<String, ResourceTypeOnAction>,

    #[serde(default)]
    conditions: Vec<String>,

    #[serde(default)]
    dependent_actions: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResourceType {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    url: Option<String>,

    arn: String,

    #[serde(default)]
    condition_keys: Vec<String>,
}

impl TryFrom<RawServiceDefinition> for ServiceDefinition {
    type Error = IamError;

    fn try_from(raw: RawServiceDefinition) -> Result<Self, Self::Error> {
        let prefix = raw.service_prefix;
        if !is_valid_service_prefix(&prefix) {
            return Err(IamError::InvalidServiceDefinition(format!("invalid service prefix {:?}", prefix)));
        }

        let mut raw_actions = match (raw.actions, raw.action_list) {
            (Some(_), Some(_)) => {
                return Err(IamError::InvalidServiceDefinition(format!(
                    "{}: both actions and actionList are present",
                    prefix
                )))
            }
            (Some(actions), None) | (None, Some(actions)) => actions,
            (None, None) => BTreeMap::new(),
        };

        for (level, names) in raw.access_level_list {
            for name in names {
                let entry = raw_actions.entry(name).or_default();
                match entry.access_level {
                    None => entry.access_level = Some(level),
                    Some(existing) if existing != level => {
                        debug!(
                            "{}: accessLevelList puts an action under {} but its entry says {}; keeping {}",
                            prefix, level, existing, existing
                        );
                    }
                    Some(_) => (),
                }
            }
        }

        let mut actions = BTreeMap::new();
        for (name, raw_action) in raw_actions {
            if Action::new(prefix.as_str(), name.as_str()).is_err() || name.contains(|c| c == '*' || c == '?') {
                return Err(IamError::InvalidServiceDefinition(format!("{}: invalid action name {:?}", prefix, name)));
            }

            let access_level = raw_action.access_level.ok_or_else(|| {
                IamError::InvalidServiceDefinition(format!("{}: action {} has no access level", prefix, name))
            })?;

            let metadata = ActionMetadata {
                name: name.clone(),
                url: raw_action.url,
                description: raw_action.description,
                access_level,
                resource_types: raw_action.resource_types,
                conditions: raw_action.conditions,
                dependent_actions: raw_action.dependent_actions,
            };
            actions.insert(name, metadata);
        }

        let resource_types = raw
            .resource_types
            .into_iter()
            .map(|(key, rt)| {
                let resource_type = ResourceType {
                    name: rt.name.unwrap_or_else(|| key.clone()),
                    url: rt.url,
                    arn: ArnTemplate::new(rt.arn),
                    condition_keys: rt.condition_keys,
                };
                (key, resource_type)
            })
            .collect();

        Ok(Self {
            name: raw.name.unwrap_or_else(|| prefix.clone()),
            service_prefix: prefix,
            url: raw.url,
            actions,
            resource_types,
            condition_keys: raw.condition_keys,
        })
    }
}
