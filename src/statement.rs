use {
    crate::{display_json, from_str_json, serutil::OneOrMany, Action, Condition, Effect, Resource},
    derive_builder::Builder,
    serde::{
        de::{self, Deserializer, MapAccess, Visitor},
        Deserialize, Serialize,
    },
    std::fmt::{Formatter, Result as FmtResult},
};

/// A single IAM policy statement, as produced by [crate::PolicyStatement::to_statement] or parsed from JSON.
///
/// Exactly one of `Action`/`NotAction` and exactly one of `Resource`/`NotResource` is present. Lists always
/// serialize as JSON arrays; when parsing, a single string is accepted in place of a one-element list.
#[derive(Builder, Clone, Debug, Eq, PartialEq, Serialize)]
#[builder(build_fn(validate = "Self::validate"))]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    sid: Option<String>,

    effect: Effect,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<Vec<Action>>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    not_action: Option<Vec<Action>>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    resource: Option<Vec<Resource>>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    not_resource: Option<Vec<Resource>>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    condition: Option<Condition>,
}

impl Statement {
    pub fn builder() -> StatementBuilder {
        StatementBuilder::default()
    }

    /// Assemble a statement whose shape is already known to be valid.
    pub(crate) fn from_parts(
        sid: Option<String>,
        effect: Effect,
        actions: Vec<Action>,
        not_action: bool,
        resources: Vec<Resource>,
        not_resource: bool,
        condition: Option<Condition>,
    ) -> Self {
        let (action, not_action) = if not_action {
            (None, Some(actions))
        } else {
            (Some(actions), None)
        };

        let (resource, not_resource) = if not_resource {
            (None, Some(resources))
        } else {
            (Some(resources), None)
        };

        Self {
            sid,
            effect,
            action,
            not_action,
            resource,
            not_resource,
            condition,
        }
    }

    #[inline]
    pub fn sid(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    #[inline]
    pub fn effect(&self) -> Effect {
        self.effect
    }

    #[inline]
    pub fn action(&self) -> Option<&[Action]> {
        self.action.as_deref()
    }

    #[inline]
    pub fn not_action(&self) -> Option<&[Action]> {
        self.not_action.as_deref()
    }

    #[inline]
    pub fn resource(&self) -> Option<&[Resource]> {
        self.resource.as_deref()
    }

    #[inline]
    pub fn not_resource(&self) -> Option<&[Resource]> {
        self.not_resource.as_deref()
    }

    #[inline]
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }
}

display_json!(Statement);
from_str_json!(Statement);

impl<'de> Deserialize<'de> for Statement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(StatementVisitor {})
    }
}

const STATEMENT_FIELDS: &[&str] = &["Sid", "Effect", "Action", "NotAction", "Resource", "NotResource", "Condition"];

struct StatementVisitor;
impl<'de> Visitor<'de> for StatementVisitor {
    type Value = Statement;

    fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
        formatter.write_str("a map of statement properties")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Statement, A::Error> {
        let mut builder = Statement::builder();
        let mut seen = [false; 7];

        while let Some(key) = access.next_key::<String>()? {
            let index = match STATEMENT_FIELDS.iter().position(|f| *f == key) {
                Some(index) => index,
                None => return Err(de::Error::unknown_field(&key, STATEMENT_FIELDS)),
            };

            if seen[index] {
                return Err(de::Error::duplicate_field(STATEMENT_FIELDS[index]));
            }
            seen[index] = true;

            match index {
                0 => {
                    builder.sid(access.next_value::<String>()?);
                }
                1 => {
                    builder.effect(access.next_value::<Effect>()?);
                }
                2 => {
                    builder.action(access.next_value::<OneOrMany<Action>>()?.0);
                }
                3 => {
                    builder.not_action(access.next_value::<OneOrMany<Action>>()?.0);
                }
                4 => {
                    builder.resource(access.next_value::<OneOrMany<Resource>>()?.0);
                }
                5 => {
                    builder.not_resource(access.next_value::<OneOrMany<Resource>>()?.0);
                }
                _ => {
                    builder.condition(access.next_value::<Condition>()?);
                }
            }
        }

        builder.build().map_err(|e| match e {
            StatementBuilderError::ValidationError(s) => {
                let msg2 = s.replace('.', ";").trim_end_matches(|c| c == ';').to_string();
                de::Error::custom(StatementBuilderError::ValidationError(msg2))
            }
            _ => de::Error::custom(e),
        })
    }
}

impl StatementBuilder {
    fn validate(&self) -> Result<(), StatementBuilderError> {
        let mut errors = Vec::with_capacity(3);
        if self.effect.is_none() {
            errors.push("Effect must be set.");
        }

        match (&self.action, &self.not_action) {
            (Some(Some(_)), Some(Some(_))) => errors.push("Action and NotAction cannot both be set."),
            (None | Some(None), None | Some(None)) => errors.push("Either Action or NotAction must be set."),
            _ => (),
        }

        match (&self.resource, &self.not_resource) {
            (Some(Some(_)), Some(Some(_))) => errors.push("Resource and NotResource cannot both be set."),
            (None | Some(None), None | Some(None)) => errors.push("Either Resource or NotResource must be set."),
            _ => (),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(StatementBuilderError::ValidationError(errors.join(" ")))
        }
    }
}
