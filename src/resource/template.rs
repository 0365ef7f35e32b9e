//! ARN templates as published in the service authorization reference, e.g.
//! `arn:${Partition}:sqs:${Region}:${Account}:${QueueName}`.

use {
    crate::IamError,
    lazy_static::lazy_static,
    log::{debug, trace},
    regex::Regex,
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        sync::{PoisonError, RwLock},
    },
};

pub(crate) const PARTITION: &str = "Partition";
pub(crate) const REGION: &str = "Region";
pub(crate) const ACCOUNT: &str = "Account";

const BUILTIN_PARTITION: &str = "aws";

lazy_static! {
    /// Template placeholders are bare identifiers. IAM policy variables always carry a `:` (`${aws:username}`) or
    /// are one of `${*}`, `${?}`, `${$}`, so they never match.
    static ref PLACEHOLDER: Regex = Regex::new(r"\$\{([A-Za-z][A-Za-z0-9_]*)\}").unwrap();

    static ref DEFAULT_PARTITION: RwLock<String> = RwLock::new(BUILTIN_PARTITION.to_string());
}

/// Set the partition used when neither the call nor the statement's [ArnDefaults] name one, e.g. `aws-cn` or
/// `aws-us-gov`. This is process-wide.
pub fn set_default_partition<S: Into<String>>(partition: S) {
    let partition = partition.into();
    debug!("Setting default partition to {}", partition);
    *DEFAULT_PARTITION.write().unwrap_or_else(PoisonError::into_inner) = partition;
}

/// The process-wide default partition; `aws` unless [set_default_partition] has been called.
pub fn default_partition() -> String {
    DEFAULT_PARTITION.read().unwrap_or_else(PoisonError::into_inner).clone()
}

pub(crate) fn has_unresolved_placeholder(s: &str) -> bool {
    PLACEHOLDER.is_match(s)
}

/// Values used for `${Partition}`, `${Region}` and `${Account}` when a resource call does not override them.
///
/// Region and account default to `*`. A `None` partition falls through to [default_partition] at resolution time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArnDefaults {
    pub partition: Option<String>,
    pub region: String,
    pub account: String,
}

impl Default for ArnDefaults {
    fn default() -> Self {
        Self {
            partition: None,
            region: "*".to_string(),
            account: "*".to_string(),
        }
    }
}

/// Per-call overrides for the standard ARN placeholders.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ArnOverrides {
    pub partition: Option<String>,
    pub region: Option<String>,
    pub account: Option<String>,
}

impl ArnOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition<S: Into<String>>(mut self, partition: S) -> Self {
        self.partition = Some(partition.into());
        self
    }

    pub fn region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn account<S: Into<String>>(mut self, account: S) -> Self {
        self.account = Some(account.into());
        self
    }
}

/// A parsed ARN template.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArnTemplate {
    template: String,

    /// Resource-specific placeholder names, distinct, in order of first appearance.
    resource_placeholders: Vec<String>,
}

impl ArnTemplate {
    pub fn new<S: Into<String>>(template: S) -> Self {
        let template = template.into();
        let mut resource_placeholders: Vec<String> = Vec::new();

        for caps in PLACEHOLDER.captures_iter(&template) {
            let name = &caps[1];
            if !matches!(name, PARTITION | REGION | ACCOUNT) && !resource_placeholders.iter().any(|p| p == name) {
                resource_placeholders.push(name.to_string());
            }
        }

        Self {
            template,
            resource_placeholders,
        }
    }

    #[inline]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[inline]
    pub fn resource_placeholders(&self) -> &[String] {
        &self.resource_placeholders
    }

    /// Substitute every placeholder in the template.
    ///
    /// `ids` fill the resource-specific placeholders positionally, in the order returned by
    /// [ArnTemplate::resource_placeholders]. Standard placeholders come from `overrides`, then `defaults`, then the
    /// process-wide default partition. Substitution is a single pass over the template: values are inserted
    /// verbatim and never rescanned.
    ///
    /// # Errors
    ///
    /// [IamError::ArnTemplateArity] if the number of `ids` differs from the number of resource placeholders.
    pub fn resolve<S: AsRef<str>>(
        &self,
        ids: &[S],
        overrides: &ArnOverrides,
        defaults: &ArnDefaults,
    ) -> Result<String, IamError> {
        if ids.len() != self.resource_placeholders.len() {
            debug!(
                "ARN template {} expects {} identifier(s); got {}",
                self.template,
                self.resource_placeholders.len(),
                ids.len()
            );
            return Err(IamError::ArnTemplateArity {
                template: self.template.clone(),
                expected: self.resource_placeholders.len(),
                actual: ids.len(),
            });
        }

        let partition = match (&overrides.partition, &defaults.partition) {
            (Some(p), _) | (None, Some(p)) => p.clone(),
            (None, None) => default_partition(),
        };
        let region = overrides.region.as_deref().unwrap_or(&defaults.region);
        let account = overrides.account.as_deref().unwrap_or(&defaults.account);

        let mut result = String::with_capacity(self.template.len() + 32);
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(&self.template) {
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            let name = &caps[1];
            let value = match name {
                PARTITION => partition.as_str(),
                REGION => region,
                ACCOUNT => account,
                _ => match self.resource_placeholders.iter().position(|p| p == name) {
                    Some(i) => ids[i].as_ref(),
                    None => whole.as_str(),
                },
            };

            result.push_str(&self.template[last..whole.start()]);
            result.push_str(value);
            last = whole.end();
        }

        result.push_str(&self.template[last..]);
        trace!("Resolved ARN template {} -> {}", self.template, result);
        Ok(result)
    }
}

impl Display for ArnTemplate {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(&self.template)
    }
}
