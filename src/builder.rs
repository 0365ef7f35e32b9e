use {
    crate::{
        catalog::{Catalog, ServiceDefinition},
        display_json, AccessLevel, Action, ArnDefaults, ArnOverrides, Condition, ConditionValues, Effect, IamError,
        Operator, Resource, Statement,
    },
    log::debug,
    regex::Regex,
    serde::{Serialize, Serializer},
    std::{str::FromStr, sync::Arc},
};

/// A fluent builder for one IAM policy statement.
///
/// A builder is usually bound to a service from the catalogue, which lets actions, resource types and condition keys
/// be named without the service prefix:
///
/// ```
/// # use scratchstack_policy_builder::{ArnOverrides, PolicyStatement};
/// let mut stmt = PolicyStatement::for_service_prefix("sqs").unwrap();
/// stmt.to("SendMessage").unwrap()
///     .on_with("queue", &["MyQueue"], &ArnOverrides::new().region("us-east-1").account("123456789012"))
///     .unwrap()
///     .if_key("queueName", "MyQueue", None);
/// assert_eq!(stmt.actions()[0].to_string(), "sqs:SendMessage");
/// ```
///
/// Every mutator takes `&mut self`. A builder holds no locks and is not meant to be mutated from several threads at
/// once; separate builders are independent and may be used in parallel.
#[derive(Clone, Debug, Default)]
pub struct PolicyStatement {
    service: Option<Arc<ServiceDefinition>>,
    sid: Option<String>,
    effect: Effect,
    actions: Vec<Action>,
    not_action: bool,
    resources: Vec<Resource>,
    not_resource: bool,
    condition: Condition,
    arn_defaults: ArnDefaults,
}

impl PolicyStatement {
    /// A builder with no service. Actions must be fully qualified and condition keys are used as given.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_service(service: Arc<ServiceDefinition>) -> Self {
        Self {
            service: Some(service),
            ..Self::default()
        }
    }

    /// A builder bound to a service from the embedded catalogue.
    ///
    /// # Errors
    ///
    /// [IamError::UnknownService] if the embedded catalogue has no service with this prefix.
    pub fn for_service_prefix(prefix: &str) -> Result<Self, IamError> {
        Ok(Self::for_service(Catalog::embedded()?.service(prefix)?))
    }

    /// Use `defaults` for partition, region and account when resolving ARN templates.
    pub fn with_arn_defaults(mut self, defaults: ArnDefaults) -> Self {
        self.arn_defaults = defaults;
        self
    }

    #[inline]
    pub fn service(&self) -> Option<&Arc<ServiceDefinition>> {
        self.service.as_ref()
    }

    #[inline]
    pub fn service_prefix(&self) -> Option<&str> {
        self.service.as_ref().map(|s| s.service_prefix())
    }

    #[inline]
    pub fn arn_defaults(&self) -> &ArnDefaults {
        &self.arn_defaults
    }

    pub fn sid<S: Into<String>>(&mut self, sid: S) -> &mut Self {
        self.sid = Some(sid.into());
        self
    }

    pub fn allow(&mut self) -> &mut Self {
        self.effect = Effect::Allow;
        self
    }

    pub fn deny(&mut self) -> &mut Self {
        self.effect = Effect::Deny;
        self
    }

    #[inline]
    pub fn effect(&self) -> Effect {
        self.effect
    }

    /// Add an action. See [PolicyStatement::add_action].
    #[inline]
    pub fn to(&mut self, name: &str) -> Result<&mut Self, IamError> {
        self.add_action(name)
    }

    /// Add an action to the statement, ignoring it if already present.
    ///
    /// A name without `:` is qualified with the builder's service prefix; a name with `:` is taken as
    /// `service:Action`. Wildcards (`Get*`) are allowed. Whether the action exists in the catalogue is not checked.
    ///
    /// # Errors
    ///
    /// * [IamError::InvalidAction] if the name is empty or malformed.
    /// * [IamError::MissingServicePrefix] if the name is unqualified and the builder has no service.
    pub fn add_action(&mut self, name: &str) -> Result<&mut Self, IamError> {
        let action = if name.contains(':') {
            Action::from_str(name)?
        } else if let Some(prefix) = self.service_prefix() {
            Action::new(prefix, name)?
        } else if name == "*" {
            Action::Any
        } else {
            debug!("Action {} has no service prefix and the statement has no service", name);
            return Err(IamError::MissingServicePrefix(name.to_string()));
        };

        if let Some(service) = &self.service {
            let action_name = action.action();
            if action.service() == service.service_prefix()
                && !action_name.contains(|c| c == '*' || c == '?')
                && service.action(action_name).is_none()
            {
                debug!("Action {} is not in the {} catalogue", action, service.service_prefix());
            }
        }

        self.push_action(action);
        Ok(self)
    }

    /// [PolicyStatement::add_action] for each name in turn. Stops at the first invalid name.
    pub fn add_actions<I, S>(&mut self, names: I) -> Result<&mut Self, IamError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.add_action(name.as_ref())?;
        }

        Ok(self)
    }

    /// Add every action the service's catalogue lists.
    ///
    /// # Errors
    ///
    /// [IamError::MissingServicePrefix] if the builder has no service.
    pub fn all_actions(&mut self) -> Result<&mut Self, IamError> {
        self.extend_from_catalog("*", |_| true)
    }

    /// Add every catalogue action of the given access level.
    ///
    /// # Errors
    ///
    /// [IamError::MissingServicePrefix] if the builder has no service.
    pub fn all_actions_with_access_level(&mut self, level: AccessLevel) -> Result<&mut Self, IamError> {
        self.extend_from_catalog(level.as_str(), |a| a.access_level() == level)
    }

    /// Add every catalogue action whose name matches `pattern`, where `*` matches any run of characters and `?` a
    /// single character. Matching is case sensitive, unlike IAM's own action matching, since the catalogue
    /// spelling is canonical.
    ///
    /// # Errors
    ///
    /// [IamError::MissingServicePrefix] if the builder has no service.
    pub fn all_matching_actions(&mut self, pattern: &str) -> Result<&mut Self, IamError> {
        let mut re = String::with_capacity(pattern.len() + 8);
        re.push('^');
        for c in pattern.chars() {
            match c {
                '*' => re.push_str(".*"),
                '?' => re.push('.'),
                _ => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            }
        }
        re.push('$');

        let re = Regex::new(&re).map_err(|e| {
            debug!("Action pattern {} did not compile: {}", pattern, e);
            IamError::InvalidAction(pattern.to_string())
        })?;

        self.extend_from_catalog(pattern, |a| re.is_match(a.name()))
    }

    fn extend_from_catalog<F>(&mut self, what: &str, mut filter: F) -> Result<&mut Self, IamError>
    where
        F: FnMut(&crate::ActionMetadata) -> bool,
    {
        let service = match &self.service {
            Some(service) => Arc::clone(service),
            None => {
                debug!("Cannot expand actions {} without a service", what);
                return Err(IamError::MissingServicePrefix(what.to_string()));
            }
        };

        for metadata in service.actions().filter(|a| filter(a)) {
            self.push_action(Action::new(service.service_prefix(), metadata.name())?);
        }

        Ok(self)
    }

    fn push_action(&mut self, action: Action) {
        if !self.actions.contains(&action) {
            self.actions.push(action);
        }
    }

    /// Serialize the actions as `NotAction`. Calling this again has no further effect.
    pub fn not_action(&mut self) -> &mut Self {
        self.not_action = true;
        self
    }

    /// Choose between `NotAction` (`true`) and `Action` (`false`).
    pub fn set_not_action(&mut self, not_action: bool) -> &mut Self {
        self.not_action = not_action;
        self
    }

    #[inline]
    pub fn is_not_action(&self) -> bool {
        self.not_action
    }

    #[inline]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    #[inline]
    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Add a resource: `*` or a fully resolved ARN. Duplicates are ignored.
    ///
    /// # Errors
    ///
    /// * [IamError::UnresolvedPlaceholder] if the string still contains an ARN template placeholder.
    /// * [IamError::InvalidResource] if it is not an ARN.
    pub fn add_resource(&mut self, arn: &str) -> Result<&mut Self, IamError> {
        let resource = Resource::from_str(arn)?;
        self.push_resource(resource);
        Ok(self)
    }

    pub fn add_resources<I, S>(&mut self, arns: I) -> Result<&mut Self, IamError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arn in arns {
            self.add_resource(arn.as_ref())?;
        }

        Ok(self)
    }

    /// Add the `*` resource.
    pub fn on_all_resources(&mut self) -> &mut Self {
        self.push_resource(Resource::Any);
        self
    }

    /// Add a resource of the named type, filling its ARN template with `ids` and the builder's defaults.
    ///
    /// # Errors
    ///
    /// * [IamError::UnknownResourceType] if the service has no such resource type.
    /// * [IamError::ArnTemplateArity] if `ids` does not match the template.
    #[inline]
    pub fn on<S: AsRef<str>>(&mut self, resource_type: &str, ids: &[S]) -> Result<&mut Self, IamError> {
        self.on_with(resource_type, ids, &ArnOverrides::new())
    }

    /// [PolicyStatement::on] with explicit partition, region or account.
    pub fn on_with<S: AsRef<str>>(
        &mut self,
        resource_type: &str,
        ids: &[S],
        overrides: &ArnOverrides,
    ) -> Result<&mut Self, IamError> {
        let service = match &self.service {
            Some(service) => service,
            None => {
                debug!("Cannot resolve resource type {} without a service", resource_type);
                return Err(IamError::MissingServicePrefix(resource_type.to_string()));
            }
        };

        let arn = match service.resource_type(resource_type) {
            Some(rt) => rt.arn().resolve(ids, overrides, &self.arn_defaults)?,
            None => {
                debug!("Resource type {} is not in the {} catalogue", resource_type, service.service_prefix());
                return Err(IamError::UnknownResourceType {
                    service: service.service_prefix().to_string(),
                    resource_type: resource_type.to_string(),
                });
            }
        };

        self.add_resource(&arn)
    }

    fn push_resource(&mut self, resource: Resource) {
        if !self.resources.contains(&resource) {
            self.resources.push(resource);
        }
    }

    /// Serialize the resources as `NotResource`. Calling this again has no further effect.
    pub fn not_resource(&mut self) -> &mut Self {
        self.not_resource = true;
        self
    }

    /// Choose between `NotResource` (`true`) and `Resource` (`false`).
    pub fn set_not_resource(&mut self, not_resource: bool) -> &mut Self {
        self.not_resource = not_resource;
        self
    }

    #[inline]
    pub fn is_not_resource(&self) -> bool {
        self.not_resource
    }

    #[inline]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    #[inline]
    pub fn has_resources(&self) -> bool {
        !self.resources.is_empty()
    }

    /// Set a condition on `key`, replacing any earlier condition on the same key. Without an operator, the default
    /// for the kind of value is used (`StringLike` for strings, `Bool` for booleans, and so on).
    ///
    /// IAM rejects a key with no values, so an empty list removes the condition on `key` instead.
    pub fn add_condition<K, V>(&mut self, key: K, values: V, op: Option<Operator>) -> &mut Self
    where
        K: Into<String>,
        V: Into<ConditionValues>,
    {
        let key = key.into();
        let values = values.into();
        if values.is_empty() {
            debug!("Empty value list for condition key {}; removing the condition", key);
            self.condition.remove(&key);
            return self;
        }

        let op = op.unwrap_or_else(|| values.default_operator());
        self.condition.insert(key, op, values.into_values());
        self
    }

    /// A `Bool` condition; an omitted value means `true`.
    pub fn add_bool_condition<K: Into<String>>(
        &mut self,
        key: K,
        value: Option<bool>,
        op: Option<Operator>,
    ) -> &mut Self {
        self.add_condition(key, value.unwrap_or(true), op)
    }

    /// Set a condition on a catalogue condition key.
    ///
    /// A name without `:` is qualified with the builder's service prefix. Without an operator, the default comes
    /// from the key's documented type when the catalogue knows the key, otherwise from the kind of value.
    pub fn if_key<V: Into<ConditionValues>>(&mut self, name: &str, values: V, op: Option<Operator>) -> &mut Self {
        let key = self.qualify_key(name);
        let op = op.or_else(|| self.catalog_operator(&key));
        self.add_condition(key, values, op)
    }

    /// Set a condition on a parameterized key such as `aws:ResourceTag/${TagKey}`. The `${...}` segment is
    /// replaced by `variable`; a key without one gets `/variable` appended.
    pub fn if_key_with<V: Into<ConditionValues>>(
        &mut self,
        name: &str,
        variable: &str,
        values: V,
        op: Option<Operator>,
    ) -> &mut Self {
        let template = self.qualify_key(name);
        let op = op.or_else(|| self.catalog_operator(&template));
        let key = splice_key_variable(&template, variable);
        self.add_condition(key, values, op)
    }

    fn qualify_key(&self, name: &str) -> String {
        match self.service_prefix() {
            Some(prefix) if !name.contains(':') => format!("{}:{}", prefix, name),
            _ => name.to_string(),
        }
    }

    fn catalog_operator(&self, key: &str) -> Option<Operator> {
        let service = self.service.as_ref()?;
        service.condition_key(key).map(|metadata| metadata.condition_type.default_operator())
    }

    #[inline]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    #[inline]
    pub fn has_conditions(&self) -> bool {
        !self.condition.is_empty()
    }

    /// Snapshot the statement. Without resources, the statement applies to `*`.
    ///
    /// A builder with no actions renders an empty `Action` list, which IAM rejects; check [PolicyStatement::has_actions]
    /// before submitting the result.
    pub fn to_statement(&self) -> Statement {
        if self.actions.is_empty() {
            debug!("Statement {:?} has no actions", self.sid);
        }

        let resources = if self.resources.is_empty() {
            vec![Resource::Any]
        } else {
            self.resources.clone()
        };

        let condition = if self.condition.is_empty() {
            None
        } else {
            Some(self.condition.clone())
        };

        Statement::from_parts(
            self.sid.clone(),
            self.effect,
            self.actions.clone(),
            self.not_action,
            resources,
            self.not_resource,
            condition,
        )
    }
}

/// Replace the first `${...}` segment of `key` with `variable`, or append `/variable`.
fn splice_key_variable(key: &str, variable: &str) -> String {
    if let Some(start) = key.find("${") {
        if let Some(len) = key[start..].find('}') {
            return format!("{}{}{}", &key[..start], variable, &key[start + len + 1..]);
        }
    }

    format!("{}/{}", key, variable)
}

impl From<&PolicyStatement> for Statement {
    fn from(builder: &PolicyStatement) -> Self {
        builder.to_statement()
    }
}

impl Serialize for PolicyStatement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_statement().serialize(serializer)
    }
}

display_json!(PolicyStatement);
