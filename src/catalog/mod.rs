//! Service catalogue: per-service metadata describing actions, resource types, and condition keys.

mod service;

pub use service::{
    ActionMetadata, ConditionKeyMetadata, ConditionType, ResourceType, ResourceTypeOnAction, ServiceDefinition,
};

use {
    crate::IamError,
    lazy_static::lazy_static,
    log::debug,
    std::{collections::BTreeMap, sync::Arc},
};

/// Service definitions compiled into the crate.
const EMBEDDED_SERVICES: [&str; 4] = [
    include_str!("../../data/services/appstream.json"),
    include_str!("../../data/services/cloud9.json"),
    include_str!("../../data/services/groundstation.json"),
    include_str!("../../data/services/sqs.json"),
];

lazy_static! {
    static ref EMBEDDED: Result<Catalog, IamError> = Catalog::from_json(EMBEDDED_SERVICES.iter().copied());
}

/// A read-only set of service definitions keyed by service prefix.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    services: BTreeMap<String, Arc<ServiceDefinition>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalogue shipped with this crate.
    ///
    /// # Errors
    ///
    /// [IamError::InvalidServiceDefinition] if an embedded document fails to load. This is a packaging defect, so the
    /// error is the same on every call.
    pub fn embedded() -> Result<&'static Catalog, IamError> {
        EMBEDDED.as_ref().map_err(Clone::clone)
    }

    /// Build a catalogue from service definition documents. A later document with the same service prefix replaces
    /// an earlier one.
    pub fn from_json<'a, I>(documents: I) -> Result<Self, IamError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut catalog = Self::new();
        for document in documents {
            catalog.insert(ServiceDefinition::from_json(document)?);
        }

        Ok(catalog)
    }

    /// Add a service definition, returning the one it replaced.
    pub fn insert(&mut self, service: ServiceDefinition) -> Option<Arc<ServiceDefinition>> {
        self.services.insert(service.service_prefix().to_string(), Arc::new(service))
    }

    #[inline]
    pub fn get(&self, prefix: &str) -> Option<&Arc<ServiceDefinition>> {
        self.services.get(prefix)
    }

    /// Look up a service by prefix.
    ///
    /// # Errors
    ///
    /// [IamError::UnknownService] if the catalogue has no such service.
    pub fn service(&self, prefix: &str) -> Result<Arc<ServiceDefinition>, IamError> {
        match self.services.get(prefix) {
            Some(service) => Ok(Arc::clone(service)),
            None => {
                debug!("Service {} is not in the catalogue", prefix);
                Err(IamError::UnknownService(prefix.to_string()))
            }
        }
    }

    pub fn service_prefixes(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::Catalog,
        crate::{AccessLevel, IamError},
        pretty_assertions::assert_eq,
    };

    #[test_log::test]
    fn test_embedded() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(catalog.service_prefixes().collect::<Vec<_>>(), vec!["appstream", "cloud9", "groundstation", "sqs"]);
        assert_eq!(catalog.len(), 4);

        let sqs = catalog.service("sqs").unwrap();
        assert_eq!(sqs.name(), "Amazon SQS");
        assert_eq!(sqs.action("SendMessage").unwrap().access_level(), AccessLevel::Write);
        assert_eq!(
            sqs.resource_type("queue").unwrap().arn().template(),
            "arn:${Partition}:sqs:${Region}:${Account}:${QueueName}"
        );

        // Older data generation: no name, no condition key table.
        let appstream = catalog.service("appstream").unwrap();
        assert_eq!(appstream.name(), "appstream");
        assert_eq!(appstream.condition_keys().count(), 0);
        assert_eq!(appstream.action("CreateFleet").unwrap().access_level(), AccessLevel::Write);
        assert!(appstream.resource_type("image-builder").is_some());

        let groundstation = catalog.service("groundstation").unwrap();
        assert_eq!(groundstation.action("ListSatellites").unwrap().access_level(), AccessLevel::List);
        assert_eq!(
            groundstation.resource_type("Config").unwrap().arn().resource_placeholders(),
            &["ConfigType".to_string(), "ConfigId".to_string()]
        );
    }

    #[test_log::test]
    fn test_unknown_service() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(catalog.service("nope").unwrap_err(), IamError::UnknownService("nope".to_string()));
        assert!(catalog.get("nope").is_none());
    }

    #[test_log::test]
    fn test_from_json_replaces() {
        let first = r#"{"servicePrefix": "x", "actions": {"A": {"accessLevel": "Read"}}}"#;
        let second = r#"{"servicePrefix": "x", "actions": {"B": {"accessLevel": "Write"}}}"#;
        let catalog = Catalog::from_json([first, second]).unwrap();
        assert_eq!(catalog.len(), 1);

        let x = catalog.service("x").unwrap();
        assert!(x.action("A").is_none());
        assert!(x.action("B").is_some());

        assert!(Catalog::from_json(["{}"]).is_err());
        assert!(Catalog::new().is_empty());
    }
}
