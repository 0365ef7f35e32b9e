use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IamError {
    /// An ARN template was given the wrong number of resource identifiers.
    ArnTemplateArity {
        template: String,
        expected: usize,
        actual: usize,
    },
    InvalidAccessLevel(String),
    InvalidAction(String),
    InvalidConditionOperator(String),
    InvalidPolicyVersion(String),
    InvalidResource(String),
    InvalidServiceDefinition(String),
    /// A fully-qualified action name is required because the builder is not bound to a service.
    MissingServicePrefix(String),
    /// A resource still contains a `${Name}` template placeholder.
    UnresolvedPlaceholder(String),
    UnknownResourceType {
        service: String,
        resource_type: String,
    },
    UnknownService(String),
}

impl Display for IamError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::ArnTemplateArity {
                template,
                expected,
                actual,
            } => write!(f, "ARN template {} expects {} resource identifier(s); got {}", template, expected, actual),
            Self::InvalidAccessLevel(level) => write!(f, "Invalid access level: {}", level),
            Self::InvalidAction(action) => write!(f, "Invalid action: {}", action),
            Self::InvalidConditionOperator(operator) => write!(f, "Invalid condition operator: {}", operator),
            Self::InvalidPolicyVersion(version) => write!(f, "Invalid policy version: {}", version),
            Self::InvalidResource(resource) => write!(f, "Invalid resource: {}", resource),
            Self::InvalidServiceDefinition(msg) => write!(f, "Invalid service definition: {}", msg),
            Self::MissingServicePrefix(action) => write!(f, "Action requires a service prefix: {}", action),
            Self::UnresolvedPlaceholder(resource) => write!(f, "Unresolved ARN placeholder: {}", resource),
            Self::UnknownResourceType {
                service,
                resource_type,
            } => write!(f, "Unknown resource type for service {}: {}", service, resource_type),
            Self::UnknownService(service) => write!(f, "Unknown service: {}", service),
        }
    }
}

impl Error for IamError {}

#[cfg(test)]
mod tests {
    use {
        crate::IamError,
        pretty_assertions::{assert_eq, assert_ne},
    };

    #[test_log::test]
    fn test_display() {
        let _ = format!("{:?}", IamError::InvalidAction("foo".to_string()));
        assert_eq!(IamError::InvalidAction("foo".to_string()).to_string(), "Invalid action: foo");
        assert_eq!(IamError::InvalidResource("foo".to_string()).to_string(), "Invalid resource: foo");
        assert_eq!(
            IamError::UnresolvedPlaceholder("arn:aws:sqs:*:*:${QueueName}".to_string()).to_string(),
            "Unresolved ARN placeholder: arn:aws:sqs:*:*:${QueueName}"
        );
        assert_eq!(
            IamError::ArnTemplateArity {
                template: "arn:${Partition}:s3:::${BucketName}".to_string(),
                expected: 1,
                actual: 2,
            }
            .to_string(),
            "ARN template arn:${Partition}:s3:::${BucketName} expects 1 resource identifier(s); got 2"
        );
        assert_eq!(
            IamError::UnknownResourceType {
                service: "sqs".to_string(),
                resource_type: "topic".to_string(),
            }
            .to_string(),
            "Unknown resource type for service sqs: topic"
        );
        assert_eq!(IamError::UnknownService("nope".to_string()).to_string(), "Unknown service: nope");
    }

    #[test_log::test]
    fn test_eq() {
        let e1a = IamError::InvalidAction("foo".to_string());
        let e1b = IamError::InvalidAction("foo".to_string());
        let e2 = IamError::InvalidResource("foo".to_string());
        let e3 = IamError::InvalidAction("bar".to_string());

        assert_eq!(e1a, e1b);
        assert_eq!(e1a, e1a.clone());
        assert_ne!(e1a, e2);
        assert_ne!(e1a, e3);
        assert_ne!(e2, e3);
    }
}
