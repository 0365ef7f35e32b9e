#![warn(clippy::all)]
//! Fluent builders for AWS IAM policy statements.
//!
//! A [PolicyStatement] accumulates actions, resources, and conditions for one statement and renders them in IAM's
//! JSON grammar. What each AWS service offers (its actions, resource ARN templates, and condition keys) is data: a
//! [Catalog] of [ServiceDefinition]s loaded from JSON, with a few services compiled in.
//!
//! ```
//! # use scratchstack_policy_builder::{ArnOverrides, PolicyStatement};
//! let mut stmt = PolicyStatement::for_service_prefix("sqs").unwrap();
//! stmt.add_action("SendMessage").unwrap();
//! stmt.on_with("queue", &["MyQueue"], &ArnOverrides::new().region("us-east-1").account("123456789012")).unwrap();
//! stmt.add_condition("sqs:queueName", "MyQueue", None);
//!
//! let statement = stmt.to_statement();
//! assert_eq!(statement.resource().unwrap()[0].to_string(), "arn:aws:sqs:us-east-1:123456789012:MyQueue");
//! ```
pub(crate) mod action;
pub(crate) mod builder;
pub mod catalog;
pub(crate) mod condition;
pub(crate) mod effect;
pub(crate) mod error;
pub(crate) mod global_conditions;
pub(crate) mod policy;
pub(crate) mod resource;
pub(crate) mod statement;

#[macro_use]
pub(crate) mod serutil;

pub use {
    action::{AccessLevel, Action},
    builder::PolicyStatement,
    catalog::{ActionMetadata, Catalog, ConditionKeyMetadata, ConditionType, ResourceType, ServiceDefinition},
    condition::{
        consts as condop, ArnCmp, Condition, ConditionMap, ConditionOp, ConditionValues, DateCmp, NumericCmp,
        Operator, SetQualifier, StringCmp, ValueKind, Variant,
    },
    effect::Effect,
    error::IamError,
    policy::{Policy, PolicyBuilder, PolicyBuilderError, PolicyVersion},
    resource::{
        default_partition, set_default_partition, ArnDefaults, ArnOverrides, ArnTemplate, Resource, ResourceArn,
    },
    statement::{Statement, StatementBuilder, StatementBuilderError},
};
