use {
    indoc::indoc,
    pretty_assertions::assert_eq,
    scratchstack_policy_builder::{
        condop, ArnOverrides, Catalog, ConditionOp, IamError, Operator, PolicyStatement, Resource, Statement, Variant,
    },
    std::str::FromStr,
};

#[test_log::test]
fn test_sqs_end_to_end() {
    let mut stmt = PolicyStatement::for_service_prefix("sqs").unwrap();
    stmt.add_action("SendMessage")
        .unwrap()
        .on_with("queue", &["MyQueue"], &ArnOverrides::new().account("123456789012").region("us-east-1"))
        .unwrap()
        .add_condition("sqs:queueName", "MyQueue", None);

    let expected = indoc! { r#"
        {
            "Effect": "Allow",
            "Action": [
                "sqs:SendMessage"
            ],
            "Resource": [
                "arn:aws:sqs:us-east-1:123456789012:MyQueue"
            ],
            "Condition": {
                "StringLike": {
                    "sqs:queueName": [
                        "MyQueue"
                    ]
                }
            }
        }"# };

    assert_eq!(stmt.to_string(), expected);
    assert_eq!(stmt.to_statement().to_string(), expected);

    let compact: serde_json::Value = serde_json::to_value(&stmt).unwrap();
    assert_eq!(
        compact,
        serde_json::json!({
            "Effect": "Allow",
            "Action": ["sqs:SendMessage"],
            "Resource": ["arn:aws:sqs:us-east-1:123456789012:MyQueue"],
            "Condition": {"StringLike": {"sqs:queueName": ["MyQueue"]}}
        })
    );

    // The rendered statement parses back to the same snapshot.
    assert_eq!(Statement::from_str(expected).unwrap(), stmt.to_statement());
}

#[test_log::test]
fn test_duplicate_actions_collapse() {
    let names = ["SendMessage", "ReceiveMessage", "SendMessage", "DeleteMessage", "ReceiveMessage", "SendMessage"];
    let mut stmt = PolicyStatement::for_service_prefix("sqs").unwrap();
    stmt.add_actions(names).unwrap();

    let statement = stmt.to_statement();
    let actions: Vec<String> = statement.action().unwrap().iter().map(ToString::to_string).collect();
    assert_eq!(actions, vec!["sqs:SendMessage", "sqs:ReceiveMessage", "sqs:DeleteMessage"]);
}

#[test_log::test]
fn test_default_resource_is_wildcard() {
    let mut stmt = PolicyStatement::for_service_prefix("cloud9").unwrap();
    stmt.to("ListEnvironments").unwrap();
    assert_eq!(stmt.to_statement().resource().unwrap(), &[Resource::Any]);

    stmt.not_resource();
    let statement = stmt.to_statement();
    assert!(statement.resource().is_none());
    assert_eq!(statement.not_resource().unwrap(), &[Resource::Any]);
}

#[test_log::test]
fn test_not_action_twice_stays_inverted() {
    let mut stmt = PolicyStatement::for_service_prefix("sqs").unwrap();
    stmt.to("DeleteQueue").unwrap();
    stmt.not_action();
    stmt.not_action();

    let json: serde_json::Value = serde_json::to_value(stmt.to_statement()).unwrap();
    assert!(json.get("Action").is_none());
    assert_eq!(json["NotAction"], serde_json::json!(["sqs:DeleteQueue"]));

    stmt.set_not_action(false);
    let json: serde_json::Value = serde_json::to_value(stmt.to_statement()).unwrap();
    assert!(json.get("NotAction").is_none());
    assert_eq!(json["Action"], serde_json::json!(["sqs:DeleteQueue"]));
}

#[test_log::test]
fn test_condition_last_write_wins() {
    let mut stmt = PolicyStatement::new();
    stmt.to("sqs:SendMessage").unwrap().add_condition("k", "v1", None).add_condition("k", "v2", None);

    let json: serde_json::Value = serde_json::to_value(stmt.to_statement()).unwrap();
    assert_eq!(json["Condition"], serde_json::json!({"StringLike": {"k": ["v2"]}}));
}

#[test_log::test]
fn test_mixed_operators_keep_every_key() {
    let mut stmt = PolicyStatement::for_service_prefix("sqs").unwrap();
    stmt.deny()
        .to("*")
        .unwrap()
        .add_condition("aws:SecureTransport", true, None)
        .add_condition("aws:ViaAWSService", false, Some(ConditionOp::Bool(Variant::Negated).into()))
        .add_condition("aws:MultiFactorAuthPresent", false, Some(condop::BoolIfExists.into()))
        .add_condition("aws:PrincipalTag/team", "blue", Some(condop::StringEqualsIfExists.into()))
        .add_condition("sqs:queueName", "MyQueue", None)
        .if_aws_called_via(["athena.amazonaws.com"], None)
        .if_aws_tag_keys(["team"], Some(Operator::for_all_values(condop::StringEquals)))
        .if_aws_source_ip("10.0.0.0/8", Some(condop::NotIpAddressIfExists.into()));

    let statement = stmt.to_statement();
    let json = serde_json::to_value(&statement).unwrap();
    assert_eq!(
        json["Condition"],
        serde_json::json!({
            "Bool": {"aws:SecureTransport": ["true"], "aws:ViaAWSService": ["false"]},
            "BoolIfExists": {"aws:MultiFactorAuthPresent": ["false"]},
            "NotIpAddressIfExists": {"aws:SourceIp": ["10.0.0.0/8"]},
            "StringEqualsIfExists": {"aws:PrincipalTag/team": ["blue"]},
            "StringLike": {"sqs:queueName": ["MyQueue"]},
            "ForAllValues:StringEquals": {"aws:TagKeys": ["team"]},
            "ForAnyValue:StringEquals": {"aws:CalledVia": ["athena.amazonaws.com"]}
        })
    );

    // Reparsing the rendered text through an untyped value must not drop any block.
    let text = statement.to_string();
    let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(reparsed, json);
    let keys: usize = reparsed["Condition"].as_object().unwrap().values().map(|v| v.as_object().unwrap().len()).sum();
    assert_eq!(keys, stmt.condition().len());
    assert_eq!(Statement::from_str(&text).unwrap(), statement);
}

#[test_log::test]
fn test_resolved_arns_have_no_placeholders() {
    let catalog = Catalog::embedded().unwrap();
    let masks = [
        ArnOverrides::new(),
        ArnOverrides::new().account("123456789012"),
        ArnOverrides::new().region("eu-west-1"),
        ArnOverrides::new().partition("aws-cn").region("cn-north-1").account("123456789012"),
    ];

    for prefix in catalog.service_prefixes() {
        let service = catalog.service(prefix).unwrap();
        for rt in service.resource_types() {
            let ids: Vec<String> = rt.arn().resource_placeholders().iter().map(|p| format!("my-{}", p)).collect();
            for overrides in &masks {
                let arn = rt.arn().resolve(&ids, overrides, &Default::default()).unwrap();
                assert!(!arn.contains("${"), "{} left a placeholder in {}", rt.arn(), arn);

                let mut stmt = PolicyStatement::for_service(service.clone());
                stmt.on_with(rt.name(), &ids, overrides).unwrap();
                assert_eq!(stmt.resources().len(), 1);
            }

            let bare = rt.arn().resolve(&ids, &ArnOverrides::new(), &Default::default()).unwrap();
            let parts: Vec<&str> = bare.splitn(6, ':').collect();
            assert_eq!(parts[3], "*", "region default in {}", bare);
            assert_eq!(parts[4], "*", "account default in {}", bare);
        }
    }
}

#[test_log::test]
fn test_legacy_and_access_level_list_services() {
    let mut appstream = PolicyStatement::for_service_prefix("appstream").unwrap();
    appstream
        .to("CreateFleet")
        .unwrap()
        .on_with("fleet", &["MyFleet"], &ArnOverrides::new().region("us-west-2").account("123456789012"))
        .unwrap();
    assert_eq!(appstream.resources()[0].to_string(), "arn:aws:appstream:us-west-2:123456789012:fleet/MyFleet");

    let mut groundstation = PolicyStatement::for_service_prefix("groundstation").unwrap();
    groundstation
        .on("Config", &["tracking", "abc-123"])
        .unwrap()
        .if_key("configType", "tracking", Some(condop::StringEquals.into()));
    assert_eq!(groundstation.resources()[0].to_string(), "arn:aws:groundstation:*:*:config/tracking/abc-123");
    assert_eq!(
        groundstation.condition().get("groundstation:configType").unwrap().0,
        Operator::from(condop::StringEquals)
    );

    assert_eq!(
        PolicyStatement::for_service_prefix("s3").unwrap_err(),
        IamError::UnknownService("s3".to_string())
    );
}
