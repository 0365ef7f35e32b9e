//! Helpers for the `aws:*` global condition keys, available on every statement regardless of service.
//!
//! Each helper takes the value(s) to compare against and an optional operator. When the operator is omitted, the one
//! AWS documents as the usual choice for the key is used.

use crate::{condop, ConditionValues, Operator, PolicyStatement};

/// A helper for a global key that takes any values and defaults to the given operator.
macro_rules! global_key {
    ($(#[$doc:meta])* $fn:ident, $key:literal, $op:expr) => {
        $(#[$doc])*
        pub fn $fn<V: Into<ConditionValues>>(&mut self, values: V, op: Option<Operator>) -> &mut Self {
            self.add_condition($key, values, Some(op.unwrap_or_else(|| $op)))
        }
    };
}

/// A helper for a tag key family such as `aws:RequestTag/<tag>`.
macro_rules! global_tag_key {
    ($(#[$doc:meta])* $fn:ident, $prefix:literal) => {
        $(#[$doc])*
        pub fn $fn<V: Into<ConditionValues>>(&mut self, tag: &str, values: V, op: Option<Operator>) -> &mut Self {
            let key = format!(concat!($prefix, "/{}"), tag);
            self.add_condition(key, values, Some(op.unwrap_or_else(|| condop::StringLike.into())))
        }
    };
}

impl PolicyStatement {
    global_key!(
        /// `aws:CalledVia`: every service in the chain that made requests on the principal's behalf.
        if_aws_called_via,
        "aws:CalledVia",
        Operator::for_any_value(condop::StringEquals)
    );

    global_key!(
        /// `aws:CalledViaFirst`: the first service in the chain.
        if_aws_called_via_first,
        "aws:CalledViaFirst",
        condop::StringLike.into()
    );

    global_key!(
        /// `aws:CalledViaLast`: the last service in the chain.
        if_aws_called_via_last,
        "aws:CalledViaLast",
        condop::StringLike.into()
    );

    global_key!(
        /// `aws:CurrentTime`. Pass a `chrono::DateTime<Utc>` or an ISO 8601 string.
        if_aws_current_time,
        "aws:CurrentTime",
        condop::DateLessThanEquals.into()
    );

    global_key!(
        /// `aws:EpochTime`. Accepts dates, ISO 8601 strings, or seconds since the Unix epoch.
        if_aws_epoch_time,
        "aws:EpochTime",
        condop::DateLessThanEquals.into()
    );

    global_key!(
        /// `aws:MultiFactorAuthAge`, in seconds.
        if_aws_multi_factor_auth_age,
        "aws:MultiFactorAuthAge",
        condop::NumericLessThan.into()
    );

    /// `aws:MultiFactorAuthPresent`. An omitted value means `true`.
    pub fn if_aws_multi_factor_auth_present(&mut self, value: Option<bool>) -> &mut Self {
        self.add_bool_condition("aws:MultiFactorAuthPresent", value, None)
    }

    global_key!(if_aws_principal_account, "aws:PrincipalAccount", condop::StringLike.into());

    global_key!(
        /// `aws:PrincipalArn`: the ARN of the principal making the request.
        if_aws_principal_arn,
        "aws:PrincipalArn",
        condop::ArnLike.into()
    );

    global_key!(if_aws_principal_org_id, "aws:PrincipalOrgID", condop::StringLike.into());
    global_key!(if_aws_principal_org_paths, "aws:PrincipalOrgPaths", condop::StringLike.into());

    global_tag_key!(
        /// `aws:PrincipalTag/<tag>`: a tag attached to the requesting principal.
        if_aws_principal_tag,
        "aws:PrincipalTag"
    );

    global_key!(if_aws_principal_type, "aws:PrincipalType", condop::StringLike.into());
    global_key!(if_aws_referer, "aws:Referer", condop::StringLike.into());
    global_key!(if_aws_requested_region, "aws:RequestedRegion", condop::StringLike.into());

    global_tag_key!(
        /// `aws:RequestTag/<tag>`: a tag passed in the request.
        if_aws_request_tag,
        "aws:RequestTag"
    );

    global_tag_key!(
        /// `aws:ResourceTag/<tag>`: a tag attached to the resource.
        if_aws_resource_tag,
        "aws:ResourceTag"
    );

    /// `aws:SecureTransport`: whether the request was sent over TLS. An omitted value means `true`.
    pub fn if_aws_secure_transport(&mut self, value: Option<bool>) -> &mut Self {
        self.add_bool_condition("aws:SecureTransport", value, None)
    }

    global_key!(if_aws_source_account, "aws:SourceAccount", condop::StringLike.into());

    global_key!(
        /// `aws:SourceArn`: the ARN of the resource making a service-to-service request.
        if_aws_source_arn,
        "aws:SourceArn",
        condop::ArnLike.into()
    );

    global_key!(
        /// `aws:SourceIp`: the requester's IP address. Pass `ipnet::IpNet` values or CIDR strings.
        if_aws_source_ip,
        "aws:SourceIp",
        condop::IpAddress.into()
    );

    global_key!(if_aws_source_vpc, "aws:SourceVpc", condop::StringLike.into());
    global_key!(if_aws_source_vpce, "aws:SourceVpce", condop::StringLike.into());
    global_key!(if_aws_tag_keys, "aws:TagKeys", condop::StringLike.into());

    global_key!(
        /// `aws:TokenIssueTime`: when the temporary security credentials were issued.
        if_aws_token_issue_time,
        "aws:TokenIssueTime",
        condop::DateGreaterThanEquals.into()
    );

    global_key!(if_aws_user_agent, "aws:UserAgent", condop::StringLike.into());
    global_key!(if_aws_userid, "aws:userid", condop::StringLike.into());
    global_key!(if_aws_username, "aws:username", condop::StringLike.into());

    /// `aws:ViaAWSService`: whether a service made the request on the principal's behalf. An omitted value means
    /// `true`.
    pub fn if_aws_via_aws_service(&mut self, value: Option<bool>) -> &mut Self {
        self.add_bool_condition("aws:ViaAWSService", value, None)
    }

    global_key!(
        /// `aws:VpcSourceIp`: the requester's IP address within a VPC.
        if_aws_vpc_source_ip,
        "aws:VpcSourceIp",
        condop::IpAddress.into()
    );
}

#[cfg(test)]
mod tests {
    use {
        crate::{condop, Operator, PolicyStatement},
        chrono::{TimeZone, Utc},
        indoc::indoc,
        ipnet::IpNet,
        pretty_assertions::assert_eq,
        std::str::FromStr,
    };

    #[test_log::test]
    fn test_default_operators() {
        let mut stmt = PolicyStatement::new();
        stmt.to("s3:GetObject")
            .unwrap()
            .if_aws_called_via(["athena.amazonaws.com"], None)
            .if_aws_multi_factor_auth_age(3600i64, None)
            .if_aws_principal_arn("arn:aws:iam::123456789012:role/*", None)
            .if_aws_source_ip(IpNet::from_str("203.0.113.0/24").unwrap(), None)
            .if_aws_current_time(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(), None)
            .if_aws_token_issue_time("2020-01-01T00:00:00Z", None)
            .if_aws_username("alice", Some(condop::StringEquals.into()));

        let c = stmt.condition();
        assert_eq!(c.get("aws:CalledVia").unwrap().0, Operator::for_any_value(condop::StringEquals));
        assert_eq!(c.get("aws:MultiFactorAuthAge").unwrap().0, Operator::from(condop::NumericLessThan));
        assert_eq!(c.get("aws:PrincipalArn").unwrap().0, Operator::from(condop::ArnLike));
        assert_eq!(c.get("aws:SourceIp").unwrap().0, Operator::from(condop::IpAddress));
        assert_eq!(
            c.get("aws:CurrentTime"),
            Some((Operator::from(condop::DateLessThanEquals), &["2030-01-01T00:00:00.000Z".to_string()][..]))
        );
        assert_eq!(c.get("aws:TokenIssueTime").unwrap().0, Operator::from(condop::DateGreaterThanEquals));
        assert_eq!(c.get("aws:username").unwrap().0, Operator::from(condop::StringEquals));
    }

    #[test_log::test]
    fn test_bool_keys() {
        let mut stmt = PolicyStatement::new();
        stmt.deny()
            .to("*")
            .unwrap()
            .if_aws_secure_transport(Some(false))
            .if_aws_multi_factor_auth_present(None)
            .if_aws_via_aws_service(None);

        assert_eq!(
            stmt.to_string(),
            indoc! { r#"
                {
                    "Effect": "Deny",
                    "Action": [
                        "*"
                    ],
                    "Resource": [
                        "*"
                    ],
                    "Condition": {
                        "Bool": {
                            "aws:MultiFactorAuthPresent": [
                                "true"
                            ],
                            "aws:SecureTransport": [
                                "false"
                            ],
                            "aws:ViaAWSService": [
                                "true"
                            ]
                        }
                    }
                }"# }
        );
    }

    #[test_log::test]
    fn test_tag_keys() {
        let mut stmt = PolicyStatement::new();
        stmt.if_aws_request_tag("team", "blue", None)
            .if_aws_resource_tag("team", ["blue", "green"], Some(condop::StringEquals.into()))
            .if_aws_principal_tag("dept", "eng", None)
            .if_aws_tag_keys(["team"], Some(Operator::for_all_values(condop::StringEquals)));

        let c = stmt.condition();
        assert_eq!(c.get("aws:RequestTag/team").unwrap().0, Operator::from(condop::StringLike));
        assert_eq!(c.get("aws:ResourceTag/team").unwrap().1.len(), 2);
        assert!(c.contains_key("aws:PrincipalTag/dept"));
        assert_eq!(c.get("aws:TagKeys").unwrap().0, Operator::for_all_values(condop::StringEquals));
    }
}
