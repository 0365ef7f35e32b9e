use {
    super::{op::consts, operator::Operator},
    chrono::{DateTime, SecondsFormat, Utc},
    ipnet::IpNet,
    std::net::IpAddr,
};

/// What kind of value a [ConditionValues] was built from. Decides the default operator.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValueKind {
    String,
    Bool,
    Numeric,
    Date,
    IpAddress,
    Binary,
}

impl ValueKind {
    pub fn default_operator(self) -> Operator {
        match self {
            Self::String => consts::StringLike,
            Self::Bool => consts::Bool,
            Self::Numeric => consts::NumericEquals,
            Self::Date => consts::DateEquals,
            Self::IpAddress => consts::IpAddress,
            Self::Binary => consts::BinaryEquals,
        }
        .into()
    }
}

/// One or more condition values, already rendered the way IAM expects them in policy JSON.
///
/// Booleans and numbers become their string representations (this is what the IAM console emits), dates become
/// ISO 8601 timestamps in UTC with millisecond precision, and binary data is base64 encoded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConditionValues {
    kind: ValueKind,
    values: Vec<String>,
}

impl ConditionValues {
    pub fn new<I, S>(kind: ValueKind, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Base64-encoded binary data for the `BinaryEquals` operator.
    pub fn binary<B: AsRef<[u8]>>(data: B) -> Self {
        Self::new(ValueKind::Binary, [base64::encode(data)])
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    #[inline]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn into_values(self) -> Vec<String> {
        self.values
    }

    #[inline]
    pub fn default_operator(&self) -> Operator {
        self.kind.default_operator()
    }
}

fn format_date(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<&str> for ConditionValues {
    fn from(v: &str) -> Self {
        Self::new(ValueKind::String, [v])
    }
}

impl From<String> for ConditionValues {
    fn from(v: String) -> Self {
        Self::new(ValueKind::String, [v])
    }
}

impl From<&String> for ConditionValues {
    fn from(v: &String) -> Self {
        Self::new(ValueKind::String, [v.as_str()])
    }
}

impl From<Vec<String>> for ConditionValues {
    fn from(v: Vec<String>) -> Self {
        Self::new(ValueKind::String, v)
    }
}

impl From<Vec<&str>> for ConditionValues {
    fn from(v: Vec<&str>) -> Self {
        Self::new(ValueKind::String, v)
    }
}

impl From<&[&str]> for ConditionValues {
    fn from(v: &[&str]) -> Self {
        Self::new(ValueKind::String, v.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for ConditionValues {
    fn from(v: [&str; N]) -> Self {
        Self::new(ValueKind::String, v)
    }
}

impl From<bool> for ConditionValues {
    fn from(v: bool) -> Self {
        Self::new(ValueKind::Bool, [v.to_string()])
    }
}

macro_rules! numeric_values {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ConditionValues {
                fn from(v: $t) -> Self {
                    Self::new(ValueKind::Numeric, [v.to_string()])
                }
            }

            impl From<Vec<$t>> for ConditionValues {
                fn from(v: Vec<$t>) -> Self {
                    Self::new(ValueKind::Numeric, v.iter().map(ToString::to_string))
                }
            }
        )*
    };
}

numeric_values!(i32, i64, u32, u64, f64);

impl From<DateTime<Utc>> for ConditionValues {
    fn from(v: DateTime<Utc>) -> Self {
        Self::new(ValueKind::Date, [format_date(&v)])
    }
}

impl From<Vec<DateTime<Utc>>> for ConditionValues {
    fn from(v: Vec<DateTime<Utc>>) -> Self {
        Self::new(ValueKind::Date, v.iter().map(format_date))
    }
}

impl From<IpAddr> for ConditionValues {
    fn from(v: IpAddr) -> Self {
        Self::new(ValueKind::IpAddress, [v.to_string()])
    }
}

impl From<IpNet> for ConditionValues {
    fn from(v: IpNet) -> Self {
        Self::new(ValueKind::IpAddress, [v.to_string()])
    }
}

impl From<Vec<IpNet>> for ConditionValues {
    fn from(v: Vec<IpNet>) -> Self {
        Self::new(ValueKind::IpAddress, v.iter().map(ToString::to_string))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{ConditionValues, ValueKind},
        crate::{condop, Operator},
        chrono::{TimeZone, Utc},
        ipnet::IpNet,
        pretty_assertions::assert_eq,
        std::{
            net::{IpAddr, Ipv4Addr},
            str::FromStr,
        },
    };

    #[test_log::test]
    fn test_strings() {
        let v = ConditionValues::from("MyQueue");
        assert_eq!(v.kind(), ValueKind::String);
        assert_eq!(v.values(), &["MyQueue".to_string()]);
        assert_eq!(v.default_operator(), Operator::from(condop::StringLike));

        let v = ConditionValues::from(["a", "b"]);
        assert_eq!(v.into_values(), vec!["a".to_string(), "b".to_string()]);

        let v = ConditionValues::from(vec!["x".to_string()]);
        assert_eq!(v.values().len(), 1);
    }

    #[test_log::test]
    fn test_scalars_rendered_as_strings() {
        let v = ConditionValues::from(true);
        assert_eq!(v.values(), &["true".to_string()]);
        assert_eq!(v.default_operator(), Operator::from(condop::Bool));

        let v = ConditionValues::from(3600i64);
        assert_eq!(v.values(), &["3600".to_string()]);
        assert_eq!(v.default_operator(), Operator::from(condop::NumericEquals));

        let v = ConditionValues::from(vec![1.5f64, 2.0]);
        assert_eq!(v.values(), &["1.5".to_string(), "2".to_string()]);
    }

    #[test_log::test]
    fn test_dates() {
        let dt = Utc.with_ymd_and_hms(2019, 7, 16, 12, 0, 0).unwrap();
        let v = ConditionValues::from(dt);
        assert_eq!(v.values(), &["2019-07-16T12:00:00.000Z".to_string()]);
        assert_eq!(v.default_operator(), Operator::from(condop::DateEquals));
    }

    #[test_log::test]
    fn test_ip() {
        let v = ConditionValues::from(IpNet::from_str("203.0.113.0/24").unwrap());
        assert_eq!(v.values(), &["203.0.113.0/24".to_string()]);
        assert_eq!(v.default_operator(), Operator::from(condop::IpAddress));

        let v = ConditionValues::from(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)));
        assert_eq!(v.values(), &["192.0.2.1".to_string()]);
    }

    #[test_log::test]
    fn test_binary() {
        let v = ConditionValues::binary(b"hello");
        assert_eq!(v.values(), &["aGVsbG8=".to_string()]);
        assert_eq!(v.default_operator(), Operator::from(condop::BinaryEquals));
    }
}
