use {
    super::op::ConditionOp,
    crate::IamError,
    log::debug,
    serde::{de, de::Deserializer, ser::Serializer, Deserialize, Serialize},
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// Set qualifier for multivalued condition keys.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SetQualifier {
    ForAllValues,
    ForAnyValue,
}

impl SetQualifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForAllValues => "ForAllValues",
            Self::ForAnyValue => "ForAnyValue",
        }
    }
}

impl Display for SetQualifier {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// The operator key of a condition block: a [ConditionOp], optionally qualified with `ForAllValues:` or
/// `ForAnyValue:`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Operator {
    qualifier: Option<SetQualifier>,
    op: ConditionOp,
}

impl Operator {
    /// `op` is stored in its [ConditionOp::canonical] form, so operators that render the same compare equal.
    #[inline]
    pub fn new(qualifier: Option<SetQualifier>, op: ConditionOp) -> Self {
        Self {
            qualifier,
            op: op.canonical(),
        }
    }

    /// `ForAllValues:<op>`
    #[inline]
    pub fn for_all_values(op: ConditionOp) -> Self {
        Self::new(Some(SetQualifier::ForAllValues), op)
    }

    /// `ForAnyValue:<op>`
    #[inline]
    pub fn for_any_value(op: ConditionOp) -> Self {
        Self::new(Some(SetQualifier::ForAnyValue), op)
    }

    #[inline]
    pub fn qualifier(&self) -> Option<SetQualifier> {
        self.qualifier
    }

    #[inline]
    pub fn op(&self) -> ConditionOp {
        self.op
    }

    /// The same operator with its `...IfExists` form.
    pub fn if_exists(self) -> Self {
        Self::new(self.qualifier, self.op.if_exists())
    }
}

impl From<ConditionOp> for Operator {
    fn from(op: ConditionOp) -> Self {
        Self::new(None, op)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self.qualifier {
            Some(q) => write!(f, "{}:{}", q, self.op),
            None => Display::fmt(&self.op, f),
        }
    }
}

impl FromStr for Operator {
    type Err = IamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (qualifier, op) = match s.split_once(':') {
            None => (None, s),
            Some(("ForAllValues", op)) => (Some(SetQualifier::ForAllValues), op),
            Some(("ForAnyValue", op)) => (Some(SetQualifier::ForAnyValue), op),
            Some(_) => {
                debug!("Unknown set qualifier in condition operator: {}", s);
                return Err(IamError::InvalidConditionOperator(s.to_string()));
            }
        };

        match ConditionOp::from_str(op) {
            Ok(op) => Ok(Self::new(qualifier, op)),
            Err(_) => Err(IamError::InvalidConditionOperator(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Operator::from_str(&s).map_err(de::Error::custom)
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{Operator, SetQualifier},
        crate::{condop, IamError},
        pretty_assertions::assert_eq,
        std::str::FromStr,
    };

    #[test_log::test]
    fn test_parse_qualified() {
        let op = Operator::from_str("ForAnyValue:StringEquals").unwrap();
        assert_eq!(op, Operator::for_any_value(condop::StringEquals));
        assert_eq!(op.qualifier(), Some(SetQualifier::ForAnyValue));
        assert_eq!(op.op(), condop::StringEquals);
        assert_eq!(op.to_string(), "ForAnyValue:StringEquals");

        let op = Operator::from_str("ForAllValues:StringLikeIfExists").unwrap();
        assert_eq!(op, Operator::for_all_values(condop::StringLike).if_exists());

        let op = Operator::from_str("DateGreaterThan").unwrap();
        assert_eq!(op, Operator::from(condop::DateGreaterThan));
        assert_eq!(op.qualifier(), None);
        assert_eq!(op.to_string(), "DateGreaterThan");
    }

    #[test_log::test]
    fn test_parse_bad() {
        for bad in ["ForSomeValues:StringEquals", "ForAnyValue:Sorta", "ForAnyValue:", "", "StringEquals:"] {
            assert_eq!(Operator::from_str(bad).unwrap_err(), IamError::InvalidConditionOperator(bad.to_string()));
        }
    }

    #[test_log::test]
    fn test_ordering() {
        let mut ops = vec![
            Operator::for_any_value(condop::StringEquals),
            Operator::from(condop::StringLike),
            Operator::from(condop::ArnLike),
            Operator::for_all_values(condop::StringEquals),
        ];
        ops.sort();
        assert_eq!(
            ops.iter().map(|op| op.to_string()).collect::<Vec<_>>(),
            vec!["ArnLike", "StringLike", "ForAllValues:StringEquals", "ForAnyValue:StringEquals"]
        );
    }

    #[test_log::test]
    fn test_serde() {
        let op: Operator = serde_json::from_str(r#""ForAllValues:ArnLike""#).unwrap();
        assert_eq!(serde_json::to_string(&op).unwrap(), r#""ForAllValues:ArnLike""#);
    }
}
