use {
    super::variant::Variant,
    crate::IamError,
    serde::{de, de::Deserializer, ser::Serializer, Deserialize, Serialize},
    std::{
        borrow::Borrow,
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

// Each comparison's discriminant is the base index of its block in the name table. Within a block, the order is
// plain, if-exists, negated, negated if-exists, so `cmp | variant` indexes the name directly.

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum ArnCmp {
    Equals = 0,
    Like = 4,
}

const ARN_DISPLAY_NAMES: [&str; 8] = [
    "ArnEquals",
    "ArnEqualsIfExists",
    "ArnNotEquals",
    "ArnNotEqualsIfExists",
    "ArnLike",
    "ArnLikeIfExists",
    "ArnNotLike",
    "ArnNotLikeIfExists",
];

/// Date comparisons. `LessThan` negated is `GreaterThanEquals`; `LessThanEquals` negated is `GreaterThan`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum DateCmp {
    Equals = 0,
    LessThan = 4,
    LessThanEquals = 8,
}

const DATE_DISPLAY_NAMES: [&str; 12] = [
    "DateEquals",
    "DateEqualsIfExists",
    "DateNotEquals",
    "DateNotEqualsIfExists",
    "DateLessThan",
    "DateLessThanIfExists",
    "DateGreaterThanEquals",
    "DateGreaterThanEqualsIfExists",
    "DateLessThanEquals",
    "DateLessThanEqualsIfExists",
    "DateGreaterThan",
    "DateGreaterThanIfExists",
];

/// Numeric comparisons, negated the same way as [DateCmp].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum NumericCmp {
    Equals = 0,
    LessThan = 4,
    LessThanEquals = 8,
}

const NUMERIC_DISPLAY_NAMES: [&str; 12] = [
    "NumericEquals",
    "NumericEqualsIfExists",
    "NumericNotEquals",
    "NumericNotEqualsIfExists",
    "NumericLessThan",
    "NumericLessThanIfExists",
    "NumericGreaterThanEquals",
    "NumericGreaterThanEqualsIfExists",
    "NumericLessThanEquals",
    "NumericLessThanEqualsIfExists",
    "NumericGreaterThan",
    "NumericGreaterThanIfExists",
];

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum StringCmp {
    Equals = 0,
    EqualsIgnoreCase = 4,
    Like = 8,
}

const STRING_DISPLAY_NAMES: [&str; 12] = [
    "StringEquals",
    "StringEqualsIfExists",
    "StringNotEquals",
    "StringNotEqualsIfExists",
    "StringEqualsIgnoreCase",
    "StringEqualsIgnoreCaseIfExists",
    "StringNotEqualsIgnoreCase",
    "StringNotEqualsIgnoreCaseIfExists",
    "StringLike",
    "StringLikeIfExists",
    "StringNotLike",
    "StringNotLikeIfExists",
];

const BINARY_DISPLAY_NAMES: [&str; 2] = ["BinaryEquals", "BinaryEqualsIfExists"];
const BOOL_DISPLAY_NAMES: [&str; 2] = ["Bool", "BoolIfExists"];
const IP_ADDRESS_DISPLAY_NAMES: [&str; 4] = ["IpAddress", "IpAddressIfExists", "NotIpAddress", "NotIpAddressIfExists"];
const NULL_DISPLAY_NAME: &str = "Null";

/// An operator for a condition clause.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ConditionOp {
    /// Operators for ARNs.
    Arn(ArnCmp, Variant),

    /// Operators for binary values. IAM has no negated form; a negated variant is treated as its plain form.
    Binary(Variant),

    /// Operators on boolean values. IAM has no negated form; a negated variant is treated as its plain form.
    Bool(Variant),

    /// Operators for date/time values.
    Date(DateCmp, Variant),

    /// Operators on IP addresses and networks.
    IpAddress(Variant),

    /// Operator on the presence/absence of a value.
    Null,

    /// Operators on numeric values.
    Numeric(NumericCmp, Variant),

    /// Operators on string values.
    String(StringCmp, Variant),
}

impl ConditionOp {
    /// The `...IfExists` form of this operator. `Null` has no such form and is returned unchanged.
    pub fn if_exists(self) -> Self {
        match self {
            Self::Arn(cmp, v) => Self::Arn(cmp, v.with_if_exists()),
            Self::Binary(v) => Self::Binary(v.with_if_exists()),
            Self::Bool(v) => Self::Bool(v.with_if_exists()),
            Self::Date(cmp, v) => Self::Date(cmp, v.with_if_exists()),
            Self::IpAddress(v) => Self::IpAddress(v.with_if_exists()),
            Self::Null => Self::Null,
            Self::Numeric(cmp, v) => Self::Numeric(cmp, v.with_if_exists()),
            Self::String(cmp, v) => Self::String(cmp, v.with_if_exists()),
        }
    }

    /// The operator with the negation dropped from `Bool` and `Binary`, which have no negated name. Two operators
    /// with the same name are equal after this.
    pub fn canonical(self) -> Self {
        match self {
            Self::Binary(v) if v.negated() => Self::Binary(v.without_negation()),
            Self::Bool(v) if v.negated() => Self::Bool(v.without_negation()),
            other => other,
        }
    }
}

#[allow(non_upper_case_globals)]
pub mod consts {
    use super::{ArnCmp, ConditionOp, DateCmp, NumericCmp, StringCmp, Variant};

    /// The `ArnEquals` operator.
    pub const ArnEquals: ConditionOp = ConditionOp::Arn(ArnCmp::Equals, Variant::None);

    /// The `ArnEqualsIfExists` operator.
    pub const ArnEqualsIfExists: ConditionOp = ConditionOp::Arn(ArnCmp::Equals, Variant::IfExists);

    /// The `ArnNotEquals` operator.
    pub const ArnNotEquals: ConditionOp = ConditionOp::Arn(ArnCmp::Equals, Variant::Negated);

    /// The `ArnNotEqualsIfExists` operator.
    pub const ArnNotEqualsIfExists: ConditionOp = ConditionOp::Arn(ArnCmp::Equals, Variant::IfExistsNegated);

    /// The `ArnLike` operator.
    pub const ArnLike: ConditionOp = ConditionOp::Arn(ArnCmp::Like, Variant::None);

    /// The `ArnLikeIfExists` operator.
    pub const ArnLikeIfExists: ConditionOp = ConditionOp::Arn(ArnCmp::Like, Variant::IfExists);

    /// The `ArnNotLike` operator.
    pub const ArnNotLike: ConditionOp = ConditionOp::Arn(ArnCmp::Like, Variant::Negated);

    /// The `ArnNotLikeIfExists` operator.
    pub const ArnNotLikeIfExists: ConditionOp = ConditionOp::Arn(ArnCmp::Like, Variant::IfExistsNegated);

    /// The `BinaryEquals` operator.
    pub const BinaryEquals: ConditionOp = ConditionOp::Binary(Variant::None);

    /// The `BinaryEqualsIfExists` operator.
    pub const BinaryEqualsIfExists: ConditionOp = ConditionOp::Binary(Variant::IfExists);

    /// The `Bool` operator.
    pub const Bool: ConditionOp = ConditionOp::Bool(Variant::None);

    /// The `BoolIfExists` operator.
    pub const BoolIfExists: ConditionOp = ConditionOp::Bool(Variant::IfExists);

    /// The `DateEquals` operator.
    pub const DateEquals: ConditionOp = ConditionOp::Date(DateCmp::Equals, Variant::None);

    /// The `DateEqualsIfExists` operator.
    pub const DateEqualsIfExists: ConditionOp = ConditionOp::Date(DateCmp::Equals, Variant::IfExists);

    /// The `DateNotEquals` operator.
    pub const DateNotEquals: ConditionOp = ConditionOp::Date(DateCmp::Equals, Variant::Negated);

    /// The `DateNotEqualsIfExists` operator.
    pub const DateNotEqualsIfExists: ConditionOp = ConditionOp::Date(DateCmp::Equals, Variant::IfExistsNegated);

    /// The `DateLessThan` operator.
    pub const DateLessThan: ConditionOp = ConditionOp::Date(DateCmp::LessThan, Variant::None);

    /// The `DateLessThanIfExists` operator.
    pub const DateLessThanIfExists: ConditionOp = ConditionOp::Date(DateCmp::LessThan, Variant::IfExists);

    /// The `DateGreaterThanEquals` operator.
    pub const DateGreaterThanEquals: ConditionOp = ConditionOp::Date(DateCmp::LessThan, Variant::Negated);

    /// The `DateGreaterThanEqualsIfExists` operator.
    pub const DateGreaterThanEqualsIfExists: ConditionOp =
        ConditionOp::Date(DateCmp::LessThan, Variant::IfExistsNegated);

    /// The `DateLessThanEquals` operator.
    pub const DateLessThanEquals: ConditionOp = ConditionOp::Date(DateCmp::LessThanEquals, Variant::None);

    /// The `DateLessThanEqualsIfExists` operator.
    pub const DateLessThanEqualsIfExists: ConditionOp =
        ConditionOp::Date(DateCmp::LessThanEquals, Variant::IfExists);

    /// The `DateGreaterThan` operator.
    pub const DateGreaterThan: ConditionOp = ConditionOp::Date(DateCmp::LessThanEquals, Variant::Negated);

    /// The `DateGreaterThanIfExists` operator.
    pub const DateGreaterThanIfExists: ConditionOp =
        ConditionOp::Date(DateCmp::LessThanEquals, Variant::IfExistsNegated);

    /// The `IpAddress` operator.
    pub const IpAddress: ConditionOp = ConditionOp::IpAddress(Variant::None);

    /// The `IpAddressIfExists` operator.
    pub const IpAddressIfExists: ConditionOp = ConditionOp::IpAddress(Variant::IfExists);

    /// The `NotIpAddress` operator.
    pub const NotIpAddress: ConditionOp = ConditionOp::IpAddress(Variant::Negated);

    /// The `NotIpAddressIfExists` operator.
    pub const NotIpAddressIfExists: ConditionOp = ConditionOp::IpAddress(Variant::IfExistsNegated);

    /// The `Null` operator.
    pub const Null: ConditionOp = ConditionOp::Null;

    /// The `NumericEquals` operator.
    pub const NumericEquals: ConditionOp = ConditionOp::Numeric(NumericCmp::Equals, Variant::None);

    /// The `NumericEqualsIfExists` operator.
    pub const NumericEqualsIfExists: ConditionOp = ConditionOp::Numeric(NumericCmp::Equals, Variant::IfExists);

    /// The `NumericNotEquals` operator.
    pub const NumericNotEquals: ConditionOp = ConditionOp::Numeric(NumericCmp::Equals, Variant::Negated);

    /// The `NumericNotEqualsIfExists` operator.
    pub const NumericNotEqualsIfExists: ConditionOp =
        ConditionOp::Numeric(NumericCmp::Equals, Variant::IfExistsNegated);

    /// The `NumericLessThan` operator.
    pub const NumericLessThan: ConditionOp = ConditionOp::Numeric(NumericCmp::LessThan, Variant::None);

    /// The `NumericLessThanIfExists` operator.
    pub const NumericLessThanIfExists: ConditionOp = ConditionOp::Numeric(NumericCmp::LessThan, Variant::IfExists);

    /// The `NumericGreaterThanEquals` operator.
    pub const NumericGreaterThanEquals: ConditionOp = ConditionOp::Numeric(NumericCmp::LessThan, Variant::Negated);

    /// The `NumericGreaterThanEqualsIfExists` operator.
    pub const NumericGreaterThanEqualsIfExists: ConditionOp =
        ConditionOp::Numeric(NumericCmp::LessThan, Variant::IfExistsNegated);

    /// The `NumericLessThanEquals` operator.
    pub const NumericLessThanEquals: ConditionOp = ConditionOp::Numeric(NumericCmp::LessThanEquals, Variant::None);

    /// The `NumericLessThanEqualsIfExists` operator.
    pub const NumericLessThanEqualsIfExists: ConditionOp =
        ConditionOp::Numeric(NumericCmp::LessThanEquals, Variant::IfExists);

    /// The `NumericGreaterThan` operator.
    pub const NumericGreaterThan: ConditionOp = ConditionOp::Numeric(NumericCmp::LessThanEquals, Variant::Negated);

    /// The `NumericGreaterThanIfExists` operator.
    pub const NumericGreaterThanIfExists: ConditionOp =
        ConditionOp::Numeric(NumericCmp::LessThanEquals, Variant::IfExistsNegated);

    /// The `StringEquals` operator.
    pub const StringEquals: ConditionOp = ConditionOp::String(StringCmp::Equals, Variant::None);

    /// The `StringEqualsIfExists` operator.
    pub const StringEqualsIfExists: ConditionOp = ConditionOp::String(StringCmp::Equals, Variant::IfExists);

    /// The `StringNotEquals` operator.
    pub const StringNotEquals: ConditionOp = ConditionOp::String(StringCmp::Equals, Variant::Negated);

    /// The `StringNotEqualsIfExists` operator.
    pub const StringNotEqualsIfExists: ConditionOp = ConditionOp::String(StringCmp::Equals, Variant::IfExistsNegated);

    /// The `StringEqualsIgnoreCase` operator.
    pub const StringEqualsIgnoreCase: ConditionOp = ConditionOp::String(StringCmp::EqualsIgnoreCase, Variant::None);

    /// The `StringEqualsIgnoreCaseIfExists` operator.
    pub const StringEqualsIgnoreCaseIfExists: ConditionOp =
        ConditionOp::String(StringCmp::EqualsIgnoreCase, Variant::IfExists);

    /// The `StringNotEqualsIgnoreCase` operator.
    pub const StringNotEqualsIgnoreCase: ConditionOp =
        ConditionOp::String(StringCmp::EqualsIgnoreCase, Variant::Negated);

    /// The `StringNotEqualsIgnoreCaseIfExists` operator.
    pub const StringNotEqualsIgnoreCaseIfExists: ConditionOp =
        ConditionOp::String(StringCmp::EqualsIgnoreCase, Variant::IfExistsNegated);

    /// The `StringLike` operator.
    pub const StringLike: ConditionOp = ConditionOp::String(StringCmp::Like, Variant::None);

    /// The `StringLikeIfExists` operator.
    pub const StringLikeIfExists: ConditionOp = ConditionOp::String(StringCmp::Like, Variant::IfExists);

    /// The `StringNotLike` operator.
    pub const StringNotLike: ConditionOp = ConditionOp::String(StringCmp::Like, Variant::Negated);

    /// The `StringNotLikeIfExists` operator.
    pub const StringNotLikeIfExists: ConditionOp = ConditionOp::String(StringCmp::Like, Variant::IfExistsNegated);

    /// Every operator, in display-name order.
    pub(crate) const ALL: [ConditionOp; 53] = [
        ArnEquals,
        ArnEqualsIfExists,
        ArnLike,
        ArnLikeIfExists,
        ArnNotEquals,
        ArnNotEqualsIfExists,
        ArnNotLike,
        ArnNotLikeIfExists,
        BinaryEquals,
        BinaryEqualsIfExists,
        Bool,
        BoolIfExists,
        DateEquals,
        DateEqualsIfExists,
        DateGreaterThan,
        DateGreaterThanEquals,
        DateGreaterThanEqualsIfExists,
        DateGreaterThanIfExists,
        DateLessThan,
        DateLessThanEquals,
        DateLessThanEqualsIfExists,
        DateLessThanIfExists,
        DateNotEquals,
        DateNotEqualsIfExists,
        IpAddress,
        IpAddressIfExists,
        NotIpAddress,
        NotIpAddressIfExists,
        Null,
        NumericEquals,
        NumericEqualsIfExists,
        NumericGreaterThan,
        NumericGreaterThanEquals,
        NumericGreaterThanEqualsIfExists,
        NumericGreaterThanIfExists,
        NumericLessThan,
        NumericLessThanEquals,
        NumericLessThanEqualsIfExists,
        NumericLessThanIfExists,
        NumericNotEquals,
        NumericNotEqualsIfExists,
        StringEquals,
        StringEqualsIfExists,
        StringEqualsIgnoreCase,
        StringEqualsIgnoreCaseIfExists,
        StringLike,
        StringLikeIfExists,
        StringNotEquals,
        StringNotEqualsIfExists,
        StringNotEqualsIgnoreCase,
        StringNotEqualsIgnoreCaseIfExists,
        StringNotLike,
        StringNotLikeIfExists,
    ];
}

impl Borrow<str> for ConditionOp {
    fn borrow(&self) -> &str {
        match self {
            Self::Arn(cmp, variant) => ARN_DISPLAY_NAMES[*cmp as usize | variant.as_usize()],
            Self::Binary(variant) => BINARY_DISPLAY_NAMES[variant.as_usize() & 1],
            Self::Bool(variant) => BOOL_DISPLAY_NAMES[variant.as_usize() & 1],
            Self::Date(cmp, variant) => DATE_DISPLAY_NAMES[*cmp as usize | variant.as_usize()],
            Self::IpAddress(variant) => IP_ADDRESS_DISPLAY_NAMES[variant.as_usize()],
            Self::Null => NULL_DISPLAY_NAME,
            Self::Numeric(cmp, variant) => NUMERIC_DISPLAY_NAMES[*cmp as usize | variant.as_usize()],
            Self::String(cmp, variant) => STRING_DISPLAY_NAMES[*cmp as usize | variant.as_usize()],
        }
    }
}

impl PartialEq<str> for ConditionOp {
    fn eq(&self, other: &str) -> bool {
        Borrow::<str>::borrow(self) == other
    }
}

impl Display for ConditionOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.borrow())
    }
}

impl<'de> Deserialize<'de> for ConditionOp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ConditionOp::from_str(&s).map_err(de::Error::custom)
    }
}

impl Serialize for ConditionOp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.borrow())
    }
}

impl FromStr for ConditionOp {
    type Err = IamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match consts::ALL.binary_search_by(|op| Borrow::<str>::borrow(op).cmp(s)) {
            Ok(i) => Ok(consts::ALL[i]),
            Err(_) => Err(IamError::InvalidConditionOperator(s.to_string())),
        }
    }
}
