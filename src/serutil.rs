use {
    serde::de::{self, value, Deserialize, Deserializer, IntoDeserializer, MapAccess, SeqAccess, Visitor},
    std::{
        fmt::{Formatter, Result as FmtResult},
        marker::PhantomData,
    },
};

/// Implement Display for a given class by formatting it as pretty-printed JSON.
#[macro_export]
macro_rules! display_json {
    ($cls:ident) => {
        impl std::fmt::Display for $cls {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                let buf = Vec::new();
                let serde_formatter = ::serde_json::ser::PrettyFormatter::with_indent(b"    ");
                let mut ser = ::serde_json::Serializer::with_formatter(buf, serde_formatter);
                if let Err(e) = ::serde::Serialize::serialize(self, &mut ser) {
                    ::log::error!("Failed to serialize {}: {}", stringify!($cls), e);
                    return Err(::std::fmt::Error {});
                }
                match std::str::from_utf8(&ser.into_inner()) {
                    Ok(s) => f.write_str(s),
                    Err(e) => {
                        ::log::error!("JSON serialization contained non-UTF-8 characters: {}", e);
                        Err(::std::fmt::Error {})
                    }
                }
            }
        }
    };
}

/// Implement FromStr for a given class by parsing it as JSON.
#[macro_export]
macro_rules! from_str_json {
    ($cls:ident) => {
        impl ::std::str::FromStr for $cls {
            type Err = ::serde_json::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ::serde_json::from_str::<Self>(s).map_err(|e| {
                    ::log::debug!("Failed to parse {}: {}: {:?}", stringify!($cls), s, e);
                    e
                })
            }
        }
    };
}

/// Deserialize a JSON field that may hold either a single element or a list of elements.
///
/// IAM allows `"Action": "s3:GetObject"` as shorthand for `"Action": ["s3:GetObject"]`; both forms are accepted
/// here and normalized into a vector.
pub(crate) fn deserialize_one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    deserializer.deserialize_any(OneOrManyVisitor {
        phantom: PhantomData,
    })
}

/// A list read with [deserialize_one_or_many], for use with `MapAccess::next_value`.
pub(crate) struct OneOrMany<T>(pub(crate) Vec<T>);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OneOrMany<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_one_or_many(deserializer).map(OneOrMany)
    }
}

struct OneOrManyVisitor<T> {
    phantom: PhantomData<T>,
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for OneOrManyVisitor<T> {
    type Value = Vec<T>;

    fn expecting(&self, f: &mut Formatter) -> FmtResult {
        f.write_str("element or list of elements")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let d: value::StrDeserializer<'_, E> = v.into_deserializer();
        Ok(vec![T::deserialize(d)?])
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        let d: value::BoolDeserializer<E> = v.into_deserializer();
        Ok(vec![T::deserialize(d)?])
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        let d: value::I64Deserializer<E> = v.into_deserializer();
        Ok(vec![T::deserialize(d)?])
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let d: value::U64Deserializer<E> = v.into_deserializer();
        Ok(vec![T::deserialize(d)?])
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        let d: value::F64Deserializer<E> = v.into_deserializer();
        Ok(vec![T::deserialize(d)?])
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> Result<Self::Value, A::Error> {
        Ok(vec![T::deserialize(value::MapAccessDeserializer::new(access))?])
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut result = match access.size_hint() {
            Some(size) => Vec::with_capacity(size),
            None => Vec::new(),
        };

        while let Some(item) = access.next_element::<T>()? {
            result.push(item);
        }

        Ok(result)
    }
}

/// A condition value as it appears in policy JSON. IAM accepts booleans and numbers in place of their string
/// representation; they are kept as strings, which is how the IAM console renders them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ScalarString(pub(crate) String);

struct ScalarStringVisitor;

impl<'de> Visitor<'de> for ScalarStringVisitor {
    type Value = ScalarString;

    fn expecting(&self, f: &mut Formatter) -> FmtResult {
        f.write_str("a string, boolean, or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ScalarString(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ScalarString(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ScalarString(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ScalarString(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(ScalarString(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for ScalarString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarStringVisitor)
    }
}
