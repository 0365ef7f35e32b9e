mod op;
mod operator;
mod values;
mod variant;

pub use {
    op::{consts, ArnCmp, ConditionOp, DateCmp, NumericCmp, StringCmp},
    operator::{Operator, SetQualifier},
    values::{ConditionValues, ValueKind},
    variant::Variant,
};

use {
    crate::{
        display_json, from_str_json,
        serutil::{deserialize_one_or_many, ScalarString},
    },
    serde::{
        de::{Deserializer, MapAccess, Visitor},
        ser::{SerializeMap, Serializer},
        Deserialize, Serialize,
    },
    std::{
        collections::{btree_map::Iter, BTreeMap},
        fmt::{Formatter, Result as FmtResult},
        iter::FromIterator,
        ops::Index,
    },
};

/// Condition keys and their values under a single operator.
pub type ConditionMap = BTreeMap<String, Vec<String>>;

/// The `Condition` element of a statement, grouped by operator as IAM expects:
/// `{"StringLike": {"sqs:queueName": ["MyQueue"]}}`.
///
/// [Condition::insert] keeps at most one entry per condition key: inserting a key that is already present, under any
/// operator, replaces the earlier entry. A condition parsed from JSON may carry the same key under several operators
/// (a date range, for example); that is preserved as written.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Condition {
    map: BTreeMap<Operator, ConditionMap>,
}

display_json!(Condition);
from_str_json!(Condition);

impl Condition {
    #[inline]
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Set `key` to `values` under `op`, replacing any previous entry for `key`. Returns the replaced entry.
    pub fn insert<K, V>(&mut self, key: K, op: Operator, values: V) -> Option<(Operator, Vec<String>)>
    where
        K: Into<String>,
        V: Into<Vec<String>>,
    {
        let key = key.into();
        let previous = self.remove(&key);
        self.map.entry(op).or_default().insert(key, values.into());
        previous
    }

    /// Remove `key` from every operator it appears under. Returns the first entry removed.
    pub fn remove(&mut self, key: &str) -> Option<(Operator, Vec<String>)> {
        let mut removed = None;

        for (op, cmap) in self.map.iter_mut() {
            if let Some(values) = cmap.remove(key) {
                if removed.is_none() {
                    removed = Some((*op, values));
                }
            }
        }

        self.map.retain(|_, cmap| !cmap.is_empty());
        removed
    }

    /// The operator and values for `key`, if present.
    pub fn get(&self, key: &str) -> Option<(Operator, &[String])> {
        self.map.iter().find_map(|(op, cmap)| cmap.get(key).map(|values| (*op, values.as_slice())))
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[inline]
    pub fn get_op(&self, op: &Operator) -> Option<&ConditionMap> {
        self.map.get(op)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The number of key entries across all operators.
    pub fn len(&self) -> usize {
        self.map.values().map(BTreeMap::len).sum()
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, Operator, ConditionMap> {
        self.map.iter()
    }

    #[inline]
    pub fn operators(&self) -> impl Iterator<Item = &Operator> {
        self.map.keys()
    }
}

impl Index<&Operator> for Condition {
    type Output = ConditionMap;

    fn index(&self, op: &Operator) -> &ConditionMap {
        &self.map[op]
    }
}

impl FromIterator<(Operator, ConditionMap)> for Condition {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (Operator, ConditionMap)>,
    {
        let mut map: BTreeMap<Operator, ConditionMap> = BTreeMap::new();
        for (op, cmap) in iter {
            map.entry(op).or_default().extend(cmap);
        }
        map.retain(|_, cmap| !cmap.is_empty());

        Self {
            map,
        }
    }
}

impl<const N: usize> From<[(Operator, ConditionMap); N]> for Condition {
    fn from(array: [(Operator, ConditionMap); N]) -> Self {
        array.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Condition {
    type Item = (&'a Operator, &'a ConditionMap);
    type IntoIter = Iter<'a, Operator, ConditionMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.map.len()))?;
        for (op, cmap) in &self.map {
            map.serialize_entry(op, cmap)?;
        }
        map.end()
    }
}

/// Values under a single key: a scalar or a list, strings or IAM-tolerated booleans and numbers.
struct KeyValues(Vec<String>);

impl<'de> Deserialize<'de> for KeyValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values: Vec<ScalarString> = deserialize_one_or_many(deserializer)?;
        Ok(KeyValues(values.into_iter().map(|s| s.0).collect()))
    }
}

struct ConditionVisitor;

impl<'de> Visitor<'de> for ConditionVisitor {
    type Value = Condition;

    fn expecting(&self, f: &mut Formatter) -> FmtResult {
        f.write_str("a map of condition operators to condition keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map: BTreeMap<Operator, ConditionMap> = BTreeMap::new();

        while let Some((op, keys)) = access.next_entry::<Operator, BTreeMap<String, KeyValues>>()? {
            let cmap = map.entry(op).or_default();
            for (key, values) in keys {
                cmap.insert(key, values.0);
            }
        }

        map.retain(|_, cmap| !cmap.is_empty());
        Ok(Condition {
            map,
        })
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ConditionVisitor)
    }
}
