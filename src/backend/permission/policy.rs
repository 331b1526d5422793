/**
 * Permission Policies
 *
 * A `PermissionPolicy` is one of five shapes:
 *
 * - `Open` - no policy configured; everything is allowed
 * - `Allowlist(ops)` - the listed operations are allowed, the rest denied
 * - `Predicates(map)` - a predicate per operation judges the target and body
 * - `Deny` - nothing is allowed
 * - `Computed(f)` - `f` builds one of the other shapes per request
 *
 * Predicates return a `Verdict`. For `read`, a predicate may return
 * `Verdict::Filter(records)` to narrow what the caller sees.
 */

use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::backend::permission::{Operation, PolicyTarget, RequestContext, UnknownOperation};
use crate::shared::record::value_identity_key;

/// What a predicate is given
#[derive(Debug, Clone, Copy)]
pub struct PredicateInput<'a> {
    /// The serialized collection or record
    pub target: &'a Value,
    /// The parsed request body, when the request has one
    pub body: Option<&'a Value>,
    pub context: &'a RequestContext,
}

/// Per-operation predicate
pub type Predicate = Arc<dyn Fn(&PredicateInput<'_>) -> Verdict + Send + Sync>;

/// Builds the concrete policy for one request
pub type PolicyFn =
    Arc<dyn Fn(&RequestContext, &PolicyTarget, Option<&Value>) -> PermissionPolicy + Send + Sync>;

/// Result of a predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Allow,
    Deny,
    /// Only these records are visible; counts as `Allow` outside `read`
    Filter(Vec<Value>),
}

impl From<bool> for Verdict {
    fn from(allowed: bool) -> Self {
        if allowed {
            Self::Allow
        } else {
            Self::Deny
        }
    }
}

impl From<Vec<Value>> for Verdict {
    fn from(records: Vec<Value>) -> Self {
        Self::Filter(records)
    }
}

/// Arrays filter; everything else follows JSON truthiness
impl From<Value> for Verdict {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(records) => Self::Filter(records),
            Value::Null => Self::Deny,
            Value::Bool(b) => b.into(),
            Value::Number(n) => (n.as_f64() != Some(0.0)).into(),
            Value::String(s) => (!s.is_empty()).into(),
            Value::Object(_) => Self::Allow,
        }
    }
}

/// Access policy of one resource
#[derive(Clone, Default)]
pub enum PermissionPolicy {
    #[default]
    Open,
    Allowlist(BTreeSet<Operation>),
    Predicates(HashMap<Operation, Predicate>),
    Deny,
    Computed(PolicyFn),
}

impl fmt::Debug for PermissionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("Open"),
            Self::Allowlist(ops) => f.debug_tuple("Allowlist").field(ops).finish(),
            Self::Predicates(map) => {
                let mut ops: Vec<_> = map.keys().collect();
                ops.sort();
                f.debug_tuple("Predicates").field(&ops).finish()
            }
            Self::Deny => f.write_str("Deny"),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl PermissionPolicy {
    /// Allow-list of operations
    pub fn allow(ops: impl IntoIterator<Item = Operation>) -> Self {
        Self::Allowlist(ops.into_iter().collect())
    }

    /// Allow-list from operation names, as written in configuration
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, UnknownOperation> {
        let ops = names
            .iter()
            .map(|name| name.as_ref().parse::<Operation>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self::Allowlist(ops))
    }

    /// Empty predicate map; add predicates with [`PermissionPolicy::on`]
    pub fn predicates() -> Self {
        Self::Predicates(HashMap::new())
    }

    /// Set the predicate for `op`
    ///
    /// Called on a policy that is not `Predicates`, this starts a new
    /// predicate map holding only `predicate`.
    pub fn on<F, V>(self, op: Operation, predicate: F) -> Self
    where
        F: Fn(&PredicateInput<'_>) -> V + Send + Sync + 'static,
        V: Into<Verdict>,
    {
        let mut map = match self {
            Self::Predicates(map) => map,
            _ => HashMap::new(),
        };
        let boxed: Predicate = Arc::new(move |input: &PredicateInput<'_>| -> Verdict { predicate(input).into() });
        map.insert(op, boxed);
        Self::Predicates(map)
    }

    /// Policy computed per request
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&RequestContext, &PolicyTarget, Option<&Value>) -> PermissionPolicy + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }
}

/// Outcome of resolving a policy
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Granted,
    Denied,
    Filtered(Vec<Value>),
}

impl Access {
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied)
    }

    /// Whether `record` is visible under this access
    ///
    /// Filtered membership is decided by identity key, so a filtered copy of
    /// a record still matches the live record.
    pub fn permits(&self, record: &Value, id_attribute: &str) -> bool {
        match self {
            Self::Granted => true,
            Self::Denied => false,
            Self::Filtered(records) => {
                let Some(key) = value_identity_key(record, id_attribute) else {
                    return false;
                };
                records
                    .iter()
                    .any(|r| value_identity_key(r, id_attribute).as_deref() == Some(key.as_str()))
            }
        }
    }
}
