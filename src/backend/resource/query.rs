/**
 * Read Query Parameters
 *
 * - `pick=a,b` keeps only the listed attributes
 * - `omit=a,b` drops the listed attributes
 * - `whereKey=k&whereValue=v` keeps records whose attribute `k` equals `v`
 *   (collection reads only)
 *
 * `whereValue` arrives as a string. It matches string attributes verbatim,
 * integer and float attributes by numeric value, and boolean attributes when
 * it reads `true` or `false`.
 */

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadQuery {
    pub pick: Option<String>,
    pub omit: Option<String>,
    #[serde(rename = "whereKey")]
    pub where_key: Option<String>,
    #[serde(rename = "whereValue")]
    pub where_value: Option<String>,
}

fn split(list: &Option<String>) -> Option<Vec<&str>> {
    list.as_deref().map(|l| l.split(',').map(str::trim).collect())
}

impl ReadQuery {
    /// Apply `pick` then `omit` to one record
    pub fn project(&self, record: Value) -> Value {
        let Value::Object(mut attributes) = record else {
            return record;
        };
        if let Some(picks) = split(&self.pick) {
            attributes.retain(|key, _| picks.contains(&key.as_str()));
        }
        if let Some(omits) = split(&self.omit) {
            attributes.retain(|key, _| !omits.contains(&key.as_str()));
        }
        Value::Object(attributes)
    }

    /// Whether a record passes the `whereKey`/`whereValue` condition
    ///
    /// Without both parameters every record passes.
    pub fn matches(&self, record: &Value) -> bool {
        let (Some(key), Some(expected)) = (&self.where_key, &self.where_value) else {
            return true;
        };
        match record.get(key) {
            Some(Value::String(s)) => s == expected,
            Some(Value::Number(n)) => {
                if let (Some(actual), Ok(wanted)) = (n.as_i64(), expected.parse::<i64>()) {
                    actual == wanted
                } else {
                    matches!((n.as_f64(), expected.parse::<f64>()), (Some(a), Ok(b)) if a == b)
                }
            }
            Some(Value::Bool(b)) => expected.parse::<bool>().is_ok_and(|wanted| wanted == *b),
            _ => false,
        }
    }

    /// Narrow a collection read: condition first, then projection
    pub fn apply(&self, records: Vec<Value>) -> Vec<Value> {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .map(|record| self.project(record))
            .collect()
    }
}
