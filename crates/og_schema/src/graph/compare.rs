use og_utils::hash::HashMap;

use crate::graph::{FieldKey, Graph, ObjectData, ObjectId, Value};

/// Structural comparison of two graphs that also matches identities.
///
/// `forward` and `backward` together form the bijection between the
/// objects visited so far.
pub(super) struct Isomorphism<'a> {
    left: &'a Graph,
    right: &'a Graph,
    forward: HashMap<ObjectId, ObjectId>,
    backward: HashMap<ObjectId, ObjectId>,
}

impl<'a> Isomorphism<'a> {
    pub fn new(left: &'a Graph, right: &'a Graph) -> Self {
        Self {
            left,
            right,
            forward: HashMap::default(),
            backward: HashMap::default(),
        }
    }

    pub fn values(&mut self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Null, Value::Null) => true,
            (Value::Leaf(x), Value::Leaf(y)) => x == y,
            (Value::Object(x), Value::Object(y)) => self.objects(*x, *y),
            _ => false,
        }
    }

    fn objects(&mut self, a: ObjectId, b: ObjectId) -> bool {
        if let Some(mapped) = self.forward.get(&a) {
            return *mapped == b;
        }
        if self.backward.contains_key(&b) {
            return false;
        }
        self.forward.insert(a, b);
        self.backward.insert(b, a);

        let (left_graph, right_graph) = (self.left, self.right);
        let (Some(left), Some(right)) = (left_graph.get(a), right_graph.get(b)) else {
            return false;
        };
        if left.class != right.class {
            return false;
        }

        match (&left.data, &right.data) {
            (ObjectData::Fields(x), ObjectData::Fields(y)) => {
                if non_null(x).count() != non_null(y).count() {
                    return false;
                }
                non_null(x).all(|(key, value)| {
                    let other = right_graph.field(b, key).cloned().unwrap_or_default();
                    self.values(value, &other)
                })
            }
            (ObjectData::Items(x), ObjectData::Items(y)) => {
                x.len() == y.len() && x.iter().zip(y.iter()).all(|(p, q)| self.values(p, q))
            }
            (ObjectData::Entries(x), ObjectData::Entries(y)) => {
                x.len() == y.len()
                    && x.iter()
                        .zip(y.iter())
                        .all(|((k1, v1), (k2, v2))| self.values(k1, k2) && self.values(v1, v2))
            }
            _ => false,
        }
    }
}

fn non_null(fields: &[(FieldKey, Value)]) -> impl Iterator<Item = &(FieldKey, Value)> {
    fields.iter().filter(|(_, v)| !v.is_null())
}

// -----------------------------------------------------------------------------
// Tests
