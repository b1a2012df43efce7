use std::fmt::Debug;

use schemars::JsonSchema;
use serde::Serialize;
pub use serde_with;
use utility::id::{HasId, Id};

pub mod distance;
pub mod route;
pub mod stop;

/// Values used to illustrate the JSON schema endpoints.
pub trait ExampleData {
    fn example_data() -> Self;
}

/// A value together with its identifier. The id is serialized next to the
/// value's own fields.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub id: Id<V>,
    #[serde(flatten)]
    pub content: V,
}

impl<V> WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub fn new(id: Id<V>, content: V) -> Self {
        Self { id, content }
    }
}

impl<V> PartialEq for WithId<V>
where
    V: HasId + PartialEq,
    V::IdType: Serialize + Debug + Clone + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.content == other.content
    }
}
